use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::{ApiKey, DEFAULT_BASE_URL};
use crate::domain::{BeatmapId, LenientInt, MatchId, UserId};
use crate::error::ScoresError;

/// Outcome of a lookup that reached the upstream. Transport failures are the
/// `Err` side of the surrounding `Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    /// Treats a missing record as fatal.
    pub fn require(self, missing: impl FnOnce() -> ScoresError) -> Result<T, ScoresError> {
        match self {
            Lookup::Found(value) => Ok(value),
            Lookup::NotFound => Err(missing()),
        }
    }

    /// Absorbs a missing record with a substitute value.
    pub fn or_substitute(self, substitute: impl FnOnce() -> T) -> T {
        match self {
            Lookup::Found(value) => value,
            Lookup::NotFound => substitute(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
        }
    }

    fn from_list(list: Vec<T>) -> Self {
        match list.into_iter().next() {
            Some(value) => Lookup::Found(value),
            None => Lookup::NotFound,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchRecord {
    #[serde(default)]
    pub games: Vec<GameRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameRecord {
    pub beatmap_id: BeatmapId,
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreEntry {
    pub user_id: UserId,
    #[serde(deserialize_with = "lenient_u64")]
    pub score: u64,
    #[serde(deserialize_with = "lenient_u32")]
    pub count50: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub count100: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub count300: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub countmiss: u32,
    #[serde(default, deserialize_with = "lenient_mods")]
    pub enabled_mods: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BeatmapRecord {
    pub artist: String,
    pub title: String,
    pub version: String,
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    LenientInt::deserialize(deserializer)?
        .to_u64()
        .map_err(serde::de::Error::custom)
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = lenient_u64(deserializer)?;
    u32::try_from(value).map_err(serde::de::Error::custom)
}

fn lenient_mods<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<LenientInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => {
            let value = raw.to_u64().map_err(serde::de::Error::custom)?;
            u32::try_from(value)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// The three lookups of the legacy osu! API the exporter depends on.
pub trait OsuClient: Send + Sync {
    fn get_match(&self, id: MatchId) -> Result<MatchRecord, ScoresError>;
    fn get_user(&self, id: UserId) -> Result<Lookup<UserRecord>, ScoresError>;
    fn get_beatmap(&self, id: BeatmapId) -> Result<Lookup<BeatmapRecord>, ScoresError>;
}

#[derive(Clone)]
pub struct OsuHttpClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl OsuHttpClient {
    pub fn new(api_key: ApiKey) -> Result<Self, ScoresError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: ApiKey, base_url: &str) -> Result<Self, ScoresError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("mp-scores/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| ScoresError::OsuHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| ScoresError::OsuHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, ScoresError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "osu! API request failed".to_string());
        Err(ScoresError::OsuStatus { status, message })
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ScoresError> {
        let url = self.endpoint_url(endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("k", self.api_key.as_str())])
            .query(params)
            .send()
            .map_err(|err| ScoresError::OsuHttp(err.without_url().to_string()))?;
        let response = Self::handle_status(response)?;
        response
            .json()
            .map_err(|err| ScoresError::OsuDecode(err.without_url().to_string()))
    }
}

impl OsuClient for OsuHttpClient {
    fn get_match(&self, id: MatchId) -> Result<MatchRecord, ScoresError> {
        self.get_json("get_match", &[("mp", id.to_string())])
    }

    fn get_user(&self, id: UserId) -> Result<Lookup<UserRecord>, ScoresError> {
        let users: Vec<UserRecord> = self.get_json(
            "get_user",
            &[("u", id.to_string()), ("type", "id".to_string())],
        )?;
        Ok(Lookup::from_list(users))
    }

    fn get_beatmap(&self, id: BeatmapId) -> Result<Lookup<BeatmapRecord>, ScoresError> {
        let beatmaps: Vec<BeatmapRecord> =
            self.get_json("get_beatmaps", &[("b", id.to_string())])?;
        Ok(Lookup::from_list(beatmaps))
    }
}
