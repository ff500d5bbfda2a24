use std::fmt;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};

use crate::domain::{BeatmapId, LenientInt, PoolSlot};
use crate::error::ScoresError;

pub const API_KEY_VAR: &str = "OSU_API_KEY";
pub const DEFAULT_LINKS_FILE: &str = "mp_links.txt";
pub const DEFAULT_MAPPOOL_FILE: &str = "mappool.json";
pub const DEFAULT_OUTPUT_FILE: &str = "data/osu_scores.json";
pub const DEFAULT_BASE_URL: &str = "https://osu.ppy.sh/api";
pub const DEFAULT_DELAY_MS: u64 = 500;

#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Result<Self, ScoresError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ScoresError::MissingApiKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn from_env() -> Result<Self, ScoresError> {
        let value = std::env::var(API_KEY_VAR).map_err(|_| ScoresError::MissingApiKey)?;
        Self::new(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Mappool file contents in file order. A plain JSON object, slot label to
/// beatmap id, where the id may be a number or a numeric string.
#[derive(Debug, Default)]
pub struct PoolFile {
    pub entries: Vec<(String, LenientInt)>,
}

impl<'de> Deserialize<'de> for PoolFile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PoolVisitor;

        impl<'de> Visitor<'de> for PoolVisitor {
            type Value = PoolFile;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping slot labels to beatmap ids")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((slot, entry)) = access.next_entry::<String, LenientInt>()? {
                    entries.push((slot, entry));
                }
                Ok(PoolFile { entries })
            }
        }

        deserializer.deserialize_map(PoolVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPool {
    pub slots: Vec<PoolSlot>,
}

impl ResolvedPool {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

pub struct InputLoader;

impl InputLoader {
    pub fn load_mappool(path: &Utf8Path) -> Result<ResolvedPool, ScoresError> {
        let content = read_input(path)?;
        Self::parse_mappool(&content)
    }

    pub fn parse_mappool(content: &str) -> Result<ResolvedPool, ScoresError> {
        let file: PoolFile = serde_json::from_str(content)
            .map_err(|err| ScoresError::MappoolParse(err.to_string()))?;
        Self::resolve_pool(file)
    }

    pub fn resolve_pool(file: PoolFile) -> Result<ResolvedPool, ScoresError> {
        let slots = file
            .entries
            .into_iter()
            .map(|(slot, raw)| {
                let beatmap_id = BeatmapId::try_from(raw.clone()).map_err(|_| {
                    ScoresError::InvalidBeatmapId {
                        slot: slot.clone(),
                        value: raw.to_string(),
                    }
                })?;
                Ok(PoolSlot { slot, beatmap_id })
            })
            .collect::<Result<Vec<_>, ScoresError>>()?;
        Ok(ResolvedPool { slots })
    }

    pub fn load_links(path: &Utf8Path) -> Result<Vec<String>, ScoresError> {
        let content = read_input(path)?;
        Ok(Self::parse_links(&content))
    }

    /// Trimmed, non-blank lines that do not start with `#`.
    pub fn parse_links(content: &str) -> Vec<String> {
        content
            .lines()
            .filter(|line| !line.starts_with('#'))
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn read_input(path: &Utf8Path) -> Result<String, ScoresError> {
    fs::read_to_string(path.as_std_path())
        .map_err(|_| ScoresError::InputRead(Utf8PathBuf::from(path)))
}
