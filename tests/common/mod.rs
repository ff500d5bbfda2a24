#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Mutex;

use mp_scores::app::{ProgressEvent, ProgressSink};
use mp_scores::config::{InputLoader, ResolvedPool};
use mp_scores::domain::{BeatmapId, MatchId, UserId};
use mp_scores::error::ScoresError;
use mp_scores::osu::{
    BeatmapRecord, GameRecord, Lookup, MatchRecord, OsuClient, ScoreEntry, UserRecord,
};
use mp_scores::pacing::Pacer;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Calls {
    pub matches: Vec<u64>,
    pub users: Vec<u64>,
    pub beatmaps: Vec<u64>,
}

/// In-memory upstream with canned responses.
#[derive(Default)]
pub struct ScriptedOsu {
    matches: HashMap<u64, MatchRecord>,
    users: HashMap<u64, String>,
    beatmaps: HashMap<u64, BeatmapRecord>,
    broken_matches: Vec<u64>,
    calls: Mutex<Calls>,
}

impl ScriptedOsu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_beatmap(mut self, id: u64, artist: &str, title: &str, version: &str) -> Self {
        self.beatmaps.insert(
            id,
            BeatmapRecord {
                artist: artist.to_string(),
                title: title.to_string(),
                version: version.to_string(),
            },
        );
        self
    }

    pub fn with_user(mut self, id: u64, username: &str) -> Self {
        self.users.insert(id, username.to_string());
        self
    }

    pub fn with_match(mut self, id: u64, games: Vec<GameRecord>) -> Self {
        self.matches.insert(id, MatchRecord { games });
        self
    }

    pub fn with_broken_match(mut self, id: u64) -> Self {
        self.broken_matches.push(id);
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }
}

impl OsuClient for ScriptedOsu {
    fn get_match(&self, id: MatchId) -> Result<MatchRecord, ScoresError> {
        self.calls.lock().unwrap().matches.push(id.get());
        if self.broken_matches.contains(&id.get()) {
            return Err(ScoresError::OsuHttp("connection reset".to_string()));
        }
        Ok(self.matches.get(&id.get()).cloned().unwrap_or_default())
    }

    fn get_user(&self, id: UserId) -> Result<Lookup<UserRecord>, ScoresError> {
        self.calls.lock().unwrap().users.push(id.get());
        Ok(match self.users.get(&id.get()) {
            Some(username) => Lookup::Found(UserRecord {
                username: username.clone(),
            }),
            None => Lookup::NotFound,
        })
    }

    fn get_beatmap(&self, id: BeatmapId) -> Result<Lookup<BeatmapRecord>, ScoresError> {
        self.calls.lock().unwrap().beatmaps.push(id.get());
        Ok(match self.beatmaps.get(&id.get()) {
            Some(record) => Lookup::Found(record.clone()),
            None => Lookup::NotFound,
        })
    }
}

#[derive(Default)]
pub struct CountingPacer {
    pauses: Cell<usize>,
}

impl CountingPacer {
    pub fn pauses(&self) -> usize {
        self.pauses.get()
    }
}

impl Pacer for CountingPacer {
    fn pause(&self) {
        self.pauses.set(self.pauses.get() + 1);
    }
}

pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn event(&self, _event: ProgressEvent) {}
}

pub fn game(beatmap_id: u64, scores: Vec<ScoreEntry>) -> GameRecord {
    GameRecord {
        beatmap_id: BeatmapId::new(beatmap_id),
        scores,
    }
}

/// Score entry with `count300` best hits and `misses` misses.
pub fn entry(user_id: u64, score: u64, count300: u32, misses: u32) -> ScoreEntry {
    ScoreEntry {
        user_id: UserId::new(user_id),
        score,
        count50: 0,
        count100: 0,
        count300,
        countmiss: misses,
        enabled_mods: None,
    }
}

pub fn entry_with_mods(user_id: u64, score: u64, count300: u32, mods: u32) -> ScoreEntry {
    ScoreEntry {
        enabled_mods: Some(mods),
        ..entry(user_id, score, count300, 0)
    }
}

pub fn pool(json: &str) -> ResolvedPool {
    InputLoader::parse_mappool(json).unwrap()
}

pub fn links(ids: &[u64]) -> Vec<String> {
    ids.iter()
        .map(|id| format!("https://osu.ppy.sh/community/matches/{id}"))
        .collect()
}
