use serde::{Serialize, Serializer};

use crate::aggregate::{PlayerAggregate, ScoreTable};
use crate::beatmaps::MapSet;
use crate::domain::{Beatmap, PlayerIdentity, ScoreRecord, UserId, compare_slots};
use crate::identity::IdentityCache;

/// Entries exported under their id string in a keyed collection.
pub trait Keyed {
    fn key(&self) -> String;
}

impl Keyed for PlayerIdentity {
    fn key(&self) -> String {
        self.user_id.key()
    }
}

impl Keyed for Beatmap {
    fn key(&self) -> String {
        self.beatmap_id.key()
    }
}

impl Keyed for PlayerEntry {
    fn key(&self) -> String {
        self.user_id.key()
    }
}

#[allow(clippy::ptr_arg)]
fn keyed<S, T>(items: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Keyed + Serialize,
{
    serializer.collect_map(items.iter().map(|item| (item.key(), item)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerEntry {
    pub user_id: UserId,
    pub username: String,
    pub scores: Vec<ScoreRecord>,
}

impl From<PlayerAggregate> for PlayerEntry {
    fn from(player: PlayerAggregate) -> Self {
        let scores = player.scores().cloned().collect();
        Self {
            user_id: player.user_id,
            username: player.username,
            scores,
        }
    }
}

/// Exported document: `users`, `maps` and `players`, each keyed by id string
/// and kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    #[serde(serialize_with = "keyed")]
    pub users: Vec<PlayerIdentity>,
    #[serde(serialize_with = "keyed")]
    pub maps: Vec<Beatmap>,
    #[serde(serialize_with = "keyed")]
    pub players: Vec<PlayerEntry>,
}

impl Dataset {
    pub fn assemble(identities: IdentityCache, maps: MapSet, table: ScoreTable) -> Self {
        Self {
            users: identities.into_identities(),
            maps: maps.into_maps(),
            players: table.into_players().into_iter().map(PlayerEntry::from).collect(),
        }
    }

    pub fn user(&self, id: UserId) -> Option<&PlayerIdentity> {
        self.users.iter().find(|user| user.user_id == id)
    }

    pub fn player(&self, id: UserId) -> Option<&PlayerEntry> {
        self.players.iter().find(|player| player.user_id == id)
    }

    /// Maps ordered by mod group and slot number, e.g. NM1, NM2, HD1, ..., TB.
    pub fn maps_by_slot(&self) -> Vec<&Beatmap> {
        let mut maps = self.maps.iter().collect::<Vec<_>>();
        maps.sort_by(|a, b| compare_slots(&a.slot, &b.slot));
        maps
    }

    pub fn score_count(&self) -> usize {
        self.players.iter().map(|player| player.scores.len()).sum()
    }
}
