use std::collections::HashMap;

use tracing::warn;

use crate::config::ResolvedPool;
use crate::domain::{Beatmap, BeatmapId};
use crate::error::ScoresError;
use crate::osu::OsuClient;
use crate::pacing::Pacer;

/// The resolved maps of interest, in pool order.
#[derive(Debug, Clone, Default)]
pub struct MapSet {
    maps: Vec<Beatmap>,
    index: HashMap<BeatmapId, usize>,
}

impl MapSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: BeatmapId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: BeatmapId) -> Option<&Beatmap> {
        self.index.get(&id).map(|&slot| &self.maps[slot])
    }

    /// Returns `false` and keeps the existing entry when the id is already present.
    pub fn insert(&mut self, beatmap: Beatmap) -> bool {
        if self.index.contains_key(&beatmap.beatmap_id) {
            return false;
        }
        self.index.insert(beatmap.beatmap_id, self.maps.len());
        self.maps.push(beatmap);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Beatmap> {
        self.maps.iter()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn into_maps(self) -> Vec<Beatmap> {
        self.maps
    }
}

/// Fetches metadata for every pool slot, one lookup per distinct beatmap id.
/// A beatmap the upstream does not know aborts the run.
pub fn resolve_pool<C, P>(
    pool: &ResolvedPool,
    client: &C,
    pacer: &P,
    mut on_resolved: impl FnMut(&Beatmap),
) -> Result<MapSet, ScoresError>
where
    C: OsuClient + ?Sized,
    P: Pacer + ?Sized,
{
    let mut maps = MapSet::new();
    for entry in &pool.slots {
        if let Some(existing) = maps.get(entry.beatmap_id) {
            warn!(
                beatmap_id = %entry.beatmap_id,
                slot = %entry.slot,
                kept = %existing.slot,
                "beatmap listed under more than one slot"
            );
            continue;
        }

        let record = client
            .get_beatmap(entry.beatmap_id)?
            .require(|| ScoresError::BeatmapNotFound(entry.beatmap_id.get()))?;
        let beatmap = Beatmap {
            beatmap_id: entry.beatmap_id,
            slot: entry.slot.clone(),
            artist: record.artist,
            title: record.title,
            difficulty: record.version,
        };
        on_resolved(&beatmap);
        maps.insert(beatmap);
        pacer.pause();
    }
    Ok(maps)
}
