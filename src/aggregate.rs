use std::collections::HashMap;

use tracing::debug;

use crate::accuracy::HitCounts;
use crate::beatmaps::MapSet;
use crate::domain::{BeatmapId, MatchId, PlayerIdentity, RetentionMode, ScoreRecord, UserId};
use crate::error::ScoresError;
use crate::identity::IdentityCache;
use crate::osu::{MatchRecord, OsuClient, ScoreEntry};
use crate::pacing::Pacer;

/// What happened to a candidate score offered to a player's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// First score for the beatmap.
    Inserted,
    /// Strictly higher than the stored score.
    Replaced,
    /// Not higher than the stored score; the stored one stays.
    Kept,
    /// History mode: stored next to the earlier scores.
    Appended,
}

/// Replaces `current` with `candidate` iff the candidate scored strictly more.
pub fn keep_best(current: &mut ScoreRecord, candidate: ScoreRecord) -> bool {
    if candidate.score > current.score {
        *current = candidate;
        return true;
    }
    false
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeatmapScores {
    pub beatmap_id: BeatmapId,
    pub records: Vec<ScoreRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAggregate {
    pub user_id: UserId,
    pub username: String,
    beatmaps: Vec<BeatmapScores>,
    index: HashMap<BeatmapId, usize>,
}

impl PlayerAggregate {
    pub fn new(identity: &PlayerIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username.clone(),
            beatmaps: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn offer(&mut self, candidate: ScoreRecord, mode: RetentionMode) -> Offer {
        let Some(slot) = self.index.get(&candidate.beatmap_id).copied() else {
            self.index.insert(candidate.beatmap_id, self.beatmaps.len());
            self.beatmaps.push(BeatmapScores {
                beatmap_id: candidate.beatmap_id,
                records: vec![candidate],
            });
            return Offer::Inserted;
        };

        let records = &mut self.beatmaps[slot].records;
        match mode {
            RetentionMode::History => {
                records.push(candidate);
                Offer::Appended
            }
            RetentionMode::Best if records.is_empty() => {
                records.push(candidate);
                Offer::Inserted
            }
            RetentionMode::Best => {
                if keep_best(&mut records[0], candidate) {
                    Offer::Replaced
                } else {
                    Offer::Kept
                }
            }
        }
    }

    /// Highest score for the beatmap; the earliest one on ties.
    pub fn best(&self, beatmap_id: BeatmapId) -> Option<&ScoreRecord> {
        let slot = *self.index.get(&beatmap_id)?;
        self.beatmaps[slot]
            .records
            .iter()
            .reduce(|best, next| if next.score > best.score { next } else { best })
    }

    /// All retained scores, grouped by beatmap in first-seen order.
    pub fn scores(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.beatmaps.iter().flat_map(|entry| entry.records.iter())
    }

    pub fn score_count(&self) -> usize {
        self.beatmaps.iter().map(|entry| entry.records.len()).sum()
    }
}

/// Two-level table: player, then beatmap. Players keep first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    mode: RetentionMode,
    players: Vec<PlayerAggregate>,
    index: HashMap<UserId, usize>,
}

impl ScoreTable {
    pub fn new(mode: RetentionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn offer(&mut self, identity: &PlayerIdentity, candidate: ScoreRecord) -> Offer {
        let slot = match self.index.get(&identity.user_id) {
            Some(&slot) => slot,
            None => {
                let slot = self.players.len();
                self.players.push(PlayerAggregate::new(identity));
                self.index.insert(identity.user_id, slot);
                slot
            }
        };
        self.players[slot].offer(candidate, self.mode)
    }

    pub fn player(&self, id: UserId) -> Option<&PlayerAggregate> {
        self.index.get(&id).map(|&slot| &self.players[slot])
    }

    pub fn players(&self) -> &[PlayerAggregate] {
        &self.players
    }

    pub fn into_players(self) -> Vec<PlayerAggregate> {
        self.players
    }

    pub fn record_count(&self) -> usize {
        self.players.iter().map(PlayerAggregate::score_count).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub matches_processed: usize,
    pub games_skipped: usize,
    pub scores_seen: usize,
}

pub fn candidate_record(
    match_id: MatchId,
    game_index: usize,
    beatmap_id: BeatmapId,
    entry: &ScoreEntry,
) -> ScoreRecord {
    ScoreRecord {
        match_id,
        game_id: game_index,
        beatmap_id,
        score: entry.score,
        accuracy: HitCounts::from(entry).accuracy(),
        mods: entry.enabled_mods.unwrap_or(0),
    }
}

/// Folds matches into the score table, resolving players as they appear.
pub struct Aggregator<'a> {
    maps: &'a MapSet,
    table: ScoreTable,
    identities: IdentityCache,
    stats: AggregateStats,
}

impl<'a> Aggregator<'a> {
    pub fn new(maps: &'a MapSet, mode: RetentionMode) -> Self {
        Self {
            maps,
            table: ScoreTable::new(mode),
            identities: IdentityCache::new(),
            stats: AggregateStats::default(),
        }
    }

    /// Fetches one match, folds it in, then pauses once for the match.
    pub fn process_match<C, P>(
        &mut self,
        match_id: MatchId,
        client: &C,
        pacer: &P,
    ) -> Result<(), ScoresError>
    where
        C: OsuClient + ?Sized,
        P: Pacer + ?Sized,
    {
        let record = client.get_match(match_id)?;
        self.ingest_match(match_id, &record, client, pacer)?;
        pacer.pause();
        Ok(())
    }

    pub fn ingest_match<C, P>(
        &mut self,
        match_id: MatchId,
        record: &MatchRecord,
        client: &C,
        pacer: &P,
    ) -> Result<(), ScoresError>
    where
        C: OsuClient + ?Sized,
        P: Pacer + ?Sized,
    {
        for (game_index, game) in record.games.iter().enumerate() {
            if !self.maps.contains(game.beatmap_id) {
                debug!(%match_id, game_index, beatmap_id = %game.beatmap_id, "beatmap not in pool");
                self.stats.games_skipped += 1;
                continue;
            }

            for entry in &game.scores {
                let identity = self.identities.resolve(entry.user_id, client, pacer)?;
                let candidate = candidate_record(match_id, game_index, game.beatmap_id, entry);
                self.table.offer(identity, candidate);
                self.stats.scores_seen += 1;
            }
        }
        self.stats.matches_processed += 1;
        Ok(())
    }

    pub fn stats(&self) -> AggregateStats {
        self.stats
    }

    pub fn finish(self) -> (IdentityCache, ScoreTable, AggregateStats) {
        (self.identities, self.table, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(match_id: u64, game_id: usize, beatmap_id: u64, score: u64) -> ScoreRecord {
        ScoreRecord {
            match_id: MatchId::new(match_id),
            game_id,
            beatmap_id: BeatmapId::new(beatmap_id),
            score,
            accuracy: 99.0,
            mods: 0,
        }
    }

    fn identity(id: u64) -> PlayerIdentity {
        PlayerIdentity {
            user_id: UserId::new(id),
            username: format!("player{id}"),
        }
    }

    #[test]
    fn keep_best_requires_strictly_greater() {
        let mut current = record(1, 0, 100, 500_000);
        assert!(!keep_best(&mut current, record(1, 1, 100, 500_000)));
        assert_eq!(current.game_id, 0);
        assert!(keep_best(&mut current, record(1, 2, 100, 500_001)));
        assert_eq!(current.game_id, 2);
    }

    #[test]
    fn best_mode_keeps_one_record_per_beatmap() {
        let mut table = ScoreTable::new(RetentionMode::Best);
        let player = identity(7);
        assert_eq!(table.offer(&player, record(1, 0, 100, 500_000)), Offer::Inserted);
        assert_eq!(table.offer(&player, record(1, 1, 100, 800_000)), Offer::Replaced);
        assert_eq!(table.offer(&player, record(2, 0, 100, 700_000)), Offer::Kept);
        assert_eq!(table.offer(&player, record(2, 1, 200, 1)), Offer::Inserted);

        let aggregate = table.player(UserId::new(7)).unwrap();
        let scores = aggregate.scores().collect::<Vec<_>>();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].score, 800_000);
        assert_eq!(scores[0].game_id, 1);
        assert_eq!(scores[1].beatmap_id, BeatmapId::new(200));
    }

    #[test]
    fn history_mode_keeps_every_record() {
        let mut table = ScoreTable::new(RetentionMode::History);
        let player = identity(7);
        table.offer(&player, record(1, 0, 100, 500_000));
        table.offer(&player, record(1, 1, 200, 10));
        assert_eq!(table.offer(&player, record(2, 0, 100, 400_000)), Offer::Appended);

        let aggregate = table.player(UserId::new(7)).unwrap();
        let order = aggregate
            .scores()
            .map(|score| (score.beatmap_id.get(), score.score))
            .collect::<Vec<_>>();
        assert_eq!(order, vec![(100, 500_000), (100, 400_000), (200, 10)]);
        assert_eq!(aggregate.best(BeatmapId::new(100)).unwrap().score, 500_000);
        assert_eq!(table.record_count(), 3);
    }

    #[test]
    fn fold_order_does_not_change_the_maximum() {
        let scores = [300, 900, 100, 900, 500];
        let mut forward = ScoreTable::new(RetentionMode::Best);
        let mut backward = ScoreTable::new(RetentionMode::Best);
        let player = identity(1);
        for (index, score) in scores.iter().enumerate() {
            forward.offer(&player, record(1, index, 100, *score));
        }
        for (index, score) in scores.iter().enumerate().rev() {
            backward.offer(&player, record(1, index, 100, *score));
        }
        let best = |table: &ScoreTable| {
            table
                .player(UserId::new(1))
                .and_then(|player| player.best(BeatmapId::new(100)))
                .map(|record| record.score)
        };
        assert_eq!(best(&forward), Some(900));
        assert_eq!(best(&backward), Some(900));
        // ties keep whichever arrived first
        assert_eq!(
            forward.player(UserId::new(1)).unwrap().scores().next().unwrap().game_id,
            1
        );
    }
}
