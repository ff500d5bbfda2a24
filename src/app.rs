use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::aggregate::Aggregator;
use crate::beatmaps::resolve_pool;
use crate::config::ResolvedPool;
use crate::dataset::Dataset;
use crate::domain::{MatchId, RetentionMode};
use crate::error::ScoresError;
use crate::osu::OsuClient;
use crate::pacing::Pacer;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub retention: RetentionMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub beatmaps_resolved: usize,
    pub matches_processed: usize,
    pub links_skipped: usize,
    pub games_skipped: usize,
    pub scores_seen: usize,
    pub records_retained: usize,
    pub identity_lookups: usize,
    pub unknown_players: usize,
}

#[derive(Debug, Clone)]
pub struct RunResult {
    pub dataset: Dataset,
    pub summary: RunSummary,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct App<C: OsuClient, P: Pacer> {
    client: C,
    pacer: P,
    options: RunOptions,
}

impl<C: OsuClient, P: Pacer> App<C, P> {
    pub fn new(client: C, pacer: P, options: RunOptions) -> Self {
        Self {
            client,
            pacer,
            options,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Resolves the pool, folds every match in link order and assembles the
    /// dataset. Any upstream failure aborts the whole run.
    pub fn run(
        &self,
        links: &[String],
        pool: &ResolvedPool,
        sink: &dyn ProgressSink,
    ) -> Result<RunResult, ScoresError> {
        let started = Instant::now();
        sink.event(ProgressEvent {
            message: format!("phase=Resolve; {} pool slots", pool.len()),
            elapsed: None,
        });
        let maps = resolve_pool(pool, &self.client, &self.pacer, |beatmap| {
            sink.event(ProgressEvent {
                message: format!(
                    "beatmap {} [{}] {} - {} [{}]",
                    beatmap.beatmap_id,
                    beatmap.slot,
                    beatmap.artist,
                    beatmap.title,
                    beatmap.difficulty
                ),
                elapsed: Some(started.elapsed()),
            });
        })?;

        sink.event(ProgressEvent {
            message: format!("phase=Aggregate; {} links", links.len()),
            elapsed: Some(started.elapsed()),
        });
        let mut aggregator = Aggregator::new(&maps, self.options.retention);
        let mut links_skipped = 0;
        for link in links {
            let Some(match_id) = MatchId::from_link(link) else {
                debug!(%link, "no match id in link");
                links_skipped += 1;
                continue;
            };
            sink.event(ProgressEvent {
                message: format!("match {match_id}"),
                elapsed: Some(started.elapsed()),
            });
            aggregator.process_match(match_id, &self.client, &self.pacer)?;
        }

        let (identities, table, stats) = aggregator.finish();
        let summary = RunSummary {
            beatmaps_resolved: maps.len(),
            matches_processed: stats.matches_processed,
            links_skipped,
            games_skipped: stats.games_skipped,
            scores_seen: stats.scores_seen,
            records_retained: table.record_count(),
            identity_lookups: identities.lookups(),
            unknown_players: identities.unknown(),
        };
        let dataset = Dataset::assemble(identities, maps, table);

        sink.event(ProgressEvent {
            message: format!(
                "phase=Done; {} players, {} records",
                dataset.players.len(),
                summary.records_retained
            ),
            elapsed: Some(started.elapsed()),
        });
        Ok(RunResult { dataset, summary })
    }
}
