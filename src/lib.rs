//! Folds osu! multiplayer match results into a per-player, per-beatmap
//! score dataset for a fixed mappool.
//!
//! The run is strictly sequential: the pool is resolved first, then every
//! match is fetched in link order and folded into a [`aggregate::ScoreTable`],
//! and finally [`dataset::Dataset`] reshapes the tables for export.

pub mod accuracy;
pub mod aggregate;
pub mod app;
pub mod beatmaps;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod identity;
pub mod osu;
pub mod output;
pub mod pacing;
