use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mp_scores::app::{App, RunOptions};
use mp_scores::config::{
    ApiKey, DEFAULT_BASE_URL, DEFAULT_DELAY_MS, DEFAULT_LINKS_FILE, DEFAULT_MAPPOOL_FILE,
    DEFAULT_OUTPUT_FILE, InputLoader,
};
use mp_scores::domain::RetentionMode;
use mp_scores::error::ScoresError;
use mp_scores::osu::OsuHttpClient;
use mp_scores::output::{JsonOutput, LogSink, write_dataset};
use mp_scores::pacing::FixedDelay;

#[derive(Parser)]
#[command(name = "mp-scores")]
#[command(about = "Export per-player best scores on a mappool from osu! multiplayer matches")]
#[command(version, author)]
struct Cli {
    /// Match links, one per line; blank lines and `#` comments are ignored
    #[arg(long, default_value = DEFAULT_LINKS_FILE)]
    links: Utf8PathBuf,

    /// JSON object mapping slot labels to beatmap ids
    #[arg(long, default_value = DEFAULT_MAPPOOL_FILE)]
    mappool: Utf8PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    output: Utf8PathBuf,

    /// Pause after every rate-limited API call
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,

    #[arg(long, value_enum, default_value_t = RetentionMode::Best)]
    retention: RetentionMode,

    /// Also print the dataset to stdout
    #[arg(long)]
    json: bool,

    /// Resolve and aggregate without writing the output file
    #[arg(long)]
    dry_run: bool,

    #[arg(long, hide = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<ScoresError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ScoresError) -> u8 {
    match error {
        ScoresError::MissingApiKey
        | ScoresError::InputRead(_)
        | ScoresError::MappoolParse(_)
        | ScoresError::InvalidBeatmapId { .. } => 2,
        err if err.is_upstream() => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api_key = ApiKey::from_env()?;
    let links = InputLoader::load_links(&cli.links)?;
    let pool = InputLoader::load_mappool(&cli.mappool)?;
    info!(
        links = links.len(),
        slots = pool.len(),
        retention = %cli.retention,
        "loaded inputs"
    );

    let client = OsuHttpClient::with_base_url(api_key, &cli.base_url)?;
    let pacer = FixedDelay::from_millis(cli.delay_ms);
    let app = App::new(
        client,
        pacer,
        RunOptions {
            retention: cli.retention,
        },
    );

    let result = app.run(&links, &pool, &LogSink)?;
    let summary = &result.summary;
    info!(
        beatmaps = summary.beatmaps_resolved,
        matches = summary.matches_processed,
        links_skipped = summary.links_skipped,
        games_skipped = summary.games_skipped,
        scores = summary.scores_seen,
        records = summary.records_retained,
        lookups = summary.identity_lookups,
        unknown_players = summary.unknown_players,
        "aggregation finished"
    );

    if cli.json {
        JsonOutput::print_dataset(&result.dataset).into_diagnostic()?;
    }
    if cli.dry_run {
        info!("dry run, not writing {}", cli.output);
        return Ok(());
    }
    write_dataset(&cli.output, &result.dataset)?;
    info!("Wrote to {}", cli.output);
    Ok(())
}
