use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ScoresError {
    #[error("OSU_API_KEY not set")]
    #[diagnostic(help("export OSU_API_KEY=<your legacy api key> before running"))]
    MissingApiKey,

    #[error("failed to read input file at {0}")]
    InputRead(Utf8PathBuf),

    #[error("failed to parse mappool JSON: {0}")]
    MappoolParse(String),

    #[error("invalid beatmap id for slot {slot}: {value}")]
    InvalidBeatmapId { slot: String, value: String },

    #[error("couldn't find beatmap with id {0}")]
    BeatmapNotFound(u64),

    #[error("osu! API request failed: {0}")]
    OsuHttp(String),

    #[error("osu! API returned status {status}: {message}")]
    OsuStatus { status: u16, message: String },

    #[error("failed to decode osu! API response: {0}")]
    OsuDecode(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl ScoresError {
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ScoresError::OsuHttp(_)
                | ScoresError::OsuStatus { .. }
                | ScoresError::OsuDecode(_)
                | ScoresError::BeatmapNotFound(_)
        )
    }
}
