use std::fs;
use std::io::{self, Write};

use camino::Utf8Path;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::app::{ProgressEvent, ProgressSink};
use crate::dataset::Dataset;
use crate::error::ScoresError;

/// Pretty JSON with a four-space indent and a trailing newline.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ScoresError> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|err| ScoresError::Filesystem(err.to_string()))?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Writes the dataset through a temporary file in the destination directory,
/// so the destination only ever holds a complete document.
pub fn write_dataset(path: &Utf8Path, dataset: &Dataset) -> Result<(), ScoresError> {
    let bytes = to_pretty_json(dataset)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| ScoresError::Filesystem(format!("create {parent}: {err}")))?;
    let mut temp = tempfile::Builder::new()
        .prefix("mp-scores")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| ScoresError::Filesystem(err.to_string()))?;
    temp.write_all(&bytes)
        .map_err(|err| ScoresError::Filesystem(err.to_string()))?;
    temp.persist(path.as_std_path())
        .map_err(|err| ScoresError::Filesystem(format!("write {path}: {err}")))?;
    Ok(())
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_dataset(dataset: &Dataset) -> io::Result<()> {
        Self::print_json(dataset)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = to_pretty_json(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(&json)?;
        Ok(())
    }
}

/// Forwards progress events to the tracing subscriber.
pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => info!(elapsed_ms = elapsed.as_millis() as u64, "{}", event.message),
            None => info!("{}", event.message),
        }
    }
}
