//! One-way export of a conversation to a timestamped JSON file.
use crate::completion::Message;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// `conversation_<YYYYMMDD_HHMMSS>.json` for the given instant.
pub fn export_file_name(at: &DateTime<Local>) -> String {
    format!("conversation_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Write `messages` as a pretty-printed JSON array into `dir`, named after the
/// current local time. Returns the written path.
pub fn save_conversation(messages: &[Message], dir: &Path) -> Result<PathBuf, ExportError> {
    save_conversation_at(messages, dir, &Local::now())
}

#[instrument(skip(messages), fields(count = messages.len()))]
pub fn save_conversation_at(
    messages: &[Message],
    dir: &Path,
    at: &DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(at));
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, messages)?;
    writer.flush()?;
    debug!(path = %path.display(), "Saved conversation");
    Ok(path)
}
