//! Transcript export: a pretty-printed JSON document or a plain-text
//! rendering with a fixed header, one block per message.

use std::path::PathBuf;
use std::{fs, io};

use thiserror::Error;
use time::{UtcOffset, format_description::FormatItem, macros::format_description};

use crate::render::link_label;
use crate::types::Message;

pub const EXPORT_HEADER: &str = "Virta - Chat History";
const RULE_WIDTH: usize = 50;

const EXPORT_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Json => "virta-history.json",
            ExportFormat::Text => "virta-history.txt",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("there is no chat history to export yet")]
    Empty,
    #[error("could not serialize the chat history: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write the export file: {0}")]
    Io(#[from] io::Error),
}

/// Serializes the transcript in the requested format.
pub fn render_transcript(
    messages: &[Message],
    format: ExportFormat,
) -> Result<String, ExportError> {
    if messages.is_empty() {
        return Err(ExportError::Empty);
    }
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(messages)?),
        ExportFormat::Text => Ok(render_text(messages)),
    }
}

fn render_text(messages: &[Message]) -> String {
    let mut out = String::new();
    out.push_str(EXPORT_HEADER);
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    for message in messages {
        out.push_str(&format!("[{}]\n", format_export_time(message)));
        out.push_str(&format!("{}: {}\n", message.role.label(), message.text));
        if !message.links.is_empty() {
            out.push_str("Sources:\n");
            for link in &message.links {
                out.push_str(&format!("  - {}: {}\n", link_label(link), link.url));
            }
        }
        out.push('\n');
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push_str("\n\n");
    }

    out
}

fn format_export_time(message: &Message) -> String {
    let mut datetime = message.timestamp;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime
        .format(EXPORT_TIME_FORMAT)
        .unwrap_or_else(|_| message.timestamp.to_string())
}

/// Where the export artifact lands: the user's download directory when the
/// platform has one, the temp directory otherwise.
pub fn suggested_path(format: ExportFormat) -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(format.file_name())
}

/// Renders and writes the export artifact, returning its path.
pub fn write_transcript(messages: &[Message], format: ExportFormat) -> Result<PathBuf, ExportError> {
    let body = render_transcript(messages, format)?;
    let path = suggested_path(format);
    fs::write(&path, body)?;
    Ok(path)
}
