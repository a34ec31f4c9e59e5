//! Pure projection from messages to renderable fragments. Nothing in here
//! touches the network or storage; the views only consume what this module
//! produces.

use comrak::plugins::syntect::SyntectAdapter;
use comrak::{ComrakOptions, ComrakPlugins, markdown_to_html_with_plugins};
use once_cell::sync::Lazy;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

use crate::types::{Message, Role, SourceLink};

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    // render.unsafe_ stays off: answer text arrives from a remote service,
    // so raw HTML and dangerous link schemes must never reach the document.
    options
});

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

/// Markdown to sanitized HTML. Runs on every assistant message body; raw
/// HTML in the input is escaped rather than passed through.
pub fn markdown_to_html(md: &str) -> String {
    let adapter = SyntectAdapter::new(Some("base16-ocean.dark"));
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&adapter);
    markdown_to_html_with_plugins(md, &MARKDOWN_OPTIONS, &plugins)
}

#[derive(Clone, Debug, PartialEq)]
pub enum MessageBody {
    /// User text, shown exactly as typed.
    Literal(String),
    /// Assistant markdown, already converted and sanitized.
    Markdown(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedLink {
    pub href: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMessage {
    pub role: Role,
    pub is_error: bool,
    pub body: MessageBody,
    pub links: Vec<RenderedLink>,
    pub timestamp: Option<String>,
}

impl RenderedMessage {
    pub fn row_class(&self) -> &'static str {
        match self.role {
            Role::User => "message user",
            Role::Assistant => "message assistant",
        }
    }

    pub fn content_class(&self) -> &'static str {
        if self.is_error {
            "message-content error-message"
        } else {
            "message-content"
        }
    }
}

pub fn render_message(message: &Message) -> RenderedMessage {
    let body = match message.role {
        Role::User => MessageBody::Literal(message.text.clone()),
        Role::Assistant => MessageBody::Markdown(markdown_to_html(&message.text)),
    };

    let links = match message.role {
        Role::User => Vec::new(),
        Role::Assistant => message
            .links
            .iter()
            .map(|link| RenderedLink {
                href: link.url.clone(),
                label: link_label(link).to_string(),
            })
            .collect(),
    };

    RenderedMessage {
        role: message.role,
        is_error: message.is_error,
        body,
        links,
        timestamp: format_timestamp(message.timestamp),
    }
}

/// A link's visible label is its text when present, its URL otherwise.
pub fn link_label(link: &SourceLink) -> &str {
    link.text
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(&link.url)
}

fn format_timestamp(timestamp: OffsetDateTime) -> Option<String> {
    let mut datetime = timestamp;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}
