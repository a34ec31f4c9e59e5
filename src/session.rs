//! Session controller: owns the transcript, the pending attachment, the
//! in-flight flag, and the theme, and orchestrates submit/clear/export by
//! composing the other modules. One instance is constructed at startup and
//! lives for the page lifetime; tests construct and drop their own.

use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::api::{Answer, AnswerBackend, AskError};
use crate::attachment::{AttachmentError, PendingAttachment};
use crate::export::{self, ExportError, ExportFormat};
use crate::storage::Store;
use crate::transcript::Transcript;
use crate::types::{Message, ThemeMode};

pub const MAX_QUESTION_CHARS: usize = 2000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("type a question first")]
    Empty,
    #[error("questions are limited to {limit} characters")]
    TooLong { limit: usize },
    #[error("a question is already waiting for an answer")]
    Busy,
}

/// Everything the network call needs, captured when a submission begins.
/// The user turn is already in the transcript by the time this exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outbound {
    pub question: String,
    pub image: Option<String>,
}

pub struct ChatSession<B> {
    backend: B,
    store: Store,
    transcript: Transcript,
    pending: Option<PendingAttachment>,
    in_flight: bool,
    theme: ThemeMode,
    notice: Option<String>,
}

impl<B: AnswerBackend> ChatSession<B> {
    /// Loads persisted history and theme; after this the in-memory state is
    /// authoritative and the store is write-only.
    pub fn new(backend: B, store: Store) -> Self {
        let transcript = Transcript::from_messages(store.load_history());
        let theme = store.load_theme();
        Self {
            backend,
            store,
            transcript,
            pending: None,
            in_flight: false,
            theme,
            notice: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
        if let Err(err) = self.store.save_theme(theme) {
            warn!("could not persist theme preference: {err}");
            self.notice = Some(err.to_string());
        }
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn pending_attachment(&self) -> Option<&PendingAttachment> {
        self.pending.as_ref()
    }

    /// Validates and stages an image for the next question, replacing any
    /// previous one. Rejected files leave the pending slot unset.
    pub fn attach(
        &mut self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<(), AttachmentError> {
        self.pending = Some(PendingAttachment::new(file_name, mime, bytes)?);
        Ok(())
    }

    pub fn clear_attachment(&mut self) {
        self.pending = None;
    }

    /// First half of a submission: validates the question, appends the user
    /// turn, persists, takes the pending attachment, and marks the session
    /// in-flight. Overlapping submissions are refused outright rather than
    /// queued.
    pub fn begin(&mut self, question: &str) -> Result<Outbound, SubmitError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SubmitError::Empty);
        }
        if question.chars().count() > MAX_QUESTION_CHARS {
            return Err(SubmitError::TooLong {
                limit: MAX_QUESTION_CHARS,
            });
        }
        if self.in_flight {
            return Err(SubmitError::Busy);
        }

        self.transcript.append(Message::user(question));
        self.persist();
        self.in_flight = true;
        let image = self.pending.take().map(|attachment| attachment.encoded);

        Ok(Outbound {
            question: question.to_string(),
            image,
        })
    }

    /// Second half of a submission: appends the assistant turn (answer or
    /// error-flagged explanation), persists, and returns the session to idle.
    pub fn complete(&mut self, outcome: Result<Answer, AskError>) {
        let message = match outcome {
            Ok(answer) => Message::answer(answer.answer, answer.links),
            Err(err) => Message::error(format!(
                "I'm sorry, I encountered an error: {err}. Please try again or check your connection."
            )),
        };
        self.transcript.append(message);
        self.persist();
        self.in_flight = false;
    }

    /// Full submission cycle: begin, one network call, complete.
    pub async fn submit(&mut self, question: &str) -> Result<(), SubmitError> {
        let outbound = self.begin(question)?;
        let outcome = self
            .backend
            .ask(&outbound.question, outbound.image.as_deref())
            .await;
        self.complete(outcome);
        Ok(())
    }

    /// Empties the transcript and the persisted history. Idempotent. The
    /// caller is responsible for confirming with the user first.
    pub fn clear(&mut self) {
        self.transcript.clear();
        if let Err(err) = self.store.clear_history() {
            warn!("could not clear persisted history: {err}");
            self.notice = Some(err.to_string());
        }
    }

    pub fn export_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export::render_transcript(self.transcript.messages(), format)
    }

    /// Writes the export artifact to the download directory.
    pub fn export_to_downloads(&self, format: ExportFormat) -> Result<PathBuf, ExportError> {
        export::write_transcript(self.transcript.messages(), format)
    }

    /// A transient, dismissible notice (storage trouble, mostly). Failures
    /// surfaced here never block the in-memory transcript.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save_history(self.transcript.messages()) {
            warn!("could not persist chat history: {err}");
            self.notice = Some(err.to_string());
        }
    }
}
