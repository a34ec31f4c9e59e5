//! Client for the remote question-answering endpoint.
//!
//! One `ask` call issues exactly one `POST` and settles to either a parsed
//! answer or a structured error; there is no retry, timeout, or cancellation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use reqwest::StatusCode;

use crate::types::SourceLink;

pub const ENDPOINT_VAR: &str = "VIRTA_ENDPOINT";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/query";

#[derive(Debug, Error)]
pub enum AskError {
    #[error("could not reach the answering service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("answering service returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("answering service sent an unreadable reply: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default)]
    pub links: Vec<SourceLink>,
}

/// Maps a 2xx response body to an [`Answer`].
pub fn parse_answer_body(body: &str) -> Result<Answer, AskError> {
    Ok(serde_json::from_str(body)?)
}

/// Seam between the session controller and the network, so the submission
/// flow is testable without a live endpoint.
#[async_trait]
pub trait AnswerBackend {
    /// `image` is the base64-encoded attachment, without a data-URL prefix,
    /// sent only when an attachment is present.
    async fn ask(&self, question: &str, image: Option<&str>) -> Result<Answer, AskError>;
}

#[derive(Clone)]
pub struct QaClient {
    client: Client,
    endpoint: String,
}

impl QaClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint from `VIRTA_ENDPOINT`, falling back to the local development
    /// server.
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var(ENDPOINT_VAR).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        Self::new(endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnswerBackend for QaClient {
    async fn ask(&self, question: &str, image: Option<&str>) -> Result<Answer, AskError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AskRequest { question, image })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AskError::Status { status, body });
        }
        parse_answer_body(&body)
    }
}
