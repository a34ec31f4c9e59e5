//! Integration tests for the chat session lifecycle: submission, transcript
//! synchronization with storage, attachment handling, and export.

use async_trait::async_trait;
use virta::api::{Answer, AnswerBackend, AskError, QaClient, StatusCode};
use virta::export::ExportFormat;
use virta::session::{ChatSession, MAX_QUESTION_CHARS, SubmitError};
use virta::storage::Store;
use virta::types::{Message, Role, SourceLink};

/// Backend that answers every question the same way.
struct CannedBackend {
    answer: String,
    links: Vec<SourceLink>,
}

impl CannedBackend {
    fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            links: Vec::new(),
        }
    }
}

#[async_trait]
impl AnswerBackend for CannedBackend {
    async fn ask(&self, _question: &str, _image: Option<&str>) -> Result<Answer, AskError> {
        Ok(Answer {
            answer: self.answer.clone(),
            links: self.links.clone(),
        })
    }
}

/// Backend that always fails with a non-2xx status.
struct FailingBackend;

#[async_trait]
impl AnswerBackend for FailingBackend {
    async fn ask(&self, _question: &str, _image: Option<&str>) -> Result<Answer, AskError> {
        Err(AskError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream unavailable".to_string(),
        })
    }
}

/// An empty, isolated store for one test.
fn fresh_store(profile: &str) -> Store {
    let store = Store::with_profile(profile);
    store.wipe().expect("failed to reset test profile");
    store
}

#[tokio::test]
async fn answered_question_yields_user_then_assistant_turn() {
    let store = fresh_store("test-session-answer");
    let mut session = ChatSession::new(CannedBackend::answering("4"), store.clone());

    session.submit("What is 2+2?").await.expect("submit");

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].text, "What is 2+2?");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].text, "4");
    assert!(messages[1].links.is_empty());
    assert!(!messages[1].is_error);

    store.wipe().expect("wipe");
}

#[tokio::test]
async fn status_failure_becomes_an_error_flagged_turn() {
    let store = fresh_store("test-session-status-failure");
    let mut session = ChatSession::new(FailingBackend, store.clone());

    session.submit("test").await.expect("submit");

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::Assistant);
    assert!(messages[1].is_error);
    assert!(messages[1].text.contains("502"));
    assert!(messages[1].text.contains("I'm sorry"));

    store.wipe().expect("wipe");
}

#[tokio::test]
async fn transport_failure_becomes_an_error_flagged_turn() {
    let store = fresh_store("test-session-transport-failure");
    // Nothing listens on port 1; the connection is refused immediately.
    let mut session = ChatSession::new(QaClient::new("http://127.0.0.1:1/query"), store.clone());

    session.submit("test").await.expect("submit");

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "test");
    assert_eq!(messages[1].role, Role::Assistant);
    assert!(messages[1].is_error);
    assert!(messages[1].text.contains("answering service"));

    store.wipe().expect("wipe");
}

#[tokio::test]
async fn submissions_interleave_one_assistant_turn_per_question() {
    let store = fresh_store("test-session-interleave");
    let mut session = ChatSession::new(CannedBackend::answering("ok"), store.clone());

    for question in ["one", "two", "three"] {
        session.submit(question).await.expect("submit");
    }

    let messages = session.messages();
    assert_eq!(messages.len(), 6);
    let users = messages.iter().filter(|m| m.role == Role::User).count();
    let assistants = messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .count();
    assert_eq!(users, 3);
    assert_eq!(assistants, 3);
    for pair in messages.chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].role, Role::Assistant);
    }

    store.wipe().expect("wipe");
}

#[tokio::test]
async fn history_survives_a_session_restart() {
    let store = fresh_store("test-session-restart");

    let snapshot: Vec<Message> = {
        let mut session = ChatSession::new(CannedBackend::answering("noted"), store.clone());
        session.submit("remember this").await.expect("submit");
        session.messages().to_vec()
    };

    let restarted = ChatSession::new(CannedBackend::answering("unused"), store.clone());
    assert_eq!(restarted.messages(), snapshot.as_slice());

    store.wipe().expect("wipe");
}

#[tokio::test]
async fn clear_is_idempotent_and_erases_persisted_state() {
    let store = fresh_store("test-session-clear");
    let mut session = ChatSession::new(CannedBackend::answering("gone"), store.clone());

    session.submit("forget me").await.expect("submit");
    assert!(!session.messages().is_empty());

    session.clear();
    assert!(session.messages().is_empty());
    session.clear();
    assert!(session.messages().is_empty());

    let restarted = ChatSession::new(CannedBackend::answering("unused"), store.clone());
    assert!(restarted.messages().is_empty());

    store.wipe().expect("wipe");
}

#[test]
fn overlapping_submissions_are_refused() {
    let store = fresh_store("test-session-busy");
    let mut session = ChatSession::new(FailingBackend, store.clone());

    session.begin("first").expect("first begin");
    assert!(session.is_busy());
    assert_eq!(session.begin("second"), Err(SubmitError::Busy));

    session.complete(Ok(Answer {
        answer: "done".to_string(),
        links: Vec::new(),
    }));
    assert!(!session.is_busy());
    session.begin("third").expect("idle again");

    store.wipe().expect("wipe");
}

#[test]
fn invalid_questions_never_touch_the_transcript() {
    let store = fresh_store("test-session-invalid-question");
    let mut session = ChatSession::new(FailingBackend, store.clone());

    assert_eq!(session.begin("   "), Err(SubmitError::Empty));
    let oversized = "x".repeat(MAX_QUESTION_CHARS + 1);
    assert_eq!(
        session.begin(&oversized),
        Err(SubmitError::TooLong {
            limit: MAX_QUESTION_CHARS
        })
    );
    assert!(session.messages().is_empty());
    assert!(!session.is_busy());

    store.wipe().expect("wipe");
}

#[test]
fn attachment_rides_along_with_exactly_one_question() {
    let store = fresh_store("test-session-attachment");
    let mut session = ChatSession::new(FailingBackend, store.clone());

    session
        .attach("diagram.png", "image/png", vec![1, 2, 3])
        .expect("attach");
    assert!(session.pending_attachment().is_some());

    let outbound = session.begin("what is this?").expect("begin");
    assert!(outbound.image.is_some());
    assert!(session.pending_attachment().is_none());

    session.complete(Err(AskError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "boom".to_string(),
    }));

    // The attachment was consumed even though the request failed.
    let next = session.begin("and now?").expect("begin");
    assert_eq!(next.image, None);

    store.wipe().expect("wipe");
}

#[test]
fn oversized_attachment_is_rejected_and_leaves_nothing_pending() {
    let store = fresh_store("test-session-attachment-rejected");
    let mut session = ChatSession::new(FailingBackend, store.clone());

    let six_megabytes = vec![0u8; 6 * 1024 * 1024];
    let result = session.attach("big.png", "image/png", six_megabytes);
    assert!(result.is_err());
    assert!(session.pending_attachment().is_none());

    store.wipe().expect("wipe");
}

#[tokio::test]
async fn exports_cover_the_whole_transcript_including_failures() {
    let store = fresh_store("test-session-export");
    let mut session = ChatSession::new(FailingBackend, store.clone());

    session.submit("does this persist?").await.expect("submit");

    let json = session
        .export_string(ExportFormat::Json)
        .expect("json export");
    let decoded: Vec<Message> = serde_json::from_str(&json).expect("parse export");
    assert_eq!(decoded.len(), 2);
    assert!(decoded[1].is_error);

    let text = session
        .export_string(ExportFormat::Text)
        .expect("text export");
    assert!(text.contains("USER: does this persist?"));
    assert!(text.contains("ASSISTANT:"));

    store.wipe().expect("wipe");
}
