use crate::types::Message;

/// Append-only ordered log of conversation turns. The in-memory transcript is
/// the single source of truth after startup; storage only mirrors it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a transcript from previously persisted messages, re-applying
    /// the append path so the timestamp ordering invariant holds even if the
    /// stored data was produced across clock adjustments.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let mut transcript = Self::new();
        for message in messages {
            transcript.append(message);
        }
        transcript
    }

    /// Adds a message to the end of the log. Never fails. Timestamps are
    /// clamped so the sequence stays monotonically non-decreasing.
    pub fn append(&mut self, mut message: Message) {
        if let Some(last) = self.messages.last()
            && message.timestamp < last.timestamp
        {
            message.timestamp = last.timestamp;
        }
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, Role};
    use time::OffsetDateTime;

    #[test]
    fn append_keeps_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("first"));
        transcript.append(Message::answer("second", Vec::new()));
        transcript.append(Message::user("third"));

        let texts: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn append_clamps_backwards_timestamps() {
        let mut transcript = Transcript::new();
        let mut early = Message::user("early");
        early.timestamp = OffsetDateTime::from_unix_timestamp(2_000).unwrap();
        let mut late = Message::user("late");
        late.timestamp = OffsetDateTime::from_unix_timestamp(1_000).unwrap();

        transcript.append(early);
        transcript.append(late);

        let messages = transcript.messages();
        assert!(messages[1].timestamp >= messages[0].timestamp);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("hello"));
        transcript.clear();
        assert!(transcript.is_empty());
        transcript.clear();
        assert!(transcript.is_empty());
    }

    #[test]
    fn from_messages_preserves_content() {
        let messages = vec![Message::user("q"), Message::answer("a", Vec::new())];
        let transcript = Transcript::from_messages(messages.clone());
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].role, Role::User);
        assert_eq!(transcript.messages()[1].role, Role::Assistant);
    }
}
