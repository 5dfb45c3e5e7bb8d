//! Conversation model shared by the client and its callers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation log
///
/// The id is local bookkeeping only; it never leaves the process (the wire
/// payload carries the minimal `{role, content}` shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an empty assistant message to be filled in as stream deltas
    /// arrive.
    pub fn assistant_draft() -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: String::new(),
        }
    }
}

/// Append-only conversation log; insertion order is display order.
///
/// At most one message is in progress (being appended to by the stream
/// decoder) at any time; everything already pushed is treated as immutable.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut conversation = Conversation::new();
        conversation.push(Message::user("first"));
        conversation.push(Message::assistant_draft());
        conversation.push(Message::user("second"));

        let contents: Vec<&str> = conversation
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "", "second"]);
    }

    #[test]
    fn test_assistant_draft_starts_empty() {
        let draft = Message::assistant_draft();
        assert_eq!(draft.role, Role::Assistant);
        assert!(draft.content.is_empty());
    }
}
