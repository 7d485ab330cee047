use crate::error::{Result, TestmateError};
use crate::llm::{Message, Role};
use serde::{Deserialize, Serialize};

/// Ordered chat messages, oldest first. Append-only while a session runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Remove a trailing user message that never got a reply.
    pub fn take_unanswered(&mut self) -> Option<Message> {
        match self.messages.last() {
            Some(last) if last.role == Role::User => self.messages.pop(),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Check the conversation can be submitted as a turn and return the
    /// question text that will be persisted for it.
    pub fn question(&self) -> Result<String> {
        let last = self.last_message().ok_or_else(|| {
            TestmateError::InvalidConversation("conversation has no messages".into())
        })?;

        if last.role != Role::User {
            return Err(TestmateError::InvalidConversation(format!(
                "last message must come from the user, got {}",
                last.role.as_str()
            )));
        }

        let text = last.text();
        if text.trim().is_empty() {
            return Err(TestmateError::InvalidConversation(
                "last user message is empty".into(),
            ));
        }

        Ok(text)
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self::from_messages(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ContentBlock;

    #[test]
    fn test_question_uses_last_user_message() {
        let conversation = Conversation::from_messages(vec![
            Message::user("first"),
            Message::assistant("reply"),
            Message::user("Write an API test"),
        ]);
        assert_eq!(conversation.question().unwrap(), "Write an API test");
    }

    #[test]
    fn test_question_joins_all_blocks() {
        let conversation = Conversation::from_messages(vec![Message::new(
            Role::User,
            vec![ContentBlock::new("line one"), ContentBlock::new("line two")],
        )]);
        assert_eq!(conversation.question().unwrap(), "line one\nline two");
    }

    #[test]
    fn test_question_rejects_empty_conversation() {
        let err = Conversation::new().question().unwrap_err();
        assert!(matches!(err, TestmateError::InvalidConversation(_)));
    }

    #[test]
    fn test_question_rejects_trailing_assistant() {
        let conversation =
            Conversation::from_messages(vec![Message::user("q"), Message::assistant("a")]);
        assert!(matches!(
            conversation.question(),
            Err(TestmateError::InvalidConversation(_))
        ));
    }

    #[test]
    fn test_question_rejects_blank_text() {
        let conversation = Conversation::from_messages(vec![Message::user("   ")]);
        assert!(conversation.question().is_err());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let conversation = Conversation::from_messages(vec![Message::user("hi")]);
        let json = serde_json::to_value(&conversation).unwrap();
        assert_eq!(json, serde_json::json!([{"role": "user", "content": [{"text": "hi"}]}]));
    }
}
