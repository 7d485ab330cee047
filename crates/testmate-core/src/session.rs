use crate::assistant::TurnHandler;
use crate::constants::defaults;
use crate::context::Conversation;
use crate::error::{Result, TestmateError};
use crate::llm::Message;
use crate::store::TurnRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Submitting,
    Error(String),
}

/// Client-side chat state: the rendered conversation, the selected use case
/// and a single-flight gate over submissions.
#[derive(Debug, Clone)]
pub struct ChatSession {
    conversation: Conversation,
    use_case: String,
    identity: Option<String>,
    state: SessionState,
}

impl ChatSession {
    /// `identity` is `None` when authentication could not be established;
    /// the session then stays read-only.
    pub fn new(identity: Option<String>) -> Self {
        Self {
            conversation: Conversation::new(),
            use_case: defaults::DEFAULT_USE_CASE.to_string(),
            identity,
            state: SessionState::Idle,
        }
    }

    pub fn with_use_case(mut self, use_case: impl Into<String>) -> Self {
        self.use_case = use_case.into();
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn use_case(&self) -> &str {
        &self.use_case
    }

    pub fn set_use_case(&mut self, use_case: impl Into<String>) {
        self.use_case = use_case.into();
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn is_read_only(&self) -> bool {
        self.identity.is_none()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == SessionState::Submitting
    }

    /// Append the user's message and enter `Submitting`. Returns the
    /// conversation to send.
    ///
    /// A user message left unanswered by a failed turn is replaced, so a
    /// retry never sends two user messages in a row.
    pub fn begin_submit(&mut self, text: &str) -> Result<Conversation> {
        if self.is_busy() {
            return Err(TestmateError::Busy);
        }
        if self.identity.is_none() {
            return Err(TestmateError::AuthenticationUnavailable(
                "sign in to send messages".into(),
            ));
        }
        if text.trim().is_empty() {
            return Err(TestmateError::InvalidConversation(
                "message is empty".into(),
            ));
        }

        if self.conversation.take_unanswered().is_some() {
            tracing::debug!("replacing unanswered user message");
        }
        self.conversation.add_user_message(text);
        self.state = SessionState::Submitting;
        Ok(self.conversation.clone())
    }

    /// Leave `Submitting`. Already-rendered messages are never rolled back.
    pub fn finish_submit(&mut self, result: &Result<Message>) {
        match result {
            Ok(message) => {
                self.conversation.add_message(message.clone());
                self.state = SessionState::Idle;
            }
            Err(e) => {
                self.state = SessionState::Error(e.to_string());
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        if matches!(self.state, SessionState::Error(_)) {
            self.state = SessionState::Idle;
        }
    }

    /// Replace the active conversation with a past turn.
    pub fn select_history(&mut self, record: &TurnRecord) -> Result<()> {
        if self.is_busy() {
            return Err(TestmateError::Busy);
        }
        self.conversation = Conversation::from_messages(vec![
            Message::user(record.question.clone()),
            record.response.clone(),
        ]);
        self.use_case = record.use_case.clone();
        self.state = SessionState::Idle;
        Ok(())
    }

    pub fn reset(&mut self) {
        if !self.is_busy() {
            self.conversation.clear();
            self.state = SessionState::Idle;
        }
    }

    /// Run one full turn through `handler`.
    pub async fn submit(&mut self, handler: &TurnHandler, text: &str) -> Result<Message> {
        let conversation = self.begin_submit(text)?;
        // begin_submit guarantees an identity
        let identity = self.identity.clone().unwrap_or_default();
        let result = handler
            .handle_turn(&conversation, &self.use_case, &identity)
            .await;
        self.finish_submit(&result);
        result
    }
}
