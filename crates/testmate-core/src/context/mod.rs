mod conversation;
pub mod system_prompt;

pub use conversation::Conversation;
pub use system_prompt::{SystemPromptBuilder, UseCase, UseCaseCatalog};
