pub mod assistant;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod identity;
pub mod llm;
pub mod session;
pub mod store;

// Re-export key types
pub use assistant::{HistoryReader, PersistencePolicy, TurnHandler, TurnSettings};
pub use config::Settings;
pub use context::{Conversation, SystemPromptBuilder, UseCase, UseCaseCatalog};
pub use error::{Result, TestmateError};
pub use identity::{EnvIdentity, FixedIdentity, IdentitySource};
pub use llm::{
    ChatRequest, ContentBlock, DeferredClient, GenerationConfig, LlmClient, LlmResponse, Message,
    Role,
};
pub use session::{ChatSession, SessionState};
pub use store::{JsonFileTurnStore, MemoryTurnStore, TurnRecord, TurnStore};
