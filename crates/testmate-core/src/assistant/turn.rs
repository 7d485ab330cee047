use crate::constants::defaults;
use crate::context::{Conversation, SystemPromptBuilder, UseCaseCatalog};
use crate::error::{Result, TestmateError};
use crate::llm::{ChatRequest, GenerationConfig, LlmClient, Message, Role};
use crate::store::{TurnRecord, TurnStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What to do when a turn record cannot be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistencePolicy {
    /// Log the failure and still return the assistant message.
    #[default]
    BestEffort,
    /// Fail the turn with `StorageUnavailable`.
    Strict,
}

#[derive(Debug, Clone)]
pub struct TurnSettings {
    pub model: String,
    pub generation: GenerationConfig,
    pub persistence: PersistencePolicy,
    pub custom_instructions: Option<String>,
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self {
            model: defaults::MODEL.to_string(),
            generation: GenerationConfig::default(),
            persistence: PersistencePolicy::default(),
            custom_instructions: None,
        }
    }
}

/// Runs one conversational turn: prompt, inference, persistence.
///
/// Holds no per-request state, so one handler can be shared behind an `Arc`
/// by any number of concurrent callers.
pub struct TurnHandler {
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn TurnStore>,
    catalog: Arc<UseCaseCatalog>,
    settings: TurnSettings,
}

impl TurnHandler {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn TurnStore>,
        catalog: Arc<UseCaseCatalog>,
    ) -> Self {
        Self {
            llm,
            store,
            catalog,
            settings: TurnSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: TurnSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_persistence(mut self, policy: PersistencePolicy) -> Self {
        self.settings.persistence = policy;
        self
    }

    pub fn catalog(&self) -> &Arc<UseCaseCatalog> {
        &self.catalog
    }

    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    pub async fn handle_turn(
        &self,
        conversation: &Conversation,
        use_case: &str,
        identity: &str,
    ) -> Result<Message> {
        let preset = self.catalog.resolve(use_case)?;
        let question = conversation.question()?;

        let mut prompt = SystemPromptBuilder::new(preset);
        if let Some(ref instructions) = self.settings.custom_instructions {
            prompt = prompt.with_custom_instructions(instructions.clone());
        }

        let request = ChatRequest {
            model: self.settings.model.clone(),
            system: prompt.build(),
            messages: conversation.messages().to_vec(),
            config: self.settings.generation,
        };

        let response = self.llm.chat(&request).await.map_err(|e| match e {
            e @ TestmateError::InferenceService(_) => e,
            other => TestmateError::InferenceService(other.to_string()),
        })?;

        if let Some(usage) = response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "inference usage"
            );
        }

        let message = match response.message {
            Some(m) if m.role == Role::Assistant && !m.is_blank() => m,
            _ => return Err(TestmateError::EmptyInferenceResult),
        };

        let record = TurnRecord::new(identity, use_case, question, message.clone());
        match self.store.put(&record).await {
            Ok(()) => {
                tracing::info!(id = %record.id, owner = %record.owner, "turn saved");
            }
            Err(e) => match self.settings.persistence {
                PersistencePolicy::BestEffort => {
                    tracing::warn!(
                        id = %record.id,
                        error = %e,
                        "failed to save turn, returning reply anyway"
                    );
                }
                PersistencePolicy::Strict => {
                    tracing::error!(id = %record.id, error = %e, "failed to save turn");
                    return Err(match e {
                        e @ TestmateError::StorageUnavailable(_) => e,
                        other => TestmateError::StorageUnavailable(other.to_string()),
                    });
                }
            },
        }

        Ok(message)
    }
}
