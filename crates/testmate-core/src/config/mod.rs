use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::assistant::{PersistencePolicy, TurnSettings};
use crate::constants::{defaults, endpoints};
use crate::context::{UseCase, UseCaseCatalog};
use crate::error::TestmateError;
use crate::llm::{ClaudeClient, DeferredClient, GenerationConfig, LlmClient};
use crate::store::{JsonFileTurnStore, MemoryTurnStore, TurnStore};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub inference: InferenceSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub persistence: PersistencePolicy,
    #[serde(default)]
    pub use_cases: Vec<UseCase>,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    pub model: String,
    pub api_key_env: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub custom_instructions: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Defaults to ~/.testmate/turns for the file backend.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            model: defaults::MODEL.to_string(),
            api_key_env: defaults::API_KEY_ENV.to_string(),
            base_url: None,
            max_tokens: defaults::MAX_TOKENS,
            temperature: defaults::TEMPERATURE,
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            custom_instructions: None,
        }
    }
}

impl InferenceSettings {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn build_client(&self) -> Result<Arc<dyn LlmClient>, TestmateError> {
        let api_key = self.api_key().ok_or_else(|| {
            TestmateError::Config(format!(
                "API key not found; set the {} environment variable",
                self.api_key_env
            ))
        })?;

        let client = ClaudeClient::new(api_key)
            .with_base_url(
                self.base_url
                    .clone()
                    .unwrap_or_else(|| endpoints::CLAUDE_BASE_URL.to_string()),
            )
            .with_timeout(Duration::from_secs(self.timeout_secs))?;

        Ok(Arc::new(client))
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: defaults::SERVER_BIND.to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("testmate")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match Self::load_from(&config_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", config_path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from an explicit path. A missing file yields defaults; a file
    /// that fails to parse is an error.
    pub fn load_from(path: &Path) -> Result<Self, TestmateError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| TestmateError::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), TestmateError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TestmateError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn save(&self) -> Result<(), TestmateError> {
        self.save_to(&Self::config_path())
    }

    /// Get the API key from the environment variable specified in settings.
    pub fn api_key(&self) -> Option<String> {
        self.inference.api_key()
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            max_tokens: self.inference.max_tokens,
            temperature: self.inference.temperature,
        }
    }

    pub fn turn_settings(&self) -> TurnSettings {
        TurnSettings {
            model: self.inference.model.clone(),
            generation: self.generation_config(),
            persistence: self.persistence,
            custom_instructions: self.inference.custom_instructions.clone(),
        }
    }

    pub fn build_catalog(&self) -> UseCaseCatalog {
        UseCaseCatalog::builtin().with_entries(self.use_cases.iter().cloned())
    }

    /// Build the inference client from the current settings.
    pub fn build_llm_client(&self) -> Result<Arc<dyn LlmClient>, TestmateError> {
        self.inference.build_client()
    }

    /// Like `build_llm_client`, but a missing API key only fails the first
    /// turn instead of construction. History stays readable without one.
    pub fn build_deferred_llm_client(&self) -> Arc<dyn LlmClient> {
        let inference = self.inference.clone();
        Arc::new(DeferredClient::new(move || inference.build_client()))
    }

    pub fn build_turn_store(&self) -> Result<Arc<dyn TurnStore>, TestmateError> {
        match self.storage.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryTurnStore::new())),
            StorageBackend::File => {
                let store = match self.storage.dir {
                    Some(ref dir) => JsonFileTurnStore::with_dir(dir)?,
                    None => JsonFileTurnStore::new()?,
                };
                Ok(Arc::new(store))
            }
        }
    }
}
