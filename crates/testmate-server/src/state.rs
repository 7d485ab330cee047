use std::sync::Arc;
use testmate_core::{HistoryReader, Settings, TurnHandler};

/// Shared per-process collaborators. Handlers hold no per-request state, so
/// one instance serves every request.
pub struct AppState {
    pub handler: TurnHandler,
    pub reader: HistoryReader,
}

impl AppState {
    pub fn new(handler: TurnHandler, reader: HistoryReader) -> Self {
        Self { handler, reader }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let catalog = Arc::new(settings.build_catalog());
        let store = settings.build_turn_store()?;
        let llm = settings.build_deferred_llm_client();
        let handler = TurnHandler::new(llm, store.clone(), catalog)
            .with_settings(settings.turn_settings());
        Ok(Self::new(handler, HistoryReader::new(store)))
    }
}
