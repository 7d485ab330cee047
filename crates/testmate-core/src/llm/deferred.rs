use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::traits::{ChatRequest, LlmClient, LlmResponse};
use crate::error::TestmateError;

type BuildFn = dyn Fn() -> Result<Arc<dyn LlmClient>, TestmateError> + Send + Sync;

/// Builds the real client on the first `chat` call.
///
/// Lets a process that only reads history start without inference
/// credentials. A failed build is not cached; the next turn tries again.
pub struct DeferredClient {
    build: Box<BuildFn>,
    client: OnceCell<Arc<dyn LlmClient>>,
}

impl DeferredClient {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn LlmClient>, TestmateError> + Send + Sync + 'static,
    {
        Self {
            build: Box::new(build),
            client: OnceCell::new(),
        }
    }

    pub fn is_built(&self) -> bool {
        self.client.initialized()
    }
}

#[async_trait]
impl LlmClient for DeferredClient {
    async fn chat(&self, request: &ChatRequest) -> Result<LlmResponse, TestmateError> {
        let client = self
            .client
            .get_or_try_init(|| async { (self.build)() })
            .await?;
        client.chat(request).await
    }
}
