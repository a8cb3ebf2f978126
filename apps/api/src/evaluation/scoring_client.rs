//! Scoring Client — dispatches provider calls onto a bounded worker pool.
//!
//! `ScoringClient::dispatch` spawns the call as its own tokio task and hands
//! back a `ScoringTask` handle. A slow provider therefore only holds up the
//! document that is waiting on it. Concurrency is bounded by a semaphore and
//! each call is capped by the configured timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::evaluation::request_builder::ScoringRequest;
use crate::llm_client::{LlmClient, ProviderError};

/// The provider seam. Implement this to swap backends without touching the
/// orchestrator or the handlers.
#[async_trait]
pub trait ScoringProvider: Send + Sync {
    /// Sends one scoring request and returns the provider's raw text.
    async fn score(&self, request: &ScoringRequest) -> Result<String, ProviderError>;

    fn is_configured(&self) -> bool {
        true
    }
}

#[async_trait]
impl ScoringProvider for LlmClient {
    async fn score(&self, request: &ScoringRequest) -> Result<String, ProviderError> {
        self.complete(&request.system, &request.user).await
    }

    fn is_configured(&self) -> bool {
        LlmClient::is_configured(self)
    }
}

#[derive(Clone)]
pub struct ScoringClient {
    provider: Arc<dyn ScoringProvider>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

/// Handle to an in-flight scoring call.
pub struct ScoringTask {
    handle: JoinHandle<Result<String, ProviderError>>,
}

impl ScoringTask {
    pub async fn wait(self) -> Result<String, ProviderError> {
        self.handle
            .await
            .map_err(|e| ProviderError::Dispatch(e.to_string()))?
    }
}

impl ScoringClient {
    pub fn new(provider: Arc<dyn ScoringProvider>, max_concurrency: usize, timeout: Duration) -> Self {
        Self {
            provider,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Starts the provider call on its own task and returns immediately.
    /// The timeout covers only the call itself, not time spent queued for a permit.
    pub fn dispatch(&self, request: ScoringRequest) -> ScoringTask {
        let provider = Arc::clone(&self.provider);
        let permits = Arc::clone(&self.permits);
        let timeout = self.timeout;

        let handle = tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| ProviderError::Dispatch(e.to_string()))?;

            match tokio::time::timeout(timeout, provider.score(&request)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Provider call exceeded {}s", timeout.as_secs());
                    Err(ProviderError::Timeout)
                }
            }
        });

        ScoringTask { handle }
    }
}
