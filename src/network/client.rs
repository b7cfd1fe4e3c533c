//! Network client with built-in retry and error handling

use super::backoff::Backoff;
use super::error_handler::ErrorHandler;
use crate::api::error::ApiError;
use crate::api::{ComplianceApi, MachineQuery};
use crate::consts::cli_consts::http;
use crate::fleet::MachineRecord;
use crate::logging::LogLevel;
use std::future::Future;

/// Network client that retries transient failures with exponential backoff
#[derive(Debug, Clone)]
pub struct NetworkClient {
    error_handler: ErrorHandler,
    backoff: Backoff,
    max_retries: u32,
}

impl Default for NetworkClient {
    fn default() -> Self {
        Self::new(http::MAX_RETRIES)
    }
}

impl NetworkClient {
    pub fn new(max_retries: u32) -> Self {
        Self {
            error_handler: ErrorHandler::new(),
            backoff: Backoff::default(),
            max_retries: max_retries.max(1),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Fetch the machine list, retrying network and server errors
    pub async fn fetch_machines(
        &self,
        api: &dyn ComplianceApi,
        query: &MachineQuery,
    ) -> Result<Vec<MachineRecord>, ApiError> {
        self.with_retry("machine list", || api.list_machines(query))
            .await
    }

    /// Fetch one machine report, retrying network and server errors
    pub async fn fetch_machine(
        &self,
        api: &dyn ComplianceApi,
        machine_id: &str,
    ) -> Result<MachineRecord, ApiError> {
        self.with_retry("machine details", || api.get_machine(machine_id))
            .await
    }

    async fn with_retry<T, F, Fut>(&self, what: &str, mut request: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempts = 0;

        loop {
            match request().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempts += 1;

                    // Check if we should retry
                    if attempts >= self.max_retries || !self.error_handler.should_retry(&e) {
                        return Err(e);
                    }

                    let delay = self.backoff.delay(attempts);
                    log::debug!(
                        "Fetching {} failed (attempt {}/{}): {}; retrying in {:?}",
                        what,
                        attempts,
                        self.max_retries,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Get error classification for logging
    pub fn classify_error(&self, error: &ApiError) -> LogLevel {
        self.error_handler.classify_error(error)
    }
}
