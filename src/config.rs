//! Engine configuration, supplied once at startup and immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Configuration for [`crate::Engine::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Number of worker threads. Cross-job concurrency comes entirely from
    /// having N workers; each worker runs one job at a time.
    pub worker_count: usize,
    /// Files larger than this are split into chunks of exactly this size
    /// (the last chunk may be shorter). Also the alignment unit for ranged
    /// downloads.
    pub chunk_threshold_bytes: u64,
    /// Enable verbose curl output for every exchange.
    #[serde(default)]
    pub verbose_http: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            chunk_threshold_bytes: 16 * 1024 * 1024,
            verbose_http: false,
        }
    }
}

impl ClientConfig {
    pub(crate) fn validate(&self) -> Result<(), ClientError> {
        if self.worker_count == 0 || self.chunk_threshold_bytes == 0 {
            return Err(ClientError::ParamInvalid);
        }
        Ok(())
    }
}
