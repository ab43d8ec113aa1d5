//! Completion callback contract.
//!
//! Invoked exactly once per accepted job, from whichever worker thread ran
//! the job; the handler must tolerate concurrent invocations for different
//! jobs.

use std::sync::Arc;

use crate::error::ClientError;

/// Successful job result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Upload finished and verified; `location` is the stored filename.
    Uploaded { location: String },
    Deleted,
    Info(InfoOutput),
    /// Bytes for the requested range, possibly truncated at end of file.
    Downloaded(Vec<u8>),
}

/// Parsed `fileinfo` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoOutput {
    File {
        location: String,
        size: u64,
    },
    Directory {
        location: String,
        files: Vec<String>,
        subdirs: Vec<String>,
    },
}

/// Delivered to the completion callback. `token` is the caller's correlation
/// token, returned unchanged.
#[derive(Debug)]
pub struct Completion {
    pub token: u64,
    pub result: Result<Outcome, ClientError>,
}

/// Completion handler; called from any of the N worker threads.
pub type CompletionCallback = Arc<dyn Fn(Completion) + Send + Sync>;
