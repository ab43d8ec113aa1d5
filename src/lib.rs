//! Asynchronous client for the xfs distributed HTTP file-storage service.
//!
//! Callers submit upload, download, delete, and fileinfo jobs against
//! `http://host:port` targets under the `xfs` path prefix. Submission
//! validates and enqueues; a fixed pool of worker threads runs the HTTP
//! exchanges and reports each job's result through a completion callback
//! exactly once. Large uploads are split into fixed-size chunks with a JSON
//! manifest written last; downloads issue chunk-aligned range requests and
//! treat a short response as end of file.

pub mod checksum;
pub mod completion;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod transport;

mod job;
mod protocol;
mod queue;
mod worker;

pub use completion::{Completion, CompletionCallback, InfoOutput, Outcome};
pub use config::ClientConfig;
pub use descriptor::FileDescriptor;
pub use engine::Engine;
pub use error::{ClientError, TransportError};
