//! Queued job variants.
//!
//! A job is created by the submission API with pre-validated URIs, owned by
//! the queue until a worker claims it, owned by that worker until the
//! completion callback returns, then dropped.

use std::path::PathBuf;

pub(crate) enum Job {
    Upload(UploadJob),
    Delete(DeleteJob),
    Info(InfoJob),
    Download(DownloadJob),
    /// Sentinel: the worker that takes it exits its loop.
    Shutdown,
}

pub(crate) struct UploadJob {
    pub token: u64,
    /// Content target (`file` route); chunk URIs are derived from this.
    pub uri: String,
    /// Manifest target (`fileinfo` route).
    pub uri_info: String,
    /// Stored filename, reported back as the upload location.
    pub name: String,
    pub source: UploadSource,
}

pub(crate) enum UploadSource {
    Path(PathBuf),
    Buffer(Vec<u8>),
}

pub(crate) struct DeleteJob {
    pub token: u64,
    pub uri: String,
}

pub(crate) struct InfoJob {
    pub token: u64,
    pub uri: String,
}

pub(crate) struct DownloadJob {
    pub token: u64,
    pub uri: String,
    pub offset: u64,
    /// Requested byte count; 0 means through end of file.
    pub length: u64,
}
