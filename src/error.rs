//! Error taxonomy.
//!
//! Pre-flight validation errors (`ParamInvalid`, `ProtocolInvalid`,
//! `PrefixInvalid`, `FilenameInvalid`) are returned synchronously by the
//! submission API and never reach the completion callback. Everything else is
//! delivered exclusively through the callback. There is no automatic retry
//! anywhere; transient-failure tolerance is the caller's job.

use thiserror::Error;

/// All errors the client reports, synchronously or via the callback.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Engine configuration rejected (zero workers or zero chunk threshold).
    #[error("invalid engine parameters")]
    ParamInvalid,

    /// Descriptor scheme is not the supported `"http"`.
    #[error("unsupported protocol scheme")]
    ProtocolInvalid,

    /// Descriptor path prefix is not the supported `"xfs"`.
    #[error("unsupported path prefix")]
    PrefixInvalid,

    /// Delete/info/download require a non-empty filename.
    #[error("missing filename")]
    FilenameInvalid,

    /// Upload exchange failed (transport error, non-2xx status, bad response).
    #[error("upload failed: {0}")]
    UploadFailed(String),

    /// The server's etag did not match the digest of the bytes we sent.
    #[error("upload verification failed: computed {computed}, server reported {reported}")]
    UploadVerificationFailed { computed: String, reported: String },

    /// Could not stat the local file to upload.
    #[error("local file stat failed")]
    LocalFileStat(#[source] std::io::Error),

    /// Could not open the local file to upload.
    #[error("local file open failed")]
    LocalFileOpen(#[source] std::io::Error),

    #[error("delete failed: {0}")]
    DeleteFailed(String),

    #[error("file info failed: {0}")]
    InfoFailed(String),

    /// Download failed; any partial bytes collected are discarded.
    #[error("download failed: {0}")]
    DownloadFailed(String),

    /// The server answered 404 for the target.
    #[error("file not found")]
    FileNotFound,
}

/// Failure of a single HTTP exchange, below the protocol layer. Protocol
/// routines fold these into the failing operation's `ClientError`.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Curl(#[from] curl::Error),

    #[error("{0}")]
    Other(String),
}
