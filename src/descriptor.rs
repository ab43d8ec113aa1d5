//! Server/file descriptor and pre-flight URI construction.
//!
//! All validation happens synchronously before a job is queued; no network
//! access occurs here.

use crate::error::ClientError;

/// The only scheme the store speaks.
pub const SUPPORTED_SCHEME: &str = "http";
/// The only path prefix the store accepts.
pub const SUPPORTED_PREFIX: &str = "xfs";

/// Identifies a file (or directory) on the storage service. Immutable once a
/// job is created from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Must be `"http"`.
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Must be `"xfs"`.
    pub prefix: String,
    /// Business bucket, e.g. `"live"`.
    pub bucket: String,
    /// File name, optionally with directory components; a trailing `/` names
    /// a directory. May be empty for uploads targeting a directory-relative
    /// name, but is required for delete/info/download.
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestKind {
    UploadFile,
    UploadInfo,
    Delete,
    Info,
    Download,
}

impl RequestKind {
    fn route(self) -> &'static str {
        match self {
            RequestKind::UploadInfo | RequestKind::Info => "fileinfo",
            RequestKind::UploadFile | RequestKind::Delete | RequestKind::Download => "file",
        }
    }

    fn requires_filename(self) -> bool {
        matches!(
            self,
            RequestKind::Delete | RequestKind::Info | RequestKind::Download
        )
    }
}

/// Validates `file` for `kind` and builds the request URI:
/// `{scheme}://{host}:{port}/{route}?path=/{prefix}/{bucket}/{filename}`.
///
/// Check order: scheme, then prefix, then filename presence.
pub(crate) fn build_uri(file: &FileDescriptor, kind: RequestKind) -> Result<String, ClientError> {
    if file.scheme != SUPPORTED_SCHEME {
        return Err(ClientError::ProtocolInvalid);
    }
    if file.prefix != SUPPORTED_PREFIX {
        return Err(ClientError::PrefixInvalid);
    }
    if kind.requires_filename() && file.filename.is_empty() {
        return Err(ClientError::FilenameInvalid);
    }

    Ok(format!(
        "{}://{}:{}/{}?path=/{}/{}/{}",
        file.scheme, file.host, file.port, kind.route(), file.prefix, file.bucket, file.filename
    ))
}
