//! Single-exchange operations: delete and fileinfo.

use serde::Deserialize;

use crate::completion::{InfoOutput, Outcome};
use crate::error::ClientError;
use crate::job::{DeleteJob, InfoJob};
use crate::transport::{HttpRequest, Method, ResponseBuffer, Transport};

pub(crate) fn run_delete(
    job: &DeleteJob,
    transport: &mut dyn Transport,
    buf: &mut ResponseBuffer,
) -> Result<Outcome, ClientError> {
    let status = transport
        .execute(
            &HttpRequest {
                method: Method::Delete,
                url: &job.uri,
                body: None,
                range: None,
            },
            buf,
        )
        .map_err(|e| ClientError::DeleteFailed(e.to_string()))?;
    if status.code == 404 {
        return Err(ClientError::FileNotFound);
    }
    if !status.is_success() {
        return Err(ClientError::DeleteFailed(format!("HTTP {}", status.code)));
    }
    Ok(Outcome::Deleted)
}

/// Server-side `fileinfo` record: either a file (name + size) or a directory
/// (name + files + subdirectories).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawInfo {
    File {
        #[serde(rename = "Filename")]
        filename: String,
        #[serde(rename = "Filesize")]
        filesize: u64,
    },
    Directory {
        #[serde(rename = "Dir")]
        dir: String,
        #[serde(rename = "Files", default)]
        files: Vec<String>,
        #[serde(rename = "SubDirs", default)]
        subdirs: Vec<String>,
    },
}

pub(crate) fn run_info(
    job: &InfoJob,
    transport: &mut dyn Transport,
    buf: &mut ResponseBuffer,
) -> Result<Outcome, ClientError> {
    let status = transport
        .execute(
            &HttpRequest {
                method: Method::Get,
                url: &job.uri,
                body: None,
                range: None,
            },
            buf,
        )
        .map_err(|e| ClientError::InfoFailed(e.to_string()))?;
    if status.code == 404 {
        return Err(ClientError::FileNotFound);
    }
    if !status.is_success() {
        return Err(ClientError::InfoFailed(format!("HTTP {}", status.code)));
    }

    let raw: RawInfo = serde_json::from_slice(buf.as_slice())
        .map_err(|e| ClientError::InfoFailed(format!("parse response: {}", e)))?;
    let info = match raw {
        RawInfo::File { filename, filesize } => InfoOutput::File {
            location: filename,
            size: filesize,
        },
        RawInfo::Directory { dir, files, subdirs } => InfoOutput::Directory {
            location: dir,
            files,
            subdirs,
        },
    };
    Ok(Outcome::Info(info))
}
