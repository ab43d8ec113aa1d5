//! Ranged download: sequential chunk-aligned range GETs, accumulated in
//! order, with a short response meaning end of file.

use crate::completion::Outcome;
use crate::error::ClientError;
use crate::job::DownloadJob;
use crate::transport::{HttpRequest, Method, ResponseBuffer, Transport};

pub(crate) fn run(
    job: &DownloadJob,
    chunk_size: u64,
    transport: &mut dyn Transport,
    buf: &mut ResponseBuffer,
) -> Result<Outcome, ClientError> {
    let start = job.offset;
    let end = if job.length > 0 {
        job.offset.saturating_add(job.length)
    } else {
        u64::MAX
    };

    let mut out = Vec::new();
    let mut pos = start;
    while pos < end {
        // Each request stops at the next chunk boundary or the requested end,
        // whichever comes first.
        let boundary = (pos / chunk_size + 1).saturating_mul(chunk_size);
        let next = boundary.min(end);
        let status = transport
            .execute(
                &HttpRequest {
                    method: Method::Get,
                    url: &job.uri,
                    body: None,
                    range: Some((pos, next - 1)),
                },
                buf,
            )
            .map_err(|e| ClientError::DownloadFailed(e.to_string()))?;
        if status.code == 404 {
            return Err(ClientError::FileNotFound);
        }
        if !status.is_success() {
            return Err(ClientError::DownloadFailed(format!("HTTP {}", status.code)));
        }

        out.extend_from_slice(buf.as_slice());
        if (buf.len() as u64) < next - pos {
            // Short response: end of file.
            break;
        }
        pos = next;
    }

    tracing::debug!(offset = job.offset, bytes = out.len(), "download done");
    Ok(Outcome::Downloaded(out))
}
