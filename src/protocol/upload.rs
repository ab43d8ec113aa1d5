//! Chunked upload: whole-file below the threshold, otherwise strictly
//! sequential chunk uploads followed by one manifest upload.

use std::fs::{self, File};
use std::io::Read;

use crate::checksum::sha1_hex;
use crate::completion::Outcome;
use crate::error::ClientError;
use crate::job::{UploadJob, UploadSource};
use crate::manifest::{chunk_count, chunk_len, chunk_name, ChunkManifest};
use crate::transport::{HttpRequest, Method, ResponseBuffer, Transport};

pub(crate) fn run(
    job: &UploadJob,
    chunk_size: u64,
    transport: &mut dyn Transport,
    buf: &mut ResponseBuffer,
) -> Result<Outcome, ClientError> {
    match &job.source {
        UploadSource::Path(path) => {
            let meta = fs::metadata(path).map_err(ClientError::LocalFileStat)?;
            let total = meta.len();
            let mut file = File::open(path).map_err(ClientError::LocalFileOpen)?;
            if total <= chunk_size {
                let mut data = Vec::with_capacity(total as usize);
                file.read_to_end(&mut data).map_err(|e| {
                    ClientError::UploadFailed(format!("read {}: {}", path.display(), e))
                })?;
                upload_object(transport, buf, &job.uri, &data)?;
                tracing::debug!(name = %job.name, bytes = data.len(), "whole-file upload done");
                Ok(Outcome::Uploaded {
                    location: job.name.clone(),
                })
            } else {
                run_chunked(job, &mut file, total, chunk_size, transport, buf)
            }
        }
        UploadSource::Buffer(data) => {
            if data.len() as u64 <= chunk_size {
                upload_object(transport, buf, &job.uri, data)?;
                Ok(Outcome::Uploaded {
                    location: job.name.clone(),
                })
            } else {
                let mut reader = data.as_slice();
                run_chunked(job, &mut reader, data.len() as u64, chunk_size, transport, buf)
            }
        }
    }
}

/// Uploads `reader` as ⌈total/chunk_size⌉ chunks in index order, each
/// verified, then the manifest. The first chunk failure aborts the remainder.
/// A manifest failure after all chunks succeeded is the job's terminal
/// failure; the chunks stay on the server and the remote state is unknown to
/// the caller.
fn run_chunked(
    job: &UploadJob,
    reader: &mut dyn Read,
    total: u64,
    chunk_size: u64,
    transport: &mut dyn Transport,
    buf: &mut ResponseBuffer,
) -> Result<Outcome, ClientError> {
    let count = chunk_count(total, chunk_size);
    let mut chunk_buf = vec![0u8; chunk_size as usize];
    for index in 0..count {
        let want = chunk_len(total, chunk_size, index) as usize;
        reader
            .read_exact(&mut chunk_buf[..want])
            .map_err(|e| ClientError::UploadFailed(format!("read chunk {}: {}", index, e)))?;
        let chunk_uri = chunk_name(&job.uri, index);
        upload_object(transport, buf, &chunk_uri, &chunk_buf[..want])?;
        tracing::debug!(chunk = index, bytes = want, "chunk uploaded");
    }

    let manifest = ChunkManifest::build(&job.name, total, chunk_size);
    let body = serde_json::to_vec(&manifest)
        .map_err(|e| ClientError::UploadFailed(format!("encode manifest: {}", e)))?;
    upload_object(transport, buf, &job.uri_info, &body)?;
    tracing::debug!(name = %job.name, chunks = count, total, "chunked upload done");
    Ok(Outcome::Uploaded {
        location: job.name.clone(),
    })
}

/// One verified object upload: POST the bytes, then require the server's
/// etag to equal the SHA-1 of exactly what was sent.
fn upload_object(
    transport: &mut dyn Transport,
    buf: &mut ResponseBuffer,
    uri: &str,
    data: &[u8],
) -> Result<(), ClientError> {
    let status = transport
        .execute(
            &HttpRequest {
                method: Method::Post,
                url: uri,
                body: Some(data),
                range: None,
            },
            buf,
        )
        .map_err(|e| ClientError::UploadFailed(e.to_string()))?;
    if !status.is_success() {
        return Err(ClientError::UploadFailed(format!("HTTP {}", status.code)));
    }
    let reported = status
        .etag
        .ok_or_else(|| ClientError::UploadFailed("response missing etag".to_string()))?;
    let computed = sha1_hex(data);
    if !reported.eq_ignore_ascii_case(&computed) {
        return Err(ClientError::UploadVerificationFailed { computed, reported });
    }
    Ok(())
}
