//! Worker loop: one long-lived thread per worker, each owning one transport
//! and one response buffer for its entire lifetime.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::completion::{Completion, CompletionCallback};
use crate::job::Job;
use crate::protocol::{download, ops, upload};
use crate::queue::JobQueue;
use crate::transport::{ResponseBuffer, Transport};

const RESPONSE_BUF_INITIAL: usize = 1024;

/// Blocks on the queue, dispatches by job kind, and invokes the completion
/// callback exactly once per job. A failing job produces an error callback;
/// it never terminates the worker. Exits on the shutdown sentinel.
pub(crate) fn run_worker(
    queue: Arc<JobQueue<Job>>,
    mut transport: Box<dyn Transport>,
    callback: CompletionCallback,
    outstanding: Arc<AtomicUsize>,
    chunk_size: u64,
) {
    let mut buf = ResponseBuffer::with_capacity(RESPONSE_BUF_INITIAL);
    loop {
        let job = queue.take();
        let (token, result) = match job {
            Job::Shutdown => break,
            Job::Upload(job) => (
                job.token,
                upload::run(&job, chunk_size, transport.as_mut(), &mut buf),
            ),
            Job::Delete(job) => (job.token, ops::run_delete(&job, transport.as_mut(), &mut buf)),
            Job::Info(job) => (job.token, ops::run_info(&job, transport.as_mut(), &mut buf)),
            Job::Download(job) => (
                job.token,
                download::run(&job, chunk_size, transport.as_mut(), &mut buf),
            ),
        };
        if let Err(e) = &result {
            tracing::warn!(token, error = %e, "job failed");
        }
        // Decremented before the callback; shutdown's join still waits for
        // the callback to return because the worker only exits via take().
        outstanding.fetch_sub(1, Ordering::AcqRel);
        callback(Completion { token, result });
    }
    tracing::debug!("worker exiting");
}
