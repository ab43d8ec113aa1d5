//! Engine: submission API, worker pool lifecycle, and drain-then-join
//! teardown.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::completion::CompletionCallback;
use crate::config::ClientConfig;
use crate::descriptor::{build_uri, FileDescriptor, RequestKind};
use crate::error::ClientError;
use crate::job::{DeleteJob, DownloadJob, InfoJob, Job, UploadJob, UploadSource};
use crate::queue::JobQueue;
use crate::transport::{CurlTransport, Transport};
use crate::worker;

type TransportFactory = Box<dyn Fn() -> Box<dyn Transport>>;

/// Asynchronous client engine for the xfs file-storage service.
///
/// Submission calls validate synchronously, enqueue, and return immediately
/// with the pending count; N worker threads execute the HTTP exchanges and
/// deliver each job's result through the completion callback exactly once.
/// Completion order across jobs is unordered; within one multi-chunk upload,
/// chunks are strictly sequential and the manifest strictly last.
///
/// Jobs cannot be cancelled once accepted. The queue is unbounded; callers
/// that need backpressure throttle on [`Engine::pending_count`].
pub struct Engine {
    queue: Arc<JobQueue<Job>>,
    workers: Vec<JoinHandle<()>>,
    outstanding: Arc<AtomicUsize>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("workers", &self.workers.len())
            .field("outstanding", &self.outstanding.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Validates `config` and starts `worker_count` worker threads, each
    /// owning one reusable HTTP handle and one response buffer.
    pub fn new(config: ClientConfig, on_complete: CompletionCallback) -> Result<Engine, ClientError> {
        let verbose = config.verbose_http;
        Self::with_factory(
            config,
            on_complete,
            Box::new(move || Box::new(CurlTransport::new(verbose))),
        )
    }

    pub(crate) fn with_factory(
        config: ClientConfig,
        on_complete: CompletionCallback,
        factory: TransportFactory,
    ) -> Result<Engine, ClientError> {
        config.validate()?;
        let queue = Arc::new(JobQueue::new());
        let outstanding = Arc::new(AtomicUsize::new(0));
        let mut workers = Vec::with_capacity(config.worker_count);
        for i in 0..config.worker_count {
            let queue = Arc::clone(&queue);
            let callback = Arc::clone(&on_complete);
            let outstanding = Arc::clone(&outstanding);
            let transport = factory();
            let chunk_size = config.chunk_threshold_bytes;
            let handle = thread::Builder::new()
                .name(format!("xfs-worker-{}", i))
                .spawn(move || {
                    worker::run_worker(queue, transport, callback, outstanding, chunk_size)
                })
                .expect("spawn worker thread");
            workers.push(handle);
        }
        tracing::info!(
            workers = config.worker_count,
            chunk_threshold = config.chunk_threshold_bytes,
            "engine started"
        );
        Ok(Engine {
            queue,
            workers,
            outstanding,
        })
    }

    fn submit(&self, job: Job) -> usize {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        self.queue.submit(job)
    }

    /// Jobs queued but not yet claimed by a worker.
    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    /// True while any job is queued or in flight.
    pub fn is_busy(&self) -> bool {
        self.outstanding.load(Ordering::Acquire) > 0
    }

    /// Enqueues an upload of the local file at `path`. Files larger than the
    /// chunk threshold are split into fixed-size chunks uploaded in order,
    /// followed by a manifest.
    ///
    /// If every chunk succeeds but the manifest upload fails, the chunks stay
    /// on the server with no compensating cleanup; the callback reports the
    /// failure and the remote state must be treated as unknown.
    pub fn upload_file(
        &self,
        token: u64,
        file: &FileDescriptor,
        path: impl Into<PathBuf>,
    ) -> Result<usize, ClientError> {
        let (uri, uri_info) = upload_uris(file)?;
        Ok(self.submit(Job::Upload(UploadJob {
            token,
            uri,
            uri_info,
            name: file.filename.clone(),
            source: UploadSource::Path(path.into()),
        })))
    }

    /// Enqueues an upload of an in-memory buffer, with the same chunking
    /// rules as [`Engine::upload_file`].
    pub fn upload_buffer(
        &self,
        token: u64,
        file: &FileDescriptor,
        data: Vec<u8>,
    ) -> Result<usize, ClientError> {
        let (uri, uri_info) = upload_uris(file)?;
        Ok(self.submit(Job::Upload(UploadJob {
            token,
            uri,
            uri_info,
            name: file.filename.clone(),
            source: UploadSource::Buffer(data),
        })))
    }

    /// Enqueues a delete of a file or directory.
    pub fn delete(&self, token: u64, file: &FileDescriptor) -> Result<usize, ClientError> {
        let uri = build_uri(file, RequestKind::Delete)?;
        Ok(self.submit(Job::Delete(DeleteJob { token, uri })))
    }

    /// Enqueues a fileinfo query (file size, or directory listing).
    pub fn info(&self, token: u64, file: &FileDescriptor) -> Result<usize, ClientError> {
        let uri = build_uri(file, RequestKind::Info)?;
        Ok(self.submit(Job::Info(InfoJob { token, uri })))
    }

    /// Enqueues a ranged download. `length == 0` requests through end of
    /// file.
    pub fn download(
        &self,
        token: u64,
        file: &FileDescriptor,
        offset: u64,
        length: u64,
    ) -> Result<usize, ClientError> {
        let uri = build_uri(file, RequestKind::Download)?;
        Ok(self.submit(Job::Download(DownloadJob {
            token,
            uri,
            offset,
            length,
        })))
    }

    /// Graceful teardown. Refuses while any job is queued or in flight,
    /// handing the engine back untouched (workers keep running); otherwise
    /// delivers one shutdown sentinel per worker and joins them all.
    pub fn shutdown(self) -> Result<(), Engine> {
        if self.is_busy() {
            tracing::warn!(
                outstanding = self.outstanding.load(Ordering::Acquire),
                "shutdown refused: jobs outstanding"
            );
            return Err(self);
        }
        drop(self);
        Ok(())
    }

    fn drain_and_join(&mut self) {
        for _ in 0..self.workers.len() {
            self.queue.submit(Job::Shutdown);
        }
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("worker panicked");
            }
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        let outstanding = self.outstanding.load(Ordering::Acquire);
        if outstanding > 0 {
            tracing::warn!(outstanding, "engine dropped with jobs outstanding; draining before join");
        }
        // Sentinels queue behind any remaining jobs, so every accepted job
        // still runs and gets its callback before the workers exit.
        self.drain_and_join();
        tracing::info!("engine stopped");
    }
}

fn upload_uris(file: &FileDescriptor) -> Result<(String, String), ClientError> {
    let uri = build_uri(file, RequestKind::UploadFile)?;
    let uri_info = build_uri(file, RequestKind::UploadInfo)?;
    Ok((uri, uri_info))
}
