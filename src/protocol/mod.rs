//! Per-job protocol routines, executed on worker threads with the worker's
//! own transport and response buffer.

pub(crate) mod download;
pub(crate) mod ops;
pub(crate) mod upload;
