//! One-request/one-response HTTP exchanges.
//!
//! Each worker owns one transport (a reusable curl handle) and one response
//! buffer for its whole lifetime; neither is shared across threads.

mod buffer;
mod curl_transport;
#[cfg(test)]
pub(crate) mod mock;

pub use buffer::ResponseBuffer;
pub use curl_transport::CurlTransport;

use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// One HTTP exchange: method, URL, optional body, optional inclusive byte
/// range.
pub struct HttpRequest<'a> {
    pub method: Method,
    pub url: &'a str,
    pub body: Option<&'a [u8]>,
    pub range: Option<(u64, u64)>,
}

/// Status line plus the one response header the protocols care about.
#[derive(Debug, Clone)]
pub struct ExchangeStatus {
    pub code: u32,
    /// Etag header value, quotes stripped.
    pub etag: Option<String>,
}

impl ExchangeStatus {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// A blocking HTTP exchange capability, exclusively owned by one worker.
pub trait Transport: Send {
    /// Performs one exchange. `out` is reset first and receives the response
    /// body.
    fn execute(
        &mut self,
        req: &HttpRequest<'_>,
        out: &mut ResponseBuffer,
    ) -> Result<ExchangeStatus, TransportError>;
}
