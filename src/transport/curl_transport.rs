//! curl-backed transport: one reusable Easy handle per worker.

use std::time::Duration;

use curl::easy::{Easy, List};

use super::{ExchangeStatus, HttpRequest, Method, ResponseBuffer, Transport};
use crate::error::TransportError;

pub struct CurlTransport {
    easy: Easy,
    verbose: bool,
}

impl CurlTransport {
    pub fn new(verbose: bool) -> Self {
        Self {
            easy: Easy::new(),
            verbose,
        }
    }
}

impl Transport for CurlTransport {
    fn execute(
        &mut self,
        req: &HttpRequest<'_>,
        out: &mut ResponseBuffer,
    ) -> Result<ExchangeStatus, TransportError> {
        out.reset();
        self.easy.reset();
        self.easy.verbose(self.verbose)?;
        self.easy.url(req.url)?;
        self.easy.connect_timeout(Duration::from_secs(30))?;
        // Abort if throughput drops below 1 KiB/s for 60s rather than using a
        // short wall-clock timeout that would kill large chunk transfers.
        self.easy.low_speed_limit(1024)?;
        self.easy.low_speed_time(Duration::from_secs(60))?;
        self.easy.timeout(Duration::from_secs(3600))?;

        match req.method {
            Method::Get => {
                self.easy.get(true)?;
            }
            Method::Post => {
                let mut headers = List::new();
                headers.append("Content-Type: application/octet-stream")?;
                headers.append("Expect:")?;
                self.easy.http_headers(headers)?;
                self.easy.post(true)?;
                self.easy.post_fields_copy(req.body.unwrap_or(&[]))?;
            }
            Method::Delete => {
                self.easy.custom_request("DELETE")?;
            }
        }
        if let Some((start, end)) = req.range {
            self.easy.range(&format!("{}-{}", start, end))?;
        }

        let mut etag: Option<String> = None;
        {
            let mut transfer = self.easy.transfer();
            transfer.header_function(|line| {
                if let Some(value) = parse_etag(line) {
                    etag = Some(value);
                }
                true
            })?;
            transfer.write_function(|data| {
                out.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = self.easy.response_code()?;
        tracing::debug!(url = req.url, code, "exchange done");
        Ok(ExchangeStatus { code, etag })
    }
}

/// Parses an `ETag:` header line; trims whitespace and surrounding quotes.
fn parse_etag(line: &[u8]) -> Option<String> {
    let line = std::str::from_utf8(line).ok()?;
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("etag") {
        return None;
    }
    let value = value.trim().trim_matches('"');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
