//! Scripted in-memory transport for protocol and engine tests.

use std::collections::VecDeque;

use super::{ExchangeStatus, HttpRequest, Method, ResponseBuffer, Transport};
use crate::checksum::sha1_hex;
use crate::error::TransportError;

/// One recorded exchange, enough to assert call counts, ordering, ranges,
/// and sent bodies.
pub(crate) struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub range: Option<(u64, u64)>,
    pub body: Option<Vec<u8>>,
}

pub(crate) enum MockEtag {
    /// Behave like the store: etag = SHA-1 of the received body.
    Sha1OfBody,
    Fixed(String),
    None,
}

pub(crate) struct MockResponse {
    pub code: u32,
    pub body: Vec<u8>,
    pub etag: MockEtag,
}

impl MockResponse {
    pub fn ok_upload() -> Self {
        Self {
            code: 200,
            body: Vec::new(),
            etag: MockEtag::Sha1OfBody,
        }
    }

    pub fn ok_body(body: Vec<u8>) -> Self {
        Self {
            code: 200,
            body,
            etag: MockEtag::None,
        }
    }

    pub fn status(code: u32) -> Self {
        Self {
            code,
            body: Vec::new(),
            etag: MockEtag::None,
        }
    }
}

#[derive(Default)]
pub(crate) struct MockTransport {
    pub calls: Vec<RecordedCall>,
    script: VecDeque<MockResponse>,
    always_ok: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that answers every exchange with 200 and a matching etag
    /// once the script is exhausted.
    pub fn always_ok() -> Self {
        Self {
            always_ok: true,
            ..Self::default()
        }
    }

    pub fn push(&mut self, response: MockResponse) {
        self.script.push_back(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }
}

impl Transport for MockTransport {
    fn execute(
        &mut self,
        req: &HttpRequest<'_>,
        out: &mut ResponseBuffer,
    ) -> Result<ExchangeStatus, TransportError> {
        out.reset();
        self.calls.push(RecordedCall {
            method: req.method,
            url: req.url.to_string(),
            range: req.range,
            body: req.body.map(<[u8]>::to_vec),
        });

        let response = match self.script.pop_front() {
            Some(r) => r,
            None if self.always_ok => MockResponse::ok_upload(),
            None => return Err(TransportError::Other("mock script exhausted".to_string())),
        };

        let etag = match response.etag {
            MockEtag::Sha1OfBody => Some(sha1_hex(req.body.unwrap_or(&[]))),
            MockEtag::Fixed(tag) => Some(tag),
            MockEtag::None => None,
        };
        out.extend_from_slice(&response.body);
        Ok(ExchangeStatus {
            code: response.code,
            etag,
        })
    }
}
