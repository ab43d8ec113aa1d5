//! Content-integrity tags.
//!
//! The store reports each stored object's SHA-1 as the response etag; the
//! client recomputes the digest over the exact bytes it sent and compares.

use sha1::{Digest, Sha1};

/// SHA-1 of `data` as lowercase hex.
pub fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
