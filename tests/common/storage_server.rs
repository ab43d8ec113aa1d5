//! Minimal HTTP/1.1 storage server for integration tests.
//!
//! Implements the store's surface: POST to `/file` and `/fileinfo` records
//! the body under the `path` query value and answers with an `Etag` header
//! holding the SHA-1 of the received bytes; GET on `/file` honors byte
//! ranges, clamped at end of file; GET on `/fileinfo` returns the stored
//! record; DELETE removes. Objects live in a shared map the tests can
//! inspect.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use xfs_client::checksum::sha1_hex;

#[derive(Debug, Clone, Copy, Default)]
pub struct StorageServerOptions {
    /// If true, every upload response carries a bogus etag.
    pub wrong_etag: bool,
    /// Artificial delay before each response, to keep jobs in flight.
    pub response_delay: Option<Duration>,
}

#[derive(Default)]
pub struct ServerState {
    /// `path` query value -> stored bytes, for `/file` objects.
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    /// `path` query value -> stored bytes, for `/fileinfo` records.
    pub infos: Mutex<HashMap<String, Vec<u8>>>,
}

impl ServerState {
    pub fn put_file(&self, path: &str, data: Vec<u8>) {
        self.files.lock().unwrap().insert(path.to_string(), data);
    }

    pub fn put_info(&self, path: &str, data: Vec<u8>) {
        self.infos.lock().unwrap().insert(path.to_string(), data);
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn info(&self, path: &str) -> Option<Vec<u8>> {
        self.infos.lock().unwrap().get(path).cloned()
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Starts a server in a background thread. Returns (host, port, state). The
/// server runs until the process exits.
pub fn start(opts: StorageServerOptions) -> (String, u16, Arc<ServerState>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(ServerState::default());
    let state_for_server = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&state_for_server);
            thread::spawn(move || handle(stream, &state, opts));
        }
    });
    ("127.0.0.1".to_string(), port, state)
}

fn handle(mut stream: TcpStream, state: &ServerState, opts: StorageServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    if let Some(delay) = opts.response_delay {
        thread::sleep(delay);
    }

    match (req.method.as_str(), req.route.as_str()) {
        ("POST", "/file") => {
            state.put_file(&req.path, req.body.clone());
            respond_upload(&mut stream, &req.body, opts.wrong_etag);
        }
        ("POST", "/fileinfo") => {
            state.put_info(&req.path, req.body.clone());
            respond_upload(&mut stream, &req.body, opts.wrong_etag);
        }
        ("GET", "/file") => match state.file(&req.path) {
            Some(data) => {
                let total = data.len() as u64;
                let (start, end_incl) = req.range.unwrap_or((0, total.saturating_sub(1)));
                let start = start.min(total) as usize;
                let end_excl = (end_incl.saturating_add(1)).min(total) as usize;
                let slice = data.get(start..end_excl).unwrap_or(&data[0..0]);
                let head = format!(
                    "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\nContent-Range: bytes {}-{}/{}\r\nConnection: close\r\n\r\n",
                    slice.len(),
                    start,
                    end_excl.saturating_sub(1),
                    total
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(slice);
            }
            None => respond_not_found(&mut stream),
        },
        ("GET", "/fileinfo") => match state.info(&req.path) {
            Some(data) => {
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    data.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&data);
            }
            None => respond_not_found(&mut stream),
        },
        ("DELETE", "/file") => {
            let removed = state.files.lock().unwrap().remove(&req.path).is_some();
            if removed {
                let _ = stream.write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                );
            } else {
                respond_not_found(&mut stream);
            }
        }
        _ => {
            let _ = stream.write_all(
                b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
}

fn respond_upload(stream: &mut TcpStream, body: &[u8], wrong_etag: bool) {
    let etag = if wrong_etag {
        "0000000000000000000000000000000000000000".to_string()
    } else {
        sha1_hex(body)
    };
    let head = format!(
        "HTTP/1.1 200 OK\r\nEtag: \"{}\"\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        etag
    );
    let _ = stream.write_all(head.as_bytes());
}

fn respond_not_found(stream: &mut TcpStream) {
    let _ = stream
        .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
}

struct Request {
    method: String,
    route: String,
    /// Decoded `path` query value.
    path: String,
    range: Option<(u64, u64)>,
    body: Vec<u8>,
}

/// Reads one full request: headers, then Content-Length bytes of body.
fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 8192];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = find_header_end(&raw) {
            break pos;
        }
        if raw.len() > 64 * 1024 {
            return None;
        }
    };

    let head = std::str::from_utf8(&raw[..header_end]).ok()?;
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?;
    let (route, query) = target.split_once('?').unwrap_or((target, ""));
    let path = query
        .split('&')
        .find_map(|kv| kv.strip_prefix("path="))
        .unwrap_or("")
        .to_string();

    let mut content_length = 0usize;
    let mut range = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse().unwrap_or(0);
        } else if name.eq_ignore_ascii_case("range") {
            range = parse_range(value);
        }
    }

    let mut body = raw[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        body.extend_from_slice(&buf[..n]);
    }
    body.truncate(content_length);

    Some(Request {
        method,
        route: route.to_string(),
        path,
        range,
        body,
    })
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n")
}

/// `bytes=X-Y` -> (X, Y inclusive).
fn parse_range(value: &str) -> Option<(u64, u64)> {
    let range = value.strip_prefix("bytes=")?;
    let (a, b) = range.split_once('-')?;
    let start = a.trim().parse().ok()?;
    let end = if b.trim().is_empty() {
        u64::MAX
    } else {
        b.trim().parse().ok()?
    };
    Some((start, end))
}
