//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Observable state of a mock collector endpoint.
pub struct CollectorHandle {
    pub addr: SocketAddr,
    /// POST requests received, including retried attempts.
    pub requests: Arc<AtomicU32>,
    /// Raw request bodies, in arrival order.
    pub bodies: Arc<Mutex<Vec<String>>>,
    /// Status code answered to the next requests; switchable at runtime.
    pub status: Arc<AtomicU16>,
}

/// Start a mock log collector that answers every request with `status`.
///
/// Binds an ephemeral port; reads one HTTP request per connection and
/// closes it after responding. The returned handle's `status` can be
/// changed while the collector runs.
pub async fn start_mock_collector(status: u16) -> CollectorHandle {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(AtomicU32::new(0));
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let status = Arc::new(AtomicU16::new(status));

    let requests_in = requests.clone();
    let bodies_in = bodies.clone();
    let status_in = status.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let requests = requests_in.clone();
                    let bodies = bodies_in.clone();
                    let status = status_in.clone();
                    tokio::spawn(async move {
                        if let Some(body) = read_request(&mut socket).await {
                            requests.fetch_add(1, Ordering::SeqCst);
                            bodies.lock().unwrap().push(body);
                        }
                        let status_text = match status.load(Ordering::SeqCst) {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            status_text
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    CollectorHandle {
        addr,
        requests,
        bodies,
        status,
    }
}

/// Start a collector that accepts connections and reads requests but never
/// responds, so senders sit in their request timeout.
pub async fn start_stalled_collector() -> CollectorHandle {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(AtomicU32::new(0));
    let bodies = Arc::new(Mutex::new(Vec::new()));

    let requests_in = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let requests = requests_in.clone();
                    tokio::spawn(async move {
                        if read_request(&mut socket).await.is_some() {
                            requests.fetch_add(1, Ordering::SeqCst);
                        }
                        // Hold the connection open without ever answering.
                        tokio::time::sleep(Duration::from_secs(300)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    CollectorHandle {
        addr,
        requests,
        bodies,
        status: Arc::new(AtomicU16::new(0)),
    }
}

/// Read one HTTP request, returning its body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let header_end = loop {
        let mut chunk = [0u8; 1024];
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let mut chunk = [0u8; 1024];
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    Some(String::from_utf8_lossy(&body).to_string())
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
