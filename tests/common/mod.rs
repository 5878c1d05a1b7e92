//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use network_state_checker::{ClusterState, SnapshotHandle};

/// Canned reply of a mock backend.
pub struct MockReply {
    pub status: u16,
    pub location: Option<&'static str>,
    pub body: String,
    /// Declared `Content-Length`; defaults to the real body length.
    pub content_length: Option<usize>,
}

impl MockReply {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            location: None,
            body: String::new(),
            content_length: None,
        }
    }

    pub fn redirect(location: &'static str) -> Self {
        Self {
            status: 302,
            location: Some(location),
            body: String::new(),
            content_length: None,
        }
    }

    /// Announces more body than is sent before the connection closes.
    #[allow(dead_code)]
    pub fn truncated(status: u16) -> Self {
        Self {
            status,
            location: None,
            body: "partial".to_string(),
            content_length: Some(1024),
        }
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// The handler receives the request path.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockReply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let path = request
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or("/")
                            .to_string();

                        let reply = f(path).await;
                        let status_text = match reply.status {
                            200 => "200 OK",
                            204 => "204 No Content",
                            302 => "302 Found",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let location = reply
                            .location
                            .map(|l| format!("Location: {}\r\n", l))
                            .unwrap_or_default();

                        let response_str = format!(
                            "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            location,
                            reply.content_length.unwrap_or(reply.body.len()),
                            reply.body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock backend that always answers with `status`.
#[allow(dead_code)]
pub async fn start_status_backend(status: u16) -> SocketAddr {
    start_programmable_backend(move |_| async move { MockReply::status(status) }).await
}

/// Poll the snapshot until `ready` holds, panicking after five seconds.
pub async fn wait_for_state<F>(snapshots: &SnapshotHandle, ready: F) -> Arc<ClusterState>
where
    F: Fn(&ClusterState) -> bool,
{
    let wait = async {
        loop {
            let state = snapshots.snapshot().unwrap();
            if ready(&state) {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    };

    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("cluster state never reached the expected shape")
}
