use std::fs;
use std::path::Path;
use std::time::Duration;

use fetchpool::progress::{ProgressEvent, ProgressFeed};
use fetchpool::{Status, TaskId};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Common test constants
pub const SCENARIO_SIZE: usize = 10_240;
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(15);

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Asserts that a file holds exactly `expected`
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let actual = fs::read(path).unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));
    assert_eq!(actual.len(), expected.len(), "File size mismatch at {:?}", path);
    assert!(actual == expected, "File content mismatch at {:?}", path);
}

// === Mock Server Helpers ===

/// Serves `body` at `route` with a Content-Length header.
pub async fn mount_file(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Serves `body` at `route` after holding the response for `delay`.
pub async fn mount_slow_file(server: &MockServer, route: &str, body: Vec<u8>, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Serves `body` at `route` and fails verification unless it is fetched exactly `times`.
pub async fn mount_file_expecting(server: &MockServer, route: &str, body: Vec<u8>, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Starts a bare HTTP/1.1 responder that never advertises a length.
///
/// The body is delimited by closing the connection. Returns the base URL.
pub async fn serve_without_length(body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind raw responder");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n";
                let _ = socket.write_all(head).await;
                for piece in body.chunks(700) {
                    let _ = socket.write_all(piece).await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Starts a bare HTTP/1.1 responder that advertises the full length of `body`
/// but closes the connection after `sent` bytes. Returns the base URL.
pub async fn serve_truncated(body: Vec<u8>, sent: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind raw responder");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body[..sent.min(body.len())]).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// A URL on a local port nothing listens on.
pub async fn refused_url(filename: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let port = listener.local_addr().expect("Failed to read local address").port();
    drop(listener);
    format!("http://127.0.0.1:{}/{}", port, filename)
}

// === Event Helpers ===

/// Collects events until every id in `ids` has reported a terminal status.
pub async fn collect_until_terminal(feed: &mut ProgressFeed, ids: &[TaskId]) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    let collect = async {
        while !ids.iter().all(|id| is_finished(&events, *id)) {
            match feed.recv().await {
                Some(event) => events.push(event),
                None => break,
            }
        }
    };
    tokio::time::timeout(EVENT_TIMEOUT, collect)
        .await
        .expect("Timed out waiting for tasks to finish");
    events
}

/// Waits for the first event about `id` with the given status.
pub async fn wait_for_status(
    feed: &mut ProgressFeed,
    events: &mut Vec<ProgressEvent>,
    id: TaskId,
    status: Status,
) {
    let wait = async {
        while !events.iter().any(|e| e.task_id == id && e.status == status) {
            match feed.recv().await {
                Some(event) => events.push(event),
                None => panic!("Feed closed before task {} reached {}", id, status),
            }
        }
    };
    tokio::time::timeout(EVENT_TIMEOUT, wait)
        .await
        .expect("Timed out waiting for a status");
}

/// Drains whatever is left once every reporter is gone.
pub async fn drain_rest(feed: &mut ProgressFeed, events: &mut Vec<ProgressEvent>) {
    while let Some(event) = feed.recv().await {
        events.push(event);
    }
}

/// Returns `true` if `id` has reported a terminal status.
pub fn is_finished(events: &[ProgressEvent], id: TaskId) -> bool {
    events
        .iter()
        .any(|e| e.task_id == id && e.status.is_terminal())
}

/// Events about a single task, in arrival order.
pub fn events_for(events: &[ProgressEvent], id: TaskId) -> Vec<ProgressEvent> {
    events.iter().filter(|e| e.task_id == id).copied().collect()
}

/// Final reported status of a task.
pub fn final_status(events: &[ProgressEvent], id: TaskId) -> Option<Status> {
    events_for(events, id).last().map(|e| e.status)
}

/// Progress values reported while a task was downloading.
pub fn downloading_progress(events: &[ProgressEvent]) -> Vec<f64> {
    events
        .iter()
        .filter(|e| e.status == Status::Downloading)
        .map(|e| e.progress)
        .collect()
}

// === Assertion Helpers ===

/// Asserts that one task's events start at DOWNLOADING, only move forward,
/// end terminal, and never lower the progress while downloading.
pub fn assert_valid_lifecycle(task_events: &[ProgressEvent]) {
    assert!(!task_events.is_empty(), "Task reported nothing");
    assert_eq!(
        task_events[0].status,
        Status::Downloading,
        "First report must be DOWNLOADING: {:?}",
        task_events
    );
    for pair in task_events.windows(2) {
        let (from, to) = (pair[0].status, pair[1].status);
        assert!(
            from == to || from.can_transition_to(to),
            "Illegal transition {} -> {} in {:?}",
            from,
            to,
            task_events
        );
        if to == Status::Downloading {
            assert!(
                pair[1].progress >= pair[0].progress,
                "Progress went backwards in {:?}",
                task_events
            );
        }
    }
    let last = task_events[task_events.len() - 1].status;
    assert!(last.is_terminal(), "Task never finished: {:?}", task_events);
}
