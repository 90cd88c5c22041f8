//! AvailabilityFetcher trait and the reqwest-backed HttpFetcher.
//! The trait is the mock seam for poller tests.

use std::future::Future;
use std::time::Duration;

use roomsync_core::{PollError, Snapshot, parse_availability_body};

use crate::endpoint::AvailabilityEndpoint;

/// One read of the availability snapshot.
pub trait AvailabilityFetcher: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Snapshot, PollError>> + Send;
}

impl<T: AvailabilityFetcher + ?Sized> AvailabilityFetcher for &T {
    fn fetch(&self) -> impl Future<Output = Result<Snapshot, PollError>> + Send {
        (**self).fetch()
    }
}

/// Classify a completed HTTP exchange. Any non-2xx status is a failure
/// regardless of body.
pub fn classify_response(status: u16, body: &str) -> Result<Snapshot, PollError> {
    if !(200..300).contains(&status) {
        return Err(PollError::Status { status });
    }
    parse_availability_body(body)
}

pub struct HttpFetcher {
    client: reqwest::Client,
    endpoint: AvailabilityEndpoint,
}

impl HttpFetcher {
    /// Build the client once at start-up. A failure here is a setup error,
    /// not a poll failure.
    pub fn new(endpoint: AvailabilityEndpoint, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

impl AvailabilityFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<Snapshot, PollError> {
        let response = self
            .client
            .get(self.endpoint.url().clone())
            .send()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;

        tracing::trace!("GET {} -> {status} ({} bytes)", self.endpoint, body.len());
        classify_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomsync_core::{CardBoard, RoomRecord, reconcile};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a random local port.
    /// Returns the base URL and a handle yielding the raw request head.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut buf = vec![0u8; 4096];
            let n = stream.read(&mut buf).await.expect("read");
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.expect("write");
            stream.shutdown().await.ok();
            request
        });
        (format!("http://{addr}"), handle)
    }

    fn fetcher_for(base: &str, location: Option<&str>) -> HttpFetcher {
        let mut endpoint = AvailabilityEndpoint::parse(base).expect("endpoint");
        if let Some(loc) = location {
            endpoint = endpoint.with_location(loc);
        }
        HttpFetcher::new(endpoint, Duration::from_secs(5)).expect("client")
    }

    #[test]
    fn classify_non_success_status() {
        assert_eq!(
            classify_response(500, r#"{"success": true, "rooms": []}"#),
            Err(PollError::Status { status: 500 })
        );
        assert_eq!(
            classify_response(302, ""),
            Err(PollError::Status { status: 302 })
        );
    }

    #[test]
    fn classify_ok_parses_body() {
        let snapshot = classify_response(
            200,
            r#"{"success": true, "rooms": [{"room_id": "7", "availability": "available"}]}"#,
        )
        .expect("snapshot");
        assert_eq!(snapshot.len(), 1);
    }

    fn rendered_page() -> CardBoard {
        CardBoard::render(&Snapshot::new(vec![
            RoomRecord::new("101", "available"),
            RoomRecord::new("102", "unavailable"),
        ]))
    }

    /// Same path the poller takes: reconcile only what classifies as a snapshot.
    fn apply_response(board: &mut CardBoard, status: u16, body: &str) -> Result<(), PollError> {
        let snapshot = classify_response(status, body)?;
        reconcile(board, &snapshot);
        Ok(())
    }

    #[test]
    fn failed_responses_leave_board_untouched() {
        let valid = r#"{"success": true, "rooms": [{"room_id": "101", "availability": "occupied"}]}"#;
        let mut board = rendered_page();
        let before = board.cards().to_vec();

        for (status, body) in [
            (500, valid),
            (404, valid),
            (200, "<html>Bad Gateway</html>"),
            (200, r#"{"rooms": [{"room_id": "101", "availability": "occupied"}]}"#),
            (200, r#"{"success": true, "rooms": {"101": "occupied"}}"#),
            (200, r#"{"success": false, "error": "db down"}"#),
        ] {
            assert!(
                apply_response(&mut board, status, body).is_err(),
                "{status} {body} should fail"
            );
            assert_eq!(board.cards(), before.as_slice(), "{status} {body}");
        }

        apply_response(&mut board, 200, valid).expect("valid response");
        assert!(!board.get("101").expect("101").booking.enabled);
    }

    #[test]
    fn broken_record_does_not_block_the_others() {
        let mut board = rendered_page();
        let body = r#"{"success": true, "rooms": [
            {"room_id": "101", "availability": "unavailable"},
            {"room_id": "102"}
        ]}"#;

        let snapshot = classify_response(200, body).expect("snapshot");
        let report = reconcile(&mut board, &snapshot);

        assert_eq!(report.updated, ["101"]);
        assert_eq!(report.malformed.len(), 1);
        let card = board.get("101").expect("101");
        assert_eq!(card.badge.label, "unavailable");
        assert!(!card.booking.enabled);
        assert_eq!(board.get("102").expect("102").badge.label, "unavailable");
    }

    #[test]
    fn client_builds_with_timeout() {
        let endpoint = AvailabilityEndpoint::parse("http://127.0.0.1:5000").expect("endpoint");
        let built: Result<HttpFetcher, reqwest::Error> =
            HttpFetcher::new(endpoint, Duration::from_millis(500));
        assert!(built.is_ok());
    }

    #[tokio::test]
    async fn fetch_error_status_with_valid_body_leaves_board() {
        let (base, _server) = serve_once(
            "500 Internal Server Error",
            r#"{"success": true, "rooms": [{"room_id": "101", "availability": "occupied"}]}"#,
        )
        .await;
        let fetcher = fetcher_for(&base, None);
        let mut board = rendered_page();
        let before = board.cards().to_vec();

        match fetcher.fetch().await {
            Ok(snapshot) => {
                reconcile(&mut board, &snapshot);
                panic!("HTTP 500 must not yield a snapshot");
            }
            Err(e) => assert_eq!(e, PollError::Status { status: 500 }),
        }
        assert_eq!(board.cards(), before.as_slice());
    }

    #[tokio::test]
    async fn fetch_keeps_valid_records_next_to_broken_ones() {
        let (base, _server) = serve_once(
            "200 OK",
            r#"{"success": true, "rooms": [{"room_id": "101", "availability": "unavailable"}, {"room_id": "102"}]}"#,
        )
        .await;
        let fetcher = fetcher_for(&base, None);

        let snapshot = fetcher.fetch().await.expect("snapshot");
        assert_eq!(snapshot.rooms, [RoomRecord::new("101", "unavailable")]);
        assert_eq!(snapshot.skipped.len(), 1);
    }

    #[tokio::test]
    async fn fetch_success() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"success": true, "rooms": [{"room_id": "101", "availability": "occupied"}]}"#,
        )
        .await;
        let fetcher = fetcher_for(&base, Some("Goa"));

        let snapshot = fetcher.fetch().await.expect("snapshot");
        assert_eq!(snapshot.rooms[0].room_id, "101");
        assert_eq!(snapshot.rooms[0].availability.as_str(), "occupied");

        let request = server.await.expect("server");
        assert!(
            request.starts_with("GET /api/rooms/available?location=Goa HTTP/1.1"),
            "unexpected request: {request}"
        );
    }

    #[tokio::test]
    async fn fetch_server_error_status() {
        let (base, _server) = serve_once("503 Service Unavailable", "").await;
        let fetcher = fetcher_for(&base, None);
        assert_eq!(
            fetcher.fetch().await,
            Err(PollError::Status { status: 503 })
        );
    }

    #[tokio::test]
    async fn fetch_application_failure() {
        let (base, _server) =
            serve_once("200 OK", r#"{"success": false, "error": "table missing"}"#).await;
        let fetcher = fetcher_for(&base, None);
        assert_eq!(
            fetcher.fetch().await,
            Err(PollError::Rejected {
                error: "table missing".to_string()
            })
        );
    }

    #[tokio::test]
    async fn fetch_connection_refused() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let fetcher = fetcher_for(&format!("http://{addr}"), None);
        assert!(matches!(fetcher.fetch().await, Err(PollError::Transport(_))));
    }
}
