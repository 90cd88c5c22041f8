//! Daemon: renders the room cards once, then wires the availability poller
//! and the UDS server around the shared board.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use roomsync_core::{CardBoard, CardSurface, RoomCard};
use roomsync_http::{AvailabilityFetcher, HttpFetcher};
use roomsync_poller::{PollStats, Poller};

use crate::config::Config;
use crate::server;

/// Shared daemon state protected by a mutex.
pub struct DaemonState {
    /// The rendered page. Cards are only patched after the initial render.
    pub board: CardBoard,
    pub endpoint: String,
    pub polling: bool,
    pub started_at: DateTime<Utc>,
}

impl DaemonState {
    pub fn new(board: CardBoard, endpoint: impl Into<String>, polling: bool) -> Self {
        Self {
            board,
            endpoint: endpoint.into(),
            polling,
            started_at: Utc::now(),
        }
    }
}

impl CardSurface for DaemonState {
    fn card_mut(&mut self, room_id: &str) -> Option<&mut RoomCard> {
        self.board.card_mut(room_id)
    }
}

/// Run the daemon until ctrl-c / SIGTERM.
pub async fn run_daemon(config: Config, socket_path: &str) -> anyhow::Result<()> {
    let endpoint = config.endpoint()?;
    let fetcher = HttpFetcher::new(endpoint.clone(), config.request_timeout())?;

    // Initial render: without it there are no cards to keep in sync.
    let snapshot = fetcher
        .fetch()
        .await
        .map_err(|e| anyhow::anyhow!("initial render from {endpoint} failed: {e}"))?;
    let board = CardBoard::render(&snapshot);
    tracing::info!("rendered {} room cards from {endpoint}", board.len());

    let state = Arc::new(Mutex::new(DaemonState::new(
        board,
        endpoint.to_string(),
        config.poll.enabled,
    )));
    let poller = Poller::new(fetcher, Arc::clone(&state));
    let stats = poller.stats();

    let server_state = Arc::clone(&state);
    let server_stats = Arc::clone(&stats);
    let server_socket = socket_path.to_string();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::run_server(&server_socket, server_state, server_stats).await {
            tracing::error!("UDS server error: {e}");
        }
    });

    let poll_handle = if config.poll.enabled {
        tokio::spawn(poller.run(config.interval()))
    } else {
        tracing::info!("availability polling disabled for this view");
        tokio::spawn(std::future::pending::<()>())
    };

    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to register SIGTERM handler");
            tokio::select! {
                _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
            tracing::info!("received ctrl-c, shutting down");
        }
    };

    tokio::select! {
        () = shutdown => {}
        _ = poll_handle => {
            tracing::warn!("poll loop exited unexpectedly");
        }
        _ = server_handle => {
            tracing::warn!("server exited unexpectedly");
        }
    }

    let _ = std::fs::remove_file(socket_path);
    log_final_stats(&stats).await;
    tracing::info!("daemon stopped");
    Ok(())
}

async fn log_final_stats(stats: &Mutex<PollStats>) {
    let stats = stats.lock().await;
    tracing::info!(
        "polls: {} ok, {} failed, {} skipped",
        stats.polls_ok,
        stats.polls_failed,
        stats.ticks_skipped
    );
}
