//! UDS JSON-RPC server: minimal hand-rolled implementation.
//! Connection-per-request, newline-delimited JSON.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tokio::sync::Mutex;

use roomsync_core::check_booking;
use roomsync_poller::PollStats;

use crate::daemon::DaemonState;

/// Run the UDS JSON-RPC server.
pub async fn run_server(
    socket_path: &str,
    state: Arc<Mutex<DaemonState>>,
    stats: Arc<Mutex<PollStats>>,
) -> anyhow::Result<()> {
    // Create socket directory with mode 0700
    let socket_dir = std::path::Path::new(socket_path)
        .parent()
        .ok_or_else(|| anyhow::anyhow!("invalid socket path"))?;

    std::fs::create_dir_all(socket_dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(socket_dir, std::fs::Permissions::from_mode(0o700))?;
    }

    // Check for stale socket
    if std::path::Path::new(socket_path).exists() {
        if tokio::net::UnixStream::connect(socket_path).await.is_err() {
            std::fs::remove_file(socket_path)?;
            tracing::info!("removed stale socket at {socket_path}");
        } else {
            anyhow::bail!("another daemon is already running at {socket_path}");
        }
    }

    let listener = UnixListener::bind(socket_path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;
    }

    tracing::info!("UDS server listening on {socket_path}");

    loop {
        let (stream, _) = listener.accept().await?;
        let state = Arc::clone(&state);
        let stats = Arc::clone(&stats);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, state, stats).await {
                tracing::debug!("connection error: {e}");
            }
        });
    }
}

async fn handle_connection(
    stream: tokio::net::UnixStream,
    state: Arc<Mutex<DaemonState>>,
    stats: Arc<Mutex<PollStats>>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    reader.read_line(&mut line).await?;

    let request: serde_json::Value = serde_json::from_str(line.trim())?;
    let response = dispatch(&request, &state, &stats).await?;

    let mut resp = serde_json::to_string(&response)?;
    resp.push('\n');
    writer.write_all(resp.as_bytes()).await?;

    Ok(())
}

/// Route one request to its method and wrap the JSON-RPC envelope.
pub(crate) async fn dispatch(
    request: &serde_json::Value,
    state: &Mutex<DaemonState>,
    stats: &Mutex<PollStats>,
) -> anyhow::Result<serde_json::Value> {
    let method = request["method"].as_str().unwrap_or("");
    let id = request["id"].clone();

    let result = match method {
        "list_rooms" => {
            let st = state.lock().await;
            serde_json::to_value(st.board.cards())?
        }
        "poll_status" => {
            let st = state.lock().await;
            let stats = stats.lock().await;
            serde_json::json!({
                "endpoint": st.endpoint,
                "polling": st.polling,
                "started_at": st.started_at,
                "rooms": st.board.len(),
                "stats": *stats,
            })
        }
        "check_booking" => {
            let Some(room_id) = request["params"]["room_id"].as_str() else {
                return Ok(error_response(id, -32602, "missing params.room_id"));
            };
            let st = state.lock().await;
            match check_booking(&st.board, room_id) {
                Ok(()) => serde_json::json!({ "room_id": room_id, "allowed": true }),
                Err(refused) => serde_json::json!({
                    "room_id": room_id,
                    "allowed": false,
                    "reason": refused.to_string(),
                }),
            }
        }
        _ => return Ok(error_response(id, -32601, "method not found")),
    };

    Ok(serde_json::json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": id,
    }))
}

fn error_response(id: serde_json::Value, code: i64, message: &str) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "error": {"code": code, "message": message},
        "id": id,
    })
}
