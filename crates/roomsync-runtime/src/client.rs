//! UDS JSON-RPC client for CLI subcommands.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

pub(crate) async fn rpc_call(
    socket_path: &str,
    method: &str,
    params: serde_json::Value,
) -> anyhow::Result<serde_json::Value> {
    let stream = UnixStream::connect(socket_path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot connect to daemon at {socket_path}: {e}"))?;

    let (reader, mut writer) = stream.into_split();

    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1,
    });
    let mut req = serde_json::to_string(&request)?;
    req.push('\n');
    writer.write_all(req.as_bytes()).await?;
    writer.shutdown().await?;

    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    reader.read_line(&mut line).await?;

    let response: serde_json::Value = serde_json::from_str(line.trim())?;

    if let Some(error) = response.get("error") {
        anyhow::bail!("RPC error: {error}");
    }

    Ok(response["result"].clone())
}

/// `roomsync status` — poller counters and last error.
pub async fn cmd_status(socket_path: &str) -> anyhow::Result<()> {
    let status = rpc_call(socket_path, "poll_status", serde_json::json!({})).await?;
    println!("{}", format_status(&status));
    Ok(())
}

pub(crate) fn format_status(status: &serde_json::Value) -> String {
    let stats = &status["stats"];
    let mut lines = vec![
        format!("endpoint: {}", status["endpoint"].as_str().unwrap_or("?")),
        format!(
            "polling:  {}",
            if status["polling"].as_bool().unwrap_or(false) {
                "on"
            } else {
                "off"
            }
        ),
        format!("rooms:    {}", status["rooms"].as_u64().unwrap_or(0)),
        format!(
            "polls:    {} ok, {} failed, {} skipped",
            stats["polls_ok"].as_u64().unwrap_or(0),
            stats["polls_failed"].as_u64().unwrap_or(0),
            stats["ticks_skipped"].as_u64().unwrap_or(0)
        ),
        format!(
            "last:     {}",
            stats["last_poll_at"].as_str().unwrap_or("never")
        ),
    ];
    if let Some(err) = stats["last_error"].as_str() {
        lines.push(format!("error:    {err}"));
    }
    lines.join("\n")
}

/// `roomsync book <room_id>` — run the booking guard. Returns the exit code.
pub async fn cmd_book(socket_path: &str, room_id: &str) -> anyhow::Result<i32> {
    let verdict = rpc_call(
        socket_path,
        "check_booking",
        serde_json::json!({ "room_id": room_id }),
    )
    .await?;

    if verdict["allowed"].as_bool().unwrap_or(false) {
        println!("room {room_id} can be booked");
        Ok(0)
    } else {
        let reason = verdict["reason"].as_str().unwrap_or("refused");
        eprintln!("{reason}");
        Ok(1)
    }
}
