//! `roomsync watch` — live-refresh room card view.

use std::time::Duration;

use crate::cmd_ls::{fetch_and_format, resolve_color};

/// Entry point for `roomsync watch`.
pub async fn cmd_watch(socket_path: &str, interval: u64, color: &str) -> anyhow::Result<()> {
    let use_color = resolve_color(color);
    let interval = interval.max(1);

    loop {
        // Clear screen + cursor home
        print!("\x1b[2J\x1b[H");

        match fetch_and_format(socket_path, use_color).await {
            Ok(output) => println!("{output}"),
            Err(e) => println!("Cannot connect to daemon: {e}"),
        }

        if use_color {
            println!("\n\x1b[2mroomsync watch \u{2014} Ctrl-C to quit\x1b[0m");
        } else {
            println!("\nroomsync watch \u{2014} Ctrl-C to quit");
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
            _ = tokio::signal::ctrl_c() => { break; }
        }
    }

    Ok(())
}
