//! CLI definition using clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "roomsync", about = "room availability sync for rendered room cards")]
pub struct Cli {
    /// UDS socket path (default: /tmp/roomsync-$USER/roomsyncd.sock)
    #[arg(long, short = 's', global = true, env = "ROOMSYNC_SOCKET")]
    pub socket_path: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the daemon (render cards, poll loop + UDS server)
    Daemon(DaemonOpts),
    /// List room cards as currently rendered
    Ls(LsOpts),
    /// Live-refresh the room card list
    Watch(WatchOpts),
    /// Show poller statistics
    Status,
    /// Check whether a room can be booked right now
    Book(BookOpts),
}

#[derive(clap::Args, Default)]
pub struct DaemonOpts {
    /// TOML config file
    #[arg(long, short = 'c', env = "ROOMSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Availability endpoint URL
    #[arg(long, env = "ROOMSYNC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Only show rooms for this location
    #[arg(long, env = "ROOMSYNC_LOCATION")]
    pub location: Option<String>,

    /// Poll interval in seconds
    #[arg(long, env = "ROOMSYNC_POLL_INTERVAL_SECS")]
    pub poll_interval_secs: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Render once and serve, without polling
    #[arg(long)]
    pub no_poll: bool,
}

#[derive(clap::Args)]
pub struct LsOpts {
    /// Color output: auto, always, never
    #[arg(long, default_value = "auto")]
    pub color: String,
}

impl Default for LsOpts {
    fn default() -> Self {
        Self {
            color: "auto".to_string(),
        }
    }
}

#[derive(clap::Args)]
pub struct WatchOpts {
    /// Refresh interval in seconds
    #[arg(long, short = 'n', default_value = "2")]
    pub interval: u64,

    /// Color output: auto, always, never
    #[arg(long, default_value = "auto")]
    pub color: String,
}

#[derive(clap::Args)]
pub struct BookOpts {
    pub room_id: String,
}

/// Default socket path using $USER for per-user isolation.
pub fn default_socket_path() -> String {
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        return format!("{dir}/roomsync/roomsyncd.sock");
    }
    let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
    format!("/tmp/roomsync-{user}/roomsyncd.sock")
}
