//! roomsync: keeps rendered room cards in sync with the availability endpoint.
//! One binary: the daemon plus its client subcommands.

use clap::Parser;

mod cli;
mod client;
mod cmd_ls;
mod cmd_watch;
mod config;
mod daemon;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let command = args
        .command
        .unwrap_or_else(|| cli::Command::Ls(cli::LsOpts::default()));
    let socket_path = args.socket_path.unwrap_or_else(cli::default_socket_path);

    match command {
        cli::Command::Daemon(opts) => {
            let filter = std::env::var("ROOMSYNC_LOG")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string());
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
                .init();

            let config = config::Config::resolve(&opts)?;
            tracing::info!(
                "roomsync daemon starting (endpoint {}, every {}s)",
                config.poll.endpoint,
                config.poll.interval_secs
            );

            daemon::run_daemon(config, &socket_path).await?;
        }
        cli::Command::Ls(opts) => {
            let use_color = cmd_ls::resolve_color(&opts.color);
            cmd_ls::cmd_ls(&socket_path, use_color).await?;
        }
        cli::Command::Watch(opts) => {
            cmd_watch::cmd_watch(&socket_path, opts.interval, &opts.color).await?;
        }
        cli::Command::Status => {
            client::cmd_status(&socket_path).await?;
        }
        cli::Command::Book(opts) => {
            let exit_code = client::cmd_book(&socket_path, &opts.room_id).await?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
