//! `roomsync ls` — rendered room cards, one per line.

use roomsync_core::{BadgeTone, RoomCard};

use crate::client::rpc_call;

pub async fn cmd_ls(socket_path: &str, use_color: bool) -> anyhow::Result<()> {
    let output = fetch_and_format(socket_path, use_color).await?;
    println!("{output}");
    Ok(())
}

pub(crate) async fn fetch_and_format(socket_path: &str, use_color: bool) -> anyhow::Result<String> {
    let rooms = rpc_call(socket_path, "list_rooms", serde_json::json!({})).await?;
    let cards: Vec<RoomCard> = serde_json::from_value(rooms)?;
    Ok(format_rooms(&cards, use_color))
}

pub(crate) fn format_rooms(cards: &[RoomCard], use_color: bool) -> String {
    if cards.is_empty() {
        return "(no rooms rendered)".to_string();
    }

    let id_width = cards.iter().map(|c| c.room_id.len()).max().unwrap_or(0);
    let label_width = cards.iter().map(|c| c.badge.label.len()).max().unwrap_or(0);

    cards
        .iter()
        .map(|card| {
            let label = format!("{:<label_width$}", card.badge.label);
            let label = if use_color {
                let code = match card.badge.tone {
                    BadgeTone::Success => "32",
                    BadgeTone::Danger => "31",
                };
                format!("\x1b[{code}m{label}\x1b[0m")
            } else {
                label
            };
            let action = if card.booking.enabled {
                "[book]"
            } else {
                "[----]"
            };
            format!("{:<id_width$}  {label}  {action}", card.room_id)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// auto → color only when stdout is a terminal.
pub fn resolve_color(color: &str) -> bool {
    use std::io::IsTerminal;
    match color {
        "always" => true,
        "never" => false,
        _ => std::io::stdout().is_terminal(),
    }
}
