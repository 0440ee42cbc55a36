//! Session history command.

use std::path::Path;

use anyhow::Result;
use console::style;

use nifty_core::session::store::SessionStore;
use nifty_types::turn::TurnRole;

use crate::state::open_store;

/// Print the last `limit` turns of a session.
///
/// Only opens the store, so it works without an API key.
pub async fn history(data_dir: &Path, session_id: &str, limit: usize, json: bool) -> Result<()> {
    let config = nifty_infra::config::load_global_config(data_dir).await;
    let store = open_store(data_dir, &config).await?;
    let turns = store.get_recent(session_id, limit).await?;

    if json {
        let out = serde_json::json!({
            "session_id": session_id,
            "messages": turns,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if turns.is_empty() {
        println!();
        println!(
            "  {} No turns found for session '{}'.",
            style("i").blue().bold(),
            style(session_id).yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    for turn in &turns {
        let label = match turn.role {
            TurnRole::User => style("you").green().bold(),
            TurnRole::Assistant => style(config.agent.name.as_str()).cyan().bold(),
        };
        println!("  {label} {}", turn.text);
    }
    println!();
    println!(
        "  {}",
        style(format!("{} turn(s), oldest first", turns.len())).dim()
    );
    println!();

    Ok(())
}
