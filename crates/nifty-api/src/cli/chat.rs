//! One-shot chat command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Send `message` (optionally into an existing session) and print the reply.
///
/// # Examples
///
/// ```bash
/// nifty chat "What time is it?"
/// nifty chat "And now?" --session <id> --json
/// ```
pub async fn chat(
    state: &AppState,
    message: &str,
    session: Option<&str>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let reply = state.chat_service.handle_message(session, message).await?;

    if json {
        let out = serde_json::json!({
            "response": reply.reply,
            "session_id": reply.session_id,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(&state.config.agent.name).cyan().bold(),
        reply.reply
    );
    if !quiet {
        println!();
        println!(
            "  {} {}",
            style("session").dim(),
            style(&reply.session_id).yellow()
        );
        println!(
            "  {}",
            style(format!(
                "Continue with: nifty chat \"...\" --session {}",
                reply.session_id
            ))
            .dim()
        );
    }
    println!();

    Ok(())
}
