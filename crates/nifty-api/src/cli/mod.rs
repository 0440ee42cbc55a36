//! CLI command definitions and dispatch for the `nifty` binary.

pub mod chat;
pub mod history;

use clap::{Parser, Subcommand};

/// White Rabbit chat service with per-session memory.
#[derive(Parser)]
#[command(name = "nifty", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry. Spans are printed to
    /// stdout, so this cannot be combined with `--json`.
    #[arg(long, global = true, conflicts_with = "json")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on.
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Host address to bind to.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Send one message and print the reply.
    Chat {
        /// The message to send.
        message: String,

        /// Continue an existing session instead of starting a new one.
        #[arg(long, short)]
        session: Option<String>,
    },

    /// Show the recent turns of a session.
    History {
        /// Session id to inspect.
        session_id: String,

        /// Number of turns to show.
        #[arg(long, short, default_value_t = nifty_types::turn::DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_with_session() {
        let cli = Cli::try_parse_from(["nifty", "chat", "hello", "--session", "abc", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Chat { message, session } => {
                assert_eq!(message, "hello");
                assert_eq!(session.as_deref(), Some("abc"));
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_otel_rejected_with_json_output() {
        let result = Cli::try_parse_from(["nifty", "chat", "hello", "--json", "--otel"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["nifty", "serve", "--otel"]).unwrap();
        assert!(cli.otel);
    }

    #[test]
    fn test_history_limit_defaults_to_window() {
        let cli = Cli::try_parse_from(["nifty", "history", "abc"]).unwrap();
        match cli.command {
            Commands::History { session_id, limit } => {
                assert_eq!(session_id, "abc");
                assert_eq!(limit, 20);
            }
            _ => panic!("expected history command"),
        }
    }
}
