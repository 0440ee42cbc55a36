//! Infrastructure layer for Nifty.
//!
//! Contains implementations of the ports defined in `nifty-core`: the SQLite
//! and JSON-document session stores, the OpenAI-compatible LLM provider, and
//! the `config.toml` loader.

pub mod config;
pub mod document;
pub mod llm;
pub mod sqlite;
