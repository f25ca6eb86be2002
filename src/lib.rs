//! Terminal client for the Aura Hub partnership (parceria) API.
//!
//! Aura Hub exposes keyword and semantic search over partnership records,
//! a detail endpoint, and an AI extraction endpoint that suggests fields
//! from an uploaded PDF. This crate wraps that API in a library (client,
//! state controller, formatting) plus a ratatui TUI and one-shot CLI
//! subcommands built on top of it.

pub mod api;
pub mod app;
pub mod config;
pub mod encoding;
pub mod format;
pub mod models;
pub mod tui;

pub use api::{ApiClient, ApiError};
pub use config::Settings;
