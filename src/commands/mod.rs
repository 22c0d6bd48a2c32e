//! Command handlers
//!
//! One handler per CLI subcommand. Handlers build the workflows from
//! `AppState`, run them and print a human-readable result.

pub mod config;
pub mod download;
pub mod fetch;

pub use self::config::*;
pub use self::download::*;
pub use self::fetch::*;
