//! Core: configuration, state, errors and the server loop
//!
//! - [`Config`] - settings loaded from the environment
//! - [`ServerState`] - shared service handles
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::{Config, ConfigError};
pub use error::{Result, ServerError};
pub use server::{Server, serve};
pub use state::ServerState;
pub use tasks::BackgroundTasks;
