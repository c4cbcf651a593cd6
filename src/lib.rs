//! Campmate - campus assistant terminal client library
//!
//! This library provides the core functionality for the Campmate chat
//! client: the backend API abstraction, session list and conversation
//! state management, configuration, and credential storage.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Backend API trait, wire types, and the HTTP implementation
//! - `chat`: Session list, conversation controller, and reload guard
//! - `auth`: API token storage in the OS keyring
//! - `notify`: User-facing outcome notifications
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use campmate::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     // Client usage would go here
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;

// Re-export commonly used types
pub use api::{CampusApi, ChatSession, HttpCampusApi, Message, Role, SessionId};
pub use chat::{ChatController, ChatPhase, SessionList, TimeBucket};
pub use config::Config;
pub use error::{CampmateError, Result};

#[cfg(test)]
pub mod test_utils;
