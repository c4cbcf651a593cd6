//! Command-line interface definition for Campmate
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the interactive chat screen, session
//! management, and credential handling.

use clap::{Parser, Subcommand};

/// Campmate - terminal client for the campus assistant
///
/// Chat with the campus assistant and manage your saved conversations
/// from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "campmate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the backend API base URL
    #[arg(long, env = "CAMPMATE_API_URL")]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Campmate
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive chat screen
    Chat {
        /// Resume a specific session instead of starting fresh
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Manage saved chat sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Manage the stored API token
    Auth {
        /// Credential subcommand
        #[command(subcommand)]
        command: AuthCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List sessions, pinned first then grouped by recency
    List {
        /// Emit raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rename a session
    Rename {
        /// Session identifier
        id: String,

        /// New title
        title: String,
    },

    /// Pin a session so it stays at the top of the list
    Pin {
        /// Session identifier
        id: String,
    },

    /// Unpin a session
    Unpin {
        /// Session identifier
        id: String,
    },

    /// Delete a session and its messages
    Delete {
        /// Session identifier
        id: String,
    },

    /// Delete every session and message
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Credential subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Store an API token in the OS keyring
    Login {
        /// Token value; prompted for when omitted
        #[arg(long)]
        token: Option<String>,
    },

    /// Remove the stored API token
    Logout,

    /// Show whether a token is configured
    Status,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
