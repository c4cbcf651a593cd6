//! Special commands parser for the interactive chat screen
//!
//! This module parses the slash commands available during a chat session.
//! Special commands allow users to:
//! - Start, switch, rename, pin, and delete sessions
//! - Send a configured quick prompt
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive in their command
//! word; arguments keep their original casing.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during an interactive chat
///
/// These commands act on the session list or the screen state rather than
/// being sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Deselect the current session so the next message starts a new chat
    New,

    /// Print the session list, pinned first then grouped by recency
    List,

    /// Switch to another session by list number or id
    Switch(String),

    /// Pin a session; defaults to the active one when no argument is given
    Pin(Option<String>),

    /// Unpin a session; defaults to the active one
    Unpin(Option<String>),

    /// Rename the active session
    Rename(String),

    /// Delete a session; defaults to the active one
    Delete(Option<String>),

    /// Delete every session and message
    Clear,

    /// Send the Nth configured quick prompt (1-based)
    Quick(usize),

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the assistant as a regular message.
    None,
}

/// Parse a user input string into a special command
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None
/// for regular messages.
///
/// # Errors
///
/// Returns [`CommandError::UnknownCommand`] if input starts with "/" but is
/// not a valid command, [`CommandError::MissingArgument`] when a required
/// argument is absent, and [`CommandError::UnsupportedArgument`] for
/// malformed arguments.
///
/// # Examples
///
/// ```
/// use campmate::commands::special::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/switch 3").unwrap();
/// assert_eq!(cmd, SpecialCommand::Switch("3".to_string()));
///
/// let cmd = parse_special_command("what's on this evening?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/frobnicate").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // Anything not starting with "/" is a regular message (except exit/quit).
    if !trimmed.starts_with('/') {
        if lower == "exit" || lower == "quit" {
            return Ok(SpecialCommand::Exit);
        }
        return Ok(SpecialCommand::None);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    match word.as_str() {
        "/new" => Ok(SpecialCommand::New),
        "/list" | "/sessions" => Ok(SpecialCommand::List),

        "/switch" => {
            if rest.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/switch".to_string(),
                    usage: "/switch <number|id>".to_string(),
                })
            } else {
                Ok(SpecialCommand::Switch(rest.to_string()))
            }
        }

        "/pin" => Ok(SpecialCommand::Pin(optional_arg(rest))),
        "/unpin" => Ok(SpecialCommand::Unpin(optional_arg(rest))),
        "/delete" => Ok(SpecialCommand::Delete(optional_arg(rest))),

        "/rename" => {
            if rest.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/rename".to_string(),
                    usage: "/rename <new title>".to_string(),
                })
            } else {
                Ok(SpecialCommand::Rename(rest.to_string()))
            }
        }

        "/clear" => Ok(SpecialCommand::Clear),

        "/quick" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "/quick".to_string(),
                    usage: "/quick <number>".to_string(),
                });
            }
            match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(SpecialCommand::Quick(n)),
                _ => Err(CommandError::UnsupportedArgument {
                    command: "/quick".to_string(),
                    arg: rest.to_string(),
                }),
            }
        }

        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        _ => Err(CommandError::UnknownCommand(word)),
    }
}

fn optional_arg(rest: &str) -> Option<String> {
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Print help information for all special commands
pub fn print_help() {
    println!("Available commands:");
    println!("  /new               Start a new chat");
    println!("  /list              List sessions, pinned first then by recency");
    println!("  /switch <n|id>     Switch to a session by list number or id");
    println!("  /pin [n|id]        Pin a session (default: current)");
    println!("  /unpin [n|id]      Unpin a session (default: current)");
    println!("  /rename <title>    Rename the current session");
    println!("  /delete [n|id]     Delete a session (default: current)");
    println!("  /clear             Delete every session and message");
    println!("  /quick <n>         Send the Nth quick prompt");
    println!("  /help, /?          Show this help");
    println!("  exit, quit         Leave the chat");
}
