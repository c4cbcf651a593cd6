//! User-facing status notifications
//!
//! State-changing operations report their outcome through [`Notify`] rather
//! than printing directly, so the chat state machine stays testable and the
//! terminal styling lives in one place.

use colored::Colorize;
use std::sync::Mutex;

/// Sink for outcome notifications shown to the user.
pub trait Notify: Send + Sync {
    fn error(&self, message: &str);
    fn success(&self, message: &str);
}

/// Writes notifications to the terminal with colored markers.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notify for TerminalNotifier {
    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message);
    }

    fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }
}

/// Records notifications in memory for assertions.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    errors: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }
}

impl Notify for MemoryNotifier {
    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }
}
