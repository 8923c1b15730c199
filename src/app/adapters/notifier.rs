//! User notification for errors the run recovers from
//!
//! The report-write failure is the one error a user must see even though the
//! run itself completes. The binary shows it on the console; tests capture it.

use colored::Colorize;
use std::sync::Mutex;

/// Receives user-facing error notifications
pub trait Notifier: Send + Sync {
    fn notify_error(&self, title: &str, message: &str);
}

/// Prints notifications to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_error(&self, title: &str, message: &str) {
        eprintln!();
        eprintln!("{} {}", "✖".bright_red().bold(), title.bright_red().bold());
        eprintln!("  {}", message);
        eprintln!();
    }
}

/// Keeps notifications in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(title, message)` pairs received so far
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn notify_error(&self, title: &str, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((title.to_string(), message.to_string()));
        }
    }
}
