//! User-facing failure notification

use crate::error::LoadError;

/// Tells the user a page failed to load
pub trait Notifier: Send + Sync {
    fn notify_failure(&self, message: &str, error: &LoadError);
}

/// Prints the failure message to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_failure(&self, message: &str, error: &LoadError) {
        eprintln!("{}", message);
        eprintln!("  caused by: {}", error);
    }
}
