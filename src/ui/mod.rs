//! Seams to whatever hosts the client: screen navigation and transient toasts.
//!
//! The library never prints or navigates on its own; it calls these traits and
//! lets the host decide (the CLI prints hints to stderr).

mod toast;

pub use toast::*;

/// Screen navigation requested by the session pipeline.
pub trait Navigator: Send + Sync {
    /// The session is gone; send the user back to the login screen.
    fn to_login(&self);
}

/// Navigator for the command line: there is no screen to switch to, so tell
/// the user how to log back in.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn to_login(&self) {
        tracing::info!("Redirecting to login");
        eprintln!("You are not logged in. Run `cultbrawl login` to authenticate.");
    }
}
