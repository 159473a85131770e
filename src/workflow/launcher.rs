//! Opening the verification URL.

use std::io::Write;

/// Hands the session URL to the holder. Fire and forget: the workflow does
/// not wait on the window, only on the session outcome.
pub trait VerificationLauncher: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Prints the URL for the holder to open.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalLauncher;

impl VerificationLauncher for TerminalLauncher {
    fn open(&self, url: &str) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "Open this link to verify your degree:\n  {}", url)?;
        out.flush()
    }
}
