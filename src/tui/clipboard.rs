//! System clipboard access
//!
//! A fresh `arboard` handle is opened per copy so nothing is held between
//! copies. Headless hosts (no display server, SSH without forwarding) fail
//! here; the caller reports that to the operator instead of crashing.

use anyhow::{Context, Result};
use arboard::Clipboard;

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    Clipboard::new()
        .context("Clipboard unavailable")?
        .set_text(text)
        .context("Failed to set clipboard text")
}
