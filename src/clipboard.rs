// System clipboard shim. Write-only: the uploader never reads it.

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard backed by `arboard`.
///
/// The handle is opened lazily and then kept for the lifetime of the
/// process: on X11 and Wayland the selection is served by this process,
/// so dropping the handle would drop the copied link with it.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.take() {
            Some(c) => c,
            None => arboard::Clipboard::new().context("Failed to open system clipboard")?,
        };
        self.inner
            .insert(clipboard)
            .set_text(text)
            .context("Failed to write to system clipboard")?;
        debug!("copied {} bytes to clipboard", text.len());
        Ok(())
    }
}

/// Wrapper that turns clipboard errors into a warning. Used where the
/// link has another way out, such as the headless upload printing it.
pub struct BestEffortClipboard<C> {
    inner: C,
}

impl<C: Clipboard> BestEffortClipboard<C> {
    pub fn new(inner: C) -> Self {
        BestEffortClipboard { inner }
    }
}

impl<C: Clipboard> Clipboard for BestEffortClipboard<C> {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if let Err(e) = self.inner.write_text(text) {
            warn!("Link not copied: {e:#}");
        }
        Ok(())
    }
}
