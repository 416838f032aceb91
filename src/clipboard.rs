//! System clipboard and PRIMARY selection access via arboard
//!
//! Both types have an `unavailable()` form for sessions without a display
//! server. Every call on it fails, which the selection acquirer treats as
//! "no selection".

use crate::error::{ChatError, ChatResult};
use crate::selection::{ClipboardAccess, SelectionQuery};
use arboard::Clipboard;
use tracing::debug;

fn unavailable_error() -> ChatError {
    ChatError::Clipboard("no clipboard connection".to_string())
}

/// The desktop CLIPBOARD, kept open for the process lifetime so that text
/// written back during restoration stays owned.
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> ChatResult<Self> {
        Ok(Self {
            inner: Some(Clipboard::new()?),
        })
    }

    pub fn unavailable() -> Self {
        Self { inner: None }
    }

    fn inner(&mut self) -> ChatResult<&mut Clipboard> {
        self.inner.as_mut().ok_or_else(unavailable_error)
    }
}

impl ClipboardAccess for SystemClipboard {
    fn read(&mut self) -> ChatResult<String> {
        match self.inner()?.get_text() {
            Ok(text) => Ok(text),
            // Empty or non-text clipboard reads as no text
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, text: &str) -> ChatResult<()> {
        let inner = self.inner()?;
        if text.is_empty() {
            inner.clear()?;
        } else {
            inner.set_text(text)?;
        }
        Ok(())
    }
}

/// The text the focused application currently highlights, read from the
/// X11/Wayland PRIMARY selection. Reading it never touches the CLIPBOARD.
pub struct PrimarySelection {
    inner: Option<Clipboard>,
}

impl PrimarySelection {
    pub fn new() -> ChatResult<Self> {
        Ok(Self {
            inner: Some(Clipboard::new()?),
        })
    }

    pub fn unavailable() -> Self {
        Self { inner: None }
    }
}

#[cfg(all(unix, not(any(target_os = "macos", target_os = "android"))))]
impl SelectionQuery for PrimarySelection {
    fn focused_selection(&mut self) -> ChatResult<Option<String>> {
        use arboard::{GetExtLinux, LinuxClipboardKind};

        let inner = self.inner.as_mut().ok_or_else(unavailable_error)?;
        match inner.get().clipboard(LinuxClipboardKind::Primary).text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => {
                debug!("PRIMARY selection unreadable: {}", e);
                Err(e.into())
            }
        }
    }
}

#[cfg(not(all(unix, not(any(target_os = "macos", target_os = "android")))))]
impl SelectionQuery for PrimarySelection {
    fn focused_selection(&mut self) -> ChatResult<Option<String>> {
        if self.inner.is_none() {
            return Err(unavailable_error());
        }
        debug!("No PRIMARY selection on this platform");
        Ok(None)
    }
}
