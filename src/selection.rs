//! Selection Acquirer
//!
//! Obtains the text highlighted in the foreground application. Two
//! strategies are tried in order:
//!
//! 1. The structured selection query (PRIMARY selection on Linux).
//! 2. A clipboard round-trip: synthesize the copy shortcut, read what the
//!    foreground app put on the clipboard, then put everything back.
//!
//! The second strategy touches process-wide shared state. All of it is
//! restored by [`RestoreGuard`] on every exit path, so the only thing a
//! caller can observe is the returned string.

use crate::error::{ChatError, ChatResult};
use crate::input::{KeyboardControl, ModifierState};
use crate::keys::KeyId;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Default wait for the foreground app to update the clipboard
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

/// Platform copy shortcut, pressed in order and released in reverse
pub const COPY_SHORTCUT: [KeyId; 2] = [KeyId::Control, KeyId::Letter('C')];

/// OS clipboard facility
pub trait ClipboardAccess {
    fn read(&mut self) -> ChatResult<String>;
    fn write(&mut self, text: &str) -> ChatResult<()>;
}

/// OS facility that reports the focused element's selected text.
/// `Ok(None)` means the facility has nothing for the focused element.
pub trait SelectionQuery {
    fn focused_selection(&mut self) -> ChatResult<Option<String>>;
}

/// Anything that can produce the current foreground selection.
/// Never fails: an empty string is a normal outcome.
pub trait SelectionSource {
    fn capture(&mut self) -> String;
}

/// Multi-strategy selection capture
pub struct SelectionAcquirer<A, C, K> {
    query: A,
    clipboard: C,
    keyboard: K,
    settle: Duration,
}

impl<A, C, K> SelectionAcquirer<A, C, K>
where
    A: SelectionQuery,
    C: ClipboardAccess,
    K: KeyboardControl,
{
    pub fn new(query: A, clipboard: C, keyboard: K) -> Self {
        Self {
            query,
            clipboard,
            keyboard,
            settle: DEFAULT_SETTLE,
        }
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// First strategy. Any failure is an empty result.
    fn query_selection(&mut self) -> String {
        match self.query.focused_selection() {
            Ok(Some(text)) => text.trim().to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                debug!("Selection query failed: {}", e);
                String::new()
            }
        }
    }

    /// Second strategy: copy shortcut round-trip with guaranteed restore.
    fn copy_selection(&mut self) -> String {
        let before = self.clipboard.read().unwrap_or_else(|e| {
            debug!("Clipboard read failed before copy: {}", e);
            String::new()
        });

        let held = self.keyboard.modifier_state().unwrap_or_else(|e| {
            debug!("Modifier state unavailable: {}", e);
            ModifierState::default()
        });

        let mut guard = RestoreGuard {
            clipboard: &mut self.clipboard,
            keyboard: &mut self.keyboard,
            before,
            released: Vec::new(),
        };

        if let Err(e) = guard.send_copy(held) {
            debug!("Copy shortcut not sent: {}", e);
        }

        thread::sleep(self.settle);

        let after = guard.clipboard.read().unwrap_or_else(|e| {
            debug!("Clipboard read failed after copy: {}", e);
            String::new()
        });

        let unchanged = after.is_empty() || after == guard.before;
        drop(guard);

        if unchanged {
            String::new()
        } else {
            after.trim().to_string()
        }
    }
}

impl<A, C, K> SelectionSource for SelectionAcquirer<A, C, K>
where
    A: SelectionQuery,
    C: ClipboardAccess,
    K: KeyboardControl,
{
    fn capture(&mut self) -> String {
        let text = self.query_selection();
        if !text.is_empty() {
            debug!("Selection from query: {} chars", text.chars().count());
            return text;
        }

        let text = self.copy_selection();
        debug!("Selection from copy fallback: {} chars", text.chars().count());
        text
    }
}

/// Holds the shared state borrowed by the copy fallback. Dropping it puts
/// the modifiers back first, then the clipboard, whatever happened before.
struct RestoreGuard<'a, C: ClipboardAccess, K: KeyboardControl> {
    clipboard: &'a mut C,
    keyboard: &'a mut K,
    before: String,
    /// Modifiers whose release took effect, so only those get pressed again
    released: Vec<KeyId>,
}

impl<C: ClipboardAccess, K: KeyboardControl> RestoreGuard<'_, C, K> {
    /// Lift `held` so they do not contaminate the shortcut. Fails when any
    /// modifier is still down afterwards.
    fn release_modifiers(&mut self, held: ModifierState) -> ChatResult<()> {
        let keys = held.held();
        if keys.is_empty() {
            return Ok(());
        }

        let mut lifted = Vec::with_capacity(keys.len());
        for key in keys {
            match self.keyboard.key_up(key) {
                Ok(()) => lifted.push(key),
                Err(e) => warn!("Failed to release {} before copy: {}", key, e),
            }
        }

        // Unreadable state counts as nothing released
        let now = self.keyboard.modifier_state().unwrap_or_else(|e| {
            debug!("Modifier state unavailable after release: {}", e);
            held
        });
        let still_held = now.held();
        self.released = lifted
            .into_iter()
            .filter(|key| !still_held.contains(key))
            .collect();

        if still_held.is_empty() {
            Ok(())
        } else {
            Err(ChatError::Input(format!(
                "modifiers still held: {:?}",
                still_held
            )))
        }
    }

    fn send_copy(&mut self, held: ModifierState) -> ChatResult<()> {
        self.release_modifiers(held)?;

        let mut pressed = Vec::with_capacity(COPY_SHORTCUT.len());
        let result: ChatResult<()> = COPY_SHORTCUT.iter().try_for_each(|&key| {
            self.keyboard.key_down(key)?;
            pressed.push(key);
            Ok(())
        });

        // Release whatever went down, even if a later press failed
        for key in pressed.into_iter().rev() {
            if let Err(e) = self.keyboard.key_up(key) {
                warn!("Failed to release {} after copy: {}", key, e);
            }
        }
        result
    }
}

impl<C: ClipboardAccess, K: KeyboardControl> Drop for RestoreGuard<'_, C, K> {
    fn drop(&mut self) {
        for key in self.released.iter().rev() {
            if let Err(e) = self.keyboard.key_down(*key) {
                warn!("⚠️ Failed to restore modifier {}: {}", key, e);
            }
        }
        if let Err(e) = self.clipboard.write(&self.before) {
            warn!("⚠️ Failed to restore clipboard: {}", e);
        }
    }
}
