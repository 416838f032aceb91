//! Mock desktop: clipboard, keyboard and selection query sharing one state
//!
//! Pressing the copy shortcut while a foreground selection exists puts that
//! selection on the clipboard, the way a real application would.
//!
//! Two seat models are available. The shared one lets synthetic events
//! change the same key state the user's keyboard drives. The per-device one
//! gives synthetic events their own device: a release of a key that device
//! does not have down is dropped, and the seat is the union of both devices.

use mousechat::error::{ChatError, ChatResult};
use mousechat::input::{KeyboardControl, ModifierState};
use mousechat::keys::KeyId;
use mousechat::selection::{ClipboardAccess, SelectionQuery};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct DesktopState {
    pub clipboard: String,
    /// What the foreground app copies on Ctrl+C; `None` = unresponsive app
    pub app_selection: Option<String>,
    /// Keys held on the user's physical keyboard
    pub pressed: HashSet<KeyId>,
    /// Synthetic events land on their own device
    pub per_device: bool,
    /// Keys down on the synthetic device (per-device model only)
    pub synthetic: HashSet<KeyId>,
    pub clipboard_reads: usize,
    pub clipboard_writes: Vec<String>,
    pub key_log: Vec<(KeyId, bool)>,

    // Fault injection
    /// 1-based clipboard read that fails
    pub fail_read: Option<usize>,
    pub fail_write: bool,
    pub fail_modifier_query: bool,
    /// Key whose key_down fails
    pub fail_key_down: Option<KeyId>,
    /// Key whose key_up fails
    pub fail_key_up: Option<KeyId>,
}

impl DesktopState {
    /// Keys the focused application sees as held
    pub fn seat(&self) -> HashSet<KeyId> {
        if self.per_device {
            self.pressed.union(&self.synthetic).copied().collect()
        } else {
            self.pressed.clone()
        }
    }
}

#[derive(Clone, Default)]
pub struct MockDesktop {
    state: Arc<Mutex<DesktopState>>,
}

impl MockDesktop {
    pub fn new(clipboard: &str, app_selection: Option<&str>) -> Self {
        let desktop = Self::default();
        {
            let mut state = desktop.state();
            state.clipboard = clipboard.to_string();
            state.app_selection = app_selection.map(str::to_string);
        }
        desktop
    }

    pub fn per_device(clipboard: &str, app_selection: Option<&str>) -> Self {
        let desktop = Self::new(clipboard, app_selection);
        desktop.state().per_device = true;
        desktop
    }

    pub fn state(&self) -> MutexGuard<'_, DesktopState> {
        self.state.lock().unwrap()
    }

    pub fn hold(&self, key: KeyId) -> &Self {
        self.state().pressed.insert(key);
        self
    }

    /// The user lets go of a physical key
    pub fn release(&self, key: KeyId) -> &Self {
        self.state().pressed.remove(&key);
        self
    }

    pub fn clipboard(&self) -> MockClipboard {
        MockClipboard(self.clone())
    }

    pub fn keyboard(&self) -> MockKeyboard {
        MockKeyboard(self.clone())
    }
}

pub struct MockClipboard(MockDesktop);

impl ClipboardAccess for MockClipboard {
    fn read(&mut self) -> ChatResult<String> {
        let mut state = self.0.state();
        state.clipboard_reads += 1;
        if state.fail_read == Some(state.clipboard_reads) {
            return Err(ChatError::Clipboard("injected read failure".into()));
        }
        Ok(state.clipboard.clone())
    }

    fn write(&mut self, text: &str) -> ChatResult<()> {
        let mut state = self.0.state();
        if state.fail_write {
            return Err(ChatError::Clipboard("injected write failure".into()));
        }
        state.clipboard_writes.push(text.to_string());
        state.clipboard = text.to_string();
        Ok(())
    }
}

pub struct MockKeyboard(MockDesktop);

impl KeyboardControl for MockKeyboard {
    fn modifier_state(&mut self) -> ChatResult<ModifierState> {
        let state = self.0.state();
        if state.fail_modifier_query {
            return Err(ChatError::Input("injected modifier failure".into()));
        }
        let seat = state.seat();
        Ok(ModifierState {
            shift: seat.contains(&KeyId::Shift),
            alt: seat.contains(&KeyId::Alt),
        })
    }

    fn key_down(&mut self, key: KeyId) -> ChatResult<()> {
        let mut state = self.0.state();
        if state.fail_key_down == Some(key) {
            return Err(ChatError::Input(format!("injected failure pressing {}", key)));
        }
        state.key_log.push((key, true));
        if state.per_device {
            state.synthetic.insert(key);
        } else {
            state.pressed.insert(key);
        }

        let seat = state.seat();
        let copy = key == KeyId::Letter('C')
            && seat.contains(&KeyId::Control)
            && !seat.contains(&KeyId::Alt)
            && !seat.contains(&KeyId::Shift);
        if copy {
            if let Some(selection) = state.app_selection.clone() {
                state.clipboard = selection;
            }
        }
        Ok(())
    }

    fn key_up(&mut self, key: KeyId) -> ChatResult<()> {
        let mut state = self.0.state();
        if state.fail_key_up == Some(key) {
            return Err(ChatError::Input(format!("injected failure releasing {}", key)));
        }
        state.key_log.push((key, false));
        if state.per_device {
            // Not down on this device: dropped
            state.synthetic.remove(&key);
        } else {
            state.pressed.remove(&key);
        }
        Ok(())
    }
}

/// Selection query returning a fixed answer
pub struct MockQuery {
    pub answer: Result<Option<String>, String>,
    pub calls: usize,
}

impl MockQuery {
    pub fn text(text: &str) -> Self {
        Self {
            answer: Ok(Some(text.to_string())),
            calls: 0,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            answer: Ok(None),
            calls: 0,
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: Err("no focused element".to_string()),
            calls: 0,
        }
    }
}

impl SelectionQuery for MockQuery {
    fn focused_selection(&mut self) -> ChatResult<Option<String>> {
        self.calls += 1;
        self.answer
            .clone()
            .map_err(ChatError::Accessibility)
    }
}
