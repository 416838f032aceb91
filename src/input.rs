//! Input simulation and modifier sampling
//!
//! Synthetic keys go through `rdev::simulate` (XTest on X11), which feeds the
//! seat's core key state: a synthetic release of a physically held Alt
//! really releases it, and a synthetic press is undone by the user's own
//! physical release. Physical modifier state is sampled from the kernel
//! keyboards under `/dev/input` with evdev.

use crate::error::{ChatError, ChatResult};
use crate::keys::KeyId;
use evdev::Key;
use rdev::EventType;
use std::collections::HashSet;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Gap after each synthetic event so the server sees them in order
const EVENT_GAP: Duration = Duration::from_millis(5);

/// Pressed/released flags for the modifiers the copy fallback cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierState {
    pub shift: bool,
    pub alt: bool,
}

impl ModifierState {
    /// Modifiers that are currently down, in release order
    pub fn held(self) -> Vec<KeyId> {
        let mut keys = Vec::new();
        if self.alt {
            keys.push(KeyId::Alt);
        }
        if self.shift {
            keys.push(KeyId::Shift);
        }
        keys
    }

    fn is_held(self, key: KeyId) -> bool {
        match key {
            KeyId::Alt => self.alt,
            KeyId::Shift => self.shift,
            _ => false,
        }
    }
}

/// Synthetic keyboard access used by the selection fallback
pub trait KeyboardControl {
    /// Shift/Alt as the focused application would see them right now,
    /// including the effect of earlier synthetic events
    fn modifier_state(&mut self) -> ChatResult<ModifierState>;

    /// Press a key (without releasing)
    fn key_down(&mut self, key: KeyId) -> ChatResult<()>;

    /// Release a key
    fn key_up(&mut self, key: KeyId) -> ChatResult<()>;
}

impl<K: KeyboardControl + ?Sized> KeyboardControl for Box<K> {
    fn modifier_state(&mut self) -> ChatResult<ModifierState> {
        (**self).modifier_state()
    }

    fn key_down(&mut self, key: KeyId) -> ChatResult<()> {
        (**self).key_down(key)
    }

    fn key_up(&mut self, key: KeyId) -> ChatResult<()> {
        (**self).key_up(key)
    }
}

/// Keyboard that injects into the shared seat and samples physical keys
#[derive(Debug, Default)]
pub struct SystemKeyboard {
    /// Physically held modifiers this process released and has not
    /// pressed again
    released: HashSet<KeyId>,
}

impl SystemKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn send(&mut self, event: EventType) -> ChatResult<()> {
        rdev::simulate(&event)
            .map_err(|e| ChatError::Input(format!("could not send {:?}: {:?}", event, e)))?;
        thread::sleep(EVENT_GAP);
        Ok(())
    }
}

impl KeyboardControl for SystemKeyboard {
    fn modifier_state(&mut self) -> ChatResult<ModifierState> {
        let physical = physical_modifiers()?;
        // A physical release wipes out our own earlier release of that key
        self.released.retain(|key| physical.is_held(*key));
        Ok(ModifierState {
            shift: physical.shift && !self.released.contains(&KeyId::Shift),
            alt: physical.alt && !self.released.contains(&KeyId::Alt),
        })
    }

    fn key_down(&mut self, key: KeyId) -> ChatResult<()> {
        debug!("Key down: {}", key);
        let code = to_rdev(key)
            .ok_or_else(|| ChatError::Input(format!("key {} cannot be synthesized", key)))?;
        self.send(EventType::KeyPress(code))?;
        self.released.remove(&key);
        Ok(())
    }

    fn key_up(&mut self, key: KeyId) -> ChatResult<()> {
        debug!("Key up: {}", key);
        let code = to_rdev(key)
            .ok_or_else(|| ChatError::Input(format!("key {} cannot be synthesized", key)))?;
        self.send(EventType::KeyRelease(code))?;
        if matches!(key, KeyId::Alt | KeyId::Shift) {
            self.released.insert(key);
        }
        Ok(())
    }
}

/// Stand-in used when synthetic input cannot be set up. Every call fails,
/// so the copy fallback yields nothing and touches no key.
#[derive(Debug, Clone)]
pub struct DisabledKeyboard {
    reason: String,
}

impl DisabledKeyboard {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> ChatError {
        ChatError::Input(format!("keyboard unavailable: {}", self.reason))
    }
}

impl KeyboardControl for DisabledKeyboard {
    fn modifier_state(&mut self) -> ChatResult<ModifierState> {
        Err(self.error())
    }

    fn key_down(&mut self, _key: KeyId) -> ChatResult<()> {
        Err(self.error())
    }

    fn key_up(&mut self, _key: KeyId) -> ChatResult<()> {
        Err(self.error())
    }
}

/// OR together the Shift/Alt state of every readable physical keyboard
fn physical_modifiers() -> ChatResult<ModifierState> {
    let mut state = ModifierState::default();
    let mut sampled = false;

    for (path, device) in evdev::enumerate() {
        let is_keyboard = device
            .supported_keys()
            .is_some_and(|keys| keys.contains(Key::KEY_A));
        if !is_keyboard {
            continue;
        }
        match device.get_key_state() {
            Ok(pressed) => {
                sampled = true;
                state.shift |=
                    pressed.contains(Key::KEY_LEFTSHIFT) || pressed.contains(Key::KEY_RIGHTSHIFT);
                state.alt |=
                    pressed.contains(Key::KEY_LEFTALT) || pressed.contains(Key::KEY_RIGHTALT);
            }
            Err(e) => debug!("Key state unavailable for {:?}: {}", path, e),
        }
    }

    if !sampled {
        return Err(ChatError::Input(
            "no readable keyboard device under /dev/input".to_string(),
        ));
    }
    Ok(state)
}

/// Map a logical key to the rdev key used to synthesize it
pub fn to_rdev(key: KeyId) -> Option<rdev::Key> {
    use rdev::Key as K;

    let code = match key {
        KeyId::Shift => K::ShiftLeft,
        KeyId::Control => K::ControlLeft,
        KeyId::Alt => K::Alt,
        KeyId::Meta => K::MetaLeft,
        KeyId::Letter(c) => match c {
            'A' => K::KeyA,
            'B' => K::KeyB,
            'C' => K::KeyC,
            'D' => K::KeyD,
            'E' => K::KeyE,
            'F' => K::KeyF,
            'G' => K::KeyG,
            'H' => K::KeyH,
            'I' => K::KeyI,
            'J' => K::KeyJ,
            'K' => K::KeyK,
            'L' => K::KeyL,
            'M' => K::KeyM,
            'N' => K::KeyN,
            'O' => K::KeyO,
            'P' => K::KeyP,
            'Q' => K::KeyQ,
            'R' => K::KeyR,
            'S' => K::KeyS,
            'T' => K::KeyT,
            'U' => K::KeyU,
            'V' => K::KeyV,
            'W' => K::KeyW,
            'X' => K::KeyX,
            'Y' => K::KeyY,
            'Z' => K::KeyZ,
            _ => return None,
        },
        KeyId::Space => K::Space,
        KeyId::Enter => K::Return,
        KeyId::Tab => K::Tab,
        KeyId::Escape => K::Escape,
        _ => return None,
    };
    Some(code)
}
