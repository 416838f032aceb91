//! Hotkey Monitor
//!
//! A dedicated thread receives every system-wide key event through the
//! global input hook (rdev), keeps its own pressed-key set and posts
//! [`AppEvent::Trigger`] when the configured combo is held. The pressed set
//! never leaves this thread.

use crate::error::{ChatError, ChatResult};
use crate::events::{AppEvent, EventSender};
use crate::keys::{KeyCombo, KeyId};
use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Minimum time between two accepted triggers
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Raw key transition, already mapped to a logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(KeyId),
    Up(KeyId),
}

/// Combo matching and debounce, independent of any OS hook
#[derive(Debug)]
pub struct ComboMatcher {
    combo: KeyCombo,
    debounce: Duration,
    pressed: HashSet<KeyId>,
    last_fire: Option<Instant>,
}

impl ComboMatcher {
    pub fn new(combo: KeyCombo, debounce: Duration) -> Self {
        Self {
            combo,
            debounce,
            pressed: HashSet::new(),
            last_fire: None,
        }
    }

    /// Feed one event; true when it should fire a trigger.
    /// Matches inside the debounce window are dropped, not queued.
    pub fn handle(&mut self, event: KeyEvent, now: Instant) -> bool {
        match event {
            KeyEvent::Up(key) => {
                self.pressed.remove(&key);
                false
            }
            KeyEvent::Down(key) => {
                self.pressed.insert(key);
                if !self.combo.is_held(&self.pressed) {
                    return false;
                }
                let ready = self
                    .last_fire
                    .map_or(true, |last| now.saturating_duration_since(last) >= self.debounce);
                if ready {
                    self.last_fire = Some(now);
                }
                ready
            }
        }
    }

    pub fn pressed(&self) -> &HashSet<KeyId> {
        &self.pressed
    }
}

/// Start the monitor thread. Hook installation failure is reported once
/// through `events` as [`AppEvent::HotkeyUnavailable`] and the thread exits.
pub fn spawn_monitor(
    combo: KeyCombo,
    debounce: Duration,
    events: EventSender,
) -> ChatResult<thread::JoinHandle<()>> {
    info!("⌨️ Hotkey monitor watching {}", combo);

    let handle = thread::Builder::new()
        .name("hotkey-monitor".to_string())
        .spawn(move || {
            let mut matcher = ComboMatcher::new(combo, debounce);
            let trigger_tx = events.clone();

            let result = rdev::listen(move |event| {
                let key_event = match event.event_type {
                    rdev::EventType::KeyPress(key) => map_key(key).map(KeyEvent::Down),
                    rdev::EventType::KeyRelease(key) => map_key(key).map(KeyEvent::Up),
                    _ => None,
                };
                let Some(key_event) = key_event else {
                    return;
                };

                if matcher.handle(key_event, Instant::now()) {
                    debug!("Hotkey fired");
                    // Receiver gone means the app is shutting down
                    let _ = trigger_tx.send(AppEvent::Trigger);
                }
            });

            if let Err(e) = result {
                let err = ChatError::Hook(format!("{:?}", e));
                error!("❌ {}", err);
                let _ = events.send(AppEvent::HotkeyUnavailable(err.to_string()));
            }
        })?;

    Ok(handle)
}

/// Map an rdev key to a logical key
pub fn map_key(key: rdev::Key) -> Option<KeyId> {
    use rdev::Key as K;

    let id = match key {
        K::ShiftLeft | K::ShiftRight => KeyId::Shift,
        K::ControlLeft | K::ControlRight => KeyId::Control,
        K::Alt | K::AltGr => KeyId::Alt,
        K::MetaLeft | K::MetaRight => KeyId::Meta,
        // Letters
        K::KeyA => KeyId::Letter('A'),
        K::KeyB => KeyId::Letter('B'),
        K::KeyC => KeyId::Letter('C'),
        K::KeyD => KeyId::Letter('D'),
        K::KeyE => KeyId::Letter('E'),
        K::KeyF => KeyId::Letter('F'),
        K::KeyG => KeyId::Letter('G'),
        K::KeyH => KeyId::Letter('H'),
        K::KeyI => KeyId::Letter('I'),
        K::KeyJ => KeyId::Letter('J'),
        K::KeyK => KeyId::Letter('K'),
        K::KeyL => KeyId::Letter('L'),
        K::KeyM => KeyId::Letter('M'),
        K::KeyN => KeyId::Letter('N'),
        K::KeyO => KeyId::Letter('O'),
        K::KeyP => KeyId::Letter('P'),
        K::KeyQ => KeyId::Letter('Q'),
        K::KeyR => KeyId::Letter('R'),
        K::KeyS => KeyId::Letter('S'),
        K::KeyT => KeyId::Letter('T'),
        K::KeyU => KeyId::Letter('U'),
        K::KeyV => KeyId::Letter('V'),
        K::KeyW => KeyId::Letter('W'),
        K::KeyX => KeyId::Letter('X'),
        K::KeyY => KeyId::Letter('Y'),
        K::KeyZ => KeyId::Letter('Z'),
        // Numbers
        K::Num0 => KeyId::Digit('0'),
        K::Num1 => KeyId::Digit('1'),
        K::Num2 => KeyId::Digit('2'),
        K::Num3 => KeyId::Digit('3'),
        K::Num4 => KeyId::Digit('4'),
        K::Num5 => KeyId::Digit('5'),
        K::Num6 => KeyId::Digit('6'),
        K::Num7 => KeyId::Digit('7'),
        K::Num8 => KeyId::Digit('8'),
        K::Num9 => KeyId::Digit('9'),
        // Function keys
        K::F1 => KeyId::Function(1),
        K::F2 => KeyId::Function(2),
        K::F3 => KeyId::Function(3),
        K::F4 => KeyId::Function(4),
        K::F5 => KeyId::Function(5),
        K::F6 => KeyId::Function(6),
        K::F7 => KeyId::Function(7),
        K::F8 => KeyId::Function(8),
        K::F9 => KeyId::Function(9),
        K::F10 => KeyId::Function(10),
        K::F11 => KeyId::Function(11),
        K::F12 => KeyId::Function(12),
        // Navigation
        K::UpArrow => KeyId::Up,
        K::DownArrow => KeyId::Down,
        K::LeftArrow => KeyId::Left,
        K::RightArrow => KeyId::Right,
        K::Home => KeyId::Home,
        K::End => KeyId::End,
        K::PageUp => KeyId::PageUp,
        K::PageDown => KeyId::PageDown,
        // Common
        K::Space => KeyId::Space,
        K::Return | K::KpReturn => KeyId::Enter,
        K::Tab => KeyId::Tab,
        K::Escape => KeyId::Escape,
        K::Backspace => KeyId::Backspace,
        K::Delete => KeyId::Delete,
        K::Insert => KeyId::Insert,
        _ => return None,
    };
    Some(id)
}
