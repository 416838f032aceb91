//! Logical key identifiers
//!
//! Platform-neutral key names shared by the hotkey monitor (which maps raw
//! hook events into them) and the synthetic keyboard (which maps them back
//! for injection).

use crate::error::{ChatError, ChatResult};
use std::collections::HashSet;
use std::fmt;

/// A logical key. Left/right variants of a modifier are the same key here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyId {
    Shift,
    Control,
    Alt,
    Meta,
    /// Uppercase ASCII letter
    Letter(char),
    /// ASCII digit
    Digit(char),
    /// Function key F1..=F12
    Function(u8),
    Space,
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyId::Shift => write!(f, "Shift"),
            KeyId::Control => write!(f, "Ctrl"),
            KeyId::Alt => write!(f, "Alt"),
            KeyId::Meta => write!(f, "Meta"),
            KeyId::Letter(c) | KeyId::Digit(c) => write!(f, "{}", c),
            KeyId::Function(n) => write!(f, "F{}", n),
            KeyId::Space => write!(f, "Space"),
            KeyId::Enter => write!(f, "Enter"),
            KeyId::Tab => write!(f, "Tab"),
            KeyId::Escape => write!(f, "Esc"),
            KeyId::Backspace => write!(f, "Backspace"),
            KeyId::Delete => write!(f, "Delete"),
            KeyId::Insert => write!(f, "Insert"),
            KeyId::Up => write!(f, "Up"),
            KeyId::Down => write!(f, "Down"),
            KeyId::Left => write!(f, "Left"),
            KeyId::Right => write!(f, "Right"),
            KeyId::Home => write!(f, "Home"),
            KeyId::End => write!(f, "End"),
            KeyId::PageUp => write!(f, "PageUp"),
            KeyId::PageDown => write!(f, "PageDown"),
        }
    }
}

/// Parse a key name string to a logical key
pub fn parse_key(name: &str) -> Option<KeyId> {
    let upper = name.trim().to_uppercase();

    let mut chars = upper.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return match c {
            'A'..='Z' => Some(KeyId::Letter(c)),
            '0'..='9' => Some(KeyId::Digit(c)),
            _ => None,
        };
    }

    if let Some(n) = upper.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=12).contains(&n).then_some(KeyId::Function(n));
    }

    match upper.as_str() {
        // Modifiers
        "SHIFT" | "LSHIFT" | "RSHIFT" => Some(KeyId::Shift),
        "CTRL" | "LCTRL" | "RCTRL" | "CONTROL" => Some(KeyId::Control),
        "ALT" | "LALT" | "RALT" | "ALTGR" | "OPTION" => Some(KeyId::Alt),
        "META" | "SUPER" | "WIN" | "CMD" => Some(KeyId::Meta),
        // Navigation
        "UP" => Some(KeyId::Up),
        "DOWN" => Some(KeyId::Down),
        "LEFT" => Some(KeyId::Left),
        "RIGHT" => Some(KeyId::Right),
        "HOME" => Some(KeyId::Home),
        "END" => Some(KeyId::End),
        "PAGEUP" | "PGUP" => Some(KeyId::PageUp),
        "PAGEDOWN" | "PGDN" => Some(KeyId::PageDown),
        // Common
        "SPACE" => Some(KeyId::Space),
        "ENTER" | "RETURN" => Some(KeyId::Enter),
        "TAB" => Some(KeyId::Tab),
        "ESC" | "ESCAPE" => Some(KeyId::Escape),
        "BACKSPACE" => Some(KeyId::Backspace),
        "DELETE" | "DEL" => Some(KeyId::Delete),
        "INSERT" | "INS" => Some(KeyId::Insert),
        _ => None,
    }
}

/// Keys that must be held together to trigger the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    keys: Vec<KeyId>,
}

impl KeyCombo {
    /// Build a combo from keys. Duplicates are collapsed; empty is rejected.
    pub fn new(keys: impl IntoIterator<Item = KeyId>) -> ChatResult<Self> {
        let mut unique: Vec<KeyId> = Vec::new();
        for key in keys {
            if !unique.contains(&key) {
                unique.push(key);
            }
        }
        if unique.is_empty() {
            return Err(ChatError::Config("hotkey combo is empty".to_string()));
        }
        Ok(Self { keys: unique })
    }

    /// Parse a combo like `"Alt+Q"` or `"ctrl + shift + space"`
    pub fn parse(spec: &str) -> ChatResult<Self> {
        let mut keys = Vec::new();
        for part in spec.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            let key = parse_key(part).ok_or_else(|| {
                ChatError::Config(format!("unknown key '{}' in hotkey '{}'", part, spec))
            })?;
            keys.push(key);
        }
        Self::new(keys)
    }

    pub fn keys(&self) -> &[KeyId] {
        &self.keys
    }

    /// True when every key of the combo is in `pressed`
    pub fn is_held(&self, pressed: &HashSet<KeyId>) -> bool {
        self.keys.iter().all(|k| pressed.contains(k))
    }
}

impl Default for KeyCombo {
    fn default() -> Self {
        Self {
            keys: vec![KeyId::Alt, KeyId::Letter('Q')],
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.keys.iter().map(ToString::to_string).collect();
        write!(f, "{}", names.join("+"))
    }
}
