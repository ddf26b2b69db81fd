//! Conversion from crossterm key events and configurable key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers as CtModifiers};
use fogterm_core::{Key, KeyInfo, KeyModifiers, KeyParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Convert a crossterm key event into a [`KeyInfo`].
///
/// Releases and keys without a symbolic equivalent yield `None`.
#[must_use]
pub fn convert_key(event: &KeyEvent) -> Option<KeyInfo> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let key = match event.code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) if (1..=24).contains(&n) => Key::F(n),
        // Unknown keys are ignored
        _ => return None,
    };

    Some(KeyInfo::new(key).with_modifiers(convert_modifiers(event.modifiers)))
}

fn convert_modifiers(modifiers: CtModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: modifiers.contains(CtModifiers::SHIFT),
        control: modifiers.contains(CtModifiers::CONTROL),
        alt: modifiers.contains(CtModifiers::ALT),
    }
}

/// A key plus the modifiers that must be held, e.g. `ctrl+c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyBinding {
    /// Key code.
    pub key: Key,
    /// Required modifiers.
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a new key binding.
    #[must_use]
    pub const fn new(key: Key, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a simple key binding without modifiers.
    #[must_use]
    pub const fn simple(key: Key) -> Self {
        Self::new(key, KeyModifiers::NONE)
    }

    /// Check if this binding matches a key press.
    ///
    /// Letters match case-insensitively so `ctrl+c` also fires when the
    /// terminal reports `C` with shift.
    #[must_use]
    pub fn matches(&self, info: &KeyInfo) -> bool {
        let same_key = match (self.key, info.key) {
            (Key::Char(a), Key::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        same_key
            && (!self.modifiers.control || info.modifiers.control)
            && (!self.modifiers.alt || info.modifiers.alt)
            && (!self.modifiers.shift || info.modifiers.shift)
    }
}

impl Default for KeyBinding {
    fn default() -> Self {
        Self::new(Key::Char('c'), KeyModifiers::CONTROL)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.control {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.alt {
            f.write_str("alt+")?;
        }
        if self.modifiers.shift {
            f.write_str("shift+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            other => write!(f, "{}", other.to_string().to_ascii_lowercase()),
        }
    }
}

impl FromStr for KeyBinding {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // "+" and "ctrl++" name the plus key itself
        let (prefix, key) = if trimmed == "+" {
            ("", "+")
        } else {
            match trimmed.rsplit_once('+') {
                Some((prefix, "")) => match prefix.strip_suffix('+') {
                    Some(prefix) => (prefix, "+"),
                    None => return Err(KeyParseError(s.to_string())),
                },
                Some(pair) => pair,
                None => ("", trimmed),
            }
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            match part.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.control = true,
                "alt" | "meta" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                _ => return Err(KeyParseError(s.to_string())),
            }
        }
        if key.is_empty() {
            return Err(KeyParseError(s.to_string()));
        }
        let key = key.parse::<Key>().map_err(|_| KeyParseError(s.to_string()))?;
        Ok(Self { key, modifiers })
    }
}

impl TryFrom<String> for KeyBinding {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyBinding> for String {
    fn from(binding: KeyBinding) -> Self {
        binding.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: CtModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_convert_printable() {
        let info = convert_key(&press(KeyCode::Char('a'), CtModifiers::NONE)).unwrap();
        assert_eq!(info.key, Key::Char('a'));
        assert_eq!(info.character, Some('a'));
        assert!(info.modifiers.is_empty());
    }

    #[test]
    fn test_convert_space_keeps_character() {
        let info = convert_key(&press(KeyCode::Char(' '), CtModifiers::NONE)).unwrap();
        assert_eq!(info.key, Key::Space);
        assert_eq!(info.character, Some(' '));
    }

    #[test]
    fn test_convert_navigation_keys() {
        for (code, key) in [
            (KeyCode::Tab, Key::Tab),
            (KeyCode::Up, Key::Up),
            (KeyCode::Down, Key::Down),
            (KeyCode::Left, Key::Left),
            (KeyCode::Right, Key::Right),
            (KeyCode::Enter, Key::Enter),
            (KeyCode::Esc, Key::Escape),
            (KeyCode::F(5), Key::F(5)),
        ] {
            let info = convert_key(&press(code, CtModifiers::NONE)).unwrap();
            assert_eq!(info.key, key);
            assert_eq!(info.character, None);
        }
    }

    #[test]
    fn test_convert_modifiers() {
        let info = convert_key(&press(
            KeyCode::Char('c'),
            CtModifiers::CONTROL | CtModifiers::SHIFT,
        ))
        .unwrap();
        assert!(info.modifiers.control);
        assert!(info.modifiers.shift);
        assert!(!info.modifiers.alt);
    }

    #[test]
    fn test_convert_ignores_release_and_unknown() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: CtModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(convert_key(&release).is_none());
        assert!(convert_key(&press(KeyCode::CapsLock, CtModifiers::NONE)).is_none());
        assert!(convert_key(&press(KeyCode::F(30), CtModifiers::NONE)).is_none());
    }

    #[test]
    fn test_binding_parse() {
        let b: KeyBinding = "ctrl+c".parse().unwrap();
        assert_eq!(b, KeyBinding::default());

        let b: KeyBinding = "Alt+Shift+F4".parse().unwrap();
        assert_eq!(b.key, Key::F(4));
        assert!(b.modifiers.alt && b.modifiers.shift && !b.modifiers.control);

        let b: KeyBinding = "esc".parse().unwrap();
        assert_eq!(b, KeyBinding::simple(Key::Escape));

        let b: KeyBinding = "ctrl++".parse().unwrap();
        assert_eq!(b.key, Key::Char('+'));
        assert!(b.modifiers.control);
    }

    #[test]
    fn test_binding_parse_errors() {
        assert!("hyper+c".parse::<KeyBinding>().is_err());
        assert!("ctrl+".parse::<KeyBinding>().is_err());
        assert!("ctrl+nope".parse::<KeyBinding>().is_err());
        assert!("".parse::<KeyBinding>().is_err());
    }

    #[test]
    fn test_binding_display_roundtrips_through_parse() {
        let b: KeyBinding = "ctrl+alt+pagedown".parse().unwrap();
        assert_eq!(b.to_string(), "ctrl+alt+pagedown");
        assert_eq!(b.to_string().parse::<KeyBinding>().unwrap(), b);
    }

    #[test]
    fn test_binding_matches() {
        let quit = KeyBinding::default();
        let ctrl_c = KeyInfo::new(Key::Char('c')).with_modifiers(KeyModifiers::CONTROL);
        let ctrl_shift_c = KeyInfo::new(Key::Char('C')).with_modifiers(KeyModifiers {
            shift: true,
            control: true,
            alt: false,
        });
        assert!(quit.matches(&ctrl_c));
        assert!(quit.matches(&ctrl_shift_c));
        assert!(!quit.matches(&KeyInfo::new(Key::Char('c'))));
        assert!(!quit.matches(&KeyInfo::new(Key::Char('x')).with_modifiers(KeyModifiers::CONTROL)));
    }
}
