//! Key input model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbolic key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable character (space is [`Key::Space`])
    Char(char),
    /// Space bar
    Space,
    /// Tab
    Tab,
    /// Shift+Tab as reported by most terminals
    BackTab,
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// Backspace
    Backspace,
    /// Delete
    Delete,
    /// Insert
    Insert,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Home
    Home,
    /// End
    End,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Function key F1..F24
    F(u8),
}

impl Key {
    /// True for the four arrow keys.
    #[must_use]
    pub const fn is_arrow(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::F(n) => write!(f, "F{n}"),
            Self::Space => f.write_str("Space"),
            Self::Tab => f.write_str("Tab"),
            Self::BackTab => f.write_str("BackTab"),
            Self::Enter => f.write_str("Enter"),
            Self::Escape => f.write_str("Esc"),
            Self::Backspace => f.write_str("Backspace"),
            Self::Delete => f.write_str("Delete"),
            Self::Insert => f.write_str("Insert"),
            Self::Up => f.write_str("Up"),
            Self::Down => f.write_str("Down"),
            Self::Left => f.write_str("Left"),
            Self::Right => f.write_str("Right"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::PageUp => f.write_str("PageUp"),
            Self::PageDown => f.write_str("PageDown"),
        }
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(if c == ' ' { Self::Space } else { Self::Char(c) });
        }

        let key = match s.to_ascii_lowercase().as_str() {
            "space" => Self::Space,
            "tab" => Self::Tab,
            "backtab" => Self::BackTab,
            "enter" | "return" => Self::Enter,
            "esc" | "escape" => Self::Escape,
            "backspace" => Self::Backspace,
            "delete" | "del" => Self::Delete,
            "insert" | "ins" => Self::Insert,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" => Self::PageUp,
            "pagedown" => Self::PageDown,
            other => {
                let n = other
                    .strip_prefix('f')
                    .and_then(|n| n.parse::<u8>().ok())
                    .filter(|n| (1..=24).contains(n))
                    .ok_or_else(|| KeyParseError(s.to_string()))?;
                Self::F(n)
            }
        };
        Ok(key)
    }
}

/// Error returned when a key name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key name: {0:?}")]
pub struct KeyParseError(pub String);

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyModifiers {
    /// Shift held
    pub shift: bool,
    /// Control held
    pub control: bool,
    /// Alt held
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifier held.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Control only.
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };

    /// True if no modifier is held.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.shift && !self.control && !self.alt
    }
}

/// One key press as delivered by the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInfo {
    /// Symbolic key code
    pub key: Key,
    /// Literal character, if the key is printable
    pub character: Option<char>,
    /// Modifiers held
    pub modifiers: KeyModifiers,
}

impl KeyInfo {
    /// Key press without modifiers.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        let character = match key {
            Key::Char(c) => Some(c),
            Key::Space => Some(' '),
            _ => None,
        };
        Self {
            key,
            character,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Same key press with the given modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl From<Key> for KeyInfo {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_info_character() {
        assert_eq!(KeyInfo::new(Key::Char('x')).character, Some('x'));
        assert_eq!(KeyInfo::new(Key::Space).character, Some(' '));
        assert_eq!(KeyInfo::new(Key::Tab).character, None);
    }

    #[test]
    fn test_key_parse_names() {
        assert_eq!("tab".parse(), Ok(Key::Tab));
        assert_eq!("Esc".parse(), Ok(Key::Escape));
        assert_eq!("q".parse(), Ok(Key::Char('q')));
        assert_eq!(" ".parse(), Ok(Key::Space));
        assert_eq!("F5".parse(), Ok(Key::F(5)));
        assert_eq!("PageDown".parse(), Ok(Key::PageDown));
    }

    #[test]
    fn test_key_parse_rejects_unknown() {
        assert!("hyper".parse::<Key>().is_err());
        assert!("f0".parse::<Key>().is_err());
        assert!("f25".parse::<Key>().is_err());
    }

    #[test]
    fn test_key_display_roundtrips_through_parse() {
        for key in [Key::Tab, Key::Up, Key::F(12), Key::Char('a'), Key::Escape] {
            assert_eq!(key.to_string().parse::<Key>(), Ok(key));
        }
    }

    #[test]
    fn test_is_arrow() {
        assert!(Key::Up.is_arrow());
        assert!(Key::Right.is_arrow());
        assert!(!Key::Tab.is_arrow());
    }
}
