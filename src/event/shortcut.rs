//! Keyboard shortcuts bound to components, e.g. a button's click shortcut.
//!
//! The declarative form joins modifiers and key with `-`: `ctrl-shift-s`,
//! `enter`, `alt-f4`, `arrow_up`.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::design::DesignValue;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key of a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Space,
    Backspace,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

const NAMED_KEYS: &[(&str, Key)] = &[
    ("enter", Key::Enter),
    ("escape", Key::Escape),
    ("tab", Key::Tab),
    ("spacebar", Key::Space),
    ("backspace", Key::Backspace),
    ("delete", Key::Delete),
    ("insert", Key::Insert),
    ("arrow_left", Key::Left),
    ("arrow_right", Key::Right),
    ("arrow_up", Key::Up),
    ("arrow_down", Key::Down),
    ("home", Key::Home),
    ("end", Key::End),
    ("page_up", Key::PageUp),
    ("page_down", Key::PageDown),
];

impl Key {
    fn parse(name: &str) -> Option<Key> {
        if let Some((_, key)) = NAMED_KEYS.iter().find(|(n, _)| *n == name) {
            return Some(*key);
        }
        if let Some(n) = name.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            return (1..=12).contains(&n).then_some(Key::F(n));
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => Some(Key::Char(c)),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::F(n) => write!(f, "f{n}"),
            named => {
                let name = NAMED_KEYS
                    .iter()
                    .find(|(_, key)| key == named)
                    .map_or("", |(name, _)| name);
                f.write_str(name)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);
    pub const META: Modifiers = Modifiers(8);

    /// Names in declarative order.
    const NAMES: [(&'static str, Modifiers); 4] = [
        ("alt", Modifiers::ALT),
        ("ctrl", Modifiers::CTRL),
        ("meta", Modifiers::META),
        ("shift", Modifiers::SHIFT),
    ];

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Shortcut
// ---------------------------------------------------------------------------

/// A key plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Shortcut {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Parse the declarative form. Names are case-insensitive.
    pub fn parse(input: &str) -> Option<Shortcut> {
        let input = input.trim().to_ascii_lowercase();
        let mut parts: Vec<&str> = input.split('-').collect();
        let key = Key::parse(parts.pop()?)?;
        let mut modifiers = Modifiers::NONE;
        for part in parts {
            let (_, modifier) = Modifiers::NAMES.iter().find(|(name, _)| *name == part)?;
            modifiers = modifiers | *modifier;
        }
        Some(Shortcut { key, modifiers })
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, modifier) in Modifiers::NAMES {
            if self.modifiers.contains(modifier) {
                write!(f, "{name}-")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

impl DesignValue for Shortcut {
    fn to_design(&self) -> String {
        self.to_string()
    }

    fn from_design(text: &str) -> Result<Self, String> {
        Shortcut::parse(text).ok_or_else(|| format!("unknown shortcut '{text}'"))
    }
}
