//! Key events understood by the picker.

use std::fmt;

/// Represents a key relevant to the query field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Backspace key.
    Backspace,
    /// Forward delete key.
    Delete,
    /// Enter/Return key.
    Enter,
    /// A character key.
    Char(char),
    /// Any other key.
    Other,
}

impl KeyCode {
    /// Maps a legacy DOM `keyCode` number.
    pub fn from_dom(code: u32) -> Self {
        match code {
            8 => KeyCode::Backspace,
            13 => KeyCode::Enter,
            37 => KeyCode::Left,
            38 => KeyCode::Up,
            39 => KeyCode::Right,
            40 => KeyCode::Down,
            46 => KeyCode::Delete,
            48..=57 | 65..=90 => char::from_u32(code).map_or(KeyCode::Other, KeyCode::Char),
            _ => KeyCode::Other,
        }
    }

    /// Returns true for letters and digits, the keys that edit the query.
    #[must_use]
    pub fn is_alphanumeric(&self) -> bool {
        matches!(self, KeyCode::Char(c) if c.is_alphanumeric())
    }

    /// Returns the horizontal direction of a left/right arrow.
    #[must_use]
    pub fn horizontal_direction(&self) -> Option<isize> {
        match self {
            KeyCode::Left => Some(-1),
            KeyCode::Right => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::Left => write!(f, "left"),
            KeyCode::Right => write!(f, "right"),
            KeyCode::Backspace => write!(f, "backspace"),
            KeyCode::Delete => write!(f, "delete"),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Other => write!(f, "other"),
        }
    }
}

/// Whether the event is the key going down or coming back up.
///
/// Enter is handled when pressed, so the embedding form can be stopped from
/// submitting. Every other key is handled on release, after the query text
/// has been updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyPhase {
    Press,
    #[default]
    Release,
}

/// A key event from the query field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub phase: KeyPhase,
    /// Whether the caret sits at the start of the query field.
    pub caret_at_start: bool,
}

impl KeyEvent {
    pub fn press(code: KeyCode) -> Self {
        Self {
            code,
            phase: KeyPhase::Press,
            caret_at_start: false,
        }
    }

    pub fn release(code: KeyCode) -> Self {
        Self {
            code,
            phase: KeyPhase::Release,
            caret_at_start: false,
        }
    }

    pub fn with_caret_at_start(mut self, at_start: bool) -> Self {
        self.caret_at_start = at_start;
        self
    }
}
