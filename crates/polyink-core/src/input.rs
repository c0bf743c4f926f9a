//! Keyboard input delivered to actions.

use serde::{Deserialize, Serialize};

/// Key identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Character(char),
    Other(String),
}

/// A key-down event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key }
    }

    pub fn is_escape(&self) -> bool {
        self.key == Key::Escape
    }

    pub fn is_enter(&self) -> bool {
        self.key == Key::Enter
    }
}
