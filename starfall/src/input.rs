use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Keys currently held down.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key going down.
    pub fn press(&mut self, key: KeyCode) {
        self.keys_down.insert(key);
    }

    /// Record a key going up.
    pub fn release(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Returns true if the key is currently held down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }
}

/// Snapshot of the arrow keys the player controller reads each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

impl CursorKeys {
    pub fn read(input: &InputState) -> Self {
        Self {
            left: input.is_key_down(KeyCode::ArrowLeft),
            right: input.is_key_down(KeyCode::ArrowRight),
            up: input.is_key_down(KeyCode::ArrowUp),
        }
    }
}
