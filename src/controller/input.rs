/// Platform-agnostic input handling system
use crate::utils::{Direction, UniqueList};

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    // Keyboard events
    KeyDown(String),
    KeyUp(String),

    // Window events
    FocusLost,
    FocusGained,
}

/// What a recognised key means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    /// Space: start, continue past a finished scene, or restart the level
    Advance,
}

/// Held movement keys, most recent last
#[derive(Debug, Default)]
pub struct InputState {
    pub held: UniqueList<Direction>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: UniqueList::new(),
        }
    }

    pub fn press(&mut self, dir: Direction) {
        self.held.push_unique(dir);
    }

    pub fn release(&mut self, dir: Direction) {
        self.held.remove(&dir);
    }

    /// The most recently pressed direction that is still held
    pub fn intent(&self) -> Option<Direction> {
        self.held.latest().copied()
    }

    pub fn clear_keys(&mut self) {
        self.held.clear();
    }
}

/// Key mapping configuration
#[derive(Clone, Debug)]
pub struct KeyBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub advance: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |names: &[&str]| -> Vec<String> { names.iter().map(|k| k.to_string()).collect() };
        Self {
            up: keys(&["ArrowUp", "w"]),
            down: keys(&["ArrowDown", "s"]),
            left: keys(&["ArrowLeft", "a"]),
            right: keys(&["ArrowRight", "d"]),
            advance: keys(&[" "]),
        }
    }
}

/// Translates key names (DOM `KeyboardEvent.key` spelling) into actions
#[derive(Clone, Debug, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn action_from_key(&self, key: &str) -> Option<KeyAction> {
        let matches = |names: &[String]| names.iter().any(|n| n.eq_ignore_ascii_case(key));
        if matches(&self.bindings.up) {
            Some(KeyAction::Move(Direction::Up))
        } else if matches(&self.bindings.down) {
            Some(KeyAction::Move(Direction::Down))
        } else if matches(&self.bindings.left) {
            Some(KeyAction::Move(Direction::Left))
        } else if matches(&self.bindings.right) {
            Some(KeyAction::Move(Direction::Right))
        } else if matches(&self.bindings.advance) || key == "Spacebar" {
            Some(KeyAction::Advance)
        } else {
            None
        }
    }

    /// Keys whose browser default (scrolling) must be suppressed
    pub fn is_handled(&self, key: &str) -> bool {
        self.action_from_key(key).is_some()
    }
}

pub mod wasm {
    use super::*;
    use web_sys::KeyboardEvent;

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> InputEvent {
        let key = e.key();
        if is_down {
            InputEvent::KeyDown(key)
        } else {
            InputEvent::KeyUp(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        let processor = InputProcessor::default();
        assert_eq!(processor.action_from_key("ArrowLeft"), Some(KeyAction::Move(Direction::Left)));
        assert_eq!(processor.action_from_key("a"), Some(KeyAction::Move(Direction::Left)));
        assert_eq!(processor.action_from_key("W"), Some(KeyAction::Move(Direction::Up)));
        assert_eq!(processor.action_from_key("s"), Some(KeyAction::Move(Direction::Down)));
        assert_eq!(processor.action_from_key("D"), Some(KeyAction::Move(Direction::Right)));
        assert_eq!(processor.action_from_key(" "), Some(KeyAction::Advance));
        assert_eq!(processor.action_from_key("q"), None);
        assert!(!processor.is_handled("Tab"));
    }

    #[test]
    fn latest_held_direction_wins() {
        let mut input = InputState::new();
        input.press(Direction::Left);
        input.press(Direction::Up);
        assert_eq!(input.intent(), Some(Direction::Up));
        // auto-repeat must not reorder
        input.press(Direction::Left);
        assert_eq!(input.intent(), Some(Direction::Up));
        input.release(Direction::Up);
        assert_eq!(input.intent(), Some(Direction::Left));
        input.release(Direction::Left);
        assert_eq!(input.intent(), None);
    }
}
