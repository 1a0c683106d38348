// Key repeat handling for the console
//
// Two behaviors:
// - State-change keys fire once per press (actions that hit the server)
// - Repeatable keys fire on press, then repeat while held (navigation)
//
// Text entry (modals, settings fields) bypasses this handler entirely so
// fast typing of repeated characters is never swallowed.

use crossterm::event::KeyCode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Minimum gap before a held state-change key fires again; covers terminals
/// that never send release events
const STATE_CHANGE_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy)]
pub enum KeyBehavior {
    StateChange,
    Repeatable {
        initial_delay: Duration,
        repeat_interval: Duration,
    },
}

impl KeyBehavior {
    /// Arrow keys and j/k
    pub fn navigation() -> Self {
        Self::Repeatable {
            initial_delay: Duration::from_millis(500),
            repeat_interval: Duration::from_millis(50),
        }
    }

    /// PageUp/PageDown
    pub fn fast_navigation() -> Self {
        Self::Repeatable {
            initial_delay: Duration::from_millis(300),
            repeat_interval: Duration::from_millis(30),
        }
    }
}

#[derive(Debug, Default)]
struct KeyState {
    pressed_at: Option<Instant>,
    last_fired: Option<Instant>,
}

pub struct InputHandler {
    states: HashMap<KeyCode, KeyState>,
    behaviors: HashMap<KeyCode, KeyBehavior>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            behaviors: HashMap::new(),
        }
    }

    pub fn configure_key(&mut self, key: KeyCode, behavior: KeyBehavior) {
        self.behaviors.insert(key, behavior);
    }

    pub fn configure_keys(&mut self, keys: &[KeyCode], behavior: KeyBehavior) {
        for key in keys {
            self.configure_key(*key, behavior);
        }
    }

    /// Returns true if the key's action should run
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        let now = Instant::now();
        let behavior = self
            .behaviors
            .get(&key)
            .copied()
            .unwrap_or(KeyBehavior::StateChange);
        let state = self.states.entry(key).or_default();

        let (Some(pressed_at), Some(last_fired)) = (state.pressed_at, state.last_fired) else {
            state.pressed_at = Some(now);
            state.last_fired = Some(now);
            return true;
        };

        let fire = match behavior {
            KeyBehavior::StateChange => now.duration_since(last_fired) >= STATE_CHANGE_DEBOUNCE,
            KeyBehavior::Repeatable {
                initial_delay,
                repeat_interval,
            } => {
                now.duration_since(pressed_at) >= initial_delay
                    && now.duration_since(last_fired) >= repeat_interval
            }
        };
        if fire {
            state.last_fired = Some(now);
        }
        fire
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        if let Some(state) = self.states.get_mut(&key) {
            *state = KeyState::default();
        }
    }

    /// Forget every held key (after a modal closes, for instance)
    pub fn reset(&mut self) {
        self.states.clear();
    }

    pub fn with_default_config() -> Self {
        let mut handler = Self::new();

        handler.configure_keys(
            &[
                KeyCode::Up,
                KeyCode::Down,
                KeyCode::Char('j'),
                KeyCode::Char('k'),
            ],
            KeyBehavior::navigation(),
        );
        handler.configure_keys(
            &[KeyCode::PageUp, KeyCode::PageDown],
            KeyBehavior::fast_navigation(),
        );

        // Everything that talks to the relay fires once per press
        handler.configure_keys(
            &[
                KeyCode::Enter,
                KeyCode::Tab,
                KeyCode::BackTab,
                KeyCode::Char('a'),
                KeyCode::Char('c'),
                KeyCode::Char('d'),
                KeyCode::Char('r'),
                KeyCode::Char('t'),
                KeyCode::Char('R'),
                KeyCode::Char('T'),
                KeyCode::Char('C'),
                KeyCode::Char('P'),
                KeyCode::Char('o'),
            ],
            KeyBehavior::StateChange,
        );

        handler
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::with_default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_state_change_fires_once_per_press() {
        let mut handler = InputHandler::new();
        handler.configure_key(KeyCode::Char('d'), KeyBehavior::StateChange);

        assert!(handler.handle_key_press(KeyCode::Char('d')));
        assert!(!handler.handle_key_press(KeyCode::Char('d')));

        handler.handle_key_release(KeyCode::Char('d'));
        assert!(handler.handle_key_press(KeyCode::Char('d')));
    }

    #[test]
    fn test_state_change_debounce_without_release() {
        let mut handler = InputHandler::new();
        assert!(handler.handle_key_press(KeyCode::Char('r')));
        thread::sleep(STATE_CHANGE_DEBOUNCE + Duration::from_millis(20));
        assert!(handler.handle_key_press(KeyCode::Char('r')));
    }

    #[test]
    fn test_repeatable_waits_for_initial_delay() {
        let mut handler = InputHandler::new();
        handler.configure_key(
            KeyCode::Down,
            KeyBehavior::Repeatable {
                initial_delay: Duration::from_millis(100),
                repeat_interval: Duration::from_millis(50),
            },
        );

        assert!(handler.handle_key_press(KeyCode::Down));
        assert!(!handler.handle_key_press(KeyCode::Down));

        thread::sleep(Duration::from_millis(110));
        assert!(handler.handle_key_press(KeyCode::Down));

        thread::sleep(Duration::from_millis(60));
        assert!(handler.handle_key_press(KeyCode::Down));
    }

    #[test]
    fn test_reset_forgets_held_keys() {
        let mut handler = InputHandler::with_default_config();
        assert!(handler.handle_key_press(KeyCode::Enter));
        handler.reset();
        assert!(handler.handle_key_press(KeyCode::Enter));
    }
}
