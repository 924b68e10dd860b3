use crate::camera::Movement;

/// Identifier for a keyboard key, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
}

impl KeyCode {
    /// Letters are folded to upper case so `a` and `A` are the same key.
    pub fn character(ch: char) -> Self {
        Self::Character(ch.to_ascii_uppercase())
    }
}

/// Non-character keys the park reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Left,
    Right,
    Up,
    Down,
    Escape,
}

/// What a key press means to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    ToggleLamp,
    ToggleSun,
    Move(Movement),
}

impl KeyAction {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        Some(match key {
            KeyCode::Named(NamedKey::Escape) => Self::Quit,
            KeyCode::Named(NamedKey::Up) => Self::Move(Movement::Forward),
            KeyCode::Named(NamedKey::Down) => Self::Move(Movement::Backward),
            KeyCode::Named(NamedKey::Left) => Self::Move(Movement::Left),
            KeyCode::Named(NamedKey::Right) => Self::Move(Movement::Right),
            KeyCode::Character('A') => Self::ToggleLamp,
            KeyCode::Character('S') => Self::ToggleSun,
            KeyCode::Character(_) => return None,
        })
    }

    /// Held keys repeat movement; toggles fire once per physical press.
    pub fn repeats(self) -> bool {
        matches!(self, Self::Move(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_letter_cases_toggle() {
        for ch in ['a', 'A'] {
            assert_eq!(
                KeyAction::from_key(KeyCode::character(ch)),
                Some(KeyAction::ToggleLamp)
            );
        }
        for ch in ['s', 'S'] {
            assert_eq!(
                KeyAction::from_key(KeyCode::character(ch)),
                Some(KeyAction::ToggleSun)
            );
        }
        assert_eq!(KeyAction::from_key(KeyCode::character('w')), None);
    }

    #[test]
    fn arrows_move_and_repeat() {
        let action = KeyAction::from_key(KeyCode::Named(NamedKey::Up)).unwrap();
        assert_eq!(action, KeyAction::Move(Movement::Forward));
        assert!(action.repeats());
        assert!(!KeyAction::ToggleLamp.repeats());
    }
}
