// SPDX-License-Identifier: PMPL-1.0-or-later

//! Keyboard shortcuts.
//!
//! | Key | Action |
//! |-----|--------|
//! | L   | open the app directly |
//! | R   | refresh |
//! | I   | about dialog |
//! | E   | English |
//! | C   | Chinese |
//! | F11 | fullscreen |
//! | Esc | close dialog and menus |
//!
//! Letter shortcuts ignore Ctrl/Meta chords so browser shortcuts keep
//! working. Nothing fires while the focus is in a text field.

use crate::i18n::Lang;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Page,
    Input,
    TextArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub target: FocusTarget,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            target: FocusTarget::Page,
        }
    }

    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    fn chorded(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Launch,
    Refresh,
    ShowInfo,
    CloseOverlays,
    ToggleFullscreen,
    SwitchLanguage(Lang),
}

pub fn shortcut_for(input: &KeyInput) -> Option<Action> {
    if matches!(input.target, FocusTarget::Input | FocusTarget::TextArea) {
        return None;
    }
    match input.key {
        Key::Escape => Some(Action::CloseOverlays),
        Key::F(11) => Some(Action::ToggleFullscreen),
        Key::Char(c) if !input.chorded() => match c.to_ascii_lowercase() {
            'l' => Some(Action::Launch),
            'r' => Some(Action::Refresh),
            'i' => Some(Action::ShowInfo),
            'e' => Some(Action::SwitchLanguage(Lang::En)),
            'c' => Some(Action::SwitchLanguage(Lang::Zh)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(shortcut_for(&KeyInput::char('R')), Some(Action::Refresh));
        assert_eq!(
            shortcut_for(&KeyInput::char('c')),
            Some(Action::SwitchLanguage(Lang::Zh))
        );
    }

    #[test]
    fn chords_and_text_fields_are_ignored() {
        let mut input = KeyInput::char('r');
        input.ctrl = true;
        assert_eq!(shortcut_for(&input), None);

        let mut typing = KeyInput::char('l');
        typing.target = FocusTarget::TextArea;
        assert_eq!(shortcut_for(&typing), None);

        let mut escape_in_input = KeyInput::plain(Key::Escape);
        escape_in_input.target = FocusTarget::Input;
        assert_eq!(shortcut_for(&escape_in_input), None);
    }

    #[test]
    fn escape_and_f11_ignore_modifiers() {
        let mut input = KeyInput::plain(Key::F(11));
        input.meta = true;
        assert_eq!(shortcut_for(&input), Some(Action::ToggleFullscreen));
        assert_eq!(
            shortcut_for(&KeyInput::plain(Key::Escape)),
            Some(Action::CloseOverlays)
        );
        assert_eq!(shortcut_for(&KeyInput::plain(Key::F(5))), None);
    }
}
