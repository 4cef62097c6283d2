use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::action::MenuAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeymapProfile {
    #[default]
    Default,
    Vim,
    Arrows,
}

#[derive(Clone, Copy, Debug)]
pub struct MenuKeyBindings {
    profile: KeymapProfile,
}

impl Default for MenuKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    pub fn resolve<C>(&self, key: KeyEvent) -> Option<MenuAction<C>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => Some(MenuAction::Save),
                _ => None,
            };
        }
        if key.modifiers.contains(KeyModifiers::SHIFT) && key.code == KeyCode::Delete {
            return Some(MenuAction::RemoveItem);
        }

        let nav_action = match self.profile {
            KeymapProfile::Default => self.resolve_default_nav(key),
            KeymapProfile::Vim => self.resolve_vim_nav(key),
            KeymapProfile::Arrows => self.resolve_arrow_nav(key),
        };
        if nav_action.is_some() {
            return nav_action;
        }

        self.resolve_common(key)
    }

    pub fn resolve_with<C, F>(&self, key: KeyEvent, custom: F) -> Option<MenuAction<C>>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if let Some(action) = custom(key) {
            return Some(MenuAction::Custom(action));
        }

        self.resolve(key)
    }

    const fn resolve_default_nav<C>(&self, key: KeyEvent) -> Option<MenuAction<C>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(MenuAction::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(MenuAction::MoveDown),
            KeyCode::Left | KeyCode::Char('h') => Some(MenuAction::Outdent),
            KeyCode::Right | KeyCode::Char('l') => Some(MenuAction::Indent),
            _ => None,
        }
    }

    const fn resolve_vim_nav<C>(&self, key: KeyEvent) -> Option<MenuAction<C>> {
        match key.code {
            KeyCode::Char('k') => Some(MenuAction::MoveUp),
            KeyCode::Char('j') => Some(MenuAction::MoveDown),
            KeyCode::Char('h') => Some(MenuAction::Outdent),
            KeyCode::Char('l') => Some(MenuAction::Indent),
            _ => None,
        }
    }

    const fn resolve_arrow_nav<C>(&self, key: KeyEvent) -> Option<MenuAction<C>> {
        match key.code {
            KeyCode::Up => Some(MenuAction::MoveUp),
            KeyCode::Down => Some(MenuAction::MoveDown),
            KeyCode::Left => Some(MenuAction::Outdent),
            KeyCode::Right => Some(MenuAction::Indent),
            _ => None,
        }
    }

    fn resolve_common<C>(&self, key: KeyEvent) -> Option<MenuAction<C>> {
        match key.code {
            KeyCode::Char(' ') => Some(MenuAction::ToggleDrag),
            KeyCode::Esc => Some(MenuAction::CancelDrag),
            KeyCode::Char('a' | '+') => Some(MenuAction::AddItem),
            KeyCode::Delete | KeyCode::Char('D') => Some(MenuAction::RemoveItem),
            KeyCode::Enter | KeyCode::Char('e') => Some(MenuAction::EditTitle),
            KeyCode::Char('u' | ']') => Some(MenuAction::NextUrl),
            KeyCode::Char('U' | '[') => Some(MenuAction::PrevUrl),
            KeyCode::Char('g') => Some(MenuAction::ToggleGuides),
            KeyCode::Home => Some(MenuAction::SelectFirst),
            KeyCode::End => Some(MenuAction::SelectLast),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_profile_ignores_vim_letters() {
        let bindings = MenuKeyBindings::with_profile(KeymapProfile::Arrows);
        assert_eq!(bindings.resolve::<()>(key(KeyCode::Char('j'))), None);
        assert_eq!(
            bindings.resolve::<()>(key(KeyCode::Down)),
            Some(MenuAction::MoveDown)
        );
    }

    #[test]
    fn control_s_saves() {
        let bindings = MenuKeyBindings::new();
        let event = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(bindings.resolve::<()>(event), Some(MenuAction::Save));
    }

    #[test]
    fn custom_mapping_wins() {
        let bindings = MenuKeyBindings::new();
        let action = bindings.resolve_with(key(KeyCode::Char('a')), |_| Some(7u8));
        assert_eq!(action, Some(MenuAction::Custom(7)));
    }
}
