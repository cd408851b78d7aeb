//! Key binding registry and resolution.
//!
//! [`KeyBindingRegistry`] maps key+modifier combinations to [`BindingAction`]s.
//! The composer consults it before handing a key to the active control.
//! `with_defaults()` installs TAB traversal and the window chord prefixes.

use std::collections::HashMap;

use super::chord::ChordMode;
use super::input::{Key, KeyEvent, Modifiers};

// ---------------------------------------------------------------------------
// BindingAction
// ---------------------------------------------------------------------------

/// Action to take when a key binding is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingAction {
    /// Stop the main loop.
    Quit,
    /// Activate the next TAB-order control.
    FocusNext,
    /// Activate the previous TAB-order control.
    FocusPrevious,
    /// Arm a window chord; the next key is read as a window command.
    Arm(ChordMode),
    /// Post an untargeted application message with this text.
    Custom(String),
}

// ---------------------------------------------------------------------------
// KeyBindingRegistry
// ---------------------------------------------------------------------------

/// Registry of key bindings, mapping (Key, Modifiers) -> BindingAction.
#[derive(Debug, Clone)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), BindingAction>,
}

impl KeyBindingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a registry with the standard bindings.
    ///
    /// - `Tab` / `BackTab`: focus next / previous
    /// - `Ctrl+P`: arm move, `Ctrl+S`: arm resize
    /// - `Ctrl+W`: arm window commands, `Ctrl+Q`: arm quit
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Tab, Modifiers::NONE, BindingAction::FocusNext);
        registry.bind(Key::BackTab, Modifiers::NONE, BindingAction::FocusPrevious);
        registry.bind(Key::BackTab, Modifiers::SHIFT, BindingAction::FocusPrevious);
        for (ch, mode) in [
            ('p', ChordMode::Move),
            ('s', ChordMode::Resize),
            ('w', ChordMode::Window),
            ('q', ChordMode::Quit),
        ] {
            registry.bind(Key::Char(ch), Modifiers::CTRL, BindingAction::Arm(mode));
        }
        registry
    }

    /// Register a key binding, replacing any existing one for the same keys.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: BindingAction) {
        self.bindings.insert((key, modifiers), action);
    }

    /// Remove a key binding, returning the removed action.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<BindingAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Look up the action for a key event (exact key + modifiers match).
    pub fn resolve(&self, event: &KeyEvent) -> Option<&BindingAction> {
        self.bindings.get(&(event.code, event.modifiers))
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the registry has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyBindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Bind / Unbind ────────────────────────────────────────────────

    #[test]
    fn new_registry_is_empty() {
        let reg = KeyBindingRegistry::default();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn resolve_requires_exact_modifiers() {
        let mut reg = KeyBindingRegistry::new();
        reg.bind(Key::Char('x'), Modifiers::CTRL, BindingAction::Quit);
        assert!(reg.resolve(&KeyEvent::plain(Key::Char('x'))).is_none());
        assert_eq!(reg.resolve(&KeyEvent::ctrl('x')), Some(&BindingAction::Quit));
    }

    #[test]
    fn bind_overwrites_and_unbind_removes() {
        let mut reg = KeyBindingRegistry::new();
        reg.bind(Key::F(1), Modifiers::NONE, BindingAction::Custom("first".into()));
        reg.bind(Key::F(1), Modifiers::NONE, BindingAction::Custom("help".into()));
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.resolve(&KeyEvent::plain(Key::F(1))),
            Some(&BindingAction::Custom("help".into()))
        );
        assert!(reg.unbind(Key::F(1), Modifiers::NONE).is_some());
        assert!(reg.unbind(Key::F(1), Modifiers::NONE).is_none());
        assert!(reg.is_empty());
    }

    // ── Defaults ─────────────────────────────────────────────────────

    #[test]
    fn defaults_tab_traversal() {
        let reg = KeyBindingRegistry::with_defaults();
        assert_eq!(
            reg.resolve(&KeyEvent::plain(Key::Tab)),
            Some(&BindingAction::FocusNext)
        );
        assert_eq!(
            reg.resolve(&KeyEvent::new(Key::BackTab, Modifiers::SHIFT)),
            Some(&BindingAction::FocusPrevious)
        );
    }

    #[test]
    fn defaults_arm_chords() {
        let reg = KeyBindingRegistry::with_defaults();
        assert_eq!(
            reg.resolve(&KeyEvent::ctrl('p')),
            Some(&BindingAction::Arm(ChordMode::Move))
        );
        assert_eq!(
            reg.resolve(&KeyEvent::ctrl('s')),
            Some(&BindingAction::Arm(ChordMode::Resize))
        );
        assert_eq!(
            reg.resolve(&KeyEvent::ctrl('w')),
            Some(&BindingAction::Arm(ChordMode::Window))
        );
        assert_eq!(
            reg.resolve(&KeyEvent::ctrl('q')),
            Some(&BindingAction::Arm(ChordMode::Quit))
        );
    }
}
