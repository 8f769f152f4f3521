//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `EditorAction`s. Front ends feed
//! raw key events in and dispatch the resulting action to the session.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Undo,
    Redo,
    Save,
    AddPanel,
}

/// Key bindings of the editor. `ctrl` and `meta` (⌘) are interchangeable.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Look up the action bound to a key event, if any.
    ///
    /// `key` is the key's text as reported by the front end (`"z"`, `"N"`);
    /// letter case is ignored.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<EditorAction> {
        let key = key.to_ascii_lowercase();
        match (ctrl || meta, shift, key.as_str()) {
            (true, true, "z") => Some(EditorAction::Redo),
            (true, false, "z") => Some(EditorAction::Undo),
            (true, false, "y") => Some(EditorAction::Redo),
            (true, false, "s") => Some(EditorAction::Save),
            (false, _, "n") => Some(EditorAction::AddPanel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_undo_redo() {
        // Cmd+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", false, false, false, true),
            Some(EditorAction::Undo)
        );
        // Ctrl+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", true, false, false, false),
            Some(EditorAction::Undo)
        );
        // Cmd+Shift+Z → Redo (browsers report uppercase with shift)
        assert_eq!(
            ShortcutMap::resolve("Z", false, true, false, true),
            Some(EditorAction::Redo)
        );
        // Ctrl+Y → Redo
        assert_eq!(
            ShortcutMap::resolve("y", true, false, false, false),
            Some(EditorAction::Redo)
        );
    }

    #[test]
    fn resolve_save() {
        assert_eq!(
            ShortcutMap::resolve("s", true, false, false, false),
            Some(EditorAction::Save)
        );
        assert_eq!(ShortcutMap::resolve("s", false, false, false, false), None);
    }

    #[test]
    fn resolve_add_panel() {
        assert_eq!(
            ShortcutMap::resolve("n", false, false, false, false),
            Some(EditorAction::AddPanel)
        );
        assert_eq!(
            ShortcutMap::resolve("N", false, true, false, false),
            Some(EditorAction::AddPanel)
        );
        // ⌘N belongs to the host (new window).
        assert_eq!(ShortcutMap::resolve("n", false, false, false, true), None);
    }

    #[test]
    fn resolve_modifier_precedence() {
        assert_eq!(ShortcutMap::resolve("z", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("y", false, true, false, true), None);
    }

    #[test]
    fn resolve_unknown_key() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("7", true, false, false, false), None);
    }
}
