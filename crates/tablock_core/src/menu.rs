//! Page context menu entries.

use crate::types::LockKind;

/// Kind of a context-menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemKind {
    /// A clickable entry.
    Normal,
    /// A divider line.
    Separator,
}

/// One entry of the page context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    /// Identifier reported back on click.
    pub id: &'static str,
    /// Label shown to the user (empty for separators).
    pub title: &'static str,
    /// Entry kind.
    pub kind: MenuItemKind,
}

/// Entries installed in the page context.
pub const CONTEXT_MENU: [MenuItem; 4] = [
    MenuItem {
        id: "togglePageLock",
        title: "Toggle Page Lock (prevent navigation)",
        kind: MenuItemKind::Normal,
    },
    MenuItem {
        id: "toggleTabLock",
        title: "Toggle Tab Lock (prevent close)",
        kind: MenuItemKind::Normal,
    },
    MenuItem {
        id: "separator",
        title: "",
        kind: MenuItemKind::Separator,
    },
    MenuItem {
        id: "unlockAll",
        title: "Unlock All",
        kind: MenuItemKind::Normal,
    },
];

/// Operation a menu click maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Flip one lock on the clicked tab.
    Toggle(LockKind),
    /// Drop all state for the clicked tab.
    UnlockAll,
}

/// Maps a clicked entry id to its operation. Separators and unknown ids map to nothing.
pub fn action_for(menu_item_id: &str) -> Option<MenuAction> {
    match menu_item_id {
        "togglePageLock" => Some(MenuAction::Toggle(LockKind::Page)),
        "toggleTabLock" => Some(MenuAction::Toggle(LockKind::Tab)),
        "unlockAll" => Some(MenuAction::UnlockAll),
        _ => None,
    }
}
