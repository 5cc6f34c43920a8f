//! Core data types for tablock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-assigned identifier of an open tab.
///
/// Identities are not stable across close/reopen: a recreated tab gets a new one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u32);

impl fmt::Debug for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TabId({})", self.0)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TabId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Which of the two locks an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockKind {
    /// Navigation blocking for the tab's top frame.
    Page,
    /// Close prevention by recreating the tab.
    Tab,
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => f.write_str("page"),
            Self::Tab => f.write_str("tab"),
        }
    }
}

/// Per-tab override of the global "open links in new tab" policy.
///
/// Serialized as `null` / `true` / `false`, where `null` means inherit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum LinkOverride {
    /// Use the global setting.
    #[default]
    Inherit,
    /// Use this value regardless of the global setting.
    Force(bool),
}

impl LinkOverride {
    /// Resolves the effective policy against the global value.
    pub fn resolve(self, global: bool) -> bool {
        match self {
            Self::Inherit => global,
            Self::Force(value) => value,
        }
    }

    /// Returns true when no override is set.
    pub fn is_inherit(self) -> bool {
        matches!(self, Self::Inherit)
    }
}

impl From<Option<bool>> for LinkOverride {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Inherit, Self::Force)
    }
}

impl From<LinkOverride> for Option<bool> {
    fn from(value: LinkOverride) -> Self {
        match value {
            LinkOverride::Inherit => None,
            LinkOverride::Force(v) => Some(v),
        }
    }
}

/// Lock state held for one tab identity.
///
/// A record only exists while at least one lock is on or an override is set;
/// see [`LockRecord::is_vacant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    /// Navigation blocking enabled for the top frame.
    pub page_lock: bool,
    /// Close prevention enabled.
    pub tab_lock: bool,
    /// Anchor URL. Pinned while page-locked, tracks the current location
    /// while only tab-locked.
    pub url: String,
    /// Per-tab override of the global link policy.
    #[serde(default)]
    pub open_links_in_new_tab: LinkOverride,
}

impl LockRecord {
    /// Creates an unlocked record anchored at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            page_lock: false,
            tab_lock: false,
            url: url.into(),
            open_links_in_new_tab: LinkOverride::Inherit,
        }
    }

    /// Returns true when the record carries no state and must be deleted.
    pub fn is_vacant(&self) -> bool {
        !self.page_lock && !self.tab_lock && self.open_links_in_new_tab.is_inherit()
    }

    /// Returns true when either lock is on.
    pub fn is_locked(&self) -> bool {
        self.page_lock || self.tab_lock
    }

    /// Returns true when both locks are on.
    pub fn is_fully_locked(&self) -> bool {
        self.page_lock && self.tab_lock
    }

    /// Flips the named lock and returns its new value.
    pub fn toggle(&mut self, kind: LockKind) -> bool {
        let flag = match kind {
            LockKind::Page => &mut self.page_lock,
            LockKind::Tab => &mut self.tab_lock,
        };
        *flag = !*flag;
        *flag
    }
}

/// Process-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Default link policy for tabs without an override.
    pub open_links_in_new_tab: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            open_links_in_new_tab: true,
        }
    }
}

/// Lock state as reported to the control surface.
///
/// A missing record reads as fully unlocked with no override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockStatus {
    /// Page lock state.
    pub page_lock: bool,
    /// Tab lock state.
    pub tab_lock: bool,
    /// Stored per-tab override (`None` = inherit).
    pub open_links_in_new_tab: Option<bool>,
}

impl LockStatus {
    /// Builds the status for an optional record.
    pub fn of(record: Option<&LockRecord>) -> Self {
        record.map_or_else(Self::default, |r| Self {
            page_lock: r.page_lock,
            tab_lock: r.tab_lock,
            open_links_in_new_tab: r.open_links_in_new_tab.into(),
        })
    }
}

/// Toolbar badge shown for a locked tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Badge text.
    pub text: String,
    /// Background color, as a CSS color string.
    pub color: String,
}
