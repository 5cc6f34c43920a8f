//! Message contract between the coordinator, page agents and the popup.
//!
//! Messages are JSON objects tagged by an `action` field with camelCase
//! field names.

use crate::types::{GlobalSettings, LockKind, LockStatus, TabId};
use serde::{Deserialize, Serialize};

/// Identity of whoever sent a request.
///
/// Page agents are identified by their tab; the popup has no tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSender {
    /// Tab the sending page lives in.
    #[serde(default)]
    pub tab_id: Option<TabId>,
    /// Frame within that tab (0 = top frame).
    #[serde(default)]
    pub frame_id: Option<u32>,
}

impl MessageSender {
    /// Sender for the popup or another tab-less surface.
    pub fn popup() -> Self {
        Self::default()
    }

    /// Sender for the top frame of a tab.
    pub fn page(tab_id: TabId) -> Self {
        Self {
            tab_id: Some(tab_id),
            frame_id: Some(0),
        }
    }
}

/// Partial settings carried by `updateSettings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    /// New policy. For a per-tab update `None` clears the override; for a
    /// global update `None` leaves the value unchanged.
    #[serde(default)]
    pub open_links_in_new_tab: Option<bool>,
}

/// Request sent to the coordinator. Every request gets exactly one [`Response`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    /// Lock state of a tab.
    GetLockStatus { tab_id: TabId },
    /// Lock both, or unlock both if both are already on.
    LockBoth { tab_id: TabId, url: String },
    /// Flip one lock.
    ToggleLock {
        tab_id: TabId,
        lock_type: LockKind,
        url: String,
    },
    /// Drop all state for a tab.
    UnlockAll { tab_id: TabId },
    /// Page lock and effective link policy of the sender's own tab.
    CheckPageLock,
    /// Global settings.
    GetSettings,
    /// Update the global settings, or a tab's override when `tab_id` is set.
    UpdateSettings {
        settings: SettingsPatch,
        #[serde(default)]
        tab_id: Option<TabId>,
        #[serde(default)]
        url: Option<String>,
    },
    /// The sender's lock overlay was clicked; unlock its tab.
    UnlockAllFromBanner,
}

impl Request {
    /// The `action` name of this request.
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetLockStatus { .. } => "getLockStatus",
            Self::LockBoth { .. } => "lockBoth",
            Self::ToggleLock { .. } => "toggleLock",
            Self::UnlockAll { .. } => "unlockAll",
            Self::CheckPageLock => "checkPageLock",
            Self::GetSettings => "getSettings",
            Self::UpdateSettings { .. } => "updateSettings",
            Self::UnlockAllFromBanner => "unlockAllFromBanner",
        }
    }
}

/// Reply to a page agent's status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLockStatus {
    /// Page lock state of the sender's tab.
    pub page_lock: bool,
    /// Effective link policy of the sender's tab.
    pub open_links_in_new_tab: bool,
}

/// Reply to a per-tab settings update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSettings {
    /// Stored override after the update (`None` = inherit).
    pub open_links_in_new_tab: Option<bool>,
    /// Effective policy after the update.
    pub effective_value: bool,
}

/// Response to a [`Request`].
///
/// The variant is implied by the request; on the wire the payload is sent
/// without a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// `getLockStatus`, `lockBoth`, `toggleLock`, `unlockAll`.
    LockStatus(LockStatus),
    /// `checkPageLock`.
    PageLock(PageLockStatus),
    /// Per-tab `updateSettings`.
    TabSettings(TabSettings),
    /// `getSettings` and global `updateSettings`.
    Settings(GlobalSettings),
    /// Acknowledgement for messages that carry no data back.
    Ack { success: bool },
    /// The request could not be served.
    Error { error: String },
}

impl Response {
    /// Lock status payload, if this is one.
    pub fn lock_status(&self) -> Option<LockStatus> {
        match self {
            Self::LockStatus(status) => Some(*status),
            _ => None,
        }
    }

    /// Global settings payload, if this is one.
    pub fn settings(&self) -> Option<GlobalSettings> {
        match self {
            Self::Settings(settings) => Some(*settings),
            _ => None,
        }
    }
}

/// Effective settings pushed to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSettings {
    /// Effective link policy for the receiving tab.
    pub open_links_in_new_tab: bool,
}

/// Unsolicited message pushed from the coordinator to a page agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Notification {
    /// Page lock state changed.
    SetPageLock { enabled: bool },
    /// Effective link policy changed.
    SettingsUpdated { settings: EffectiveSettings },
}
