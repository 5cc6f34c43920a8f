//! Interface to the browser's tab, badge, messaging and menu facilities.
//!
//! The coordinator only ever talks to the browser through [`BrowserHost`],
//! and the browser only ever talks back through [`BrowserEvent`]s.

use crate::menu::MenuItem;
use crate::protocol::Notification;
use crate::types::{Badge, TabId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Nothing in the tab is listening (page not loaded, or no agent injected).
    #[error("no receiver in tab {0}")]
    NoReceiver(TabId),

    /// The tab does not exist.
    #[error("tab {0} not found")]
    NoSuchTab(TabId),

    /// The host refused the call.
    #[error("host rejected call: {0}")]
    Rejected(String),
}

/// Where a replacement tab should be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReopenPlacement {
    /// Let the host decide (end of the window).
    Default,
    /// At this position in the window's tab strip.
    AtIndex(u32),
}

/// Tab loading status carried by update events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TabStatus {
    /// The tab is loading.
    Loading,
    /// The tab finished loading.
    Complete,
}

/// Event delivered by the host to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BrowserEvent {
    /// The extension was installed or updated.
    Installed,
    /// A frame is about to navigate.
    BeforeNavigate {
        tab_id: TabId,
        url: String,
        frame_id: u32,
    },
    /// A tab was closed.
    TabRemoved {
        tab_id: TabId,
        #[serde(default)]
        window_closing: bool,
        /// Position the tab held, when the host knows it.
        #[serde(default)]
        index: Option<u32>,
    },
    /// A tab changed URL or loading status.
    TabUpdated {
        tab_id: TabId,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        status: Option<TabStatus>,
    },
    /// A tab became the active one.
    TabActivated { tab_id: TabId },
    /// Completion of a [`BrowserHost::create_tab`] request.
    /// `tab_id` is `None` when creation failed.
    TabCreated {
        requested_url: String,
        #[serde(default)]
        tab_id: Option<TabId>,
    },
    /// A context-menu entry was clicked in a page.
    ContextMenuClicked {
        menu_item_id: String,
        tab_id: TabId,
        url: String,
    },
}

/// Capabilities the coordinator needs from the browser.
///
/// Calls return immediately. Work that completes later (tab creation)
/// is reported back as a [`BrowserEvent`].
pub trait BrowserHost {
    /// Requests a new tab at `url`. Completion arrives as [`BrowserEvent::TabCreated`].
    fn create_tab(&mut self, url: &str, placement: ReopenPlacement) -> Result<(), HostError>;

    /// Sends an existing tab to `url`.
    fn navigate(&mut self, tab_id: TabId, url: &str) -> Result<(), HostError>;

    /// Identities of all open tabs.
    fn open_tabs(&self) -> Vec<TabId>;

    /// Sets or clears (`None`) a tab's toolbar badge.
    fn set_badge(&mut self, tab_id: TabId, badge: Option<&Badge>) -> Result<(), HostError>;

    /// Pushes a notification to the agent in a tab's page. Best effort.
    fn send_to_page(&mut self, tab_id: TabId, notification: &Notification)
        -> Result<(), HostError>;

    /// Installs the page context menu.
    fn register_menu(&mut self, items: &[MenuItem]) -> Result<(), HostError>;
}
