//! Tablock Core Library
//!
//! Navigation and close locks for browser tabs:
//! - Page lock: the tab's top frame may not leave its document
//! - Tab lock: a closed tab is reopened at its last location with its locks
//! - Per-tab overrides of the global "open links in new tab" policy
//!
//! A single [`LockCoordinator`] owns all lock state. Page agents and the
//! popup talk to it with [`Request`]s; the browser talks to it with
//! [`BrowserEvent`]s; it talks back through a [`BrowserHost`].
//!
//! # Quick Start
//!
//! ```
//! use tablock_core::{
//!     Config, LockCoordinator, LockKind, MemoryStore, MessageSender, Request, SimulatedHost,
//! };
//!
//! let mut host = SimulatedHost::new();
//! let tab = host.open_tab("https://ex.com/a");
//! let mut coordinator = LockCoordinator::start(MemoryStore::new(), host, Config::default()).unwrap();
//!
//! let response = coordinator.handle_request(
//!     Request::ToggleLock { tab_id: tab, lock_type: LockKind::Page, url: "https://ex.com/a".into() },
//!     &MessageSender::popup(),
//! );
//! assert!(response.lock_status().unwrap().page_lock);
//! ```
//!
//! # Reopening tab-locked tabs
//!
//! Closing a tab-locked tab asks the host for a replacement. Its locks are
//! parked under the URL until the replacement's identity shows up:
//!
//! ```
//! use tablock_core::{settle, BrowserHost, Config, LockCoordinator, LockKind, MemoryStore, SimulatedHost};
//!
//! let mut host = SimulatedHost::new();
//! let tab = host.open_tab("https://ex.com/a");
//! let mut coordinator = LockCoordinator::start(MemoryStore::new(), host, Config::default()).unwrap();
//! coordinator.toggle_lock(tab, LockKind::Tab, "https://ex.com/a");
//!
//! coordinator.host_mut().close_tab(tab, false);
//! settle(&mut coordinator);
//!
//! let replacement = coordinator.host().open_tabs()[0];
//! assert_ne!(replacement, tab);
//! assert!(coordinator.lock_status(replacement).tab_lock);
//! ```

mod agent;
mod config;
mod control;
mod coordinator;
mod dispatch;
mod error;
mod host;
mod lock_table;
mod menu;
mod navigation;
mod profile;
mod protocol;
mod reopen;
mod sim;
mod store;
mod types;

pub use agent::{
    ClickDecision, CoordinatorChannel, ElementInfo, EnforcementAgent, LocalChannel, LockOverlay,
    QueueChannel, OVERLAY_ORIGIN,
};
pub use config::{BadgeConfig, Config, DefaultsConfig, ReopenConfig, StoreConfig, CONFIG_FILE};
pub use control::{ControlSurface, PopupView, BOTH_LOCKED_LABEL, LOCK_BOTH_LABEL};
pub use coordinator::LockCoordinator;
pub use dispatch::{handle, run, CoordinatorHandle, Envelope, Inbound};
pub use error::{LockError, Result};
pub use host::{BrowserEvent, BrowserHost, HostError, ReopenPlacement, TabStatus};
pub use lock_table::LockTable;
pub use menu::{action_for, MenuAction, MenuItem, MenuItemKind, CONTEXT_MENU};
pub use navigation::{check_navigation, is_in_page_href, resolve_link, same_document, NavigationVerdict};
pub use profile::{Profile, ProfileLock, DIR_NAME};
pub use protocol::{
    EffectiveSettings, MessageSender, Notification, PageLockStatus, Request, Response,
    SettingsPatch, TabSettings,
};
pub use reopen::ReopenBuffer;
pub use sim::{settle, CreationOrder, HostEffect, SimulatedHost};
pub use store::{
    load_value, save_value, MemoryStore, PersistentStore, RedbStore, LOCKED_TABS_KEY, SETTINGS_KEY,
};
pub use types::*;

/// Time provider trait for testing.
///
/// Lets tests age reopen-buffer entries without waiting. Only used when set
/// via `LockCoordinator::with_time_provider()`.
pub trait TimeProvider: Send + Sync {
    /// Returns the current Unix timestamp in seconds.
    fn now(&self) -> i64;
}

impl<F> TimeProvider for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now(&self) -> i64 {
        self()
    }
}
