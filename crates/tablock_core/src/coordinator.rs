//! The background coordinator: sole owner and writer of lock state.
//!
//! [`LockCoordinator`] owns the [`LockTable`], the [`ReopenBuffer`] and the
//! [`GlobalSettings`]. It reacts to browser events and protocol requests one
//! at a time, persisting after every mutation and pushing indicator and
//! enforcement updates out through the [`BrowserHost`].
//!
//! Pushes to pages are best effort. A page that misses one recovers by
//! asking for its state when its agent attaches.

use crate::config::Config;
use crate::error::{LockError, Result};
use crate::host::{BrowserEvent, BrowserHost, ReopenPlacement, TabStatus};
use crate::lock_table::LockTable;
use crate::menu::{self, MenuAction};
use crate::navigation::{check_navigation, NavigationVerdict};
use crate::protocol::{
    EffectiveSettings, MessageSender, Notification, PageLockStatus, Request, Response,
    SettingsPatch, TabSettings,
};
use crate::reopen::ReopenBuffer;
use crate::store::{load_value, save_value, PersistentStore, LOCKED_TABS_KEY, SETTINGS_KEY};
use crate::types::{GlobalSettings, LinkOverride, LockKind, LockRecord, LockStatus, TabId};
use crate::TimeProvider;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Owns lock state and applies every state transition.
pub struct LockCoordinator<S, H> {
    table: LockTable,
    reopen: ReopenBuffer,
    settings: GlobalSettings,
    store: S,
    host: H,
    config: Config,
    /// Time provider for testing (None = use system time).
    time_provider: Option<Arc<dyn TimeProvider>>,
}

impl<S: PersistentStore, H: BrowserHost> LockCoordinator<S, H> {
    /// Starts a coordinator, rebuilding state from the store.
    ///
    /// Absent settings fall back to `config.defaults`. A stored value that no
    /// longer decodes is logged and replaced by the empty/default state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read at all.
    pub fn start(store: S, host: H, config: Config) -> Result<Self> {
        let records: HashMap<TabId, LockRecord> = match load_value(&store, LOCKED_TABS_KEY) {
            Ok(records) => records.unwrap_or_default(),
            Err(LockError::Deserialization(e)) => {
                warn!(error = %e, "Stored lock table is unreadable, starting with no locks");
                HashMap::new()
            }
            Err(e) => return Err(e),
        };

        let settings = match load_value(&store, SETTINGS_KEY) {
            Ok(settings) => settings.unwrap_or_else(|| config.defaults.settings()),
            Err(LockError::Deserialization(e)) => {
                warn!(error = %e, "Stored settings are unreadable, using defaults");
                config.defaults.settings()
            }
            Err(e) => return Err(e),
        };

        let table = LockTable::from_records(records);
        debug!(
            locked_tabs = table.len(),
            open_links_in_new_tab = settings.open_links_in_new_tab,
            "Coordinator started"
        );

        Ok(Self {
            table,
            reopen: ReopenBuffer::new(),
            settings,
            store,
            host,
            config,
            time_provider: None,
        })
    }

    /// Sets a custom time provider, used to age reopen-buffer entries.
    pub fn with_time_provider(mut self, provider: impl TimeProvider + 'static) -> Self {
        self.time_provider = Some(Arc::new(provider));
        self
    }

    // ===== Accessors =====

    /// The lock table.
    pub fn table(&self) -> &LockTable {
        &self.table
    }

    /// Records waiting for their replacement tab.
    pub fn reopen_buffer(&self) -> &ReopenBuffer {
        &self.reopen
    }

    /// Current global settings.
    pub fn settings(&self) -> GlobalSettings {
        self.settings
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The browser host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the browser host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The persistent store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Shuts the coordinator down, handing back its store and host.
    /// The reopen buffer is discarded.
    pub fn into_parts(self) -> (S, H) {
        (self.store, self.host)
    }

    /// Lock status of a tab; tabs without a record read as unlocked.
    pub fn lock_status(&self, tab_id: TabId) -> LockStatus {
        self.table.status(tab_id)
    }

    /// Effective link policy of a tab: its override, else the global value.
    pub fn effective_policy(&self, tab_id: TabId) -> bool {
        self.table
            .get(tab_id)
            .map_or(LinkOverride::Inherit, |r| r.open_links_in_new_tab)
            .resolve(self.settings.open_links_in_new_tab)
    }

    // ===== Lock operations =====

    /// Flips one lock on a tab, creating its record anchored at `url` if needed.
    pub fn toggle_lock(&mut self, tab_id: TabId, kind: LockKind, url: &str) -> LockStatus {
        self.table.update(tab_id, url, |record| {
            record.toggle(kind);
        });
        let status = self.table.status(tab_id);
        debug!(tab = %tab_id, kind = %kind, page_lock = status.page_lock, tab_lock = status.tab_lock, "Toggled lock");

        if kind == LockKind::Page {
            self.notify(
                tab_id,
                Notification::SetPageLock {
                    enabled: status.page_lock,
                },
            );
        }
        self.persist_locks();
        self.refresh_indicator(tab_id);
        status
    }

    /// Locks both, or unlocks everything if both are already locked.
    ///
    /// Locking re-anchors the tab at `url`.
    pub fn lock_both(&mut self, tab_id: TabId, url: &str) -> LockStatus {
        if self.table.get(tab_id).is_some_and(LockRecord::is_fully_locked) {
            return self.unlock_all(tab_id);
        }

        self.table.update(tab_id, url, |record| {
            record.page_lock = true;
            record.tab_lock = true;
            record.url = url.to_string();
        });
        debug!(tab = %tab_id, url, "Locked page and tab");

        self.persist_locks();
        self.notify(tab_id, Notification::SetPageLock { enabled: true });
        self.refresh_indicator(tab_id);
        self.table.status(tab_id)
    }

    /// Drops every lock and override on a tab.
    pub fn unlock_all(&mut self, tab_id: TabId) -> LockStatus {
        self.notify(tab_id, Notification::SetPageLock { enabled: false });
        if self.table.remove(tab_id).is_some() {
            debug!(tab = %tab_id, "Unlocked tab");
        }
        self.persist_locks();
        self.refresh_indicator(tab_id);
        LockStatus::default()
    }

    // ===== Browser events =====

    /// Applies lock policy to a navigation that is about to start.
    ///
    /// A tab-locked (but not page-locked) tab moves its anchor along with
    /// the top frame. A page-locked top frame leaving the locked document is
    /// sent back to the anchor. Sub-frame navigations are never blocked.
    ///
    /// Returns `None` when the tab has no record.
    pub fn before_navigate(
        &mut self,
        tab_id: TabId,
        url: &str,
        frame_id: u32,
    ) -> Option<NavigationVerdict> {
        let record = self.table.get(tab_id)?;
        let top_frame = frame_id == 0;

        if record.tab_lock && !record.page_lock {
            if top_frame && record.url != url {
                self.table.modify(tab_id, |record| record.url = url.to_string());
                debug!(tab = %tab_id, url, "Moved tab-lock anchor");
                self.persist_locks();
            }
            return Some(NavigationVerdict::Allow);
        }

        if !record.page_lock || !top_frame {
            return Some(NavigationVerdict::Allow);
        }

        let locked_url = record.url.clone();
        let verdict = check_navigation(&locked_url, url);
        if verdict == NavigationVerdict::Block {
            debug!(tab = %tab_id, target = url, locked = %locked_url, "Blocked navigation");
            if let Err(e) = self.host.navigate(tab_id, &locked_url) {
                warn!(tab = %tab_id, error = %e, "Failed to send tab back to locked page");
            }
        }
        Some(verdict)
    }

    /// Handles a closed tab. A tab-locked tab is recreated at its anchor URL
    /// and its record parked until the replacement's identity is known.
    pub fn tab_removed(&mut self, tab_id: TabId, window_closing: bool, index: Option<u32>) {
        let Some(record) = self.table.remove(tab_id) else {
            return;
        };

        if record.tab_lock {
            let url = record.url.clone();
            let placement = match index {
                Some(index) if self.config.reopen.restore_position && !window_closing => {
                    ReopenPlacement::AtIndex(index)
                }
                _ => ReopenPlacement::Default,
            };

            let now = self.now();
            self.reopen.park(url.clone(), record, now);
            info!(tab = %tab_id, url = %url, "Reopening tab-locked tab");

            if let Err(e) = self.host.create_tab(&url, placement) {
                warn!(url = %url, error = %e, "Failed to reopen tab, dropping its locks");
                self.reopen.discard(&url);
            }
        }

        self.persist_locks();
    }

    /// Completion of a replacement-tab creation.
    ///
    /// Transfers the parked record to the new identity unless the update
    /// path already claimed it. A failed creation drops the parked record.
    pub fn tab_created(&mut self, requested_url: &str, tab_id: Option<TabId>) {
        let Some(tab_id) = tab_id else {
            if self.reopen.discard(requested_url) {
                warn!(url = requested_url, "Replacement tab was not created, dropping its locks");
            }
            return;
        };

        if let Some(record) = self.reopen.claim(requested_url) {
            info!(tab = %tab_id, url = requested_url, "Restored locks on reopened tab");
            self.table.insert(tab_id, record);
            self.persist_locks();
            self.refresh_indicator(tab_id);
        }
    }

    /// Handles a tab update. A tab without a record whose new URL matches
    /// a parked record claims it; a completed load refreshes the badge.
    pub fn tab_updated(&mut self, tab_id: TabId, url: Option<&str>, status: Option<TabStatus>) {
        if let Some(url) = url {
            if !self.table.contains(tab_id) {
                if let Some(record) = self.reopen.claim(url) {
                    info!(tab = %tab_id, url, "Restored locks on reopened tab from update");
                    self.table.insert(tab_id, record);
                    self.persist_locks();
                }
            }
        }

        if status == Some(TabStatus::Complete) {
            self.refresh_indicator(tab_id);
        }
    }

    /// Handles a tab becoming active.
    pub fn tab_activated(&mut self, tab_id: TabId) {
        self.refresh_indicator(tab_id);
    }

    /// Installs the page context menu.
    pub fn install(&mut self) {
        if let Err(e) = self.host.register_menu(&menu::CONTEXT_MENU) {
            warn!(error = %e, "Failed to register context menu");
        }
    }

    /// Runs the operation behind a context-menu entry.
    pub fn context_menu_clicked(&mut self, menu_item_id: &str, tab_id: TabId, url: &str) {
        match menu::action_for(menu_item_id) {
            Some(MenuAction::Toggle(kind)) => {
                self.toggle_lock(tab_id, kind, url);
            }
            Some(MenuAction::UnlockAll) => {
                self.unlock_all(tab_id);
            }
            None => debug!(menu_item_id, "Ignoring unknown menu entry"),
        }
    }

    // ===== Settings =====

    /// Merges a patch into the global settings and pushes the resulting
    /// effective policy to every open tab.
    pub fn update_global_settings(&mut self, patch: SettingsPatch) -> GlobalSettings {
        if let Some(value) = patch.open_links_in_new_tab {
            self.settings.open_links_in_new_tab = value;
        }
        debug!(open_links_in_new_tab = self.settings.open_links_in_new_tab, "Updated global settings");
        self.persist_settings();

        for tab_id in self.host.open_tabs() {
            let effective = self.effective_policy(tab_id);
            self.notify(tab_id, settings_notification(effective));
        }
        self.settings
    }

    /// Sets (`Some`) or clears (`None`) a tab's link-policy override.
    pub fn update_tab_settings(
        &mut self,
        tab_id: TabId,
        url: &str,
        value: Option<bool>,
    ) -> TabSettings {
        self.table.update(tab_id, url, |record| {
            record.open_links_in_new_tab = LinkOverride::from(value);
        });
        self.persist_locks();

        let effective = self.effective_policy(tab_id);
        debug!(tab = %tab_id, ?value, effective, "Updated tab settings");
        self.notify(tab_id, settings_notification(effective));

        TabSettings {
            open_links_in_new_tab: self.table.status(tab_id).open_links_in_new_tab,
            effective_value: effective,
        }
    }

    // ===== Dispatch =====

    /// Serves one request. Always produces exactly one response.
    pub fn handle_request(&mut self, request: Request, sender: &MessageSender) -> Response {
        self.sweep_reopen_buffer();

        match request {
            Request::GetLockStatus { tab_id } => Response::LockStatus(self.lock_status(tab_id)),
            Request::LockBoth { tab_id, url } => Response::LockStatus(self.lock_both(tab_id, &url)),
            Request::ToggleLock {
                tab_id,
                lock_type,
                url,
            } => Response::LockStatus(self.toggle_lock(tab_id, lock_type, &url)),
            Request::UnlockAll { tab_id } => Response::LockStatus(self.unlock_all(tab_id)),
            Request::CheckPageLock => match sender.tab_id {
                Some(tab_id) => Response::PageLock(PageLockStatus {
                    page_lock: self.lock_status(tab_id).page_lock,
                    open_links_in_new_tab: self.effective_policy(tab_id),
                }),
                None => missing_sender("checkPageLock"),
            },
            Request::GetSettings => Response::Settings(self.settings),
            Request::UpdateSettings {
                settings,
                tab_id: Some(tab_id),
                url,
            } => {
                let url = url
                    .or_else(|| self.table.get(tab_id).map(|r| r.url.clone()))
                    .unwrap_or_default();
                Response::TabSettings(self.update_tab_settings(
                    tab_id,
                    &url,
                    settings.open_links_in_new_tab,
                ))
            }
            Request::UpdateSettings {
                settings,
                tab_id: None,
                ..
            } => Response::Settings(self.update_global_settings(settings)),
            Request::UnlockAllFromBanner => match sender.tab_id {
                Some(tab_id) => Response::LockStatus(self.unlock_all(tab_id)),
                None => missing_sender("unlockAllFromBanner"),
            },
        }
    }

    /// Applies one browser event to completion.
    pub fn handle_event(&mut self, event: BrowserEvent) {
        self.sweep_reopen_buffer();

        match event {
            BrowserEvent::Installed => self.install(),
            BrowserEvent::BeforeNavigate {
                tab_id,
                url,
                frame_id,
            } => {
                self.before_navigate(tab_id, &url, frame_id);
            }
            BrowserEvent::TabRemoved {
                tab_id,
                window_closing,
                index,
            } => self.tab_removed(tab_id, window_closing, index),
            BrowserEvent::TabUpdated {
                tab_id,
                url,
                status,
            } => self.tab_updated(tab_id, url.as_deref(), status),
            BrowserEvent::TabActivated { tab_id } => self.tab_activated(tab_id),
            BrowserEvent::TabCreated {
                requested_url,
                tab_id,
            } => self.tab_created(&requested_url, tab_id),
            BrowserEvent::ContextMenuClicked {
                menu_item_id,
                tab_id,
                url,
            } => self.context_menu_clicked(&menu_item_id, tab_id, &url),
        }
    }

    // ===== Internals =====

    fn now(&self) -> i64 {
        if let Some(ref provider) = self.time_provider {
            provider.now()
        } else {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0)
        }
    }

    /// Drops parked records whose replacement never showed up.
    fn sweep_reopen_buffer(&mut self) {
        if self.reopen.is_empty() {
            return;
        }
        let now = self.now();
        for url in self.reopen.expire(now, self.config.reopen.ttl()) {
            warn!(url = %url, "Reopened tab never appeared, dropping its locks");
        }
    }

    fn persist_locks(&mut self) {
        if let Err(e) = save_value(&mut self.store, LOCKED_TABS_KEY, self.table.records()) {
            warn!(error = %e, "Failed to persist lock table");
        }
    }

    fn persist_settings(&mut self) {
        if let Err(e) = save_value(&mut self.store, SETTINGS_KEY, &self.settings) {
            warn!(error = %e, "Failed to persist settings");
        }
    }

    /// Pushes to a page; delivery failures are expected and dropped.
    fn notify(&mut self, tab_id: TabId, notification: Notification) {
        if let Err(e) = self.host.send_to_page(tab_id, &notification) {
            debug!(tab = %tab_id, error = %e, "Page did not receive notification");
        }
    }

    fn refresh_indicator(&mut self, tab_id: TabId) {
        let badge = self
            .table
            .get(tab_id)
            .filter(|record| record.is_locked())
            .map(|_| self.config.badge.badge());

        if let Err(e) = self.host.set_badge(tab_id, badge.as_ref()) {
            debug!(tab = %tab_id, error = %e, "Failed to update badge");
        }
    }
}

fn settings_notification(effective: bool) -> Notification {
    Notification::SettingsUpdated {
        settings: EffectiveSettings {
            open_links_in_new_tab: effective,
        },
    }
}

fn missing_sender(action: &str) -> Response {
    warn!(action, "Request needs a sending tab but came from none");
    Response::Error {
        error: format!("{} must be sent from a tab", action),
    }
}
