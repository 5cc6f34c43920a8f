//! An in-memory browser implementing [`BrowserHost`].
//!
//! `SimulatedHost` assigns tab identities, keeps a tab strip, tracks which
//! pages have an agent ready to receive pushes, and records every call the
//! coordinator makes as a [`HostEffect`]. Browser activity (user closes a
//! tab, a replacement tab finishes loading) is queued as [`BrowserEvent`]s
//! for the caller to feed back into the coordinator, either one at a time
//! with [`SimulatedHost::next_event`] or all at once with [`settle`].

use crate::coordinator::LockCoordinator;
use crate::host::{BrowserEvent, BrowserHost, HostError, ReopenPlacement, TabStatus};
use crate::menu::MenuItem;
use crate::protocol::Notification;
use crate::store::PersistentStore;
use crate::types::{Badge, TabId};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// Something the coordinator asked the browser to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEffect {
    /// A replacement tab was requested.
    CreateRequested {
        url: String,
        placement: ReopenPlacement,
    },
    /// A tab was sent to a URL.
    Navigated { tab_id: TabId, url: String },
    /// A badge was set (`Some`) or cleared (`None`).
    BadgeSet { tab_id: TabId, badge: Option<Badge> },
    /// A notification reached a page agent.
    Pushed {
        tab_id: TabId,
        notification: Notification,
    },
    /// A notification found no agent to receive it.
    PushDropped { tab_id: TabId },
    /// The context menu was installed.
    MenuRegistered { entries: usize },
}

/// Order in which the host reports a finished tab creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreationOrder {
    /// Creation callback, then the first update.
    #[default]
    CallbackFirst,
    /// First update, then the creation callback.
    UpdateFirst,
}

#[derive(Debug, Clone)]
struct SimTab {
    url: String,
    ready: bool,
}

/// In-memory browser. See the module docs.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    tabs: HashMap<TabId, SimTab>,
    /// Tab strip, left to right.
    strip: Vec<TabId>,
    next_id: u32,
    pending: VecDeque<BrowserEvent>,
    effects: Vec<HostEffect>,
    badges: HashMap<TabId, Badge>,
    inboxes: HashMap<TabId, Vec<Notification>>,
    menu: Vec<MenuItem>,
    fail_creates: bool,
    creation_order: CreationOrder,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    /// A browser with no tabs.
    pub fn new() -> Self {
        Self {
            tabs: HashMap::new(),
            strip: Vec::new(),
            next_id: 1,
            pending: VecDeque::new(),
            effects: Vec::new(),
            badges: HashMap::new(),
            inboxes: HashMap::new(),
            menu: Vec::new(),
            fail_creates: false,
            creation_order: CreationOrder::default(),
        }
    }

    /// Makes subsequent tab creations fail.
    pub fn fail_creates(&mut self, fail: bool) {
        self.fail_creates = fail;
    }

    /// Chooses how creation completion is reported.
    pub fn set_creation_order(&mut self, order: CreationOrder) {
        self.creation_order = order;
    }

    // ===== User and page activity =====

    /// Opens a tab at the end of the strip. Its page has no agent until
    /// [`mark_ready`](Self::mark_ready).
    pub fn open_tab(&mut self, url: &str) -> TabId {
        let tab_id = self.allocate(url);
        self.strip.push(tab_id);
        tab_id
    }

    /// Registers a tab the host did not open itself, under a known
    /// identity, with its agent attached. Known tabs are left alone.
    pub fn adopt(&mut self, tab_id: TabId, url: &str) {
        if self.tabs.contains_key(&tab_id) {
            return;
        }
        self.tabs.insert(
            tab_id,
            SimTab {
                url: url.to_string(),
                ready: true,
            },
        );
        self.strip.push(tab_id);
        self.next_id = self.next_id.max(tab_id.0.saturating_add(1));
    }

    /// The tab's page agent is attached and can receive pushes.
    pub fn mark_ready(&mut self, tab_id: TabId) {
        if let Some(tab) = self.tabs.get_mut(&tab_id) {
            tab.ready = true;
        }
    }

    /// The user closes a tab.
    pub fn close_tab(&mut self, tab_id: TabId, window_closing: bool) {
        let index = self.forget(tab_id);
        self.pending.push_back(BrowserEvent::TabRemoved {
            tab_id,
            window_closing,
            index: index.map(|i| i as u32),
        });
    }

    /// Drops a tab without reporting it. Returns the strip position it held.
    pub fn forget(&mut self, tab_id: TabId) -> Option<usize> {
        let index = self.index_of(tab_id);
        self.strip.retain(|&t| t != tab_id);
        self.tabs.remove(&tab_id);
        self.badges.remove(&tab_id);
        self.inboxes.remove(&tab_id);
        index
    }

    /// The top frame of a tab starts navigating to `url`.
    pub fn user_navigate(&mut self, tab_id: TabId, url: &str) {
        if let Some(tab) = self.tabs.get_mut(&tab_id) {
            tab.url = url.to_string();
        }
        self.pending.push_back(BrowserEvent::BeforeNavigate {
            tab_id,
            url: url.to_string(),
            frame_id: 0,
        });
    }

    /// A sub-frame of a tab starts navigating to `url`.
    pub fn frame_navigate(&mut self, tab_id: TabId, url: &str, frame_id: u32) {
        self.pending.push_back(BrowserEvent::BeforeNavigate {
            tab_id,
            url: url.to_string(),
            frame_id,
        });
    }

    /// The user switches to a tab.
    pub fn activate(&mut self, tab_id: TabId) {
        self.pending.push_back(BrowserEvent::TabActivated { tab_id });
    }

    /// The user picks a context-menu entry in a tab.
    pub fn click_menu(&mut self, tab_id: TabId, menu_item_id: &str) {
        let url = self.url_of(tab_id).unwrap_or_default().to_string();
        self.pending.push_back(BrowserEvent::ContextMenuClicked {
            menu_item_id: menu_item_id.to_string(),
            tab_id,
            url,
        });
    }

    /// Queues an arbitrary event.
    pub fn push_event(&mut self, event: BrowserEvent) {
        self.pending.push_back(event);
    }

    /// Takes the next queued event.
    ///
    /// A delivered `complete` update attaches the tab's page agent.
    pub fn next_event(&mut self) -> Option<BrowserEvent> {
        let event = self.pending.pop_front()?;
        if let BrowserEvent::TabUpdated {
            tab_id,
            status: Some(TabStatus::Complete),
            ..
        } = &event
        {
            self.mark_ready(*tab_id);
        }
        Some(event)
    }

    /// Number of queued events.
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    // ===== Inspection =====

    /// Every call made so far, in order.
    pub fn effects(&self) -> &[HostEffect] {
        &self.effects
    }

    /// Removes and returns the effect log.
    pub fn take_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Forced navigations, in order.
    pub fn navigations(&self) -> Vec<(TabId, String)> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                HostEffect::Navigated { tab_id, url } => Some((*tab_id, url.clone())),
                _ => None,
            })
            .collect()
    }

    /// Notifications delivered to a tab's agent so far.
    pub fn pushed_to(&self, tab_id: TabId) -> Vec<Notification> {
        self.inboxes.get(&tab_id).cloned().unwrap_or_default()
    }

    /// Removes and returns the notifications waiting for a tab's agent.
    pub fn drain_pushes(&mut self, tab_id: TabId) -> Vec<Notification> {
        self.inboxes.remove(&tab_id).unwrap_or_default()
    }

    /// Current badge of a tab.
    pub fn badge(&self, tab_id: TabId) -> Option<&Badge> {
        self.badges.get(&tab_id)
    }

    /// Clears every badge without recording an effect.
    pub fn clear_badges(&mut self) {
        self.badges.clear();
    }

    /// Current URL of a tab.
    pub fn url_of(&self, tab_id: TabId) -> Option<&str> {
        self.tabs.get(&tab_id).map(|tab| tab.url.as_str())
    }

    /// Position of a tab in the strip.
    pub fn index_of(&self, tab_id: TabId) -> Option<usize> {
        self.strip.iter().position(|&t| t == tab_id)
    }

    /// Whether a tab's agent can receive pushes.
    pub fn is_ready(&self, tab_id: TabId) -> bool {
        self.tabs.get(&tab_id).is_some_and(|tab| tab.ready)
    }

    /// Installed context-menu entries.
    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    fn allocate(&mut self, url: &str) -> TabId {
        let mut id = self.next_id;
        // Adopted tabs may sit anywhere in the id space, up to u32::MAX.
        while self.tabs.contains_key(&TabId(id)) {
            id = id.wrapping_add(1);
        }
        self.next_id = id.wrapping_add(1);
        let tab_id = TabId(id);
        self.tabs.insert(
            tab_id,
            SimTab {
                url: url.to_string(),
                ready: false,
            },
        );
        tab_id
    }
}

impl BrowserHost for SimulatedHost {
    fn create_tab(&mut self, url: &str, placement: ReopenPlacement) -> Result<(), HostError> {
        self.effects.push(HostEffect::CreateRequested {
            url: url.to_string(),
            placement,
        });

        if self.fail_creates {
            self.pending.push_back(BrowserEvent::TabCreated {
                requested_url: url.to_string(),
                tab_id: None,
            });
            return Ok(());
        }

        let tab_id = self.allocate(url);
        match placement {
            ReopenPlacement::AtIndex(index) => {
                let index = (index as usize).min(self.strip.len());
                self.strip.insert(index, tab_id);
            }
            ReopenPlacement::Default => self.strip.push(tab_id),
        }

        let created = BrowserEvent::TabCreated {
            requested_url: url.to_string(),
            tab_id: Some(tab_id),
        };
        let loading = BrowserEvent::TabUpdated {
            tab_id,
            url: Some(url.to_string()),
            status: Some(TabStatus::Loading),
        };
        match self.creation_order {
            CreationOrder::CallbackFirst => {
                self.pending.push_back(created);
                self.pending.push_back(loading);
            }
            CreationOrder::UpdateFirst => {
                self.pending.push_back(loading);
                self.pending.push_back(created);
            }
        }
        self.pending.push_back(BrowserEvent::TabUpdated {
            tab_id,
            url: None,
            status: Some(TabStatus::Complete),
        });
        Ok(())
    }

    fn navigate(&mut self, tab_id: TabId, url: &str) -> Result<(), HostError> {
        let tab = self
            .tabs
            .get_mut(&tab_id)
            .ok_or(HostError::NoSuchTab(tab_id))?;
        tab.url = url.to_string();
        self.effects.push(HostEffect::Navigated {
            tab_id,
            url: url.to_string(),
        });
        Ok(())
    }

    fn open_tabs(&self) -> Vec<TabId> {
        self.strip.clone()
    }

    fn set_badge(&mut self, tab_id: TabId, badge: Option<&Badge>) -> Result<(), HostError> {
        if !self.tabs.contains_key(&tab_id) {
            return Err(HostError::NoSuchTab(tab_id));
        }
        match badge {
            Some(badge) => self.badges.insert(tab_id, badge.clone()),
            None => self.badges.remove(&tab_id),
        };
        self.effects.push(HostEffect::BadgeSet {
            tab_id,
            badge: badge.cloned(),
        });
        Ok(())
    }

    fn send_to_page(
        &mut self,
        tab_id: TabId,
        notification: &Notification,
    ) -> Result<(), HostError> {
        match self.tabs.get(&tab_id) {
            None => Err(HostError::NoSuchTab(tab_id)),
            Some(tab) if !tab.ready => {
                self.effects.push(HostEffect::PushDropped { tab_id });
                Err(HostError::NoReceiver(tab_id))
            }
            Some(_) => {
                self.inboxes.entry(tab_id).or_default().push(*notification);
                self.effects.push(HostEffect::Pushed {
                    tab_id,
                    notification: *notification,
                });
                Ok(())
            }
        }
    }

    fn register_menu(&mut self, items: &[MenuItem]) -> Result<(), HostError> {
        self.menu = items.to_vec();
        self.effects.push(HostEffect::MenuRegistered {
            entries: items.len(),
        });
        Ok(())
    }
}

/// Feeds every queued browser event into the coordinator until the host is
/// quiet. Returns the number of events delivered.
pub fn settle<S: PersistentStore>(coordinator: &mut LockCoordinator<S, SimulatedHost>) -> usize {
    let mut delivered = 0;
    while let Some(event) = coordinator.host_mut().next_event() {
        coordinator.handle_event(event);
        delivered += 1;
    }
    delivered
}
