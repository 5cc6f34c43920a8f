//! Per-page enforcement agent.
//!
//! An [`EnforcementAgent`] lives in one page. It learns the page's lock
//! state from the coordinator when it attaches, keeps it current from pushed
//! [`Notification`]s, decides what happens to link clicks while the page is
//! locked, and owns the lock overlay shown on top of the page.

use crate::coordinator::LockCoordinator;
use crate::dispatch::CoordinatorHandle;
use crate::error::{LockError, Result};
use crate::host::BrowserHost;
use crate::navigation::{is_in_page_href, resolve_link};
use crate::protocol::{MessageSender, Notification, Request, Response};
use crate::store::PersistentStore;
use tracing::{debug, warn};
use url::Url;

/// Request/response link to the coordinator, bound to one sender.
pub trait CoordinatorChannel {
    /// Sends a request and returns its response.
    fn request(&mut self, request: Request) -> Result<Response>;
}

/// Channel that calls a coordinator in the same thread.
pub struct LocalChannel<'a, S, H> {
    coordinator: &'a mut LockCoordinator<S, H>,
    sender: MessageSender,
}

impl<'a, S, H> LocalChannel<'a, S, H> {
    /// Binds `coordinator` to `sender`.
    pub fn new(coordinator: &'a mut LockCoordinator<S, H>, sender: MessageSender) -> Self {
        Self {
            coordinator,
            sender,
        }
    }
}

impl<S: PersistentStore, H: BrowserHost> CoordinatorChannel for LocalChannel<'_, S, H> {
    fn request(&mut self, request: Request) -> Result<Response> {
        Ok(self.coordinator.handle_request(request, &self.sender))
    }
}

/// Channel that posts to a coordinator loop running elsewhere.
#[derive(Debug, Clone)]
pub struct QueueChannel {
    handle: CoordinatorHandle,
    sender: MessageSender,
}

impl QueueChannel {
    /// Binds `handle` to `sender`.
    pub fn new(handle: CoordinatorHandle, sender: MessageSender) -> Self {
        Self { handle, sender }
    }
}

impl CoordinatorChannel for QueueChannel {
    fn request(&mut self, request: Request) -> Result<Response> {
        self.handle.request(request, self.sender)
    }
}

/// One element on the path from a click target up to the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    /// Element tag name, any case.
    pub tag_name: String,
    /// Raw `href` attribute, if the element has one.
    pub href: Option<String>,
}

impl ElementInfo {
    /// An anchor with the given href.
    pub fn anchor(href: &str) -> Self {
        Self {
            tag_name: "A".to_string(),
            href: Some(href.to_string()),
        }
    }

    /// A non-link element.
    pub fn element(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            href: None,
        }
    }

    fn is_anchor(&self) -> bool {
        self.tag_name.eq_ignore_ascii_case("a")
    }
}

/// What to do with a click, decided before the page's own handlers run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickDecision {
    /// Not ours: let the click through untouched.
    Ignore,
    /// An in-page link (fragment or script); let it through.
    AllowInPage,
    /// Suppress default navigation and propagation; go nowhere.
    Absorb,
    /// Suppress default navigation and propagation; open this URL in a new
    /// browsing context instead.
    OpenInNewContext(Url),
}

impl ClickDecision {
    /// Whether the page must not see the click.
    pub fn suppresses(&self) -> bool {
        matches!(self, Self::Absorb | Self::OpenInNewContext(_))
    }
}

/// Initial overlay offset from the top-left of the viewport, in pixels.
pub const OVERLAY_ORIGIN: (i32, i32) = (20, 20);

/// The lock badge drawn over a locked page.
///
/// Its position only lives as long as the page does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOverlay {
    position: (i32, i32),
    hidden: bool,
}

impl Default for LockOverlay {
    fn default() -> Self {
        Self {
            position: OVERLAY_ORIGIN,
            hidden: false,
        }
    }
}

impl LockOverlay {
    /// Moves the overlay by a drag delta.
    pub fn drag_by(&mut self, dx: i32, dy: i32) {
        self.position.0 += dx;
        self.position.1 += dy;
    }

    /// Current position.
    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    /// Hides the overlay without touching lock state.
    pub fn hide(&mut self) {
        self.hidden = true;
    }

    /// Whether the overlay is shown.
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }
}

/// Lock enforcement for one page.
#[derive(Debug, Clone)]
pub struct EnforcementAgent {
    page_url: String,
    is_page_locked: bool,
    open_links_in_new_tab: bool,
    overlay: Option<LockOverlay>,
}

impl EnforcementAgent {
    /// An agent that has not heard from the coordinator yet.
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            is_page_locked: false,
            open_links_in_new_tab: true,
            overlay: None,
        }
    }

    /// Creates the agent for a page and seeds it from the coordinator.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel fails or the coordinator rejects the query.
    pub fn attach(page_url: impl Into<String>, channel: &mut impl CoordinatorChannel) -> Result<Self> {
        let mut agent = Self::new(page_url);
        match channel.request(Request::CheckPageLock)? {
            Response::PageLock(status) => {
                agent.open_links_in_new_tab = status.open_links_in_new_tab;
                agent.set_locked(status.page_lock);
            }
            Response::Error { error } => return Err(LockError::Protocol(error)),
            other => warn!(?other, "Unexpected reply to page lock query, assuming unlocked"),
        }
        debug!(
            url = %agent.page_url,
            locked = agent.is_page_locked,
            open_links_in_new_tab = agent.open_links_in_new_tab,
            "Agent attached"
        );
        Ok(agent)
    }

    /// Page the agent runs in.
    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// Whether the page is locked.
    pub fn is_page_locked(&self) -> bool {
        self.is_page_locked
    }

    /// Effective link policy.
    pub fn open_links_in_new_tab(&self) -> bool {
        self.open_links_in_new_tab
    }

    /// The overlay, present exactly while the page is locked.
    pub fn overlay(&self) -> Option<&LockOverlay> {
        self.overlay.as_ref()
    }

    /// Mutable overlay access for dragging and hiding.
    pub fn overlay_mut(&mut self) -> Option<&mut LockOverlay> {
        self.overlay.as_mut()
    }

    /// Applies a pushed notification and returns the reply for the pusher.
    pub fn handle_notification(&mut self, notification: &Notification) -> Response {
        match *notification {
            Notification::SetPageLock { enabled } => self.set_locked(enabled),
            Notification::SettingsUpdated { settings } => {
                self.open_links_in_new_tab = settings.open_links_in_new_tab;
            }
        }
        Response::Ack { success: true }
    }

    /// Decides a click given the path from its target up to the root.
    pub fn on_click(&self, path: &[ElementInfo]) -> ClickDecision {
        if !self.is_page_locked {
            return ClickDecision::Ignore;
        }

        let Some(anchor) = path.iter().find(|element| element.is_anchor()) else {
            return ClickDecision::Ignore;
        };
        let href = match anchor.href.as_deref() {
            Some(href) if !href.is_empty() => href,
            _ => return ClickDecision::Ignore,
        };

        if is_in_page_href(href) {
            return ClickDecision::AllowInPage;
        }
        if !self.open_links_in_new_tab {
            return ClickDecision::Absorb;
        }

        match resolve_link(&self.page_url, href) {
            Ok(url) => ClickDecision::OpenInNewContext(url),
            Err(e) => {
                debug!(href, error = %e, "Link does not resolve, absorbing click");
                ClickDecision::Absorb
            }
        }
    }

    /// The overlay was clicked: ask the coordinator to unlock this tab.
    pub fn overlay_clicked(&mut self, channel: &mut impl CoordinatorChannel) -> Result<Response> {
        let response = channel.request(Request::UnlockAllFromBanner)?;
        if let Some(status) = response.lock_status() {
            self.set_locked(status.page_lock);
        }
        Ok(response)
    }

    fn set_locked(&mut self, locked: bool) {
        self.is_page_locked = locked;
        if locked {
            self.overlay.get_or_insert_with(LockOverlay::default);
        } else {
            self.overlay = None;
        }
    }
}
