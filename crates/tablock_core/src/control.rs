//! The popup: a stateless reflector of one tab's lock state.

use crate::agent::CoordinatorChannel;
use crate::error::{LockError, Result};
use crate::protocol::{Request, Response, SettingsPatch};
use crate::types::{LockKind, LockStatus, TabId};

/// Label of the combined control when both locks are on.
pub const BOTH_LOCKED_LABEL: &str = "\u{2713} Both Locked";

/// Label of the combined control otherwise.
pub const LOCK_BOTH_LABEL: &str = "\u{1F512}\u{26D4} Lock Both";

/// What the popup renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupView {
    pub page_lock: bool,
    pub tab_lock: bool,
    /// The tab's stored override (`None` = inherit).
    pub tab_override: Option<bool>,
    /// Global link policy.
    pub global_open_links: bool,
}

impl PopupView {
    pub fn both_locked(&self) -> bool {
        self.page_lock && self.tab_lock
    }

    /// Text of the combined lock control.
    pub fn lock_both_label(&self) -> &'static str {
        if self.both_locked() {
            BOTH_LOCKED_LABEL
        } else {
            LOCK_BOTH_LABEL
        }
    }

    /// Link policy the tab's page is enforcing.
    pub fn effective_open_links(&self) -> bool {
        self.tab_override.unwrap_or(self.global_open_links)
    }
}

/// Popup opened on the active tab. Holds nothing that outlives it.
pub struct ControlSurface<C> {
    channel: C,
    tab_id: TabId,
    url: String,
    view: PopupView,
}

impl<C: CoordinatorChannel> ControlSurface<C> {
    /// Opens the popup on `tab_id` and loads its state.
    ///
    /// The caller resolves the active tab with the browser's own tab query
    /// and passes its id and URL; the popup only talks to the coordinator.
    pub fn open(mut channel: C, tab_id: TabId, url: impl Into<String>) -> Result<Self> {
        let status = expect_status(channel.request(Request::GetLockStatus { tab_id })?)?;
        let settings = match channel.request(Request::GetSettings)? {
            Response::Settings(settings) => settings,
            other => return Err(unexpected("getSettings", &other)),
        };

        let mut surface = Self {
            channel,
            tab_id,
            url: url.into(),
            view: PopupView {
                page_lock: false,
                tab_lock: false,
                tab_override: None,
                global_open_links: settings.open_links_in_new_tab,
            },
        };
        surface.apply(status);
        Ok(surface)
    }

    /// Current rendering.
    pub fn view(&self) -> &PopupView {
        &self.view
    }

    pub fn toggle(&mut self, kind: LockKind) -> Result<PopupView> {
        let response = self.channel.request(Request::ToggleLock {
            tab_id: self.tab_id,
            lock_type: kind,
            url: self.url.clone(),
        })?;
        self.apply(expect_status(response)?);
        Ok(self.view)
    }

    pub fn lock_both(&mut self) -> Result<PopupView> {
        let response = self.channel.request(Request::LockBoth {
            tab_id: self.tab_id,
            url: self.url.clone(),
        })?;
        self.apply(expect_status(response)?);
        Ok(self.view)
    }

    pub fn unlock_all(&mut self) -> Result<PopupView> {
        let response = self.channel.request(Request::UnlockAll {
            tab_id: self.tab_id,
        })?;
        self.apply(expect_status(response)?);
        Ok(self.view)
    }

    /// Sets or clears (`None`) this tab's link-policy override.
    pub fn set_tab_override(&mut self, value: Option<bool>) -> Result<PopupView> {
        let response = self.channel.request(Request::UpdateSettings {
            settings: SettingsPatch {
                open_links_in_new_tab: value,
            },
            tab_id: Some(self.tab_id),
            url: Some(self.url.clone()),
        })?;
        match response {
            Response::TabSettings(settings) => {
                self.view.tab_override = settings.open_links_in_new_tab;
                Ok(self.view)
            }
            other => Err(unexpected("updateSettings", &other)),
        }
    }

    /// Changes the global link policy.
    pub fn set_global(&mut self, value: bool) -> Result<PopupView> {
        let response = self.channel.request(Request::UpdateSettings {
            settings: SettingsPatch {
                open_links_in_new_tab: Some(value),
            },
            tab_id: None,
            url: None,
        })?;
        match response {
            Response::Settings(settings) => {
                self.view.global_open_links = settings.open_links_in_new_tab;
                Ok(self.view)
            }
            other => Err(unexpected("updateSettings", &other)),
        }
    }

    fn apply(&mut self, status: LockStatus) {
        self.view.page_lock = status.page_lock;
        self.view.tab_lock = status.tab_lock;
        self.view.tab_override = status.open_links_in_new_tab;
    }
}

fn expect_status(response: Response) -> Result<LockStatus> {
    match response {
        Response::LockStatus(status) => Ok(status),
        other => Err(unexpected("lock status", &other)),
    }
}

fn unexpected(expected: &str, response: &Response) -> LockError {
    match response {
        Response::Error { error } => LockError::Protocol(error.clone()),
        other => LockError::Protocol(format!("expected {} reply, got {:?}", expected, other)),
    }
}
