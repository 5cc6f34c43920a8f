//! CLI commands.

pub mod init;
pub mod replay;
pub mod request;
pub mod settings;
pub mod status;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;
use tablock_core::{
    LockCoordinator, LockError, Profile, ProfileLock, RedbStore, SimulatedHost,
};

/// A coordinator over the profile in the current directory, holding the
/// profile lock for as long as it lives.
///
/// No browser is attached: pushes and badge updates go nowhere.
pub struct OfflineCoordinator {
    pub coordinator: LockCoordinator<RedbStore, SimulatedHost>,
    // Dropped after the coordinator has closed the store.
    _lock: ProfileLock,
}

impl OfflineCoordinator {
    pub fn open() -> Result<Self> {
        let profile = Profile::open(".")?;
        let lock = profile.lock()?;
        let store = profile
            .open_store()
            .with_context(|| format!("Failed to open {}", profile.store_path().display()))?;
        let coordinator =
            LockCoordinator::start(store, SimulatedHost::new(), profile.config().clone())?;
        debug!(
            profile = %profile.dir().display(),
            locked_tabs = coordinator.table().len(),
            "Opened offline coordinator"
        );
        Ok(Self {
            coordinator,
            _lock: lock,
        })
    }
}

/// Prints an error with its recovery hint, if it carries one.
pub fn report_error(error: &anyhow::Error) {
    eprintln!("{} {:#}", style("error:").red().bold(), error);

    let hint = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<LockError>())
        .and_then(LockError::recovery_suggestion);
    if let Some(hint) = hint {
        eprintln!("{} {}", style("hint:").cyan(), hint);
    }
}

pub fn yes_no(value: bool) -> console::StyledObject<&'static str> {
    if value {
        style("yes").green()
    } else {
        style("no").dim()
    }
}
