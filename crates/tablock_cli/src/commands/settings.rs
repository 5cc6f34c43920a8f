//! Show or change global settings.

use super::{yes_no, OfflineCoordinator};
use anyhow::Result;
use tablock_core::SettingsPatch;

pub fn run(open_links_in_new_tab: Option<bool>) -> Result<()> {
    let mut offline = OfflineCoordinator::open()?;

    let settings = match open_links_in_new_tab {
        Some(value) => offline.coordinator.update_global_settings(SettingsPatch {
            open_links_in_new_tab: Some(value),
        }),
        None => offline.coordinator.settings(),
    };

    println!(
        "Open links in new tab: {}",
        yes_no(settings.open_links_in_new_tab)
    );
    Ok(())
}
