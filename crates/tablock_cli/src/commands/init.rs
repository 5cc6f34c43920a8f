//! Initialize a new tablock profile.

use anyhow::{Context, Result};
use tablock_core::Profile;

/// Initialize a tablock profile in the current directory.
pub fn run() -> Result<()> {
    let profile = Profile::init(".").context("Failed to initialize tablock profile")?;
    let config = profile.config();

    println!("Initialized tablock profile in {}/", profile.dir().display());
    println!();
    println!("  config.toml  - Defaults, reopen and badge settings");
    println!("  {}   - Persisted lock records and settings", config.store.file_name);
    println!();
    println!(
        "Open links in new tab by default: {}",
        config.defaults.open_links_in_new_tab
    );
    println!(
        "Reopened tabs wait {}s for their replacement",
        config.reopen.ttl_secs
    );

    Ok(())
}
