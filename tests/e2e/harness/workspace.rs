use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tablock_core::{Profile, DIR_NAME};
use tempfile::TempDir;

/// An isolated directory holding one tablock profile.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Create a workspace with a fresh profile
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp directory")?;
        Profile::init(dir.path()).context("Failed to initialize profile")?;
        Ok(Self { dir })
    }

    /// Create a workspace whose profile uses the given config.toml
    pub fn with_config(config_toml: &str) -> Result<Self> {
        let workspace = Self::new()?;
        fs::write(
            workspace.path().join(DIR_NAME).join("config.toml"),
            config_toml,
        )
        .context("Failed to write config.toml")?;
        Ok(workspace)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open the profile (re-reading config.toml)
    pub fn profile(&self) -> Result<Profile> {
        Ok(Profile::open(self.path())?)
    }
}
