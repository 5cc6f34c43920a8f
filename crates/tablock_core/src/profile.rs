//! Profile directory holding configuration and persisted lock state.
//!
//! ```text
//! <root>/.tablock/
//!   config.toml
//!   state.redb
//!   LOCK          (present while a coordinator runs)
//! ```

use crate::config::Config;
use crate::error::{LockError, Result};
use crate::store::RedbStore;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the profile directory.
pub const DIR_NAME: &str = ".tablock";

const LOCK_FILE: &str = "LOCK";

/// An initialised profile directory.
#[derive(Debug, Clone)]
pub struct Profile {
    root: PathBuf,
    config: Config,
}

impl Profile {
    /// Creates a new profile under `path` with default configuration and an
    /// empty store.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::ProfileExists`] if `path` already has a profile.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tablock_core::Profile;
    ///
    /// let profile = Profile::init(".").unwrap();
    /// ```
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let dir = path.as_ref().join(DIR_NAME);
        if dir.exists() {
            return Err(LockError::ProfileExists(dir));
        }

        fs::create_dir_all(&dir)?;
        let config = Config::default();
        config.save(&dir)?;
        fs::write(dir.join(".gitignore"), "LOCK\n")?;

        let profile = Self { root: dir, config };
        // Creating the database file up front lets `status` run on a fresh profile.
        profile.open_store()?;
        Ok(profile)
    }

    /// Opens the profile under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::NotAProfile`] if there is none, or a config error
    /// if `config.toml` does not parse.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let dir = path.as_ref().join(DIR_NAME);
        if !dir.is_dir() {
            return Err(LockError::NotAProfile(path.as_ref().to_path_buf()));
        }
        let config = Config::load(&dir)?;
        Ok(Self { root: dir, config })
    }

    /// The `.tablock` directory.
    pub fn dir(&self) -> &Path {
        &self.root
    }

    /// Loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the state database.
    pub fn store_path(&self) -> PathBuf {
        self.root.join(&self.config.store.file_name)
    }

    /// Opens the state database.
    pub fn open_store(&self) -> Result<RedbStore> {
        RedbStore::open(self.store_path())
    }

    /// Takes the exclusive profile lock, making the caller the only writer.
    ///
    /// A lock left behind by a dead process is cleaned up.
    pub fn lock(&self) -> Result<ProfileLock> {
        acquire(&self.root.join(LOCK_FILE), 0)
    }
}

/// Exclusive hold on a profile. Released, and the LOCK file removed, on drop.
#[derive(Debug)]
pub struct ProfileLock {
    file: Option<File>,
    path: PathBuf,
}

impl Drop for ProfileLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            drop(file);
        }
        let _ = fs::remove_file(&self.path);
    }
}

fn acquire(path: &Path, attempt: u32) -> Result<ProfileLock> {
    if attempt > 2 {
        return Err(LockError::LockUnavailable(path.to_path_buf()));
    }

    match OpenOptions::new().read(true).write(true).create_new(true).open(path) {
        Ok(mut file) => {
            // Someone reclaiming may have locked our empty file first; it backs off.
            if file.try_lock_exclusive().is_err() {
                drop(file);
                let _ = fs::remove_file(path);
                return Err(LockError::LockUnavailable(path.to_path_buf()));
            }
            writeln!(file, "{}", std::process::id())?;
            file.flush()?;
            Ok(ProfileLock {
                file: Some(file),
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => reclaim(path, attempt),
        Err(e) => Err(LockError::Io(e)),
    }
}

/// The LOCK file exists. It is taken over in place only when nobody holds
/// its advisory lock and the PID inside names a dead process.
///
/// An empty file belongs to a holder that has created it but not yet
/// locked it, so it counts as held.
fn reclaim(path: &Path, attempt: u32) -> Result<ProfileLock> {
    let mut file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return acquire(path, attempt + 1),
        Err(_) => return Err(LockError::LockUnavailable(path.to_path_buf())),
    };

    let mut content = String::new();
    let locked = file.try_lock_exclusive().is_ok();
    if file.read_to_string(&mut content).is_err() {
        content.clear();
    }
    let owner = content.trim().parse::<u32>().ok();

    if !locked {
        return Err(match owner {
            Some(pid) => LockError::ProfileLocked { pid },
            None => LockError::LockUnavailable(path.to_path_buf()),
        });
    }

    match owner {
        Some(pid) if is_process_alive(pid) => return Err(LockError::ProfileLocked { pid }),
        Some(pid) => warn!(pid, "Taking over stale profile lock"),
        None if content.trim().is_empty() => {
            return Err(LockError::LockUnavailable(path.to_path_buf()))
        }
        None => warn!(path = %path.display(), "Profile lock has invalid content, taking it over"),
    }

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}", std::process::id())?;
    file.flush()?;
    Ok(ProfileLock {
        file: Some(file),
        path: path.to_path_buf(),
    })
}

/// Zombie processes keep `/proc/<pid>` but lose a readable stat.
#[cfg(target_os = "linux")]
fn is_process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}/stat", pid)).exists()
}

#[cfg(all(unix, not(target_os = "linux")))]
fn is_process_alive(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(true)
}

#[cfg(not(unix))]
fn is_process_alive(_pid: u32) -> bool {
    true
}
