use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use log::{debug, info};
use crate::errors::WikiError;

/// Thin wrapper around the external version control binary.
///
/// Every command runs with the wiki root as its working directory.
pub struct VcsService {
    root: PathBuf,
    binary: String,
    enabled: bool,
    // serializes add+commit pairs so concurrent requests don't trip over the index lock
    lock: Mutex<()>,
}

impl VcsService {
    pub fn new(root: PathBuf, binary: impl Into<String>, enabled: bool) -> Self {
        let binary = binary.into();
        debug!("Creating VcsService for {:?} using '{}' (enabled: {})", root, binary, enabled);
        Self { root, binary, enabled, lock: Mutex::new(()) }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the wiki root already holds a repository
    pub fn is_initialized(&self) -> bool {
        self.root.join(crate::fs_utils::VCS_DIR).is_dir()
    }

    /// Run `init` in the wiki root
    pub fn initialize(&self) -> Result<(), WikiError> {
        info!("Initializing repository in {:?}", self.root);
        self.exec_in(&["init"])
    }

    /// Stage everything under `path` and record a commit with `message`.
    pub fn commit(&self, path: &Path, message: &str) -> Result<(), WikiError> {
        if !self.enabled {
            debug!("Autocommit disabled, skipping commit '{}'", message);
            return Ok(());
        }
        let _guard = self
            .lock
            .lock()
            .map_err(|_| WikiError::Internal("commit lock poisoned".to_string()))?;

        let target = path.to_string_lossy();
        self.exec_in(&["add", "--all", target.as_ref()])?;
        self.exec_in(&["commit", "-m", message])?;
        info!("Committed: {}", message);
        Ok(())
    }

    /// Execute the binary with `args` using the wiki root as cwd.
    pub fn exec_in(&self, args: &[&str]) -> Result<(), WikiError> {
        debug!("Running {} {:?} in {:?}", self.binary, args, self.root);
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| WikiError::Vcs(format!("{} {} failed to start: {}", self.binary, args.join(" "), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() { stdout.trim().to_string() } else { stderr.trim().to_string() };
            return Err(WikiError::Vcs(format!(
                "{} {} exited with {}: {}",
                self.binary,
                args.first().copied().unwrap_or_default(),
                output.status,
                detail
            )));
        }
        Ok(())
    }
}
