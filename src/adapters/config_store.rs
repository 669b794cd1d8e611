//! Configuration persistence
//!
//! Save/load/list/delete sync profiles as JSON files in a directory
//! (one `<name>.json` per profile).

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{RigSyncError, RigSyncResult, SyncConfig};

/// Name of the profile that always exists and cannot be deleted
pub const DEFAULT_PROFILE: &str = "Default";

/// A directory of saved SyncConfig profiles.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a profile, replacing any existing file with the same name.
    pub fn save(&self, config: &SyncConfig) -> RigSyncResult<()> {
        let name = sanitize_name(&config.name)?;
        config.validate()?;
        let path = self.ensure_dir()?.join(format!("{name}.json"));
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| RigSyncError::Config(format!("Serialization error: {e}")))?;
        fs::write(&path, json)
            .map_err(|e| RigSyncError::Config(format!("Failed to write config: {e}")))?;
        log::debug!("Saved profile '{name}' to {}", path.display());
        Ok(())
    }

    pub fn load(&self, name: &str) -> RigSyncResult<SyncConfig> {
        let name = sanitize_name(name)?;
        let path = self.dir.join(format!("{name}.json"));
        let json = fs::read_to_string(&path)
            .map_err(|e| RigSyncError::Config(format!("Failed to read config '{name}': {e}")))?;
        let mut config: SyncConfig = serde_json::from_str(&json)
            .map_err(|e| RigSyncError::Config(format!("Failed to parse config '{name}': {e}")))?;
        // The file name is authoritative over the stored field
        config.name = name;
        config.validate()?;
        Ok(config)
    }

    /// Load a profile, or fall back to defaults (named `name`) if it is missing or broken.
    pub fn load_or_default(&self, name: &str) -> SyncConfig {
        match self.load(name) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using defaults");
                SyncConfig {
                    name: sanitize_name(name).unwrap_or_else(|_| DEFAULT_PROFILE.to_string()),
                    ..SyncConfig::default()
                }
            }
        }
    }

    /// Names of all saved profiles, sorted.
    pub fn list(&self) -> RigSyncResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&self.dir)
            .map_err(|e| RigSyncError::Config(format!("Failed to read configs dir: {e}")))?
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let path = entry.path();
                if path.extension()?.to_str()? == "json" {
                    path.file_stem()?.to_str().map(String::from)
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> RigSyncResult<()> {
        let name = sanitize_name(name)?;
        if name == DEFAULT_PROFILE {
            return Err(RigSyncError::Config(
                "Cannot delete the Default configuration".to_string(),
            ));
        }
        let path = self.dir.join(format!("{name}.json"));
        if !path.exists() {
            return Err(RigSyncError::Config(format!("Configuration '{name}' not found")));
        }
        fs::remove_file(&path)
            .map_err(|e| RigSyncError::Config(format!("Failed to delete config '{name}': {e}")))
    }

    /// Get (and create if needed) the profile directory.
    fn ensure_dir(&self) -> RigSyncResult<&Path> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| RigSyncError::Config(format!("Failed to create configs dir: {e}")))?;
        Ok(&self.dir)
    }
}

/// Sanitize a configuration name to prevent path traversal.
/// Like Python's `os.path.basename()` check: rejects anything with
/// path separators, "..", or empty strings.
fn sanitize_name(name: &str) -> RigSyncResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RigSyncError::Config("Configuration name cannot be empty".to_string()));
    }
    if trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(RigSyncError::Config("Invalid configuration name".to_string()));
    }
    // Only allow alphanumeric, spaces, hyphens, underscores
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_')
    {
        return Err(RigSyncError::Config(
            "Configuration name contains invalid characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
