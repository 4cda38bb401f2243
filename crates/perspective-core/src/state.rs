//! Persisted previous state
//!
//! The last observation of the remote perspective, kept next to the
//! declared configuration so the next reconciliation knows which name had
//! which ref id.

use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::Path;

use fs2::FileExt;
use perspective_schema::{ConstantRecord, Group};
use serde::{Deserialize, Serialize};

use crate::engine::Observed;
use crate::error::Result;

const STATE_VERSION: &str = "1.0";

/// Previous-state file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    /// State format version for forward compatibility
    pub version: String,
    /// Remote id, once created or imported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perspective_id: Option<String>,
    #[serde(default, rename = "group")]
    pub groups: Vec<Group>,
    #[serde(default, rename = "constant")]
    pub constants: Vec<ConstantRecord>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

impl StateFile {
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION.to_string(),
            perspective_id: None,
            groups: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Load the state file with a shared lock
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, locked, or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        file.lock_shared()?;

        let mut content = String::new();
        (&file).read_to_string(&mut content)?;

        let state: StateFile = toml::from_str(&content)?;
        tracing::debug!(?path, id = ?state.perspective_id, "Loaded state");
        Ok(state)
    }

    /// Load the state file, or start empty if there is none yet
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(?path, "No state file, starting empty");
            Ok(Self::new())
        }
    }

    /// Save atomically under an exclusive lock
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or locked.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        lock_file.lock_exclusive()?;

        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        tracing::debug!(?path, "Saved state");
        Ok(())
    }

    /// Replace the recorded observation
    pub fn record(&mut self, observed: &Observed) {
        self.perspective_id = Some(observed.id.clone());
        self.groups = observed.groups.clone();
        self.constants = observed.constants.clone();
    }

    /// Forget the remote perspective entirely
    pub fn clear(&mut self) {
        self.perspective_id = None;
        self.groups.clear();
        self.constants.clear();
    }

    /// Copy recorded ref ids onto declared groups by list position.
    ///
    /// A declared group that already carries a ref id keeps it. Positional
    /// ids are what let a group renamed in place keep its identity.
    pub fn seed_ref_ids(&self, groups: &mut [Group]) {
        for (group, recorded) in groups.iter_mut().zip(&self.groups) {
            if group.ref_id.is_empty() && !recorded.ref_id.is_empty() {
                group.ref_id = recorded.ref_id.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perspective_schema::ConstantKind;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn observed() -> Observed {
        Observed {
            id: "42".to_string(),
            name: "Env".to_string(),
            include_in_reports: true,
            groups: vec![
                Group::filter("Prod").with_ref_id("0"),
                Group::categorize("Owner").with_ref_id("1"),
            ],
            constants: vec![
                ConstantRecord::group(ConstantKind::StaticGroup, "0", "Prod"),
                ConstantRecord::member("2", "1", "alice", "alice"),
                ConstantRecord::group(ConstantKind::DynamicGroupBlock, "1", "Owner"),
            ],
        }
    }

    #[test]
    fn new_state_has_version() {
        assert_eq!(StateFile::new().version, "1.0");
    }

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".perspective").join("state.toml");

        let mut state = StateFile::new();
        state.record(&observed());
        state.save(&path).unwrap();

        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(StateFile::load(&path).unwrap(), state);
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let state = StateFile::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(state, StateFile::new());
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "version = [").unwrap();

        assert!(StateFile::load(&path).is_err());
    }

    #[test]
    fn clear_forgets_everything_but_version() {
        let mut state = StateFile::new();
        state.record(&observed());
        state.clear();
        assert_eq!(state, StateFile::new());
    }

    #[test]
    fn seed_copies_ids_by_position() {
        let mut state = StateFile::new();
        state.record(&observed());

        let mut declared = vec![
            Group::filter("Production"),
            Group::categorize("Owner").with_ref_id("7"),
            Group::filter("New"),
        ];
        state.seed_ref_ids(&mut declared);

        let ids: Vec<_> = declared.iter().map(|g| g.ref_id.as_str()).collect();
        assert_eq!(ids, vec!["0", "7", ""]);
    }
}
