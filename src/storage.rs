use std::fs::{self, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::store::{Action, AppState, Store};

const STATE_DIR: &str = ".rusuite";
const STATE_FILE: &str = "state.json";

/// 需要落盘的状态切片
///
/// current_test_run / is_loading / error 是会话内的瞬时状态，不持久化
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PersistedState {
    #[serde(default)]
    pub test_suites: Vec<crate::model::TestSuite>,

    #[serde(default)]
    pub environments: Vec<crate::model::Environment>,

    #[serde(default)]
    pub selected_environment: Option<String>,
}

impl PersistedState {
    pub fn from_snapshot(state: &AppState) -> Self {
        Self {
            test_suites: state.test_suites.as_ref().clone(),
            environments: state.environments.as_ref().clone(),
            selected_environment: state.selected_environment.clone(),
        }
    }

    /// 通过 action 协议灌回 store
    ///
    /// 环境列表为空时保留 store 已有的种子环境
    pub fn restore(self, store: &Store) {
        store.dispatch(Action::SetTestSuites(self.test_suites));
        if !self.environments.is_empty() {
            store.dispatch(Action::SetEnvironments(self.environments));
        }
        if self.selected_environment.is_some() {
            store.dispatch(Action::SetSelectedEnvironment(self.selected_environment));
        }
    }
}

pub struct SnapshotStorage {
    file_path: PathBuf,
}

impl Default for SnapshotStorage {
    fn default() -> Self {
        let dir = std::env::var("RUSUITE_STATE_DIR").unwrap_or_else(|_| STATE_DIR.to_string());
        let path = Path::new(&dir).join(STATE_FILE);
        Self { file_path: path }
    }
}

impl SnapshotStorage {
    /// Create a new SnapshotStorage (project-local)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specific path (internal/testing use)
    pub fn new_with_path(path: PathBuf) -> Self {
        Self { file_path: path }
    }

    /// Ensure directory exists
    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write the whole state file
    ///
    /// # Concurrency Strategy
    /// Uses `fs2::lock_exclusive` so two rusuite processes cannot interleave
    /// a truncate-and-rewrite. The lock is held only for the write.
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.file_path)?;

        file.lock_exclusive()?;

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer.flush()?;

        // Unlock happens automatically when file is dropped
        drop(writer);
        drop(file);

        Ok(())
    }

    /// Read the state file; None when it does not exist yet
    pub fn load(&self) -> Result<Option<PersistedState>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let file = fs::File::open(&self.file_path)?;
        // Shared lock so we never read a half-written file
        file.lock_shared()?;

        let reader = BufReader::new(file);
        let state = serde_json::from_reader(reader)?;
        Ok(Some(state))
    }
}
