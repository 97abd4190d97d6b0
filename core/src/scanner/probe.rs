use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chanman_common::topology::{TopologyError, TopologyModel};
use parking_lot::Mutex;
use thiserror::Error;

use super::TopologyProbe;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not read snapshot {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("inconsistent snapshot {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: TopologyError,
    },
}

/// Reports whatever snapshot it currently holds. The snapshot can be swapped through
/// [`StaticProbe::handle`] while a scanner thread is running.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    snapshot: Arc<Mutex<TopologyModel>>,
}

impl StaticProbe {
    pub fn new(snapshot: TopologyModel) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(snapshot)),
        }
    }

    pub fn handle(&self) -> Arc<Mutex<TopologyModel>> {
        Arc::clone(&self.snapshot)
    }
}

impl TopologyProbe for StaticProbe {
    fn scan(&mut self) -> anyhow::Result<TopologyModel> {
        Ok(self.snapshot.lock().clone())
    }

    fn describe(&self) -> String {
        "static snapshot".to_string()
    }
}

/// Re-reads a JSON-encoded [`TopologyModel`] from disk on every scan.
#[derive(Debug, Clone)]
pub struct SnapshotFileProbe {
    path: PathBuf,
}

impl SnapshotFileProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<TopologyModel, ProbeError> {
        let text = fs::read_to_string(&self.path).map_err(|source| ProbeError::Read {
            path: self.path.clone(),
            source,
        })?;
        let model: TopologyModel =
            serde_json::from_str(&text).map_err(|source| ProbeError::Parse {
                path: self.path.clone(),
                source,
            })?;
        model.validate().map_err(|source| ProbeError::Invalid {
            path: self.path.clone(),
            source,
        })?;
        Ok(model)
    }
}

impl TopologyProbe for SnapshotFileProbe {
    fn scan(&mut self) -> anyhow::Result<TopologyModel> {
        Ok(self.read()?)
    }

    fn describe(&self) -> String {
        format!("snapshot file {}", self.path.display())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
