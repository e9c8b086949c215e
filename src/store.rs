use crate::error::StoreError;
use crate::model::Step;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Flow type used when none is specified.
pub const PASSWORD_RECOVERY_FLOW_TYPE: &str = "PASSWORD_RECOVERY";

/// The persisted form of a flow: its steps, keyed by flow type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedFlow {
    #[serde(default)]
    pub flow_type: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Where persisted flows are fetched from and published to.
///
/// Transport (HTTP, files, ...) is the implementor's business; the session only sees
/// whole documents.
pub trait FlowStore {
    /// Returns `None` when nothing has been persisted for `flow_type` yet.
    fn fetch(&self, flow_type: &str) -> Result<Option<PersistedFlow>, StoreError>;

    fn publish(&mut self, flow: &PersistedFlow) -> Result<(), StoreError>;
}

/// Keeps flows in memory. Handy for tests and for embedding.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFlowStore {
    flows: AHashMap<String, PersistedFlow>,
}

impl InMemoryFlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flow(mut self, flow: PersistedFlow) -> Self {
        self.flows.insert(flow.flow_type.clone(), flow);
        self
    }

    pub fn get(&self, flow_type: &str) -> Option<&PersistedFlow> {
        self.flows.get(flow_type)
    }
}

impl FlowStore for InMemoryFlowStore {
    fn fetch(&self, flow_type: &str) -> Result<Option<PersistedFlow>, StoreError> {
        Ok(self.flows.get(flow_type).cloned())
    }

    fn publish(&mut self, flow: &PersistedFlow) -> Result<(), StoreError> {
        self.flows.insert(flow.flow_type.clone(), flow.clone());
        Ok(())
    }
}

/// Stores each flow as `<dir>/<flow_type>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileFlowStore {
    dir: PathBuf,
}

impl JsonFileFlowStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, flow_type: &str) -> PathBuf {
        self.dir.join(format!("{}.json", flow_type.to_ascii_lowercase()))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

impl FlowStore for JsonFileFlowStore {
    fn fetch(&self, flow_type: &str) -> Result<Option<PersistedFlow>, StoreError> {
        let path = self.path_for(flow_type);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let mut flow: PersistedFlow =
            serde_json::from_str(&content).map_err(|e| StoreError::Json(e.to_string()))?;
        if flow.flow_type.is_empty() {
            flow.flow_type = flow_type.to_string();
        }
        Ok(Some(flow))
    }

    fn publish(&mut self, flow: &PersistedFlow) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.path_for(&flow.flow_type);
        let json =
            serde_json::to_string_pretty(flow).map_err(|e| StoreError::Json(e.to_string()))?;
        fs::write(&path, json).map_err(|e| io_error(&path, e))
    }
}
