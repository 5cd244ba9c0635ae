use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::store::KeyValueStore;
use crate::graph_utils::graph::GraphState;

pub const STORAGE_STATE_VERSION: u32 = 1;
pub const STORAGE_STATE_KEY: &str = "state";

#[derive(Debug, Serialize)]
struct StoredStateRef<'a> {
    version: u32,
    data: &'a GraphState,
}

#[derive(Debug, Deserialize)]
struct StoredState {
    version: u32,
    data: serde_json::Value,
}

pub fn serialize(state: &GraphState) -> anyhow::Result<String> {
    let envelope = StoredStateRef { version: STORAGE_STATE_VERSION, data: state };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse a stored blob. Anything malformed or written under another
/// version reads as "nothing saved".
pub fn deserialize(blob: &str) -> Option<GraphState> {
    let stored: StoredState = match serde_json::from_str(blob) {
        Ok(s) => s,
        Err(e) => {
            debug!("ignoring unreadable saved state: {}", e);
            return None;
        }
    };
    if stored.version != STORAGE_STATE_VERSION {
        debug!("ignoring saved state with version {}", stored.version);
        return None;
    }
    match serde_json::from_value(stored.data) {
        Ok(state) => Some(state),
        Err(e) => {
            debug!("ignoring saved state with bad data: {}", e);
            None
        }
    }
}

pub fn save(store: &mut dyn KeyValueStore, state: &GraphState) -> anyhow::Result<()> {
    let blob = serialize(state)?;
    store.set(STORAGE_STATE_KEY, &blob)?;
    info!("saved graph with {} nodes, {} edges", state.nodes.len(), state.edges.len());
    Ok(())
}

pub fn load(store: &dyn KeyValueStore) -> Option<GraphState> {
    match store.get(STORAGE_STATE_KEY) {
        Ok(Some(blob)) => deserialize(&blob),
        Ok(None) => None,
        Err(e) => {
            debug!("saved state not readable: {}", e);
            None
        }
    }
}
