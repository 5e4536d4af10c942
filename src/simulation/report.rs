use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::simulation::event::PhaseEvent;
use crate::simulation::lsa::Lsdb;

/// One routing-table entry: destination, the first intermediate router on
/// the shortest path, total cost and the full hop sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub destination: String,
    pub next_hop: Option<String>,
    pub cost: u64,
    pub path: Vec<String>,
}

/// Per-router output of a run: derived routes plus the global LSDB snapshot
/// and the caller-supplied neighbor seed list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterTable {
    pub router: String,
    pub area: u32,
    pub routes: Vec<Route>,
    pub lsdb: Lsdb,
    pub neighbors: Vec<Value>,
}

/// Assembled result of a simulation run. `steps` is present only when the
/// caller asked for the step-by-step trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<PhaseEvent>>,
    pub routing_tables: Vec<RouterTable>,
    pub areas: BTreeMap<u32, Vec<String>>,
    pub graph_nodes: usize,
    pub graph_edges: usize,
}
