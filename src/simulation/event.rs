use serde::{Deserialize, Serialize};

use crate::simulation::lsa::Lsdb;
use crate::simulation::report::Route;

/// Neighbor state reached by every adjacency in this simplified model; no
/// Init/ExStart/Exchange/Loading/Full progression is simulated.
pub const NEIGHBOR_STATE_TWO_WAY: &str = "2-Way";

/// One observable protocol action. Events are appended in emission order and
/// never mutated afterwards; the trace drives step-by-step animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseEvent {
    /// A router announced itself on its `ospf` interfaces.
    Hello {
        description: String,
        router_id: String,
        neighbors: Vec<String>,
        neighbor_state: String,
    },
    /// Adjacency state transitions following a round of Hello packets.
    NeighborUpdate {
        description: String,
        neighbor_updates: Vec<NeighborUpdate>,
    },
    /// A router generated its LSA; `lsdb` holds just the new entry.
    LsaGeneration {
        description: String,
        router_id: String,
        lsa_id: String,
        lsdb: Lsdb,
    },
    /// An LSA crossed one `ospf` edge; `lsdb_update` snapshots the entire
    /// current database, modelling eventual full convergence at every node.
    LsaFlooding {
        description: String,
        source: String,
        target: String,
        lsa_id: String,
        lsdb_update: Lsdb,
    },
    /// Union of a router's shortest-path trees, as deduplicated undirected
    /// edges.
    Dijkstra {
        description: String,
        router_id: String,
        shortest_path_edges: Vec<(String, String)>,
    },
    /// A router derived its routing table.
    RoutingUpdate {
        description: String,
        router_id: String,
        routes: Vec<Route>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborUpdate {
    pub router_id: String,
    pub neighbor_id: String,
    pub new_state: String,
}
