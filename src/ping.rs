/*!
Hop-by-hop ping path calculation.

Independent of the protocol engine: builds its own flat graph where every
link counts regardless of type, weighted by declared cost (default 1), and
returns the single shortest path between two endpoints. Never errors — an
unknown endpoint and a disconnected endpoint take the same structured
"not found" shape.
*/

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::network::network_graph::NetworkGraph;
use crate::network::topology::Topology;

/// Result of a ping path calculation, shaped for direct JSON serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingReport {
    pub success: bool,
    pub path: Vec<String>,
    pub hops: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PingReport {
    fn found(source: &str, destination: &str, path: Vec<String>) -> Self {
        Self {
            success: true,
            hops: path.len().saturating_sub(1),
            path,
            source: Some(source.to_string()),
            destination: Some(destination.to_string()),
            message: None,
        }
    }

    fn not_found(source: &str, destination: &str) -> Self {
        Self {
            success: false,
            path: Vec::new(),
            hops: 0,
            source: None,
            destination: None,
            message: Some(format!(
                "No path found between {source} and {destination}"
            )),
        }
    }
}

/// Shortest hop-by-hop path between `source` and `destination` over the raw
/// topology. The input is deliberately not validated; dangling references
/// simply mean the endpoint is not found.
pub fn calculate_ping_path(source: &str, destination: &str, topology: &Topology) -> PingReport {
    let graph = NetworkGraph::build_flat(topology);
    let Some(paths) = graph.shortest_paths(source) else {
        debug!(source, destination, "ping source not in topology");
        return PingReport::not_found(source, destination);
    };
    match paths.path_to(destination) {
        Some(path) => {
            debug!(source, destination, hops = path.len() - 1, "ping path found");
            PingReport::found(source, destination, path)
        }
        None => {
            debug!(source, destination, "no ping path");
            PingReport::not_found(source, destination)
        }
    }
}
