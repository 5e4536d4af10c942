use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};

use petgraph::graph::NodeIndex;
use petgraph::prelude::StableUnGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::network::{device::Device, link::Link, topology::Topology};

/// Edge classification in the built graph: `ospf` edges carry the link cost
/// as weight, everything else is an access edge of weight 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Ospf,
    Access,
}

/// Graph node: the device id plus a full snapshot of its declarative data
/// for later inspection.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    pub kind: String,
    pub ip: String,
    pub area: u32,
    pub device: Device,
}

impl GraphNode {
    fn new(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            kind: device.kind.clone(),
            ip: device.ip.clone(),
            area: device.area(),
            device: device.clone(),
        }
    }
}

/// Graph edge: resolved weight plus the original link data.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub weight: u32,
    pub kind: EdgeKind,
    pub area: u32,
    pub link: Link,
}

/// Undirected weighted graph view of a topology, rebuilt from scratch per
/// run. `node_id_to_index_map` maps stable device ids to graph indices to
/// allow safe lookups; dangling references are skipped rather than panicking.
pub struct NetworkGraph {
    pub graph: StableUnGraph<GraphNode, GraphEdge>,
    pub node_id_to_index_map: HashMap<String, NodeIndex>,
}

impl NetworkGraph {
    /// Simulation view: every device a node, `ospf` links weighted by their
    /// cost, any other link an access edge of weight 1. Parallel links
    /// between the same endpoints collapse to the last one declared.
    pub fn build(topology: &Topology) -> Self {
        let mut this = Self::with_nodes(topology.devices.iter());
        for link in &topology.links {
            let edge = if link.is_ospf() {
                GraphEdge {
                    weight: link.ospf_cost(),
                    kind: EdgeKind::Ospf,
                    area: link.area,
                    link: link.clone(),
                }
            } else {
                GraphEdge {
                    weight: 1,
                    kind: EdgeKind::Access,
                    area: 0,
                    link: link.clone(),
                }
            };
            this.add_link_edge(link, edge);
        }
        this
    }

    /// Ping view: every link becomes an edge regardless of type, weighted by
    /// its declared cost (default 1).
    pub fn build_flat(topology: &Topology) -> Self {
        let mut this = Self::with_nodes(topology.devices.iter());
        for link in &topology.links {
            let kind = if link.is_ospf() {
                EdgeKind::Ospf
            } else {
                EdgeKind::Access
            };
            let edge = GraphEdge {
                weight: link.ping_cost(),
                kind,
                area: link.area,
                link: link.clone(),
            };
            this.add_link_edge(link, edge);
        }
        this
    }

    /// Protocol subgraph for the shortest-path phases: one node per
    /// participating router plus every `ospf`-typed link with its weight
    /// preserved. Endpoints of `ospf` links that are not participating
    /// routers are pulled in implicitly.
    pub fn build_protocol_subgraph(topology: &Topology) -> Self {
        let mut this = Self::with_nodes(topology.participating_routers().map(|r| r.device));
        for link in topology.links.iter().filter(|l| l.is_ospf()) {
            for endpoint in [&link.source, &link.target] {
                if !this.node_id_to_index_map.contains_key(endpoint.as_str()) {
                    if let Some(device) = topology.device(endpoint) {
                        this.add_node(device);
                    }
                }
            }
            let edge = GraphEdge {
                weight: link.ospf_cost(),
                kind: EdgeKind::Ospf,
                area: link.area,
                link: link.clone(),
            };
            this.add_link_edge(link, edge);
        }
        this
    }

    fn with_nodes<'a>(devices: impl Iterator<Item = &'a Device>) -> Self {
        let mut this = Self {
            graph: StableUnGraph::default(),
            node_id_to_index_map: HashMap::new(),
        };
        for device in devices {
            this.add_node(device);
        }
        this
    }

    fn add_node(&mut self, device: &Device) {
        let index = self.graph.add_node(GraphNode::new(device));
        self.node_id_to_index_map.insert(device.id.clone(), index);
    }

    fn add_link_edge(&mut self, link: &Link, edge: GraphEdge) {
        if let (Some(&source), Some(&target)) = (
            self.node_id_to_index_map.get(link.source.as_str()),
            self.node_id_to_index_map.get(link.target.as_str()),
        ) {
            self.graph.update_edge(source, target, edge);
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        let index = self.node_id_to_index_map.get(id)?;
        self.graph.node_weight(*index)
    }

    /// Neighbor ids reachable from `id` over edges of the given kind, in edge
    /// declaration order.
    pub fn neighbors_over(&self, id: &str, kind: EdgeKind) -> Vec<String> {
        let Some(&index) = self.node_id_to_index_map.get(id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<String> = self
            .graph
            .edges(index)
            .filter(|edge| edge.weight().kind == kind)
            .map(|edge| self.graph[edge.target()].id.clone())
            .collect();
        // petgraph yields incident edges in reverse insertion order.
        neighbors.reverse();
        neighbors
    }

    /// Deterministic Dijkstra from `source` over the graph's edge weights.
    ///
    /// Equal-cost ties resolve toward the lexicographically smaller node id
    /// (both in settle order and in predecessor choice), so repeated runs on
    /// the same topology pick the same paths. Returns `None` when the source
    /// id is not in the graph.
    pub fn shortest_paths(&self, source: &str) -> Option<ShortestPaths> {
        let &start = self.node_id_to_index_map.get(source)?;

        let mut dist: HashMap<NodeIndex, u64> = HashMap::new();
        let mut pred: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut settled: HashSet<NodeIndex> = HashSet::new();
        let mut heap: BinaryHeap<Reverse<(u64, String, NodeIndex)>> = BinaryHeap::new();

        dist.insert(start, 0);
        heap.push(Reverse((0, source.to_string(), start)));

        while let Some(Reverse((cost, _, node))) = heap.pop() {
            if !settled.insert(node) {
                continue;
            }
            for edge in self.graph.edges(node) {
                let next = edge.target();
                if settled.contains(&next) {
                    continue;
                }
                let next_cost = cost + u64::from(edge.weight().weight);
                match dist.get(&next) {
                    Some(&known) if next_cost > known => {}
                    Some(&known) if next_cost == known => {
                        // Equal cost: keep the smaller predecessor id.
                        if let Some(&current) = pred.get(&next) {
                            if self.graph[node].id < self.graph[current].id {
                                pred.insert(next, node);
                            }
                        }
                    }
                    _ => {
                        dist.insert(next, next_cost);
                        pred.insert(next, node);
                        heap.push(Reverse((next_cost, self.graph[next].id.clone(), next)));
                    }
                }
            }
        }

        let mut dist_by_id = BTreeMap::new();
        for (index, cost) in dist {
            dist_by_id.insert(self.graph[index].id.clone(), cost);
        }
        let mut pred_by_id = BTreeMap::new();
        for (index, parent) in pred {
            pred_by_id.insert(self.graph[index].id.clone(), self.graph[parent].id.clone());
        }

        Some(ShortestPaths {
            source: source.to_string(),
            dist: dist_by_id,
            pred: pred_by_id,
        })
    }
}

/// Single-source shortest-path result keyed by device id.
pub struct ShortestPaths {
    source: String,
    dist: BTreeMap<String, u64>,
    pred: BTreeMap<String, String>,
}

impl ShortestPaths {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Reachable targets in lexicographic order, the source included.
    pub fn targets(&self) -> impl Iterator<Item = &String> {
        self.dist.keys()
    }

    pub fn cost_to(&self, target: &str) -> Option<u64> {
        self.dist.get(target).copied()
    }

    /// Full path from the source to `target`, both endpoints included.
    /// `None` when the target is unreachable or unknown.
    pub fn path_to(&self, target: &str) -> Option<Vec<String>> {
        if !self.dist.contains_key(target) {
            return None;
        }
        let mut path = vec![target.to_string()];
        let mut current = target;
        while current != self.source {
            current = self.pred.get(current)?;
            path.push(current.to_string());
        }
        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_topology() -> Topology {
        let json = include_str!("../../test_data/line_topology.json");
        serde_json::from_str(json).unwrap()
    }

    fn ping_topology() -> Topology {
        let json = include_str!("../../test_data/ping_topology.json");
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_build_counts_and_weights() {
        let topology = line_topology();
        let graph = NetworkGraph::build(&topology);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);

        let paths = graph.shortest_paths("R1").unwrap();
        assert_eq!(paths.source(), "R1");
        assert_eq!(paths.cost_to("R3"), Some(8));
        assert_eq!(
            paths.path_to("R3").unwrap(),
            vec!["R1".to_string(), "R2".to_string(), "R3".to_string()]
        );
        // R4 has no links at all.
        assert_eq!(paths.cost_to("R4"), None);
        assert!(paths.path_to("R4").is_none());
    }

    #[test]
    fn test_access_links_weigh_one_in_simulation_view() {
        let topology = ping_topology();
        let graph = NetworkGraph::build(&topology);
        // H1 -(access)- R1 weighs 1 in the simulation view.
        let paths = graph.shortest_paths("H1").unwrap();
        assert_eq!(paths.cost_to("R1"), Some(1));
        // R1 -(ospf cost 5)- R2 keeps its cost.
        assert_eq!(paths.cost_to("R2"), Some(6));
    }

    #[test]
    fn test_duplicate_links_dedup() {
        let mut topology = line_topology();
        let mut dup = topology.links[0].clone();
        dup.id = "link1-dup".to_string();
        dup.cost = Some(7);
        topology.links.push(dup);

        let graph = NetworkGraph::build(&topology);
        // Same endpoints: the later declaration replaces the earlier edge.
        assert_eq!(graph.edge_count(), 2);
        let paths = graph.shortest_paths("R1").unwrap();
        assert_eq!(paths.cost_to("R2"), Some(7));
    }

    #[test]
    fn test_dangling_endpoint_skipped_without_panic() {
        let mut topology = line_topology();
        topology.links[1].target = "missing".to_string();
        let graph = NetworkGraph::build(&topology);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_equal_cost_tie_breaks_lexicographically() {
        let json = r#"{
            "devices": [
                {"id": "A", "type": "router"},
                {"id": "B", "type": "router"},
                {"id": "C", "type": "router"},
                {"id": "D", "type": "router"}
            ],
            "links": [
                {"id": "l1", "source": "A", "target": "C", "type": "ospf", "cost": 1},
                {"id": "l2", "source": "C", "target": "D", "type": "ospf", "cost": 1},
                {"id": "l3", "source": "A", "target": "B", "type": "ospf", "cost": 1},
                {"id": "l4", "source": "B", "target": "D", "type": "ospf", "cost": 1}
            ],
            "timestamp": ""
        }"#;
        let topology: Topology = serde_json::from_str(json).unwrap();
        let graph = NetworkGraph::build(&topology);
        let paths = graph.shortest_paths("A").unwrap();
        assert_eq!(paths.cost_to("D"), Some(2));
        // Both A-B-D and A-C-D cost 2; B wins the predecessor tie.
        assert_eq!(
            paths.path_to("D").unwrap(),
            vec!["A".to_string(), "B".to_string(), "D".to_string()]
        );
    }

    #[test]
    fn test_protocol_subgraph_excludes_access_only_devices() {
        let topology = ping_topology();
        let graph = NetworkGraph::build_protocol_subgraph(&topology);
        // R1 and R2 participate; H1/H2 hang off access links only.
        assert!(graph.node("R1").is_some());
        assert!(graph.node("R2").is_some());
        assert!(graph.node("H1").is_none());
        assert!(graph.node("H2").is_none());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_neighbors_over_yields_far_endpoints_in_declaration_order() {
        let graph = NetworkGraph::build(&line_topology());
        // The far end of each incident edge, never the queried node itself,
        // in link declaration order.
        assert_eq!(graph.neighbors_over("R2", EdgeKind::Ospf), vec!["R1", "R3"]);
        assert_eq!(graph.neighbors_over("R1", EdgeKind::Ospf), vec!["R2"]);
        assert!(graph.neighbors_over("R4", EdgeKind::Ospf).is_empty());
        assert!(graph.neighbors_over("R2", EdgeKind::Access).is_empty());
    }

    #[test]
    fn test_shortest_paths_source_is_trivial() {
        let topology = line_topology();
        let graph = NetworkGraph::build(&topology);
        let paths = graph.shortest_paths("R2").unwrap();
        assert_eq!(paths.cost_to("R2"), Some(0));
        assert_eq!(paths.path_to("R2").unwrap(), vec!["R2".to_string()]);
    }
}
