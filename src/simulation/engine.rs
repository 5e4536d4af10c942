use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::{debug, trace};

use crate::network::network_graph::{EdgeKind, NetworkGraph};
use crate::network::topology::{Topology, TopologyError};
use crate::simulation::event::{NEIGHBOR_STATE_TWO_WAY, NeighborUpdate, PhaseEvent};
use crate::simulation::lsa::{Lsa, Lsdb};
use crate::simulation::report::{Route, RouterTable, SimulationReport};

/// Simulation-run failures. No-path conditions are not errors; they surface
/// as empty routes.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid topology: {0}")]
    InvalidTopology(#[from] TopologyError),
    #[error("OSPF simulation failed: {0}")]
    Internal(String),
}

/// Scratch state private to one run. Dropped wholesale when the run ends,
/// successfully or not.
struct RunContext {
    graph: NetworkGraph,
    subgraph: NetworkGraph,
    lsdb: Lsdb,
    steps: Vec<PhaseEvent>,
}

impl RunContext {
    fn new(topology: &Topology) -> Self {
        Self {
            graph: NetworkGraph::build(topology),
            subgraph: NetworkGraph::build_protocol_subgraph(topology),
            lsdb: Lsdb::new(),
            steps: Vec::new(),
        }
    }
}

/// The five-phase convergence engine. Stateless: every `simulate` call
/// builds a fresh [`RunContext`], so one simulator value can serve any
/// number of sequential or concurrent callers.
#[derive(Debug, Default)]
pub struct OspfSimulator;

impl OspfSimulator {
    pub fn new() -> Self {
        Self
    }

    /// Run the full convergence sequence over `topology`. With
    /// `step_by_step` the report also carries the ordered event trace.
    pub fn simulate(
        &self,
        topology: &Topology,
        step_by_step: bool,
    ) -> Result<SimulationReport, SimulationError> {
        topology.validate()?;
        let mut ctx = RunContext::new(topology);

        self.phase_neighbor_discovery(topology, &mut ctx);
        self.phase_lsa_generation(topology, &mut ctx);
        self.phase_lsa_flooding(topology, &mut ctx);
        self.phase_shortest_paths(topology, &mut ctx)?;
        let routing_tables = self.phase_routing_tables(topology, &mut ctx)?;

        let areas = identify_areas(&ctx.graph);
        debug!(
            nodes = ctx.graph.node_count(),
            edges = ctx.graph.edge_count(),
            routers = routing_tables.len(),
            "simulation converged"
        );

        Ok(SimulationReport {
            success: true,
            steps: step_by_step.then_some(ctx.steps),
            routing_tables,
            areas,
            graph_nodes: ctx.graph.node_count(),
            graph_edges: ctx.graph.edge_count(),
        })
    }

    /// Phase 1: each participating router resolves its `ospf` interfaces to
    /// the far end of the referenced link. Every discovered adjacency goes
    /// straight to `2-Way`.
    fn phase_neighbor_discovery(&self, topology: &Topology, ctx: &mut RunContext) {
        for router in topology.participating_routers() {
            let neighbors: Vec<String> = router
                .device
                .ospf_interfaces()
                .filter_map(|iface| topology.link(&iface.link_id))
                .map(|link| link.opposite(router.id()).to_string())
                .collect();
            trace!(router = router.id(), ?neighbors, "hello");

            ctx.steps.push(PhaseEvent::Hello {
                description: format!("Router {} sends Hello packets", router.id()),
                router_id: router.id().to_string(),
                neighbors: neighbors.clone(),
                neighbor_state: NEIGHBOR_STATE_TWO_WAY.to_string(),
            });

            if !neighbors.is_empty() {
                let neighbor_updates = neighbors
                    .into_iter()
                    .map(|neighbor_id| NeighborUpdate {
                        router_id: router.id().to_string(),
                        neighbor_id,
                        new_state: NEIGHBOR_STATE_TWO_WAY.to_string(),
                    })
                    .collect();
                ctx.steps.push(PhaseEvent::NeighborUpdate {
                    description: format!("Update neighbor states for {}", router.id()),
                    neighbor_updates,
                });
            }
        }
    }

    /// Phase 2: every participating router stores a fresh LSA into the
    /// global LSDB, overwriting any prior entry for that router.
    fn phase_lsa_generation(&self, topology: &Topology, ctx: &mut RunContext) {
        for router in topology.participating_routers() {
            let lsa = Lsa::generate(&router, topology);
            trace!(router = router.id(), links = lsa.links.len(), "lsa generated");
            ctx.lsdb.insert(router.id().to_string(), lsa.clone());

            let mut update = Lsdb::new();
            update.insert(router.id().to_string(), lsa.clone());
            ctx.steps.push(PhaseEvent::LsaGeneration {
                description: format!("Router {} generates LSA", router.id()),
                router_id: router.id().to_string(),
                lsa_id: lsa.id,
                lsdb: update,
            });
        }
    }

    /// Phase 3: one flooding event per `ospf` adjacency, each snapshotting
    /// the entire current LSDB. This models eventual full-database
    /// convergence at every node without staged propagation.
    fn phase_lsa_flooding(&self, topology: &Topology, ctx: &mut RunContext) {
        for router in topology.participating_routers() {
            for target in ctx.graph.neighbors_over(router.id(), EdgeKind::Ospf) {
                trace!(source = router.id(), target = %target, "flooding");
                ctx.steps.push(PhaseEvent::LsaFlooding {
                    description: format!("Flooding LSA from {} to {}", router.id(), target),
                    source: router.id().to_string(),
                    target,
                    lsa_id: Lsa::id_for(router.id()),
                    lsdb_update: ctx.lsdb.clone(),
                });
            }
        }
    }

    /// Phase 4: per-router Dijkstra over the protocol subgraph, emitting the
    /// deduplicated undirected edge set forming the union of that router's
    /// shortest-path trees. Skipped entirely when no `ospf` edges exist.
    fn phase_shortest_paths(
        &self,
        topology: &Topology,
        ctx: &mut RunContext,
    ) -> Result<(), SimulationError> {
        if !topology.has_ospf_links() {
            return Ok(());
        }
        for router in topology.participating_routers() {
            let paths = ctx.subgraph.shortest_paths(router.id()).ok_or_else(|| {
                SimulationError::Internal(format!(
                    "router {} missing from protocol subgraph",
                    router.id()
                ))
            })?;

            let mut seen: HashSet<(String, String)> = HashSet::new();
            let mut shortest_path_edges: Vec<(String, String)> = Vec::new();
            for target in paths.targets() {
                if target == router.id() {
                    continue;
                }
                let Some(path) = paths.path_to(target) else {
                    continue;
                };
                for hop in path.windows(2) {
                    if seen.insert(undirected_key(&hop[0], &hop[1])) {
                        shortest_path_edges.push((hop[0].clone(), hop[1].clone()));
                    }
                }
            }
            debug!(
                router = router.id(),
                edges = shortest_path_edges.len(),
                "dijkstra"
            );

            ctx.steps.push(PhaseEvent::Dijkstra {
                description: format!("Router {} runs Dijkstra's algorithm", router.id()),
                router_id: router.id().to_string(),
                shortest_path_edges,
            });
        }
        Ok(())
    }

    /// Phase 5: re-run the shortest-path computation and derive one route
    /// per reachable destination, next-hop being the second path node. With
    /// zero `ospf` edges every table is present but empty.
    fn phase_routing_tables(
        &self,
        topology: &Topology,
        ctx: &mut RunContext,
    ) -> Result<Vec<RouterTable>, SimulationError> {
        let has_ospf = topology.has_ospf_links();
        let mut tables = Vec::new();

        for router in topology.participating_routers() {
            if !has_ospf {
                tables.push(RouterTable {
                    router: router.id().to_string(),
                    area: router.area(),
                    routes: Vec::new(),
                    lsdb: ctx.lsdb.clone(),
                    neighbors: router.ospf.neighbors.clone(),
                });
                continue;
            }

            let paths = ctx.subgraph.shortest_paths(router.id()).ok_or_else(|| {
                SimulationError::Internal(format!(
                    "router {} missing from protocol subgraph",
                    router.id()
                ))
            })?;

            let mut routes = Vec::new();
            for target in paths.targets() {
                if target == router.id() {
                    continue;
                }
                let (Some(cost), Some(path)) = (paths.cost_to(target), paths.path_to(target))
                else {
                    continue;
                };
                routes.push(Route {
                    destination: target.clone(),
                    next_hop: path.get(1).cloned(),
                    cost,
                    path,
                });
            }
            debug!(router = router.id(), routes = routes.len(), "routing table");

            ctx.steps.push(PhaseEvent::RoutingUpdate {
                description: format!("Router {} updates routing table", router.id()),
                router_id: router.id().to_string(),
                routes: routes.clone(),
            });
            tables.push(RouterTable {
                router: router.id().to_string(),
                area: router.area(),
                routes,
                lsdb: ctx.lsdb.clone(),
                neighbors: router.ospf.neighbors.clone(),
            });
        }
        Ok(tables)
    }
}

fn undirected_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Bucket routers by area id: nodes tagged `router` in graph insertion
/// order, whether or not they carry an OSPF config (area defaults to 0).
fn identify_areas(graph: &NetworkGraph) -> BTreeMap<u32, Vec<String>> {
    let mut areas: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for index in graph.graph.node_indices() {
        let node = &graph.graph[index];
        if node.kind == "router" {
            areas.entry(node.area).or_default().push(node.id.clone());
        }
    }
    areas
}
