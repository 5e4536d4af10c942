/*!
Simulation engine for an idealized OSPF convergence sequence over a
declarative network topology, plus a hop-by-hop ping path calculator.

The crate exposes two operations:
- `OspfSimulator::simulate`: build a weighted graph from the topology, run
  the five protocol phases (neighbor discovery, LSA generation, LSA flooding,
  shortest-path computation, routing-table derivation) and assemble a report,
  optionally with the ordered step trace for animation.
- `calculate_ping_path`: independent shortest-path lookup between two
  endpoints over the same topology, used for ping probes.

Transport concerns (HTTP, request validation, CORS) are left to the caller;
all inputs and outputs (de)serialize with the original service's JSON shapes.
*/

pub mod network;
pub mod ping;
pub mod simulation;

pub use network::topology::Topology;
pub use ping::{PingReport, calculate_ping_path};
pub use simulation::engine::{OspfSimulator, SimulationError};
pub use simulation::report::SimulationReport;
