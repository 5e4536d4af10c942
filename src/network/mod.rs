/*!
Declarative network data model and graph construction.

- `device`: devices, their interfaces and per-router OSPF configuration.
- `link`: undirected links between devices.
- `topology`: the full simulation input plus referential-integrity checks.
- `network_graph`: petgraph-backed weighted graph views of a topology and
  deterministic single-source shortest paths.
*/

pub mod device;
pub mod link;
pub mod network_graph;
pub mod topology;
