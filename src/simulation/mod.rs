/*!
Five-phase OSPF convergence simulation.

- `lsa`: link-state advertisements and the global link-state database.
- `event`: the tagged step trace consumed by step-by-step animation.
- `report`: routing tables, area buckets and the assembled run result.
- `engine`: the phase engine itself.

Each run is a self-contained, synchronous computation: the engine builds a
fresh run context (graph, LSDB, trace) per invocation and nothing survives
the call, so concurrent callers simply run independent simulations.
*/

pub mod engine;
pub mod event;
pub mod lsa;
pub mod report;
