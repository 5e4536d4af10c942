use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::network::{device::ParticipatingRouter, topology::Topology};

/// Global link-state database: one LSA per participating router, keyed by
/// router id. Regenerated wholesale on every run.
pub type Lsdb = BTreeMap<String, Lsa>;

/// Router-LSA as the simulation models it. Sequence stays at 1 and age at
/// 0: there is no aging, refresh or supersession logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lsa {
    pub id: String,
    pub router_id: String,
    pub sequence: u32,
    pub age: u32,
    pub area: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub links: Vec<LsaLink>,
}

/// One advertised adjacency: the far-end router, the link cost and the
/// local interface it was learned on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsaLink {
    pub neighbor: String,
    pub cost: u32,
    pub interface: String,
}

impl Lsa {
    /// Synthetic LSA id for a router.
    pub fn id_for(router_id: &str) -> String {
        format!("LSA-{router_id}")
    }

    /// Build a fresh LSA from the router's `ospf` interfaces, resolving each
    /// through its link to the neighbor id and cost. Interfaces whose link
    /// cannot be resolved contribute nothing.
    pub fn generate(router: &ParticipatingRouter<'_>, topology: &Topology) -> Self {
        let mut links = Vec::new();
        for iface in router.device.ospf_interfaces() {
            if let Some(link) = topology.link(&iface.link_id) {
                links.push(LsaLink {
                    neighbor: link.opposite(router.id()).to_string(),
                    cost: link.ospf_cost(),
                    interface: iface.id.clone(),
                });
            }
        }
        Self {
            id: Self::id_for(router.id()),
            router_id: router.id().to_string(),
            sequence: 1,
            age: 0,
            area: router.area(),
            kind: "Router".to_string(),
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lsa_generation_from_interfaces() {
        let topology: Topology =
            serde_json::from_str(include_str!("../../test_data/line_topology.json")).unwrap();
        let router = topology
            .participating_routers()
            .find(|r| r.id() == "R2")
            .unwrap();

        let lsa = Lsa::generate(&router, &topology);
        assert_eq!(lsa.id, "LSA-R2");
        assert_eq!(lsa.sequence, 1);
        assert_eq!(lsa.age, 0);
        assert_eq!(lsa.kind, "Router");
        assert_eq!(
            lsa.links,
            vec![
                LsaLink {
                    neighbor: "R1".to_string(),
                    cost: 5,
                    interface: "if-r2-1".to_string(),
                },
                LsaLink {
                    neighbor: "R3".to_string(),
                    cost: 3,
                    interface: "if-r2-2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_isolated_router_advertises_nothing() {
        let topology: Topology =
            serde_json::from_str(include_str!("../../test_data/line_topology.json")).unwrap();
        let router = topology
            .participating_routers()
            .find(|r| r.id() == "R4")
            .unwrap();
        let lsa = Lsa::generate(&router, &topology);
        assert_eq!(lsa.area, 1);
        assert!(lsa.links.is_empty());
    }
}
