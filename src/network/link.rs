use serde::{Deserialize, Serialize};

/// Edge weight applied by the protocol engine when a link declares no cost.
pub const DEFAULT_OSPF_COST: u32 = 10;
/// Edge weight applied by the ping calculator when a link declares no cost.
pub const DEFAULT_PING_COST: u32 = 1;

/// An undirected link between two devices. Only `ospf`-typed links carry
/// their cost into the protocol subgraph; everything else is an access link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Declared cost. The two consumers apply different defaults when it is
    /// absent: 10 for the OSPF engine, 1 for the ping calculator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    #[serde(default)]
    pub area: u32,
    #[serde(default)]
    pub label: String,
}

impl Link {
    pub fn is_ospf(&self) -> bool {
        self.kind == "ospf"
    }

    pub fn ospf_cost(&self) -> u32 {
        self.cost.unwrap_or(DEFAULT_OSPF_COST)
    }

    pub fn ping_cost(&self) -> u32 {
        self.cost.unwrap_or(DEFAULT_PING_COST)
    }

    /// Far end of the link as seen from `device_id`.
    pub fn opposite(&self, device_id: &str) -> &str {
        if self.source == device_id {
            &self.target
        } else {
            &self.source
        }
    }
}
