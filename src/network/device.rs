use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 2-D canvas position. Display-only; no algorithm reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One interface of a device. `type` decides protocol participation on the
/// referenced link: `ospf` participates, anything else is an access port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    pub id: String,
    #[serde(default)]
    pub connected_to: String,
    pub link_id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub ip: String,
    /// Administrative state. Carried through but not used to gate computation.
    #[serde(default = "default_state")]
    pub state: String,
}

fn default_state() -> String {
    "up".to_string()
}

impl Interface {
    pub fn is_ospf(&self) -> bool {
        self.kind == "ospf"
    }
}

/// OSPF configuration attached to a router device.
///
/// `neighbors`, `lsdb` and `routing_table` are caller-supplied seed values.
/// The engine never reads `lsdb`/`routing_table` (it produces its own global
/// LSDB and per-router tables); `neighbors` is echoed back in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OspfConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub area: u32,
    #[serde(default)]
    pub neighbors: Vec<Value>,
    #[serde(default)]
    pub lsdb: serde_json::Map<String, Value>,
    #[serde(rename = "routingTable", default)]
    pub routing_table: Vec<Value>,
}

fn default_enabled() -> bool {
    true
}

/// A device in the declarative topology. IP and MAC are descriptive only;
/// routing decisions never read them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    #[serde(default)]
    pub ospf: Option<OspfConfig>,
    #[serde(default)]
    pub mac: String,
}

impl Device {
    pub fn is_router(&self) -> bool {
        self.kind == "router"
    }

    /// OSPF area this device belongs to, 0 when no config is present.
    pub fn area(&self) -> u32 {
        self.ospf.as_ref().map(|cfg| cfg.area).unwrap_or(0)
    }

    /// Participating-router view: present only for devices of type `router`
    /// with an OSPF config. Only these take part in protocol phases.
    pub fn as_participating(&self) -> Option<ParticipatingRouter<'_>> {
        match &self.ospf {
            Some(ospf) if self.is_router() => Some(ParticipatingRouter { device: self, ospf }),
            _ => None,
        }
    }

    pub fn ospf_interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter().filter(|iface| iface.is_ospf())
    }
}

/// Borrowed view of a device that takes part in protocol phases, so the
/// phases never repeat the type-plus-config check.
#[derive(Clone, Copy)]
pub struct ParticipatingRouter<'a> {
    pub device: &'a Device,
    pub ospf: &'a OspfConfig,
}

impl<'a> ParticipatingRouter<'a> {
    /// The borrow is tied to the underlying device, not the view value, so
    /// ids can outlive the view itself.
    pub fn id(&self) -> &'a str {
        &self.device.id
    }

    pub fn area(&self) -> u32 {
        self.ospf.area
    }
}
