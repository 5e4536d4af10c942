use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::{
    device::{Device, ParticipatingRouter},
    link::Link,
};

/// Referential-integrity violations in a declarative topology.
#[derive(Debug, Clone, Error)]
pub enum TopologyError {
    #[error("link {link_id} references unknown device {device_id}")]
    UnknownDevice { link_id: String, device_id: String },
    #[error("interface {interface_id} on {device_id} references unknown link {link_id}")]
    UnknownLink {
        device_id: String,
        interface_id: String,
        link_id: String,
    },
    #[error("interface {interface_id} on {device_id} references unknown peer {peer_id}")]
    UnknownPeer {
        device_id: String,
        interface_id: String,
        peer_id: String,
    },
}

/// The unit of input to a simulation run: devices, links and a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    pub devices: Vec<Device>,
    pub links: Vec<Link>,
    #[serde(default)]
    pub timestamp: String,
}

impl Topology {
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.id == id)
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.id == id)
    }

    /// Devices of type `router` with an OSPF config, in declaration order.
    pub fn participating_routers(&self) -> impl Iterator<Item = ParticipatingRouter<'_>> {
        self.devices.iter().filter_map(Device::as_participating)
    }

    pub fn has_ospf_links(&self) -> bool {
        self.links.iter().any(Link::is_ospf)
    }

    /// Checks that every link endpoint and every interface reference names an
    /// existing id. Duplicate and self-referential links are tolerated; the
    /// graph representation dedups them.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let device_ids: HashSet<&str> = self.devices.iter().map(|d| d.id.as_str()).collect();
        let link_ids: HashSet<&str> = self.links.iter().map(|l| l.id.as_str()).collect();

        for link in &self.links {
            for endpoint in [&link.source, &link.target] {
                if !device_ids.contains(endpoint.as_str()) {
                    return Err(TopologyError::UnknownDevice {
                        link_id: link.id.clone(),
                        device_id: endpoint.clone(),
                    });
                }
            }
        }

        for device in &self.devices {
            for iface in &device.interfaces {
                if !link_ids.contains(iface.link_id.as_str()) {
                    return Err(TopologyError::UnknownLink {
                        device_id: device.id.clone(),
                        interface_id: iface.id.clone(),
                        link_id: iface.link_id.clone(),
                    });
                }
                if !device_ids.contains(iface.connected_to.as_str()) {
                    return Err(TopologyError::UnknownPeer {
                        device_id: device.id.clone(),
                        interface_id: iface.id.clone(),
                        peer_id: iface.connected_to.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_topology() -> Topology {
        let json = include_str!("../../test_data/line_topology.json");
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_line_fixture_validates() {
        let topology = line_topology();
        topology.validate().unwrap();
        assert_eq!(topology.devices.len(), 4);
        assert_eq!(topology.links.len(), 2);
    }

    #[test]
    fn test_participating_router_filter() {
        let topology = line_topology();
        let ids: Vec<&str> = topology.participating_routers().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["R1", "R2", "R3", "R4"]);
    }

    #[test]
    fn test_dangling_link_endpoint_rejected() {
        let mut topology = line_topology();
        topology.links[0].target = "R9".to_string();
        let err = topology.validate().unwrap_err();
        assert!(matches!(
            err,
            TopologyError::UnknownDevice { ref device_id, .. } if device_id == "R9"
        ));
    }

    #[test]
    fn test_dangling_interface_link_rejected() {
        let mut topology = line_topology();
        topology.devices[0].interfaces[0].link_id = "nope".to_string();
        let err = topology.validate().unwrap_err();
        assert!(matches!(
            err,
            TopologyError::UnknownLink { ref link_id, .. } if link_id == "nope"
        ));
    }
}
