//! User-plane graph type definitions.
//!
//! Vertices are either the radio access side (gNB) or a UPF tier
//! (intermediate forwarder or PDU-session anchor); links are directed edges
//! between vertex names. Anchors terminate at least one data network and
//! render their address pools; intermediate UPFs only forward and render
//! their DNN associations without pools.

use crate::identifiers::SnssaiUpfInfo;
use serde_yaml::{Mapping, Value};

/// N3/N9 interface attachment of a UPF vertex
#[derive(Debug, Clone)]
pub struct Interface {
    pub endpoints: String,
    pub network_instances: String,
    pub interface_type: String,
}

impl Interface {
    /// N3 attachment to the named data network
    pub fn n3(network_instances: &str) -> Self {
        Self {
            endpoints: String::new(),
            network_instances: network_instances.to_string(),
            interface_type: "N3".to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("endpoints".into(), self.endpoints.clone().into());
        m.insert(
            "networkInstances".into(),
            self.network_instances.clone().into(),
        );
        m.insert("interfaceType".into(), self.interface_type.clone().into());
        Value::Mapping(m)
    }
}

/// Common fields of the UPF vertex tiers
#[derive(Debug, Clone)]
pub struct UpfVertex {
    pub name: String,
    pub node_id: String,
    pub addr: String,
    pub snssai_upf_infos: Vec<SnssaiUpfInfo>,
    pub interfaces: Vec<Interface>,
}

impl UpfVertex {
    pub fn new(name: &str, snssai_upf_infos: Vec<SnssaiUpfInfo>, interfaces: Vec<Interface>) -> Self {
        Self {
            name: name.to_string(),
            node_id: String::new(),
            addr: String::new(),
            snssai_upf_infos,
            interfaces,
        }
    }

    fn to_value(&self, dnn_with_cidr: bool) -> Value {
        let mut m = Mapping::new();
        m.insert("upperName".into(), self.name.to_uppercase().into());
        m.insert("name".into(), self.name.clone().into());
        m.insert("nodeId".into(), self.node_id.clone().into());
        m.insert("addr".into(), self.addr.clone().into());
        m.insert(
            "snssaiUpfInfos".into(),
            Value::Sequence(
                self.snssai_upf_infos
                    .iter()
                    .map(|info| info.to_value(dnn_with_cidr))
                    .collect(),
            ),
        );
        m.insert(
            "interfaces".into(),
            Value::Sequence(self.interfaces.iter().map(Interface::to_value).collect()),
        );
        Value::Mapping(m)
    }
}

/// A user-plane topology vertex
#[derive(Debug, Clone)]
pub enum UpNode {
    /// Radio access node
    Gnb { name: String },
    /// Intermediate UPF: forwards only, no DNN termination
    IUpf(UpfVertex),
    /// PDU-session anchor: terminates its DNNs and owns their pools
    PsaUpf(UpfVertex),
}

impl UpNode {
    pub fn name(&self) -> &str {
        match self {
            UpNode::Gnb { name } => name,
            UpNode::IUpf(v) | UpNode::PsaUpf(v) => &v.name,
        }
    }

    /// Rendering the SMF user-plane node list expects: gNBs as a
    /// name-keyed `{type: AN}` entry, UPF tiers as flat node documents.
    pub fn to_value(&self) -> Value {
        match self {
            UpNode::Gnb { name } => {
                let mut inner = Mapping::new();
                inner.insert("type".into(), "AN".into());
                let mut m = Mapping::new();
                m.insert(name.clone().into(), Value::Mapping(inner));
                Value::Mapping(m)
            }
            UpNode::IUpf(v) => v.to_value(false),
            UpNode::PsaUpf(v) => v.to_value(true),
        }
    }
}

/// Directed topology edge between two vertex names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub src: String,
    pub dst: String,
}

impl Link {
    pub fn new(src: &str, dst: &str) -> Self {
        Self {
            src: src.to_string(),
            dst: dst.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("A".into(), self.src.clone().into());
        m.insert("B".into(), self.dst.clone().into());
        Value::Mapping(m)
    }
}
