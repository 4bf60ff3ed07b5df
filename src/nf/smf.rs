//! Session management function descriptor.

use super::{set_path, set_sbi, NetworkFunction, NfKind, Sbi};
use crate::identifiers::{PfcpForSmf, Plmn, SnssaiInfo};
use crate::topology::{Link, UpNode};
use serde_yaml::Value;

/// One SMF instance: slice/DNN associations, PFCP self-identity and the
/// user-plane topology it steers sessions over.
#[derive(Debug)]
pub struct Smf {
    pub name: String,
    pub snssai_infos: Vec<SnssaiInfo>,
    pub plmns: Vec<Plmn>,
    pub pfcp: PfcpForSmf,
    pub up_nodes: Vec<UpNode>,
    pub links: Vec<Link>,
    pub locality: String,
    /// Uplink-classifier mode. Rendered only when true; the downstream
    /// schema treats absence, not `false`, as disabled.
    pub ulcl: bool,
    pub sbi: Sbi,
    pub nrf_uri: String,
}

impl NetworkFunction for Smf {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Smf
    }

    fn overlay(&self, section: &mut Value) {
        set_path(
            section,
            &["config", "smfName"],
            self.name.to_uppercase().into(),
        );
        set_path(
            section,
            &["config", "snssaiInfos"],
            Value::Sequence(self.snssai_infos.iter().map(SnssaiInfo::to_value).collect()),
        );
        set_path(
            section,
            &["config", "plmnList"],
            Value::Sequence(self.plmns.iter().map(Plmn::to_value).collect()),
        );
        set_path(section, &["config", "pfcp"], self.pfcp.to_value());
        set_path(
            section,
            &["config", "userplaneInformation", "upNodes"],
            Value::Sequence(self.up_nodes.iter().map(UpNode::to_value).collect()),
        );
        set_path(
            section,
            &["config", "locality"],
            self.locality.clone().into(),
        );
        set_sbi(section, &self.sbi);
        set_path(section, &["config", "nrfUri"], self.nrf_uri.clone().into());
        set_path(
            section,
            &["config", "userplaneInformation", "links"],
            Value::Sequence(self.links.iter().map(Link::to_value).collect()),
        );
        if self.ulcl {
            set_path(section, &["config", "ulcl"], true.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{DnnInfo, Nssai};
    use crate::nf::render;
    use crate::template::BuiltinTemplates;
    use crate::topology::{Interface, UpfVertex};
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn smf(ulcl: bool) -> Smf {
        Smf {
            name: "smf1".to_string(),
            snssai_infos: vec![SnssaiInfo {
                snssai: Nssai::new(1, "010203").unwrap(),
                dnn_infos: vec![DnnInfo {
                    dnn: "internet".to_string(),
                    dns_ipv4: Ipv4Addr::new(8, 8, 8, 8),
                    dns_ipv6: Ipv6Addr::LOCALHOST,
                }],
            }],
            plmns: vec![Plmn::new("999", "70").unwrap()],
            pfcp: PfcpForSmf::default(),
            up_nodes: vec![
                UpNode::Gnb {
                    name: "gNB1".to_string(),
                },
                UpNode::PsaUpf(UpfVertex::new(
                    "upf",
                    vec![],
                    vec![Interface::n3("internet")],
                )),
            ],
            links: vec![Link::new("gNB1", "UPF")],
            locality: "area1".to_string(),
            ulcl,
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }
    }

    #[test]
    fn overlay_writes_userplane_information() {
        let (_, section) = render(&smf(false), &BuiltinTemplates::default()).unwrap();
        let config = section.get("config").unwrap();
        assert_eq!(config.get("smfName"), Some(&Value::from("SMF1")));
        let up = config.get("userplaneInformation").unwrap();
        assert_eq!(up.get("upNodes").and_then(Value::as_sequence).unwrap().len(), 2);
        assert_eq!(up.get("links").and_then(Value::as_sequence).unwrap().len(), 1);
        assert!(config.get("pfcp").and_then(|p| p.get("listenAddr")).is_some());
    }

    #[test]
    fn ulcl_flag_is_present_only_when_true() {
        let (_, plain) = render(&smf(false), &BuiltinTemplates::default()).unwrap();
        assert!(plain.get("config").and_then(|c| c.get("ulcl")).is_none());

        let (_, classifier) = render(&smf(true), &BuiltinTemplates::default()).unwrap();
        assert_eq!(
            classifier.get("config").and_then(|c| c.get("ulcl")),
            Some(&Value::from(true))
        );
    }
}
