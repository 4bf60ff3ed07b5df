//! Access and mobility management function descriptor.

use super::{set_path, set_sbi, NetworkFunction, NfKind, Sbi};
use crate::identifiers::{Guami, NssaiInPlmn, Tai};
use serde_yaml::Value;
use std::collections::HashSet;

/// One AMF instance: served GUAMIs, supported tracking areas, per-PLMN
/// slice support and the deduplicated DNN list.
#[derive(Debug)]
pub struct Amf {
    pub name: String,
    pub served_guamis: Vec<Guami>,
    pub supported_tais: Vec<Tai>,
    pub supported_plmns: Vec<NssaiInPlmn>,
    pub dnns: Vec<String>,
    pub locality: String,
    pub ngap_ip_list: String,
    pub sbi: Sbi,
    pub nrf_uri: String,
}

impl Amf {
    /// First-occurrence order is kept so repeated runs emit the same list.
    fn deduplicated_dnns(&self) -> Vec<Value> {
        let mut seen = HashSet::new();
        self.dnns
            .iter()
            .filter(|dnn| seen.insert(dnn.as_str()))
            .map(|dnn| Value::from(dnn.clone()))
            .collect()
    }
}

impl NetworkFunction for Amf {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Amf
    }

    fn overlay(&self, section: &mut Value) {
        set_path(
            section,
            &["config", "amfName"],
            self.name.to_uppercase().into(),
        );
        set_path(
            section,
            &["config", "ngapIpList"],
            self.ngap_ip_list.clone().into(),
        );
        set_path(
            section,
            &["config", "servedGuamiList"],
            Value::Sequence(self.served_guamis.iter().map(Guami::to_value).collect()),
        );
        set_path(
            section,
            &["config", "supportTaiList"],
            Value::Sequence(self.supported_tais.iter().map(Tai::to_value).collect()),
        );
        set_path(
            section,
            &["config", "plmnSupportList"],
            Value::Sequence(
                self.supported_plmns
                    .iter()
                    .map(NssaiInPlmn::to_value_for_amf)
                    .collect(),
            ),
        );
        set_path(
            section,
            &["config", "supportDnnList"],
            Value::Sequence(self.deduplicated_dnns()),
        );
        set_sbi(section, &self.sbi);
        set_path(section, &["config", "nrfUri"], self.nrf_uri.clone().into());
        set_path(
            section,
            &["config", "locality"],
            self.locality.clone().into(),
        );
    }
}
