//! Control-plane descriptors with narrow overlays.
//!
//! AUSF, NRF, NSSF, PCF, UDM, UDR, CHF, the web console and the datastore
//! only need straightforward field assignment: SBI addresses, NRF and
//! datastore URIs, billing host. No topology logic lives here.

use super::{set_path, set_sbi, NetworkFunction, NfKind, Sbi};
use crate::identifiers::{NssaiInPlmn, Plmn};
use serde_yaml::Value;

/// Authentication server function
#[derive(Debug)]
pub struct Ausf {
    pub name: String,
    pub supported_plmns: Vec<Plmn>,
    pub locality: String,
    pub sbi: Sbi,
    pub nrf_uri: String,
}

impl NetworkFunction for Ausf {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Ausf
    }

    fn overlay(&self, section: &mut Value) {
        set_path(
            section,
            &["config", "plmnSupportList"],
            Value::Sequence(self.supported_plmns.iter().map(Plmn::to_value).collect()),
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

/// Repository function every other function registers against
#[derive(Debug)]
pub struct Nrf {
    pub name: String,
    pub default_plmn: Plmn,
    pub sbi: Sbi,
}

impl NetworkFunction for Nrf {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Nrf
    }

    fn overlay(&self, section: &mut Value) {
        set_path(
            section,
            &["config", "DefaultPlmnId"],
            self.default_plmn.to_value(),
        );
        set_sbi(section, &self.sbi);
    }
}

/// Slice selection function
#[derive(Debug)]
pub struct Nssf {
    pub name: String,
    pub plmns: Vec<Plmn>,
    pub nssais_in_plmns: Vec<NssaiInPlmn>,
    pub sbi: Sbi,
    pub nrf_uri: String,
}

impl NetworkFunction for Nssf {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Nssf
    }

    fn overlay(&self, section: &mut Value) {
        set_path(
            section,
            &["config", "nssfName"],
            self.name.to_uppercase().into(),
        );
        set_path(
            section,
            &["config", "supportedPlmnList"],
            Value::Sequence(self.plmns.iter().map(Plmn::to_value).collect()),
        );
        set_path(
            section,
            &["config", "supportedNssaiInPlmnList"],
            Value::Sequence(
                self.nssais_in_plmns
                    .iter()
                    .map(NssaiInPlmn::to_value_for_nssf)
                    .collect(),
            ),
        );
        set_sbi(section, &self.sbi);
        set_path(section, &["config", "nrfUri"], self.nrf_uri.clone().into());
    }
}

/// Policy control function
#[derive(Debug)]
pub struct Pcf {
    pub name: String,
    pub locality: String,
    pub sbi: Sbi,
    pub nrf_uri: String,
    pub mongodb_uri: String,
}

impl NetworkFunction for Pcf {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Pcf
    }

    fn overlay(&self, section: &mut Value) {
        set_path(
            section,
            &["config", "pcfName"],
            self.name.to_uppercase().into(),
        );
        set_sbi(section, &self.sbi);
        set_path(section, &["config", "nrfUri"], self.nrf_uri.clone().into());
        set_path(
            section,
            &["config", "mongodb", "url"],
            self.mongodb_uri.clone().into(),
        );
        set_path(
            section,
            &["config", "locality"],
            self.locality.clone().into(),
        );
    }
}

/// Unified data management function
#[derive(Debug)]
pub struct Udm {
    pub name: String,
    pub sbi: Sbi,
    pub nrf_uri: String,
}

impl NetworkFunction for Udm {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Udm
    }

    fn overlay(&self, section: &mut Value) {
        set_sbi(section, &self.sbi);
        set_path(section, &["config", "nrfUri"], self.nrf_uri.clone().into());
    }
}

/// Unified data repository function
#[derive(Debug)]
pub struct Udr {
    pub name: String,
    pub sbi: Sbi,
    pub nrf_uri: String,
    pub mongodb_uri: String,
}

impl NetworkFunction for Udr {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Udr
    }

    fn overlay(&self, section: &mut Value) {
        set_sbi(section, &self.sbi);
        set_path(section, &["config", "nrfUri"], self.nrf_uri.clone().into());
        set_path(
            section,
            &["config", "mongodb", "url"],
            self.mongodb_uri.clone().into(),
        );
    }
}

/// Charging function
#[derive(Debug)]
pub struct Chf {
    pub name: String,
    pub sbi: Sbi,
    pub cgf_host_ipv4: String,
    pub nrf_uri: String,
    pub mongodb_uri: String,
}

impl NetworkFunction for Chf {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Chf
    }

    fn overlay(&self, section: &mut Value) {
        set_path(
            section,
            &["config", "cgf", "hostIPv4"],
            self.cgf_host_ipv4.clone().into(),
        );
        set_sbi(section, &self.sbi);
        set_path(section, &["config", "nrfUri"], self.nrf_uri.clone().into());
        set_path(
            section,
            &["config", "mongodb", "url"],
            self.mongodb_uri.clone().into(),
        );
    }
}

/// Operator web console
#[derive(Debug)]
pub struct WebUi {
    pub name: String,
    pub mongodb_uri: String,
    pub billing_server_host: String,
}

impl NetworkFunction for WebUi {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Webui
    }

    fn overlay(&self, section: &mut Value) {
        set_path(
            section,
            &["config", "mongodb", "url"],
            self.mongodb_uri.clone().into(),
        );
        set_path(
            section,
            &["config", "billingServer", "hostIPv4"],
            self.billing_server_host.clone().into(),
        );
    }
}

/// Backing datastore; the skeleton is deployed as-is
#[derive(Debug)]
pub struct MongoDb {
    pub name: String,
}

impl NetworkFunction for MongoDb {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Mongodb
    }

    fn overlay(&self, _section: &mut Value) {}
}
