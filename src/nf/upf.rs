//! User plane function descriptor.

use super::{set_path, NetworkFunction, NfKind};
use crate::identifiers::{Dnn, PfcpForUpf};
use serde_yaml::Value;

/// One UPF deployment: PFCP self-identity and the data networks it
/// terminates with their allocated pools.
#[derive(Debug)]
pub struct Upf {
    pub name: String,
    pub pfcp: PfcpForUpf,
    pub dnns: Vec<Dnn>,
    pub gtpu_if_name: String,
}

impl NetworkFunction for Upf {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> NfKind {
        NfKind::Upf
    }

    fn overlay(&self, section: &mut Value) {
        set_path(section, &["config", "pfcp"], self.pfcp.to_value());
        set_path(
            section,
            &["config", "gtpu", "ifList", "name"],
            self.gtpu_if_name.clone().into(),
        );
        set_path(
            section,
            &["config", "dnnList"],
            Value::Sequence(self.dnns.iter().map(Dnn::to_value).collect()),
        );
    }
}
