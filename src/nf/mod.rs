//! Network-function descriptors.
//!
//! One descriptor per deployable function kind. Each wraps the computed
//! identifiers and addresses for a single instance and overlays them onto
//! the kind's template skeleton, yielding one `{instanceName: document}`
//! entry for the merger. Descriptors share a capability contract
//! (`NetworkFunction`) but no state; overlays are pure functions of the
//! descriptor, so rendering is idempotent.

pub mod amf;
pub mod sbi;
pub mod smf;
pub mod upf;

// Re-export the descriptor types
pub use amf::Amf;
pub use sbi::{Ausf, Chf, MongoDb, Nrf, Nssf, Pcf, Udm, Udr, WebUi};
pub use smf::Smf;
pub use upf::Upf;

use crate::template::{TemplateError, TemplateProvider};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fmt;

/// Network function kinds known to the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NfKind {
    Amf,
    Smf,
    Upf,
    Nssf,
    Ausf,
    Pcf,
    Udm,
    Udr,
    Chf,
    Nrf,
    Webui,
    Mongodb,
}

impl NfKind {
    /// Top-level key the kind's template document is stored under
    pub fn key(&self) -> &'static str {
        match self {
            NfKind::Amf => "amf",
            NfKind::Smf => "smf",
            NfKind::Upf => "upf",
            NfKind::Nssf => "nssf",
            NfKind::Ausf => "ausf",
            NfKind::Pcf => "pcf",
            NfKind::Udm => "udm",
            NfKind::Udr => "udr",
            NfKind::Chf => "chf",
            NfKind::Nrf => "nrf",
            NfKind::Webui => "webui",
            NfKind::Mongodb => "mongodb",
        }
    }

    pub const ALL: [NfKind; 12] = [
        NfKind::Amf,
        NfKind::Smf,
        NfKind::Upf,
        NfKind::Nssf,
        NfKind::Ausf,
        NfKind::Pcf,
        NfKind::Udm,
        NfKind::Udr,
        NfKind::Chf,
        NfKind::Nrf,
        NfKind::Webui,
        NfKind::Mongodb,
    ];
}

impl fmt::Display for NfKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// SBI bind and register addresses shared by every control-plane function
#[derive(Debug, Clone, Default)]
pub struct Sbi {
    pub register_ipv4: String,
    pub binding_ipv4: String,
}

/// One deployable configuration unit.
///
/// `overlay` writes the instance's computed fields into the kind's section
/// of the skeleton; it never touches anything outside the paths it owns.
pub trait NetworkFunction {
    fn name(&self) -> &str;
    fn kind(&self) -> NfKind;
    fn overlay(&self, section: &mut Value);
}

/// Render a descriptor against the template provider into a merge entry.
///
/// The provider's stored copy is never mutated; the overlay runs on a
/// private deep copy of the skeleton.
pub fn render(
    nf: &dyn NetworkFunction,
    templates: &dyn TemplateProvider,
) -> Result<(String, Value), TemplateError> {
    let doc = templates.skeleton(nf.kind())?;
    let mut section = match doc {
        Value::Mapping(mut m) => {
            m.remove(nf.kind().key())
                .ok_or(TemplateError::MissingSection { kind: nf.kind() })?
        }
        _ => return Err(TemplateError::MissingSection { kind: nf.kind() }),
    };
    if !section.is_mapping() {
        section = Value::Mapping(Mapping::new());
    }
    nf.overlay(&mut section);
    Ok((nf.name().to_string(), section))
}

fn ensure_mapping(value: &mut Value) -> &mut Mapping {
    if !matches!(value, Value::Mapping(_)) {
        *value = Value::Mapping(Mapping::new());
    }
    match value {
        Value::Mapping(m) => m,
        _ => unreachable!(),
    }
}

/// Set `value` at a nested path inside the section, creating intermediate
/// mappings as needed.
pub(crate) fn set_path(section: &mut Value, path: &[&str], value: Value) {
    let Some((last, walk)) = path.split_last() else {
        return;
    };
    let mut node = section;
    for key in walk {
        node = ensure_mapping(node)
            .entry(Value::from(*key))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }
    ensure_mapping(node).insert(Value::from(*last), value);
}

/// Write the shared SBI address pair under `config.sbi`.
pub(crate) fn set_sbi(section: &mut Value, sbi: &Sbi) {
    set_path(
        section,
        &["config", "sbi", "registerIPv4"],
        sbi.register_ipv4.clone().into(),
    );
    set_path(
        section,
        &["config", "sbi", "bindingIPv4"],
        sbi.binding_ipv4.clone().into(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::BuiltinTemplates;

    struct Dummy;

    impl NetworkFunction for Dummy {
        fn name(&self) -> &str {
            "dummy"
        }
        fn kind(&self) -> NfKind {
            NfKind::Mongodb
        }
        fn overlay(&self, section: &mut Value) {
            set_path(section, &["config", "marker"], Value::from("x"));
        }
    }

    #[test]
    fn set_path_creates_intermediate_mappings() {
        let mut section = Value::Mapping(Mapping::new());
        set_path(&mut section, &["config", "sbi", "registerIPv4"], "1.2.3.4".into());
        assert_eq!(
            section
                .get("config")
                .and_then(|c| c.get("sbi"))
                .and_then(|s| s.get("registerIPv4")),
            Some(&Value::from("1.2.3.4"))
        );
    }

    #[test]
    fn set_path_replaces_scalar_intermediates() {
        let mut section: Value = serde_yaml::from_str("config: plain-string").unwrap();
        set_path(&mut section, &["config", "nrfUri"], "http://nrf".into());
        assert_eq!(
            section.get("config").and_then(|c| c.get("nrfUri")),
            Some(&Value::from("http://nrf"))
        );
    }

    #[test]
    fn render_is_idempotent() {
        let templates = BuiltinTemplates::default();
        let first = render(&Dummy, &templates).unwrap();
        let second = render(&Dummy, &templates).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.0, "dummy");
    }

    #[test]
    fn kind_keys_are_distinct() {
        let mut keys: Vec<&str> = NfKind::ALL.iter().map(NfKind::key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), NfKind::ALL.len());
    }
}
