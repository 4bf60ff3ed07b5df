//! Mobile-core identifier model.
//!
//! Value types for the domain identifiers a 5G core deployment is keyed on:
//! PLMN, NSSAI, TAI, GUAMI, DNN and their composite associations. Constructors
//! validate field shapes, equality is by value so callers can deduplicate, and
//! random draws only need uniqueness within a single generation run.
//!
//! Each type renders itself into the exact wire-level mapping the downstream
//! chart templates key off (`plmnId`, `sst`, `sd`, `tac`, `amfId`, ...). Those
//! renderings are the only place identifier semantics leak into serialization.

use ipnet::Ipv4Net;
use rand::Rng;
use serde_yaml::{Mapping, Value};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Number of distinct 24-bit slice differentiators.
const SD_SPACE: usize = 1 << 24;

/// Identifier construction errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid MCC '{0}': expected exactly 3 decimal digits")]
    InvalidMcc(String),
    #[error("invalid MNC '{0}': expected 2 or 3 decimal digits")]
    InvalidMnc(String),
    #[error("SST {0} out of range: supported slice/service types are 1-15")]
    SstOutOfRange(u8),
    #[error("invalid {field} '{value}': expected {len} lowercase hex digits")]
    InvalidHex {
        field: &'static str,
        value: String,
        len: usize,
    },
    #[error("cannot draw {requested} distinct slice differentiators from a 24-bit space")]
    SdSpaceExhausted { requested: usize },
}

/// Draw `len` lowercase hex digits from the given RNG.
pub fn random_hex<R: Rng>(rng: &mut R, len: usize) -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    (0..len)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect()
}

fn check_hex(field: &'static str, value: &str, len: usize) -> Result<(), ValidationError> {
    let ok = value.len() == len
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
    if ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidHex {
            field,
            value: value.to_string(),
            len,
        })
    }
}

/// Public Land Mobile Network identity: MCC (3 digits) + MNC (2 or 3 digits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plmn {
    mcc: String,
    mnc: String,
}

impl Plmn {
    pub fn new(mcc: &str, mnc: &str) -> Result<Self, ValidationError> {
        if mcc.len() != 3 || !mcc.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidMcc(mcc.to_string()));
        }
        if !(2..=3).contains(&mnc.len()) || !mnc.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidMnc(mnc.to_string()));
        }
        Ok(Self {
            mcc: mcc.to_string(),
            mnc: mnc.to_string(),
        })
    }

    pub fn mcc(&self) -> &str {
        &self.mcc
    }

    pub fn mnc(&self) -> &str {
        &self.mnc
    }

    pub fn to_value(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("mcc".into(), self.mcc.clone().into());
        m.insert("mnc".into(), self.mnc.clone().into());
        Value::Mapping(m)
    }
}

/// Network slice selection identity: SST (1 byte, 1-15 here) + SD (24-bit hex).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nssai {
    sst: u8,
    sd: String,
}

impl Nssai {
    pub fn new(sst: u8, sd: &str) -> Result<Self, ValidationError> {
        if !(1..=15).contains(&sst) {
            return Err(ValidationError::SstOutOfRange(sst));
        }
        check_hex("sd", sd, 6)?;
        Ok(Self {
            sst,
            sd: sd.to_string(),
        })
    }

    /// Draw `count` slices with pairwise-distinct slice differentiators.
    ///
    /// Distinctness only needs to hold within one generation run. The
    /// differentiators are sampled without replacement so the cost stays
    /// linear even when `count` approaches the full 24-bit space.
    pub fn random_batch<R: Rng>(count: usize, rng: &mut R) -> Result<Vec<Self>, ValidationError> {
        if count > SD_SPACE {
            return Err(ValidationError::SdSpaceExhausted { requested: count });
        }
        let sds = rand::seq::index::sample(rng, SD_SPACE, count);
        Ok(sds
            .iter()
            .map(|sd| Self {
                sst: rng.gen_range(1..=15),
                sd: format!("{sd:06x}"),
            })
            .collect())
    }

    pub fn sst(&self) -> u8 {
        self.sst
    }

    pub fn sd(&self) -> &str {
        &self.sd
    }

    pub fn to_value(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("sst".into(), Value::from(u64::from(self.sst)));
        m.insert("sd".into(), self.sd.clone().into());
        Value::Mapping(m)
    }
}

/// Association of a PLMN with the slices it offers.
///
/// List order carries no semantics but is preserved for deterministic output.
#[derive(Debug, Clone)]
pub struct NssaiInPlmn {
    pub plmn: Plmn,
    pub nssais: Vec<Nssai>,
}

impl NssaiInPlmn {
    pub fn new(plmn: Plmn, nssais: Vec<Nssai>) -> Self {
        Self { plmn, nssais }
    }

    fn to_value_with_key(&self, key: &str) -> Value {
        let mut m = Mapping::new();
        m.insert("plmnId".into(), self.plmn.to_value());
        m.insert(
            key.into(),
            Value::Sequence(self.nssais.iter().map(Nssai::to_value).collect()),
        );
        Value::Mapping(m)
    }

    /// Rendering for `plmnSupportList` entries (AMF).
    pub fn to_value_for_amf(&self) -> Value {
        self.to_value_with_key("snssaiList")
    }

    /// Rendering for `supportedNssaiInPlmnList` entries (NSSF).
    pub fn to_value_for_nssf(&self) -> Value {
        self.to_value_with_key("supportedSnssaiList")
    }
}

/// Tracking area identity: PLMN + 24-bit TAC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tai {
    plmn: Plmn,
    tac: String,
}

impl Tai {
    pub fn new(plmn: Plmn, tac: &str) -> Result<Self, ValidationError> {
        check_hex("tac", tac, 6)?;
        Ok(Self {
            plmn,
            tac: tac.to_string(),
        })
    }

    /// One tracking area code per AMF serving area.
    pub fn random<R: Rng>(plmn: Plmn, rng: &mut R) -> Self {
        Self {
            tac: random_hex(rng, 6),
            plmn,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("plmnId".into(), self.plmn.to_value());
        m.insert("tac".into(), self.tac.clone().into());
        Value::Mapping(m)
    }
}

/// Globally unique AMF identity: PLMN + packed region/set/pointer id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guami {
    plmn: Plmn,
    amf_id: String,
}

impl Guami {
    pub fn new(plmn: Plmn, amf_id: &str) -> Result<Self, ValidationError> {
        check_hex("amfId", amf_id, 6)?;
        Ok(Self {
            plmn,
            amf_id: amf_id.to_string(),
        })
    }

    /// One GUAMI per AMF instance.
    pub fn random<R: Rng>(plmn: Plmn, rng: &mut R) -> Self {
        Self {
            amf_id: random_hex(rng, 6),
            plmn,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("plmnId".into(), self.plmn.to_value());
        m.insert("amfId".into(), self.amf_id.clone().into());
        Value::Mapping(m)
    }
}

/// Data network with its allocated user pool (UPF `dnnList` entry).
#[derive(Debug, Clone)]
pub struct Dnn {
    pub name: String,
    pub cidr: Ipv4Net,
}

impl Dnn {
    pub fn to_value(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("dnn".into(), self.name.clone().into());
        m.insert("cidr".into(), self.cidr.to_string().into());
        Value::Mapping(m)
    }
}

/// Data network DNS parameters (SMF `dnnInfos` entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnnInfo {
    pub dnn: String,
    pub dns_ipv4: Ipv4Addr,
    pub dns_ipv6: Ipv6Addr,
}

impl DnnInfo {
    pub fn to_value(&self) -> Value {
        let mut dns = Mapping::new();
        dns.insert("ipv4".into(), self.dns_ipv4.to_string().into());
        dns.insert("ipv6".into(), self.dns_ipv6.to_string().into());
        let mut m = Mapping::new();
        m.insert("dnn".into(), self.dnn.clone().into());
        m.insert("dns".into(), Value::Mapping(dns));
        Value::Mapping(m)
    }
}

/// Data network address pools as a UPF terminates them.
///
/// The user pool and static pool come from one allocator call and are
/// disjoint by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnnUpfInfo {
    pub dnn: String,
    pub pool: Ipv4Net,
    pub static_pool: Ipv4Net,
}

impl DnnUpfInfo {
    /// Anchor UPFs render their pools; intermediate UPFs only name the DNN.
    pub fn to_value(&self, with_cidr: bool) -> Value {
        let mut m = Mapping::new();
        m.insert("dnn".into(), self.dnn.clone().into());
        if with_cidr {
            let mut pools = Mapping::new();
            pools.insert(
                "cidr".into(),
                Value::Sequence(vec![self.pool.to_string().into()]),
            );
            let mut static_pools = Mapping::new();
            static_pools.insert(
                "cidr".into(),
                Value::Sequence(vec![self.static_pool.to_string().into()]),
            );
            m.insert("pools".into(), Value::Mapping(pools));
            m.insert("staticPools".into(), Value::Mapping(static_pools));
        }
        Value::Mapping(m)
    }
}

/// Slice to DNN-info association (SMF `snssaiInfos` entry).
#[derive(Debug, Clone)]
pub struct SnssaiInfo {
    pub snssai: Nssai,
    pub dnn_infos: Vec<DnnInfo>,
}

impl SnssaiInfo {
    pub fn to_value(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("sNssai".into(), self.snssai.to_value());
        m.insert(
            "dnnInfos".into(),
            Value::Sequence(self.dnn_infos.iter().map(DnnInfo::to_value).collect()),
        );
        Value::Mapping(m)
    }
}

/// Slice to UPF-side DNN association (user-plane node `snssaiUpfInfos` entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnssaiUpfInfo {
    pub snssai: Nssai,
    pub dnn_upf_infos: Vec<DnnUpfInfo>,
}

impl SnssaiUpfInfo {
    pub fn to_value(&self, dnn_with_cidr: bool) -> Value {
        let mut m = Mapping::new();
        m.insert("sNssai".into(), self.snssai.to_value());
        m.insert(
            "dnnUpfInfoList".into(),
            Value::Sequence(
                self.dnn_upf_infos
                    .iter()
                    .map(|d| d.to_value(dnn_with_cidr))
                    .collect(),
            ),
        );
        Value::Mapping(m)
    }
}

/// PFCP self-identity as the SMF advertises it.
#[derive(Debug, Clone, Default)]
pub struct PfcpForSmf {
    pub node_id: String,
    pub listen_addr: String,
    pub external_addr: String,
}

impl PfcpForSmf {
    pub fn to_value(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("nodeId".into(), self.node_id.clone().into());
        m.insert("listenAddr".into(), self.listen_addr.clone().into());
        m.insert("externalAddr".into(), self.external_addr.clone().into());
        Value::Mapping(m)
    }
}

/// PFCP self-identity as the UPF advertises it.
#[derive(Debug, Clone, Default)]
pub struct PfcpForUpf {
    pub node_id: String,
    pub addr: String,
}

impl PfcpForUpf {
    pub fn to_value(&self) -> Value {
        let mut m = Mapping::new();
        m.insert("nodeId".into(), self.node_id.clone().into());
        m.insert("addr".into(), self.addr.clone().into());
        Value::Mapping(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn plmn_shape_is_validated() {
        assert!(Plmn::new("999", "70").is_ok());
        assert!(Plmn::new("999", "070").is_ok());
        assert!(matches!(
            Plmn::new("99", "70"),
            Err(ValidationError::InvalidMcc(_))
        ));
        assert!(matches!(
            Plmn::new("999", "7"),
            Err(ValidationError::InvalidMnc(_))
        ));
        assert!(matches!(
            Plmn::new("99a", "70"),
            Err(ValidationError::InvalidMcc(_))
        ));
    }

    #[test]
    fn plmn_equality_is_by_value() {
        let a = Plmn::new("999", "70").unwrap();
        let b = Plmn::new("999", "70").unwrap();
        let c = Plmn::new("001", "01").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn nssai_rejects_bad_sst_and_sd() {
        assert!(Nssai::new(1, "010203").is_ok());
        assert!(matches!(
            Nssai::new(0, "010203"),
            Err(ValidationError::SstOutOfRange(0))
        ));
        assert!(matches!(
            Nssai::new(16, "010203"),
            Err(ValidationError::SstOutOfRange(16))
        ));
        assert!(matches!(
            Nssai::new(1, "01020"),
            Err(ValidationError::InvalidHex { field: "sd", .. })
        ));
        assert!(matches!(
            Nssai::new(1, "01020G"),
            Err(ValidationError::InvalidHex { field: "sd", .. })
        ));
    }

    #[test]
    fn random_batch_sds_are_pairwise_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let batch = Nssai::random_batch(500, &mut rng).unwrap();
        assert_eq!(batch.len(), 500);
        let sds: HashSet<&str> = batch.iter().map(|n| n.sd()).collect();
        assert_eq!(sds.len(), 500);
        for nssai in &batch {
            assert!((1..=15).contains(&nssai.sst()));
            assert!(Nssai::new(nssai.sst(), nssai.sd()).is_ok());
        }
    }

    #[test]
    fn random_batch_stays_linear_for_large_counts() {
        // without-replacement sampling keeps large draws from degenerating
        // into unbounded collision retries
        let mut rng = StdRng::seed_from_u64(11);
        let batch = Nssai::random_batch(100_000, &mut rng).unwrap();
        assert_eq!(batch.len(), 100_000);
        let sds: HashSet<&str> = batch.iter().map(|n| n.sd()).collect();
        assert_eq!(sds.len(), 100_000);
        for nssai in batch.iter().take(64) {
            assert!(Nssai::new(nssai.sst(), nssai.sd()).is_ok());
        }
    }

    #[test]
    fn random_batch_refuses_more_than_sd_space() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            Nssai::random_batch(SD_SPACE + 1, &mut rng),
            Err(ValidationError::SdSpaceExhausted { .. })
        ));
    }

    #[test]
    fn wire_renderings_use_contract_keys() {
        let plmn = Plmn::new("999", "70").unwrap();
        let nssai = Nssai::new(1, "010203").unwrap();
        let tai = Tai::new(plmn.clone(), "000001").unwrap();
        let guami = Guami::new(plmn.clone(), "cafe00").unwrap();

        let tai_value = tai.to_value();
        assert_eq!(tai_value.get("tac"), Some(&Value::from("000001")));
        assert_eq!(
            tai_value.get("plmnId").and_then(|p| p.get("mcc")),
            Some(&Value::from("999"))
        );

        assert_eq!(guami.to_value().get("amfId"), Some(&Value::from("cafe00")));

        let in_plmn = NssaiInPlmn::new(plmn, vec![nssai]);
        assert!(in_plmn.to_value_for_amf().get("snssaiList").is_some());
        assert!(in_plmn
            .to_value_for_nssf()
            .get("supportedSnssaiList")
            .is_some());
    }

    #[test]
    fn upf_info_renders_pools_only_when_asked() {
        let info = DnnUpfInfo {
            dnn: "internet".to_string(),
            pool: "10.60.0.0/16".parse().unwrap(),
            static_pool: "10.60.16.0/20".parse().unwrap(),
        };
        let with = serde_yaml::to_string(&info.to_value(true)).unwrap();
        assert!(with.contains("pools"));
        assert!(with.contains("staticPools"));
        assert!(with.contains("10.60.0.0/16"));
        let without = serde_yaml::to_string(&info.to_value(false)).unwrap();
        assert!(!without.contains("pools"));
    }

    #[test]
    fn guami_and_tai_reject_malformed_hex() {
        let plmn = Plmn::new("999", "70").unwrap();
        assert!(matches!(
            Guami::new(plmn.clone(), "CAFE00"),
            Err(ValidationError::InvalidHex { field: "amfId", .. })
        ));
        assert!(matches!(
            Tai::new(plmn, "12345"),
            Err(ValidationError::InvalidHex { field: "tac", .. })
        ));
    }

    #[test]
    fn random_hex_is_lowercase_fixed_length() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            let h = random_hex(&mut rng, 6);
            assert_eq!(h.len(), 6);
            assert!(h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }
}
