//! Topology composition strategies.
//!
//! The four supported deployment shapes share a common prelude (one PLMN,
//! one NSSAI per slice, one serving-area set) and diverge in how SMF/UPF
//! instances are partitioned and wired. Each strategy owns a private
//! `NetSplitter` and draws one pool pair per slice or area in index order,
//! so pool assignment is reproducible for a fixed base network.

use crate::config::{DeploymentConfig, DnsConfig, TopologyMode};
use crate::identifiers::{
    Dnn, DnnInfo, DnnUpfInfo, Guami, Nssai, NssaiInPlmn, PfcpForSmf, PfcpForUpf, Plmn, SnssaiInfo,
    SnssaiUpfInfo, Tai, ValidationError,
};
use crate::ip::{NetSplitError, NetSplitter};
use crate::nf::{Amf, Ausf, Chf, MongoDb, NetworkFunction, Nrf, Nssf, Pcf, Sbi, Smf, Udm, Udr, Upf, WebUi};
use crate::topology::types::{Interface, Link, UpNode, UpfVertex};
use ipnet::Ipv4Net;
use log::debug;
use rand::Rng;

/// Every topology hangs off a single radio access vertex.
const GNB_NAME: &str = "gNB1";

const DEFAULT_LOCALITY: &str = "area1";

/// Strategy construction errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("identifier generation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("address pool allocation failed: {0}")]
    Allocation(#[from] NetSplitError),
}

/// Build the descriptor set for the configured topology mode.
///
/// The returned list is ordered: control plane first, then per-slice (or
/// per-area) SMF/UPF pairs in index order.
pub fn build(
    config: &DeploymentConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Box<dyn NetworkFunction>>, BuildError> {
    match config.topology.mode {
        TopologyMode::Dedicated => dedicated(config, rng),
        TopologyMode::SharedSmf => shared_smf(config, rng),
        TopologyMode::AreaPartitioned => area_partitioned(config, rng),
        TopologyMode::UplinkClassifier => uplink_classifier(config, rng),
    }
}

/// Identifiers every strategy starts from
struct Prelude {
    plmn: Plmn,
    nssais: Vec<Nssai>,
    support_plmn_list: Vec<NssaiInPlmn>,
}

fn prelude(config: &DeploymentConfig, rng: &mut impl Rng) -> Result<Prelude, ValidationError> {
    let plmn = config.plmn()?;
    let nssais = Nssai::random_batch(config.topology.slices, rng)?;
    let support_plmn_list = vec![NssaiInPlmn::new(plmn.clone(), nssais.clone())];
    debug!(
        "prelude: plmn {}/{}, {} slice(s)",
        plmn.mcc(),
        plmn.mnc(),
        nssais.len()
    );
    Ok(Prelude {
        plmn,
        nssais,
        support_plmn_list,
    })
}

/// Functions every deployment carries exactly once, whatever the mode.
fn common_nfs() -> Vec<Box<dyn NetworkFunction>> {
    vec![
        Box::new(Chf {
            name: "chf".to_string(),
            sbi: Sbi::default(),
            cgf_host_ipv4: String::new(),
            nrf_uri: String::new(),
            mongodb_uri: String::new(),
        }),
        Box::new(Udm {
            name: "udm".to_string(),
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }),
        Box::new(Udr {
            name: "udr".to_string(),
            sbi: Sbi::default(),
            nrf_uri: String::new(),
            mongodb_uri: String::new(),
        }),
        Box::new(WebUi {
            name: "webui".to_string(),
            mongodb_uri: String::new(),
            billing_server_host: String::new(),
        }),
        Box::new(MongoDb {
            name: "mongodb".to_string(),
        }),
    ]
}

/// Singleton AMF/AUSF/PCF/NRF/NSSF set for the non-partitioned modes.
fn singleton_control_plane(
    plmn: &Plmn,
    support_plmn_list: &[NssaiInPlmn],
    dnns: &[String],
    rng: &mut impl Rng,
) -> Vec<Box<dyn NetworkFunction>> {
    let guami = Guami::random(plmn.clone(), rng);
    let tai = Tai::random(plmn.clone(), rng);
    vec![
        Box::new(Amf {
            name: "amf".to_string(),
            served_guamis: vec![guami],
            supported_tais: vec![tai],
            supported_plmns: support_plmn_list.to_vec(),
            dnns: dnns.to_vec(),
            locality: DEFAULT_LOCALITY.to_string(),
            ngap_ip_list: String::new(),
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }),
        Box::new(Ausf {
            name: "ausf".to_string(),
            supported_plmns: vec![plmn.clone()],
            locality: DEFAULT_LOCALITY.to_string(),
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }),
        Box::new(Pcf {
            name: "pcf".to_string(),
            locality: DEFAULT_LOCALITY.to_string(),
            sbi: Sbi::default(),
            nrf_uri: String::new(),
            mongodb_uri: String::new(),
        }),
        Box::new(Nrf {
            name: "nrf".to_string(),
            default_plmn: plmn.clone(),
            sbi: Sbi::default(),
        }),
        Box::new(Nssf {
            name: "nssf".to_string(),
            plmns: vec![plmn.clone()],
            nssais_in_plmns: support_plmn_list.to_vec(),
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }),
    ]
}

/// One slice's share of the user plane: its DNS info, its UPF-side pool
/// association, and the raw pool for the UPF deployment's DNN list.
struct SlicePools {
    nssai_info: SnssaiInfo,
    snssai_upf_info: SnssaiUpfInfo,
    pool: Ipv4Net,
}

fn slice_pools(
    dnn: &str,
    nssai: &Nssai,
    dns: &DnsConfig,
    splitter: &mut NetSplitter,
) -> Result<SlicePools, NetSplitError> {
    let (pool, static_pool) = splitter.split()?;
    debug!("slice {}: pool {pool}, static pool {static_pool}", nssai.sd());
    Ok(SlicePools {
        nssai_info: SnssaiInfo {
            snssai: nssai.clone(),
            dnn_infos: vec![DnnInfo {
                dnn: dnn.to_string(),
                dns_ipv4: dns.ipv4,
                dns_ipv6: dns.ipv6,
            }],
        },
        snssai_upf_info: SnssaiUpfInfo {
            snssai: nssai.clone(),
            dnn_upf_infos: vec![DnnUpfInfo {
                dnn: dnn.to_string(),
                pool,
                static_pool,
            }],
        },
        pool,
    })
}

fn splitter_for(config: &DeploymentConfig) -> Result<NetSplitter, NetSplitError> {
    let pool = config.pool();
    NetSplitter::new(pool.base, pool.prefix)
}

fn upf_deployment(index: usize, dnn: &str, pool: Ipv4Net) -> Box<dyn NetworkFunction> {
    Box::new(Upf {
        name: format!("upf{}", index + 1),
        pfcp: PfcpForUpf::default(),
        dnns: vec![Dnn {
            name: dnn.to_string(),
            cidr: pool,
        }],
        gtpu_if_name: String::new(),
    })
}

/// One SMF + one UPF per slice; each SMF steers a single PSA-UPF
/// terminating that slice's data network.
fn dedicated(
    config: &DeploymentConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Box<dyn NetworkFunction>>, BuildError> {
    let Prelude {
        plmn,
        nssais,
        support_plmn_list,
    } = prelude(config, rng)?;

    let mut nfs = singleton_control_plane(&plmn, &support_plmn_list, &config.topology.dnns, rng);
    nfs.extend(common_nfs());

    let mut splitter = splitter_for(config)?;
    for (i, nssai) in nssais.iter().enumerate() {
        let dnn = &config.topology.dnns[i];
        let slice = slice_pools(dnn, nssai, &config.dns, &mut splitter)?;
        let up_nodes = vec![
            UpNode::Gnb {
                name: GNB_NAME.to_string(),
            },
            UpNode::PsaUpf(UpfVertex::new(
                "upf",
                vec![slice.snssai_upf_info],
                vec![Interface::n3(dnn)],
            )),
        ];
        nfs.push(Box::new(Smf {
            name: format!("smf{}", i + 1),
            snssai_infos: vec![slice.nssai_info],
            plmns: vec![plmn.clone()],
            pfcp: PfcpForSmf::default(),
            up_nodes,
            links: vec![Link::new(GNB_NAME, "UPF")],
            locality: DEFAULT_LOCALITY.to_string(),
            ulcl: false,
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }));
        nfs.push(upf_deployment(i, dnn, slice.pool));
    }
    Ok(nfs)
}

/// A single SMF serving every slice through one PSA-UPF per slice.
fn shared_smf(
    config: &DeploymentConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Box<dyn NetworkFunction>>, BuildError> {
    let Prelude {
        plmn,
        nssais,
        support_plmn_list,
    } = prelude(config, rng)?;

    let mut nfs = singleton_control_plane(&plmn, &support_plmn_list, &config.topology.dnns, rng);
    nfs.extend(common_nfs());

    let mut splitter = splitter_for(config)?;
    let mut snssai_infos = Vec::with_capacity(nssais.len());
    let mut up_nodes = Vec::with_capacity(nssais.len());
    let mut links = Vec::with_capacity(nssais.len());
    let mut upfs: Vec<Box<dyn NetworkFunction>> = Vec::with_capacity(nssais.len());

    for (i, nssai) in nssais.iter().enumerate() {
        let dnn = &config.topology.dnns[i];
        let slice = slice_pools(dnn, nssai, &config.dns, &mut splitter)?;
        let node_name = format!("upf{}", i + 1);
        up_nodes.push(UpNode::PsaUpf(UpfVertex::new(
            &node_name,
            vec![slice.snssai_upf_info],
            vec![Interface::n3(dnn)],
        )));
        links.push(Link::new(GNB_NAME, &node_name.to_uppercase()));
        snssai_infos.push(slice.nssai_info);
        upfs.push(upf_deployment(i, dnn, slice.pool));
    }

    nfs.push(Box::new(Smf {
        name: "smf".to_string(),
        snssai_infos,
        plmns: vec![plmn],
        pfcp: PfcpForSmf::default(),
        up_nodes,
        links,
        locality: DEFAULT_LOCALITY.to_string(),
        ulcl: false,
        sbi: Sbi::default(),
        nrf_uri: String::new(),
    }));
    nfs.extend(upfs);
    Ok(nfs)
}

/// A full AMF+PCF+SMF+UPF set per serving area with a distinct locality
/// tag; AUSF/NSSF/NRF stay area-independent. Area pools come from the
/// same allocator sequence, area i strictly before area i+1.
fn area_partitioned(
    config: &DeploymentConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Box<dyn NetworkFunction>>, BuildError> {
    let Prelude {
        plmn,
        nssais,
        support_plmn_list,
    } = prelude(config, rng)?;

    let mut nfs: Vec<Box<dyn NetworkFunction>> = vec![
        Box::new(Ausf {
            name: "ausf".to_string(),
            supported_plmns: vec![plmn.clone()],
            locality: DEFAULT_LOCALITY.to_string(),
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }),
        Box::new(Nrf {
            name: "nrf".to_string(),
            default_plmn: plmn.clone(),
            sbi: Sbi::default(),
        }),
        Box::new(Nssf {
            name: "nssf".to_string(),
            plmns: vec![plmn.clone()],
            nssais_in_plmns: support_plmn_list.to_vec(),
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }),
    ];
    nfs.extend(common_nfs());

    // Every area serves the first slice's data network.
    let dnn = &config.topology.dnns[0];
    let nssai = &nssais[0];
    let mut splitter = splitter_for(config)?;

    for area in 0..config.areas() {
        let locality = format!("area{}", area + 1);
        nfs.push(Box::new(Amf {
            name: format!("amf{}", area + 1),
            served_guamis: vec![Guami::random(plmn.clone(), rng)],
            supported_tais: vec![Tai::random(plmn.clone(), rng)],
            supported_plmns: support_plmn_list.to_vec(),
            dnns: config.topology.dnns.clone(),
            locality: locality.clone(),
            ngap_ip_list: String::new(),
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }));
        nfs.push(Box::new(Pcf {
            name: format!("pcf{}", area + 1),
            locality: locality.clone(),
            sbi: Sbi::default(),
            nrf_uri: String::new(),
            mongodb_uri: String::new(),
        }));

        let slice = slice_pools(dnn, nssai, &config.dns, &mut splitter)?;
        let up_nodes = vec![UpNode::PsaUpf(UpfVertex::new(
            "upf",
            vec![slice.snssai_upf_info],
            vec![Interface::n3(dnn)],
        ))];
        nfs.push(Box::new(Smf {
            name: format!("smf{}", area + 1),
            snssai_infos: vec![slice.nssai_info],
            plmns: vec![plmn.clone()],
            pfcp: PfcpForSmf::default(),
            up_nodes,
            links: vec![Link::new(GNB_NAME, "UPF")],
            locality,
            ulcl: false,
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }));
        nfs.push(upf_deployment(area, dnn, slice.pool));
    }
    Ok(nfs)
}

/// Per slice, two user-plane tiers in series (gNB -> I-UPF -> PSA-UPF)
/// with the SMF in uplink-classifier mode. Both tiers are provisioned
/// with the same slice/DNN data; only the anchor renders the pools.
fn uplink_classifier(
    config: &DeploymentConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Box<dyn NetworkFunction>>, BuildError> {
    let Prelude {
        plmn,
        nssais,
        support_plmn_list,
    } = prelude(config, rng)?;

    let mut nfs = singleton_control_plane(&plmn, &support_plmn_list, &config.topology.dnns, rng);
    nfs.extend(common_nfs());

    let mut splitter = splitter_for(config)?;
    for (i, nssai) in nssais.iter().enumerate() {
        let dnn = &config.topology.dnns[i];
        let slice = slice_pools(dnn, nssai, &config.dns, &mut splitter)?;
        let interfaces = vec![Interface::n3(dnn)];
        let up_nodes = vec![
            UpNode::IUpf(UpfVertex::new(
                "iupf",
                vec![slice.snssai_upf_info.clone()],
                interfaces.clone(),
            )),
            UpNode::PsaUpf(UpfVertex::new(
                "psaupf",
                vec![slice.snssai_upf_info],
                interfaces,
            )),
        ];
        nfs.push(Box::new(Smf {
            name: format!("smf{}", i + 1),
            snssai_infos: vec![slice.nssai_info],
            plmns: vec![plmn.clone()],
            pfcp: PfcpForSmf::default(),
            up_nodes,
            links: vec![Link::new(GNB_NAME, "IUPF"), Link::new("IUPF", "PSAUPF")],
            locality: DEFAULT_LOCALITY.to_string(),
            ulcl: true,
            sbi: Sbi::default(),
            nrf_uri: String::new(),
        }));
        nfs.push(upf_deployment(i, dnn, slice.pool));
    }
    Ok(nfs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nf::NfKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn config(yaml: &str) -> DeploymentConfig {
        let config: DeploymentConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        config
    }

    fn build_mode(yaml: &str) -> Vec<Box<dyn NetworkFunction>> {
        let mut rng = StdRng::seed_from_u64(99);
        build(&config(yaml), &mut rng).unwrap()
    }

    fn count(nfs: &[Box<dyn NetworkFunction>], kind: NfKind) -> usize {
        nfs.iter().filter(|nf| nf.kind() == kind).count()
    }

    #[test]
    fn dedicated_pairs_smf_and_upf_per_slice() {
        let nfs = build_mode(
            "topology:\n  mode: dedicated\n  slices: 3\n  dnns: [internet, mec, iot]\n",
        );
        assert_eq!(count(&nfs, NfKind::Smf), 3);
        assert_eq!(count(&nfs, NfKind::Upf), 3);
        assert_eq!(count(&nfs, NfKind::Amf), 1);
        assert_eq!(count(&nfs, NfKind::Nrf), 1);
        assert_eq!(count(&nfs, NfKind::Mongodb), 1);
    }

    #[test]
    fn shared_smf_is_a_singleton() {
        let nfs = build_mode(
            "topology:\n  mode: shared-smf\n  slices: 3\n  dnns: [internet, mec, iot]\n",
        );
        assert_eq!(count(&nfs, NfKind::Smf), 1);
        assert_eq!(count(&nfs, NfKind::Upf), 3);
    }

    #[test]
    fn area_partitioned_replicates_per_area() {
        let nfs = build_mode(
            "topology:\n  mode: area-partitioned\n  slices: 2\n  areas: 3\n  dnns: [internet]\n",
        );
        assert_eq!(count(&nfs, NfKind::Amf), 3);
        assert_eq!(count(&nfs, NfKind::Pcf), 3);
        assert_eq!(count(&nfs, NfKind::Smf), 3);
        assert_eq!(count(&nfs, NfKind::Upf), 3);
        // area-independent singletons
        assert_eq!(count(&nfs, NfKind::Ausf), 1);
        assert_eq!(count(&nfs, NfKind::Nssf), 1);
        assert_eq!(count(&nfs, NfKind::Nrf), 1);
    }

    #[test]
    fn instance_names_are_globally_unique() {
        for yaml in [
            "topology:\n  mode: dedicated\n  slices: 4\n  dnns: [a, b, c, d]\n",
            "topology:\n  mode: shared-smf\n  slices: 4\n  dnns: [a, b, c, d]\n",
            "topology:\n  mode: area-partitioned\n  slices: 1\n  areas: 4\n  dnns: [a]\n",
            "topology:\n  mode: uplink-classifier\n  slices: 4\n  dnns: [a, b, c, d]\n",
        ] {
            let nfs = build_mode(yaml);
            let names: HashSet<String> = nfs.iter().map(|nf| nf.name().to_string()).collect();
            assert_eq!(names.len(), nfs.len(), "{yaml}");
        }
    }

    #[test]
    fn pools_are_threaded_in_slice_order() {
        use crate::nf::render;
        use crate::template::BuiltinTemplates;
        use serde_yaml::Value;

        let nfs = build_mode(
            "topology:\n  mode: dedicated\n  slices: 2\n  dnns: [internet, mec]\n",
        );
        let templates = BuiltinTemplates::default();
        let mut cidrs = Vec::new();
        for nf in &nfs {
            if nf.kind() == NfKind::Upf {
                let (_, section) = render(nf.as_ref(), &templates).unwrap();
                let cidr = section
                    .get("config")
                    .and_then(|c| c.get("dnnList"))
                    .and_then(Value::as_sequence)
                    .and_then(|s| s[0].get("cidr"))
                    .cloned()
                    .unwrap();
                cidrs.push(cidr);
            }
        }
        assert_eq!(
            cidrs,
            vec![Value::from("10.60.0.0/16"), Value::from("10.61.0.0/16")]
        );
    }

    #[test]
    fn area_mode_tags_localities() {
        use crate::nf::render;
        use crate::template::BuiltinTemplates;
        use serde_yaml::Value;

        let nfs = build_mode(
            "topology:\n  mode: area-partitioned\n  slices: 1\n  areas: 2\n  dnns: [internet]\n",
        );
        let templates = BuiltinTemplates::default();
        for (name, locality) in [("amf1", "area1"), ("amf2", "area2"), ("smf2", "area2")] {
            let nf = nfs.iter().find(|nf| nf.name() == name).unwrap();
            let (_, section) = render(nf.as_ref(), &templates).unwrap();
            assert_eq!(
                section.get("config").and_then(|c| c.get("locality")),
                Some(&Value::from(locality)),
                "{name}"
            );
        }
    }

    #[test]
    fn too_many_slices_exhaust_the_address_space() {
        // a /16 base with /16 pools runs off the top of 10.x quickly when
        // anchored near the end of the space
        let yaml = r#"
topology:
  mode: shared-smf
  slices: 3
  dnns: [a, b, c]
pools:
  base: 255.254.0.0
  prefix: 16
"#;
        let mut rng = StdRng::seed_from_u64(1);
        let result = build(&config(yaml), &mut rng);
        assert!(matches!(
            result,
            Err(BuildError::Allocation(
                NetSplitError::AddressSpaceExhausted { .. }
            ))
        ));
    }
}
