//! Deployment request configuration.
//!
//! A generation run is described by a small YAML document: which topology
//! mode to build, how many slices or areas, the data network names, the PLMN
//! and the base address pool. The document is parsed with serde and validated
//! before any descriptor is constructed.

use crate::identifiers::{Plmn, ValidationError};
use crate::ip::{NetSplitError, NetSplitter};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

/// Topology composition strategies
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyMode {
    /// One SMF + one UPF per slice
    Dedicated,
    /// A single SMF serving one PSA-UPF per slice
    SharedSmf,
    /// A full AMF+PCF+SMF+UPF set per serving area
    AreaPartitioned,
    /// Per slice, gNB -> I-UPF -> PSA-UPF with the SMF in uplink-classifier mode
    UplinkClassifier,
}

/// Operator identity, defaulting to the test network 999/70
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlmnConfig {
    pub mcc: String,
    pub mnc: String,
}

impl Default for PlmnConfig {
    fn default() -> Self {
        Self {
            mcc: "999".to_string(),
            mnc: "70".to_string(),
        }
    }
}

/// Base network the per-slice pools are carved from
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct PoolConfig {
    pub base: Ipv4Addr,
    pub prefix: u8,
}

/// DNS servers advertised for every data network
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct DnsConfig {
    pub ipv4: Ipv4Addr,
    pub ipv6: Ipv6Addr,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            ipv4: Ipv4Addr::new(8, 8, 8, 8),
            ipv6: Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8888),
        }
    }
}

/// Topology shape of the deployment
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TopologyConfig {
    pub mode: TopologyMode,
    pub slices: usize,
    /// Serving areas; only meaningful for `area-partitioned`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub areas: Option<usize>,
    /// Data network names, one per slice (the first is shared by all areas
    /// in `area-partitioned` mode)
    pub dnns: Vec<String>,
}

/// Complete deployment request
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub plmn: PlmnConfig,
    pub topology: TopologyConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pools: Option<PoolConfig>,
    #[serde(default)]
    pub dns: DnsConfig,
}

impl DeploymentConfig {
    /// Validate the request before generation starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        Plmn::new(&self.plmn.mcc, &self.plmn.mnc)?;

        if let Some(pool) = &self.pools {
            NetSplitter::new(pool.base, pool.prefix)?;
        }

        let topology = &self.topology;
        if topology.slices == 0 {
            return Err(ConfigError::InvalidTopology(
                "at least one slice is required".to_string(),
            ));
        }
        if topology.dnns.is_empty() {
            return Err(ConfigError::InvalidTopology(
                "at least one data network name is required".to_string(),
            ));
        }
        match topology.mode {
            TopologyMode::AreaPartitioned => {
                if self.areas() == 0 {
                    return Err(ConfigError::InvalidTopology(
                        "area-partitioned mode requires at least one area".to_string(),
                    ));
                }
            }
            _ => {
                if topology.dnns.len() < topology.slices {
                    return Err(ConfigError::InvalidTopology(format!(
                        "{} slices requested but only {} data network names given",
                        topology.slices,
                        topology.dnns.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// The validated operator identity
    pub fn plmn(&self) -> Result<Plmn, ValidationError> {
        Plmn::new(&self.plmn.mcc, &self.plmn.mnc)
    }

    /// Serving area count; 1 unless configured otherwise
    pub fn areas(&self) -> usize {
        self.topology.areas.unwrap_or(1)
    }

    /// Base pool for the allocator, with the per-mode defaults the original
    /// deployments used when none is configured.
    pub fn pool(&self) -> PoolConfig {
        self.pools.unwrap_or(PoolConfig {
            base: match self.topology.mode {
                TopologyMode::Dedicated | TopologyMode::UplinkClassifier => {
                    Ipv4Addr::new(10, 60, 0, 0)
                }
                TopologyMode::SharedSmf => Ipv4Addr::new(10, 70, 0, 0),
                TopologyMode::AreaPartitioned => Ipv4Addr::new(10, 80, 0, 0),
            },
            prefix: 16,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid topology configuration: {0}")]
    InvalidTopology(String),
    #[error("invalid PLMN configuration: {0}")]
    InvalidPlmn(#[from] ValidationError),
    #[error("invalid pool configuration: {0}")]
    InvalidPool(#[from] NetSplitError),
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load and validate a deployment request from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DeploymentConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: DeploymentConfig = serde_yaml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
