//! slicenet generates per-instance 5G core configuration from a compact
//! deployment description.
//!
//! A deployment names a topology mode, a slice count and the data networks
//! to serve; slicenet expands that into a full set of network function
//! descriptors, assigns each slice a disjoint UE address pool, renders
//! every descriptor onto a per-function config skeleton and merges the
//! results into a single values document.

pub mod config;
pub mod identifiers;
pub mod ip;
pub mod merge;
pub mod nf;
pub mod orchestrator;
pub mod template;
pub mod topology;
