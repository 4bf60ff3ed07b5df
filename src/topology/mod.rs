//! User-plane topology module.
//!
//! This module contains the user-plane graph vocabulary (gNB, I-UPF and
//! PSA-UPF vertices, directed links) and the four composition strategies
//! that wire network-function descriptors into a deployment topology.

pub mod strategies;
pub mod types;

// Re-export key types and functions for easier access
pub use strategies::{build, BuildError};
pub use types::{Interface, Link, UpNode, UpfVertex};
