//! Address pool allocation module.
//!
//! This module hands out the non-overlapping CIDR blocks that back each
//! slice's data network: one `(user pool, static pool)` pair per slice or
//! area, allocated in strictly increasing address order.

pub mod splitter;

// Re-export commonly used types
pub use splitter::{NetSplitError, NetSplitter};
