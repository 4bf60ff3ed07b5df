//! Sequential CIDR block allocator.
//!
//! `NetSplitter` is the one stateful, order-dependent component of a
//! generation run: each `split()` yields the next block of the configured
//! size together with a static sub-pool carved out of it. Repeated calls over
//! a fixed base network always produce the same sequence.

use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

/// Prefix-length difference between a pool and its static sub-pool.
/// A /16 pool carries /20 static sub-pools.
const STATIC_PREFIX_DIFF: u8 = 4;

/// Allocation errors
#[derive(Debug, thiserror::Error)]
pub enum NetSplitError {
    #[error("invalid base network prefix /{0}: must be at most /{max} to leave room for a static sub-pool", max = 32 - STATIC_PREFIX_DIFF)]
    InvalidPrefix(u8),
    #[error("address space exhausted after {allocated} pools from {base}")]
    AddressSpaceExhausted { base: Ipv4Net, allocated: usize },
}

/// Sequential, non-overlapping address pool allocator.
///
/// Owned exclusively by the topology strategy driving it; concurrent
/// strategies must each own a private splitter.
#[derive(Debug)]
pub struct NetSplitter {
    base: Ipv4Net,
    cursor: Option<Ipv4Net>,
    allocated: usize,
}

impl NetSplitter {
    /// Anchor the allocator at `base/prefix`. The address is truncated to its
    /// network address; the prefix must leave room for the static sub-pool.
    pub fn new(base: Ipv4Addr, prefix: u8) -> Result<Self, NetSplitError> {
        if u32::from(prefix) + u32::from(STATIC_PREFIX_DIFF) > 32 {
            return Err(NetSplitError::InvalidPrefix(prefix));
        }
        let net = Ipv4Net::new(base, prefix)
            .map_err(|_| NetSplitError::InvalidPrefix(prefix))?
            .trunc();
        Ok(Self {
            base: net,
            cursor: Some(net),
            allocated: 0,
        })
    }

    /// Hand out the next `(pool, static_pool)` pair.
    ///
    /// The pool is the block at the cursor; the static pool is its *second*
    /// sub-block one `STATIC_PREFIX_DIFF` narrower (the first sub-block is a
    /// reserved range downstream consumers expect to stay unused). The cursor
    /// then advances past the whole pool. Running off the end of the IPv4
    /// space is fatal; the allocator never wraps around.
    pub fn split(&mut self) -> Result<(Ipv4Net, Ipv4Net), NetSplitError> {
        let pool = self.cursor.ok_or(NetSplitError::AddressSpaceExhausted {
            base: self.base,
            allocated: self.allocated,
        })?;

        let static_prefix = pool.prefix_len() + STATIC_PREFIX_DIFF;
        let static_base =
            u32::from(pool.network()) + (1u32 << (32 - u32::from(static_prefix)));
        let static_pool = Ipv4Net::new(Ipv4Addr::from(static_base), static_prefix)
            .map_err(|_| NetSplitError::InvalidPrefix(pool.prefix_len()))?;

        let block_size = 1u64 << (32 - u32::from(pool.prefix_len()));
        let next_base = u64::from(u32::from(pool.network())) + block_size;
        self.cursor = u32::try_from(next_base)
            .ok()
            .and_then(|n| Ipv4Net::new(Ipv4Addr::from(n), pool.prefix_len()).ok());

        self.allocated += 1;
        Ok((pool, static_pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(base: &str, prefix: u8) -> NetSplitter {
        NetSplitter::new(base.parse().unwrap(), prefix).unwrap()
    }

    #[test]
    fn golden_first_split() {
        let mut net = splitter("10.60.0.0", 16);
        let (pool, static_pool) = net.split().unwrap();
        assert_eq!(pool, "10.60.0.0/16".parse::<Ipv4Net>().unwrap());
        assert_eq!(static_pool, "10.60.16.0/20".parse::<Ipv4Net>().unwrap());

        let (pool, static_pool) = net.split().unwrap();
        assert_eq!(pool, "10.61.0.0/16".parse::<Ipv4Net>().unwrap());
        assert_eq!(static_pool, "10.61.16.0/20".parse::<Ipv4Net>().unwrap());
    }

    #[test]
    fn pools_are_disjoint_and_strictly_increasing() {
        let mut net = splitter("10.60.0.0", 16);
        let pairs: Vec<(Ipv4Net, Ipv4Net)> = (0..8).map(|_| net.split().unwrap()).collect();

        for window in pairs.windows(2) {
            assert!(window[0].0.network() < window[1].0.network());
        }
        for (i, (pool_a, _)) in pairs.iter().enumerate() {
            for (pool_b, _) in pairs.iter().skip(i + 1) {
                assert!(!pool_a.contains(pool_b) && !pool_b.contains(pool_a));
            }
        }
        // static pool stays inside its pool
        for (pool, static_pool) in &pairs {
            assert!(pool.contains(static_pool));
        }
    }

    #[test]
    fn sequence_is_deterministic() {
        let run = |n: usize| -> Vec<(Ipv4Net, Ipv4Net)> {
            let mut net = splitter("10.80.0.0", 16);
            (0..n).map(|_| net.split().unwrap()).collect()
        };
        assert_eq!(run(6), run(6));
    }

    #[test]
    fn exhaustion_is_fatal_not_wrapping() {
        let mut net = splitter("255.255.255.0", 24);
        let (pool, _) = net.split().unwrap();
        assert_eq!(pool, "255.255.255.0/24".parse::<Ipv4Net>().unwrap());
        assert!(matches!(
            net.split(),
            Err(NetSplitError::AddressSpaceExhausted { allocated: 1, .. })
        ));
        // still exhausted on the next attempt
        assert!(net.split().is_err());
    }

    #[test]
    fn base_address_is_truncated() {
        let mut net = splitter("10.60.3.7", 16);
        let (pool, _) = net.split().unwrap();
        assert_eq!(pool, "10.60.0.0/16".parse::<Ipv4Net>().unwrap());
    }

    #[test]
    fn prefix_without_room_for_static_pool_is_rejected() {
        assert!(matches!(
            NetSplitter::new("10.0.0.0".parse().unwrap(), 30),
            Err(NetSplitError::InvalidPrefix(30))
        ));
    }

    #[test]
    fn out_of_range_prefix_is_an_error_not_a_panic() {
        for prefix in [33u8, 252, 255] {
            let result = NetSplitter::new("10.0.0.0".parse().unwrap(), prefix);
            assert!(
                matches!(result, Err(NetSplitError::InvalidPrefix(p)) if p == prefix),
                "/{prefix}"
            );
        }
        // the display string must not re-overflow either
        let err = NetSplitter::new("10.0.0.0".parse().unwrap(), 255).unwrap_err();
        assert!(err.to_string().contains("/255"));
    }
}
