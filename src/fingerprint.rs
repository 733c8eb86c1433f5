//! Snapshot fingerprints for canonical graphs.
//!
//! A fingerprint is a SHA-256 digest of the canonical text with domain
//! separation and length prefixing. Two canonical graphs have the same
//! fingerprint exactly when they serialize identically (up to hash
//! collisions), which makes it a compact snapshot identity for paths and
//! candidates.

use crate::core::AEGraph;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain tag for graph fingerprints. Bump if the canonical text changes.
pub const DOMAIN_GRAPH_V0: &[u8] = b"AEGRAPH_V0";

/// A 256-bit hash value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Computes SHA-256 of `data` with domain separation.
    ///
    /// Input is `b"AEG:" || domain || b":v1" || len(data) as u64 LE || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = domain_hasher(domain, data.len());
        hasher.update(data);
        Self(hasher.finalize().into())
    }
}

/// A hasher primed with the domain header for `len` bytes of data.
fn domain_hasher(domain: &[u8], len: usize) -> Sha256 {
    let mut hasher = Sha256::new();
    hasher.update(b"AEG:");
    hasher.update(domain);
    hasher.update(b":v1");
    hasher.update((len as u64).to_le_bytes());
    hasher
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 4 bytes are enough to tell snapshots apart in logs
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl AEGraph {
    /// Fingerprint of this graph's canonical text.
    ///
    /// The text is streamed into the hasher, never built as one string.
    pub fn fingerprint(&self) -> HashValue {
        let len = self.tokens().map(str::len).sum();
        let mut hasher = domain_hasher(DOMAIN_GRAPH_V0, len);
        for token in self.tokens() {
            hasher.update(token);
        }
        HashValue(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_graphs_share_fingerprint() {
        let a: AEGraph = "(b, a, [d, c])".parse().unwrap();
        let b: AEGraph = "( [c,d] , a , b )".parse().unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn distinct_graphs_differ() {
        let a: AEGraph = "(a)".parse().unwrap();
        let b: AEGraph = "[a]".parse().unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), HashValue([0u8; 32]));
    }

    #[test]
    fn streamed_text_matches_rendered_text() {
        let g: AEGraph = "(p, [q, [r, s]], [])".parse().unwrap();
        assert_eq!(
            g.fingerprint(),
            HashValue::hash_with_domain(DOMAIN_GRAPH_V0, g.repr().as_bytes())
        );
    }

    #[test]
    fn domain_separates() {
        let data = b"(a)";
        assert_ne!(
            HashValue::hash_with_domain(b"ONE", data),
            HashValue::hash_with_domain(b"TWO", data)
        );
    }
}
