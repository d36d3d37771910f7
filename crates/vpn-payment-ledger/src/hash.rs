//! persistent, domain-separated hashing
//!
//! every logical hash use mixes in its own 32-byte tag as the first block,
//! so outputs from one use cannot be replayed as another

use sha2::{Digest, Sha256};

use crate::types::Bytes32;

/// 32-byte domain tag, ascii prefix zero-padded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomainTag(Bytes32);

impl DomainTag {
    /// panics at compile time if `prefix` is longer than 32 bytes
    pub const fn new(prefix: &[u8]) -> Self {
        assert!(prefix.len() <= 32, "domain tag longer than 32 bytes");
        let mut tag = [0u8; 32];
        let mut i = 0;
        while i < prefix.len() {
            tag[i] = prefix[i];
            i += 1;
        }
        Self(tag)
    }

    pub const fn as_bytes(&self) -> &Bytes32 {
        &self.0
    }
}

/// tag for nullifier derivation
pub const NULLIFIER_DOMAIN: DomainTag = DomainTag::new(b"vpn:nullifier:");
/// tag for value/salt commitments
pub const COMMITMENT_DOMAIN: DomainTag = DomainTag::new(b"vpn:commitment:");

/// sha-256 over `tag || parts[0] || .. || parts[n]`
pub fn persistent_hash(domain: &DomainTag, parts: &[&Bytes32]) -> Bytes32 {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
