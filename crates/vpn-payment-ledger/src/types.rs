//! value types shared by the ledger, circuits and callers

use core::fmt;

use scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// fixed 32-byte vector, the only byte width the contract uses
pub type Bytes32 = [u8; 32];

/// check that a caller-supplied byte vector is exactly 32 bytes
pub fn bytes32(argument: &'static str, bytes: &[u8]) -> Result<Bytes32> {
    Bytes32::try_from(bytes).map_err(|_| Error::ArgumentLength {
        argument,
        expected: 32,
        found: bytes.len(),
    })
}

/// left-align utf-8 bytes into 32 bytes, zero padded, truncated at 32
fn left_aligned(s: &str) -> Bytes32 {
    let mut out = [0u8; 32];
    let bytes = s.as_bytes();
    let n = bytes.len().min(32);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}

/// 32-byte region code, e.g. `"us-east"`
pub fn region_to_bytes(region: &str) -> Bytes32 {
    left_aligned(region)
}

/// provider commitment derived from a cardano address string
///
/// this is the address bytes themselves, not a hash. a deployment that wants
/// a hiding commitment should pass the address through
/// [`commitment_hash`](crate::circuits::commitment_hash) first
pub fn provider_commitment(provider_address: &str) -> Bytes32 {
    left_aligned(provider_address)
}

/// big-endian, right-aligned 32-byte encoding of an unsigned integer
pub fn u64_to_bytes32(value: u64) -> Bytes32 {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    out
}

/// address of a deployed contract instance
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Encode, Decode, Serialize, Deserialize)]
pub struct ContractAddress(#[serde(with = "hex_bytes32")] pub Bytes32);

impl ContractAddress {
    /// placeholder address used for genesis and read-only projections
    pub fn dummy() -> Self {
        Self([0u8; 32])
    }
}

impl fmt::Debug for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractAddress({})", hex::encode(self.0))
    }
}

/// one-time payment identifier
///
/// derived from the payer's secret key, the ledger sequence and the tier,
/// so only the key holder can compute it and each sequence slot yields
/// a fresh one
#[derive(Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub struct Nullifier(#[serde(with = "hex_bytes32")] pub Bytes32);

impl Nullifier {
    pub fn to_bytes(&self) -> Bytes32 {
        self.0
    }

    pub fn from_bytes(bytes: Bytes32) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Nullifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Nullifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nullifier({})", hex::encode(self.0))
    }
}

/// vpn access tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
#[repr(u8)]
pub enum PricingTier {
    /// 1 hour
    Hour = 0,
    /// 3 days
    ThreeDays = 1,
    /// 1 year
    Year = 2,
}

impl PricingTier {
    /// number of valid tiers, written to the ledger at genesis
    pub const COUNT: u64 = 3;

    pub const ALL: [PricingTier; 3] = [PricingTier::Hour, PricingTier::ThreeDays, PricingTier::Year];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// `None` for anything outside {0, 1, 2}
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(PricingTier::Hour),
            1 => Some(PricingTier::ThreeDays),
            2 => Some(PricingTier::Year),
            _ => None,
        }
    }
}

/// caller-held state, never written to the ledger
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PrivateState {
    /// key the nullifier is derived from
    pub secret_key: Bytes32,
    /// reserved; no circuit reads it yet
    pub pending_payment_amount: u64,
}

impl PrivateState {
    pub fn new(secret_key: Bytes32) -> Self {
        Self {
            secret_key,
            pending_payment_amount: 0,
        }
    }

    pub fn with_pending_amount(self, amount: u64) -> Self {
        Self {
            pending_payment_amount: amount,
            ..self
        }
    }
}

// keep the key out of logs
impl fmt::Debug for PrivateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateState")
            .field("secret_key", &"<redacted>")
            .field("pending_payment_amount", &self.pending_payment_amount)
            .finish()
    }
}

/// returned by `payForVPN`, never stored
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub nullifier: Nullifier,
    pub pricing_tier: u8,
    #[serde(with = "hex_bytes32")]
    pub region: Bytes32,
    /// ledger sequence at payment time, not wall-clock
    pub timestamp: u64,
    #[serde(with = "hex_bytes32")]
    pub provider_commitment: Bytes32,
}

pub(crate) mod hex_bytes32 {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::Bytes32;

    pub fn serialize<S: Serializer>(bytes: &Bytes32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes32, D::Error> {
        let s = String::deserialize(deserializer)?;
        let raw = hex::decode(s.trim_start_matches("0x")).map_err(D::Error::custom)?;
        Bytes32::try_from(raw.as_slice())
            .map_err(|_| D::Error::custom(format!("expected 32 bytes, got {}", raw.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_padding() {
        let region = region_to_bytes("us-east");
        assert_eq!(&region[..7], b"us-east");
        assert!(region[7..].iter().all(|b| *b == 0));

        let long = "x".repeat(40);
        assert_eq!(region_to_bytes(&long), [b'x'; 32]);
    }

    #[test]
    fn test_u64_big_endian() {
        let bytes = u64_to_bytes32(1);
        assert_eq!(bytes[31], 1);
        assert!(bytes[..31].iter().all(|b| *b == 0));

        let bytes = u64_to_bytes32(0x0102);
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
    }

    #[test]
    fn test_bytes32_length_check() {
        assert!(bytes32("region", &[0u8; 32]).is_ok());
        match bytes32("region", &[0u8; 31]) {
            Err(Error::ArgumentLength { argument, expected, found }) => {
                assert_eq!(argument, "region");
                assert_eq!(expected, 32);
                assert_eq!(found, 31);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_tier_range() {
        for tier in PricingTier::ALL {
            assert_eq!(PricingTier::from_index(tier.index()), Some(tier));
        }
        assert_eq!(PricingTier::from_index(3), None);
        assert_eq!(PricingTier::from_index(255), None);
    }

    #[test]
    fn test_private_state_redacted() {
        let state = PrivateState::new([7u8; 32]).with_pending_amount(5);
        let dbg = format!("{:?}", state);
        assert!(dbg.contains("redacted"));
        assert!(!dbg.contains("07"));
    }
}
