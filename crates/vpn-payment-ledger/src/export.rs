//! settlement export
//!
//! flattens a receipt into the hex record the settlement side consumes.
//! the proof bytes are opaque here; producing them is the prover's job.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Bytes32, PaymentReceipt};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub zk_proof: String,
    pub nullifier: String,
    pub state_root: String,
    /// pricing tier index
    pub selection: u32,
    pub region: String,
}

impl SettlementRecord {
    pub fn new(receipt: &PaymentReceipt, state_root: &Bytes32, proof: &[u8]) -> Self {
        Self {
            zk_proof: hex::encode(proof),
            nullifier: hex::encode(receipt.nullifier.0),
            state_root: hex::encode(state_root),
            selection: receipt.pricing_tier as u32,
            region: hex::encode(receipt.region),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
