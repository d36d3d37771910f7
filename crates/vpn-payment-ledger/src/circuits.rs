//! contract circuits
//!
//! pure circuits are plain hash functions. stateful circuits run against a
//! borrowed [`CircuitContext`] and hand back a fresh one inside
//! [`CircuitResults`]; the borrowed context is never modified, so a failed
//! call needs no rollback.

use tracing::{info, warn};

use crate::contract::{CircuitContext, CircuitResults};
use crate::error::{Error, LedgerError, Result};
use crate::hash::{persistent_hash, COMMITMENT_DOMAIN, NULLIFIER_DOMAIN};
use crate::ledger::{Field, Ledger, Value};
use crate::query::Op;
use crate::transcript::ProofData;
use crate::types::{u64_to_bytes32, Bytes32, Nullifier, PaymentReceipt, PricingTier};
use crate::witness::{WitnessContext, Witnesses, USER_SECRET_KEY};

/// assertion message of the tier gate
pub const INVALID_PRICING_TIER: &str = "Invalid pricing tier";

/// `H(nullifier_tag, secret_key, sequence, tier)`
pub fn generate_nullifier(secret_key: &Bytes32, sequence: &Bytes32, tier_index: &Bytes32) -> Nullifier {
    Nullifier(persistent_hash(
        &NULLIFIER_DOMAIN,
        &[secret_key, sequence, tier_index],
    ))
}

/// `H(commitment_tag, data, salt)`
pub fn commitment_hash(data: &Bytes32, salt: &Bytes32) -> Bytes32 {
    persistent_hash(&COMMITMENT_DOMAIN, &[data, salt])
}

/// one in-flight invocation: a working copy of the context plus its proof data
struct Invocation {
    ctx: CircuitContext,
    proof: ProofData,
}

impl Invocation {
    fn begin(ctx: &CircuitContext, input: Vec<Value>) -> Self {
        Self {
            ctx: ctx.clone(),
            proof: ProofData {
                input,
                ..ProofData::default()
            },
        }
    }

    fn query(&mut self, program: &[Op]) -> Result<Vec<Value>> {
        let res = self.ctx.transaction.query(program)?;
        let reads = res.reads().collect();
        self.proof.public_transcript.extend(res.transcript);
        self.ctx.transaction = res.context;
        Ok(reads)
    }

    fn read(&mut self, field: Field, cached: bool) -> Result<Value> {
        let op = Op::Read {
            path: field.path(),
            cached,
        };
        self.query(&[op])?
            .pop()
            .ok_or_else(|| LedgerError::NotACell(field.path()).into())
    }

    fn secret_key<W: Witnesses + ?Sized>(&mut self, witnesses: &W) -> Result<Bytes32> {
        let wctx = WitnessContext {
            ledger: Ledger::project(self.ctx.transaction.state())?,
            private_state: &self.ctx.private_state,
            contract_address: self.ctx.transaction.address(),
        };
        let (next_private, raw) = witnesses.user_secret_key(wctx).map_err(|e| {
            warn!(witness = USER_SECRET_KEY, "witness failed: {}", e);
            Error::Witness {
                name: USER_SECRET_KEY,
                reason: e.to_string(),
            }
        })?;
        let key = Bytes32::try_from(raw.as_slice()).map_err(|_| {
            warn!(witness = USER_SECRET_KEY, len = raw.len(), "witness returned wrong length");
            Error::Witness {
                name: USER_SECRET_KEY,
                reason: format!("expected 32 bytes, got {}", raw.len()),
            }
        })?;
        self.ctx.private_state = next_private;
        self.proof.private_transcript_outputs.push(Value::Bytes(key));
        Ok(key)
    }

    fn finish<T>(mut self, result: T, output: Vec<Value>) -> CircuitResults<T> {
        self.proof.output = output;
        CircuitResults {
            result,
            context: self.ctx,
            proof_data: self.proof,
        }
    }
}

/// record a payment and return its receipt
///
/// aborts with `failed assert: Invalid pricing tier` unless the tier is
/// 0, 1 or 2
pub fn pay_for_vpn<W: Witnesses + ?Sized>(
    witnesses: &W,
    ctx: &CircuitContext,
    pricing_tier: u8,
    region: Bytes32,
) -> Result<CircuitResults<PaymentReceipt>> {
    if PricingTier::from_index(pricing_tier).is_none() {
        warn!(pricing_tier, "rejected payment");
        return Err(Error::Assertion(INVALID_PRICING_TIER));
    }

    let mut inv = Invocation::begin(
        ctx,
        vec![Value::Uint(pricing_tier as u64), Value::Bytes(region)],
    );

    let secret_key = inv.secret_key(witnesses)?;

    let sequence = inv.read(Field::Sequence, true)?.as_uint()?;
    let nullifier = generate_nullifier(
        &secret_key,
        &u64_to_bytes32(sequence),
        &u64_to_bytes32(pricing_tier as u64),
    );

    let receipt = PaymentReceipt {
        nullifier,
        pricing_tier,
        region,
        timestamp: inv.read(Field::Sequence, true)?.as_uint()?,
        provider_commitment: inv.read(Field::ProviderCommitment, false)?.as_bytes()?,
    };

    inv.query(&[
        Op::increment(Field::TotalPayments.path(), 1),
        Op::increment(Field::Sequence.path(), 1),
        Op::increment(Field::NullifierCount.path(), 1),
    ])?;

    info!(sequence, pricing_tier, "payment recorded");

    let output = vec![
        Value::Bytes(receipt.nullifier.0),
        Value::Uint(receipt.pricing_tier as u64),
        Value::Bytes(receipt.region),
        Value::Uint(receipt.timestamp),
        Value::Bytes(receipt.provider_commitment),
    ];
    Ok(inv.finish(receipt, output))
}

/// current nullifier count
///
/// `expected_nullifier` is not looked up: no nullifier set is kept on the
/// ledger, only the aggregate count
// TODO: replace with a membership check once a nullifier set is added to the schema
pub fn verify_payment_exists(
    ctx: &CircuitContext,
    expected_nullifier: Nullifier,
) -> Result<CircuitResults<u64>> {
    let mut inv = Invocation::begin(ctx, vec![Value::Bytes(expected_nullifier.0)]);
    let count = inv.read(Field::NullifierCount, true)?.as_uint()?;
    Ok(inv.finish(count, vec![Value::Uint(count)]))
}

/// overwrite the provider commitment
///
/// no access control here; authorization belongs to whoever submits the call
pub fn update_provider(
    ctx: &CircuitContext,
    provider_commitment: Bytes32,
) -> Result<CircuitResults<()>> {
    let mut inv = Invocation::begin(ctx, vec![Value::Bytes(provider_commitment)]);
    inv.query(&[Op::write(
        Field::ProviderCommitment.path(),
        Value::Bytes(provider_commitment),
    )])?;
    info!("provider commitment updated");
    Ok(inv.finish((), Vec::new()))
}
