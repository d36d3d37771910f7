//! contract lifecycle and call dispatch
//!
//! ```text
//! initial_state(provider) ──► GenesisResult
//!                                 │ CircuitContext::from_genesis
//!                                 ▼
//!        ┌──────────────► CircuitContext ───────────────┐
//!        │                                               │ invoke(call)
//!        │                                               ▼
//!        └─ results.context ◄──── CircuitResults { result, context, proof_data }
//! ```
//!
//! contexts are values. a call borrows one and returns a new one; keeping or
//! dropping the returned context is how a caller commits or discards.

use tracing::info;

use crate::circuits;
use crate::config::{ContractConfig, TierTerms};
use crate::error::{Error, Result};
use crate::ledger::{Field, Ledger, LedgerState, Value};
use crate::query::{Op, QueryContext};
use crate::transcript::{ProofData, PublicTranscript};
use crate::types::{bytes32, Bytes32, ContractAddress, Nullifier, PaymentReceipt, PricingTier, PrivateState};
use crate::witness::Witnesses;

/// circuit names the contract accepts
pub const PAY_FOR_VPN: &str = "payForVPN";
pub const VERIFY_PAYMENT_EXISTS: &str = "verifyPaymentExists";
pub const UPDATE_PROVIDER: &str = "updateProvider";

pub const OPERATIONS: [&str; 3] = [PAY_FOR_VPN, VERIFY_PAYMENT_EXISTS, UPDATE_PROVIDER];

/// read-only projection of a ledger state
pub fn ledger(state: &LedgerState) -> Result<Ledger> {
    Ok(Ledger::project(state)?)
}

/// on-chain contract state: public data plus the registered operations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractState {
    pub data: LedgerState,
    operations: Vec<&'static str>,
}

impl ContractState {
    fn new(data: LedgerState) -> Self {
        Self {
            data,
            operations: OPERATIONS.to_vec(),
        }
    }

    pub fn operations(&self) -> &[&'static str] {
        &self.operations
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.iter().any(|op| *op == name)
    }
}

/// output of [`Contract::initial_state`]
#[derive(Clone, Debug)]
pub struct GenesisResult {
    pub contract_state: ContractState,
    pub private_state: PrivateState,
    pub address: ContractAddress,
    /// ops the genesis program ran
    pub transcript: PublicTranscript,
}

/// everything a circuit runs against
#[derive(Clone, Debug)]
pub struct CircuitContext {
    /// contract state the invocation chain started from
    pub original_state: ContractState,
    pub private_state: PrivateState,
    pub transaction: QueryContext,
}

impl CircuitContext {
    pub fn new(state: ContractState, private_state: PrivateState, address: ContractAddress) -> Self {
        let transaction = QueryContext::new(state.data.clone(), address);
        Self {
            original_state: state,
            private_state,
            transaction,
        }
    }

    pub fn from_genesis(genesis: &GenesisResult) -> Self {
        Self::new(
            genesis.contract_state.clone(),
            genesis.private_state.clone(),
            genesis.address,
        )
    }

    /// typed view of the current public state
    pub fn ledger(&self) -> Result<Ledger> {
        ledger(self.transaction.state())
    }

    /// contract state with every applied call folded in
    pub fn commit(&self) -> ContractState {
        ContractState {
            data: self.transaction.state().clone(),
            operations: self.original_state.operations.clone(),
        }
    }
}

/// output of a circuit call
#[derive(Clone, Debug)]
pub struct CircuitResults<T> {
    pub result: T,
    pub context: CircuitContext,
    pub proof_data: ProofData,
}

/// a stateful circuit call with typed arguments
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    PayForVpn { pricing_tier: u8, region: Bytes32 },
    VerifyPaymentExists { expected_nullifier: Nullifier },
    UpdateProvider { provider_commitment: Bytes32 },
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::PayForVpn { .. } => PAY_FOR_VPN,
            Call::VerifyPaymentExists { .. } => VERIFY_PAYMENT_EXISTS,
            Call::UpdateProvider { .. } => UPDATE_PROVIDER,
        }
    }

    /// decode a call from its name and raw argument bytes
    ///
    /// `payForVPN` takes a 1-byte tier and a 32-byte region, the other two
    /// a single 32-byte value
    pub fn from_args(name: &str, args: &[&[u8]]) -> Result<Self> {
        let expect = |circuit: &'static str, n: usize| -> Result<()> {
            if args.len() != n {
                return Err(Error::ArgumentCount {
                    circuit,
                    expected: n,
                    found: args.len(),
                });
            }
            Ok(())
        };

        match name {
            PAY_FOR_VPN => {
                expect(PAY_FOR_VPN, 2)?;
                let tier = match args[0] {
                    [t] => *t,
                    other => {
                        return Err(Error::ArgumentLength {
                            argument: "pricingTier",
                            expected: 1,
                            found: other.len(),
                        })
                    }
                };
                Ok(Call::PayForVpn {
                    pricing_tier: tier,
                    region: bytes32("region", args[1])?,
                })
            }
            VERIFY_PAYMENT_EXISTS => {
                expect(VERIFY_PAYMENT_EXISTS, 1)?;
                Ok(Call::VerifyPaymentExists {
                    expected_nullifier: Nullifier(bytes32("expectedNullifier", args[0])?),
                })
            }
            UPDATE_PROVIDER => {
                expect(UPDATE_PROVIDER, 1)?;
                Ok(Call::UpdateProvider {
                    provider_commitment: bytes32("newProviderCommitment", args[0])?,
                })
            }
            other => Err(Error::UnknownCircuit(other.to_string())),
        }
    }
}

/// result of a dispatched call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallOutput {
    Receipt(PaymentReceipt),
    NullifierCount(u64),
    Unit,
}

/// contract instance with its injected witnesses
pub struct Contract<W> {
    witnesses: W,
    config: ContractConfig,
}

impl<W: Witnesses> Contract<W> {
    pub fn new(witnesses: W) -> Self {
        Self::with_config(witnesses, ContractConfig::default())
    }

    pub fn with_config(witnesses: W, config: ContractConfig) -> Self {
        Self { witnesses, config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn witnesses(&self) -> &W {
        &self.witnesses
    }

    /// price and duration of a tier
    pub fn quote(&self, tier: PricingTier) -> TierTerms {
        self.config.tiers.terms(tier)
    }

    /// genesis transition
    ///
    /// starts from zeroed cells, stores the provider, sets the tier count
    /// to 3 and the sequence to 1
    pub fn initial_state(
        &self,
        private_state: PrivateState,
        provider_address: Bytes32,
    ) -> Result<GenesisResult> {
        let address = self.config.contract_address;
        let ctx = QueryContext::new(LedgerState::blank(), address);

        let mut program: Vec<Op> = Field::ALL
            .iter()
            .map(|f| Op::write(f.path(), Value::default_of(f.kind())))
            .collect();
        program.extend([
            Op::write(Field::ProviderCommitment.path(), Value::Bytes(provider_address)),
            Op::increment(Field::PricingTierCount.path(), PricingTier::COUNT),
            Op::increment(Field::Sequence.path(), 1),
        ]);
        let res = ctx.query(&program)?;

        let mut transcript = PublicTranscript::new();
        transcript.extend(res.transcript);

        info!(address = %hex::encode(address.0), "contract initialized");

        Ok(GenesisResult {
            contract_state: ContractState::new(res.context.into_state()),
            private_state,
            address,
            transcript,
        })
    }

    pub fn pay_for_vpn(
        &self,
        ctx: &CircuitContext,
        pricing_tier: u8,
        region: Bytes32,
    ) -> Result<CircuitResults<PaymentReceipt>> {
        circuits::pay_for_vpn(&self.witnesses, ctx, pricing_tier, region)
    }

    pub fn verify_payment_exists(
        &self,
        ctx: &CircuitContext,
        expected_nullifier: Nullifier,
    ) -> Result<CircuitResults<u64>> {
        circuits::verify_payment_exists(ctx, expected_nullifier)
    }

    pub fn update_provider(
        &self,
        ctx: &CircuitContext,
        provider_commitment: Bytes32,
    ) -> Result<CircuitResults<()>> {
        circuits::update_provider(ctx, provider_commitment)
    }

    /// dispatch a call, rejecting names the contract state does not register
    pub fn invoke(&self, ctx: &CircuitContext, call: Call) -> Result<CircuitResults<CallOutput>> {
        if !ctx.original_state.has_operation(call.name()) {
            return Err(Error::UnknownCircuit(call.name().to_string()));
        }
        match call {
            Call::PayForVpn { pricing_tier, region } => {
                let r = self.pay_for_vpn(ctx, pricing_tier, region)?;
                Ok(map_result(r, CallOutput::Receipt))
            }
            Call::VerifyPaymentExists { expected_nullifier } => {
                let r = self.verify_payment_exists(ctx, expected_nullifier)?;
                Ok(map_result(r, CallOutput::NullifierCount))
            }
            Call::UpdateProvider { provider_commitment } => {
                let r = self.update_provider(ctx, provider_commitment)?;
                Ok(map_result(r, |()| CallOutput::Unit))
            }
        }
    }

    /// decode and dispatch a call given by name and raw bytes
    pub fn invoke_raw(
        &self,
        ctx: &CircuitContext,
        name: &str,
        args: &[&[u8]],
    ) -> Result<CircuitResults<CallOutput>> {
        self.invoke(ctx, Call::from_args(name, args)?)
    }
}

fn map_result<T, U>(r: CircuitResults<T>, f: impl FnOnce(T) -> U) -> CircuitResults<U> {
    CircuitResults {
        result: f(r.result),
        context: r.context,
        proof_data: r.proof_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::provider_commitment;
    use crate::witness::SecretKeyWitness;

    fn genesis() -> (Contract<SecretKeyWitness>, GenesisResult) {
        let contract = Contract::new(SecretKeyWitness);
        let g = contract
            .initial_state(PrivateState::new([0u8; 32]), provider_commitment("addr_test1provider123"))
            .unwrap();
        (contract, g)
    }

    #[test]
    fn test_genesis_cells() {
        let (_, g) = genesis();
        let l = ledger(&g.contract_state.data).unwrap();
        assert_eq!(l.sequence, 1);
        assert_eq!(l.total_payments, 0);
        assert_eq!(l.nullifier_count, 0);
        assert_eq!(l.pricing_tier_count, 3);
        assert_eq!(l.provider_commitment, provider_commitment("addr_test1provider123"));
        assert_eq!(g.contract_state.operations(), &OPERATIONS);
        // 5 default writes, provider write, two increments
        assert_eq!(g.transcript.len(), 8);
    }

    #[test]
    fn test_from_args() {
        let region = [1u8; 32];
        assert_eq!(
            Call::from_args(PAY_FOR_VPN, &[&[2u8][..], &region[..]]).unwrap(),
            Call::PayForVpn { pricing_tier: 2, region }
        );
        assert!(matches!(
            Call::from_args(PAY_FOR_VPN, &[&[2u8, 0][..], &region[..]]),
            Err(Error::ArgumentLength { argument: "pricingTier", .. })
        ));
        assert!(matches!(
            Call::from_args(UPDATE_PROVIDER, &[&region[..31]]),
            Err(Error::ArgumentLength { found: 31, .. })
        ));
        assert!(matches!(
            Call::from_args(VERIFY_PAYMENT_EXISTS, &[]),
            Err(Error::ArgumentCount { expected: 1, found: 0, .. })
        ));
        assert!(matches!(
            Call::from_args("mint", &[]),
            Err(Error::UnknownCircuit(name)) if name == "mint"
        ));
    }

    #[test]
    fn test_invoke_threads_context() {
        let (contract, g) = genesis();
        let ctx = CircuitContext::from_genesis(&g);

        let paid = contract
            .invoke(&ctx, Call::PayForVpn { pricing_tier: 0, region: [0u8; 32] })
            .unwrap();
        assert!(matches!(paid.result, CallOutput::Receipt(ref r) if r.timestamp == 1));

        let count = contract
            .invoke_raw(&paid.context, VERIFY_PAYMENT_EXISTS, &[&[0u8; 32][..]])
            .unwrap();
        assert_eq!(count.result, CallOutput::NullifierCount(1));

        // the original context still sees genesis
        assert_eq!(ctx.ledger().unwrap().total_payments, 0);

        let committed = count.context.commit();
        assert_eq!(ledger(&committed.data).unwrap().sequence, 2);
        assert_eq!(committed.operations(), g.contract_state.operations());
    }

    #[test]
    fn test_quote_uses_config() {
        let (contract, _) = genesis();
        assert_eq!(contract.quote(PricingTier::Hour).duration_ms, 3_600_000);
        assert_eq!(contract.quote(PricingTier::Year).price_lovelace, 100_000_000);
    }
}
