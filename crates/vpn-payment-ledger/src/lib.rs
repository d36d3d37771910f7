//! vpn payment ledger
//!
//! confidential ledger transitions for anonymous, replay-proof vpn payments.
//! a payer proves knowledge of a secret key through a private witness and
//! derives a one-time nullifier from it; the ledger keeps the nullifier count
//! and aggregate counters but never sees the key.
//!
//! # architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     CONTRACT INSTANCE                     │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  public ledger (5 cells)          private state (caller) │
//! │  ├─ providerCommitment            ├─ secretKey           │
//! │  ├─ pricingTierCount = 3          └─ pendingPaymentAmount│
//! │  ├─ totalPayments                                        │
//! │  ├─ nullifierCount                witnesses (injected)   │
//! │  └─ sequence                      └─ userSecretKey       │
//! │                                                          │
//! │  circuits                                                │
//! │  ├─ payForVPN(tier, region) -> receipt                   │
//! │  ├─ verifyPaymentExists(nullifier) -> count              │
//! │  └─ updateProvider(commitment)                           │
//! │                                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! each call borrows a [`CircuitContext`] and returns a new one with the
//! public transcript of every ledger op it ran. proving and verifying those
//! transcripts is left to an external backend.
//!
//! ```rust
//! use vpn_payment_ledger::{
//!     provider_commitment, region_to_bytes, CircuitContext, Contract, PrivateState,
//!     SecretKeyWitness,
//! };
//!
//! let contract = Contract::new(SecretKeyWitness);
//! let genesis = contract
//!     .initial_state(PrivateState::new([0u8; 32]), provider_commitment("addr_test1provider123"))
//!     .unwrap();
//! let ctx = CircuitContext::from_genesis(&genesis);
//!
//! let paid = contract.pay_for_vpn(&ctx, 0, region_to_bytes("us-east")).unwrap();
//! assert_eq!(paid.result.timestamp, 1);
//! assert_eq!(paid.context.ledger().unwrap().sequence, 2);
//! ```

pub mod circuits;
pub mod config;
pub mod contract;
pub mod error;
pub mod export;
pub mod hash;
pub mod ledger;
pub mod query;
pub mod transcript;
pub mod types;
pub mod witness;

pub use circuits::{commitment_hash, generate_nullifier, INVALID_PRICING_TIER};
pub use config::{ContractConfig, TierSchedule, TierTerms};
pub use contract::{
    ledger, Call, CallOutput, CircuitContext, CircuitResults, Contract, ContractState,
    GenesisResult, OPERATIONS, PAY_FOR_VPN, UPDATE_PROVIDER, VERIFY_PAYMENT_EXISTS,
};
pub use error::{Error, LedgerError, Result, WitnessError};
pub use export::SettlementRecord;
pub use hash::{persistent_hash, DomainTag, COMMITMENT_DOMAIN, NULLIFIER_DOMAIN};
pub use ledger::{Field, Key, Ledger, LedgerState, Path, StateValue, Value, ValueKind};
pub use query::{Op, QueryContext, QueryResults};
pub use transcript::{PrivateTranscript, ProofData, PublicTranscript, TranscriptOp};
pub use types::{
    bytes32, provider_commitment, region_to_bytes, u64_to_bytes32, Bytes32, ContractAddress,
    Nullifier, PaymentReceipt, PricingTier, PrivateState,
};
pub use witness::{SecretKeyWitness, WitnessContext, Witnesses, USER_SECRET_KEY};
