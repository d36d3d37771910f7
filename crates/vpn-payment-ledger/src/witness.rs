//! witness interface
//!
//! a witness is the caller's pluggable source of private circuit inputs.
//! it sees the public ledger and the caller's private state, returns a value
//! and a (possibly updated) private state, and never touches the ledger.
//!
//! implementations:
//! - [`SecretKeyWitness`]: hands out the key stored in the private state
//! - anything else the caller injects at [`Contract::new`](crate::Contract::new)

use crate::error::WitnessError;
use crate::ledger::Ledger;
use crate::types::{ContractAddress, PrivateState};

/// name of the secret key witness, used in errors and logs
pub const USER_SECRET_KEY: &str = "userSecretKey";

/// what a witness can observe
#[derive(Clone, Debug)]
pub struct WitnessContext<'a> {
    /// public ledger as of the call
    pub ledger: Ledger,
    pub private_state: &'a PrivateState,
    pub contract_address: ContractAddress,
}

/// pluggable source of private inputs
///
/// the returned bytes are checked by the executor; anything other than
/// exactly 32 bytes aborts the invocation
pub trait Witnesses: Send + Sync {
    /// the caller's secret key for nullifier derivation
    fn user_secret_key(
        &self,
        ctx: WitnessContext<'_>,
    ) -> Result<(PrivateState, Vec<u8>), WitnessError>;
}

/// default witness: returns the key held in private state, state unchanged
#[derive(Clone, Copy, Debug, Default)]
pub struct SecretKeyWitness;

impl Witnesses for SecretKeyWitness {
    fn user_secret_key(
        &self,
        ctx: WitnessContext<'_>,
    ) -> Result<(PrivateState, Vec<u8>), WitnessError> {
        Ok((ctx.private_state.clone(), ctx.private_state.secret_key.to_vec()))
    }
}

impl<W: Witnesses + ?Sized> Witnesses for Box<W> {
    fn user_secret_key(
        &self,
        ctx: WitnessContext<'_>,
    ) -> Result<(PrivateState, Vec<u8>), WitnessError> {
        (**self).user_secret_key(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerState;

    #[test]
    fn test_secret_key_witness() {
        let private = PrivateState::new([5u8; 32]).with_pending_amount(10);
        let ctx = WitnessContext {
            ledger: Ledger::project(&LedgerState::blank()).unwrap(),
            private_state: &private,
            contract_address: ContractAddress::dummy(),
        };
        let (next, key) = SecretKeyWitness.user_secret_key(ctx).unwrap();
        assert_eq!(next, private);
        assert_eq!(key, vec![5u8; 32]);
    }

    #[test]
    fn test_boxed_witness() {
        let boxed: Box<dyn Witnesses> = Box::new(SecretKeyWitness);
        let private = PrivateState::new([1u8; 32]);
        let ctx = WitnessContext {
            ledger: Ledger::project(&LedgerState::blank()).unwrap(),
            private_state: &private,
            contract_address: ContractAddress::dummy(),
        };
        assert_eq!(boxed.user_secret_key(ctx).unwrap().1.len(), 32);
    }
}
