//! shared test harness: threads the circuit context between calls

#![allow(dead_code)]

use rand::RngCore;
use tracing_subscriber::{fmt, EnvFilter};
use vpn_payment_ledger::{
    Bytes32, CircuitContext, Contract, Ledger, Nullifier, PaymentReceipt, PrivateState, Result,
    SecretKeyWitness,
};

pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn random_bytes() -> Bytes32 {
    let mut out = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut out);
    out
}

/// one user session against a fresh contract instance
pub struct Simulator {
    pub contract: Contract<SecretKeyWitness>,
    pub ctx: CircuitContext,
}

impl Simulator {
    pub fn new(secret_key: Bytes32, provider: Bytes32) -> Self {
        init_tracing();
        let contract = Contract::new(SecretKeyWitness);
        let genesis = contract
            .initial_state(PrivateState::new(secret_key), provider)
            .expect("genesis");
        let ctx = CircuitContext::from_genesis(&genesis);
        Self { contract, ctx }
    }

    pub fn ledger(&self) -> Ledger {
        self.ctx.ledger().expect("ledger projection")
    }

    pub fn private_state(&self) -> &PrivateState {
        &self.ctx.private_state
    }

    /// later calls run as a different payer
    pub fn switch_user(&mut self, secret_key: Bytes32) {
        self.ctx.private_state = PrivateState::new(secret_key);
    }

    pub fn set_payment_amount(&mut self, amount: u64) {
        self.ctx.private_state = self.ctx.private_state.clone().with_pending_amount(amount);
    }

    pub fn pay_for_vpn(&mut self, tier: u8, region: Bytes32) -> Result<PaymentReceipt> {
        let res = self.contract.pay_for_vpn(&self.ctx, tier, region)?;
        self.ctx = res.context;
        Ok(res.result)
    }

    pub fn verify_payment_exists(&mut self, nullifier: Nullifier) -> Result<u64> {
        let res = self.contract.verify_payment_exists(&self.ctx, nullifier)?;
        self.ctx = res.context;
        Ok(res.result)
    }

    pub fn update_provider(&mut self, commitment: Bytes32) -> Result<()> {
        let res = self.contract.update_provider(&self.ctx, commitment)?;
        self.ctx = res.context;
        Ok(())
    }
}
