//! circuit throughput
//!
//! Run with: cargo bench -p vpn-payment-ledger

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vpn_payment_ledger::{
    generate_nullifier, provider_commitment, region_to_bytes, u64_to_bytes32, CircuitContext,
    Contract, PrivateState, SecretKeyWitness,
};

fn bench_nullifier(c: &mut Criterion) {
    let key = [0x42u8; 32];
    let tier = u64_to_bytes32(1);
    c.bench_function("generate_nullifier", |b| {
        b.iter(|| generate_nullifier(black_box(&key), black_box(&u64_to_bytes32(7)), &tier))
    });
}

fn bench_pay_for_vpn(c: &mut Criterion) {
    let contract = Contract::new(SecretKeyWitness);
    let genesis = contract
        .initial_state(PrivateState::new([0x42u8; 32]), provider_commitment("addr_test1provider123"))
        .unwrap();
    let ctx = CircuitContext::from_genesis(&genesis);
    let region = region_to_bytes("us-east");

    c.bench_function("pay_for_vpn", |b| {
        b.iter(|| contract.pay_for_vpn(black_box(&ctx), 1, region).unwrap())
    });

    let paid = contract.pay_for_vpn(&ctx, 1, region).unwrap();
    c.bench_function("proof_digest", |b| {
        b.iter(|| black_box(&paid.proof_data.public_transcript).digest())
    });
}

criterion_group!(benches, bench_nullifier, bench_pay_for_vpn);
criterion_main!(benches);
