//! Randomized fill sequences against a reference model.
//!
//! These tests verify:
//! 1. Filled amounts never exceed an order's quantity
//! 2. Cancelled orders never fill again
//! 3. Payment tokens are conserved across every fill
//! 4. Determinism: the same seed yields the same state root
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

mod common;

use std::collections::HashMap;
use std::time::Instant;

use alloy_primitives::{Address, B256, U256};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use common::*;
use nft_exchange::{Exchange, ExchangeError, Fee, FillParams, Order};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Orders per run
const ORDER_COUNT: usize = 200;

/// Fill/cancel attempts per run
const OPERATION_COUNT: usize = 3_000;

/// Distinct ERC1155 token ids the orders draw from
const TOKEN_IDS: u64 = 5;

const INITIAL_BALANCE: u64 = 1_000_000_000_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Generate deterministic multi-unit listings.
///
/// Uses a seeded RNG for reproducibility. Same seed = same orders.
fn generate_orders(rng: &mut ChaCha8Rng, count: usize) -> Vec<Order> {
    (0..count)
        .map(|i| {
            let nft_amount: u64 = rng.gen_range(1..=20);
            let price: u64 = rng.gen_range(1..=1_000_000);
            let fee: u64 = rng.gen_range(0..=price / 10);
            Order {
                salt: U256::from(i),
                erc20_amount: U256::from(price),
                fees: vec![Fee::new(FEE_RECIPIENT, U256::from(fee))],
                nft_id: U256::from(rng.gen_range(1..=TOKEN_IDS)),
                nft_amount: U256::from(nft_amount),
                ..sell_multi_order()
            }
        })
        .collect()
}

/// Reference model of one order
#[derive(Debug, Clone, Copy, Default)]
struct Expected {
    filled: u64,
    cancelled: bool,
}

struct Outcome {
    state_root: B256,
    fills: usize,
    rejected: usize,
}

/// Run a deterministic operation sequence, checking every result against
/// the model; returns the final state root.
fn run_sequence(seed: u64) -> Outcome {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let orders = generate_orders(&mut rng, ORDER_COUNT);

    let mut exchange = exchange();
    let mut host = MockHost::new();
    host.mint_erc20(TAKER, INITIAL_BALANCE);
    for id in 1..=TOKEN_IDS {
        host.mint_erc1155(MAKER, id, 1_000_000);
    }

    let signatures: Vec<_> = orders.iter().map(|order| sign_order(&exchange, order)).collect();
    let mut model: HashMap<usize, Expected> = HashMap::new();
    let mut fills = 0;
    let mut rejected = 0;

    for _ in 0..OPERATION_COUNT {
        let index = rng.gen_range(0..orders.len());
        let order = &orders[index];
        let expected = model.entry(index).or_default();
        let total: u64 = order.nft_amount.to();

        if rng.gen_bool(0.05) {
            exchange.cancel_orders(ctx(MAKER), std::slice::from_ref(order)).unwrap();
            expected.cancelled = true;
            continue;
        }

        let fill_amount: u64 = rng.gen_range(1..=total);
        let params = FillParams {
            fill_id: order.nft_id,
            fill_amount: U256::from(fill_amount),
            signature: signatures[index].clone(),
            ..Default::default()
        };
        let result = exchange.fill_order(&mut host, ctx(TAKER), order, &params);

        if expected.cancelled {
            assert!(matches!(result, Err(ExchangeError::OrderCancelled(_))));
            rejected += 1;
        } else if expected.filled + fill_amount > total {
            assert!(matches!(result, Err(ExchangeError::OverfillAttempt { .. })));
            rejected += 1;
        } else {
            let receipt = result.unwrap();
            let price: u64 = order.erc20_amount.to();
            assert_eq!(receipt.amount_paid(), U256::from(price * fill_amount / total));
            expected.filled += fill_amount;
            fills += 1;
        }
    }

    verify_model(&exchange, &orders, &model);
    verify_conservation(&host);

    Outcome {
        state_root: exchange.state_root().unwrap(),
        fills,
        rejected,
    }
}

fn verify_model(exchange: &Exchange, orders: &[Order], model: &HashMap<usize, Expected>) {
    for (index, expected) in model {
        let status = exchange.order_status(&exchange.order_hash(&orders[*index]));
        assert_eq!(status.filled_amount, U256::from(expected.filled));
        assert_eq!(status.is_cancelled, expected.cancelled);
        assert!(status.filled_amount <= orders[*index].nft_amount);
    }
}

fn verify_conservation(host: &MockHost) {
    let parties: [Address; 3] = [TAKER, MAKER, FEE_RECIPIENT];
    let total = parties
        .iter()
        .fold(U256::ZERO, |sum, party| sum + host.balance(*party));
    assert_eq!(total, U256::from(INITIAL_BALANCE));
}

// ============================================================================
// STRESS TESTS
// ============================================================================

#[test]
fn stress_random_fill_sequences() {
    println!("\n=== STRESS TEST: Random Fill Sequences ===\n");

    for seed in [1u64, 7, 42] {
        let start = Instant::now();
        let outcome = run_sequence(seed);
        println!(
            "  seed {:>2}: {} fills, {} rejected in {:.2?}",
            seed,
            outcome.fills,
            outcome.rejected,
            start.elapsed()
        );
        assert!(outcome.fills > 0);
        assert!(outcome.rejected > 0);
    }
}

#[test]
fn verify_determinism() {
    let first = run_sequence(42);
    let second = run_sequence(42);
    assert_eq!(first.state_root, second.state_root);
    assert_eq!(first.fills, second.fills);

    let other = run_sequence(43);
    assert_ne!(first.state_root, other.state_root);
}
