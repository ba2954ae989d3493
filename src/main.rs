//! NFT Exchange - Binary Entry Point
//!
//! Loads an exchange configuration (path in the first argument, defaults
//! otherwise) and prints the signing domain and a sample order digest, so
//! off-chain signers can check they hash the same way.

use alloy_primitives::{Address, U256};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nft_exchange::hashing::{self, typehash};
use nft_exchange::signature::BulkTree;
use nft_exchange::types::{Fee, Order, OrderType};
use nft_exchange::{Exchange, ExchangeConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match ExchangeConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!(%path, error = %err, "failed to load config");
                std::process::exit(1);
            }
        },
        None => ExchangeConfig::default(),
    };

    println!("===========================================");
    println!("  NFT Exchange - Settlement Core");
    println!("===========================================");
    println!();

    let exchange = Exchange::new(config);
    println!("Domain:");
    println!("  Name: {}", exchange.config().domain.name);
    println!("  Version: {}", exchange.config().domain.version);
    println!("  Chain ID: {}", exchange.config().domain.chain_id);
    println!("  Separator: {}", exchange.domain_separator());
    println!("  Hash scheme: v{}", typehash::HASH_SCHEME_VERSION);
    println!();

    let order = Order {
        order_type: OrderType::SellSingle,
        maker: Address::with_last_byte(0x01),
        expiry_time: U256::from(2_000_000_000u64),
        erc20_address: Address::with_last_byte(0x02),
        erc20_amount: U256::from(1_000_000u64),
        fees: vec![Fee::new(Address::with_last_byte(0xFE), U256::from(25_000u64))],
        nft_address: Address::with_last_byte(0x03),
        nft_id: U256::from(7),
        nft_amount: U256::from(1),
        ..Default::default()
    };

    println!("Sample order:");
    println!("  Leaf hash: {}", hashing::leaf_hash(&order));
    println!("  Order hash: {}", exchange.order_hash(&order));
    println!();

    let leaves: Vec<_> = (0..3u64)
        .map(|salt| {
            let mut variant = order.clone();
            variant.salt = U256::from(salt);
            hashing::leaf_hash(&variant)
        })
        .collect();
    let tree = BulkTree::new(&leaves);
    println!("Sample bulk tree ({} orders):", tree.leaf_count());
    println!("  Root: {}", tree.root());
    println!("  Proof depth: {}", tree.depth());

    info!("done");
}
