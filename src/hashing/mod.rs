//! Typed-hash engine.
//!
//! Computes the domain-separated structural digests that off-chain signers
//! reproduce bit-for-bit.
//!
//! ## Layout
//!
//! ```text
//! fee_hash      = keccak(FEE_TYPEHASH ‖ recipient ‖ amount)
//! fee_list_hash = keccak(fee_hash_0 ‖ … ‖ fee_hash_n-1 ‖ n)
//! asset_hash    = keccak(ASSET_TYPEHASH ‖ nft_address ‖ nft_id ‖ nft_amount)
//! leaf_hash     = keccak(ORDER_TYPEHASH ‖ order_type ‖ maker ‖ taker ‖ listing_time
//!                        ‖ expiry_time ‖ salt ‖ erc20_address ‖ erc20_amount
//!                        ‖ fee_list_hash ‖ asset_hash ‖ order_validator ‖ counter)
//! order_hash    = keccak(0x1901 ‖ domain ‖ keccak(SINGLE_ORDER_TYPEHASH ‖ leaf_hash))
//! ```
//!
//! Bulk and order-root signatures wrap a merkle root the same way with their
//! own message typehash. Whatever authorized a fill, the accounting identity is
//! always the single-order digest of the literal leaf.

mod domain;
mod order;
pub mod typehash;

pub use domain::{Domain, MessageKind};
pub use order::{asset_hash, direct_sell_leaf_hash, fee_hash, fee_list_hash, leaf_hash};

use alloy_primitives::B256;

use crate::types::{DirectSellOrder, Order};

/// Canonical identity of an order under `domain`
pub fn order_hash(domain: &Domain, order: &Order) -> B256 {
    domain.wrap(MessageKind::SingleOrder, leaf_hash(order))
}

/// Canonical identity of a direct-sell order; equal to the identity of its
/// projection onto [`Order`]
pub fn direct_sell_order_hash(domain: &Domain, order: &DirectSellOrder) -> B256 {
    domain.wrap(MessageKind::SingleOrder, direct_sell_leaf_hash(order))
}
