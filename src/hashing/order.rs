//! Structural hashes of orders and their sub-structures.

use alloy_primitives::{Address, Keccak256, B256, U256};

use super::typehash::{ASSET_TYPEHASH, FEE_TYPEHASH, ORDER_TYPEHASH};
use crate::types::{DirectSellOrder, Fee, Order, OrderType};

/// Keccak-256 over a sequence of 32-byte ABI words
struct WordHasher(Keccak256);

impl WordHasher {
    fn new(typehash: B256) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(typehash);
        Self(hasher)
    }

    fn word(mut self, word: B256) -> Self {
        self.0.update(word);
        self
    }

    fn uint(mut self, value: U256) -> Self {
        self.0.update(value.to_be_bytes::<32>());
        self
    }

    fn address(mut self, address: Address) -> Self {
        self.0.update(address.into_word());
        self
    }

    fn finish(self) -> B256 {
        self.0.finalize()
    }
}

pub fn fee_hash(fee: &Fee) -> B256 {
    WordHasher::new(*FEE_TYPEHASH)
        .address(fee.recipient)
        .uint(fee.amount)
        .finish()
}

/// Hash of a fee list, terminated by its length
pub fn fee_list_hash<'a>(fees: impl IntoIterator<Item = &'a Fee>) -> B256 {
    let mut hasher = Keccak256::new();
    let mut count: u64 = 0;
    for fee in fees {
        hasher.update(fee_hash(fee));
        count += 1;
    }
    hasher.update(U256::from(count).to_be_bytes::<32>());
    hasher.finalize()
}

pub fn asset_hash(nft_address: Address, nft_id: U256, nft_amount: U256) -> B256 {
    WordHasher::new(*ASSET_TYPEHASH)
        .address(nft_address)
        .uint(nft_id)
        .uint(nft_amount)
        .finish()
}

/// Pre-domain structural hash of an order (the merkle leaf)
pub fn leaf_hash(order: &Order) -> B256 {
    WordHasher::new(*ORDER_TYPEHASH)
        .uint(U256::from(order.order_type.to_u8()))
        .address(order.maker)
        .address(order.taker)
        .uint(order.listing_time)
        .uint(order.expiry_time)
        .uint(order.salt)
        .address(order.erc20_address)
        .uint(order.erc20_amount)
        .word(fee_list_hash(&order.fees))
        .word(asset_hash(order.nft_address, order.nft_id, order.nft_amount))
        .address(order.order_validator)
        .uint(order.counter)
        .finish()
}

/// Leaf hash of a direct-sell order.
///
/// Fills in the implicit fields directly instead of building the projected
/// [`Order`]; the result equals `leaf_hash(&order.to_order())`.
pub fn direct_sell_leaf_hash(order: &DirectSellOrder) -> B256 {
    WordHasher::new(*ORDER_TYPEHASH)
        .uint(U256::from(OrderType::SellSingle.to_u8()))
        .address(order.maker)
        .address(Address::ZERO)
        .uint(order.listing_time)
        .uint(order.expiry_time)
        .uint(order.salt)
        .address(order.erc20_address)
        .uint(order.erc20_amount)
        .word(fee_list_hash(order.occupied_fees()))
        .word(asset_hash(order.nft_address, order.nft_id, U256::from(1)))
        .address(Address::ZERO)
        .uint(order.counter)
        .finish()
}
