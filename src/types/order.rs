//! Order types for the settlement core.
//!
//! An [`Order`] is an immutable, off-chain-signed trade intent. Its identity is
//! the structural hash of every field (see [`crate::hashing`]), so two orders
//! with identical fields share one fill/cancel record.
//!
//! ## Order type bits
//!
//! | bit | meaning (set) | meaning (clear) |
//! |-----|---------------|-----------------|
//! | 0 | sell | buy |
//! | 1 | multi-unit asset (ERC1155) | single-unit asset (ERC721) |
//! | 2 | contract offer | direct order |
//!
//! Contract offers are always buy side, so raw values 5 and 7 (and anything
//! above 7) are not representable.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;

// ============================================================================
// OrderType enum
// ============================================================================

/// Closed set of valid order types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderType {
    /// Maker buys one specific ERC721 token
    #[default]
    BuySingle,
    /// Maker sells one specific ERC721 token
    SellSingle,
    /// Maker buys units of one specific ERC1155 token
    BuyMulti,
    /// Maker sells units of one specific ERC1155 token
    SellMulti,
    /// Maker buys any ERC721 token of a collection (or of a validator's set)
    ContractOfferSingle,
    /// Maker buys units of any ERC1155 token of a collection
    ContractOfferMulti,
}

impl OrderType {
    const SELL_BIT: u8 = 0b001;
    const MULTI_BIT: u8 = 0b010;
    const CONTRACT_OFFER_BIT: u8 = 0b100;

    /// Raw 3-bit encoding, as hashed
    pub fn to_u8(self) -> u8 {
        match self {
            OrderType::BuySingle => 0,
            OrderType::SellSingle => 1,
            OrderType::BuyMulti => 2,
            OrderType::SellMulti => 3,
            OrderType::ContractOfferSingle => 4,
            OrderType::ContractOfferMulti => 6,
        }
    }

    /// Decode the raw encoding; 5 and anything above 6 are invalid
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderType::BuySingle),
            1 => Some(OrderType::SellSingle),
            2 => Some(OrderType::BuyMulti),
            3 => Some(OrderType::SellMulti),
            4 => Some(OrderType::ContractOfferSingle),
            6 => Some(OrderType::ContractOfferMulti),
            _ => None,
        }
    }

    pub fn is_sell(self) -> bool {
        self.to_u8() & Self::SELL_BIT != 0
    }

    pub fn is_multi_unit(self) -> bool {
        self.to_u8() & Self::MULTI_BIT != 0
    }

    pub fn is_contract_offer(self) -> bool {
        self.to_u8() & Self::CONTRACT_OFFER_BIT != 0
    }
}

impl TryFrom<u8> for OrderType {
    type Error = ExchangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        OrderType::from_u8(value).ok_or(ExchangeError::MalformedInput("invalid order type"))
    }
}

// ============================================================================
// Fee
// ============================================================================

/// One fee entry: `amount` is the fee for the whole order, scaled
/// proportionally on partial fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Fee {
    pub recipient: Address,
    pub amount: U256,
}

impl Fee {
    pub fn new(recipient: Address, amount: U256) -> Self {
        Self { recipient, amount }
    }

    /// An unoccupied fixed fee slot (direct-sell orders only)
    pub fn is_empty_slot(&self) -> bool {
        self.recipient.is_zero() && self.amount.is_zero()
    }
}

// ============================================================================
// Order
// ============================================================================

/// A signed trade intent.
///
/// ## Example
///
/// ```
/// use alloy_primitives::{Address, U256};
/// use nft_exchange::types::{Order, OrderType};
///
/// let order = Order {
///     order_type: OrderType::SellSingle,
///     maker: Address::with_last_byte(1),
///     expiry_time: U256::from(2_000_000_000u64),
///     erc20_address: Address::with_last_byte(2),
///     erc20_amount: U256::from(100),
///     nft_address: Address::with_last_byte(3),
///     nft_id: U256::from(7),
///     nft_amount: U256::from(1),
///     ..Default::default()
/// };
/// assert!(order.order_type.is_sell());
/// assert!(!order.has_taker());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Order {
    pub order_type: OrderType,
    pub maker: Address,
    /// Zero means anyone may take the order
    pub taker: Address,
    /// Inclusive start of the validity window (seconds)
    pub listing_time: U256,
    /// Exclusive end of the validity window (seconds)
    pub expiry_time: U256,
    pub salt: U256,
    pub erc20_address: Address,
    /// Total price for `nft_amount` units
    pub erc20_amount: U256,
    pub fees: Vec<Fee>,
    pub nft_address: Address,
    /// Token id; for contract offers, the merkle root handed to the validator
    pub nft_id: U256,
    pub nft_amount: U256,
    /// Zero means no external policy
    pub order_validator: Address,
    /// Maker counter epoch the order was signed under
    pub counter: U256,
}

impl Order {
    pub fn has_taker(&self) -> bool {
        !self.taker.is_zero()
    }

    pub fn has_validator(&self) -> bool {
        !self.order_validator.is_zero()
    }
}

// ============================================================================
// FillParams
// ============================================================================

/// Per-call fill intent supplied by the taker
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FillParams {
    /// Concrete token id being filled
    pub fill_id: U256,
    /// Units requested (1 for single-unit assets)
    pub fill_amount: U256,
    /// Buyer-side override; zero means the caller
    pub recipient: Address,
    /// Maker signature in the wire format of [`crate::signature::SignatureFormat`]
    pub signature: Bytes,
    /// Opaque bytes forwarded to the order validator
    pub extra_data: Bytes,
}

impl FillParams {
    /// Full single-unit fill of `fill_id`
    pub fn single(fill_id: U256, signature: Bytes) -> Self {
        Self {
            fill_id,
            fill_amount: U256::from(1),
            signature,
            ..Default::default()
        }
    }
}

// ============================================================================
// DirectSellOrder
// ============================================================================

/// Reduced order shape for the direct ERC721 purchase path.
///
/// Taker, validator and contract-offer fields are implicitly zero, the asset
/// is a single ERC721 token, and there are at most two fee slots. The hash of
/// a direct-sell order equals the hash of its [`DirectSellOrder::to_order`]
/// projection, so both paths share one status record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DirectSellOrder {
    pub maker: Address,
    pub listing_time: U256,
    pub expiry_time: U256,
    pub salt: U256,
    pub erc20_address: Address,
    pub erc20_amount: U256,
    /// Unused slots are all-zero
    pub fees: [Fee; 2],
    pub nft_address: Address,
    pub nft_id: U256,
    pub counter: U256,
}

impl DirectSellOrder {
    /// Occupied fee slots, in slot order
    pub fn occupied_fees(&self) -> impl Iterator<Item = &Fee> {
        self.fees.iter().filter(|fee| !fee.is_empty_slot())
    }

    /// Project onto the general order shape
    pub fn to_order(&self) -> Order {
        Order {
            order_type: OrderType::SellSingle,
            maker: self.maker,
            taker: Address::ZERO,
            listing_time: self.listing_time,
            expiry_time: self.expiry_time,
            salt: self.salt,
            erc20_address: self.erc20_address,
            erc20_amount: self.erc20_amount,
            fees: self.occupied_fees().copied().collect(),
            nft_address: self.nft_address,
            nft_id: self.nft_id,
            nft_amount: U256::from(1),
            order_validator: Address::ZERO,
            counter: self.counter,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
