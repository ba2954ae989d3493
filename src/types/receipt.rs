//! Fill receipt returned by the settlement entry points.
//!
//! The receipt summarizes one successful fill with a deterministic SSZ
//! encoding so indexers can store and compare receipts byte-for-byte.

use alloy_primitives::{B256, U256};
use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

/// Receipt for one successful fill.
///
/// ## Encoding
///
/// 256-bit quantities are stored as 32-byte big-endian words so the SSZ
/// container stays fixed-size: 8 + 32 * 5 + 8 = 176 bytes.
///
/// ## Example
///
/// ```
/// use alloy_primitives::{B256, U256};
/// use nft_exchange::types::FillReceipt;
///
/// let receipt = FillReceipt::new(
///     1,                          // sequence
///     B256::repeat_byte(0xAB),    // order_hash
///     U256::from(1),              // fill_amount
///     U256::from(100),            // amount_paid
///     U256::from(10),             // fees_paid
///     U256::from(1),              // status_slot
///     1703577600,                 // timestamp
/// );
/// assert_eq!(receipt.amount_paid(), U256::from(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct FillReceipt {
    /// Fill sequence number within this exchange instance
    pub sequence: u64,

    /// Order identity the fill was accounted against
    pub order_hash: [u8; 32],

    /// Units moved by this fill
    pub fill_amount: [u8; 32],

    /// Total payment for this fill, fees included
    pub amount_paid: [u8; 32],

    /// Portion of `amount_paid` routed to fee recipients
    pub fees_paid: [u8; 32],

    /// Packed status slot after the fill
    pub status_slot: [u8; 32],

    /// Block time of the fill in seconds
    pub timestamp: u64,
}

impl FillReceipt {
    pub fn new(
        sequence: u64,
        order_hash: B256,
        fill_amount: U256,
        amount_paid: U256,
        fees_paid: U256,
        status_slot: U256,
        timestamp: u64,
    ) -> Self {
        Self {
            sequence,
            order_hash: order_hash.0,
            fill_amount: fill_amount.to_be_bytes(),
            amount_paid: amount_paid.to_be_bytes(),
            fees_paid: fees_paid.to_be_bytes(),
            status_slot: status_slot.to_be_bytes(),
            timestamp,
        }
    }

    pub fn order_hash(&self) -> B256 {
        B256::from(self.order_hash)
    }

    pub fn fill_amount(&self) -> U256 {
        U256::from_be_bytes(self.fill_amount)
    }

    pub fn amount_paid(&self) -> U256 {
        U256::from_be_bytes(self.amount_paid)
    }

    pub fn fees_paid(&self) -> U256 {
        U256::from_be_bytes(self.fees_paid)
    }

    pub fn status_slot(&self) -> U256 {
        U256::from_be_bytes(self.status_slot)
    }

    /// SHA-256 over the SSZ encoding
    pub fn digest(&self) -> [u8; 32] {
        // Fixed-size container: serialization cannot fail
        let bytes = ssz_rs::serialize(self).unwrap_or_default();
        compute_hash(&bytes)
    }

    /// Get the order hash as a hex string
    pub fn order_hash_hex(&self) -> String {
        hex::encode(self.order_hash)
    }
}

/// Compute SHA-256 hash of the given data
pub fn compute_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

// ============================================================================
// Unit Tests
// ============================================================================
