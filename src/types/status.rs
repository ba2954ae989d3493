//! Per-order fill/cancel record.
//!
//! ## Slot encoding
//!
//! In memory the status is two plain fields. For state roots and receipts it
//! is packed into a single 256-bit slot word: the cancel flag is bit 255 and
//! the filled amount occupies the low 255 bits, so the two never alias.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::{ExchangeError, Result};

/// Fill/cancel state of one order identity.
///
/// `filled_amount` never decreases and never exceeds the order's
/// `nft_amount`; once `is_cancelled` is set it stays set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderStatus {
    pub is_cancelled: bool,
    pub filled_amount: U256,
}

/// Lifecycle phase derived from a status and the order's total quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPhase {
    Open,
    PartiallyFilled,
    Filled,
    Cancelled,
}

impl OrderStatus {
    const CANCEL_BIT: usize = 255;

    /// Pack into one slot word
    ///
    /// # Errors
    ///
    /// `MalformedInput` if the amount reaches into the cancel bit.
    pub fn encode(&self) -> Result<U256> {
        if self.filled_amount.bit(Self::CANCEL_BIT) {
            return Err(ExchangeError::MalformedInput("filled amount exceeds slot range"));
        }
        let mut word = self.filled_amount;
        word.set_bit(Self::CANCEL_BIT, self.is_cancelled);
        Ok(word)
    }

    /// Unpack a slot word produced by [`OrderStatus::encode`]
    pub fn decode(word: U256) -> Self {
        let is_cancelled = word.bit(Self::CANCEL_BIT);
        let mut filled_amount = word;
        filled_amount.set_bit(Self::CANCEL_BIT, false);
        Self {
            is_cancelled,
            filled_amount,
        }
    }

    /// Phase of an order with `nft_amount` total units
    pub fn phase(&self, nft_amount: U256) -> OrderPhase {
        if self.is_cancelled {
            OrderPhase::Cancelled
        } else if self.filled_amount.is_zero() {
            OrderPhase::Open
        } else if self.filled_amount < nft_amount {
            OrderPhase::PartiallyFilled
        } else {
            OrderPhase::Filled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_slot_encoding() {
        let status = OrderStatus {
            is_cancelled: true,
            filled_amount: U256::from(42),
        };
        let word = status.encode().unwrap();
        assert!(word.bit(255));
        assert_eq!(OrderStatus::decode(word), status);

        let open = OrderStatus::default();
        assert_eq!(open.encode().unwrap(), U256::ZERO);
    }

    #[test]
    fn test_status_flag_does_not_alias_amount() {
        let max_amount = U256::MAX >> 1;
        let status = OrderStatus {
            is_cancelled: false,
            filled_amount: max_amount,
        };
        let decoded = OrderStatus::decode(status.encode().unwrap());
        assert!(!decoded.is_cancelled);
        assert_eq!(decoded.filled_amount, max_amount);

        let too_large = OrderStatus {
            is_cancelled: false,
            filled_amount: U256::MAX,
        };
        assert!(too_large.encode().is_err());
    }

    #[test]
    fn test_status_phase() {
        let total = U256::from(10);
        let mut status = OrderStatus::default();
        assert_eq!(status.phase(total), OrderPhase::Open);

        status.filled_amount = U256::from(4);
        assert_eq!(status.phase(total), OrderPhase::PartiallyFilled);

        status.filled_amount = total;
        assert_eq!(status.phase(total), OrderPhase::Filled);

        status.is_cancelled = true;
        assert_eq!(status.phase(total), OrderPhase::Cancelled);
        assert_eq!(status.filled_amount, total);
    }
}
