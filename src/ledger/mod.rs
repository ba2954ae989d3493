//! Fill-status ledger.
//!
//! Owns every per-order [`OrderStatus`] and every maker counter. All writes go
//! through a journal of previous values, so the exchange can take a
//! checkpoint before a call and roll the ledger back to it if the call fails.
//!
//! ## Commit rules
//!
//! - A cancelled order never accepts another fill.
//! - A first fill that takes the whole quantity is written directly.
//! - Any other fill accumulates; a total above `nft_amount` is an overfill
//!   and leaves the status untouched.
//! - Cancelling is idempotent and keeps the recorded filled amount.

use std::collections::HashMap;

use alloy_primitives::{Address, B256, U256};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{ExchangeError, Result};
use crate::types::OrderStatus;

/// Previous value of one written slot
#[derive(Debug, Clone, Copy)]
enum JournalEntry {
    Status {
        order_hash: B256,
        previous: Option<OrderStatus>,
    },
    Counter {
        maker: Address,
        previous: Option<U256>,
    },
}

/// Position in the journal to roll back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Per-order status and per-maker counter storage
#[derive(Debug, Default)]
pub struct Ledger {
    statuses: HashMap<B256, OrderStatus>,
    counters: HashMap<Address, U256>,
    journal: Vec<JournalEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Status of `order_hash`; unknown orders are open with nothing filled
    pub fn status(&self, order_hash: &B256) -> OrderStatus {
        self.statuses.get(order_hash).copied().unwrap_or_default()
    }

    pub fn counter(&self, maker: &Address) -> U256 {
        self.counters.get(maker).copied().unwrap_or_default()
    }

    /// Number of orders with a recorded status
    #[inline]
    pub fn order_count(&self) -> usize {
        self.statuses.len()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Record a fill of `fill_amount` out of `nft_amount` total units.
    ///
    /// # Errors
    ///
    /// - `OrderCancelled` if the order was cancelled
    /// - `OverfillAttempt` if the accumulated amount would exceed `nft_amount`
    pub fn commit(&mut self, order_hash: B256, nft_amount: U256, fill_amount: U256) -> Result<OrderStatus> {
        let status = self.status(&order_hash);
        if status.is_cancelled {
            return Err(ExchangeError::OrderCancelled(order_hash));
        }

        let filled_amount = if status.filled_amount.is_zero() && fill_amount == nft_amount {
            fill_amount
        } else {
            status
                .filled_amount
                .checked_add(fill_amount)
                .filter(|total| *total <= nft_amount)
                .ok_or(ExchangeError::OverfillAttempt {
                    order_hash,
                    filled: status.filled_amount,
                    requested: fill_amount,
                    total: nft_amount,
                })?
        };

        let updated = OrderStatus {
            is_cancelled: false,
            filled_amount,
        };
        self.write_status(order_hash, updated);
        debug!(%order_hash, %fill_amount, %filled_amount, %nft_amount, "fill committed");
        Ok(updated)
    }

    /// Mark `order_hash` cancelled; returns `false` if it already was
    pub fn cancel(&mut self, order_hash: B256) -> bool {
        let status = self.status(&order_hash);
        if status.is_cancelled {
            return false;
        }
        self.write_status(
            order_hash,
            OrderStatus {
                is_cancelled: true,
                ..status
            },
        );
        debug!(%order_hash, filled = %status.filled_amount, "order cancelled");
        true
    }

    /// Bump `maker`'s counter by one and return the new value
    pub fn increment_counter(&mut self, maker: Address) -> Result<U256> {
        let previous = self.counters.get(&maker).copied();
        let next = previous
            .unwrap_or_default()
            .checked_add(U256::from(1))
            .ok_or(ExchangeError::MalformedInput("counter overflow"))?;
        self.journal.push(JournalEntry::Counter { maker, previous });
        self.counters.insert(maker, next);
        debug!(%maker, counter = %next, "counter incremented");
        Ok(next)
    }

    fn write_status(&mut self, order_hash: B256, status: OrderStatus) {
        let previous = self.statuses.insert(order_hash, status);
        self.journal.push(JournalEntry::Status { order_hash, previous });
    }

    // ========================================================================
    // Journal
    // ========================================================================

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.journal.len())
    }

    /// Undo every write made since `checkpoint`
    pub fn revert_to(&mut self, checkpoint: Checkpoint) {
        let undone = self.journal.split_off(checkpoint.0.min(self.journal.len()));
        let count = undone.len();
        for entry in undone.into_iter().rev() {
            match entry {
                JournalEntry::Status { order_hash, previous } => match previous {
                    Some(status) => {
                        self.statuses.insert(order_hash, status);
                    }
                    None => {
                        self.statuses.remove(&order_hash);
                    }
                },
                JournalEntry::Counter { maker, previous } => match previous {
                    Some(counter) => {
                        self.counters.insert(maker, counter);
                    }
                    None => {
                        self.counters.remove(&maker);
                    }
                },
            }
        }
        debug!(undone = count, "ledger reverted");
    }

    /// Drop undo history once a call has committed
    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    // ========================================================================
    // State root
    // ========================================================================

    /// SHA-256 over every status slot, then every counter, each in key order.
    ///
    /// # Errors
    ///
    /// `MalformedInput` if a status cannot be packed into a slot word.
    pub fn state_root(&self) -> Result<B256> {
        let mut hasher = Sha256::new();

        let mut statuses: Vec<_> = self.statuses.iter().collect();
        statuses.sort_unstable_by_key(|(hash, _)| **hash);
        for (order_hash, status) in statuses {
            hasher.update(order_hash);
            hasher.update(status.encode()?.to_be_bytes::<32>());
        }

        let mut counters: Vec<_> = self.counters.iter().collect();
        counters.sort_unstable_by_key(|(maker, _)| **maker);
        for (maker, counter) in counters {
            hasher.update(maker);
            hasher.update(counter.to_be_bytes::<32>());
        }

        Ok(B256::from_slice(&hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> B256 {
        B256::repeat_byte(byte)
    }

    #[test]
    fn test_unknown_order_is_open() {
        let ledger = Ledger::new();
        assert_eq!(ledger.status(&hash(1)), OrderStatus::default());
        assert_eq!(ledger.counter(&Address::with_last_byte(1)), U256::ZERO);
    }

    #[test]
    fn test_complete_first_fill() {
        let mut ledger = Ledger::new();
        let status = ledger.commit(hash(1), U256::from(3), U256::from(3)).unwrap();
        assert_eq!(status.filled_amount, U256::from(3));

        let err = ledger.commit(hash(1), U256::from(3), U256::from(1)).unwrap_err();
        assert_eq!(
            err,
            ExchangeError::OverfillAttempt {
                order_hash: hash(1),
                filled: U256::from(3),
                requested: U256::from(1),
                total: U256::from(3),
            }
        );
    }

    #[test]
    fn test_partial_fills_accumulate() {
        let mut ledger = Ledger::new();
        let total = U256::from(10);
        ledger.commit(hash(1), total, U256::from(4)).unwrap();
        ledger.commit(hash(1), total, U256::from(5)).unwrap();

        assert!(matches!(
            ledger.commit(hash(1), total, U256::from(2)),
            Err(ExchangeError::OverfillAttempt { .. })
        ));
        assert_eq!(ledger.status(&hash(1)).filled_amount, U256::from(9));

        ledger.commit(hash(1), total, U256::from(1)).unwrap();
        assert_eq!(ledger.status(&hash(1)).filled_amount, total);
    }

    #[test]
    fn test_overflowing_fill_is_overfill() {
        let mut ledger = Ledger::new();
        ledger.commit(hash(1), U256::MAX, U256::from(1)).unwrap();
        assert!(matches!(
            ledger.commit(hash(1), U256::MAX, U256::MAX),
            Err(ExchangeError::OverfillAttempt { .. })
        ));
    }

    #[test]
    fn test_cancel_is_final_and_keeps_filled() {
        let mut ledger = Ledger::new();
        ledger.commit(hash(1), U256::from(10), U256::from(4)).unwrap();

        assert!(ledger.cancel(hash(1)));
        assert!(!ledger.cancel(hash(1)));

        let status = ledger.status(&hash(1));
        assert!(status.is_cancelled);
        assert_eq!(status.filled_amount, U256::from(4));

        assert_eq!(
            ledger.commit(hash(1), U256::from(10), U256::from(1)),
            Err(ExchangeError::OrderCancelled(hash(1)))
        );
    }

    #[test]
    fn test_counter_increments_by_one() {
        let mut ledger = Ledger::new();
        let maker = Address::with_last_byte(1);
        assert_eq!(ledger.increment_counter(maker), Ok(U256::from(1)));
        assert_eq!(ledger.increment_counter(maker), Ok(U256::from(2)));
        assert_eq!(ledger.counter(&maker), U256::from(2));
        assert_eq!(ledger.counter(&Address::with_last_byte(2)), U256::ZERO);
    }

    #[test]
    fn test_revert_restores_checkpoint() {
        let mut ledger = Ledger::new();
        let maker = Address::with_last_byte(1);
        ledger.commit(hash(1), U256::from(10), U256::from(2)).unwrap();
        ledger.increment_counter(maker).unwrap();
        let root_before = ledger.state_root().unwrap();

        let checkpoint = ledger.checkpoint();
        ledger.commit(hash(1), U256::from(10), U256::from(3)).unwrap();
        ledger.commit(hash(2), U256::from(1), U256::from(1)).unwrap();
        ledger.cancel(hash(1));
        ledger.increment_counter(maker).unwrap();
        ledger.increment_counter(Address::with_last_byte(2)).unwrap();

        ledger.revert_to(checkpoint);
        assert_eq!(ledger.status(&hash(1)).filled_amount, U256::from(2));
        assert!(!ledger.status(&hash(1)).is_cancelled);
        assert_eq!(ledger.order_count(), 1);
        assert_eq!(ledger.counter(&maker), U256::from(1));
        assert_eq!(ledger.counter(&Address::with_last_byte(2)), U256::ZERO);
        assert_eq!(ledger.state_root().unwrap(), root_before);
    }

    #[test]
    fn test_state_root_tracks_changes() {
        let mut ledger = Ledger::new();
        let empty = ledger.state_root().unwrap();

        ledger.commit(hash(1), U256::from(2), U256::from(1)).unwrap();
        let one_fill = ledger.state_root().unwrap();
        assert_ne!(empty, one_fill);

        ledger.cancel(hash(1));
        assert_ne!(ledger.state_root().unwrap(), one_fill);
    }

    #[test]
    fn test_state_root_independent_of_insertion_order() {
        let mut a = Ledger::new();
        let mut b = Ledger::new();
        for byte in 1..=5u8 {
            a.commit(hash(byte), U256::from(1), U256::from(1)).unwrap();
            b.commit(hash(6 - byte), U256::from(1), U256::from(1)).unwrap();
        }
        assert_eq!(a.state_root().unwrap(), b.state_root().unwrap());
    }
}
