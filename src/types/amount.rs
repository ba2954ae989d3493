//! Proportional amount arithmetic.
//!
//! ## Overview
//!
//! Prices and fees are quoted for the whole order (`nft_amount` units). A
//! partial fill of `fill_amount` units pays
//!
//! ```text
//! amount * fill_amount / nft_amount
//! ```
//!
//! rounded down. The product is computed in 256 bits when it fits and in 512
//! bits otherwise, so the only rounding error is the final integer division.
//!
//! ## Examples
//!
//! ```
//! use alloy_primitives::U256;
//! use nft_exchange::types::amount::proportional;
//!
//! let price = proportional(U256::from(100), U256::from(3), U256::from(10)).unwrap();
//! assert_eq!(price, U256::from(30));
//!
//! // Overflowing product still divides exactly
//! let price = proportional(U256::MAX, U256::from(2), U256::from(4)).unwrap();
//! assert_eq!(price, U256::MAX / U256::from(2));
//! ```

use alloy_primitives::{U256, U512};

use crate::error::{ExchangeError, Result};

/// `amount * numerator / denominator`, rounded down, without intermediate
/// overflow
///
/// # Errors
///
/// `MalformedInput` if the denominator is zero or the quotient does not fit
/// in 256 bits (only possible when `numerator > denominator`).
pub fn proportional(amount: U256, numerator: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(ExchangeError::MalformedInput("zero denominator"));
    }

    if let Some(product) = amount.checked_mul(numerator) {
        return Ok(product / denominator);
    }

    let wide: U512 = amount.widening_mul(numerator);
    let quotient = wide / U512::from(denominator);
    narrow(quotient).ok_or(ExchangeError::MalformedInput("proportional amount overflows"))
}

/// Checked sum of a sequence of amounts
pub fn checked_sum<'a>(amounts: impl IntoIterator<Item = &'a U256>) -> Option<U256> {
    amounts
        .into_iter()
        .try_fold(U256::ZERO, |acc, amount| acc.checked_add(*amount))
}

fn narrow(value: U512) -> Option<U256> {
    let bytes = value.to_be_bytes::<64>();
    let (high, low) = bytes.split_at(32);
    if high.iter().any(|byte| *byte != 0) {
        return None;
    }
    Some(U256::from_be_slice(low))
}

// ============================================================================
// Unit Tests
// ============================================================================
