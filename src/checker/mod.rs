//! Order checker.
//!
//! Pure validation of an order and its fill parameters against the current
//! call context and the maker's current counter. Nothing here touches state;
//! a successful check yields the resolved parties and, when the order names a
//! validator, the arguments the validator will be asked to approve.
//!
//! ## Rules (general path)
//!
//! | rule | failure |
//! |------|---------|
//! | `order.counter == maker counter` | `Unauthorized(CounterMismatch)` |
//! | maker, payment token, asset address non-zero | `MalformedInput` |
//! | `listing_time <= now` | `NotStarted` |
//! | `now < expiry_time` | `Expired` |
//! | `0 < nft_amount < 2^255` | `MalformedInput` |
//! | fee recipients non-zero, fee sum <= `erc20_amount` | `MalformedInput` |
//! | single-unit: `fill_amount == 1`; multi-unit: `1 <= fill_amount <= nft_amount` | `MalformedInput` |
//! | contract offer: `nft_id == 0` iff no validator | `MalformedInput` |
//! | direct order: `fill_id == nft_id` | `MalformedInput` |
//! | direct single-unit order: `nft_amount == 1` | `MalformedInput` |
//! | explicit taker equals resolved recipient | `Unauthorized(TakerMismatch)` |
//!
//! The direct-sell path ([`check_direct_sell`]) applies its own reduced rule
//! set: the reduced shape has no taker, validator or partial fills.

use alloy_primitives::{Address, B256, U256};

use crate::error::{AuthFailure, ExchangeError, Result};
use crate::types::amount::checked_sum;
use crate::types::{CallContext, DirectSellOrder, Fee, FillParams, Order};

/// Arguments handed to an order validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorContext {
    pub validator: Address,
    pub asset: Address,
    pub fill_id: U256,
    /// `nft_id` of a contract offer, zero otherwise
    pub merkle_root: B256,
}

/// Outcome of a successful check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedFill {
    pub caller: Address,
    /// `params.recipient` if non-zero, else the caller
    pub recipient: Address,
    /// Present iff the order names a validator
    pub validator: Option<ValidatorContext>,
}

/// Validate a general fill
pub fn check(
    order: &Order,
    params: &FillParams,
    ctx: &CallContext,
    current_counter: U256,
) -> Result<CheckedFill> {
    if order.counter != current_counter {
        return Err(ExchangeError::Unauthorized(AuthFailure::CounterMismatch));
    }
    check_addresses(order.maker, order.erc20_address, order.nft_address)?;
    check_window(order.listing_time, order.expiry_time, ctx)?;

    if order.nft_amount.is_zero() {
        return Err(ExchangeError::MalformedInput("zero nft amount"));
    }
    if order.nft_amount.bit(255) {
        return Err(ExchangeError::MalformedInput("nft amount exceeds slot range"));
    }
    check_fees(&order.fees, order.erc20_amount)?;
    check_fill_amount(order, params.fill_amount)?;

    let order_type = order.order_type;
    let merkle_root = if order_type.is_contract_offer() {
        if !order.has_validator() && !order.nft_id.is_zero() {
            return Err(ExchangeError::MalformedInput("contract offer root requires a validator"));
        }
        if order.has_validator() && order.nft_id.is_zero() {
            return Err(ExchangeError::MalformedInput("contract offer validator requires a root"));
        }
        B256::from(order.nft_id)
    } else {
        if params.fill_id != order.nft_id {
            return Err(ExchangeError::MalformedInput("fill id does not match order"));
        }
        if !order_type.is_multi_unit() && order.nft_amount != U256::from(1) {
            return Err(ExchangeError::MalformedInput("single-unit order must have nft amount 1"));
        }
        B256::ZERO
    };

    let recipient = if params.recipient.is_zero() {
        ctx.caller
    } else {
        params.recipient
    };
    if order.has_taker() && order.taker != recipient {
        return Err(ExchangeError::Unauthorized(AuthFailure::TakerMismatch));
    }

    let validator = order.has_validator().then(|| ValidatorContext {
        validator: order.order_validator,
        asset: order.nft_address,
        fill_id: params.fill_id,
        merkle_root,
    });

    Ok(CheckedFill {
        caller: ctx.caller,
        recipient,
        validator,
    })
}

/// Validate a direct ERC721 purchase; the buyer is always the caller
pub fn check_direct_sell(
    order: &DirectSellOrder,
    ctx: &CallContext,
    current_counter: U256,
) -> Result<Address> {
    if order.counter != current_counter {
        return Err(ExchangeError::Unauthorized(AuthFailure::CounterMismatch));
    }
    check_addresses(order.maker, order.erc20_address, order.nft_address)?;
    check_window(order.listing_time, order.expiry_time, ctx)?;

    // an empty slot is all-zero; a slot with an amount but no recipient is not empty
    let occupied: Vec<Fee> = order.occupied_fees().copied().collect();
    check_fees(&occupied, order.erc20_amount)?;

    Ok(ctx.caller)
}

fn check_addresses(maker: Address, erc20_address: Address, nft_address: Address) -> Result<()> {
    if maker.is_zero() {
        return Err(ExchangeError::MalformedInput("zero maker"));
    }
    if erc20_address.is_zero() {
        return Err(ExchangeError::MalformedInput("zero erc20 address"));
    }
    if nft_address.is_zero() {
        return Err(ExchangeError::MalformedInput("zero nft address"));
    }
    Ok(())
}

/// `now` must lie in `[listing_time, expiry_time)`
fn check_window(listing_time: U256, expiry_time: U256, ctx: &CallContext) -> Result<()> {
    let now = ctx.now();
    if now < listing_time {
        return Err(ExchangeError::NotStarted { listing_time, now });
    }
    if now >= expiry_time {
        return Err(ExchangeError::Expired { expiry_time, now });
    }
    Ok(())
}

fn check_fees(fees: &[Fee], erc20_amount: U256) -> Result<()> {
    if fees.iter().any(|fee| fee.recipient.is_zero()) {
        return Err(ExchangeError::MalformedInput("zero fee recipient"));
    }
    match checked_sum(fees.iter().map(|fee| &fee.amount)) {
        Some(total) if total <= erc20_amount => Ok(()),
        _ => Err(ExchangeError::MalformedInput("fees exceed erc20 amount")),
    }
}

fn check_fill_amount(order: &Order, fill_amount: U256) -> Result<()> {
    let valid = if order.order_type.is_multi_unit() {
        !fill_amount.is_zero() && fill_amount <= order.nft_amount
    } else {
        fill_amount == U256::from(1)
    };
    if valid {
        Ok(())
    } else {
        Err(ExchangeError::MalformedInput("invalid fill amount"))
    }
}
