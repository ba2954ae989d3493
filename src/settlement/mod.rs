//! Settlement executor.
//!
//! Moves the asset and the payment for one fill through the host's transfer
//! capabilities.
//!
//! ## Direction
//!
//! | order side | asset | payer | payee |
//! |------------|-------|-------|-------|
//! | sell | maker -> recipient | caller | maker |
//! | buy | caller -> maker | maker | recipient |
//!
//! ## Payment split
//!
//! The price and every fee are scaled by `fill_amount / nft_amount`
//! (see [`proportional`]). Each non-zero fee goes to its recipient, then the
//! remainder goes to the payee. Zero amounts are skipped, never transferred.

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::error::{Capability, ExchangeError, Result};
use crate::exchange::Exchange;
use crate::host::Host;
use crate::types::amount::proportional;
use crate::types::{Fee, Order};

/// Payment actually made for one fill
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payment {
    /// Total debited from the payer, fees included
    pub amount_paid: U256,
    /// Sum of `fees`
    pub fees_paid: U256,
    /// Scaled fees that were transferred, in order-fee order
    pub fees: Vec<Fee>,
}

impl Payment {
    /// Amount that reached the payee
    pub fn net(&self) -> U256 {
        self.amount_paid.saturating_sub(self.fees_paid)
    }
}

/// Move `fill_amount` units of the order's asset between the parties
#[allow(clippy::too_many_arguments)]
pub fn transfer_asset(
    host: &mut dyn Host,
    exchange: &mut Exchange,
    order: &Order,
    fill_id: U256,
    fill_amount: U256,
    caller: Address,
    recipient: Address,
) -> Result<()> {
    let (from, to) = if order.order_type.is_sell() {
        (order.maker, recipient)
    } else {
        (caller, order.maker)
    };
    debug!(asset = %order.nft_address, %from, %to, id = %fill_id, amount = %fill_amount, "transferring asset");

    if order.order_type.is_multi_unit() {
        host.transfer_erc1155(exchange, order.nft_address, from, to, fill_id, fill_amount, &[])
            .map_err(|failure| ExchangeError::call_failed(Capability::Erc1155Transfer, failure.reason))
    } else {
        host.transfer_erc721(exchange, order.nft_address, from, to, fill_id)
            .map_err(|failure| ExchangeError::call_failed(Capability::Erc721Transfer, failure.reason))
    }
}

/// Pay for `fill_amount` units, fees first, remainder to the payee
pub fn transfer_payment(
    host: &mut dyn Host,
    exchange: &mut Exchange,
    order: &Order,
    fill_amount: U256,
    caller: Address,
    recipient: Address,
) -> Result<Payment> {
    let (payer, payee) = if order.order_type.is_sell() {
        (caller, order.maker)
    } else {
        (order.maker, recipient)
    };
    let token = order.erc20_address;
    let amount_paid = proportional(order.erc20_amount, fill_amount, order.nft_amount)?;

    let mut fees = Vec::with_capacity(order.fees.len());
    let mut fees_paid = U256::ZERO;
    for fee in &order.fees {
        let amount = proportional(fee.amount, fill_amount, order.nft_amount)?;
        if amount.is_zero() {
            continue;
        }
        pay(host, exchange, token, payer, fee.recipient, amount)?;
        fees_paid = fees_paid
            .checked_add(amount)
            .ok_or(ExchangeError::MalformedInput("fees exceed erc20 amount"))?;
        fees.push(Fee::new(fee.recipient, amount));
    }

    let remainder = amount_paid
        .checked_sub(fees_paid)
        .ok_or(ExchangeError::MalformedInput("fees exceed erc20 amount"))?;
    if !remainder.is_zero() {
        pay(host, exchange, token, payer, payee, remainder)?;
    }
    debug!(%token, %payer, %payee, %amount_paid, %fees_paid, "payment settled");

    Ok(Payment {
        amount_paid,
        fees_paid,
        fees,
    })
}

fn pay(
    host: &mut dyn Host,
    exchange: &mut Exchange,
    token: Address,
    from: Address,
    to: Address,
    amount: U256,
) -> Result<()> {
    match host.transfer_erc20(exchange, token, from, to, amount) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ExchangeError::call_failed(
            Capability::Erc20Transfer,
            "transfer returned false",
        )),
        Err(failure) => Err(ExchangeError::call_failed(Capability::Erc20Transfer, failure.reason)),
    }
}
