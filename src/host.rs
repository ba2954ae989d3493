//! Capabilities the exchange consumes from its environment.
//!
//! The [`Host`] stands in for the chain: token contracts, smart-account
//! signers and order validators. Transfer and validator capabilities receive
//! the exchange itself so they can call back into it, which is how
//! re-entrancy reaches the guarded entry points.
//!
//! A call either returns its expected success value or is treated as failed;
//! the exchange maps failures onto [`crate::ExchangeError`].

use alloy_primitives::{Address, Selector, B256, U256};
use thiserror::Error;

use crate::exchange::Exchange;

/// Opaque failure of a capability call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct CallFailure {
    pub reason: String,
}

impl CallFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type CallResult<T> = Result<T, CallFailure>;

/// Arguments of a `validateOrder` delegation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOrderCall<'a> {
    pub validator: Address,
    pub asset: Address,
    pub fill_id: U256,
    pub merkle_root: B256,
    pub order_hash: B256,
    pub extra_data: &'a [u8],
}

/// External capabilities
pub trait Host {
    /// ERC20 `transferFrom(from, to, amount)`; `Ok(false)` counts as failure
    fn transfer_erc20(
        &mut self,
        exchange: &mut Exchange,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> CallResult<bool>;

    /// ERC721 `safeTransferFrom(from, to, id)`
    fn transfer_erc721(
        &mut self,
        exchange: &mut Exchange,
        token: Address,
        from: Address,
        to: Address,
        id: U256,
    ) -> CallResult<()>;

    /// ERC1155 `safeTransferFrom(from, to, id, amount, data)`
    #[allow(clippy::too_many_arguments)]
    fn transfer_erc1155(
        &mut self,
        exchange: &mut Exchange,
        token: Address,
        from: Address,
        to: Address,
        id: U256,
        amount: U256,
        data: &[u8],
    ) -> CallResult<()>;

    /// Ask `signer` whether `signature` authorizes `digest`.
    ///
    /// `selector` is either the canonical `isValidSignature(bytes32,bytes)` or
    /// the legacy `isValidSignature(bytes,bytes)` alias; the return value is
    /// the signer's magic.
    fn is_valid_signature(
        &mut self,
        signer: Address,
        selector: Selector,
        digest: B256,
        signature: &[u8],
    ) -> CallResult<Selector>;

    /// Delegate order policy to an external validator; returns its magic
    fn validate_order(
        &mut self,
        exchange: &mut Exchange,
        call: ValidateOrderCall<'_>,
    ) -> CallResult<Selector>;

    /// Mark a point the host can roll back to if the current call aborts
    fn snapshot(&mut self) -> usize {
        0
    }

    /// Undo every side effect since `snapshot`
    fn revert_to(&mut self, _snapshot: usize) {}

    /// Release `snapshot` once the call that took it has committed
    fn commit(&mut self, _snapshot: usize) {}
}
