//! Error taxonomy for the settlement core.
//!
//! Every failure is terminal for the call that raised it: the exchange rolls
//! back its journalled state before the error is returned, so callers never
//! observe a partial effect.

use alloy_primitives::{B256, U256};
use thiserror::Error;

/// Shorthand used throughout the crate
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Why an authorization check rejected the caller or the order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// Order was signed under a maker counter that is no longer current
    CounterMismatch,
    /// Order names an explicit taker that differs from the resolved recipient
    TakerMismatch,
    /// Caller is not the maker of an order it tried to cancel
    NotMaker,
    /// Caller is not the contract owner
    NotOwner,
}

/// External capability that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Erc20Transfer,
    Erc721Transfer,
    Erc1155Transfer,
    OrderValidator,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Capability::Erc20Transfer => "erc20 transfer",
            Capability::Erc721Transfer => "erc721 transfer",
            Capability::Erc1155Transfer => "erc1155 transfer",
            Capability::OrderValidator => "order validator",
        };
        f.write_str(name)
    }
}

/// Errors raised by exchange entry points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// Zero address, bad amount, inconsistent fee list, invalid order type
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),

    /// Signature byte layout does not decode to a known format
    #[error("malformed signature: {0}")]
    MalformedSignature(&'static str),

    #[error("order not started: listing time {listing_time}, now {now}")]
    NotStarted { listing_time: U256, now: U256 },

    #[error("order expired: expiry time {expiry_time}, now {now}")]
    Expired { expiry_time: U256, now: U256 },

    #[error("unauthorized: {0:?}")]
    Unauthorized(AuthFailure),

    /// The signer rejected the digest, or the call to it failed
    #[error("invalid signature")]
    InvalidSignature,

    #[error("order {0} is cancelled")]
    OrderCancelled(B256),

    #[error("overfill on order {order_hash}: filled {filled} + requested {requested} > total {total}")]
    OverfillAttempt {
        order_hash: B256,
        filled: U256,
        requested: U256,
        total: U256,
    },

    /// A guarded entry point was entered while another guarded call was running
    #[error("reentrant call")]
    ReentrantCall,

    #[error("{capability} failed: {reason}")]
    ExternalCallFailure {
        capability: Capability,
        reason: String,
    },
}

impl ExchangeError {
    pub(crate) fn call_failed(capability: Capability, reason: impl Into<String>) -> Self {
        ExchangeError::ExternalCallFailure {
            capability,
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading an [`crate::config::ExchangeConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}
