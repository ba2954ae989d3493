//! # NFT Exchange
//!
//! Order-settlement core of an NFT exchange: authorizes off-chain-signed
//! orders, guards them against tampering, cancellation and replay, and swaps
//! an ERC20 payment for an ERC721/ERC1155 asset while splitting fees.
//!
//! ## Architecture
//!
//! Leaves first:
//! - **Hashing**: Domain-separated structural order digests
//! - **Signature**: Six-format signature decoding, bulk merkle proofs, signer delegation
//! - **Checker**: Pure order/fill validation against time, caller and counter
//! - **Ledger**: Journalled fill/cancel records and maker counters
//! - **Settlement**: Proportional payment split and transfers
//! - **Exchange**: Entry points, re-entrancy lock and call atomicity
//!
//! The chain itself (tokens, smart-account signers, validators) is reached
//! through the [`Host`] trait.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical orders hash identically, whatever signed them
//! 2. **Exact Arithmetic**: 256-bit integers, 512-bit intermediate products
//! 3. **All-or-Nothing Calls**: A failed call leaves no trace
//! 4. **Synchronous Execution**: One call at a time, no async

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, OrderStatus, Event, FillReceipt
pub mod types;

/// Error taxonomy
pub mod error;

/// TOML configuration
pub mod config;

/// Typed-hash engine
pub mod hashing;

/// Signature & merkle verifier
pub mod signature;

/// Order checker
pub mod checker;

/// Fill-status ledger
pub mod ledger;

/// Settlement executor
pub mod settlement;

/// External capabilities
pub mod host;

/// Orchestrator
pub mod exchange;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{DomainConfig, ExchangeConfig};
pub use error::{AuthFailure, Capability, ConfigError, ExchangeError, Result};
pub use exchange::Exchange;
pub use host::{CallFailure, CallResult, Host, ValidateOrderCall};
pub use types::{
    CallContext, DirectSellOrder, Event, Fee, FillParams, FillReceipt, Order, OrderStatus, OrderType,
};
