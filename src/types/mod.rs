//! Core data types for the settlement core
//!
//! ## Types
//!
//! - [`Order`]: A signed trade intent
//! - [`OrderType`]: Closed set of valid order kinds (sell/buy, single/multi, contract offer)
//! - [`Fee`]: Fee recipient and whole-order fee amount
//! - [`FillParams`]: Per-call fill intent
//! - [`CallContext`]: Caller and block time of an entry-point call
//! - [`DirectSellOrder`]: Reduced order shape for the direct ERC721 purchase path
//! - [`OrderStatus`]: Fill/cancel record keyed by order hash
//! - [`Event`]: Emitted events
//! - [`FillReceipt`]: SSZ-encoded summary of a fill
//!
//! ## Amounts
//!
//! All amounts, ids, salts and times are `U256`, matching the off-chain ABI
//! encoding that order signers hash.

mod context;
mod event;
mod order;
mod receipt;
mod status;
pub mod amount;

pub use context::CallContext;
pub use event::Event;
pub use order::{DirectSellOrder, Fee, FillParams, Order, OrderType};
pub use receipt::{compute_hash, FillReceipt};
pub use status::{OrderPhase, OrderStatus};
