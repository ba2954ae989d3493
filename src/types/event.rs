//! Append-only events emitted by the exchange for indexers.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use super::order::{Fee, OrderType};

/// One emitted event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    CounterIncremented {
        account: Address,
        new_counter: U256,
    },
    OrderCancelled {
        account: Address,
        order_hash: B256,
    },
    OrderFilled {
        order_hash: B256,
        order_type: OrderType,
        maker: Address,
        /// Resolved counterparty of the fill
        taker: Address,
        erc20_address: Address,
        /// Amount paid for this fill (fees included)
        erc20_amount: U256,
        /// Fees actually paid for this fill
        fees: Vec<Fee>,
        nft_address: Address,
        /// Token id actually moved
        nft_id: U256,
        /// Units moved by this fill
        nft_amount: U256,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
    Upgraded {
        implementation: Address,
    },
}

impl Event {
    /// Short name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::CounterIncremented { .. } => "CounterIncremented",
            Event::OrderCancelled { .. } => "OrderCancelled",
            Event::OrderFilled { .. } => "OrderFilled",
            Event::OwnershipTransferred { .. } => "OwnershipTransferred",
            Event::Upgraded { .. } => "Upgraded",
        }
    }
}
