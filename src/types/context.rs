//! Per-call execution context.

use alloy_primitives::{Address, U256};

/// Who is calling and when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallContext {
    pub caller: Address,
    /// Block time in seconds
    pub timestamp: u64,
}

impl CallContext {
    pub fn new(caller: Address, timestamp: u64) -> Self {
        Self { caller, timestamp }
    }

    /// Block time as a 256-bit word, comparable with order times
    #[inline]
    pub fn now(&self) -> U256 {
        U256::from(self.timestamp)
    }
}
