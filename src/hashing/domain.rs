//! Signer domain and message-kind wrapping.

use alloy_primitives::{keccak256, Address, Keccak256, B256, U256};

use super::typehash::{
    BULK_ORDER_TYPEHASH, EIP712_DOMAIN_TYPEHASH, ORDER_ROOT_TYPEHASH, SINGLE_ORDER_TYPEHASH,
};
use crate::config::DomainConfig;

/// Kind of message a signer authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// One order, signed directly
    SingleOrder,
    /// Root of a bulk-signed tree of orders
    BulkOrder,
    /// Root of an order tree whose policy is delegated to a validator
    OrderRoot,
}

impl MessageKind {
    fn typehash(self) -> B256 {
        match self {
            MessageKind::SingleOrder => *SINGLE_ORDER_TYPEHASH,
            MessageKind::BulkOrder => *BULK_ORDER_TYPEHASH,
            MessageKind::OrderRoot => *ORDER_ROOT_TYPEHASH,
        }
    }
}

/// Signing domain of one exchange deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Domain {
    separator: B256,
}

impl Domain {
    pub fn new(name: &str, version: &str, chain_id: u64, verifying_contract: Address) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(*EIP712_DOMAIN_TYPEHASH);
        hasher.update(keccak256(name.as_bytes()));
        hasher.update(keccak256(version.as_bytes()));
        hasher.update(U256::from(chain_id).to_be_bytes::<32>());
        hasher.update(verifying_contract.into_word());
        Self {
            separator: hasher.finalize(),
        }
    }

    pub fn from_config(config: &DomainConfig) -> Self {
        Self::new(
            &config.name,
            &config.version,
            config.chain_id,
            config.verifying_contract,
        )
    }

    pub fn separator(&self) -> B256 {
        self.separator
    }

    /// `keccak256(0x1901 ‖ separator ‖ keccak256(typehash(kind) ‖ value))`
    pub fn wrap(&self, kind: MessageKind, value: B256) -> B256 {
        let mut message = Keccak256::new();
        message.update(kind.typehash());
        message.update(value);
        let message = message.finalize();

        let mut hasher = Keccak256::new();
        hasher.update([0x19, 0x01]);
        hasher.update(self.separator);
        hasher.update(message);
        hasher.finalize()
    }
}
