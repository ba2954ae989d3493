//! Type strings, typehashes and capability selectors (hash scheme version 1).
//!
//! Changing any string here changes every digest and breaks compatibility
//! with existing off-chain signatures; bump [`HASH_SCHEME_VERSION`] when you do.

use alloy_primitives::{keccak256, Selector, B256};
use lazy_static::lazy_static;

/// Version of the structural hash layout below
pub const HASH_SCHEME_VERSION: u8 = 1;

pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub const FEE_TYPE: &str = "Fee(address recipient,uint256 amount)";

pub const ASSET_TYPE: &str = "Asset(address nftAddress,uint256 nftId,uint256 nftAmount)";

pub const ORDER_TYPE: &str = concat!(
    "Order(uint8 orderType,address maker,address taker,uint256 listingTime,",
    "uint256 expiryTime,uint256 salt,address erc20Address,uint256 erc20Amount,",
    "Fee[] fees,Asset asset,address orderValidator,uint256 counter)",
    "Asset(address nftAddress,uint256 nftId,uint256 nftAmount)",
    "Fee(address recipient,uint256 amount)"
);

pub const SINGLE_ORDER_TYPE: &str = "SingleOrder(bytes32 leaf)";
pub const BULK_ORDER_TYPE: &str = "BulkOrder(bytes32 root)";
pub const ORDER_ROOT_TYPE: &str = "OrderRoot(bytes32 root)";

/// `isValidSignature(bytes32,bytes)`; also the expected magic return value
pub const IS_VALID_SIGNATURE: Selector = Selector::new([0x16, 0x26, 0xba, 0x7e]);

/// Legacy `isValidSignature(bytes,bytes)` alias and its magic return value
pub const IS_VALID_SIGNATURE_LEGACY: Selector = Selector::new([0x20, 0xc1, 0x3b, 0x0b]);

pub const VALIDATE_ORDER_SIGNATURE: &str = "validateOrder(address,uint256,bytes32,bytes32,bytes)";

lazy_static! {
    pub static ref EIP712_DOMAIN_TYPEHASH: B256 = keccak256(EIP712_DOMAIN_TYPE);
    pub static ref FEE_TYPEHASH: B256 = keccak256(FEE_TYPE);
    pub static ref ASSET_TYPEHASH: B256 = keccak256(ASSET_TYPE);
    pub static ref ORDER_TYPEHASH: B256 = keccak256(ORDER_TYPE);
    pub static ref SINGLE_ORDER_TYPEHASH: B256 = keccak256(SINGLE_ORDER_TYPE);
    pub static ref BULK_ORDER_TYPEHASH: B256 = keccak256(BULK_ORDER_TYPE);
    pub static ref ORDER_ROOT_TYPEHASH: B256 = keccak256(ORDER_ROOT_TYPE);

    /// Magic value an order validator returns on acceptance
    pub static ref VALIDATE_ORDER_MAGIC: Selector = selector(VALIDATE_ORDER_SIGNATURE);
}

/// First four bytes of the Keccak-256 of a function signature
pub fn selector(signature: &str) -> Selector {
    let digest = keccak256(signature);
    Selector::new([digest[0], digest[1], digest[2], digest[3]])
}
