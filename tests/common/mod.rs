//! Shared fixtures for the integration tests.
//!
//! [`MockHost`] is an in-memory chain: ERC20 balances, ERC721 ownership,
//! ERC1155 balances, keyed signers, allow-list validators, an optional
//! re-entrant callback and host snapshots.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use alloy_primitives::{keccak256, Address, Bytes, Selector, B256, U256};

use nft_exchange::hashing::typehash::{IS_VALID_SIGNATURE, IS_VALID_SIGNATURE_LEGACY, VALIDATE_ORDER_MAGIC};
use nft_exchange::hashing::{Domain, MessageKind};
use nft_exchange::signature::{BulkTree, SignatureFormat};
use nft_exchange::{
    CallContext, CallFailure, CallResult, DirectSellOrder, DomainConfig, Exchange, ExchangeConfig, Fee, Host, Order, OrderType,
    ValidateOrderCall,
};

// ============================================================================
// ACTORS AND CONSTANTS
// ============================================================================

pub const OWNER: Address = Address::with_last_byte(0xAA);
pub const MAKER: Address = Address::with_last_byte(0x01);
pub const TAKER: Address = Address::with_last_byte(0x02);
pub const FEE_RECIPIENT: Address = Address::with_last_byte(0xFE);
pub const TOKEN: Address = Address::with_last_byte(0x20);
pub const NFT: Address = Address::with_last_byte(0x21);
pub const MULTI_NFT: Address = Address::with_last_byte(0x22);
pub const VALIDATOR: Address = Address::with_last_byte(0x77);

/// Block time used by the fixtures
pub const NOW: u64 = 1_700_000_000;

pub fn ctx(caller: Address) -> CallContext {
    CallContext::new(caller, NOW)
}

pub fn config() -> ExchangeConfig {
    ExchangeConfig {
        owner: OWNER,
        domain: DomainConfig {
            verifying_contract: Address::with_last_byte(0xEE),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn exchange() -> Exchange {
    Exchange::new(config())
}

pub fn domain() -> Domain {
    Domain::from_config(&config().domain)
}

// ============================================================================
// ORDERS
// ============================================================================

/// Maker lists ERC721 #7 for 100, 10 of which goes to the fee recipient
pub fn sell_order() -> Order {
    Order {
        order_type: OrderType::SellSingle,
        maker: MAKER,
        listing_time: U256::from(NOW - 60),
        expiry_time: U256::from(NOW + 3_600),
        salt: U256::from(1),
        erc20_address: TOKEN,
        erc20_amount: U256::from(100),
        fees: vec![Fee::new(FEE_RECIPIENT, U256::from(10))],
        nft_address: NFT,
        nft_id: U256::from(7),
        nft_amount: U256::from(1),
        ..Default::default()
    }
}

/// Maker bids 100 for ERC721 #7
pub fn buy_order() -> Order {
    Order {
        order_type: OrderType::BuySingle,
        ..sell_order()
    }
}

/// Maker lists 10 units of ERC1155 #5 for 1000 in total, 50 in fees
pub fn sell_multi_order() -> Order {
    Order {
        order_type: OrderType::SellMulti,
        erc20_amount: U256::from(1_000),
        fees: vec![Fee::new(FEE_RECIPIENT, U256::from(50))],
        nft_address: MULTI_NFT,
        nft_id: U256::from(5),
        nft_amount: U256::from(10),
        ..sell_order()
    }
}

pub fn direct_sell_order() -> DirectSellOrder {
    DirectSellOrder {
        maker: MAKER,
        listing_time: U256::from(NOW - 60),
        expiry_time: U256::from(NOW + 3_600),
        salt: U256::from(1),
        erc20_address: TOKEN,
        erc20_amount: U256::from(100),
        fees: [Fee::new(FEE_RECIPIENT, U256::from(10)), Fee::default()],
        nft_address: NFT,
        nft_id: U256::from(7),
        counter: U256::ZERO,
    }
}

// ============================================================================
// SIGNING
// ============================================================================

/// Deterministic two-word stand-in for an ECDSA signature by `signer`
pub fn sign(signer: Address, digest: B256) -> Vec<u8> {
    let first = keccak256([signer.as_slice(), digest.as_slice()].concat());
    let second = keccak256(first);
    [first.as_slice(), second.as_slice()].concat()
}

/// Single-order signature by the order's maker
pub fn sign_order(exchange: &Exchange, order: &Order) -> Bytes {
    let signature = sign(order.maker, exchange.order_hash(order));
    SignatureFormat::SingleDefault { signature: &signature }.encode()
}

pub fn sign_direct(exchange: &Exchange, order: &DirectSellOrder) -> Bytes {
    let signature = sign(order.maker, exchange.direct_sell_order_hash(order));
    SignatureFormat::SingleDefault { signature: &signature }.encode()
}

/// One bulk signature by `maker` over all `orders`; returns per-order
/// variable-proof signatures
pub fn sign_bulk(maker: Address, orders: &[Order]) -> Vec<Bytes> {
    let leaves: Vec<B256> = orders.iter().map(nft_exchange::hashing::leaf_hash).collect();
    let tree = BulkTree::new(&leaves);
    let signature = sign(maker, domain().wrap(MessageKind::BulkOrder, tree.root()));

    (0..orders.len())
        .map(|index| {
            let proof = tree.proof(index).unwrap_or_default();
            SignatureFormat::BulkVariable {
                proof,
                signature: &signature,
            }
            .encode()
        })
        .collect()
}

// ============================================================================
// MOCK HOST
// ============================================================================

/// Token state that snapshots capture
#[derive(Debug, Clone, Default)]
pub struct Chain {
    pub erc20: HashMap<(Address, Address), U256>,
    pub erc721: HashMap<(Address, U256), Address>,
    pub erc1155: HashMap<(Address, U256, Address), U256>,
}

/// Arguments of one validator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorCall {
    pub validator: Address,
    pub asset: Address,
    pub fill_id: U256,
    pub merkle_root: B256,
    pub order_hash: B256,
    pub extra_data: Vec<u8>,
}

type Reentry = Box<dyn FnMut(&mut Exchange) -> nft_exchange::Result<()>>;

#[derive(Default)]
pub struct MockHost {
    pub chain: Chain,
    snapshots: Vec<Chain>,

    /// Signers that only answer the legacy selector
    pub legacy_signers: HashSet<Address>,
    pub signature_checks: usize,

    /// Validator -> accepted fill ids
    pub validators: HashMap<Address, HashSet<U256>>,
    pub validator_calls: Vec<ValidatorCall>,

    /// ERC20 transfers to this address fail
    pub fail_erc20_to: Option<Address>,

    /// Runs once, inside the next asset transfer
    pub reentry: Option<Reentry>,
    pub reentry_results: Vec<nft_exchange::Result<()>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint_erc20(&mut self, owner: Address, amount: u64) {
        let balance = self.chain.erc20.entry((TOKEN, owner)).or_default();
        *balance += U256::from(amount);
    }

    pub fn mint_erc721(&mut self, owner: Address, id: u64) {
        self.chain.erc721.insert((NFT, U256::from(id)), owner);
    }

    pub fn mint_erc1155(&mut self, owner: Address, id: u64, amount: u64) {
        let balance = self.chain.erc1155.entry((MULTI_NFT, U256::from(id), owner)).or_default();
        *balance += U256::from(amount);
    }

    pub fn balance(&self, owner: Address) -> U256 {
        self.chain.erc20.get(&(TOKEN, owner)).copied().unwrap_or_default()
    }

    pub fn owner_of(&self, id: u64) -> Option<Address> {
        self.chain.erc721.get(&(NFT, U256::from(id))).copied()
    }

    pub fn units(&self, owner: Address, id: u64) -> U256 {
        self.chain
            .erc1155
            .get(&(MULTI_NFT, U256::from(id), owner))
            .copied()
            .unwrap_or_default()
    }

    /// Snapshots still held
    pub fn open_snapshots(&self) -> usize {
        self.snapshots.len()
    }

    pub fn allow(&mut self, validator: Address, fill_id: u64) {
        self.validators.entry(validator).or_default().insert(U256::from(fill_id));
    }

    pub fn on_next_transfer(&mut self, callback: impl FnMut(&mut Exchange) -> nft_exchange::Result<()> + 'static) {
        self.reentry = Some(Box::new(callback));
    }

    fn run_reentry(&mut self, exchange: &mut Exchange) {
        if let Some(mut callback) = self.reentry.take() {
            let result = callback(exchange);
            self.reentry_results.push(result);
        }
    }
}

impl Host for MockHost {
    fn transfer_erc20(
        &mut self,
        _exchange: &mut Exchange,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> CallResult<bool> {
        if self.fail_erc20_to == Some(to) {
            return Err(CallFailure::new("recipient rejected transfer"));
        }
        let from_balance = self.chain.erc20.entry((token, from)).or_default();
        if *from_balance < amount {
            return Ok(false);
        }
        *from_balance -= amount;
        *self.chain.erc20.entry((token, to)).or_default() += amount;
        Ok(true)
    }

    fn transfer_erc721(
        &mut self,
        exchange: &mut Exchange,
        token: Address,
        from: Address,
        to: Address,
        id: U256,
    ) -> CallResult<()> {
        self.run_reentry(exchange);
        match self.chain.erc721.get(&(token, id)) {
            Some(owner) if *owner == from => {
                self.chain.erc721.insert((token, id), to);
                Ok(())
            }
            _ => Err(CallFailure::new("transfer from incorrect owner")),
        }
    }

    fn transfer_erc1155(
        &mut self,
        exchange: &mut Exchange,
        token: Address,
        from: Address,
        to: Address,
        id: U256,
        amount: U256,
        _data: &[u8],
    ) -> CallResult<()> {
        self.run_reentry(exchange);
        let from_units = self.chain.erc1155.entry((token, id, from)).or_default();
        if *from_units < amount {
            return Err(CallFailure::new("insufficient balance for transfer"));
        }
        *from_units -= amount;
        *self.chain.erc1155.entry((token, id, to)).or_default() += amount;
        Ok(())
    }

    fn is_valid_signature(
        &mut self,
        signer: Address,
        selector: Selector,
        digest: B256,
        signature: &[u8],
    ) -> CallResult<Selector> {
        self.signature_checks += 1;
        let expected = if self.legacy_signers.contains(&signer) {
            IS_VALID_SIGNATURE_LEGACY
        } else {
            IS_VALID_SIGNATURE
        };
        if selector != expected {
            return Err(CallFailure::new("function selector was not recognized"));
        }
        if sign(signer, digest) == signature {
            Ok(selector)
        } else {
            Ok(Selector::ZERO)
        }
    }

    fn validate_order(&mut self, _exchange: &mut Exchange, call: ValidateOrderCall<'_>) -> CallResult<Selector> {
        self.validator_calls.push(ValidatorCall {
            validator: call.validator,
            asset: call.asset,
            fill_id: call.fill_id,
            merkle_root: call.merkle_root,
            order_hash: call.order_hash,
            extra_data: call.extra_data.to_vec(),
        });
        match self.validators.get(&call.validator) {
            Some(allowed) if allowed.contains(&call.fill_id) => Ok(*VALIDATE_ORDER_MAGIC),
            Some(_) => Ok(Selector::ZERO),
            None => Err(CallFailure::new("no validator deployed")),
        }
    }

    fn snapshot(&mut self) -> usize {
        self.snapshots.push(self.chain.clone());
        self.snapshots.len() - 1
    }

    fn revert_to(&mut self, snapshot: usize) {
        if let Some(chain) = self.snapshots.get(snapshot).cloned() {
            self.chain = chain;
            self.snapshots.truncate(snapshot);
        }
    }

    fn commit(&mut self, snapshot: usize) {
        self.snapshots.truncate(snapshot);
    }
}
