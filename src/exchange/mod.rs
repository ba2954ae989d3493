//! Exchange orchestrator.
//!
//! Sequences checker, hashing, signature verification, ledger and settlement
//! for every entry point, and owns the call-level guarantees:
//!
//! 1. **Exclusion**: every mutating entry point holds the re-entrancy lock for
//!    its whole body; a nested guarded call fails with `ReentrantCall`.
//! 2. **Atomicity**: the ledger, the event log, the exchange's own fields and
//!    the host are checkpointed on entry and rolled back if the body fails.
//!
//! ## Fill pipeline
//!
//! ```text
//! check -> leaf hash -> verify signature -> validator (if any)
//!       -> ledger commit -> transfer asset -> transfer payment -> OrderFilled
//! ```
//!
//! State is committed before any value moves, so a callback that observes the
//! exchange mid-call already sees the fill.
//!
//! ## Order lifecycle
//!
//! ```text
//! Open -> PartiallyFilled -> Filled
//!   \___________\______________\____> Cancelled (terminal, keeps filled amount)
//! ```

mod guard;

pub use guard::{LockToken, ReentrancyLock};

use alloy_primitives::{Address, B256, U256};
use tracing::{debug, info, instrument, warn};

use crate::checker::{self, ValidatorContext};
use crate::config::ExchangeConfig;
use crate::error::{AuthFailure, Capability, ExchangeError, Result};
use crate::hashing::typehash::VALIDATE_ORDER_MAGIC;
use crate::hashing::{self, Domain};
use crate::host::{Host, ValidateOrderCall};
use crate::ledger::{self, Ledger};
use crate::settlement::{self, Payment};
use crate::signature::SignatureVerifier;
use crate::types::{
    CallContext, DirectSellOrder, Event, FillParams, FillReceipt, Order, OrderStatus,
};

/// Everything a failed call has to restore
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    ledger: ledger::Checkpoint,
    events: usize,
    fill_sequence: u64,
    owner: Address,
    implementation: Address,
}

/// Settlement state machine for one exchange instance
#[derive(Debug)]
pub struct Exchange {
    config: ExchangeConfig,
    verifier: SignatureVerifier,
    ledger: Ledger,
    events: Vec<Event>,
    owner: Address,
    implementation: Address,
    fill_sequence: u64,
    lock: ReentrancyLock,
}

impl Exchange {
    pub fn new(config: ExchangeConfig) -> Self {
        let domain = Domain::from_config(&config.domain);
        let verifier = SignatureVerifier::new(domain, config.max_proof_depth);
        info!(
            name = %config.domain.name,
            chain_id = config.domain.chain_id,
            domain_separator = %domain.separator(),
            "exchange initialized"
        );

        Self {
            owner: config.owner,
            config,
            verifier,
            ledger: Ledger::new(),
            events: Vec::new(),
            implementation: Address::ZERO,
            fill_sequence: 0,
            lock: ReentrancyLock::new(),
        }
    }

    // ========================================================================
    // Settlement entry points
    // ========================================================================

    /// Fill `params.fill_amount` units of a signed order.
    ///
    /// # Errors
    ///
    /// Any checker, signature, ledger or capability failure; the call then
    /// has no effect.
    #[instrument(skip_all, err, fields(caller = %ctx.caller, order_type = ?order.order_type, fill_amount = %params.fill_amount))]
    pub fn fill_order(
        &mut self,
        host: &mut dyn Host,
        ctx: CallContext,
        order: &Order,
        params: &FillParams,
    ) -> Result<FillReceipt> {
        self.atomic_with_host(host, "fill_order", |exchange, host| {
            exchange.fill(host, &ctx, order, params)
        })
    }

    /// Buy a single ERC721 token listed with a direct-sell order.
    ///
    /// Always a full fill; the caller is the buyer and the recipient.
    #[instrument(skip_all, err, fields(caller = %ctx.caller, nft_id = %order.nft_id))]
    pub fn buy_erc721(
        &mut self,
        host: &mut dyn Host,
        ctx: CallContext,
        order: &DirectSellOrder,
        signature: &[u8],
    ) -> Result<FillReceipt> {
        self.atomic_with_host(host, "buy_erc721", |exchange, host| {
            exchange.buy(host, &ctx, order, signature)
        })
    }

    // ========================================================================
    // Maker entry points
    // ========================================================================

    /// Cancel orders made by the caller; returns their hashes.
    ///
    /// Cancelling an already-cancelled order succeeds and emits again.
    #[instrument(skip_all, err, fields(caller = %ctx.caller, count = orders.len()))]
    pub fn cancel_orders(&mut self, ctx: CallContext, orders: &[Order]) -> Result<Vec<B256>> {
        self.atomic(|exchange| {
            let mut cancelled = Vec::with_capacity(orders.len());
            for order in orders {
                if order.maker != ctx.caller {
                    return Err(ExchangeError::Unauthorized(AuthFailure::NotMaker));
                }
                let order_hash = exchange.order_hash(order);
                exchange.ledger.cancel(order_hash);
                exchange.emit(Event::OrderCancelled {
                    account: ctx.caller,
                    order_hash,
                });
                cancelled.push(order_hash);
            }
            info!(count = cancelled.len(), "orders cancelled");
            Ok(cancelled)
        })
    }

    /// Invalidate every order the caller signed under its current counter
    #[instrument(skip_all, err, fields(caller = %ctx.caller))]
    pub fn increment_counter(&mut self, ctx: CallContext) -> Result<U256> {
        self.atomic(|exchange| {
            let new_counter = exchange.ledger.increment_counter(ctx.caller)?;
            exchange.emit(Event::CounterIncremented {
                account: ctx.caller,
                new_counter,
            });
            info!(%new_counter, "counter incremented");
            Ok(new_counter)
        })
    }

    // ========================================================================
    // Administration
    // ========================================================================

    #[instrument(skip_all, err, fields(caller = %ctx.caller, %new_owner))]
    pub fn transfer_ownership(&mut self, ctx: CallContext, new_owner: Address) -> Result<()> {
        self.atomic(|exchange| {
            exchange.only_owner(&ctx)?;
            if new_owner.is_zero() {
                return Err(ExchangeError::MalformedInput("zero owner"));
            }
            let previous_owner = std::mem::replace(&mut exchange.owner, new_owner);
            exchange.emit(Event::OwnershipTransferred {
                previous_owner,
                new_owner,
            });
            info!(%previous_owner, "ownership transferred");
            Ok(())
        })
    }

    /// Point the exchange at a new implementation
    #[instrument(skip_all, err, fields(caller = %ctx.caller, %implementation))]
    pub fn upgrade_to(&mut self, ctx: CallContext, implementation: Address) -> Result<()> {
        self.atomic(|exchange| {
            exchange.only_owner(&ctx)?;
            if implementation.is_zero() {
                return Err(ExchangeError::MalformedInput("zero implementation"));
            }
            exchange.implementation = implementation;
            exchange.emit(Event::Upgraded { implementation });
            info!("implementation upgraded");
            Ok(())
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn counter(&self, maker: &Address) -> U256 {
        self.ledger.counter(maker)
    }

    pub fn order_status(&self, order_hash: &B256) -> OrderStatus {
        self.ledger.status(order_hash)
    }

    /// Canonical identity of `order` under this exchange's domain
    pub fn order_hash(&self, order: &Order) -> B256 {
        hashing::order_hash(self.verifier.domain(), order)
    }

    pub fn direct_sell_order_hash(&self, order: &DirectSellOrder) -> B256 {
        hashing::direct_sell_order_hash(self.verifier.domain(), order)
    }

    /// Check the maker's signature on `order` without touching any state;
    /// returns the order hash on success
    pub fn validate_signature(&self, host: &mut dyn Host, order: &Order, signature: &[u8]) -> Result<B256> {
        self.verifier
            .verify(host, order.maker, hashing::leaf_hash(order), signature)
    }

    /// Events emitted so far, oldest first
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// SHA-256 commitment to every order status and maker counter
    pub fn state_root(&self) -> Result<B256> {
        self.ledger.state_root()
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Zero until the first upgrade
    pub fn implementation(&self) -> Address {
        self.implementation
    }

    pub fn domain_separator(&self) -> B256 {
        self.verifier.domain().separator()
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Whether a guarded call is in progress
    pub fn is_entered(&self) -> bool {
        self.lock.is_held()
    }

    // ========================================================================
    // Call bodies
    // ========================================================================

    fn fill(
        &mut self,
        host: &mut dyn Host,
        ctx: &CallContext,
        order: &Order,
        params: &FillParams,
    ) -> Result<FillReceipt> {
        let counter = self.ledger.counter(&order.maker);
        let checked = checker::check(order, params, ctx, counter)?;

        let leaf = hashing::leaf_hash(order);
        let order_hash = self.verifier.verify(host, order.maker, leaf, &params.signature)?;
        if let Some(validator) = checked.validator {
            self.validate_order(host, validator, order_hash, &params.extra_data)?;
        }

        let status = self.ledger.commit(order_hash, order.nft_amount, params.fill_amount)?;
        settlement::transfer_asset(
            host,
            self,
            order,
            params.fill_id,
            params.fill_amount,
            checked.caller,
            checked.recipient,
        )?;
        let payment = settlement::transfer_payment(
            host,
            self,
            order,
            params.fill_amount,
            checked.caller,
            checked.recipient,
        )?;

        self.finish_fill(ctx, order, order_hash, params.fill_id, params.fill_amount, checked.recipient, payment, status)
    }

    fn buy(
        &mut self,
        host: &mut dyn Host,
        ctx: &CallContext,
        order: &DirectSellOrder,
        signature: &[u8],
    ) -> Result<FillReceipt> {
        let counter = self.ledger.counter(&order.maker);
        let buyer = checker::check_direct_sell(order, ctx, counter)?;

        let leaf = hashing::direct_sell_leaf_hash(order);
        let order_hash = self.verifier.verify(host, order.maker, leaf, signature)?;

        let one = U256::from(1);
        let status = self.ledger.commit(order_hash, one, one)?;

        let projected = order.to_order();
        settlement::transfer_asset(host, self, &projected, order.nft_id, one, buyer, buyer)?;
        let payment = settlement::transfer_payment(host, self, &projected, one, buyer, buyer)?;

        self.finish_fill(ctx, &projected, order_hash, order.nft_id, one, buyer, payment, status)
    }

    fn validate_order(
        &mut self,
        host: &mut dyn Host,
        validator: ValidatorContext,
        order_hash: B256,
        extra_data: &[u8],
    ) -> Result<()> {
        let call = ValidateOrderCall {
            validator: validator.validator,
            asset: validator.asset,
            fill_id: validator.fill_id,
            merkle_root: validator.merkle_root,
            order_hash,
            extra_data,
        };
        match host.validate_order(self, call) {
            Ok(magic) if magic == *VALIDATE_ORDER_MAGIC => Ok(()),
            Ok(_) => Err(ExchangeError::call_failed(
                Capability::OrderValidator,
                "order rejected",
            )),
            Err(failure) => Err(ExchangeError::call_failed(Capability::OrderValidator, failure.reason)),
        }
    }

    /// Emit `OrderFilled` and build the receipt
    #[allow(clippy::too_many_arguments)]
    fn finish_fill(
        &mut self,
        ctx: &CallContext,
        order: &Order,
        order_hash: B256,
        fill_id: U256,
        fill_amount: U256,
        taker: Address,
        payment: Payment,
        status: OrderStatus,
    ) -> Result<FillReceipt> {
        self.fill_sequence += 1;
        let receipt = FillReceipt::new(
            self.fill_sequence,
            order_hash,
            fill_amount,
            payment.amount_paid,
            payment.fees_paid,
            status.encode()?,
            ctx.timestamp,
        );

        info!(
            %order_hash,
            maker = %order.maker,
            %taker,
            %fill_amount,
            amount_paid = %payment.amount_paid,
            fees_paid = %payment.fees_paid,
            net_paid = %payment.net(),
            tracked_orders = self.ledger.order_count(),
            "order filled"
        );
        self.emit(Event::OrderFilled {
            order_hash,
            order_type: order.order_type,
            maker: order.maker,
            taker,
            erc20_address: order.erc20_address,
            erc20_amount: payment.amount_paid,
            fees: payment.fees,
            nft_address: order.nft_address,
            nft_id: fill_id,
            nft_amount: fill_amount,
        });
        Ok(receipt)
    }

    fn only_owner(&self, ctx: &CallContext) -> Result<()> {
        if ctx.caller != self.owner {
            return Err(ExchangeError::Unauthorized(AuthFailure::NotOwner));
        }
        Ok(())
    }

    fn emit(&mut self, event: Event) {
        debug!(event = event.name(), "event emitted");
        self.events.push(event);
    }

    // ========================================================================
    // Atomicity
    // ========================================================================

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            ledger: self.ledger.checkpoint(),
            events: self.events.len(),
            fill_sequence: self.fill_sequence,
            owner: self.owner,
            implementation: self.implementation,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.ledger.revert_to(checkpoint.ledger);
        self.events.truncate(checkpoint.events);
        self.fill_sequence = checkpoint.fill_sequence;
        self.owner = checkpoint.owner;
        self.implementation = checkpoint.implementation;
    }

    /// Run a guarded body that does not call out
    fn atomic<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let _lock = self.lock.acquire()?;
        let checkpoint = self.checkpoint();
        match body(self) {
            Ok(value) => {
                self.ledger.clear_journal();
                Ok(value)
            }
            Err(err) => {
                self.restore(checkpoint);
                warn!(error = %err, "call reverted");
                Err(err)
            }
        }
    }

    /// Run a guarded body that calls into `host`; host effects are rolled
    /// back together with the exchange's, and the host snapshot is released
    /// on success
    fn atomic_with_host<T>(
        &mut self,
        host: &mut dyn Host,
        operation: &'static str,
        body: impl FnOnce(&mut Self, &mut dyn Host) -> Result<T>,
    ) -> Result<T> {
        let _lock = self.lock.acquire()?;
        let checkpoint = self.checkpoint();
        let snapshot = host.snapshot();
        match body(self, host) {
            Ok(value) => {
                host.commit(snapshot);
                self.ledger.clear_journal();
                Ok(value)
            }
            Err(err) => {
                host.revert_to(snapshot);
                self.restore(checkpoint);
                warn!(operation, error = %err, "call reverted");
                Err(err)
            }
        }
    }
}
