//! Re-entrancy lock for the mutating entry points.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{ExchangeError, Result};

/// Single flag shared by every guarded entry point of one exchange.
///
/// Acquiring hands out a [`LockToken`] that owns its own handle on the flag,
/// so holding it does not borrow the exchange, and dropping it on any exit
/// path clears the flag.
#[derive(Debug, Default)]
pub struct ReentrancyLock {
    entered: Arc<AtomicBool>,
}

impl ReentrancyLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// `ReentrantCall` if a guarded call is already running.
    pub fn acquire(&self) -> Result<LockToken> {
        if self.entered.swap(true, Ordering::AcqRel) {
            debug!("rejecting re-entrant call");
            return Err(ExchangeError::ReentrantCall);
        }
        Ok(LockToken {
            entered: Arc::clone(&self.entered),
        })
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

/// Held for the duration of one guarded call
#[derive(Debug)]
#[must_use = "the lock is released as soon as the token is dropped"]
pub struct LockToken {
    entered: Arc<AtomicBool>,
}

impl Drop for LockToken {
    fn drop(&mut self) {
        self.entered.store(false, Ordering::Release);
    }
}
