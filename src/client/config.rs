//! Client timing configuration.

use std::time::Duration;

use crate::hbar::Hbar;

/// Exponential back-off used while polling for receipts.
///
/// Polling starts at `initial_delay` and doubles after each miss, capped at
/// `max_delay`.
///
/// # Default Values
/// - `initial_delay`: 10 milliseconds
/// - `max_delay`: 500 milliseconds
///
/// # Invariants
/// - `initial_delay` must not exceed `max_delay`
/// - `initial_delay` must be at least 1 millisecond
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Delay before the second poll.
    pub initial_delay: Duration,
    /// Largest delay between polls.
    pub max_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(500),
        }
    }
}

impl BackoffConfig {
    /// Clamp delays to sane bounds and ensure `initial_delay <= max_delay`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use ledger_bdd::BackoffConfig;
    ///
    /// let cfg = BackoffConfig {
    ///     initial_delay: Duration::from_millis(5),
    ///     max_delay: Duration::from_millis(1),
    /// };
    ///
    /// let normalized = cfg.normalized();
    /// assert_eq!(normalized.initial_delay, Duration::from_millis(1));
    /// assert_eq!(normalized.max_delay, Duration::from_millis(5));
    /// ```
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.initial_delay = self.initial_delay.max(Duration::from_millis(1));
        self.max_delay = self.max_delay.max(Duration::from_millis(1));
        if self.initial_delay > self.max_delay {
            std::mem::swap(&mut self.initial_delay, &mut self.max_delay);
        }
        self
    }
}

/// Settings shared by every request a [`crate::Client`] makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// How long to wait for a receipt before giving up.
    pub receipt_timeout: Duration,
    /// Poll spacing while waiting for a receipt.
    pub backoff: BackoffConfig,
    /// Fee ceiling stamped on transactions that do not set their own.
    pub max_transaction_fee: Hbar,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            receipt_timeout: Duration::from_secs(30),
            backoff: BackoffConfig::default(),
            max_transaction_fee: Hbar::new(5),
        }
    }
}
