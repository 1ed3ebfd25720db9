//! Per-scenario bookkeeping shared by the step definitions.
//!
//! A [`Roster`] maps the ordinal roles scenarios talk about ("the first
//! account", "the second account", ...) onto configured fixtures, each with
//! its own operating client, and records which of them acts as treasury.
//! The helpers in this module are the multi-transaction sequences several
//! steps share.

mod ops;
mod roster;

use std::fmt;

use thiserror::Error;
use tracing::error;

pub use ops::{associate_token, ensure_token_balance, hbar_balance, token_balance, transfer_tokens};
pub use roster::{Participant, RECIPIENT_PAYS_TAG, Role, Roster};

use crate::{config::ConfigError, error::LedgerError, hbar::Hbar};

/// Failure of a single step.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A step read a context field no earlier step wrote.
    #[error("scenario context has no {0}; an earlier step must set it")]
    MissingContext(&'static str),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

/// Lower bound a step places on an account's hbar balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HbarFloor {
    /// "more than N hbar": the balance must exceed the bound.
    Above(Hbar),
    /// "with N hbar": the balance may equal the bound.
    AtLeast(Hbar),
}

impl HbarFloor {
    /// Whether `balance` satisfies the bound.
    #[must_use]
    pub fn admits(self, balance: Hbar) -> bool {
        match self {
            Self::Above(bound) => balance > bound,
            Self::AtLeast(bound) => balance >= bound,
        }
    }
}

impl fmt::Display for HbarFloor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above(bound) => write!(f, "more than {bound}"),
            Self::AtLeast(bound) => write!(f, "at least {bound}"),
        }
    }
}

/// Fail with [`StepError::Assertion`] unless `condition` holds.
///
/// # Errors
///
/// Returns the assertion error built by `message` when `condition` is false.
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), StepError> {
    if condition { Ok(()) } else { Err(StepError::Assertion(message())) }
}

/// Log a failed step's error before handing it back for propagation.
///
/// # Errors
///
/// Returns `result` unchanged.
pub fn logged<T, E: fmt::Display>(step: &str, result: Result<T, E>) -> Result<T, E> {
    result.inspect_err(|e| error!(step, error = %e, "step failed"))
}
