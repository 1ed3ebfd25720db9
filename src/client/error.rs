//! Error types for client-side misuse.

use thiserror::Error;

/// Errors raised before anything reaches the network.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// A transaction was frozen with a client that has no operator.
    #[error("client has no operator; call `set_operator` first")]
    OperatorNotSet,
    /// A required builder field was never set.
    #[error("required field `{0}` was not set")]
    MissingField(&'static str),
    /// A token amount does not fit the ledger's signed 64-bit amounts.
    #[error("amount {0} is out of range")]
    AmountOutOfRange(u64),
}
