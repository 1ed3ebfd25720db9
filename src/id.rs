//! Ledger entity identifiers and consensus timestamps.
//!
//! Accounts, tokens and topics share the `shard.realm.num` address space. A
//! [`TransactionId`] pairs the paying account with the instant the
//! transaction becomes valid, which also makes it unique per payer.

use std::{
    fmt,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when parsing identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input was not of the form `shard.realm.num`.
    #[error("malformed entity id {0:?}; expected `shard.realm.num`")]
    Malformed(String),
    /// The input was not of the form `shard.realm.num@seconds.nanos`.
    #[error("malformed transaction id {0:?}; expected `shard.realm.num@seconds.nanos`")]
    MalformedTransaction(String),
}

fn parse_triple(s: &str) -> Result<(u64, u64, u64), IdError> {
    let malformed = || IdError::Malformed(s.to_owned());
    let mut parts = s.trim().split('.');
    let mut next = || -> Result<u64, IdError> {
        parts.next().ok_or_else(malformed)?.parse().map_err(|_| malformed())
    };
    let triple = (next()?, next()?, next()?);
    if parts.next().is_some() {
        return Err(malformed());
    }
    Ok(triple)
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name {
            pub shard: u64,
            pub realm: u64,
            pub num: u64,
        }

        impl $name {
            /// Construct an identifier from its components.
            #[must_use]
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self { Self { shard, realm, num } }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (shard, realm, num) = parse_triple(s)?;
                Ok(Self::new(shard, realm, num))
            }
        }
    };
}

entity_id!(
    /// Identifier of a ledger account.
    AccountId
);
entity_id!(
    /// Identifier of a fungible token.
    TokenId
);
entity_id!(
    /// Identifier of a consensus topic.
    TopicId
);

/// Consensus time in nanoseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The Unix epoch. Subscribing from here replays a topic's full history.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Wall-clock time now.
    #[must_use]
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX));
        Self(nanos)
    }

    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self { Self(nanos) }

    #[must_use]
    pub const fn as_nanos(self) -> u64 { self.0 }

    /// The next representable instant.
    #[must_use]
    pub const fn next(self) -> Self { Self(self.0.saturating_add(1)) }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.0 / 1_000_000_000, self.0 % 1_000_000_000)
    }
}

/// Unique identifier of a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    /// Account paying for the transaction.
    pub account_id: AccountId,
    /// Start of the transaction's validity window.
    pub valid_start: Timestamp,
}

impl TransactionId {
    #[must_use]
    pub const fn new(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self {
            account_id,
            valid_start,
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account_id, self.valid_start)
    }
}

impl FromStr for TransactionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IdError::MalformedTransaction(s.to_owned());
        let (account, start) = s.split_once('@').ok_or_else(malformed)?;
        let account_id = account.parse().map_err(|_| malformed())?;
        let (secs, nanos) = start.split_once('.').ok_or_else(malformed)?;
        let secs: u64 = secs.parse().map_err(|_| malformed())?;
        let nanos: u64 = nanos.parse().map_err(|_| malformed())?;
        if nanos >= 1_000_000_000 {
            return Err(malformed());
        }
        let valid_start = secs
            .checked_mul(1_000_000_000)
            .and_then(|n| n.checked_add(nanos))
            .ok_or_else(malformed)?;
        Ok(Self::new(account_id, Timestamp(valid_start)))
    }
}
