//! Composite keys.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{KeyError, PublicKey};

/// A signing requirement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// A single ED25519 public key must sign.
    Single(PublicKey),
    /// A list of keys, optionally satisfied by a threshold of its members.
    List(KeyList),
}

impl Key {
    /// Returns `true` when the given signers satisfy this requirement.
    ///
    /// Nested lists are evaluated recursively; each member counts once
    /// towards its parent's threshold.
    #[must_use]
    pub fn is_satisfied_by(&self, signers: &HashSet<PublicKey>) -> bool {
        match self {
            Self::Single(key) => signers.contains(key),
            Self::List(list) => list.is_satisfied_by(signers),
        }
    }
}

impl From<PublicKey> for Key {
    fn from(key: PublicKey) -> Self { Self::Single(key) }
}

impl From<KeyList> for Key {
    fn from(list: KeyList) -> Self { Self::List(list) }
}

/// An ordered list of keys with an optional signing threshold.
///
/// Without a threshold every key must sign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyList {
    keys: Vec<Key>,
    threshold: Option<u32>,
}

impl KeyList {
    /// A list requiring every member to sign.
    #[must_use]
    pub fn all(keys: impl IntoIterator<Item = impl Into<Key>>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            threshold: None,
        }
    }

    /// A list satisfied by any `threshold` of its members.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidThreshold`] when `threshold` is zero or
    /// exceeds the number of keys.
    pub fn threshold(threshold: u32, keys: impl IntoIterator<Item = impl Into<Key>>) -> Result<Self, KeyError> {
        let keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        let in_range = usize::try_from(threshold).is_ok_and(|t| (1..=keys.len()).contains(&t));
        if !in_range {
            return Err(KeyError::InvalidThreshold {
                threshold,
                keys: keys.len(),
            });
        }
        Ok(Self {
            keys,
            threshold: Some(threshold),
        })
    }

    #[must_use]
    pub fn keys(&self) -> &[Key] { &self.keys }

    #[must_use]
    pub fn threshold_value(&self) -> Option<u32> { self.threshold }

    /// Number of member signatures needed.
    #[must_use]
    pub fn required(&self) -> usize {
        self.threshold
            .and_then(|t| usize::try_from(t).ok())
            .unwrap_or(self.keys.len())
    }

    fn is_satisfied_by(&self, signers: &HashSet<PublicKey>) -> bool {
        let satisfied = self.keys.iter().filter(|k| k.is_satisfied_by(signers)).count();
        satisfied >= self.required()
    }
}
