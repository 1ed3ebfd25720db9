//! Account fixtures for the behavioural suite.
//!
//! Fixtures are a positional list of `(account id, private key)` pairs kept
//! outside the code. Steps address them by index, so the order of the file is
//! part of its contract.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    hbar::Hbar,
    id::{AccountId, IdError},
    key::{KeyError, PrivateKey},
};

/// Environment variable naming the fixture file.
pub const ACCOUNTS_ENV: &str = "LEDGER_BDD_ACCOUNTS";

/// Fixture file used when [`ACCOUNTS_ENV`] is unset.
pub const DEFAULT_ACCOUNTS_PATH: &str = "tests/data/accounts.json";

/// Errors raised while loading or reading fixtures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The fixture file could not be read.
    #[error("failed to read account fixtures from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The fixture file was not a JSON list of accounts.
    #[error("failed to parse account fixtures from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A step asked for an account the fixtures do not define.
    #[error("account fixture {index} requested but only {available} configured")]
    MissingAccount { index: usize, available: usize },
    /// A fixture's account id was malformed.
    #[error("fixture {index} has an invalid account id: {source}")]
    AccountId {
        index: usize,
        #[source]
        source: IdError,
    },
    /// A fixture's private key was malformed.
    #[error("fixture {index} has an invalid private key: {source}")]
    PrivateKey {
        index: usize,
        #[source]
        source: KeyError,
    },
}

/// One configured test account.
#[derive(Clone, Debug, Deserialize)]
pub struct AccountFixture {
    /// Account id in `shard.realm.num` form.
    pub id: String,
    /// ED25519 private key text.
    #[serde(rename = "privateKey", alias = "private_key")]
    pub private_key: String,
    /// Genesis balance in whole hbars for networks seeded from fixtures.
    #[serde(default)]
    pub hbar: Option<i64>,
}

/// Positional list of configured accounts.
#[derive(Clone, Debug, Default)]
pub struct Fixtures {
    accounts: Vec<AccountFixture>,
}

impl Fixtures {
    /// Genesis balance used when a fixture does not specify one.
    pub const DEFAULT_GENESIS_HBAR: i64 = 1_000;

    #[must_use]
    pub fn new(accounts: Vec<AccountFixture>) -> Self { Self { accounts } }

    /// Load fixtures from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse fixtures from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when `text` is not a list of accounts.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::new)
    }

    /// Load fixtures from [`ACCOUNTS_ENV`], defaulting to
    /// [`DEFAULT_ACCOUNTS_PATH`].
    ///
    /// # Errors
    ///
    /// See [`Fixtures::load`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(ACCOUNTS_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_ACCOUNTS_PATH), PathBuf::from);
        Self::load(path)
    }

    /// The fixture at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAccount`] when `index` is out of range.
    pub fn get(&self, index: usize) -> Result<&AccountFixture, ConfigError> {
        self.accounts.get(index).ok_or(ConfigError::MissingAccount {
            index,
            available: self.accounts.len(),
        })
    }

    /// Parsed `(account id, key)` for the fixture at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the fixture is missing or malformed.
    pub fn credentials(&self, index: usize) -> Result<(AccountId, PrivateKey), ConfigError> {
        let fixture = self.get(index)?;
        let account_id = fixture
            .id
            .parse::<AccountId>()
            .map_err(|source| ConfigError::AccountId { index, source })?;
        let key = PrivateKey::from_str_ed25519(&fixture.private_key)
            .map_err(|source| ConfigError::PrivateKey { index, source })?;
        Ok((account_id, key))
    }

    /// Genesis balance of the fixture at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAccount`] when `index` is out of range.
    pub fn genesis_balance(&self, index: usize) -> Result<Hbar, ConfigError> {
        Ok(Hbar::new(self.get(index)?.hbar.unwrap_or(Self::DEFAULT_GENESIS_HBAR)))
    }

    #[must_use]
    pub fn len(&self) -> usize { self.accounts.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.accounts.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &AccountFixture> { self.accounts.iter() }
}
