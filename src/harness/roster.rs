//! Scenario roles and the accounts that play them.

use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    client::Client,
    config::{ConfigError, Fixtures},
    id::AccountId,
    key::{PrivateKey, PublicKey},
    network::Network,
};

/// Scenario tag selecting the second account as treasury.
pub const RECIPIENT_PAYS_TAG: &str = "recipient_pays";

/// A role an account plays in a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    First,
    Second,
    Third,
    Fourth,
    /// Holds tokens the treasury must shed to reach a target balance.
    Reserve,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::First, Role::Second, Role::Third, Role::Fourth, Role::Reserve];

    /// Position of the role's account in the fixture list.
    #[must_use]
    pub const fn fixture_index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
            Self::Fourth => 3,
            Self::Reserve => 4,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Reserve => "reserve",
        })
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| s.trim().eq_ignore_ascii_case(&role.to_string()))
            .ok_or_else(|| format!("unknown account role {s:?}"))
    }
}

/// A configured account and the client it operates.
#[derive(Clone, Debug)]
pub struct Participant {
    pub role: Role,
    pub account_id: AccountId,
    pub private_key: PrivateKey,
    pub client: Client,
}

impl Participant {
    #[must_use]
    pub fn public_key(&self) -> PublicKey { self.private_key.public_key() }
}

/// The accounts of one scenario.
#[derive(Clone, Debug)]
pub struct Roster {
    participants: Vec<Participant>,
    treasury: Role,
}

impl Roster {
    /// Bind every [`Role`] to its fixture on `network`. The first account is
    /// treasury until [`Roster::set_treasury`] says otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a fixture is missing or malformed.
    pub fn from_fixtures(fixtures: &Fixtures, network: &Arc<dyn Network>) -> Result<Self, ConfigError> {
        let participants = Role::ALL
            .into_iter()
            .map(|role| {
                let (account_id, private_key) = fixtures.credentials(role.fixture_index())?;
                let mut client = Client::for_network(Arc::clone(network));
                client.set_operator(account_id, private_key.clone());
                Ok::<_, ConfigError>(Participant {
                    role,
                    account_id,
                    private_key,
                    client,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            participants,
            treasury: Role::First,
        })
    }

    /// Treasury role implied by a scenario's tags.
    #[must_use]
    pub fn treasury_for_tags<S: AsRef<str>>(tags: &[S]) -> Role {
        if tags.iter().any(|t| t.as_ref().trim_start_matches('@') == RECIPIENT_PAYS_TAG) {
            Role::Second
        } else {
            Role::First
        }
    }

    #[must_use]
    pub fn get(&self, role: Role) -> &Participant { &self.participants[role.fixture_index()] }

    #[must_use]
    pub fn treasury(&self) -> &Participant { self.get(self.treasury) }

    #[must_use]
    pub fn treasury_role(&self) -> Role { self.treasury }

    pub fn set_treasury(&mut self, role: Role) { self.treasury = role; }

    /// Every participant other than the treasury, reserve included.
    pub fn non_treasury(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(move |p| p.role != self.treasury)
    }
}
