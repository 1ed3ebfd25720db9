//! Shared fixtures for unit tests.

use std::sync::Arc;

use rstest::fixture;

use crate::{
    client::Client,
    hbar::Hbar,
    id::AccountId,
    key::PrivateKey,
    network::{InMemoryNetwork, InMemoryNetworkBuilder, Network},
};

/// Genesis balance of every test account.
pub(crate) const GENESIS: Hbar = Hbar::new(100);

/// An account together with a client it operates.
#[derive(Clone, Debug)]
pub(crate) struct Party {
    pub account_id: AccountId,
    pub key: PrivateKey,
    pub client: Client,
}

#[derive(Debug)]
pub(crate) struct TestLedger {
    pub network: Arc<InMemoryNetwork>,
    pub parties: Vec<Party>,
}

impl TestLedger {
    pub(crate) fn party(&self, index: usize) -> &Party { &self.parties[index] }
}

/// `count` funded accounts on a network configured by `builder`.
pub(crate) fn ledger_with(count: u64, builder: InMemoryNetworkBuilder) -> TestLedger {
    let keys: Vec<(AccountId, PrivateKey)> = (0..count)
        .map(|i| (AccountId::new(0, 0, 1001 + i), PrivateKey::generate()))
        .collect();
    let builder = keys
        .iter()
        .fold(builder, |b, (id, key)| b.account(*id, key.public_key(), GENESIS));
    let network = Arc::new(builder.build());
    let shared: Arc<dyn Network> = network.clone();
    let parties = keys
        .into_iter()
        .map(|(account_id, key)| {
            let mut client = Client::for_network(shared.clone());
            client.set_operator(account_id, key.clone());
            Party {
                account_id,
                key,
                client,
            }
        })
        .collect();
    TestLedger { network, parties }
}

#[fixture]
pub(crate) fn ledger() -> TestLedger { ledger_with(3, InMemoryNetwork::builder()) }
