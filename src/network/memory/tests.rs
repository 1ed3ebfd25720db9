//! Tests for the in-memory ledger rules.

use std::time::Duration;

use rstest::rstest;

use super::{FeeSchedule, InMemoryNetwork};
use crate::{
    Hbar,
    KeyList,
    LedgerError,
    Network,
    Status,
    TokenAssociateTransaction,
    TokenCreateTransaction,
    TokenMintTransaction,
    TokenSupplyType,
    TopicCreateTransaction,
    TopicInfoQuery,
    TopicMessageSubmitTransaction,
    TransferTransaction,
    id::TokenId,
    query::{AccountBalanceQuery, TokenInfoQuery},
    test_util::{GENESIS, Party, TestLedger, ledger, ledger_with},
    transaction::{SignaturePair, SignedTransaction},
};

async fn create_token(treasury: &Party, supply_key: bool, supply_type: TokenSupplyType, max: u64) -> TokenId {
    let mut tx = TokenCreateTransaction::new()
        .token_name("Test Token")
        .token_symbol("HTT")
        .initial_supply(1000)
        .treasury_account_id(treasury.account_id)
        .admin_key(treasury.key.public_key())
        .supply_type(supply_type)
        .max_supply(max);
    if supply_key {
        tx = tx.supply_key(treasury.key.public_key());
    }
    let response = tx
        .freeze_with(&treasury.client)
        .expect("freeze")
        .sign(&treasury.key)
        .execute(&treasury.client)
        .await
        .expect("execute");
    response
        .get_receipt(&treasury.client)
        .await
        .expect("receipt")
        .token_id
        .expect("token id")
}

async fn associate(party: &Party, token_id: TokenId) -> Result<(), LedgerError> {
    TokenAssociateTransaction::new()
        .account_id(party.account_id)
        .token_ids([token_id])
        .freeze_with(&party.client)?
        .execute(&party.client)
        .await?
        .get_receipt(&party.client)
        .await
        .map(|_| ())
}

fn receipt_status(result: Result<impl Sized, LedgerError>) -> Option<Status> {
    match result {
        Err(LedgerError::ReceiptStatus { status, .. }) => Some(status),
        _ => None,
    }
}

#[rstest]
#[tokio::test]
async fn messages_are_numbered_in_consensus_order(ledger: TestLedger) {
    let alice = ledger.party(0);
    let topic_id = TopicCreateTransaction::new()
        .topic_memo("rides")
        .submit_key(alice.key.public_key())
        .freeze_with(&alice.client)
        .expect("freeze")
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt(&alice.client)
        .await
        .expect("receipt")
        .topic_id
        .expect("topic id");

    for (expected, text) in [(1, "first"), (2, "second")] {
        let receipt = TopicMessageSubmitTransaction::new()
            .topic_id(topic_id)
            .message(text)
            .freeze_with(&alice.client)
            .expect("freeze")
            .execute(&alice.client)
            .await
            .expect("execute")
            .get_receipt(&alice.client)
            .await
            .expect("receipt");
        assert_eq!(receipt.topic_sequence_number, expected);
        assert!(receipt.topic_running_hash.is_some());
    }

    let info = TopicInfoQuery::new()
        .topic_id(topic_id)
        .execute(&alice.client)
        .await
        .expect("topic info");
    assert_eq!(info.sequence_number, 2);
    assert_eq!(info.topic_memo, "rides");
}

#[rstest]
#[tokio::test]
async fn threshold_submit_key_rejects_outsiders(ledger: TestLedger) {
    let (alice, bob, carol) = (ledger.party(0), ledger.party(1), ledger.party(2));
    let key = KeyList::threshold(1, [alice.key.public_key(), bob.key.public_key()]).expect("threshold");
    let topic_id = TopicCreateTransaction::new()
        .submit_key(key)
        .freeze_with(&alice.client)
        .expect("freeze")
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt(&alice.client)
        .await
        .expect("receipt")
        .topic_id
        .expect("topic id");

    let submit = |party: &Party| {
        TopicMessageSubmitTransaction::new()
            .topic_id(topic_id)
            .message("hello")
            .freeze_with(&party.client)
            .expect("freeze")
    };
    let rejected = submit(carol)
        .execute(&carol.client)
        .await
        .expect("execute")
        .get_receipt(&carol.client)
        .await;
    assert_eq!(receipt_status(rejected), Some(Status::InvalidSignature));

    let accepted = submit(bob)
        .execute(&bob.client)
        .await
        .expect("execute")
        .get_receipt(&bob.client)
        .await
        .expect("receipt");
    assert_eq!(accepted.topic_sequence_number, 1);
}

#[rstest]
#[tokio::test]
async fn minting_without_supply_key_fails_but_is_charged(ledger: TestLedger) {
    let alice = ledger.party(0);
    let token_id = create_token(alice, false, TokenSupplyType::Infinite, 0).await;
    let fees = FeeSchedule::default();

    let result = TokenMintTransaction::new()
        .token_id(token_id)
        .amount(100)
        .freeze_with(&alice.client)
        .expect("freeze")
        .sign(&alice.key)
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt(&alice.client)
        .await;
    assert_eq!(receipt_status(result), Some(Status::TokenHasNoSupplyKey));

    let balance = AccountBalanceQuery::new()
        .account_id(alice.account_id)
        .execute(&alice.client)
        .await
        .expect("balance");
    let spent = fees.token_create + fees.token_mint;
    assert_eq!(balance.hbars, GENESIS.checked_sub(spent).expect("no underflow"));
    assert_eq!(balance.token(&token_id), 1000);
}

#[rstest]
#[tokio::test]
async fn finite_supply_is_capped(ledger: TestLedger) {
    let alice = ledger.party(0);
    let token_id = create_token(alice, true, TokenSupplyType::Finite, 1050).await;
    let mint = |amount| {
        TokenMintTransaction::new()
            .token_id(token_id)
            .amount(amount)
            .freeze_with(&alice.client)
            .expect("freeze")
            .sign(&alice.key)
    };

    let ok = mint(50)
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt(&alice.client)
        .await
        .expect("receipt");
    assert_eq!(ok.total_supply, 1050);

    let capped = mint(1)
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt(&alice.client)
        .await;
    assert_eq!(receipt_status(capped), Some(Status::TokenMaxSupplyReached));
}

#[rstest]
#[case(TokenSupplyType::Finite, 0, Status::InvalidTokenMaxSupply)]
#[case(TokenSupplyType::Finite, 999, Status::InvalidTokenInitialSupply)]
#[case(TokenSupplyType::Infinite, 5000, Status::InvalidTokenMaxSupply)]
#[tokio::test]
async fn rejects_inconsistent_supply_settings(
    ledger: TestLedger,
    #[case] supply_type: TokenSupplyType,
    #[case] max_supply: u64,
    #[case] expected: Status,
) {
    let alice = ledger.party(0);
    let result = TokenCreateTransaction::new()
        .token_name("Test Token")
        .token_symbol("HTT")
        .initial_supply(1000)
        .treasury_account_id(alice.account_id)
        .supply_type(supply_type)
        .max_supply(max_supply)
        .freeze_with(&alice.client)
        .expect("freeze")
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt(&alice.client)
        .await;
    assert_eq!(receipt_status(result), Some(expected));
}

async fn hbars_left(party: &Party) -> Hbar {
    AccountBalanceQuery::new()
        .account_id(party.account_id)
        .execute(&party.client)
        .await
        .expect("balance")
        .hbars
}

#[rstest]
#[case(0, Status::InvalidTopicMessage)]
#[case(1025, Status::MessageSizeTooLarge)]
#[case(1024, Status::Success)]
#[case(1, Status::Success)]
#[tokio::test]
async fn message_size_is_bounded_and_always_charged(
    ledger: TestLedger,
    #[case] size: usize,
    #[case] expected: Status,
) {
    let alice = ledger.party(0);
    let fees = FeeSchedule::default();
    let topic_id = TopicCreateTransaction::new()
        .freeze_with(&alice.client)
        .expect("freeze")
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt(&alice.client)
        .await
        .expect("receipt")
        .topic_id
        .expect("topic id");

    let receipt = TopicMessageSubmitTransaction::new()
        .topic_id(topic_id)
        .message(vec![b'x'; size])
        .freeze_with(&alice.client)
        .expect("freeze")
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt_unchecked(&alice.client)
        .await
        .expect("receipt");
    assert_eq!(receipt.status, expected);

    let info = TopicInfoQuery::new()
        .topic_id(topic_id)
        .execute(&alice.client)
        .await
        .expect("topic info");
    assert_eq!(info.sequence_number, u64::from(expected == Status::Success));
    let spent = fees.topic_create + fees.topic_message_submit;
    assert_eq!(hbars_left(alice).await, GENESIS.checked_sub(spent).expect("no underflow"));
}

#[rstest]
#[case(false, Status::InvalidSignature)]
#[case(true, Status::Success)]
#[tokio::test]
async fn topic_admin_key_must_sign_creation(
    ledger: TestLedger,
    #[case] admin_signs: bool,
    #[case] expected: Status,
) {
    let (alice, bob) = (ledger.party(0), ledger.party(1));
    let fees = FeeSchedule::default();
    let mut frozen = TopicCreateTransaction::new()
        .admin_key(bob.key.public_key())
        .freeze_with(&alice.client)
        .expect("freeze");
    if admin_signs {
        frozen = frozen.sign(&bob.key);
    }
    let receipt = frozen
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt_unchecked(&alice.client)
        .await
        .expect("receipt");
    assert_eq!(receipt.status, expected);
    assert_eq!(receipt.topic_id.is_some(), admin_signs);
    assert_eq!(
        hbars_left(alice).await,
        GENESIS.checked_sub(fees.topic_create).expect("no underflow")
    );
    assert_eq!(hbars_left(bob).await, GENESIS);
}

#[rstest]
#[case("", "HTT", true, Status::MissingTokenName)]
#[case("   ", "HTT", true, Status::MissingTokenName)]
#[case("Test Token", "", true, Status::MissingTokenSymbol)]
#[case("Test Token", " ", true, Status::MissingTokenSymbol)]
#[case("Test Token", "HTT", false, Status::InvalidSignature)]
#[tokio::test]
async fn token_creation_needs_name_symbol_and_treasury_signature(
    ledger: TestLedger,
    #[case] name: &str,
    #[case] symbol: &str,
    #[case] treasury_signs: bool,
    #[case] expected: Status,
) {
    let (alice, bob) = (ledger.party(0), ledger.party(1));
    let fees = FeeSchedule::default();
    let mut frozen = TokenCreateTransaction::new()
        .token_name(name)
        .token_symbol(symbol)
        .initial_supply(1000)
        .treasury_account_id(bob.account_id)
        .freeze_with(&alice.client)
        .expect("freeze");
    if treasury_signs {
        frozen = frozen.sign(&bob.key);
    }
    let result = frozen
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt(&alice.client)
        .await;
    assert_eq!(receipt_status(result), Some(expected));
    assert_eq!(
        hbars_left(alice).await,
        GENESIS.checked_sub(fees.token_create).expect("no underflow")
    );
    assert_eq!(hbars_left(bob).await, GENESIS);
}

#[rstest]
#[tokio::test]
async fn associating_twice_is_reported(ledger: TestLedger) {
    let (alice, bob) = (ledger.party(0), ledger.party(1));
    let token_id = create_token(alice, true, TokenSupplyType::Infinite, 0).await;
    associate(bob, token_id).await.expect("first association");
    let again = associate(bob, token_id).await;
    assert_eq!(receipt_status(again), Some(Status::TokenAlreadyAssociatedToAccount));
    let treasury = associate(alice, token_id).await;
    assert_eq!(receipt_status(treasury), Some(Status::TokenAlreadyAssociatedToAccount));
}

#[rstest]
#[tokio::test]
async fn token_transfers_enforce_ledger_rules(ledger: TestLedger) {
    let (alice, bob, carol) = (ledger.party(0), ledger.party(1), ledger.party(2));
    let token_id = create_token(alice, true, TokenSupplyType::Infinite, 0).await;
    associate(bob, token_id).await.expect("associate bob");

    let transfer = |from: &Party, to: &Party, debit: i64, credit: i64| {
        TransferTransaction::new()
            .token_transfer(token_id, from.account_id, -debit)
            .token_transfer(token_id, to.account_id, credit)
            .freeze_with(&alice.client)
            .expect("freeze")
    };
    let outcome = |tx: crate::FrozenTransaction| async move {
        let response = tx.execute(&alice.client).await.expect("execute");
        response.get_receipt(&alice.client).await
    };

    let unbalanced = outcome(transfer(alice, bob, 10, 9)).await;
    assert_eq!(receipt_status(unbalanced), Some(Status::TransfersNotZeroSumForToken));

    let unassociated = outcome(transfer(alice, carol, 10, 10)).await;
    assert_eq!(receipt_status(unassociated), Some(Status::TokenNotAssociatedToAccount));

    let unsigned = outcome(transfer(bob, alice, 1, 1)).await;
    assert_eq!(receipt_status(unsigned), Some(Status::InvalidSignature));

    let overdrawn = outcome(transfer(bob, alice, 1, 1).sign(&bob.key)).await;
    assert_eq!(receipt_status(overdrawn), Some(Status::InsufficientTokenBalance));

    let tx = transfer(alice, bob, 10, 10);
    let transaction_id = tx.transaction_id();
    outcome(tx).await.expect("transfer succeeds");
    let record = crate::TransactionRecordQuery::new()
        .transaction_id(transaction_id)
        .execute(&alice.client)
        .await
        .expect("record");
    assert_eq!(record.transaction_id.account_id, alice.account_id);
    assert_eq!(record.token_transfers.len(), 2);
    let balance = |party: &Party| {
        let client = alice.client.clone();
        let account_id = party.account_id;
        async move {
            AccountBalanceQuery::new()
                .account_id(account_id)
                .execute(&client)
                .await
                .expect("balance")
                .token(&token_id)
        }
    };
    assert_eq!(balance(alice).await, 990);
    assert_eq!(balance(bob).await, 10);
}

#[rstest]
#[tokio::test]
async fn hbar_transfers_must_balance(ledger: TestLedger) {
    let (alice, bob) = (ledger.party(0), ledger.party(1));
    let result = TransferTransaction::new()
        .hbar_transfer(alice.account_id, Hbar::new(-2))
        .hbar_transfer(bob.account_id, Hbar::new(1))
        .freeze_with(&alice.client)
        .expect("freeze")
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt(&alice.client)
        .await;
    assert_eq!(receipt_status(result), Some(Status::InvalidAccountAmounts));

    TransferTransaction::new()
        .hbar_transfer(alice.account_id, Hbar::new(-2))
        .hbar_transfer(bob.account_id, Hbar::new(2))
        .freeze_with(&alice.client)
        .expect("freeze")
        .execute(&alice.client)
        .await
        .expect("execute")
        .get_receipt(&alice.client)
        .await
        .expect("receipt");
    let bob_balance = AccountBalanceQuery::new()
        .account_id(bob.account_id)
        .execute(&bob.client)
        .await
        .expect("balance");
    assert_eq!(bob_balance.hbars, GENESIS + Hbar::new(2));
}

#[rstest]
#[tokio::test]
async fn precheck_rejects_missing_payer_signature_and_duplicates(ledger: TestLedger) {
    let (alice, bob) = (ledger.party(0), ledger.party(1));
    let tx = TopicCreateTransaction::new().freeze_with(&alice.client).expect("freeze");

    let unsigned = tx.clone().execute(&bob.client).await;
    assert!(matches!(
        unsigned,
        Err(LedgerError::Precheck { status: Status::InvalidSignature, .. })
    ));

    tx.clone().execute(&alice.client).await.expect("first submission");
    let duplicate = tx.execute(&alice.client).await;
    assert!(matches!(
        duplicate,
        Err(LedgerError::Precheck { status: Status::DuplicateTransaction, .. })
    ));
}

#[rstest]
#[tokio::test]
async fn precheck_rejects_forged_signatures(ledger: TestLedger) {
    let alice = ledger.party(0);
    let tx = TopicCreateTransaction::new().freeze_with(&alice.client).expect("freeze");
    let body_bytes = tx.body().to_bytes().expect("encode");
    let forged = SignedTransaction {
        body_bytes,
        signatures: vec![SignaturePair {
            public_key: alice.key.public_key(),
            signature: alice.key.sign(b"something else"),
        }],
    };
    let result = ledger.network.submit(forged).await;
    assert_eq!(result.err().and_then(|e| e.status()), Some(Status::InvalidSignature));
}

#[tokio::test]
async fn precheck_rejects_payers_who_cannot_cover_the_fee() {
    let fees = FeeSchedule {
        topic_create: crate::test_util::GENESIS + Hbar::new(1),
        ..FeeSchedule::default()
    };
    let ledger = ledger_with(1, InMemoryNetwork::builder().fee_schedule(fees));
    let alice = ledger.party(0);
    let result = TopicCreateTransaction::new()
        .max_transaction_fee(Hbar::new(1_000))
        .freeze_with(&alice.client)
        .expect("freeze")
        .execute(&alice.client)
        .await;
    assert_eq!(result.err().and_then(|e| e.status()), Some(Status::InsufficientPayerBalance));

    let capped = TopicCreateTransaction::new()
        .max_transaction_fee(Hbar::new(1))
        .freeze_with(&alice.client)
        .expect("freeze")
        .execute(&alice.client)
        .await;
    assert_eq!(capped.err().and_then(|e| e.status()), Some(Status::InsufficientTxFee));
}

#[tokio::test(start_paused = true)]
async fn receipts_are_withheld_until_the_consensus_delay_passes() {
    let ledger = ledger_with(1, InMemoryNetwork::builder().consensus_delay(Duration::from_secs(2)));
    let alice = ledger.party(0);
    let response = TopicCreateTransaction::new()
        .freeze_with(&alice.client)
        .expect("freeze")
        .execute(&alice.client)
        .await
        .expect("execute");

    let pending = ledger.network.receipt(&response.transaction_id).await.expect("known id");
    assert!(pending.is_none());
    tokio::time::advance(Duration::from_secs(2)).await;
    let ready = ledger.network.receipt(&response.transaction_id).await.expect("known id");
    assert_eq!(ready.map(|r| r.status), Some(Status::Success));
}

#[rstest]
#[tokio::test]
async fn queries_report_unknown_entities(ledger: TestLedger) {
    let alice = ledger.party(0);
    let missing = TokenInfoQuery::new()
        .token_id(TokenId::new(0, 0, 9))
        .execute(&alice.client)
        .await;
    assert!(matches!(missing, Err(LedgerError::Query(Status::InvalidTokenId))));
}
