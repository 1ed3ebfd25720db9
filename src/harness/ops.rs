//! Transaction sequences shared by several steps.

use tracing::info;

use super::{Participant, Role, Roster, StepError};
use crate::{
    client::ClientError,
    error::Result,
    hbar::Hbar,
    id::{AccountId, TokenId},
    query::AccountBalanceQuery,
    status::Status,
    transaction::{TokenAssociateTransaction, TransactionReceipt, TransferTransaction},
};

/// Associate `token_id` with the participant's account.
///
/// An existing association counts as success.
///
/// # Errors
///
/// Propagates any other precheck or receipt failure.
pub async fn associate_token(participant: &Participant, token_id: TokenId) -> Result<()> {
    let client = &participant.client;
    let outcome = TokenAssociateTransaction::new()
        .account_id(participant.account_id)
        .token_ids([token_id])
        .freeze_with(client)?
        .sign(&participant.private_key)
        .execute(client)
        .await?
        .get_receipt(client)
        .await;
    match outcome {
        Ok(receipt) => {
            info!(account_id = %participant.account_id, %token_id, status = %receipt.status, "token associated");
            Ok(())
        }
        Err(e) if e.status() == Some(Status::TokenAlreadyAssociatedToAccount) => {
            info!(account_id = %participant.account_id, %token_id, "token already associated");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Move `amount` of `token_id` from `sender` to `recipient`, paid for and
/// signed by the sender.
///
/// # Errors
///
/// Returns [`ClientError::AmountOutOfRange`] for amounts above `i64::MAX`
/// and propagates precheck or receipt failures.
pub async fn transfer_tokens(
    sender: &Participant,
    recipient: AccountId,
    token_id: TokenId,
    amount: u64,
) -> Result<TransactionReceipt> {
    let signed = i64::try_from(amount).map_err(|_| ClientError::AmountOutOfRange(amount))?;
    let client = &sender.client;
    let receipt = TransferTransaction::new()
        .token_transfer(token_id, sender.account_id, -signed)
        .token_transfer(token_id, recipient, signed)
        .freeze_with(client)?
        .sign(&sender.private_key)
        .execute(client)
        .await?
        .get_receipt(client)
        .await?;
    info!(from = %sender.account_id, to = %recipient, %token_id, amount, status = %receipt.status, "tokens transferred");
    Ok(receipt)
}

/// The participant's hbar balance.
///
/// # Errors
///
/// Propagates query failures.
pub async fn hbar_balance(participant: &Participant) -> Result<Hbar> {
    let balance = AccountBalanceQuery::new()
        .account_id(participant.account_id)
        .execute(&participant.client)
        .await?;
    Ok(balance.hbars)
}

/// The participant's balance of `token_id`.
///
/// # Errors
///
/// Propagates query failures.
pub async fn token_balance(participant: &Participant, token_id: TokenId) -> Result<u64> {
    let balance = AccountBalanceQuery::new()
        .account_id(participant.account_id)
        .execute(&participant.client)
        .await?;
    Ok(balance.token(&token_id))
}

/// Move tokens until the account playing `role` holds exactly `target`.
///
/// Excess tokens go to the reserve account. A shortfall is drawn from the
/// reserve when it holds enough and from the treasury otherwise, so earlier
/// adjustments in a scenario do not drain the treasury. The treasury itself
/// can only be topped up from the reserve.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when the treasury needs more tokens than
/// the reserve holds, and propagates transfer failures such as an
/// insufficient treasury balance.
pub async fn ensure_token_balance(
    roster: &Roster,
    role: Role,
    token_id: TokenId,
    target: u64,
) -> std::result::Result<(), StepError> {
    let participant = roster.get(role);
    let reserve = if role == Role::Reserve {
        roster.treasury()
    } else {
        roster.get(Role::Reserve)
    };
    let current = token_balance(participant, token_id).await?;
    info!(%role, current, target, "adjusting token balance");
    if current < target {
        let shortfall = target - current;
        let pooled = token_balance(reserve, token_id).await?;
        let source = if pooled >= shortfall {
            reserve
        } else if role == roster.treasury_role() {
            return Err(StepError::Assertion(format!(
                "{role} account is the treasury and needs {shortfall} more tokens, but the reserve holds only {pooled}"
            )));
        } else {
            roster.treasury()
        };
        transfer_tokens(source, participant.account_id, token_id, shortfall).await?;
    } else if current > target {
        transfer_tokens(participant, reserve.account_id, token_id, current - target).await?;
    }
    Ok(())
}
