//! Steps for moving tokens between the configured accounts.

use cucumber::{given, then, when};
use ledger_bdd::{
    Hbar,
    harness::{HbarFloor, Role, logged},
};

use crate::world::{LedgerWorld, StepResult};

#[given(regex = r"^A first hedera account with more than (\d+) hbar$")]
async fn first_account(world: &mut LedgerWorld, hbars: i64) -> StepResult {
    logged("first account", world.use_account(Role::First, HbarFloor::Above(Hbar::new(hbars))).await)
}

#[given(regex = r"^A second Hedera account$")]
async fn second_account(world: &mut LedgerWorld) -> StepResult {
    logged("second account", world.check_hbar(Role::Second, HbarFloor::AtLeast(Hbar::ZERO)).await)
}

#[given(regex = r"^A token named Test Token \(HTT\) with (\d+) tokens$")]
async fn shared_token(world: &mut LedgerWorld, supply: u64) -> StepResult {
    logged("create shared token", world.create_shared_token(supply).await)
}

#[given(regex = r"^A (first|second|third|fourth) [Hh]edera account with more than (\d+) hbar and (\d+) HTT tokens$")]
async fn account_above_hbar_with_tokens(world: &mut LedgerWorld, role: Role, hbars: i64, tokens: u64) -> StepResult {
    logged("account with hbar", world.check_hbar(role, HbarFloor::Above(Hbar::new(hbars))).await)?;
    logged("account with tokens", world.hold_tokens(role, tokens).await)
}

#[given(regex = r"^A (first|second|third|fourth) [Hh]edera account with (\d+) hbar and (\d+) HTT tokens$")]
async fn account_with_tokens(world: &mut LedgerWorld, role: Role, hbars: i64, tokens: u64) -> StepResult {
    logged("account with hbar", world.check_hbar(role, HbarFloor::AtLeast(Hbar::new(hbars))).await)?;
    logged("account with tokens", world.hold_tokens(role, tokens).await)
}

#[given(regex = r"^The (first|second|third|fourth) account holds (\d+) HTT tokens$")]
async fn holds(world: &mut LedgerWorld, role: Role, amount: u64) -> StepResult {
    logged("set token balance", world.hold_tokens(role, amount).await)
}

#[when(regex = r"^The (first|second) account creates a transaction to transfer (\d+) HTT tokens to the (first|second) account$")]
fn create_transfer(world: &mut LedgerWorld, from: Role, amount: i64, to: Role) -> StepResult {
    logged("create transfer", world.prepare_transfer(from, to, amount))
}

#[when(regex = r"^A transaction is created to transfer (\d+) HTT tokens out of the first and second account and (\d+) HTT tokens into the third account and (\d+) HTT tokens into the fourth account$")]
fn create_multi_party_transfer(world: &mut LedgerWorld, out: i64, third: i64, fourth: i64) -> StepResult {
    logged("create multi-party transfer", world.prepare_multi_party_transfer(out, third, fourth))
}

#[when(regex = r"^The (first|second) account submits the transaction$")]
async fn submit(world: &mut LedgerWorld, role: Role) -> StepResult {
    logged("submit transaction", world.submit(role).await)
}

#[then(regex = r"^The (first|second|third|fourth) account holds (\d+) HTT tokens$")]
async fn check_holds(world: &mut LedgerWorld, role: Role, amount: u64) -> StepResult {
    logged("token balance", world.check_holds(role, amount).await)
}

#[then(regex = r"^The (first|second) account has paid for the transaction fee$")]
async fn paid_fee(world: &mut LedgerWorld, role: Role) -> StepResult {
    logged("fee payer", world.check_paid_fee(role).await)
}
