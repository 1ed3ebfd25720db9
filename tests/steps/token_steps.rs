//! Steps for creating and minting tokens with a single account.

use cucumber::{given, then, when};
use ledger_bdd::{
    Hbar,
    harness::{HbarFloor, Role, logged},
};

use crate::world::{LedgerWorld, StepResult};

#[given(regex = r"^A Hedera account with more than (\d+) hbar$")]
async fn account(world: &mut LedgerWorld, hbars: i64) -> StepResult {
    logged("account with hbar", world.use_account(Role::First, HbarFloor::Above(Hbar::new(hbars))).await)
}

#[when(regex = r"^I create a token named Test Token \(HTT\)$")]
async fn create_token(world: &mut LedgerWorld) -> StepResult {
    logged("create token", world.create_mintable_token().await)
}

#[when(regex = r"^I create a fixed supply token named Test Token \(HTT\) with (\d+) tokens$")]
async fn create_fixed_token(world: &mut LedgerWorld, supply: u64) -> StepResult {
    logged("create fixed supply token", world.create_fixed_token(supply).await)
}

#[then(regex = r#"^The token has the name "([^"]*)"$"#)]
async fn token_name(world: &mut LedgerWorld, name: String) -> StepResult {
    logged("token name", world.check_name(&name).await)
}

#[then(regex = r#"^The token has the symbol "([^"]*)"$"#)]
async fn token_symbol(world: &mut LedgerWorld, symbol: String) -> StepResult {
    logged("token symbol", world.check_symbol(&symbol).await)
}

#[then(regex = r"^The token has (\d+) decimals$")]
async fn token_decimals(world: &mut LedgerWorld, decimals: u32) -> StepResult {
    logged("token decimals", world.check_decimals(decimals).await)
}

#[then(regex = r"^The token is owned by the account$")]
async fn token_owner(world: &mut LedgerWorld) -> StepResult {
    logged("token owner", world.check_owned_by_actor().await)
}

#[then(regex = r"^An attempt to mint (\d+) additional tokens succeeds$")]
async fn mint_succeeds(world: &mut LedgerWorld, amount: u64) -> StepResult {
    logged("mint", world.mint_succeeds(amount).await)
}

#[then(regex = r"^The total supply of the token is (\d+)$")]
async fn total_supply(world: &mut LedgerWorld, supply: u64) -> StepResult {
    logged("total supply", world.check_total_supply(supply).await)
}

#[then(regex = r"^An attempt to mint tokens fails$")]
async fn mint_fails(world: &mut LedgerWorld) -> StepResult {
    logged("mint rejected", world.mint_fails().await)
}
