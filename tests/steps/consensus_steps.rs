//! Steps for topic creation and message publication.

use cucumber::{given, then, when};
use ledger_bdd::{
    Hbar,
    harness::{HbarFloor, Role, logged},
};

use crate::world::{LedgerWorld, StepResult};

#[given(regex = r"^[Aa] (first|second) account with more than (\d+) hbars$")]
async fn account_with_hbars(world: &mut LedgerWorld, role: Role, hbars: i64) -> StepResult {
    logged("account with hbars", world.use_account(role, HbarFloor::Above(Hbar::new(hbars))).await)
}

#[given(regex = r"^A (\d+) of (\d+) threshold key with the first and second account$")]
fn threshold_key(world: &mut LedgerWorld, threshold: u32, total: usize) -> StepResult {
    logged("threshold key", world.create_threshold_key(threshold, total))
}

#[when(regex = r#"^A topic is created with the memo "([^"]*)" with the first account as the submit key$"#)]
async fn topic_with_account_key(world: &mut LedgerWorld, memo: String) -> StepResult {
    logged("create topic", world.create_topic_with_actor_submit_key(&memo).await)
}

#[when(regex = r#"^A topic is created with the memo "([^"]*)" with the threshold key as the submit key$"#)]
async fn topic_with_threshold_key(world: &mut LedgerWorld, memo: String) -> StepResult {
    logged("create threshold topic", world.create_topic_with_threshold_key(&memo).await)
}

#[when(regex = r#"^The message "([^"]*)" is published to the topic$"#)]
async fn publish(world: &mut LedgerWorld, message: String) -> StepResult {
    logged("publish message", world.publish(&message).await)
}

#[then(regex = r#"^The message "([^"]*)" is received by the topic and can be printed to the console$"#)]
async fn received(world: &mut LedgerWorld, message: String) -> StepResult {
    logged("receive message", world.await_message(&message).await)
}
