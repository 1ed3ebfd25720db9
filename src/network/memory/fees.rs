//! Flat per-kind transaction fees.

use crate::{hbar::Hbar, transaction::TransactionKind};

/// Fee charged to the payer of each transaction kind.
///
/// Defaults approximate the public testnet's USD-pegged prices at a nominal
/// exchange rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSchedule {
    pub topic_create: Hbar,
    pub topic_message_submit: Hbar,
    pub token_create: Hbar,
    pub token_mint: Hbar,
    pub token_associate: Hbar,
    pub transfer: Hbar,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            topic_create: Hbar::from_tinybars(1_000_000),
            topic_message_submit: Hbar::from_tinybars(10_000),
            token_create: Hbar::new(1),
            token_mint: Hbar::from_tinybars(100_000),
            token_associate: Hbar::from_tinybars(5_000_000),
            transfer: Hbar::from_tinybars(100_000),
        }
    }
}

impl FeeSchedule {
    /// A schedule charging nothing.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            topic_create: Hbar::ZERO,
            topic_message_submit: Hbar::ZERO,
            token_create: Hbar::ZERO,
            token_mint: Hbar::ZERO,
            token_associate: Hbar::ZERO,
            transfer: Hbar::ZERO,
        }
    }

    #[must_use]
    pub const fn fee_for(&self, kind: TransactionKind) -> Hbar {
        match kind {
            TransactionKind::TopicCreate => self.topic_create,
            TransactionKind::TopicMessageSubmit => self.topic_message_submit,
            TransactionKind::TokenCreate => self.token_create,
            TransactionKind::TokenMint => self.token_mint,
            TransactionKind::TokenAssociate => self.token_associate,
            TransactionKind::Transfer => self.transfer,
        }
    }
}
