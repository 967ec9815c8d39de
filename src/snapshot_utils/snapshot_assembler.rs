use crate::snapshot_utils::snapshot_merger::MergedAccounts;
use crate::token_amount::TokenAmount;
use serde::{Deserialize, Serialize};

/// The catdrop snapshot handed to the writer.
///
/// `accounts` is ordered by canonical identity so the serialized output is
/// byte-for-byte reproducible.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSnapshot {
    pub total_catdrop_amount: TokenAmount,
    pub accounts: MergedAccounts,
}

impl FinalSnapshot {
    pub fn total_allocated(&self) -> TokenAmount {
        self.accounts
            .values()
            .map(|account| account.airdrop_amount)
            .sum()
    }
}

pub fn assemble(total_supply: TokenAmount, accounts: MergedAccounts) -> FinalSnapshot {
    FinalSnapshot {
        total_catdrop_amount: total_supply,
        accounts,
    }
}
