use crate::snapshot_utils::reward_allocator::AllocationPool;
use crate::snapshot_utils::snapshot_assembler::FinalSnapshot;
use crate::token_amount::TokenAmount;
use std::fmt;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AllocationSummary {
    pub total_accounts: usize,
    pub staking_rewards: u64,
    pub bonus_rewards: u64,
    pub base_reward: TokenAmount,
    pub average_reward: TokenAmount,
    pub total_allocated: TokenAmount,
    pub unallocated: TokenAmount,
}

impl AllocationSummary {
    pub fn new(snapshot: &FinalSnapshot, pool: &AllocationPool) -> Self {
        let total_allocated = snapshot.total_allocated();
        Self {
            total_accounts: snapshot.accounts.len(),
            staking_rewards: pool.units.staking,
            bonus_rewards: pool.units.bonus,
            base_reward: pool.base_reward,
            average_reward: snapshot
                .total_catdrop_amount
                .checked_quo(snapshot.accounts.len() as u64)
                .unwrap_or_default(),
            total_allocated,
            unallocated: snapshot.total_catdrop_amount.saturating_sub(total_allocated),
        }
    }
}

impl fmt::Display for AllocationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== CoolCat Catdrop Generator ===")?;
        writeln!(f, "Total Accounts: {}", self.total_accounts)?;
        writeln!(f, "---------")?;
        writeln!(f, "Staking Rewards: {}", self.staking_rewards)?;
        writeln!(f, "Outside-Top20 Staking Rewards: {}", self.bonus_rewards)?;
        writeln!(f, "---------")?;
        writeln!(f, "Reward Amount: {} $CCAT", self.base_reward.display_tokens())?;
        writeln!(
            f,
            "Average Reward Amount: {} $CCAT",
            self.average_reward.display_tokens()
        )?;
        write!(f, "Unallocated Remainder: {} uccat", self.unallocated)
    }
}
