use crate::error::{SnapshotError, SnapshotResult};
use crate::snapshot_utils::snapshot_merger::{MergedAccount, MergedAccounts};
use crate::token_amount::TokenAmount;

/// 3.500.000.000 CCAT in uccat (1 CCAT = 1e6 uccat)
pub const DEFAULT_TOTAL_SUPPLY: TokenAmount = TokenAmount::new(3_500_000_000_000_000);

/// Reward unit tally over the merged accounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardUnits {
    pub staking: u64,
    pub bonus: u64,
}

impl RewardUnits {
    pub fn count(accounts: &MergedAccounts) -> Self {
        accounts
            .values()
            .fold(RewardUnits::default(), |mut units, account| {
                units.staking += account.staking_units();
                units.bonus += account.bonus_units();
                units
            })
    }

    pub fn total(&self) -> u64 {
        self.staking + self.bonus
    }
}

/// Total supply and the per-unit reward derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationPool {
    pub total_supply: TokenAmount,
    pub units: RewardUnits,
    pub base_reward: TokenAmount,
}

impl AllocationPool {
    /// `base_reward = floor(total_supply / units)`. The remainder stays
    /// unallocated.
    pub fn new(total_supply: TokenAmount, units: RewardUnits) -> SnapshotResult<Self> {
        let base_reward = total_supply
            .checked_quo(units.total())
            .ok_or(SnapshotError::NoEligibleRewardUnits)?;
        Ok(Self {
            total_supply,
            units,
            base_reward,
        })
    }

    pub fn reward_for(&self, account: &MergedAccount) -> TokenAmount {
        self.base_reward.times(account.reward_units())
    }

    pub fn remainder(&self) -> TokenAmount {
        self.total_supply
            .checked_rem(self.units.total())
            .unwrap_or(self.total_supply)
    }
}

/// Fills `airdrop_amount` of every account and returns the pool used.
pub fn allocate(
    accounts: &mut MergedAccounts,
    total_supply: TokenAmount,
) -> SnapshotResult<AllocationPool> {
    let units = RewardUnits::count(accounts);
    let pool = AllocationPool::new(total_supply, units)?;

    for account in accounts.values_mut() {
        account.airdrop_amount = pool.reward_for(account);
    }

    tracing::info!(
        "allocated {} over {} staking and {} bonus units, base reward {}",
        total_supply,
        units.staking,
        units.bonus,
        pool.base_reward
    );

    Ok(pool)
}
