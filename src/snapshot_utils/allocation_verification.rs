use crate::chain_account::Chain;
use crate::snapshot_utils::reward_allocator::AllocationPool;
use crate::snapshot_utils::snapshot_assembler::FinalSnapshot;
use anyhow::anyhow;
use itertools::Itertools;

/// Re-checks an assembled snapshot against the pool it was allocated from
/// before anything is written out.
pub fn verify_allocation(snapshot: &FinalSnapshot, pool: &AllocationPool) -> anyhow::Result<()> {
    if snapshot.total_catdrop_amount != pool.total_supply {
        return Err(anyhow!(
            "snapshot supply {} differs from pool supply {}",
            snapshot.total_catdrop_amount,
            pool.total_supply
        ));
    }

    for chain in Chain::MERGE_ORDER {
        let addresses = snapshot
            .accounts
            .values()
            .map(|account| account.native_address(chain))
            .filter(|address| !address.is_empty());
        if !addresses.clone().all_unique() {
            let duplicate = addresses.duplicates().next().unwrap_or_default();
            return Err(anyhow!(
                "{} address {} belongs to more than one account",
                chain,
                duplicate
            ));
        }
    }

    for (identity, account) in snapshot.accounts.iter() {
        let expected = pool.reward_for(account);
        if account.airdrop_amount != expected {
            return Err(anyhow!(
                "{} reward is {}, expected {}",
                identity,
                account.airdrop_amount,
                expected
            ));
        }
    }

    let total = snapshot.total_allocated();
    if total > pool.total_supply {
        return Err(anyhow!(
            "allocated {} exceeds supply {}",
            total,
            pool.total_supply
        ));
    }
    let remainder = pool.total_supply.saturating_sub(total);
    if remainder.get() >= pool.units.total() as u128 {
        return Err(anyhow!(
            "unallocated remainder {} is not below {} reward units",
            remainder,
            pool.units.total()
        ));
    }

    Ok(())
}
