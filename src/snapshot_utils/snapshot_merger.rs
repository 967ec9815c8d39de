use crate::chain_account::{Chain, ChainRecord, HuahuaAccount, HubAccount, JunoAccount};
use crate::error::SnapshotResult;
use crate::snapshot_utils::address_reencoder::{Bech32Reencoder, CanonicalIdentity};
use crate::token_amount::TokenAmount;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

/// One participant reconciled across the hub, juno and huahua snapshots.
///
/// Addresses are empty and flags false for chains that had no record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedAccount {
    pub atom_address: String,
    pub juno_address: String,
    pub huahua_address: String,
    pub atom_bonus: bool,
    pub atom_staker: bool,
    pub juno_staker: bool,
    pub huahua_staker: bool,
    pub airdrop_amount: TokenAmount,
}

impl MergedAccount {
    /// Number of staking flags set across the three chains.
    pub fn staking_units(&self) -> u64 {
        [self.atom_staker, self.juno_staker, self.huahua_staker]
            .into_iter()
            .filter(|staker| *staker)
            .count() as u64
    }

    pub fn bonus_units(&self) -> u64 {
        u64::from(self.atom_bonus)
    }

    pub fn reward_units(&self) -> u64 {
        self.staking_units() + self.bonus_units()
    }

    pub fn native_address(&self, chain: Chain) -> &str {
        match chain {
            Chain::Hub => &self.atom_address,
            Chain::Juno => &self.juno_address,
            Chain::Huahua => &self.huahua_address,
        }
    }
}

pub type MergedAccounts = BTreeMap<CanonicalIdentity, MergedAccount>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainMergeStats {
    pub chain: Chain,
    pub records: usize,
    pub created: usize,
    pub updated: usize,
    /// Records whose identity was already seen earlier in the same chain list.
    pub duplicates: usize,
}

/// Folds chain snapshots into one set keyed by canonical identity.
pub struct SnapshotMerger {
    reencoder: Bech32Reencoder,
    accounts: MergedAccounts,
}

impl SnapshotMerger {
    pub fn new(reencoder: Bech32Reencoder) -> Self {
        Self {
            reencoder,
            accounts: Default::default(),
        }
    }

    /// Adds every record of one chain. The first malformed address aborts the
    /// whole merge; nothing of that chain is applied in that case.
    pub fn add_chain<R: ChainRecord>(&mut self, records: &[R]) -> SnapshotResult<ChainMergeStats> {
        let identities = records
            .iter()
            .map(|record| self.reencoder.reencode(R::CHAIN, record.native_address()))
            .collect::<SnapshotResult<Vec<_>>>()?;

        let mut stats = ChainMergeStats {
            chain: R::CHAIN,
            records: records.len(),
            created: 0,
            updated: 0,
            duplicates: 0,
        };
        let mut seen = HashSet::<&CanonicalIdentity>::new();

        for (record, identity) in records.iter().zip(identities.iter()) {
            if !seen.insert(identity) {
                // last record wins for this chain's fields
                stats.duplicates += 1;
                tracing::warn!(
                    "duplicate {} record for {}: {}",
                    R::CHAIN,
                    identity,
                    record.native_address()
                );
            }
            match self.accounts.entry(identity.clone()) {
                Entry::Occupied(mut entry) => {
                    record.apply_to(entry.get_mut());
                    stats.updated += 1;
                    tracing::debug!("updated {} with {} record", identity, R::CHAIN);
                }
                Entry::Vacant(entry) => {
                    record.apply_to(entry.insert(MergedAccount::default()));
                    stats.created += 1;
                    tracing::debug!("created {} from {} record", identity, R::CHAIN);
                }
            }
        }

        tracing::info!(
            "merged {} snapshot: {} records, {} new accounts, {} updated, {} duplicates",
            stats.chain,
            stats.records,
            stats.created,
            stats.updated,
            stats.duplicates
        );

        Ok(stats)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, identity: &CanonicalIdentity) -> Option<&MergedAccount> {
        self.accounts.get(identity)
    }

    pub fn into_accounts(self) -> MergedAccounts {
        self.accounts
    }
}

/// Merges the three chain snapshots, always in hub, juno, huahua order.
pub fn merge(
    reencoder: Bech32Reencoder,
    hub: &[HubAccount],
    juno: &[JunoAccount],
    huahua: &[HuahuaAccount],
) -> SnapshotResult<(MergedAccounts, Vec<ChainMergeStats>)> {
    let mut merger = SnapshotMerger::new(reencoder);
    let stats = vec![
        merger.add_chain(hub)?,
        merger.add_chain(juno)?,
        merger.add_chain(huahua)?,
    ];
    Ok((merger.into_accounts(), stats))
}

#[cfg(test)]
mod tests {
    use crate::chain_account::{Chain, HuahuaAccount, HubAccount, JunoAccount};
    use crate::error::SnapshotError;
    use crate::snapshot_utils::address_reencoder::Bech32Reencoder;
    use crate::snapshot_utils::snapshot_merger::{merge, MergedAccount, SnapshotMerger};
    use bech32::{ToBase32, Variant};

    fn address(prefix: &str, seed: u8) -> String {
        bech32::encode(prefix, [seed; 20].to_base32(), Variant::Bech32).unwrap()
    }

    fn hub(seed: u8, staker: bool, bonus: bool) -> HubAccount {
        HubAccount {
            atom_address: address("cosmos", seed),
            atom_staker: staker,
            atom_bonus: bonus,
        }
    }

    fn juno(seed: u8, staker: bool) -> JunoAccount {
        JunoAccount {
            juno_address: address("juno", seed),
            juno_staker: staker,
        }
    }

    fn huahua(seed: u8, staker: bool) -> HuahuaAccount {
        HuahuaAccount {
            huahua_address: address("chihuahua", seed),
            huahua_staker: staker,
        }
    }

    #[test]
    fn same_payload_collapses_into_one_account() {
        let (accounts, stats) = merge(
            Bech32Reencoder::default(),
            &[hub(1, true, false)],
            &[juno(1, true)],
            &[huahua(1, false)],
        )
        .unwrap();
        assert_eq!(accounts.len(), 1);
        let (identity, account) = accounts.iter().next().unwrap();
        assert_eq!(identity.as_str(), address("ccat", 1));
        assert_eq!(
            account,
            &MergedAccount {
                atom_address: address("cosmos", 1),
                juno_address: address("juno", 1),
                huahua_address: address("chihuahua", 1),
                atom_bonus: false,
                atom_staker: true,
                juno_staker: true,
                huahua_staker: false,
                airdrop_amount: Default::default(),
            }
        );
        assert_eq!(stats[0].created, 1);
        assert_eq!(stats[1].updated, 1);
        assert_eq!(stats[2].updated, 1);
    }

    #[test]
    fn keys_are_union_of_all_chains() {
        let (accounts, _) = merge(
            Bech32Reencoder::default(),
            &[hub(1, true, false), hub(2, false, false)],
            &[juno(2, true), juno(3, true)],
            &[huahua(4, true), huahua(1, true)],
        )
        .unwrap();
        let keys = accounts
            .keys()
            .map(|key| key.as_str().to_string())
            .collect::<Vec<_>>();
        let mut expected = (1..=4).map(|seed| address("ccat", seed)).collect::<Vec<_>>();
        expected.sort();
        assert_eq!(keys, expected);

        let only_juno = accounts
            .values()
            .find(|acc| acc.juno_address == address("juno", 3))
            .unwrap();
        assert!(only_juno.atom_address.is_empty());
        assert!(only_juno.huahua_address.is_empty());
        assert!(!only_juno.atom_staker && !only_juno.huahua_staker);
    }

    #[test]
    fn later_chain_does_not_disturb_earlier_fields() {
        let (accounts, _) = merge(
            Bech32Reencoder::default(),
            &[hub(9, true, true)],
            &[juno(9, false)],
            &[],
        )
        .unwrap();
        let account = accounts.values().next().unwrap();
        assert!(account.atom_staker);
        assert!(account.atom_bonus);
        assert!(!account.juno_staker);
        assert_eq!(account.juno_address, address("juno", 9));
    }

    #[test]
    fn duplicate_within_chain_last_wins() {
        let mut merger = SnapshotMerger::new(Bech32Reencoder::default());
        let stats = merger
            .add_chain(&[hub(5, true, true), hub(5, false, false)])
            .unwrap();
        assert_eq!(stats.records, 2);
        assert_eq!(stats.created, 1);
        assert_eq!(stats.updated, 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(merger.len(), 1);

        let accounts = merger.into_accounts();
        let account = accounts.values().next().unwrap();
        // flags are overwritten, not combined
        assert!(!account.atom_staker);
        assert!(!account.atom_bonus);
    }

    #[test]
    fn duplicate_in_later_chain_last_wins() {
        let (accounts, stats) = merge(
            Bech32Reencoder::default(),
            &[hub(5, true, false)],
            &[],
            &[huahua(5, false), huahua(5, true)],
        )
        .unwrap();
        assert_eq!(stats[2].duplicates, 1);
        let account = accounts.values().next().unwrap();
        assert!(account.huahua_staker);
        assert!(account.atom_staker);
    }

    #[test]
    fn invalid_address_aborts_merge() {
        let mut bad = juno(2, true);
        bad.juno_address.pop();
        bad.juno_address.push('b');
        let result = merge(
            Bech32Reencoder::default(),
            &[hub(1, true, false)],
            &[juno(1, true), bad.clone()],
            &[huahua(1, true)],
        );
        match result {
            Err(SnapshotError::InvalidAddressEncoding { chain, address, .. }) => {
                assert_eq!(chain, Chain::Juno);
                assert_eq!(address, bad.juno_address);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn failed_chain_is_not_partially_applied() {
        let mut merger = SnapshotMerger::new(Bech32Reencoder::default());
        merger.add_chain(&[hub(1, true, false)]).unwrap();
        let bad = JunoAccount {
            juno_address: "juno1notanaddress".to_string(),
            juno_staker: true,
        };
        assert!(merger.add_chain(&[juno(2, true), bad]).is_err());
        assert_eq!(merger.len(), 1);
    }

    #[test]
    fn empty_inputs_merge_to_nothing() {
        let (accounts, stats) = merge(Bech32Reencoder::default(), &[], &[], &[]).unwrap();
        assert!(accounts.is_empty());
        assert_eq!(stats.len(), 3);
        assert!(stats.iter().all(|stat| stat.records == 0));
    }

    #[test]
    fn reward_units_count_flags() {
        let account = MergedAccount {
            atom_staker: true,
            atom_bonus: true,
            huahua_staker: true,
            ..Default::default()
        };
        assert_eq!(account.staking_units(), 2);
        assert_eq!(account.bonus_units(), 1);
        assert_eq!(account.reward_units(), 3);
        assert_eq!(MergedAccount::default().reward_units(), 0);
    }
}
