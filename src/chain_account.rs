use crate::snapshot_utils::snapshot_merger::MergedAccount;
use serde::{Deserialize, Deserializer, Serialize};

use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chain {
    Hub,
    Juno,
    Huahua,
}

impl Chain {
    /// Order in which the chain snapshots are folded into the merged set.
    pub const MERGE_ORDER: [Chain; 3] = [Chain::Hub, Chain::Juno, Chain::Huahua];
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Hub => write!(f, "hub"),
            Chain::Juno => write!(f, "juno"),
            Chain::Huahua => write!(f, "huahua"),
        }
    }
}

/// A holder record of a single chain snapshot.
///
/// Implementors only ever touch their own chain's fields of a
/// [`MergedAccount`], which is what keeps the merge order-insensitive
/// per field.
pub trait ChainRecord {
    const CHAIN: Chain;

    fn native_address(&self) -> &str;

    fn apply_to(&self, account: &mut MergedAccount);
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubAccount {
    pub atom_address: String,
    #[serde(default)]
    pub atom_staker: bool,
    /// Delegated outside of the top twenty validators.
    #[serde(default, alias = "outside_top_twenty")]
    pub atom_bonus: bool,
}

impl ChainRecord for HubAccount {
    const CHAIN: Chain = Chain::Hub;

    fn native_address(&self) -> &str {
        &self.atom_address
    }

    fn apply_to(&self, account: &mut MergedAccount) {
        account.atom_address = self.atom_address.clone();
        account.atom_staker = self.atom_staker;
        account.atom_bonus = self.atom_bonus;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunoAccount {
    pub juno_address: String,
    #[serde(default)]
    pub juno_staker: bool,
}

impl ChainRecord for JunoAccount {
    const CHAIN: Chain = Chain::Juno;

    fn native_address(&self) -> &str {
        &self.juno_address
    }

    fn apply_to(&self, account: &mut MergedAccount) {
        account.juno_address = self.juno_address.clone();
        account.juno_staker = self.juno_staker;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuahuaAccount {
    pub huahua_address: String,
    #[serde(default)]
    pub huahua_staker: bool,
}

impl ChainRecord for HuahuaAccount {
    const CHAIN: Chain = Chain::Huahua;

    fn native_address(&self) -> &str {
        &self.huahua_address
    }

    fn apply_to(&self, account: &mut MergedAccount) {
        account.huahua_address = self.huahua_address.clone();
        account.huahua_staker = self.huahua_staker;
    }
}

/// Contents of one per-chain snapshot file.
///
/// `accounts` may be a list of records or an object keyed by native address;
/// the object form is read in sorted key order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainSnapshot<R> {
    pub accounts: Vec<R>,
}

impl<R> Default for ChainSnapshot<R> {
    fn default() -> Self {
        Self { accounts: vec![] }
    }
}

impl<'de, R: Deserialize<'de>> Deserialize<'de> for ChainSnapshot<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Accounts<R> {
            List(Vec<R>),
            ByAddress(BTreeMap<String, R>),
        }

        #[derive(Deserialize)]
        struct Repr<R> {
            accounts: Accounts<R>,
        }

        let accounts = match Repr::<R>::deserialize(deserializer)?.accounts {
            Accounts::List(accounts) => accounts,
            Accounts::ByAddress(accounts) => accounts.into_values().collect(),
        };
        Ok(Self { accounts })
    }
}
