use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::chain_account::{ChainSnapshot, HuahuaAccount, HubAccount, JunoAccount};
use crate::error::SnapshotResult;
use crate::snapshot_utils::address_reencoder::{Bech32Reencoder, DEFAULT_CANONICAL_PREFIX};
use crate::snapshot_utils::allocation_stats::AllocationSummary;
use crate::snapshot_utils::allocation_verification::verify_allocation;
use crate::snapshot_utils::reward_allocator::{allocate, AllocationPool, DEFAULT_TOTAL_SUPPLY};
use crate::snapshot_utils::snapshot_assembler::{assemble, FinalSnapshot};
use crate::snapshot_utils::snapshot_merger::merge;
use crate::token_amount::TokenAmount;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    pub hub_snapshot: PathBuf,
    pub juno_snapshot: PathBuf,
    pub huahua_snapshot: PathBuf,
    pub output_snapshot: PathBuf,

    #[serde(default = "default_canonical_prefix")]
    pub canonical_prefix: String,
    #[serde(default = "default_total_supply")]
    pub total_supply: TokenAmount,
}

fn default_canonical_prefix() -> String {
    DEFAULT_CANONICAL_PREFIX.to_string()
}

fn default_total_supply() -> TokenAmount {
    DEFAULT_TOTAL_SUPPLY
}

pub struct GeneratedSnapshot {
    pub snapshot: FinalSnapshot,
    pub pool: AllocationPool,
}

/// Merge, allocate and assemble. Stops at the first malformed address or
/// when no account earns a reward unit.
pub fn generate_snapshot(
    reencoder: Bech32Reencoder,
    hub: &[HubAccount],
    juno: &[JunoAccount],
    huahua: &[HuahuaAccount],
    total_supply: TokenAmount,
) -> SnapshotResult<GeneratedSnapshot> {
    let (mut accounts, _stats) = merge(reencoder, hub, juno, huahua)?;
    tracing::info!("Total merged accounts: {:?}", accounts.len());

    let pool = allocate(&mut accounts, total_supply)?;
    Ok(GeneratedSnapshot {
        snapshot: assemble(total_supply, accounts),
        pool,
    })
}

fn read_chain_snapshot<R: DeserializeOwned>(path: &Path) -> anyhow::Result<ChainSnapshot<R>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open snapshot file {path}", path = path.display()))?;
    let snapshot: ChainSnapshot<R> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Cannot parse snapshot file {path}", path = path.display()))?;
    tracing::info!(
        "Read {} accounts from {}",
        snapshot.accounts.len(),
        path.display()
    );
    Ok(snapshot)
}

pub fn write_snapshot(snapshot: &FinalSnapshot, path: &Path) -> anyhow::Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    snapshot
        .serialize(&mut serializer)
        .context("failed to marshal snapshot")?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("Cannot create output file {path}", path = path.display()))?;
    file.write_all(&buffer)
        .with_context(|| format!("Cannot write output file {path}", path = path.display()))?;
    Ok(())
}

/// Reads the three chain snapshots, generates the catdrop snapshot and
/// writes it to `config.output_snapshot`.
pub fn run_snapshot_generation(config: &PathsConfig) -> anyhow::Result<AllocationSummary> {
    let reencoder = Bech32Reencoder::new(config.canonical_prefix.clone())?;

    let hub: ChainSnapshot<HubAccount> = read_chain_snapshot(&config.hub_snapshot)?;
    let juno: ChainSnapshot<JunoAccount> = read_chain_snapshot(&config.juno_snapshot)?;
    let huahua: ChainSnapshot<HuahuaAccount> = read_chain_snapshot(&config.huahua_snapshot)?;

    let GeneratedSnapshot { snapshot, pool } = generate_snapshot(
        reencoder,
        &hub.accounts,
        &juno.accounts,
        &huahua.accounts,
        config.total_supply,
    )?;
    verify_allocation(&snapshot, &pool)?;

    let summary = AllocationSummary::new(&snapshot, &pool);
    tracing::info!(
        "Total accounts: {}, allocated: {}, unallocated: {}",
        summary.total_accounts,
        summary.total_allocated,
        summary.unallocated
    );

    write_snapshot(&snapshot, &config.output_snapshot)?;
    tracing::info!("Snapshot written to {}", config.output_snapshot.display());

    Ok(summary)
}
