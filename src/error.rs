//! Snapshot errors

use thiserror::Error;

use crate::chain_account::Chain;

/// Error raised by the snapshot core (reencoding, merging, allocation).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("invalid {chain} address {address:?}: {reason}")]
    InvalidAddressEncoding {
        chain: Chain,
        address: String,
        reason: String,
    },

    #[error("invalid canonical prefix {prefix:?}: {reason}")]
    InvalidCanonicalPrefix { prefix: String, reason: String },

    #[error("no eligible reward units: nothing to divide the supply by")]
    NoEligibleRewardUnits,
}

/// Result type for snapshot core operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;
