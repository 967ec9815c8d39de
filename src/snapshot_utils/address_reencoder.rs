use crate::chain_account::Chain;
use crate::error::{SnapshotError, SnapshotResult};
use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Bech32 account prefix of the coolcat chain.
pub const DEFAULT_CANONICAL_PREFIX: &str = "ccat";

/// Upper bound on the decoded address payload, in bytes.
pub const MAX_ADDRESS_PAYLOAD_LEN: usize = 255;

/// Merge key shared by every chain: the address payload encoded under the
/// canonical prefix.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalIdentity(String);

impl CanonicalIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalIdentity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Re-encodes chain native bech32 addresses under one canonical prefix.
///
/// Pure format conversion: the payload bytes are kept, only the prefix and
/// checksum are recomputed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bech32Reencoder {
    prefix: String,
}

impl Bech32Reencoder {
    pub fn new(prefix: impl Into<String>) -> SnapshotResult<Self> {
        let prefix = prefix.into();
        let invalid = |reason: String| SnapshotError::InvalidCanonicalPrefix {
            prefix: prefix.clone(),
            reason,
        };
        if prefix.is_empty() {
            return Err(invalid("prefix is empty".to_string()));
        }
        // encoding an empty payload runs the hrp checks of the bech32 crate
        bech32::encode(&prefix, Vec::<u8>::new().to_base32(), Variant::Bech32)
            .map_err(|err| invalid(err.to_string()))?;

        Ok(Self {
            prefix: prefix.to_lowercase(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Decodes `address` and returns its payload with the source prefix.
    pub fn decode_payload(&self, address: &str) -> Result<(String, Vec<u8>), String> {
        let (hrp, data, variant) = bech32::decode(address).map_err(|err| err.to_string())?;
        if variant != Variant::Bech32 {
            return Err("bech32m checksum is not an account address".to_string());
        }
        let payload = Vec::<u8>::from_base32(&data).map_err(|err| err.to_string())?;
        if payload.is_empty() {
            return Err("empty address payload".to_string());
        }
        if payload.len() > MAX_ADDRESS_PAYLOAD_LEN {
            return Err(format!(
                "address payload is {} bytes, max is {}",
                payload.len(),
                MAX_ADDRESS_PAYLOAD_LEN
            ));
        }
        Ok((hrp, payload))
    }

    pub fn reencode(&self, chain: Chain, address: &str) -> SnapshotResult<CanonicalIdentity> {
        let invalid = |reason: String| SnapshotError::InvalidAddressEncoding {
            chain,
            address: address.to_string(),
            reason,
        };
        let (hrp, payload) = self.decode_payload(address).map_err(invalid)?;
        let canonical = bech32::encode(&self.prefix, payload.to_base32(), Variant::Bech32)
            .map_err(|err| invalid(err.to_string()))?;

        tracing::trace!(
            "reencoded {} address {} ({}) -> {}",
            chain,
            address,
            hrp,
            hex::encode(&payload)
        );

        Ok(CanonicalIdentity(canonical))
    }
}

impl Default for Bech32Reencoder {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_CANONICAL_PREFIX.to_string(),
        }
    }
}
