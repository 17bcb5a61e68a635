use std::{fmt, str::FromStr};

use bitcoin::{
    OutPoint, ScriptBuf,
    hashes::{Hash, sha256d},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Identifier of a fungible asset class.
///
/// Stored and compared as raw bytes. The textual form is hex in reversed byte order, matching how
/// Bitcoin hashes are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId([u8; 32]);

impl AssetId {
    pub const fn from_byte_array(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_byte_array(self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl FromStr for AssetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 64 {
            return Err(Error::InvalidAssetId(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AssetId::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash of the contract that defines an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractId(pub sha256d::Hash);

/// Units of one asset assigned to one output of the bound transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputAllocation {
    pub asset_id: AssetId,
    pub amount: u64,
    pub vout: u32,
}

/// Off-chain record moving asset balances from the outpoints in `bind_to` to the outputs of the
/// transaction that spends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTransferProof {
    /// Only set on genesis proofs; transfers leave it to later stages.
    pub contract: Option<ContractId>,
    pub bind_to: Vec<OutPoint>,
    /// Proofs that authorized the spent outpoints.
    pub inputs: Vec<AssetTransferProof>,
    pub outputs: Vec<OutputAllocation>,
}

impl AssetTransferProof {
    pub fn genesis(
        contract: ContractId,
        bind_to: Vec<OutPoint>,
        outputs: Vec<OutputAllocation>,
    ) -> Self {
        Self {
            contract: Some(contract),
            bind_to,
            inputs: vec![],
            outputs,
        }
    }

    pub fn transfer(
        bind_to: Vec<OutPoint>,
        input: AssetTransferProof,
        outputs: Vec<OutputAllocation>,
    ) -> Self {
        Self {
            contract: None,
            bind_to,
            inputs: vec![input],
            outputs,
        }
    }

    /// Canonical CBOR encoding, predecessors included.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)?;
        Ok(buf)
    }

    pub fn id(&self) -> Result<sha256d::Hash> {
        Ok(sha256d::Hash::hash(&self.encode()?))
    }

    /// Script of the zero-value output that anchors this proof to its transaction.
    pub fn commitment_script(&self) -> Result<ScriptBuf> {
        Ok(ScriptBuf::new_op_return(self.id()?.to_byte_array()))
    }

    /// Total units of `asset_id` this proof allocates, `None` on overflow.
    pub fn allocated(&self, asset_id: &AssetId) -> Option<u64> {
        self.outputs
            .iter()
            .filter(|o| &o.asset_id == asset_id)
            .try_fold(0u64, |acc, o| acc.checked_add(o.amount))
    }
}
