use std::str::FromStr;

use anyhow::{Result, anyhow};
use bitcoin::{Amount, CompressedPublicKey, OutPoint, Txid, bip32::Xpub};
use serde::{Deserialize, Serialize};

use crate::{
    amount::deserialize_btc,
    asset::{AssetId, AssetTransferProof},
    assembler::InputMode,
    funding::{AssetFundingInputs, Change, FundingInputs},
    permute::Permutation,
    utxo::{ScriptKind, SpendableOutput},
};

#[derive(Deserialize, Debug, Clone)]
pub struct UtxoQuery {
    pub txid: String,
    pub vout: u32,
    #[serde(deserialize_with = "deserialize_btc")]
    pub amount: Amount,
    pub keyindex: u32,
    #[serde(default)]
    pub p2sh: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChangeQuery {
    #[serde(deserialize_with = "deserialize_btc")]
    pub amount: Amount,
    pub key: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AssetQuery {
    pub asset_id: String,
    pub amount: u64,
    pub change: Option<u64>,
    pub input_proof: AssetTransferProof,
    #[serde(default)]
    pub ordering: Option<Permutation>,
}

/// Request file read by the `chanfund` binary. Amounts are decimal BTC strings.
#[derive(Deserialize, Debug, Clone)]
pub struct FundingRequest {
    pub utxos: Vec<UtxoQuery>,
    #[serde(deserialize_with = "deserialize_btc")]
    pub funding_amount: Amount,
    pub local_funding_key: String,
    pub remote_funding_key: String,
    pub change: Option<ChangeQuery>,
    /// Extended public key for P2SH scriptSigs; fixes the txid before signing.
    pub xpub: Option<String>,
    pub asset: Option<AssetQuery>,
}

pub enum Inputs {
    Standard(FundingInputs),
    Asset(AssetFundingInputs),
}

impl FundingRequest {
    pub fn into_inputs(self) -> Result<Inputs> {
        let utxos = self
            .utxos
            .iter()
            .map(|u| -> Result<SpendableOutput> {
                Ok(SpendableOutput {
                    outpoint: OutPoint {
                        txid: Txid::from_str(&u.txid)?,
                        vout: u.vout,
                    },
                    value: u.amount,
                    keyindex: u.keyindex,
                    script_kind: if u.p2sh {
                        ScriptKind::P2shP2wpkh
                    } else {
                        ScriptKind::P2wpkh
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if utxos.is_empty() {
            return Err(anyhow!("utxos cannot be empty"));
        }

        let local_funding_key = CompressedPublicKey::from_str(&self.local_funding_key)
            .map_err(|e| anyhow!("Invalid local funding key: {}", e))?;
        let remote_funding_key = CompressedPublicKey::from_str(&self.remote_funding_key)
            .map_err(|e| anyhow!("Invalid remote funding key: {}", e))?;
        let change = self
            .change
            .map(|c| -> Result<Change> {
                Ok(Change {
                    amount: c.amount,
                    key: CompressedPublicKey::from_str(&c.key)
                        .map_err(|e| anyhow!("Invalid change key: {}", e))?,
                })
            })
            .transpose()?;
        let input_mode = match self.xpub {
            Some(xpub) => InputMode::ForTxid {
                base: Xpub::from_str(&xpub)?,
            },
            None => InputMode::ForSigning,
        };

        let Some(asset) = self.asset else {
            return Ok(Inputs::Standard(
                FundingInputs::builder()
                    .utxos(utxos)
                    .funding_amount(self.funding_amount)
                    .local_funding_key(local_funding_key)
                    .remote_funding_key(remote_funding_key)
                    .maybe_change(change)
                    .input_mode(input_mode)
                    .build(),
            ));
        };

        Ok(Inputs::Asset(
            AssetFundingInputs::builder()
                .utxos(utxos)
                .funding_amount(self.funding_amount)
                .local_funding_key(local_funding_key)
                .remote_funding_key(remote_funding_key)
                .maybe_change(change)
                .input_mode(input_mode)
                .asset_id(AssetId::from_str(&asset.asset_id)?)
                .asset_amount(asset.amount)
                .maybe_asset_change(asset.change)
                .input_proof(asset.input_proof)
                .maybe_ordering(asset.ordering)
                .build(),
        ))
    }
}

/// What the binary prints once the transaction is built.
#[derive(Serialize, Debug)]
pub struct FundingResult {
    pub txid: Txid,
    pub transaction_hex: String,
    pub funding_output_index: u32,
    pub funding_address: String,
    pub fee_sat: u64,
    pub utxos: Vec<SpendableOutput>,
    pub proof: Option<AssetTransferProof>,
}
