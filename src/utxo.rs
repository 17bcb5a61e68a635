use bitcoin::{Amount, OutPoint};
use serde::{Deserialize, Serialize};

/// How the wallet locked a spendable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    #[default]
    P2wpkh,
    /// P2WPKH wrapped in P2SH; needs a scriptSig before the txid is final.
    P2shP2wpkh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendableOutput {
    pub outpoint: OutPoint,
    pub value: Amount,
    /// BIP32 child index of the key controlling this output.
    pub keyindex: u32,
    #[serde(default)]
    pub script_kind: ScriptKind,
}

pub fn total_value(utxos: &[SpendableOutput]) -> Option<Amount> {
    utxos
        .iter()
        .try_fold(Amount::ZERO, |acc, u| acc.checked_add(u.value))
}
