use bitcoin::{Amount, CompressedPublicKey, ScriptBuf, Transaction};
use bon::Builder;

use super::{Change, LayoutParams, check_complete, lay_out};
use crate::{
    assembler::InputMode, error::Result, permute::Permutation, utxo::SpendableOutput,
};

#[derive(Debug, Clone, Builder)]
pub struct FundingInputs {
    pub utxos: Vec<SpendableOutput>,
    pub funding_amount: Amount,
    pub local_funding_key: CompressedPublicKey,
    pub remote_funding_key: CompressedPublicKey,
    pub change: Option<Change>,
    #[builder(default)]
    pub input_mode: InputMode,
}

#[derive(Debug, Clone)]
pub struct FundingOutputs {
    pub transaction: Transaction,
    /// Output paying to the 2-of-2 witness script.
    pub funding_output_index: u32,
    /// The spent UTXOs, in the same order as `transaction.input`.
    pub utxos: Vec<SpendableOutput>,
    pub witness_script: ScriptBuf,
    pub fee: Amount,
}

/// Builds a P2WSH funding transaction with an optional P2WPKH change output.
///
/// Inputs and outputs are BIP69-ordered, so the funding output may land at index 1 when change
/// is present. Callers must use `funding_output_index` and the returned `utxos`, never the
/// construction order.
pub fn build_funding_tx(inputs: FundingInputs) -> Result<FundingOutputs> {
    let layout = lay_out(LayoutParams {
        utxos: inputs.utxos,
        funding_amount: inputs.funding_amount,
        local_funding_key: &inputs.local_funding_key,
        remote_funding_key: &inputs.remote_funding_key,
        change: inputs.change,
        input_mode: &inputs.input_mode,
        reserved_extra_outputs: 0,
        permutation: Permutation::Bip69,
    })?;

    let fee = check_complete(&layout.transaction, &layout.utxos)?;

    Ok(FundingOutputs {
        transaction: layout.transaction,
        funding_output_index: layout.funding_output_index as u32,
        utxos: layout.utxos,
        witness_script: layout.witness_script,
        fee,
    })
}
