use bitcoin::{Amount, CompressedPublicKey, ScriptBuf, Transaction};
use bon::Builder;
use tracing::debug;

use super::{Change, LayoutParams, check_complete, lay_out};
use crate::{
    asset::{AssetId, AssetTransferProof, OutputAllocation},
    assembler::InputMode,
    error::Result,
    permute::Permutation,
    utxo::SpendableOutput,
};

#[derive(Debug, Clone, Builder)]
pub struct AssetFundingInputs {
    pub utxos: Vec<SpendableOutput>,
    pub funding_amount: Amount,
    pub local_funding_key: CompressedPublicKey,
    pub remote_funding_key: CompressedPublicKey,
    pub change: Option<Change>,
    #[builder(default)]
    pub input_mode: InputMode,
    pub asset_id: AssetId,
    pub asset_amount: u64,
    pub asset_change: Option<u64>,
    /// Proof that authorized the assets held by `utxos`.
    pub input_proof: AssetTransferProof,
    /// `Skip` keeps funding at output 0 and change at output 1. `Bip69` orders the transaction
    /// first and points the proof allocations at the final positions.
    #[builder(default = Permutation::Skip)]
    pub ordering: Permutation,
}

#[derive(Debug, Clone)]
pub struct AssetFundingOutputs {
    pub transaction: Transaction,
    pub funding_output_index: u32,
    /// The spent UTXOs, in the same order as `transaction.input` and `proof.bind_to`.
    pub utxos: Vec<SpendableOutput>,
    pub witness_script: ScriptBuf,
    pub fee: Amount,
    pub proof: AssetTransferProof,
}

/// Builds a funding transaction that also moves assets into the channel.
///
/// The primary asset allocation follows the funding output and the asset change follows the
/// monetary change output. The last output is a zero-value commitment to the returned proof.
///
/// Asset conservation is not checked: the caller must make sure `input_proof` authorizes at
/// least `asset_amount + asset_change` units of `asset_id` on the spent outpoints.
pub fn build_asset_funding_tx(inputs: AssetFundingInputs) -> Result<AssetFundingOutputs> {
    let layout = lay_out(LayoutParams {
        utxos: inputs.utxos,
        funding_amount: inputs.funding_amount,
        local_funding_key: &inputs.local_funding_key,
        remote_funding_key: &inputs.remote_funding_key,
        change: inputs.change,
        input_mode: &inputs.input_mode,
        reserved_extra_outputs: 1,
        permutation: inputs.ordering,
    })?;
    let mut transaction = layout.transaction;

    let mut allocations = vec![OutputAllocation {
        asset_id: inputs.asset_id,
        amount: inputs.asset_amount,
        vout: layout.funding_output_index as u32,
    }];
    if let Some(asset_change) = inputs.asset_change.filter(|&a| a > 0) {
        // Without a monetary change output the change allocation rides on slot 1, which is the
        // commitment output.
        let vout = layout.change_output_index.unwrap_or(1) as u32;
        allocations.push(OutputAllocation {
            asset_id: inputs.asset_id,
            amount: asset_change,
            vout,
        });
    }

    let bind_to = layout.utxos.iter().map(|u| u.outpoint).collect();
    let proof = AssetTransferProof::transfer(bind_to, inputs.input_proof, allocations);
    debug!(
        "Allocated {:?} units of asset {} across {} outputs",
        proof.allocated(&inputs.asset_id),
        inputs.asset_id,
        proof.outputs.len()
    );

    let commitment_output = transaction.output.len() - 1;
    transaction.output[commitment_output].value = Amount::ZERO;
    transaction.output[commitment_output].script_pubkey = proof.commitment_script()?;

    let fee = check_complete(&transaction, &layout.utxos)?;

    Ok(AssetFundingOutputs {
        transaction,
        funding_output_index: layout.funding_output_index as u32,
        utxos: layout.utxos,
        witness_script: layout.witness_script,
        fee,
        proof,
    })
}
