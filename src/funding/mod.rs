mod asset;
mod standard;

pub use asset::{AssetFundingInputs, AssetFundingOutputs, build_asset_funding_tx};
pub use standard::{FundingInputs, FundingOutputs, build_funding_tx};

use bitcoin::{Amount, CompressedPublicKey, ScriptBuf, Transaction};
use tracing::debug;

use crate::{
    assembler::{self, InputMode},
    error::{Error, Result},
    permute::{self, Permutation},
    script,
    utxo::{self, SpendableOutput},
};

/// Change paid back to the funder's wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub amount: Amount,
    pub key: CompressedPublicKey,
}

/// Funding and change outputs placed, inputs ordered, reserved outputs still empty.
struct Layout {
    transaction: Transaction,
    utxos: Vec<SpendableOutput>,
    witness_script: ScriptBuf,
    funding_output_index: usize,
    change_output_index: Option<usize>,
}

struct LayoutParams<'a> {
    utxos: Vec<SpendableOutput>,
    funding_amount: Amount,
    local_funding_key: &'a CompressedPublicKey,
    remote_funding_key: &'a CompressedPublicKey,
    change: Option<Change>,
    input_mode: &'a InputMode,
    reserved_extra_outputs: usize,
    permutation: Permutation,
}

fn lay_out(params: LayoutParams) -> Result<Layout> {
    if params.utxos.is_empty() {
        return Err(Error::NoInputs);
    }
    if params.funding_amount == Amount::ZERO {
        return Err(Error::ZeroFunding);
    }
    let change = params.change.filter(|c| c.amount > Amount::ZERO);
    let mut utxos = params.utxos;

    let mut transaction = assembler::build_skeleton(
        &utxos,
        params.input_mode,
        change.is_some(),
        params.reserved_extra_outputs,
    )?;

    let witness_script =
        script::multisig_witness_script(params.local_funding_key, params.remote_funding_key);
    debug!(
        "Funding witness script = {}",
        witness_script.to_hex_string()
    );
    transaction.output[0].value = params.funding_amount;
    transaction.output[0].script_pubkey = script::p2wsh(&witness_script);

    let mut funding_output_index = 0;
    let mut change_output_index = None;
    if let Some(change) = change {
        transaction.output[1].value = change.amount;
        transaction.output[1].script_pubkey = script::p2wpkh(&change.key);
        change_output_index = Some(1);
    }

    if params.permutation == Permutation::Bip69 {
        let payment_count = 1 + usize::from(change.is_some());
        let reserved = transaction.output.split_off(payment_count);
        let map = permute::permute_outputs(&mut transaction.output);
        transaction.output.extend(reserved);
        funding_output_index = map[0];
        change_output_index = change_output_index.map(|i| map[i]);

        permute::permute_inputs(&mut transaction.input, &mut utxos)?;
        debug!(
            "Permuted funding output to {}, change output to {:?}",
            funding_output_index, change_output_index
        );
    }

    Ok(Layout {
        transaction,
        utxos,
        witness_script,
        funding_output_index,
        change_output_index,
    })
}

/// Checks every output was filled and outputs do not exceed inputs. Returns the fee.
fn check_complete(transaction: &Transaction, utxos: &[SpendableOutput]) -> Result<Amount> {
    if let Some(i) = transaction
        .output
        .iter()
        .position(|o| o.script_pubkey.is_empty())
    {
        return Err(Error::UnfilledOutput(i));
    }
    let inputs = utxo::total_value(utxos).ok_or(Error::AmountOverflow)?;
    let outputs = transaction
        .output
        .iter()
        .try_fold(Amount::ZERO, |acc, o| acc.checked_add(o.value))
        .ok_or(Error::AmountOverflow)?;
    inputs
        .checked_sub(outputs)
        .ok_or(Error::InsufficientFunds { inputs, outputs })
}
