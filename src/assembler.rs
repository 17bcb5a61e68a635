use bitcoin::{
    Amount, CompressedPublicKey, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness,
    absolute::LockTime,
    bip32::{ChildNumber, Xpub},
    secp256k1::{Secp256k1, Verification},
    transaction::Version,
};
use tracing::debug;

use crate::{
    error::Result,
    script,
    utxo::{ScriptKind, SpendableOutput},
};

/// How inputs are finalized when the skeleton is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Every scriptSig stays empty. Signing works, but the txid changes once P2SH inputs get
    /// their scriptSig.
    #[default]
    ForSigning,
    /// P2SH-wrapped inputs carry their final scriptSig, derived from `base` at each UTXO's
    /// `keyindex`. The txid is final, but signing code that expects empty scriptSigs fails.
    ForTxid { base: Xpub },
}

/// Builds a version 2 transaction that spends every UTXO in order.
///
/// Outputs are placeholders (zero value, empty script) for the caller to fill: one for the
/// primary payment, one more when `wants_change`, and `reserved_extra_outputs` after those.
pub fn build_skeleton(
    utxos: &[SpendableOutput],
    input_mode: &InputMode,
    wants_change: bool,
    reserved_extra_outputs: usize,
) -> Result<Transaction> {
    let secp = Secp256k1::verification_only();

    let input = utxos
        .iter()
        .map(|utxo| -> Result<TxIn> {
            Ok(TxIn {
                previous_output: utxo.outpoint,
                script_sig: script_sig_for(&secp, utxo, input_mode)?,
                sequence: Sequence::MAX,
                witness: Witness::new(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let output_count = 1 + usize::from(wants_change) + reserved_extra_outputs;
    let output = (0..output_count)
        .map(|_| TxOut {
            value: Amount::ZERO,
            script_pubkey: ScriptBuf::new(),
        })
        .collect();

    debug!(
        "Skeleton with {} inputs and {} outputs",
        utxos.len(),
        output_count
    );

    Ok(Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input,
        output,
    })
}

fn script_sig_for<C: Verification>(
    secp: &Secp256k1<C>,
    utxo: &SpendableOutput,
    input_mode: &InputMode,
) -> Result<ScriptBuf> {
    match (input_mode, utxo.script_kind) {
        (InputMode::ForTxid { base }, ScriptKind::P2shP2wpkh) => {
            let child = base.derive_pub(secp, &[ChildNumber::from_normal_idx(utxo.keyindex)?])?;
            script::p2sh_p2wpkh_script_sig(&CompressedPublicKey(child.public_key))
        }
        _ => Ok(ScriptBuf::new()),
    }
}
