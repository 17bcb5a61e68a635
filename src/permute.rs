//! BIP69 ordering of transaction inputs and outputs.
//!
//! Channel-opening transactions built without a canonical ordering leak which output funds the
//! channel (it would always be the first). Sorting both sides lexicographically removes that
//! positional fingerprint while keeping the result deterministic.

use std::cmp::Ordering;

use bitcoin::{OutPoint, TxIn, TxOut, hashes::Hash};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    utxo::SpendableOutput,
};

/// Whether a builder reorders the transaction it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permutation {
    #[default]
    Bip69,
    /// Keep construction order. Roles become visible from output positions.
    Skip,
}

fn cmp_outpoints(a: &OutPoint, b: &OutPoint) -> Ordering {
    // txids compare in display (reversed) byte order
    let a_txid = a.txid.to_byte_array().into_iter().rev();
    let b_txid = b.txid.to_byte_array().into_iter().rev();
    a_txid.cmp(b_txid).then(a.vout.cmp(&b.vout))
}

fn cmp_outputs(a: &TxOut, b: &TxOut) -> Ordering {
    a.value
        .cmp(&b.value)
        .then_with(|| a.script_pubkey.as_bytes().cmp(b.script_pubkey.as_bytes()))
}

/// Sorts `outputs` and returns where each one went: `map[original] == final`.
pub fn permute_outputs(outputs: &mut Vec<TxOut>) -> Vec<usize> {
    let order = sorted_order(outputs, cmp_outputs);
    reorder(outputs, &order);
    final_positions(&order)
}

/// Sorts `inputs` and applies the same reordering to `utxos` so that `utxos[i]` keeps
/// describing `inputs[i]`.
pub fn permute_inputs(inputs: &mut Vec<TxIn>, utxos: &mut Vec<SpendableOutput>) -> Result<()> {
    if inputs.len() != utxos.len() {
        return Err(Error::InputCountMismatch {
            inputs: inputs.len(),
            utxos: utxos.len(),
        });
    }
    let order = sorted_order(inputs, |a, b| {
        cmp_outpoints(&a.previous_output, &b.previous_output)
    });
    reorder(inputs, &order);
    reorder(utxos, &order);
    Ok(())
}

/// Indices of `items` in sorted order. The sort is stable, so equal items keep their
/// relative order.
fn sorted_order<T>(items: &[T], cmp: impl Fn(&T, &T) -> Ordering) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| cmp(&items[a], &items[b]));
    order
}

fn reorder<T>(items: &mut Vec<T>, order: &[usize]) {
    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    items.extend(order.iter().filter_map(|&i| slots[i].take()));
}

fn final_positions(order: &[usize]) -> Vec<usize> {
    let mut map = vec![0; order.len()];
    for (position, &original) in order.iter().enumerate() {
        map[original] = position;
    }
    map
}
