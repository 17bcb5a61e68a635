use std::collections::HashSet;

use anyhow::Result;
use bitcoin::{Amount, OutPoint, key::Secp256k1};
use chanfund::{
    Error,
    assembler::InputMode,
    funding::{Change, FundingInputs, build_funding_tx},
    script,
};
mod utils;

fn outpoints<'a>(it: impl Iterator<Item = &'a OutPoint>) -> HashSet<OutPoint> {
    it.copied().collect()
}

#[test]
fn test_funding_tx_without_change_has_single_output() -> Result<()> {
    let utxos = vec![utxos::hi(), utxos::lo()];
    let inputs = FundingInputs::builder()
        .utxos(utxos.clone())
        .funding_amount(Amount::from_sat(150_000))
        .local_funding_key(utils::fixed_key(1))
        .remote_funding_key(utils::fixed_key(2))
        .build();

    let outputs = build_funding_tx(inputs)?;
    let tx = &outputs.transaction;

    assert_eq!(tx.output.len(), 1);
    assert_eq!(outputs.funding_output_index, 0);
    assert_eq!(tx.output[0].value, Amount::from_sat(150_000));
    assert_eq!(
        tx.output[0].script_pubkey,
        script::p2wsh(&script::multisig_witness_script(
            &utils::fixed_key(1),
            &utils::fixed_key(2)
        ))
    );
    assert_eq!(outputs.fee, Amount::from_sat(50_000));

    // Inputs are permuted: compare as sets, then check alignment with the returned utxos
    assert_eq!(
        outpoints(tx.input.iter().map(|i| &i.previous_output)),
        outpoints(utxos.iter().map(|u| &u.outpoint))
    );
    for (input, utxo) in tx.input.iter().zip(outputs.utxos.iter()) {
        assert_eq!(input.previous_output, utxo.outpoint);
    }
    assert_eq!(outputs.utxos[0].outpoint.txid, utils::txid(1));
    Ok(())
}

#[test]
fn test_funding_tx_with_change_reports_permuted_funding_index() -> Result<()> {
    let inputs = FundingInputs::builder()
        .utxos(vec![utxos::hi(), utxos::lo()])
        .funding_amount(Amount::from_sat(100_000))
        .local_funding_key(utils::fixed_key(1))
        .remote_funding_key(utils::fixed_key(2))
        .change(Change {
            amount: Amount::from_sat(50_000),
            key: utils::fixed_key(3),
        })
        .build();

    let outputs = build_funding_tx(inputs)?;
    let tx = &outputs.transaction;
    let funding = outputs.funding_output_index as usize;

    assert_eq!(tx.output.len(), 2);
    // The smaller change output sorts first
    assert_eq!(funding, 1);
    assert_eq!(tx.output[funding].value, Amount::from_sat(100_000));
    assert!(tx.output[funding].script_pubkey.is_p2wsh());
    assert_eq!(tx.output[1 - funding].value, Amount::from_sat(50_000));
    assert_eq!(
        tx.output[1 - funding].script_pubkey,
        script::p2wpkh(&utils::fixed_key(3))
    );
    let total_out: Amount = tx.output.iter().map(|o| o.value).sum();
    assert!(total_out <= Amount::from_sat(200_000));
    assert_eq!(outputs.fee, Amount::from_sat(50_000));
    Ok(())
}

#[test]
fn test_funding_tx_keeps_funding_first_when_it_sorts_first() -> Result<()> {
    let inputs = FundingInputs::builder()
        .utxos(vec![utxos::hi(), utxos::lo()])
        .funding_amount(Amount::from_sat(20_000))
        .local_funding_key(utils::fixed_key(1))
        .remote_funding_key(utils::fixed_key(2))
        .change(Change {
            amount: Amount::from_sat(170_000),
            key: utils::fixed_key(3),
        })
        .build();

    let outputs = build_funding_tx(inputs)?;
    assert_eq!(outputs.funding_output_index, 0);
    assert_eq!(
        outputs.transaction.output[0].value,
        Amount::from_sat(20_000)
    );
    Ok(())
}

#[test]
fn test_funding_tx_zero_change_means_no_change_output() -> Result<()> {
    let inputs = FundingInputs::builder()
        .utxos(vec![utxos::hi()])
        .funding_amount(Amount::from_sat(100_000))
        .local_funding_key(utils::fixed_key(1))
        .remote_funding_key(utils::fixed_key(2))
        .change(Change {
            amount: Amount::ZERO,
            key: utils::fixed_key(3),
        })
        .build();

    let outputs = build_funding_tx(inputs)?;
    assert_eq!(outputs.transaction.output.len(), 1);
    assert_eq!(outputs.funding_output_index, 0);
    Ok(())
}

#[test]
fn test_funding_tx_is_deterministic_and_key_order_independent() -> Result<()> {
    let build = |local: u8, remote: u8| {
        build_funding_tx(
            FundingInputs::builder()
                .utxos(vec![utxos::lo(), utxos::hi()])
                .funding_amount(Amount::from_sat(100_000))
                .local_funding_key(utils::fixed_key(local))
                .remote_funding_key(utils::fixed_key(remote))
                .change(Change {
                    amount: Amount::from_sat(90_000),
                    key: utils::fixed_key(3),
                })
                .build(),
        )
    };
    let a = build(1, 2)?;
    let b = build(2, 1)?;
    assert_eq!(a.transaction, b.transaction);
    assert_eq!(
        a.transaction.compute_txid(),
        b.transaction.compute_txid()
    );
    assert_eq!(a.witness_script, b.witness_script);
    Ok(())
}

#[test]
fn test_funding_tx_for_txid_mode_fills_p2sh_script_sigs() -> Result<()> {
    let secp = Secp256k1::new();
    let (_, xpub) = utils::wallet_keys(&secp);
    let utxos = vec![utils::p2sh_utxo(7, 0, 120_000, 5), utxos::lo()];

    let signing = build_funding_tx(
        FundingInputs::builder()
            .utxos(utxos.clone())
            .funding_amount(Amount::from_sat(150_000))
            .local_funding_key(utils::fixed_key(1))
            .remote_funding_key(utils::fixed_key(2))
            .build(),
    )?;
    assert!(
        signing
            .transaction
            .input
            .iter()
            .all(|i| i.script_sig.is_empty())
    );

    let for_txid = build_funding_tx(
        FundingInputs::builder()
            .utxos(utxos)
            .funding_amount(Amount::from_sat(150_000))
            .local_funding_key(utils::fixed_key(1))
            .remote_funding_key(utils::fixed_key(2))
            .input_mode(InputMode::ForTxid { base: xpub })
            .build(),
    )?;
    let expected =
        script::p2sh_p2wpkh_script_sig(&utils::wallet_child_key(&secp, 5))?;
    for (input, utxo) in for_txid
        .transaction
        .input
        .iter()
        .zip(for_txid.utxos.iter())
    {
        if utxo.outpoint.txid == utils::txid(7) {
            assert_eq!(input.script_sig, expected);
        } else {
            assert!(input.script_sig.is_empty());
        }
    }
    assert_ne!(
        signing.transaction.compute_txid(),
        for_txid.transaction.compute_txid()
    );
    Ok(())
}

#[test]
fn test_funding_tx_rejects_bad_preconditions() {
    let empty = build_funding_tx(
        FundingInputs::builder()
            .utxos(vec![])
            .funding_amount(Amount::from_sat(1_000))
            .local_funding_key(utils::fixed_key(1))
            .remote_funding_key(utils::fixed_key(2))
            .build(),
    );
    assert!(matches!(empty, Err(Error::NoInputs)));

    let zero = build_funding_tx(
        FundingInputs::builder()
            .utxos(vec![utxos::lo()])
            .funding_amount(Amount::ZERO)
            .local_funding_key(utils::fixed_key(1))
            .remote_funding_key(utils::fixed_key(2))
            .build(),
    );
    assert!(matches!(zero, Err(Error::ZeroFunding)));

    let overspend = build_funding_tx(
        FundingInputs::builder()
            .utxos(vec![utxos::lo()])
            .funding_amount(Amount::from_sat(70_000))
            .local_funding_key(utils::fixed_key(1))
            .remote_funding_key(utils::fixed_key(2))
            .change(Change {
                amount: Amount::from_sat(20_000),
                key: utils::fixed_key(3),
            })
            .build(),
    );
    assert!(matches!(
        overspend,
        Err(Error::InsufficientFunds { inputs, outputs })
            if inputs == Amount::from_sat(80_000) && outputs == Amount::from_sat(90_000)
    ));
}

mod utxos {
    use super::utils;
    use chanfund::utxo::SpendableOutput;

    /// Sorts after `lo` under BIP69.
    pub fn hi() -> SpendableOutput {
        utils::utxo(2, 0, 120_000)
    }

    pub fn lo() -> SpendableOutput {
        utils::utxo(1, 3, 80_000)
    }
}
