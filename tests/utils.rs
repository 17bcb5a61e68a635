#![allow(dead_code)]

use bip39::Mnemonic;
use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv, Xpub};
use bitcoin::hashes::{Hash, sha256d};
use bitcoin::key::{CompressedPublicKey, Secp256k1};
use bitcoin::secp256k1::{All, SecretKey};
use bitcoin::{Amount, Network, OutPoint, Txid};
use chanfund::asset::{AssetId, AssetTransferProof, ContractId, OutputAllocation};
use chanfund::utxo::{ScriptKind, SpendableOutput};
use std::str::FromStr;

const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

pub fn fixed_key(byte: u8) -> CompressedPublicKey {
    let secp = Secp256k1::new();
    let sk = SecretKey::from_slice(&[byte; 32]).expect("secret key");
    CompressedPublicKey(sk.public_key(&secp))
}

/// Account-level key pair (m/84'/0'/0'/0) derived from the BIP39 test mnemonic.
pub fn wallet_keys(secp: &Secp256k1<All>) -> (Xpriv, Xpub) {
    let mnemonic = Mnemonic::from_str(TEST_MNEMONIC).expect("Invalid mnemonic phrase");
    let seed = mnemonic.to_seed("");
    let master_key =
        Xpriv::new_master(Network::Bitcoin, &seed).expect("Failed to create master key");
    let path = DerivationPath::from_str("m/84'/0'/0'/0").expect("Invalid derivation path");
    let account = master_key
        .derive_priv(secp, &path)
        .expect("Failed to derive account key");
    let xpub = Xpub::from_priv(secp, &account);
    (account, xpub)
}

pub fn wallet_child_key(secp: &Secp256k1<All>, keyindex: u32) -> CompressedPublicKey {
    let (_, xpub) = wallet_keys(secp);
    let child = xpub
        .derive_pub(secp, &[ChildNumber::from_normal_idx(keyindex).unwrap()])
        .expect("Failed to derive child key");
    CompressedPublicKey(child.public_key)
}

pub fn txid(byte: u8) -> Txid {
    Txid::from_byte_array([byte; 32])
}

pub fn utxo(txid_byte: u8, vout: u32, sats: u64) -> SpendableOutput {
    SpendableOutput {
        outpoint: OutPoint {
            txid: txid(txid_byte),
            vout,
        },
        value: Amount::from_sat(sats),
        keyindex: vout,
        script_kind: ScriptKind::P2wpkh,
    }
}

pub fn p2sh_utxo(txid_byte: u8, vout: u32, sats: u64, keyindex: u32) -> SpendableOutput {
    SpendableOutput {
        keyindex,
        script_kind: ScriptKind::P2shP2wpkh,
        ..utxo(txid_byte, vout, sats)
    }
}

pub fn asset_x() -> AssetId {
    AssetId::from_byte_array([0xab; 32])
}

/// Issuance proof granting `amount` units of asset X on the given outpoints.
pub fn genesis_proof(utxos: &[SpendableOutput], amount: u64) -> AssetTransferProof {
    let prev_tx = txid(0xee);
    AssetTransferProof::genesis(
        ContractId(sha256d::Hash::hash(b"asset X contract")),
        vec![OutPoint {
            txid: prev_tx,
            vout: 0,
        }],
        vec![OutputAllocation {
            asset_id: asset_x(),
            amount,
            vout: utxos.first().map(|u| u.outpoint.vout).unwrap_or(0),
        }],
    )
}
