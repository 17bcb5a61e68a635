use bitcoin::{
    CompressedPublicKey, Script, ScriptBuf,
    opcodes::all::OP_CHECKMULTISIG,
    script::{Builder, PushBytesBuf},
};

use crate::error::Result;

/// 2-of-2 witness script over the two funding keys.
///
/// Keys are ordered by their compressed serialization, so both channel parties derive the same
/// script regardless of who is local.
pub fn multisig_witness_script(a: &CompressedPublicKey, b: &CompressedPublicKey) -> ScriptBuf {
    let (lesser, greater) = if a.to_bytes() <= b.to_bytes() {
        (a, b)
    } else {
        (b, a)
    };
    Builder::new()
        .push_int(2)
        .push_slice(lesser.to_bytes())
        .push_slice(greater.to_bytes())
        .push_int(2)
        .push_opcode(OP_CHECKMULTISIG)
        .into_script()
}

pub fn p2wsh(witness_script: &Script) -> ScriptBuf {
    ScriptBuf::new_p2wsh(&witness_script.wscript_hash())
}

pub fn p2wpkh(key: &CompressedPublicKey) -> ScriptBuf {
    ScriptBuf::new_p2wpkh(&key.wpubkey_hash())
}

/// scriptSig spending a P2SH-wrapped P2WPKH output: a single push of the redeem script.
pub fn p2sh_p2wpkh_script_sig(key: &CompressedPublicKey) -> Result<ScriptBuf> {
    let redeem_script = p2wpkh(key);
    let push = PushBytesBuf::try_from(redeem_script.into_bytes())?;
    Ok(Builder::new().push_slice(push).into_script())
}
