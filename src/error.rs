use bitcoin::Amount;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("No UTXOs provided to fund the channel")]
    NoInputs,
    #[error("Funding amount must be greater than zero")]
    ZeroFunding,
    #[error("Insufficient funds: inputs {inputs}, outputs {outputs}")]
    InsufficientFunds { inputs: Amount, outputs: Amount },
    #[error("Amount overflow")]
    AmountOverflow,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid asset id: {0}")]
    InvalidAssetId(String),
    #[error("Input count mismatch: {inputs} inputs, {utxos} utxos")]
    InputCountMismatch { inputs: usize, utxos: usize },
    #[error("Output {0} was left unfilled")]
    UnfilledOutput(usize),
    #[error("Key derivation error: {0}")]
    KeyDerivation(#[from] bitcoin::bip32::Error),
    #[error("Script error: {0}")]
    Script(#[from] bitcoin::script::PushBytesError),
    #[error("Proof encoding failed: {0}")]
    Encoding(#[from] ciborium::ser::Error<std::io::Error>),
    #[error("Hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
