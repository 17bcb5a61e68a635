pub mod amount;
pub mod assembler;
pub mod asset;
pub mod config;
pub mod error;
pub mod funding;
pub mod logging;
pub mod permute;
pub mod request;
pub mod script;
pub mod utxo;

pub use error::{Error, Result};
