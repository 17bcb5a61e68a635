use std::fs;

use anyhow::Result;
use bitcoin::{Address, consensus::encode::serialize_hex};
use chanfund::{
    config::Config,
    funding::{build_asset_funding_tx, build_funding_tx},
    logging,
    request::{FundingRequest, FundingResult, Inputs},
};
use clap::Parser;
use tracing::info;

fn main() -> Result<()> {
    let config = Config::try_parse()?;
    logging::setup(config.log_format);
    info!("{:#?}", config);

    let request: FundingRequest = serde_json::from_str(&fs::read_to_string(&config.request)?)?;
    let result = match request.into_inputs()? {
        Inputs::Standard(inputs) => {
            let outputs = build_funding_tx(inputs)?;
            FundingResult {
                txid: outputs.transaction.compute_txid(),
                transaction_hex: serialize_hex(&outputs.transaction),
                funding_output_index: outputs.funding_output_index,
                funding_address: Address::p2wsh(&outputs.witness_script, config.network)
                    .to_string(),
                fee_sat: outputs.fee.to_sat(),
                utxos: outputs.utxos,
                proof: None,
            }
        }
        Inputs::Asset(inputs) => {
            let outputs = build_asset_funding_tx(inputs)?;
            info!("Proof id {}", outputs.proof.id()?);
            FundingResult {
                txid: outputs.transaction.compute_txid(),
                transaction_hex: serialize_hex(&outputs.transaction),
                funding_output_index: outputs.funding_output_index,
                funding_address: Address::p2wsh(&outputs.witness_script, config.network)
                    .to_string(),
                fee_sat: outputs.fee.to_sat(),
                utxos: outputs.utxos,
                proof: Some(outputs.proof),
            }
        }
    };
    info!(
        "Funding transaction {} pays the channel at output {}",
        result.txid, result.funding_output_index
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
