use std::path::PathBuf;

use bitcoin::Network;
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::logging;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[clap(
    version = "0.1.0",
    about = "chanfund",
    long_about = r#"Builds channel funding transactions, optionally bound to an asset-transfer proof"#
)]
pub struct Config {
    #[clap(
        long,
        env = "LOG_FORMAT",
        help = "Log format (plain, json)",
        default_value = "plain"
    )]
    pub log_format: logging::Format,

    #[clap(
        long,
        env = "NETWORK",
        help = "Network used to encode the funding address",
        default_value = "bitcoin"
    )]
    pub network: Network,

    #[clap(
        long,
        env = "REQUEST_PATH",
        help = "Path to the JSON funding request (e.g., ./funding.json)"
    )]
    pub request: PathBuf,
}
