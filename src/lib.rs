pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use tracing::{debug, info};

use crate::core::config::AppConfig;

#[derive(Debug, Clone)]
pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Interactive,
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(base_url = %config.provider.base_url, currencies = ?config.currencies, "Loaded config");

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::convert(&config, &amount, &from, &to).await
        }
        AppCommand::Interactive => cli::convert::interactive(&config).await,
        AppCommand::Currencies => {
            cli::convert::list_currencies(&config);
            Ok(())
        }
    }
}
