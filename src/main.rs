use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use lich_client::cli::Cli;
use lich_client::config::{load_config, print_schema};
use lich_client::startup;
use lich_client::utils::logger::init_logging;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.schema {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Failed to render schema: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match startup::run(Arc::new(config)).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Client failed to start: {}", e);
            ExitCode::FAILURE
        }
    }
}
