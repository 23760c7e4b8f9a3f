// src/main.rs
use clap::Parser;
use savepass::{cli, config, error};

fn main() -> Result<(), error::AppError> {
    env_logger::init();
    log::info!("Starting SavePass");

    let cli_args = cli::Cli::parse();
    let config = config::load_config();

    if let Err(e) = cli::handle_cli_command(cli_args, &config) {
        log::error!("Command failed: {:#?}", e);
        eprintln!("Error: {}", e);
        return Err(e);
    }

    log::info!("SavePass finished successfully.");
    Ok(())
}
