use crate::cli::CliConfig;
use crate::config::SeedConfig;
use clap::Parser;
use figment::Figment;
use jot::config::app_config::AppConfig;
use jot::config::figment::FigmentExt;
use jot::error_exit;
use jot::key::NoteKey;
use jot::logging::init_tool_logging;
use jot::oracle::{PasswordOracle, ProductionPasswordOracle, SecretMaterial};
use jot::seed::{make_seed, MakeSeedError};
use log::{error, info};
use serde::de::DeserializeOwned;
use std::process::exit;

mod cli;
mod config;

fn main() {
    init_tool_logging();

    let cli_config = CliConfig::parse();

    if !cli_config.config_file.exists() {
        info!(
            "configuration file at {} does not exist, using defaults and environment",
            cli_config.config_file.display(),
        )
    }

    if cli_config.generate_seed {
        generate_seed(load_config(&cli_config))
    } else if let Some(ref key) = cli_config.password_for {
        print_password(key, load_config(&cli_config))
    }
}

fn load_config<T: DeserializeOwned>(cli_config: &CliConfig) -> T {
    Figment::new()
        .setup_app_config(&cli_config.config_file)
        .extract()
        .unwrap_or_else(|e| {
            for e in e {
                error!("{e}");
            }
            info!("finishing due to a configuration error");
            exit(1)
        })
}

fn generate_seed(config: SeedConfig) {
    match make_seed(&config.seed_file) {
        Ok(()) => info!("generated a new seed at {}", config.seed_file.display()),
        Err(MakeSeedError::AlreadyExists) => error_exit!(
            "{} already exists, replacing it would invalidate every password",
            config.seed_file.display(),
        ),
        Err(e) => error_exit!("could not generate a seed: {e}"),
    }
}

fn print_password(key: &str, app_config: AppConfig) {
    let key: NoteKey = key.parse()
        .unwrap_or_else(|e| error_exit!("invalid key: {e}"));
    let secret = SecretMaterial::load(app_config.master_password, &app_config.seed_file)
        .unwrap_or_else(|e| error_exit!("could not load the seed: {e}"));
    let params = argon2::Params::try_from(&app_config.oracle)
        .unwrap_or_else(|e| error_exit!("oracle config is invalid: {e}"));
    let oracle = ProductionPasswordOracle::new(secret, params)
        .unwrap_or_else(|e| error_exit!("could not initialize the oracle: {e}"));
    let password = oracle.generate(&key)
        .unwrap_or_else(|e| error_exit!("could not derive the password: {e}"));
    println!("{password}");
}
