mod app_setup;
mod cli;

use crate::cli::CliConfig;
use app_setup::AppSetupFairing;
use clap::{crate_name, Parser};
use figment::Figment;
use jot::config::figment::FigmentExt;
use jot::error_exit;
use jot::logging::{init_daemon_logging, UseSyslog};
use log::{info, warn};

fn main() {
    let cli_config = CliConfig::parse();
    init_daemon_logging(UseSyslog::from(cli_config.syslog));

    info!("{} starting up", crate_name!());

    if !cli_config.config_file.exists() {
        warn!(
            "configuration file at {} does not exist, using defaults and environment",
            cli_config.config_file.display(),
        )
    }
    let figment = Figment::from(rocket::Config::default())
        .setup_app_config(&cli_config.config_file);

    let result = rocket::execute(
        rocket
            ::custom(figment)
            .attach(AppSetupFairing)
            .launch()
    );
    if let Err(e) = result {
        error_exit!("failed to launch rocket: {}", e);
    }
}
