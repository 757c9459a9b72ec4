use std::path::PathBuf;
use clap::Parser;
use jot::bin_constants::DEFAULT_CONFIG_FILE;

#[derive(Clone, Debug, Eq, Parser, PartialEq)]
#[command(version, author, about)]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Create the configured seed file
    #[arg(long, default_value_t = false, conflicts_with = "password_for")]
    pub generate_seed: bool,

    /// Print the edit password of the note with the given key
    #[arg(long, value_name = "KEY", required_unless_present = "generate_seed")]
    pub password_for: Option<String>,
}
