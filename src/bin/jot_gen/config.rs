use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use jot::config::app_config::app_config_default_seed_file;

/// The part of the daemon config needed to create a seed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SeedConfig {
    #[serde(default = "app_config_default_seed_file")]
    pub seed_file: PathBuf,
}
