use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use crate::bin_constants::{DEFAULT_DATA_DIR, DEFAULT_SEED_FILE};
use crate::config::oracle_config::OracleConfigData;
use crate::lib_constants::DEFAULT_MAX_NOTE_SIZE;
use crate::oracle::MasterPassword;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "app_config_default_seed_file")]
    pub seed_file: PathBuf,

    pub master_password: MasterPassword,

    #[serde(default = "app_config_default_data_directory")]
    pub data_directory: PathBuf,

    /// Prefix for the links handed out on creation, `http://<Host>` if unset.
    #[serde(default)]
    pub public_host: Option<String>,

    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "app_config_default_max_note_size")]
    pub max_note_size: u64,

    #[serde(default)]
    pub oracle: OracleConfigData,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Filesystem,
    Memory,
}

pub fn app_config_default_seed_file() -> PathBuf {
    DEFAULT_SEED_FILE.into()
}

pub fn app_config_default_data_directory() -> PathBuf {
    DEFAULT_DATA_DIR.into()
}

pub fn app_config_default_max_note_size() -> u64 {
    DEFAULT_MAX_NOTE_SIZE
}

#[cfg(test)]
impl AppConfig {
    pub fn new(master_password: MasterPassword) -> Self {
        AppConfig {
            seed_file: app_config_default_seed_file(),
            master_password,
            data_directory: app_config_default_data_directory(),
            public_host: None,
            backend: BackendKind::default(),
            max_note_size: app_config_default_max_note_size(),
            oracle: OracleConfigData::default(),
        }
    }
}
