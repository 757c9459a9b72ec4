pub mod app_config;
pub mod figment;
pub mod oracle_config;
