pub const DEFAULT_CONFIG_FILE: &str = "/etc/jot/jot.toml";
pub const DEFAULT_SEED_FILE: &str = "/etc/jot/private/seed.b64";
pub const DEFAULT_DATA_DIR: &str = "/var/jot";
pub const DEFAULT_PORT: u16 = 8095;
pub const APP_CONFIG_ENV_PREFIX: &str = "JOT_";
