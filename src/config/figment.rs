use std::path::Path;
use rocket::figment::Figment;
use rocket::figment::providers::{Env, Format, Serialized, Toml};
use crate::bin_constants::{APP_CONFIG_ENV_PREFIX, DEFAULT_PORT};

pub trait FigmentExt {
    fn setup_app_config(
        self,
        config_file: impl AsRef<Path>,
    ) -> Figment;
}

impl FigmentExt for Figment {
    fn setup_app_config(self, config_file: impl AsRef<Path>) -> Figment {
        let config_file = config_file.as_ref();
        let figment = self.merge(Serialized::default("port", DEFAULT_PORT));
        // a missing file leaves the defaults and the environment in charge
        let figment = if config_file.exists() {
            figment.merge(Toml::file_exact(config_file))
        } else {
            figment
        };
        figment.merge(Env::prefixed(APP_CONFIG_ENV_PREFIX).global())
    }
}
