use std::path::Path;
use std::sync::Arc;
use async_trait::async_trait;
use jot::config::app_config::{AppConfig, BackendKind};
use jot::key::ProductionKeyGenerator;
use jot::oracle::{ProductionPasswordOracle, SecretMaterial};
use jot::pipeline::Jot;
use jot::routes::JotRocketBuildExt;
use jot::seed::{ensure_seed, MakeSeedError};
use jot::storage::{MemoryBackend, NoteBackend, NoteStorage};
use jot::util::StrExt;
use log::{error, info, warn};
use rocket::fairing::{Fairing, Info};
use rocket::{Build, Rocket};

pub struct AppSetupFairing;

macro_rules! ok_or_bail {
    ($rocket:ident, $expr:expr, |$e:ident| $error_logger:expr) => ({
        match $expr {
            std::result::Result::Ok(ok) => ok,
            std::result::Result::Err(e) => {
                let $e = e;
                $error_logger;
                return std::result::Result::Err($rocket);
            },
        }
    });
}

#[async_trait]
impl Fairing for AppSetupFairing {
    fn info(&self) -> Info {
        use rocket::fairing::Kind;
        Info {
            name: "app setup",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(
        &self,
        rocket: Rocket<Build>,
    ) -> rocket::fairing::Result {
        let config: AppConfig = ok_or_bail!(
            rocket,
            rocket.figment().extract(),
            |e| {
                for e in e {
                    error!("{e}");
                }
                info!("finishing due to a config parse error");
            }
        );
        if config.master_password.is_empty() {
            error!("master_password must not be empty");
            return Err(rocket);
        }

        ok_or_bail!(
            rocket,
            create_missing_seed(&config.seed_file),
            |e| error!("failed to create seed file {}: {e}", config.seed_file.display())
        );
        let secret = ok_or_bail!(
            rocket,
            SecretMaterial::load(config.master_password.clone(), &config.seed_file),
            |e| error!("failed to load seed from {}: {e}", config.seed_file.display())
        );
        let argon2_params = ok_or_bail!(
            rocket,
            argon2::Params::try_from(&config.oracle),
            |e| error!("oracle config is invalid: {e}")
        );
        let oracle = ok_or_bail!(
            rocket,
            ProductionPasswordOracle::new(secret, argon2_params),
            |e| error!("password oracle initialization failed: {e}")
        );

        let backend: Box<dyn NoteBackend> = match config.backend {
            BackendKind::Filesystem => Box::new(
                ok_or_bail!(
                    rocket,
                    NoteStorage::new(&config).await,
                    |e| error!("note storage initialization failed: {e}")
                )
            ),
            BackendKind::Memory => {
                warn!("using the in-memory backend, notes will not survive a restart");
                Box::new(MemoryBackend::new(config.max_note_size))
            },
        };

        let jot = Jot::new(
            Arc::new(oracle),
            backend,
            Box::new(ProductionKeyGenerator::new()),
        );
        let public_host = config.public_host
            .as_ref()
            .and_then(|host| host.nonblank_to_some());
        Ok(rocket.install_jot(jot, public_host))
    }
}

fn create_missing_seed(seed_file: &Path) -> Result<(), MakeSeedError> {
    if ensure_seed(seed_file)? {
        warn!(
            "no seed file found, generated a new one at {}; back it up, losing it \
                invalidates every password handed out",
            seed_file.display(),
        );
    }
    Ok(())
}
