#![allow(dead_code)]

use std::sync::Arc;
use jot::key::ProductionKeyGenerator;
use jot::oracle::{MasterPassword, PasswordOracle, ProductionPasswordOracle, SecretMaterial};
use jot::pipeline::Jot;
use jot::routes::JotRocketBuildExt;
use jot::storage::MemoryBackend;
use rocket::local::asynchronous::Client;

pub const TEST_HOST: &str = "http://jot.test";
pub const TEST_MAX_NOTE_SIZE: u64 = 1024;

pub fn make_oracle() -> ProductionPasswordOracle {
    ProductionPasswordOracle::new(
        SecretMaterial::new(
            MasterPassword::new("integration master password"),
            b"integration seed".to_vec(),
        ),
        argon2::Params::new(8, 1, 1, None).unwrap(),
    ).unwrap()
}

pub fn password_for(key: &str) -> String {
    make_oracle().generate(key).unwrap()
}

pub async fn make_client(public_host: Option<&str>) -> Client {
    let jot = Jot::new(
        Arc::new(make_oracle()),
        Box::new(MemoryBackend::new(TEST_MAX_NOTE_SIZE)),
        Box::new(ProductionKeyGenerator::new()),
    );
    let rocket = rocket::build()
        .install_jot(jot, public_host.map(str::to_owned));
    Client::untracked(rocket).await
        .expect("valid rocket instance")
}
