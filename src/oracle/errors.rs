use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("failed to initialize password derivation: {0}")]
    Initialization(argon2::Error),

    #[error("failed to derive password: {0}")]
    Derivation(argon2::Error),

    #[error("no password satisfying the policy after {0} rounds")]
    PolicyUnsatisfiable(u32),
}
