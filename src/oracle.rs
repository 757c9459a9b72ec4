mod errors;
mod secret;

use argon2::{Algorithm, Argon2, Version};
use subtle::ConstantTimeEq;
use crate::lib_constants::{MAX_DERIVATION_ROUNDS, PASSWORD_LENGTH, PASSWORD_MIN_DIGITS, PASSWORD_MIN_LOWER, PASSWORD_MIN_UPPER};

pub use errors::OracleError;
pub use secret::{MasterPassword, SecretLoadError, SecretMaterial};

const PASSWORD_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const SALT_PREFIX: &str = "jot-password";
const DERIVED_LEN: usize = 64;

/// Derives note passwords from the process secret and the note key.
///
/// Nothing is stored: a password is valid for a key iff it equals what
/// [`PasswordOracle::generate`] returns for that key.
pub trait PasswordOracle: Send + Sync {
    fn generate(&self, key: &str) -> Result<String, OracleError>;

    fn is_match(&self, key: &str, supplied: &str) -> Result<bool, OracleError> {
        let generated = self.generate(key)?;
        Ok(constant_time_eq(generated.as_bytes(), supplied.as_bytes()))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PasswordPolicy {
    pub length: usize,
    pub min_upper: usize,
    pub min_lower: usize,
    pub min_digits: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        PasswordPolicy {
            length: PASSWORD_LENGTH,
            min_upper: PASSWORD_MIN_UPPER,
            min_lower: PASSWORD_MIN_LOWER,
            min_digits: PASSWORD_MIN_DIGITS,
        }
    }
}

impl PasswordPolicy {
    pub fn is_satisfied_by(&self, password: &str) -> bool {
        let count = |f: fn(&char) -> bool| password.chars().filter(f).count();
        password.chars().count() == self.length
            && password.chars().all(|c| c.is_ascii_alphanumeric())
            && count(char::is_ascii_uppercase) >= self.min_upper
            && count(char::is_ascii_lowercase) >= self.min_lower
            && count(char::is_ascii_digit) >= self.min_digits
    }
}

pub struct ProductionPasswordOracle {
    secret: SecretMaterial,
    argon2_params: argon2::Params,
    policy: PasswordPolicy,
}

impl ProductionPasswordOracle {
    pub fn new(
        secret: SecretMaterial,
        argon2_params: argon2::Params,
    ) -> Result<Self, OracleError> {
        let ret = ProductionPasswordOracle {
            secret,
            argon2_params,
            policy: PasswordPolicy::default(),
        };
        ret.get_hasher().map_err(OracleError::Initialization)?;
        Ok(ret)
    }

    fn get_hasher(&self) -> Result<Argon2<'_>, argon2::Error> {
        Argon2::new_with_secret(
            self.secret.seed(),
            Algorithm::Argon2id,
            Version::V0x13,
            self.argon2_params.clone(),
        )
    }

    fn derive_round(
        &self,
        key: &str,
        round: u32,
    ) -> Result<[u8; DERIVED_LEN], OracleError> {
        let salt = format!("{SALT_PREFIX}:{round}:{key}");
        let mut output = [0u8; DERIVED_LEN];
        self.get_hasher()
            .and_then(|hasher|
                hasher.hash_password_into(
                    self.secret.master_password().as_bytes(),
                    salt.as_bytes(),
                    &mut output,
                )
            )
            .map_err(OracleError::Derivation)?;
        Ok(output)
    }
}

impl PasswordOracle for ProductionPasswordOracle {
    fn generate(&self, key: &str) -> Result<String, OracleError> {
        for round in 0..MAX_DERIVATION_ROUNDS {
            let derived = self.derive_round(key, round)?;
            if let Some(password) = select_password(&derived, &self.policy) {
                return Ok(password);
            }
        }
        Err(OracleError::PolicyUnsatisfiable(MAX_DERIVATION_ROUNDS))
    }
}

// rejection sampling keeps the character distribution uniform
fn select_password(derived: &[u8], policy: &PasswordPolicy) -> Option<String> {
    let accepted_below = 256 - 256 % PASSWORD_ALPHABET.len();
    let candidate: String = derived.iter()
        .map(|b| *b as usize)
        .filter(|b| *b < accepted_below)
        .map(|b| PASSWORD_ALPHABET[b % PASSWORD_ALPHABET.len()] as char)
        .take(policy.length)
        .collect();
    Some(candidate).filter(|c| policy.is_satisfied_by(c))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let max_len = a.len().max(b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xffu8; max_len];
    a_padded[..a.len()].copy_from_slice(a);
    b_padded[..b.len()].copy_from_slice(b);
    let lengths_equal = (a.len() as u64).ct_eq(&(b.len() as u64));
    (lengths_equal & a_padded.ct_eq(&b_padded)).into()
}
