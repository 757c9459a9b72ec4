use std::time::Duration;

pub const DEFAULT_MAX_NOTE_SIZE: u64 = 128 * 1024;

// the defaults are taken from the argon2 crate itself
pub const DEFAULT_ARGON2_M_COST: u32 = 19 * 1024;
pub const DEFAULT_ARGON2_T_COST: u32 = 2;
pub const DEFAULT_ARGON2_P_COST: u32 = 1;

// relative to the data directory
pub const NOTES_DIRECTORY_PATH: &str = "notes";

pub const KEY_LENGTH: usize = 12;
pub const MAX_KEY_LENGTH: usize = 64;
pub const MAX_KEY_GENERATION_ATTEMPTS: usize = 8;

pub const PASSWORD_LENGTH: usize = 15;
pub const PASSWORD_MIN_UPPER: usize = 3;
pub const PASSWORD_MIN_LOWER: usize = 3;
pub const PASSWORD_MIN_DIGITS: usize = 1;
pub const MAX_DERIVATION_ROUNDS: u32 = 64;

pub const SEED_LENGTH: usize = 32;

// tried in order until the filesystem records a newer mtime
pub const MTIME_BUMP_STEPS: [Duration; 3] = [
    Duration::from_micros(1),
    Duration::from_millis(1),
    Duration::from_secs(1),
];
