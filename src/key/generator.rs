use rand::Rng;
use crate::key::{NoteKey, KEY_ALPHABET};
use crate::lib_constants::KEY_LENGTH;

pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> NoteKey;
}

pub struct ProductionKeyGenerator;

impl ProductionKeyGenerator {
    pub fn new() -> Self {
        ProductionKeyGenerator
    }
}

impl Default for ProductionKeyGenerator {
    fn default() -> Self {
        ProductionKeyGenerator::new()
    }
}

impl KeyGenerator for ProductionKeyGenerator {
    fn generate(&self) -> NoteKey {
        make_key(&mut rand::rng(), KEY_LENGTH)
    }
}

pub fn make_key(rng: &mut impl Rng, length: usize) -> NoteKey {
    NoteKey::from_alphabet_unchecked(
        (0..length)
            .map(|_| KEY_ALPHABET[rng.random_range(0..KEY_ALPHABET.len())] as char)
            .collect()
    )
}
