// src/crypto/phrase.rs
//! Recovery phrase: 16 symbols from a 32-letter unambiguous alphabet,
//! grouped `XXXX-XXXX-XXXX-XXXX`.

use crate::consts::{RECOVERY_ALPHABET, RECOVERY_GROUP_LEN, RECOVERY_PHRASE_SYMBOLS};

use super::encrypt::random_bytes;

pub fn generate_recovery_phrase() -> String {
    let random = random_bytes::<RECOVERY_PHRASE_SYMBOLS>();
    let groups = RECOVERY_PHRASE_SYMBOLS / RECOVERY_GROUP_LEN;
    let mut phrase = String::with_capacity(RECOVERY_PHRASE_SYMBOLS + groups - 1);

    for (i, byte) in random.iter().enumerate() {
        if i > 0 && i % RECOVERY_GROUP_LEN == 0 {
            phrase.push('-');
        }
        // 256 is a multiple of 32: no modulo bias
        let idx = usize::from(*byte) % RECOVERY_ALPHABET.len();
        phrase.push(char::from(RECOVERY_ALPHABET[idx]));
    }
    phrase
}

/// Trim and upper-case user input the way the unlock prompt does.
pub fn normalize_recovery_phrase(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// Shape check only; says nothing about whether the phrase is correct.
pub fn is_well_formed_recovery_phrase(phrase: &str) -> bool {
    let groups: Vec<&str> = phrase.split('-').collect();
    groups.len() == RECOVERY_PHRASE_SYMBOLS / RECOVERY_GROUP_LEN
        && groups.iter().all(|g| {
            g.len() == RECOVERY_GROUP_LEN && g.bytes().all(|b| RECOVERY_ALPHABET.contains(&b))
        })
}
