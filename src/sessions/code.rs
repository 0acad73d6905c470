//! Session code generator
//!
//! Produces the short join code the organizer shares with the group. Codes
//! are drawn uniformly from an alphabet with the visually ambiguous symbols
//! (I, O, 0, 1) removed. The generator itself never checks uniqueness; the
//! session manager retries on collision against open sessions.

use rand::Rng;

use crate::utils::validation::CODE_LEN;

/// Uppercase letters and digits, minus I, O, 0 and 1
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a code with the supplied randomness source
pub fn generate_code_with<R: Rng>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a code with thread-local randomness
pub fn generate_code() -> String {
    generate_code_with(&mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn codes_have_fixed_length() {
        for _ in 0..100 {
            assert_eq!(generate_code().len(), CODE_LEN);
        }
    }

    #[test]
    fn codes_stay_inside_the_alphabet() {
        for _ in 0..1000 {
            let code = generate_code();
            assert!(
                code.bytes().all(|b| CODE_ALPHABET.contains(&b)),
                "unexpected symbol in {code}"
            );
        }
    }

    #[test]
    fn no_ambiguous_symbols_in_alphabet() {
        for banned in [b'I', b'O', b'0', b'1'] {
            assert!(!CODE_ALPHABET.contains(&banned));
        }
        assert_eq!(CODE_ALPHABET.len(), 32);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = generate_code_with(&mut StdRng::seed_from_u64(42));
        let b = generate_code_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);

        let c = generate_code_with(&mut StdRng::seed_from_u64(43));
        assert_ne!(a, c);
    }
}
