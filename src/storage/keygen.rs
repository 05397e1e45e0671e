//! Pronounceable result keys.
//!
//! A key is a run of syllables, each one of vowel+consonant,
//! consonant+vowel or consonant+vowel+consonant, e.g. `kobatesuvri`.

use rand::Rng;

const CONSONANTS: &[u8] = b"bcdfghjklmnpqrstvwxyz";
const VOWELS: &[u8] = b"aeiou";

/// Syllable range of generated keys.
pub const MIN_SYLLABLES: usize = 5;
pub const MAX_SYLLABLES: usize = 6;

fn pick<R: Rng + ?Sized>(rng: &mut R, set: &[u8]) -> char {
    set[rng.random_range(0..set.len())] as char
}

/// Generates a word of `min..=max` syllables.
pub fn gen_word(min: usize, max: usize) -> String {
    let mut rng = rand::rng();
    let syllables = rng.random_range(min..=max.max(min));
    let mut word = String::with_capacity(syllables * 3);

    for _ in 0..syllables {
        let x: f32 = rng.random();
        if x < 0.333 {
            word.push(pick(&mut rng, VOWELS));
            word.push(pick(&mut rng, CONSONANTS));
        } else if x < 0.666 {
            word.push(pick(&mut rng, CONSONANTS));
            word.push(pick(&mut rng, VOWELS));
        } else {
            word.push(pick(&mut rng, CONSONANTS));
            word.push(pick(&mut rng, VOWELS));
            word.push(pick(&mut rng, CONSONANTS));
        }
    }

    word
}

/// Generates a result key.
pub fn generate_key() -> String {
    gen_word(MIN_SYLLABLES, MAX_SYLLABLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_length_and_alphabet() {
        for _ in 0..200 {
            let key = generate_key();
            // 5 syllables of 2 chars up to 6 syllables of 3 chars
            assert!((10..=18).contains(&key.len()), "bad length: {}", key);
            assert!(key.bytes().all(|b| CONSONANTS.contains(&b) || VOWELS.contains(&b)));
        }
    }

    #[test]
    fn test_every_syllable_has_a_vowel() {
        // no syllable form allows more than two consonants in a row
        // (consonant+vowel+consonant followed by consonant+vowel)
        for _ in 0..200 {
            let key = generate_key();
            let mut run = 0;
            for b in key.bytes() {
                if CONSONANTS.contains(&b) {
                    run += 1;
                    assert!(run <= 2, "too many consonants in {}", key);
                } else {
                    run = 0;
                }
            }
        }
    }

    #[test]
    fn test_inverted_range_is_clamped() {
        let word = gen_word(2, 1);
        assert!((4..=6).contains(&word.len()));
    }

    #[test]
    fn test_keys_vary() {
        let keys: std::collections::HashSet<String> = (0..50).map(|_| generate_key()).collect();
        assert!(keys.len() > 40);
    }
}
