//! Generates noisy (typo'd) variants of strings for fuzzy-match test
//! corpora, plus a helper to pack a word list into an `fst::Set` for tests
//! that want a realistic sorted-term source to drive prefix/range queries.

use fst::SetBuilder;
use rand::prelude::*;

#[derive(Debug, Clone, Copy)]
pub enum Edit {
    Insert,
    Delete,
    Substitute,
    Transpose,
}

const ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Applies exactly one random edit to `word`, returning the noisy result.
/// Returns the original word unchanged if it's too short for the edit kind
/// chosen (e.g. transposing a one-character word).
pub fn noisy_variant(word: &str, rng: &mut impl Rng) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let edit = [Edit::Insert, Edit::Delete, Edit::Substitute, Edit::Transpose]
        .choose(rng)
        .copied()
        .unwrap();
    match edit {
        Edit::Insert => {
            let pos = rng.gen_range(0..=chars.len());
            let c = *ALPHABET.choose(rng).unwrap();
            chars.insert(pos, c);
        }
        Edit::Delete if chars.len() > 1 => {
            let pos = rng.gen_range(0..chars.len());
            chars.remove(pos);
        }
        Edit::Substitute => {
            let pos = rng.gen_range(0..chars.len());
            chars[pos] = *ALPHABET.choose(rng).unwrap();
        }
        Edit::Transpose if chars.len() > 1 => {
            let pos = rng.gen_range(0..chars.len() - 1);
            chars.swap(pos, pos + 1);
        }
        _ => {}
    }
    chars.into_iter().collect()
}

/// Generates `count` noisy variants of `word`, each with exactly `edits`
/// edits applied in sequence (the true edit distance may be lower than
/// `edits` if edits happen to cancel out, which is itself useful for
/// exercising the edit-distance budget near its boundary).
pub fn variants(word: &str, edits: u32, count: usize, rng: &mut impl Rng) -> Vec<String> {
    (0..count)
        .map(|_| {
            let mut current = word.to_string();
            for _ in 0..edits {
                current = noisy_variant(&current, rng);
            }
            current
        })
        .collect()
}

/// Builds a sorted `fst::Set` from an unsorted word list, for tests that
/// want to walk or range-query a realistic term set.
pub fn build_set(mut words: Vec<String>) -> fst::Set<Vec<u8>> {
    words.sort();
    words.dedup();
    let mut builder = SetBuilder::memory();
    for w in &words {
        builder.insert(w).expect("words must be sorted and unique");
    }
    fst::Set::new(builder.into_inner().expect("builder finishes cleanly"))
        .expect("bytes form a valid fst")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn noisy_variant_changes_length_by_at_most_one() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let noisy = noisy_variant("hello", &mut rng);
            assert!((noisy.len() as i64 - 5).abs() <= 1);
        }
    }

    #[test]
    fn build_set_contains_every_word() {
        let set = build_set(vec!["banana".into(), "apple".into(), "cherry".into()]);
        assert!(set.contains("apple"));
        assert!(set.contains("banana"));
        assert!(!set.contains("durian"));
    }
}
