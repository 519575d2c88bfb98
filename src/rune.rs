//! Unicode code-point sequences ("runes"), the unit the term trie and the
//! Levenshtein automaton operate over instead of raw bytes.
//!
//! Named `Runes` rather than `String`/`Vec<char>` to match the vocabulary
//! used throughout the rest of this crate (and the index it evaluates
//! queries against): a term's rune sequence is what gets fed through the
//! sparse-vector automaton one code point at a time.

use std::fmt;

use derive_new::new;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, new)]
pub struct Runes(Vec<char>);

impl Runes {
    pub fn as_slice(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }
}

impl From<&str> for Runes {
    fn from(s: &str) -> Self {
        Self(s.chars().collect())
    }
}

impl From<String> for Runes {
    fn from(s: String) -> Self {
        Self(s.chars().collect())
    }
}

impl fmt::Display for Runes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
