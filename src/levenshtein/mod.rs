//! Levenshtein sparse-vector automaton and the DFA cache built on top of it.
//!
//! The automaton (this module) answers "what happens if the candidate term
//! continues with rune `c`" one step at a time, over [`SparseVector`] states.
//! [`dfa`] turns repeated automaton steps into a cached graph so the same
//! state is never recomputed twice within a query, and [`filter`] adapts that
//! graph into the push/pop contract a trie's depth-first walk expects.

pub mod dfa;
pub mod filter;

use derive_new::new;

use crate::sparse_vector::SparseVector;

/// Unassigned code point used to probe "any rune not in the pattern" in one
/// step, instead of enumerating the rest of Unicode. Chosen from the private
/// use area so it can never collide with a real pattern character.
pub(crate) const NON_PATTERN_SENTINEL: char = '\u{E000}';

#[derive(Debug, Clone, new)]
pub struct SparseAutomaton {
    pattern: Vec<char>,
    max_edits: u32,
}

impl SparseAutomaton {
    pub fn pattern(&self) -> &[char] {
        &self.pattern
    }

    pub fn max_edits(&self) -> u32 {
        self.max_edits
    }

    /// The initial state: the distance between each pattern prefix and the
    /// empty string, i.e. its own length, truncated at the edit budget.
    pub fn start(&self) -> SparseVector {
        let n = self.pattern.len() as u32;
        let limit = self.max_edits.min(n);
        SparseVector::from_sorted((0..=limit).map(|i| (i, i)).collect())
    }

    /// Advances `state` by one candidate character `c`, returning the new
    /// row. Implemented as the standard single-row streaming update for
    /// Levenshtein distance (Ukkonen), restricted to the entries that stay
    /// within `max_edits` — this is what keeps the vector sparse.
    pub fn step(&self, state: &SparseVector, c: char) -> SparseVector {
        let n = self.pattern.len() as u32;
        let max = self.max_edits;
        let mut entries = Vec::new();
        let mut prev_new: Option<u32> = None;

        for i in 0..=n {
            let deletion = state.get(i).map(|v| v + 1);
            let insertion = prev_new.map(|v| v + 1);
            let substitution = if i == 0 {
                None
            } else {
                state.get(i - 1).map(|v| {
                    if self.pattern[(i - 1) as usize] == c {
                        v
                    } else {
                        v + 1
                    }
                })
            };

            let value = [deletion, insertion, substitution]
                .into_iter()
                .flatten()
                .min();

            match value {
                Some(v) if v <= max => {
                    entries.push((i, v));
                    prev_new = Some(v);
                }
                _ => prev_new = None,
            }
        }

        SparseVector::from_sorted(entries)
    }

    pub fn is_match(&self, state: &SparseVector) -> bool {
        state.get(self.pattern.len() as u32).is_some()
    }

    pub fn can_match(&self, state: &SparseVector) -> bool {
        !state.is_empty()
    }
}
