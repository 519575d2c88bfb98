//! Adapts a built [`LevenshteinDfa`] to the push/pop contract a trie's
//! depth-first traversal drives: descend a rune with [`DfaFilter::filter`],
//! backtrack with [`DfaFilter::stack_pop`]. The trie itself (range iteration,
//! node storage) lives in the storage backend; this is the piece of the walk
//! that is genuinely ours.

use debug_print::debug_println;

use super::dfa::{DfaNodeId, LevenshteinDfa};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCode {
    /// Keep descending into this child.
    Continue,
    /// No completion through this child can still match; prune the subtree.
    Stop,
}

/// `prefix_mode` mirrors query.c's prefix/fuzzy split: both walk the trie
/// through the same DFA, but prefix expansion (`max_edits == 0`, conceptually)
/// accepts every completion once the literal pattern has been consumed,
/// while fuzzy expansion only accepts completions where the whole candidate
/// is within the edit budget.
pub struct DfaFilter<'a> {
    dfa: &'a LevenshteinDfa,
    stack: Vec<DfaNodeId>,
    prefix_mode: bool,
    /// Set once a prefix match is found; all descendants are then accepted
    /// without further DFA lookups, since any suffix completes the prefix.
    absorbed_at_depth: Option<usize>,
}

impl<'a> DfaFilter<'a> {
    pub fn new(dfa: &'a LevenshteinDfa, prefix_mode: bool) -> Self {
        Self {
            dfa,
            stack: vec![dfa.root()],
            prefix_mode,
            absorbed_at_depth: None,
        }
    }

    fn current(&self) -> DfaNodeId {
        *self.stack.last().expect("stack is never empty")
    }

    pub fn distance(&self) -> u32 {
        self.dfa.cache().node(self.current()).distance
    }

    /// Called as the trie's walk descends through rune `c`. Returns whether
    /// to continue into the child and whether the path ending there (after
    /// this call) is a match.
    pub fn filter(&mut self, c: char) -> (FilterCode, bool) {
        debug_println!("dfa filter: visiting candidate rune {c:?} at depth {}", self.stack.len());
        if self.prefix_mode && self.absorbed_at_depth.is_some() {
            self.stack.push(self.current());
            return (FilterCode::Continue, true);
        }

        let next_id = self.dfa.cache().node(self.current()).edge(c);
        self.stack.push(next_id);
        let next = self.dfa.cache().node(next_id);

        if self.prefix_mode && next.is_match {
            self.absorbed_at_depth = Some(self.stack.len());
            return (FilterCode::Continue, true);
        }

        let matched = if self.prefix_mode { false } else { next.is_match };
        let code = if next.can_match {
            FilterCode::Continue
        } else {
            FilterCode::Stop
        };
        (code, matched)
    }

    /// Called as the trie's walk backtracks `num_levels` levels up.
    pub fn stack_pop(&mut self, num_levels: usize) {
        for _ in 0..num_levels {
            if let Some(depth) = self.absorbed_at_depth {
                if self.stack.len() <= depth {
                    self.absorbed_at_depth = None;
                }
            }
            self.stack.pop();
        }
        if self.stack.is_empty() {
            self.stack.push(self.dfa.root());
        }
    }
}
