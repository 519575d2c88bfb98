//! Cache of sparse-vector states into a DFA, keyed by state equality so that
//! two trie paths which reach the same edit-distance row share a node.
//!
//! Construction happens once per fuzzy/prefix query node (not once per
//! vocabulary), over an alphabet restricted to the runes appearing in the
//! pattern plus a single fallback edge for everything else — this is what
//! keeps the cache bounded instead of exploding over the full alphabet, per
//! the lazy-construction note in the design docs.

use std::collections::HashMap;

use debug_print::debug_println;
use polonius_the_crab::{polonius, polonius_return};
use slab::Slab;

use super::{SparseAutomaton, NON_PATTERN_SENTINEL};
use crate::sparse_vector::SparseVector;

pub type DfaNodeId = usize;

#[derive(Debug)]
pub struct DfaNode {
    pub distance: u32,
    pub is_match: bool,
    pub can_match: bool,
    state: SparseVector,
    edges: Vec<(char, DfaNodeId)>,
    fallback: DfaNodeId,
}

impl DfaNode {
    pub fn edge(&self, c: char) -> DfaNodeId {
        self.edges
            .iter()
            .find(|&&(ec, _)| ec == c)
            .map(|&(_, id)| id)
            .unwrap_or(self.fallback)
    }
}

pub struct DfaCache {
    nodes: Slab<DfaNode>,
    canonical: HashMap<SparseVector, DfaNodeId>,
    dead: DfaNodeId,
}

impl DfaCache {
    pub fn new() -> Self {
        let mut nodes = Slab::new();
        let dead = nodes.insert(DfaNode {
            distance: u32::MAX,
            is_match: false,
            can_match: false,
            state: SparseVector::empty(),
            edges: Vec::new(),
            fallback: 0,
        });
        nodes[dead].fallback = dead;
        Self {
            nodes,
            canonical: HashMap::new(),
            dead,
        }
    }

    pub fn dead(&self) -> DfaNodeId {
        self.dead
    }

    pub fn node(&self, id: DfaNodeId) -> &DfaNode {
        &self.nodes[id]
    }

    pub fn id_of(&self, state: &SparseVector) -> Option<DfaNodeId> {
        self.canonical.get(state).copied()
    }

    /// Returns the canonical node for `state`, building its whole reachable
    /// subgraph over `alphabet` the first time this exact state is seen.
    pub fn resolve(
        &mut self,
        state: &SparseVector,
        automaton: &SparseAutomaton,
        alphabet: &[char],
    ) -> &DfaNode {
        let mut this = self;
        polonius!(|this| -> &'polonius DfaNode {
            if let Some(&id) = this.canonical.get(state) {
                polonius_return!(&this.nodes[id]);
            }
        });
        let id = this.build(state.clone(), automaton, alphabet);
        &this.nodes[id]
    }

    fn build(
        &mut self,
        state: SparseVector,
        automaton: &SparseAutomaton,
        alphabet: &[char],
    ) -> DfaNodeId {
        if let Some(&id) = self.canonical.get(&state) {
            return id;
        }

        let is_match = automaton.is_match(&state);
        let can_match = automaton.can_match(&state);
        let distance = state.min_value().unwrap_or(u32::MAX);
        debug_println!(
            "dfa: new state distance={distance} is_match={is_match} can_match={can_match}"
        );

        let id = self.nodes.insert(DfaNode {
            distance,
            is_match,
            can_match,
            state: state.clone(),
            edges: Vec::new(),
            fallback: self.dead,
        });
        self.canonical.insert(state.clone(), id);

        if can_match {
            let mut edges = Vec::with_capacity(alphabet.len());
            for &c in alphabet {
                let next_state = automaton.step(&state, c);
                let next_id = if automaton.can_match(&next_state) {
                    self.build(next_state, automaton, alphabet)
                } else {
                    self.dead
                };
                edges.push((c, next_id));
            }
            let fallback_state = automaton.step(&state, NON_PATTERN_SENTINEL);
            let fallback = if automaton.can_match(&fallback_state) {
                self.build(fallback_state, automaton, alphabet)
            } else {
                self.dead
            };
            self.nodes[id].edges = edges;
            self.nodes[id].fallback = fallback;
        }

        id
    }
}

impl Default for DfaCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully built Levenshtein DFA for one pattern and edit budget, ready to
/// be driven by a [`super::filter::DfaFilter`] over a foreign trie.
pub struct LevenshteinDfa {
    automaton: SparseAutomaton,
    cache: DfaCache,
    root: DfaNodeId,
}

impl LevenshteinDfa {
    pub fn build(pattern: &str, max_edits: u32) -> Self {
        let pattern_chars: Vec<char> = pattern.chars().collect();
        let mut alphabet = pattern_chars.clone();
        alphabet.sort_unstable();
        alphabet.dedup();

        let automaton = SparseAutomaton::new(pattern_chars, max_edits);
        let mut cache = DfaCache::new();
        let start = automaton.start();
        let root = {
            let _ = cache.resolve(&start, &automaton, &alphabet);
            cache.id_of(&start).expect("state was just inserted")
        };

        Self {
            automaton,
            cache,
            root,
        }
    }

    pub fn cache(&self) -> &DfaCache {
        &self.cache
    }

    pub fn automaton(&self) -> &SparseAutomaton {
        &self.automaton
    }

    pub fn root(&self) -> DfaNodeId {
        self.root
    }

    pub fn pattern_len(&self) -> usize {
        self.automaton.pattern().len()
    }

    pub fn max_edits(&self) -> u32 {
        self.automaton.max_edits()
    }
}
