//! The iterator algebra: every node in an evaluated query tree becomes one
//! of these, and the whole tree is walked by repeatedly calling `read`/
//! `skip_to` on the root, exactly as the original node types compose through
//! a shared cursor contract.

pub mod empty;
pub mod idlist;
pub mod intersect;
pub mod not;
pub mod optional;
pub mod term;
pub mod union;
pub mod wildcard;

use crate::types::{DocId, FieldMask};

/// One matched document at one level of the tree. Child records are kept
/// (rather than flattened) so an explain dump or a ranking function can walk
/// back down to see which sub-clauses actually matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub field_mask: FieldMask,
    pub weight: f64,
    pub term_freq: u32,
    pub offsets: Vec<u32>,
    pub children: Vec<SearchResult>,
}

impl SearchResult {
    pub fn leaf(doc_id: DocId, field_mask: FieldMask, weight: f64) -> Self {
        Self {
            doc_id,
            field_mask,
            weight,
            term_freq: 0,
            offsets: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Shared contract every node of an evaluated query tree implements.
/// Ascending doc-id order is an invariant every implementation must uphold:
/// downstream cursors (`Intersect`, `Union`, ...) rely on it to merge without
/// buffering the whole stream. There is no explicit `free()`: cursors own
/// their children and are torn down by `Drop` like anything else in Rust.
pub trait Cursor {
    /// Advances to and returns the next match, or `None` at end of stream.
    fn read(&mut self) -> Option<SearchResult>;

    /// Advances to the first match with `doc_id >= target`, or `None` if the
    /// stream is exhausted before reaching it.
    fn skip_to(&mut self, target: DocId) -> Option<SearchResult>;

    /// Whether a subsequent `read`/`skip_to` could still produce a match.
    fn has_next(&self) -> bool;

    /// The last result produced by `read`/`skip_to`, if any.
    fn current(&self) -> Option<&SearchResult>;

    /// A rough upper bound on the number of remaining matches, used for
    /// union/intersect ordering heuristics; not required to be exact.
    fn len(&self) -> usize;

    fn is_empty_estimate(&self) -> bool {
        self.len() == 0
    }
}

pub type BoxCursor = Box<dyn Cursor + Send>;
