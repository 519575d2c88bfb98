//! `Optional`: every document in the wildcard-bounded universe, with extra
//! weight and offsets folded in wherever the wrapped child also matches.
//! Unlike `Union`, the child never gates membership — it only enriches it.

use super::wildcard::WildcardCursor;
use super::{Cursor, SearchResult};
use crate::types::DocId;

pub struct OptionalCursor {
    universe: WildcardCursor,
    child: Box<dyn Cursor + Send>,
    child_current: Option<SearchResult>,
    current: Option<SearchResult>,
}

impl OptionalCursor {
    pub fn new(max_doc_id: DocId, weight: f64, child: Box<dyn Cursor + Send>) -> Self {
        Self {
            universe: WildcardCursor::new(max_doc_id, weight),
            child,
            child_current: None,
            current: None,
        }
    }

    fn advance_child_to(&mut self, target: DocId) {
        if self.child_current.as_ref().map(|r| r.doc_id) == Some(target) {
            return;
        }
        self.child_current = self.child.skip_to(target).filter(|r| r.doc_id == target);
    }
}

impl Cursor for OptionalCursor {
    fn read(&mut self) -> Option<SearchResult> {
        let mut candidate = self.universe.read()?;
        self.advance_child_to(candidate.doc_id);
        if let Some(child_match) = &self.child_current {
            candidate.weight += child_match.weight;
            candidate.term_freq += child_match.term_freq;
            candidate.offsets = child_match.offsets.clone();
            candidate.field_mask = candidate.field_mask | child_match.field_mask;
            candidate.children.push(child_match.clone());
        }
        self.current = Some(candidate.clone());
        Some(candidate)
    }

    fn skip_to(&mut self, target: DocId) -> Option<SearchResult> {
        self.universe.skip_to(target);
        self.read()
    }

    fn has_next(&self) -> bool {
        self.universe.has_next()
    }

    fn current(&self) -> Option<&SearchResult> {
        self.current.as_ref()
    }

    fn len(&self) -> usize {
        self.universe.len()
    }
}
