//! `Not`: every document in the wildcard-bounded universe that the wrapped
//! child does *not* match.

use super::wildcard::WildcardCursor;
use super::{Cursor, SearchResult};
use crate::types::DocId;

pub struct NotCursor {
    universe: WildcardCursor,
    excluded: Box<dyn Cursor + Send>,
    excluded_current: Option<DocId>,
    current: Option<SearchResult>,
}

impl NotCursor {
    pub fn new(max_doc_id: DocId, weight: f64, excluded: Box<dyn Cursor + Send>) -> Self {
        Self {
            universe: WildcardCursor::new(max_doc_id, weight),
            excluded,
            excluded_current: None,
            current: None,
        }
    }

    fn advance_excluded_to(&mut self, target: DocId) {
        if self.excluded_current.map(|d| d >= target) == Some(true) {
            return;
        }
        self.excluded_current = self.excluded.skip_to(target).map(|r| r.doc_id);
    }
}

impl Cursor for NotCursor {
    fn read(&mut self) -> Option<SearchResult> {
        loop {
            let candidate = self.universe.read()?;
            self.advance_excluded_to(candidate.doc_id);
            if self.excluded_current == Some(candidate.doc_id) {
                continue;
            }
            self.current = Some(candidate.clone());
            return Some(candidate);
        }
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
