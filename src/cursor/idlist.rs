//! Cursor over a fixed, caller-supplied list of document ids — backs the
//! `IdList` node used for global filter injection and explicit id-set
//! clauses (`@__key: {id1|id2|...}`-style queries).

use super::{Cursor, SearchResult};
use crate::types::{DocId, FieldMask};

pub struct IdListCursor {
    ids: Vec<DocId>,
    pos: usize,
    weight: f64,
    current: Option<SearchResult>,
}

impl IdListCursor {
    /// `ids` need not be pre-sorted; they're sorted once here so the cursor
    /// contract's ascending-order guarantee holds regardless of input order.
    pub fn new(mut ids: Vec<DocId>, weight: f64) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self {
            ids,
            pos: 0,
            weight,
            current: None,
        }
    }
}

impl Cursor for IdListCursor {
    fn read(&mut self) -> Option<SearchResult> {
        if self.pos >= self.ids.len() {
            self.current = None;
            return None;
        }
        let doc_id = self.ids[self.pos];
        self.pos += 1;
        let result = SearchResult::leaf(doc_id, FieldMask::ALL, self.weight);
        self.current = Some(result.clone());
        Some(result)
    }

    fn skip_to(&mut self, target: DocId) -> Option<SearchResult> {
        while self.pos < self.ids.len() && self.ids[self.pos] < target {
            self.pos += 1;
        }
        self.read()
    }

    fn has_next(&self) -> bool {
        self.pos < self.ids.len()
    }

    fn current(&self) -> Option<&SearchResult> {
        self.current.as_ref()
    }

    fn len(&self) -> usize {
        self.ids.len() - self.pos
    }
}
