//! Matches every document id in `[1, max_doc_id]` in ascending order. Used
//! directly for a bare wildcard query, and as the bounding universe `Not`
//! and `Optional` wrap their single child against.

use super::{Cursor, SearchResult};
use crate::types::{DocId, FieldMask};

pub struct WildcardCursor {
    next_id: DocId,
    max_doc_id: DocId,
    weight: f64,
    current: Option<SearchResult>,
}

impl WildcardCursor {
    pub fn new(max_doc_id: DocId, weight: f64) -> Self {
        Self {
            next_id: 1,
            max_doc_id,
            weight,
            current: None,
        }
    }

    fn make(&self, doc_id: DocId) -> SearchResult {
        SearchResult::leaf(doc_id, FieldMask::ALL, self.weight)
    }
}

impl Cursor for WildcardCursor {
    fn read(&mut self) -> Option<SearchResult> {
        if self.next_id > self.max_doc_id {
            self.current = None;
            return None;
        }
        let result = self.make(self.next_id);
        self.next_id += 1;
        self.current = Some(result.clone());
        Some(result)
    }

    fn skip_to(&mut self, target: DocId) -> Option<SearchResult> {
        if target > self.next_id {
            self.next_id = target;
        }
        self.read()
    }

    fn has_next(&self) -> bool {
        self.next_id <= self.max_doc_id
    }

    fn current(&self) -> Option<&SearchResult> {
        self.current.as_ref()
    }

    fn len(&self) -> usize {
        (self.max_doc_id + 1 - self.next_id.min(self.max_doc_id + 1)) as usize
    }
}
