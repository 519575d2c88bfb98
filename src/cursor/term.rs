//! Adapts a storage-provided posting-list [`Reader`] into the cursor
//! contract: applies the field mask, scales by the node's weight, and
//! carries term offsets through for downstream phrase matching.

use super::{Cursor, SearchResult};
use crate::storage::Reader;
use crate::types::{DocId, FieldMask};

pub struct TermCursor {
    reader: Box<dyn Reader + Send>,
    field_mask: FieldMask,
    weight: f64,
    current: Option<SearchResult>,
    exhausted: bool,
}

impl TermCursor {
    pub fn new(reader: Box<dyn Reader + Send>, field_mask: FieldMask, weight: f64) -> Self {
        Self {
            reader,
            field_mask,
            weight,
            current: None,
            exhausted: false,
        }
    }

    fn accept(&self, field_mask: FieldMask) -> bool {
        self.field_mask.intersects(field_mask)
    }
}

impl Cursor for TermCursor {
    fn read(&mut self) -> Option<SearchResult> {
        if self.exhausted {
            return None;
        }
        loop {
            match self.reader.next() {
                Some(posting) if self.accept(posting.field_mask) => {
                    let result = SearchResult {
                        doc_id: posting.doc_id,
                        field_mask: posting.field_mask,
                        weight: self.weight,
                        term_freq: posting.term_freq,
                        offsets: posting.offsets,
                        children: Vec::new(),
                    };
                    self.current = Some(result.clone());
                    return Some(result);
                }
                Some(_) => continue,
                None => {
                    self.exhausted = true;
                    self.current = None;
                    return None;
                }
            }
        }
    }

    fn skip_to(&mut self, target: DocId) -> Option<SearchResult> {
        if self.exhausted {
            return None;
        }
        loop {
            match self.reader.skip_to(target) {
                Some(posting) if self.accept(posting.field_mask) => {
                    let result = SearchResult {
                        doc_id: posting.doc_id,
                        field_mask: posting.field_mask,
                        weight: self.weight,
                        term_freq: posting.term_freq,
                        offsets: posting.offsets,
                        children: Vec::new(),
                    };
                    self.current = Some(result.clone());
                    return Some(result);
                }
                Some(posting) => {
                    // Field mask rejected this doc; keep reading forward.
                    return self.skip_to(posting.doc_id + 1);
                }
                None => {
                    self.exhausted = true;
                    self.current = None;
                    return None;
                }
            }
        }
    }

    fn has_next(&self) -> bool {
        !self.exhausted
    }

    fn current(&self) -> Option<&SearchResult> {
        self.current.as_ref()
    }

    fn len(&self) -> usize {
        self.reader.len_estimate()
    }
}
