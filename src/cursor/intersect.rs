//! Leader/follower intersection. With no slop configured this is a plain
//! boolean AND over doc ids; with a slop budget it additionally requires the
//! children's term offsets to admit an assignment within that budget
//! (optionally requiring strictly increasing order), which is what turns
//! this into phrase matching.

use super::{BoxCursor, Cursor, SearchResult};
use crate::types::{DocId, FieldMask};

pub struct IntersectCursor {
    children: Vec<BoxCursor>,
    slop: Option<i64>,
    in_order: bool,
    current: Option<SearchResult>,
    started: bool,
}

impl IntersectCursor {
    pub fn new(children: Vec<BoxCursor>, slop: Option<i64>, in_order: bool) -> Self {
        Self {
            children,
            slop,
            in_order,
            current: None,
            started: false,
        }
    }

    fn prime(&mut self) -> bool {
        if self.started {
            return true;
        }
        self.started = true;
        self.children.iter_mut().all(|c| c.read().is_some())
    }

    /// Advances every follower to the max current doc id until all children
    /// agree, or one is exhausted.
    fn align(&mut self) -> Option<DocId> {
        loop {
            let mut max_id = 0;
            for child in &self.children {
                max_id = max_id.max(child.current()?.doc_id);
            }
            let mut all_match = true;
            for child in self.children.iter_mut() {
                if child.current().map(|r| r.doc_id) != Some(max_id) {
                    child.skip_to(max_id)?;
                    all_match = false;
                }
            }
            if all_match {
                return Some(max_id);
            }
        }
    }

    fn advance_past(&mut self, doc_id: DocId) -> bool {
        self.children
            .iter_mut()
            .all(|c| c.skip_to(doc_id + 1).is_some())
    }

    fn merged_at(&self, doc_id: DocId) -> SearchResult {
        let mut merged = SearchResult {
            doc_id,
            field_mask: FieldMask::NONE,
            weight: 0.0,
            term_freq: 0,
            offsets: Vec::new(),
            children: Vec::new(),
        };
        for child in &self.children {
            if let Some(r) = child.current() {
                merged.field_mask = merged.field_mask | r.field_mask;
                merged.weight += r.weight;
                merged.term_freq += r.term_freq;
                merged.children.push(r.clone());
            }
        }
        merged
    }

    fn phrase_matches(&self) -> bool {
        let Some(slop) = self.slop else { return true };
        let offset_lists: Vec<&[u32]> = self
            .children
            .iter()
            .map(|c| c.current().map(|r| r.offsets.as_slice()).unwrap_or(&[]))
            .collect();
        if offset_lists.iter().any(|o| o.is_empty()) {
            return false;
        }
        fits_slop(&offset_lists, slop, self.in_order)
    }

    fn next_match(&mut self) -> Option<SearchResult> {
        if !self.prime() {
            return None;
        }
        loop {
            let doc_id = self.align()?;
            if self.phrase_matches() {
                return Some(self.merged_at(doc_id));
            }
            if !self.advance_past(doc_id) {
                return None;
            }
        }
    }
}

/// Exhaustive search over small per-child offset lists (realistic posting
/// sizes for a single document) for an assignment whose span fits `slop`
/// beyond the minimum possible span, in increasing order if required.
fn fits_slop(offset_lists: &[&[u32]], slop: i64, in_order: bool) -> bool {
    fn rec(lists: &[&[u32]], idx: usize, chosen: &mut Vec<u32>, slop: i64, in_order: bool) -> bool {
        if idx == lists.len() {
            if in_order && !chosen.windows(2).all(|w| w[1] > w[0]) {
                return false;
            }
            let min = *chosen.iter().min().unwrap() as i64;
            let max = *chosen.iter().max().unwrap() as i64;
            let ideal_span = chosen.len() as i64 - 1;
            return (max - min - ideal_span) <= slop;
        }
        for &o in lists[idx] {
            chosen.push(o);
            if rec(lists, idx + 1, chosen, slop, in_order) {
                return true;
            }
            chosen.pop();
        }
        false
    }
    let mut chosen = Vec::with_capacity(offset_lists.len());
    rec(offset_lists, 0, &mut chosen, slop, in_order)
}

impl Cursor for IntersectCursor {
    fn read(&mut self) -> Option<SearchResult> {
        let result = self.next_match();
        self.current = result.clone();
        result
    }

    fn skip_to(&mut self, target: DocId) -> Option<SearchResult> {
        if !self.prime() {
            return None;
        }
        for child in self.children.iter_mut() {
            child.skip_to(target)?;
        }
        self.read()
    }

    fn has_next(&self) -> bool {
        self.children.iter().all(|c| c.has_next())
    }

    fn current(&self) -> Option<&SearchResult> {
        self.current.as_ref()
    }

    fn len(&self) -> usize {
        self.children.iter().map(|c| c.len()).min().unwrap_or(0)
    }
}
