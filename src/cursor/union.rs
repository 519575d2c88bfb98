//! K-way merge of child cursors by ascending doc id, combining every child
//! that matches the same document into one result whose weight is the sum
//! of the contributing children's weights.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::{BoxCursor, Cursor, SearchResult};
use crate::types::{DocId, FieldMask};

struct HeapEntry {
    doc_id: DocId,
    child: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.doc_id == other.doc_id
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.doc_id.cmp(&other.doc_id)
    }
}

pub struct UnionCursor {
    children: Vec<BoxCursor>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
    current: Option<SearchResult>,
    initialized: bool,
}

impl UnionCursor {
    pub fn new(children: Vec<BoxCursor>) -> Self {
        Self {
            children,
            heap: BinaryHeap::new(),
            current: None,
            initialized: false,
        }
    }

    fn prime(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        for (i, child) in self.children.iter_mut().enumerate() {
            if let Some(r) = child.read() {
                self.heap.push(Reverse(HeapEntry { doc_id: r.doc_id, child: i }));
            }
        }
    }

    fn collect_at(&mut self, doc_id: DocId) -> SearchResult {
        let mut merged = SearchResult {
            doc_id,
            field_mask: FieldMask::NONE,
            weight: 0.0,
            term_freq: 0,
            offsets: Vec::new(),
            children: Vec::new(),
        };
        while let Some(&Reverse(HeapEntry { doc_id: d, .. })) = self.heap.peek() {
            if d != doc_id {
                break;
            }
            let Reverse(HeapEntry { child, .. }) = self.heap.pop().unwrap();
            if let Some(r) = self.children[child].current().cloned() {
                merged.field_mask = merged.field_mask | r.field_mask;
                merged.weight += r.weight;
                merged.term_freq += r.term_freq;
                merged.children.push(r);
            }
            if let Some(next) = self.children[child].read() {
                self.heap.push(Reverse(HeapEntry { doc_id: next.doc_id, child }));
            }
        }
        merged
    }
}

impl Cursor for UnionCursor {
    fn read(&mut self) -> Option<SearchResult> {
        self.prime();
        let doc_id = self.heap.peek()?.0.doc_id;
        let result = self.collect_at(doc_id);
        self.current = Some(result.clone());
        Some(result)
    }

    fn skip_to(&mut self, target: DocId) -> Option<SearchResult> {
        self.prime();
        loop {
            let doc_id = self.heap.peek()?.0.doc_id;
            if doc_id >= target {
                let result = self.collect_at(doc_id);
                self.current = Some(result.clone());
                return Some(result);
            }
            self.collect_at(doc_id);
        }
    }

    fn has_next(&self) -> bool {
        !self.heap.is_empty() || !self.initialized
    }

    fn current(&self) -> Option<&SearchResult> {
        self.current.as_ref()
    }

    fn len(&self) -> usize {
        self.children.iter().map(|c| c.len()).sum()
    }
}
