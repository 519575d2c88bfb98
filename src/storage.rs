//! Collaborator contract this crate evaluates queries against. The actual
//! posting lists, rune trie and numeric/geo indexes live outside this crate;
//! everything here is a trait a storage engine implements once.

use crate::concurrent::ConcurrentSearch;
use crate::cursor::BoxCursor;
use crate::levenshtein::filter::DfaFilter;
use crate::rune::Runes;
use crate::types::{DocId, FieldMask, FieldSpec, GeoFilter, NumericFilter, Token};

#[derive(Debug, Clone)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_freq: u32,
    pub field_mask: FieldMask,
    pub offsets: Vec<u32>,
}

/// A single posting-list cursor, as handed back by the storage backend for
/// one resolved term. Consumed by `cursor::term::TermCursor`.
pub trait Reader {
    fn next(&mut self) -> Option<Posting>;
    fn skip_to(&mut self, doc_id: DocId) -> Option<Posting>;
    fn len_estimate(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct TrieMatch {
    pub term: Runes,
    pub score: f32,
    pub distance: u32,
}

pub trait TagIndex {
    fn open_tag_reader(&self, tag: &str, weight: f64) -> Option<BoxCursor>;
    fn iterate_prefix(&self, prefix: &str, max_expansions: Option<usize>) -> Vec<String>;
    fn iterate_range(
        &self,
        begin: Option<&str>,
        end: Option<&str>,
        include_begin: bool,
        include_end: bool,
    ) -> Vec<String>;
}

/// Everything the AST evaluator needs from the index: term lookups, the two
/// non-text indexes, and the trie traversal primitives the term-trie
/// expansion (prefix/fuzzy) and tag-trie expansion drive.
pub trait StorageBackend {
    fn open_term_reader(
        &self,
        term: &Token,
        field_mask: FieldMask,
        weight: f64,
        single_word: bool,
    ) -> Option<BoxCursor>;

    fn open_numeric_iterator(
        &self,
        filter: &NumericFilter,
        concurrent: &ConcurrentSearch,
    ) -> Option<BoxCursor>;

    fn open_geo_iterator(&self, filter: &GeoFilter, weight: f64) -> Option<BoxCursor>;

    fn open_tag_index(&self, field: &str) -> Option<Box<dyn TagIndex>>;

    fn resolve_field(&self, name: &str) -> Option<FieldSpec>;

    /// Resolves a field by the numeric index a `Numeric`/`Geo` filter node
    /// carries (fields are addressed by index there, the same way a
    /// `FieldMask` bit addresses one), so evaluation can reject a filter
    /// against a field of the wrong declared type.
    fn resolve_field_by_index(&self, index: u32) -> Option<FieldSpec>;

    fn max_doc_id(&self) -> DocId;

    /// Drives `filter` across the rune trie, returning every completion the
    /// filter accepted along the way. Used by both prefix (`prefix_mode`)
    /// and fuzzy expansion — they differ only in how `filter` was built.
    fn trie_iterate(
        &self,
        filter: DfaFilter<'_>,
        max_expansions: Option<usize>,
    ) -> Vec<TrieMatch>;

    fn trie_iterate_range(
        &self,
        begin: Option<&Runes>,
        end: Option<&Runes>,
        include_begin: bool,
        include_end: bool,
    ) -> Vec<Runes>;
}
