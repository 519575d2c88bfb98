//! Query evaluation core for a full-text and secondary-index search engine.
//!
//! This crate owns the part of the pipeline between "a parsed query tree"
//! and "a stream of matching document ids": the iterator algebra cursors
//! compose into, the Levenshtein automaton and DFA cache that drive fuzzy
//! and prefix trie expansion, the token-expansion pipeline (stemming,
//! phonetics, synonyms), attribute application, global-filter injection and
//! the explain-dump format. Parsing the query string and the storage engine
//! itself (posting lists, the rune trie, numeric/geo indexes) are owned by
//! collaborators on the other side of the [`storage`] traits.

pub mod ast;
pub mod concurrent;
pub mod config;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod levenshtein;
pub mod rune;
pub mod sparse_vector;
pub mod storage;
pub mod synonym;
pub mod types;

pub use ast::{Node, NodeKind, NodeOptions};
pub use config::QueryConfig;
pub use cursor::{BoxCursor, Cursor, SearchResult};
pub use driver::{Query, QueryAst};
pub use error::{QueryError, QueryResult};
pub use rune::Runes;
pub use types::{DocId, FieldMask, FieldSpec, GeoFilter, NumericFilter, Phonetic, Token};
