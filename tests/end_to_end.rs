//! End-to-end scenarios backed by a small in-memory `StorageBackend`,
//! covering the six corpora from the testable-properties section plus an
//! explain-dump round trip.

use std::collections::HashMap;

use idxquery::ast::eval::{eval_node, EvalContext};
use idxquery::ast::{dump, Node, NodeKind, NodeOptions};
use idxquery::concurrent::ConcurrentSearch;
use idxquery::config::QueryConfig;
use idxquery::cursor::idlist::IdListCursor;
use idxquery::cursor::term::TermCursor;
use idxquery::cursor::BoxCursor;
use idxquery::driver::{Query, QueryAst};
use idxquery::levenshtein::filter::{DfaFilter, FilterCode};
use idxquery::rune::Runes;
use idxquery::storage::{Posting, Reader, StorageBackend, TagIndex, TrieMatch};
use idxquery::types::{DocId, FieldKind, FieldMask, FieldSpec, GeoFilter, NumericFilter, Token};

struct VecReader {
    postings: Vec<Posting>,
    pos: usize,
}

impl Reader for VecReader {
    fn next(&mut self) -> Option<Posting> {
        let p = self.postings.get(self.pos).cloned();
        if p.is_some() {
            self.pos += 1;
        }
        p
    }

    fn skip_to(&mut self, target: DocId) -> Option<Posting> {
        while let Some(p) = self.postings.get(self.pos) {
            if p.doc_id >= target {
                break;
            }
            self.pos += 1;
        }
        self.next()
    }

    fn len_estimate(&self) -> usize {
        self.postings.len().saturating_sub(self.pos)
    }
}

struct MemTagIndex {
    values: HashMap<String, Vec<DocId>>,
}

impl TagIndex for MemTagIndex {
    fn open_tag_reader(&self, tag: &str, weight: f64) -> Option<BoxCursor> {
        self.values
            .get(tag)
            .map(|ids| Box::new(IdListCursor::new(ids.clone(), weight)) as BoxCursor)
    }

    fn iterate_prefix(&self, prefix: &str, max_expansions: Option<usize>) -> Vec<String> {
        let mut matches: Vec<String> = self
            .values
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        matches.sort();
        if let Some(cap) = max_expansions {
            matches.truncate(cap);
        }
        matches
    }

    fn iterate_range(
        &self,
        begin: Option<&str>,
        end: Option<&str>,
        include_begin: bool,
        include_end: bool,
    ) -> Vec<String> {
        self.values
            .keys()
            .filter(|k| {
                let above = match begin {
                    Some(b) if include_begin => k.as_str() >= b,
                    Some(b) => k.as_str() > b,
                    None => true,
                };
                let below = match end {
                    Some(e) if include_end => k.as_str() <= e,
                    Some(e) => k.as_str() < e,
                    None => true,
                };
                above && below
            })
            .cloned()
            .collect()
    }
}

/// Minimal in-memory index: term postings, a tag index and a numeric field,
/// with `trie_iterate` walking a flat sorted vocabulary through the supplied
/// `DfaFilter` one word at a time (a stand-in for a real shared-prefix trie,
/// but exercising the filter's push/pop contract exactly the same way).
struct MemStorage {
    terms: HashMap<String, Vec<Posting>>,
    vocabulary: Vec<String>,
    tag_fields: HashMap<String, MemTagIndex>,
    numeric_values: HashMap<DocId, f64>,
    max_doc_id: DocId,
    fields: Vec<FieldSpec>,
}

impl StorageBackend for MemStorage {
    fn open_term_reader(
        &self,
        term: &Token,
        field_mask: FieldMask,
        weight: f64,
        _single_word: bool,
    ) -> Option<BoxCursor> {
        let postings = self.terms.get(&term.text.to_string())?.clone();
        Some(Box::new(TermCursor::new(
            Box::new(VecReader { postings, pos: 0 }),
            field_mask,
            weight,
        )))
    }

    fn open_numeric_iterator(
        &self,
        filter: &NumericFilter,
        _concurrent: &ConcurrentSearch,
    ) -> Option<BoxCursor> {
        let mut ids: Vec<DocId> = self
            .numeric_values
            .iter()
            .filter(|&(_, &v)| {
                let above = if filter.include_min { v >= filter.min } else { v > filter.min };
                let below = if filter.include_max { v <= filter.max } else { v < filter.max };
                above && below
            })
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        Some(Box::new(IdListCursor::new(ids, 1.0)))
    }

    fn open_geo_iterator(&self, _filter: &GeoFilter, _weight: f64) -> Option<BoxCursor> {
        None
    }

    fn open_tag_index(&self, field: &str) -> Option<Box<dyn TagIndex>> {
        self.tag_fields.get(field).map(|idx| {
            Box::new(MemTagIndex {
                values: idx.values.clone(),
            }) as Box<dyn TagIndex>
        })
    }

    fn resolve_field(&self, name: &str) -> Option<FieldSpec> {
        self.fields.iter().find(|f| f.name == name).cloned()
    }

    fn resolve_field_by_index(&self, index: u32) -> Option<FieldSpec> {
        self.fields.iter().find(|f| f.index == index).cloned()
    }

    fn max_doc_id(&self) -> DocId {
        self.max_doc_id
    }

    fn trie_iterate(&self, mut filter: DfaFilter<'_>, max_expansions: Option<usize>) -> Vec<TrieMatch> {
        let mut out = Vec::new();
        for word in &self.vocabulary {
            let mut matched = false;
            let mut pushed = 0usize;
            for c in word.chars() {
                let (code, m) = filter.filter(c);
                pushed += 1;
                matched = m;
                if code == FilterCode::Stop {
                    break;
                }
            }
            if matched {
                out.push(TrieMatch {
                    term: Runes::from(word.as_str()),
                    score: 1.0,
                    distance: filter.distance(),
                });
            }
            filter.stack_pop(pushed);
            if let Some(cap) = max_expansions {
                if out.len() >= cap {
                    break;
                }
            }
        }
        out
    }

    fn trie_iterate_range(
        &self,
        begin: Option<&Runes>,
        end: Option<&Runes>,
        include_begin: bool,
        include_end: bool,
    ) -> Vec<Runes> {
        let begin_s = begin.map(|r| r.to_string());
        let end_s = end.map(|r| r.to_string());
        self.vocabulary
            .iter()
            .filter(|w| {
                let above = match &begin_s {
                    Some(b) if include_begin => w.as_str() >= b.as_str(),
                    Some(b) => w.as_str() > b.as_str(),
                    None => true,
                };
                let below = match &end_s {
                    Some(e) if include_end => w.as_str() <= e.as_str(),
                    Some(e) => w.as_str() < e.as_str(),
                    None => true,
                };
                above && below
            })
            .map(|w| Runes::from(w.as_str()))
            .collect()
    }
}

fn index_text(storage: &mut MemStorage, doc_id: DocId, text: &str, field_bit: u32) {
    for (pos, word) in text.split_whitespace().enumerate() {
        storage
            .terms
            .entry(word.to_string())
            .or_default()
            .push(Posting {
                doc_id,
                term_freq: 1,
                field_mask: FieldMask::bit(field_bit),
                offsets: vec![pos as u32],
            });
        if !storage.vocabulary.contains(&word.to_string()) {
            storage.vocabulary.push(word.to_string());
        }
    }
}

fn empty_storage() -> MemStorage {
    MemStorage {
        terms: HashMap::new(),
        vocabulary: Vec::new(),
        tag_fields: HashMap::new(),
        numeric_values: HashMap::new(),
        max_doc_id: 0,
        fields: vec![
            FieldSpec {
                name: "body".to_string(),
                index: 0,
                kind: FieldKind::Text,
            },
            FieldSpec {
                name: "score".to_string(),
                index: 1,
                kind: FieldKind::Numeric,
            },
        ],
    }
}

fn run_query(storage: &MemStorage, root: Node) -> Vec<DocId> {
    let config = QueryConfig::default();
    let query = Query::new(storage, &config);
    let ast = QueryAst::new(root);
    let mut cursor = query.eval(&ast);
    std::iter::from_fn(|| cursor.read()).map(|r| r.doc_id).collect()
}

fn token(word: &str) -> Node {
    Node::leaf(NodeKind::Token(Token::plain(word)))
}

fn phrase(children: Vec<Node>, slop: i64, in_order: bool) -> Node {
    let mut node = Node::new(
        NodeKind::Phrase { exact: slop == 0 && in_order },
        NodeOptions {
            max_slop: slop,
            in_order,
            ..Default::default()
        },
    );
    node.children = children;
    node
}

#[test]
fn exact_phrase_matches_only_in_order_adjacent_doc() {
    let mut storage = empty_storage();
    storage.max_doc_id = 2;
    index_text(&mut storage, 1, "the quick brown fox", 0);
    index_text(&mut storage, 2, "the brown quick fox", 0);

    let ast = phrase(vec![token("quick"), token("brown")], 0, true);
    let ids = run_query(&storage, ast);
    assert_eq!(ids, vec![1]);
}

#[test]
fn slop_and_any_order_matches_both_docs() {
    let mut storage = empty_storage();
    storage.max_doc_id = 2;
    index_text(&mut storage, 1, "the quick brown fox", 0);
    index_text(&mut storage, 2, "the brown quick fox", 0);

    let ast = phrase(vec![token("quick"), token("brown")], 2, false);
    let mut ids = run_query(&storage, ast);
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn prefix_expansion_matches_every_completion_under_the_cap() {
    let mut storage = empty_storage();
    storage.max_doc_id = 4;
    index_text(&mut storage, 1, "hello", 0);
    index_text(&mut storage, 2, "help", 0);
    index_text(&mut storage, 3, "helm", 0);
    index_text(&mut storage, 4, "world", 0);
    storage.vocabulary.sort();

    let ast = Node::leaf(NodeKind::Prefix(Token::plain("hel")));
    let mut ids = run_query(&storage, ast);
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn prefix_expansion_respects_the_cap() {
    let mut storage = empty_storage();
    storage.max_doc_id = 4;
    index_text(&mut storage, 1, "hello", 0);
    index_text(&mut storage, 2, "help", 0);
    index_text(&mut storage, 3, "helm", 0);
    storage.vocabulary.sort();

    let config = QueryConfig {
        max_prefix_expansions: Some(2),
        ..Default::default()
    };
    let query = Query::new(&storage, &config);
    let ast = QueryAst::new(Node::leaf(NodeKind::Prefix(Token::plain("hel"))));
    let mut cursor = query.eval(&ast);
    let ids: Vec<_> = std::iter::from_fn(|| cursor.read()).map(|r| r.doc_id).collect();
    assert_eq!(ids.len(), 2);
}

#[test]
fn fuzzy_edit_one_matches_near_misspellings() {
    let mut storage = empty_storage();
    storage.max_doc_id = 3;
    index_text(&mut storage, 1, "color", 0);
    index_text(&mut storage, 2, "colour", 0);
    index_text(&mut storage, 3, "smell", 0);
    storage.vocabulary.sort();

    let ast = Node::leaf(NodeKind::Fuzzy {
        token: Token::plain("colur"),
        max_edits: 1,
    });
    let mut ids = run_query(&storage, ast);
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn tag_union_matches_docs_sharing_either_value() {
    let mut storage = empty_storage();
    storage.max_doc_id = 3;
    let mut values: HashMap<String, Vec<DocId>> = HashMap::new();
    values.insert("red".to_string(), vec![1, 3]);
    values.insert("blue".to_string(), vec![2]);
    values.insert("green".to_string(), vec![3]);
    storage
        .tag_fields
        .insert("t".to_string(), MemTagIndex { values });

    let mut union = Node::new(NodeKind::Union, NodeOptions::default());
    let mut tag = Node::new(
        NodeKind::Tag { field: "t".to_string() },
        NodeOptions::default(),
    );
    tag.add_child(token("red"));
    let mut tag2 = Node::new(
        NodeKind::Tag { field: "t".to_string() },
        NodeOptions::default(),
    );
    tag2.add_child(token("green"));
    union.children.push(tag);
    union.children.push(tag2);

    let mut ids = run_query(&storage, union);
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn negated_numeric_range_excludes_the_band() {
    let mut storage = empty_storage();
    storage.max_doc_id = 100;
    for id in 1..=100u64 {
        storage.numeric_values.insert(id, id as f64);
    }

    let numeric = Node::leaf(NodeKind::Numeric(NumericFilter {
        field_index: 1,
        min: 50.0,
        max: 60.0,
        include_min: true,
        include_max: true,
    }));
    let mut not_node = Node::new(NodeKind::Not, NodeOptions::default());
    not_node.children.push(numeric);

    let ids = run_query(&storage, not_node);
    assert_eq!(ids.len(), 89);
    assert!(!ids.contains(&55));
    assert!(ids.contains(&1));
    assert!(ids.contains(&100));
}

#[test]
fn explain_dump_is_idempotent_across_reserialization() {
    let mut storage = empty_storage();
    storage.max_doc_id = 1;
    index_text(&mut storage, 1, "hello world", 0);

    let ast = phrase(vec![token("hello"), token("world")], 0, true);
    let query_ast = QueryAst::new(ast);
    let first = query_ast.explain(&storage.fields);
    let second = dump::explain(&query_ast.root, &storage.fields);
    assert_eq!(first, second);
}

#[test]
fn verbatim_subtree_is_unchanged_by_expansion() {
    use idxquery::ast::expand::{Expansion, ExpansionContext, Expander};

    struct AlwaysExpand;
    impl Expander for AlwaysExpand {
        fn expand_token(
            &mut self,
            _ctx: &mut ExpansionContext,
            token: &mut Token,
        ) -> idxquery::error::QueryResult<Expansion> {
            let mut alt = Token::plain(format!("{}-stem", token.text));
            alt.stemmed = true;
            Ok(Expansion::Alternatives(vec![Node::leaf(NodeKind::Token(alt))]))
        }
    }

    let mut ast = QueryAst::new(Node::new(
        NodeKind::Token(Token::plain("running")),
        NodeOptions {
            verbatim: true,
            ..Default::default()
        },
    ));
    let before = format!("{:?}", ast.root.kind);
    ast.expand(&mut AlwaysExpand, "en").unwrap();
    let after = format!("{:?}", ast.root.kind);
    assert_eq!(before, after);
}

#[test]
fn eval_context_shares_concurrent_search_ticks() {
    let mut storage = empty_storage();
    storage.max_doc_id = 1;
    index_text(&mut storage, 1, "hello", 0);
    let config = QueryConfig::default();
    let concurrent = ConcurrentSearch::new(1);
    let ctx = EvalContext::new(&storage, &config, concurrent.clone());
    let mut cursor = eval_node(&Node::leaf(NodeKind::Token(Token::plain("hello"))), &ctx);
    assert_eq!(cursor.read().unwrap().doc_id, 1);
}
