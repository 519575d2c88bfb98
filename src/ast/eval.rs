//! Turns an AST into a cursor tree. Each node kind maps onto one cursor
//! combinator; `Prefix` and `Fuzzy` funnel through the same expansion-cap
//! logic since both are "enumerate trie completions, union the readers."

use std::cell::RefCell;

use crate::config::QueryConfig;
use crate::concurrent::ConcurrentSearch;
use crate::cursor::empty::EmptyCursor;
use crate::cursor::idlist::IdListCursor;
use crate::cursor::intersect::IntersectCursor;
use crate::cursor::not::NotCursor;
use crate::cursor::optional::OptionalCursor;
use crate::cursor::term::TermCursor;
use crate::cursor::union::UnionCursor;
use crate::cursor::wildcard::WildcardCursor;
use crate::cursor::BoxCursor;
use crate::error::QueryError;
use crate::levenshtein::dfa::LevenshteinDfa;
use crate::levenshtein::filter::DfaFilter;
use crate::storage::StorageBackend;
use crate::types::{FieldKind, FieldMask, Token};

use super::{Node, NodeKind};

pub struct EvalContext<'a> {
    pub storage: &'a dyn StorageBackend,
    pub config: &'a QueryConfig,
    pub concurrent: ConcurrentSearch,
    /// Non-fatal errors accumulated during evaluation (spec §7: a node that
    /// cannot produce an iterator contributes none rather than aborting the
    /// whole tree). Drained by `Query::eval` into its own sink after the walk.
    errors: RefCell<Vec<QueryError>>,
}

impl<'a> EvalContext<'a> {
    pub fn new(storage: &'a dyn StorageBackend, config: &'a QueryConfig, concurrent: ConcurrentSearch) -> Self {
        Self {
            storage,
            config,
            concurrent,
            errors: RefCell::new(Vec::new()),
        }
    }

    fn max_doc_id(&self) -> u64 {
        self.storage.max_doc_id()
    }

    fn push_error(&self, err: QueryError) {
        self.errors.borrow_mut().push(err);
    }

    pub fn take_errors(&self) -> Vec<QueryError> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }
}

fn effective_slop(options: &super::NodeOptions, config: &QueryConfig) -> Option<i64> {
    let slop = if options.max_slop < 0 {
        config.default_max_slop
    } else {
        options.max_slop
    };
    if slop < 0 {
        None
    } else {
        Some(slop)
    }
}

/// Shared by `Prefix` (edit budget 0) and `Fuzzy`: build the trie filter for
/// this pattern, collect its matches, open a term reader per match, and
/// union them all together — mirroring the original engine's
/// `iterateExpandedTerms`, which both node types funnel through.
fn iterate_expanded_terms(
    ctx: &EvalContext<'_>,
    token: &Token,
    max_edits: u32,
    prefix_mode: bool,
    field_mask: FieldMask,
    weight: f64,
) -> BoxCursor {
    let pattern = token.text.to_string();
    let dfa = LevenshteinDfa::build(&pattern, max_edits);
    let filter = DfaFilter::new(&dfa, prefix_mode);
    let matches = ctx
        .storage
        .trie_iterate(filter, ctx.config.max_prefix_expansions);

    if let Some(cap) = ctx.config.max_prefix_expansions {
        if matches.len() >= cap {
            tracing::debug!(pattern, cap, "prefix/fuzzy expansion hit max_prefix_expansions");
        }
    }

    let mut readers = Vec::with_capacity(matches.len());
    for m in matches {
        let matched_token = Token::plain(m.term.to_string());
        if let Some(reader) = ctx.storage.open_term_reader(&matched_token, field_mask, weight, false) {
            readers.push(reader);
        }
    }
    if readers.is_empty() {
        Box::new(EmptyCursor)
    } else {
        Box::new(UnionCursor::new(readers))
    }
}

/// Resolves the field a `Numeric`/`Geo` node names and checks it against the
/// filter's declared kind, pushing a `NoSuchField` error to the evaluation
/// sink and returning `false` (contribute nothing) if it's absent or the
/// wrong type, per §4.4's "resolve the field spec; reject if not the
/// declared type."
fn resolve_and_check_field(ctx: &EvalContext<'_>, field_index: u32, expected: FieldKind) -> bool {
    match ctx.storage.resolve_field_by_index(field_index) {
        Some(spec) if spec.kind == expected => true,
        Some(spec) => {
            ctx.push_error(QueryError::NoSuchField(spec.name));
            false
        }
        None => {
            ctx.push_error(QueryError::NoSuchField(field_index.to_string()));
            false
        }
    }
}

pub fn eval_node(node: &Node, ctx: &EvalContext<'_>) -> BoxCursor {
    let field_mask = node.options.field_mask;
    let weight = node.options.weight;

    match &node.kind {
        NodeKind::Token(token) => ctx
            .storage
            .open_term_reader(token, field_mask, weight, node.children.is_empty())
            .unwrap_or_else(|| Box::new(EmptyCursor)),

        NodeKind::Prefix(token) => iterate_expanded_terms(ctx, token, 0, true, field_mask, weight),

        NodeKind::Fuzzy { token, max_edits } => {
            iterate_expanded_terms(ctx, token, *max_edits, false, field_mask, weight)
        }

        NodeKind::LexRange {
            begin,
            end,
            include_begin,
            include_end,
        } => {
            let terms = ctx.storage.trie_iterate_range(
                begin.as_ref(),
                end.as_ref(),
                *include_begin,
                *include_end,
            );
            let mut readers = Vec::with_capacity(terms.len());
            for term in terms {
                let token = Token::plain(term.to_string());
                if let Some(reader) = ctx.storage.open_term_reader(&token, field_mask, weight, false) {
                    readers.push(reader);
                }
            }
            if readers.is_empty() {
                Box::new(EmptyCursor)
            } else {
                Box::new(UnionCursor::new(readers))
            }
        }

        NodeKind::Phrase { exact } => {
            // `exact` pins `slop = 0 ∧ in_order`, regardless of whatever the
            // node's own slop/in-order options say.
            let (slop, in_order) = if *exact {
                (Some(0), true)
            } else {
                (effective_slop(&node.options, ctx.config), node.options.in_order)
            };
            let children: Vec<BoxCursor> = node.children.iter().map(|c| eval_node(c, ctx)).collect();
            Box::new(IntersectCursor::new(children, slop, in_order))
        }

        NodeKind::Union => {
            let children: Vec<BoxCursor> = node.children.iter().map(|c| eval_node(c, ctx)).collect();
            Box::new(UnionCursor::new(children))
        }

        NodeKind::Not => {
            let child = node
                .children
                .first()
                .map(|c| eval_node(c, ctx))
                .unwrap_or_else(|| Box::new(EmptyCursor));
            Box::new(NotCursor::new(ctx.max_doc_id(), weight, child))
        }

        NodeKind::Optional => {
            let child = node
                .children
                .first()
                .map(|c| eval_node(c, ctx))
                .unwrap_or_else(|| Box::new(EmptyCursor));
            Box::new(OptionalCursor::new(ctx.max_doc_id(), weight, child))
        }

        NodeKind::Wildcard => Box::new(WildcardCursor::new(ctx.max_doc_id(), weight)),

        NodeKind::Numeric(filter) => {
            if !resolve_and_check_field(ctx, filter.field_index, FieldKind::Numeric) {
                return Box::new(EmptyCursor);
            }
            ctx.storage
                .open_numeric_iterator(filter, &ctx.concurrent)
                .unwrap_or_else(|| Box::new(EmptyCursor))
        }

        NodeKind::Geo(filter) => {
            if !resolve_and_check_field(ctx, filter.field_index, FieldKind::Geo) {
                return Box::new(EmptyCursor);
            }
            ctx.storage
                .open_geo_iterator(filter, weight)
                .unwrap_or_else(|| Box::new(EmptyCursor))
        }

        NodeKind::IdList(ids) => Box::new(IdListCursor::new(ids.clone(), weight)),

        NodeKind::Tag { field } => eval_tag_node(node, field, ctx),
    }
}

/// `Tag` nodes resolve their children against the tag field's own value
/// trie-map (a byte trie over tag strings) rather than the term trie, and
/// only ever parent token/phrase/prefix/lex-range children (enforced at
/// construction by `Node::add_child`).
fn eval_tag_node(node: &Node, field: &str, ctx: &EvalContext<'_>) -> BoxCursor {
    let Some(tag_index) = ctx.storage.open_tag_index(field) else {
        return Box::new(EmptyCursor);
    };

    fn eval_child(node: &Node, tag_index: &dyn crate::storage::TagIndex, config: &QueryConfig) -> BoxCursor {
        let weight = node.options.weight;
        match &node.kind {
            NodeKind::Token(token) => tag_index
                .open_tag_reader(&token.text.to_string(), weight)
                .unwrap_or_else(|| Box::new(EmptyCursor)),
            NodeKind::Prefix(token) => {
                let values = tag_index.iterate_prefix(&token.text.to_string(), config.max_prefix_expansions);
                let readers: Vec<BoxCursor> = values
                    .into_iter()
                    .filter_map(|v| tag_index.open_tag_reader(&v, weight))
                    .collect();
                if readers.is_empty() {
                    Box::new(EmptyCursor)
                } else {
                    Box::new(UnionCursor::new(readers))
                }
            }
            NodeKind::LexRange {
                begin,
                end,
                include_begin,
                include_end,
            } => {
                let begin_str = begin.as_ref().map(|r| r.to_string());
                let end_str = end.as_ref().map(|r| r.to_string());
                let values = tag_index.iterate_range(
                    begin_str.as_deref(),
                    end_str.as_deref(),
                    *include_begin,
                    *include_end,
                );
                let readers: Vec<BoxCursor> = values
                    .into_iter()
                    .filter_map(|v| tag_index.open_tag_reader(&v, weight))
                    .collect();
                if readers.is_empty() {
                    Box::new(EmptyCursor)
                } else {
                    Box::new(UnionCursor::new(readers))
                }
            }
            NodeKind::Phrase { .. } => {
                // Preserved verbatim from the original engine: a tag-field
                // phrase is evaluated by space-joining its Token children's
                // text into one literal tag value and looking that up
                // directly, rather than intersecting per-child readers.
                // Non-Token children (nested Prefix/LexRange under a tag
                // phrase) are silently dropped from the join — a latent bug
                // inherited on purpose, not fixed here.
                let joined = node
                    .children
                    .iter()
                    .filter_map(|c| match &c.kind {
                        NodeKind::Token(t) => Some(t.text.to_string()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                tag_index
                    .open_tag_reader(&joined, weight)
                    .unwrap_or_else(|| Box::new(EmptyCursor))
            }
            _ => Box::new(EmptyCursor),
        }
    }

    eval_child(node, tag_index.as_ref(), ctx.config)
}
