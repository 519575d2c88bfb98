//! Top-level entry points: wrap a parsed [`Node`] tree into a [`QueryAst`],
//! inject global filters, expand, evaluate and explain it.

use std::cell::RefCell;

use crate::ast::eval::{eval_node, EvalContext};
use crate::ast::expand::{expand, ExpansionContext, Expander};
use crate::ast::{dump, Node, NodeKind, NodeOptions};
use crate::concurrent::ConcurrentSearch;
use crate::config::QueryConfig;
use crate::cursor::idlist::IdListCursor;
use crate::cursor::intersect::IntersectCursor;
use crate::cursor::BoxCursor;
use crate::error::{QueryError, QueryResult};
use crate::storage::StorageBackend;
use crate::types::{DocId, FieldMask, FieldSpec, GeoFilter, NumericFilter};

pub struct QueryAst {
    pub root: Node,
}

impl QueryAst {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn set_field_mask(&mut self, mask: FieldMask) {
        self.root.set_field_mask(mask);
    }

    /// Injects a global numeric filter as the leader child of a wrapping
    /// phrase-less intersect, matching `setFilterNode`'s trick of making the
    /// filter the first (cheapest-to-exhaust) child so everything else is
    /// only ever probed through it.
    pub fn inject_numeric_filter(&mut self, filter: NumericFilter) {
        self.inject_leader(Node::leaf(NodeKind::Numeric(filter)));
    }

    pub fn inject_geo_filter(&mut self, filter: GeoFilter) {
        self.inject_leader(Node::leaf(NodeKind::Geo(filter)));
    }

    pub fn inject_id_filter(&mut self, ids: Vec<DocId>) {
        self.inject_leader(Node::leaf(NodeKind::IdList(ids)));
    }

    fn inject_leader(&mut self, leader: Node) {
        let previous_root = std::mem::replace(&mut self.root, Node::leaf(NodeKind::Wildcard));
        let mut wrapper = Node::new(NodeKind::Phrase { exact: false }, NodeOptions::default());
        wrapper.children.push(leader);
        wrapper.children.push(previous_root);
        self.root = wrapper;
    }

    pub fn expand(&mut self, expander: &mut dyn Expander, language: &str) -> QueryResult<()> {
        let mut ctx = ExpansionContext::new(language);
        expand(&mut self.root, expander, &mut ctx)
    }

    pub fn explain(&self, fields: &[FieldSpec]) -> String {
        dump::explain(&self.root, fields)
    }
}

pub struct Query<'a> {
    storage: &'a dyn StorageBackend,
    config: &'a QueryConfig,
    concurrent: ConcurrentSearch,
    /// Non-fatal errors accumulated by the most recent `eval` call (spec §7's
    /// error sink); fatal errors (parse, attribute application) are instead
    /// surfaced directly as `Err` before evaluation ever starts.
    errors: RefCell<Vec<QueryError>>,
}

impl<'a> Query<'a> {
    pub fn new(storage: &'a dyn StorageBackend, config: &'a QueryConfig) -> Self {
        Self {
            storage,
            config,
            concurrent: ConcurrentSearch::new(config.yield_every_ticks),
            errors: RefCell::new(Vec::new()),
        }
    }

    pub fn with_concurrent(storage: &'a dyn StorageBackend, config: &'a QueryConfig, concurrent: ConcurrentSearch) -> Self {
        Self {
            storage,
            config,
            concurrent,
            errors: RefCell::new(Vec::new()),
        }
    }

    pub fn concurrent(&self) -> &ConcurrentSearch {
        &self.concurrent
    }

    pub fn eval(&self, ast: &QueryAst) -> BoxCursor {
        tracing::debug!(root = ast.root.kind.label(), "evaluating query AST");
        let ctx = EvalContext::new(self.storage, self.config, self.concurrent.clone());
        let cursor = eval_node(&ast.root, &ctx);
        self.errors.borrow_mut().extend(ctx.take_errors());
        cursor
    }

    /// Drains the non-fatal errors accumulated by the most recent `eval`
    /// call (e.g. a `Numeric`/`Geo` node naming an absent or wrong-typed
    /// field).
    pub fn take_errors(&self) -> Vec<QueryError> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }
}

/// Convenience for building the `Phrase`-as-leader-filter pattern used by
/// `inject_*_filter` without going through the full `Node::add_child` tag
/// guard (the leader is never a `Tag` node's child).
pub fn wrap_with_id_filter(ids: Vec<DocId>, weight: f64, inner: BoxCursor) -> BoxCursor {
    let leader = IdListCursor::new(ids, weight);
    Box::new(IntersectCursor::new(vec![Box::new(leader), inner], None, false))
}
