//! The query AST: a tagged-variant tree built by a parser this crate does
//! not own, and consumed by `expand`, `eval` and `dump` below.

pub mod attrs;
pub mod dump;
pub mod eval;
pub mod expand;

use crate::rune::Runes;
use crate::types::{FieldMask, GeoFilter, NumericFilter, Phonetic, Token};

#[derive(Debug, Clone)]
pub struct NodeOptions {
    pub field_mask: FieldMask,
    pub weight: f64,
    /// `-1` inherits the query-wide default; non-negative pins an explicit
    /// slop budget for a `Phrase`/`Intersect` node.
    pub max_slop: i64,
    pub in_order: bool,
    pub phonetic: Phonetic,
    /// Verbatim nodes (and their subtrees) are skipped by the expansion
    /// pipeline entirely — see `ast::expand`.
    pub verbatim: bool,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            field_mask: FieldMask::ALL,
            weight: 1.0,
            max_slop: -1,
            in_order: false,
            phonetic: Phonetic::Default,
            verbatim: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Token(Token),
    Prefix(Token),
    Fuzzy { token: Token, max_edits: u32 },
    LexRange {
        begin: Option<Runes>,
        end: Option<Runes>,
        include_begin: bool,
        include_end: bool,
    },
    /// An exact-phrase intersection; `exact` mirrors the node's `max_slop`
    /// being pinned to zero with `in_order` set, kept as its own marker so
    /// dumps read the same way the original engine's node-type tag would.
    Phrase { exact: bool },
    Union,
    Not,
    Optional,
    Wildcard,
    Numeric(NumericFilter),
    Geo(GeoFilter),
    IdList(Vec<crate::types::DocId>),
    Tag { field: String },
}

impl NodeKind {
    /// Whether the expansion pipeline should recurse into this node's
    /// children. Leaf filters that aren't text (numeric/geo/id-list) and
    /// wildcard never carry expandable tokens.
    pub fn expands_children(&self) -> bool {
        !matches!(
            self,
            NodeKind::Numeric(_) | NodeKind::Geo(_) | NodeKind::IdList(_) | NodeKind::Wildcard
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Token(_) => "TOKEN",
            NodeKind::Prefix(_) => "PREFIX",
            NodeKind::Fuzzy { .. } => "FUZZY",
            NodeKind::LexRange { .. } => "LEXRANGE",
            NodeKind::Phrase { .. } => "PHRASE",
            NodeKind::Union => "UNION",
            NodeKind::Not => "NOT",
            NodeKind::Optional => "OPTIONAL",
            NodeKind::Wildcard => "WILDCARD",
            NodeKind::Numeric(_) => "NUMERIC",
            NodeKind::Geo(_) => "GEO",
            NodeKind::IdList(_) => "IDLIST",
            NodeKind::Tag { .. } => "TAG",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub options: NodeOptions,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, options: NodeOptions) -> Self {
        Self {
            kind,
            options,
            children: Vec::new(),
        }
    }

    pub fn leaf(kind: NodeKind) -> Self {
        Self::new(kind, NodeOptions::default())
    }

    /// A `Tag` node may only parent text-addressable leaves: token, phrase,
    /// prefix and lex-range. A disallowed child is silently dropped rather
    /// than rejected, matching `AddChildren` in the original engine, which
    /// skips children a tag node can't hold instead of erroring out.
    pub fn add_child(&mut self, child: Node) {
        if let NodeKind::Tag { .. } = &self.kind {
            if !matches!(
                child.kind,
                NodeKind::Token(_)
                    | NodeKind::Prefix(_)
                    | NodeKind::Phrase { .. }
                    | NodeKind::LexRange { .. }
            ) {
                return;
            }
        }
        self.children.push(child);
    }

    /// Recursively narrows every descendant's field mask by `mask`,
    /// matching the original engine's top-down AND-assign over `@field:`
    /// restrictions.
    pub fn set_field_mask(&mut self, mask: FieldMask) {
        self.options.field_mask = self.options.field_mask & mask;
        for child in &mut self.children {
            child.set_field_mask(mask);
        }
    }
}
