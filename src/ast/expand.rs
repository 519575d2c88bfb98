//! Token expansion pipeline: stemming, phonetics, synonyms, or any other
//! pluggable transform that turns one token into itself (mutated in place)
//! or a union of alternatives. Verbatim nodes short-circuit entirely.

use crate::error::QueryResult;
use crate::types::{FieldMask, Token};

use super::{Node, NodeKind};

pub struct ExpansionContext {
    pub language: String,
    pub field_mask: FieldMask,
}

impl ExpansionContext {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            field_mask: FieldMask::ALL,
        }
    }
}

pub enum Expansion {
    /// The token was mutated in place (e.g. stemmed) and stays a single leaf.
    InPlace,
    /// The token gains sibling alternatives; the node becomes a `Union` of
    /// the original token plus these. Alternatives are terminal — they are
    /// not expanded again, so an expander must not return near-duplicates
    /// of its own input or expansion will not converge to a fixed point.
    Alternatives(Vec<Node>),
}

pub trait Expander {
    fn expand_token(&mut self, ctx: &mut ExpansionContext, token: &mut Token) -> QueryResult<Expansion>;
}

pub fn expand(root: &mut Node, expander: &mut dyn Expander, ctx: &mut ExpansionContext) -> QueryResult<()> {
    expand_node(root, expander, ctx)
}

fn expand_node(node: &mut Node, expander: &mut dyn Expander, ctx: &mut ExpansionContext) -> QueryResult<()> {
    if node.options.verbatim {
        return Ok(());
    }

    if let NodeKind::Token(_) = &node.kind {
        let NodeKind::Token(token) = &mut node.kind else {
            unreachable!()
        };
        ctx.field_mask = node.options.field_mask;
        let outcome = expander.expand_token(ctx, token)?;
        if let Expansion::Alternatives(alternatives) = outcome {
            let original = Node {
                kind: NodeKind::Token(token.clone()),
                options: node.options.clone(),
                children: std::mem::take(&mut node.children),
            };
            let mut union = Node::new(NodeKind::Union, node.options.clone());
            union.children.push(original);
            union.children.extend(alternatives);
            *node = union;
            return Ok(());
        }
    }

    if !node.kind.expands_children() {
        return Ok(());
    }

    for child in node.children.iter_mut() {
        expand_node(child, expander, ctx)?;
    }
    Ok(())
}
