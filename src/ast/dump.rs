//! Textual explain-dump per §6.4: each node renders as `<TYPE> { … }`,
//! indented by depth, prefixed by its field mask (`@field1|field2:` or
//! `@NULL:` for mask 0, omitted for the all-fields mask), and followed by an
//! attribute block `=> { $weight: n; $slop: n; $inorder: true|false; }` when
//! any attribute deviates from its default — matching the original engine's
//! `DumpExplain` output closely enough to be diffed against it by eye.

use std::fmt::Write as _;

use super::{Node, NodeKind, NodeOptions};
use crate::types::{FieldMask, FieldSpec};

pub fn explain(node: &Node, fields: &[FieldSpec]) -> String {
    let mut out = String::new();
    write_node(node, fields, 0, &mut out);
    out
}

fn field_mask_prefix(mask: FieldMask, fields: &[FieldSpec]) -> String {
    if mask == FieldMask::ALL {
        return String::new();
    }
    if mask.is_empty() {
        return "@NULL:".to_string();
    }
    let names: Vec<&str> = fields
        .iter()
        .filter(|f| mask.0 & (1u64 << f.index) != 0)
        .map(|f| f.name.as_str())
        .collect();
    format!("@{}:", names.join("|"))
}

fn write_node(node: &Node, fields: &[FieldSpec], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let _ = write!(
        out,
        "{indent}{}{} {{",
        field_mask_prefix(node.options.field_mask, fields),
        node.kind.label()
    );
    write_payload(&node.kind, out);
    if node.children.is_empty() {
        let _ = write!(out, "}}");
    } else {
        let _ = writeln!(out);
        for child in &node.children {
            write_node(child, fields, depth + 1, out);
        }
        let _ = write!(out, "{indent}}}");
    }
    write_attribute_block(&node.options, out);
    let _ = writeln!(out);
}

/// The `=> { $weight: ...; $slop: ...; $inorder: ...; }` suffix, present only
/// when weight, slop or in-order deviate from `NodeOptions::default()`.
fn write_attribute_block(options: &NodeOptions, out: &mut String) {
    let defaults = NodeOptions::default();
    let deviates = options.weight != defaults.weight
        || options.max_slop != defaults.max_slop
        || options.in_order != defaults.in_order;
    if deviates {
        let _ = write!(
            out,
            " => {{ $weight: {}; $slop: {}; $inorder: {}; }}",
            options.weight, options.max_slop, options.in_order
        );
    }
}

fn write_payload(kind: &NodeKind, out: &mut String) {
    match kind {
        NodeKind::Token(t) => {
            let _ = write!(out, "(\"{}\")", t.text);
        }
        NodeKind::Prefix(t) => {
            let _ = write!(out, "(\"{}*\")", t.text);
        }
        NodeKind::Fuzzy { token, max_edits } => {
            let _ = write!(out, "(\"%{}%\", max_edits={max_edits})", token.text);
        }
        NodeKind::LexRange {
            begin,
            end,
            include_begin,
            include_end,
        } => {
            let lo = if *include_begin { "[" } else { "(" };
            let hi = if *include_end { "]" } else { ")" };
            let begin_s = begin.as_ref().map(|r| r.to_string()).unwrap_or_default();
            let end_s = end.as_ref().map(|r| r.to_string()).unwrap_or_default();
            let _ = write!(out, "({lo}{begin_s}, {end_s}{hi})");
        }
        NodeKind::IdList(ids) => {
            let _ = write!(out, "({} ids)", ids.len());
        }
        NodeKind::Tag { field } => {
            let _ = write!(out, "(@{field})");
        }
        _ => {}
    }
}
