//! Applies `$attribute:value` pairs (as parsed elsewhere) onto a node's
//! options, mirroring the original engine's attribute table: `slop`,
//! `inorder`, `weight`, `phonetic`.

use crate::error::QueryError;
use crate::types::Phonetic;

use super::Node;

#[derive(Debug, Clone)]
pub enum Attribute {
    Slop(String),
    InOrder(String),
    Weight(String),
    Phonetic(String),
    /// An attribute name the parser handed us that isn't one of the four
    /// above — kept representable (rather than rejected at parse time) so
    /// `apply_attribute` can raise the distinct `NoSuchAttribute` error §4.6
    /// calls for.
    Unknown(String),
}

impl Attribute {
    /// Builds the right variant for a `$name: value` pair, matching by name
    /// the way the original engine's attribute table dispatches on `$attr`.
    pub fn parse(name: &str, raw: impl Into<String>) -> Attribute {
        match name {
            "slop" => Attribute::Slop(raw.into()),
            "inorder" => Attribute::InOrder(raw.into()),
            "weight" => Attribute::Weight(raw.into()),
            "phonetic" => Attribute::Phonetic(raw.into()),
            other => Attribute::Unknown(other.to_string()),
        }
    }

    fn name(&self) -> &str {
        match self {
            Attribute::Slop(_) => "slop",
            Attribute::InOrder(_) => "inorder",
            Attribute::Weight(_) => "weight",
            Attribute::Phonetic(_) => "phonetic",
            Attribute::Unknown(name) => name,
        }
    }

    fn raw(&self) -> &str {
        match self {
            Attribute::Slop(v) | Attribute::InOrder(v) | Attribute::Weight(v) | Attribute::Phonetic(v) => v,
            Attribute::Unknown(name) => name,
        }
    }
}

fn invalid(attr: &Attribute) -> QueryError {
    QueryError::InvalidAttribute {
        attribute: attr.name().to_string(),
        reason: format!("`{}` is not a valid {} value", attr.raw(), attr.name()),
    }
}

pub fn apply_attribute(node: &mut Node, attr: Attribute) -> Result<(), QueryError> {
    match &attr {
        Attribute::Unknown(name) => return Err(QueryError::NoSuchAttribute(name.clone())),
        Attribute::Slop(raw) => {
            let slop: i64 = raw.parse().map_err(|_| invalid(&attr))?;
            if slop < 0 {
                return Err(invalid(&attr));
            }
            node.options.max_slop = slop;
        }
        Attribute::InOrder(raw) => {
            node.options.in_order = parse_bool(raw).ok_or_else(|| invalid(&attr))?;
        }
        Attribute::Weight(raw) => {
            let weight: f64 = raw.parse().map_err(|_| invalid(&attr))?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(&attr));
            }
            node.options.weight = weight;
        }
        Attribute::Phonetic(raw) => {
            node.options.phonetic = match raw.as_str() {
                "1" | "true" | "yes" => Phonetic::Enabled,
                "0" | "false" | "no" => Phonetic::Disabled,
                _ => return Err(invalid(&attr)),
            };
        }
    }
    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
