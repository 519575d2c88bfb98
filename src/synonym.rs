//! Built-in synonym expander, grounded on the original engine's synonym
//! map: terms are grouped under small integer group ids, and expanding a
//! term means looking up every other term sharing one of its groups.

use std::collections::HashMap;

use crate::ast::expand::{Expansion, ExpansionContext, Expander};
use crate::error::QueryResult;
use crate::types::Token;

pub type SynonymGroupId = u32;

#[derive(Debug, Clone, Default)]
struct TermData {
    groups: Vec<SynonymGroupId>,
}

/// Mutable synonym table: terms map to the groups they belong to. `Add`
/// allocates a fresh group id for a batch of mutually-synonymous terms;
/// `update` folds more terms into an existing group.
#[derive(Debug, Clone, Default)]
pub struct SynonymMap {
    terms: HashMap<String, TermData>,
    next_group_id: SynonymGroupId,
}

impl SynonymMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, synonyms: &[&str]) -> SynonymGroupId {
        let id = self.next_group_id;
        self.next_group_id += 1;
        self.update(synonyms, id);
        id
    }

    pub fn update(&mut self, synonyms: &[&str], group: SynonymGroupId) {
        for &term in synonyms {
            let entry = self.terms.entry(term.to_string()).or_default();
            if !entry.groups.contains(&group) {
                entry.groups.push(group);
            }
        }
    }

    pub fn groups_of(&self, term: &str) -> &[SynonymGroupId] {
        self.terms.get(term).map(|d| d.groups.as_slice()).unwrap_or(&[])
    }

    /// Every term (other than `term` itself) sharing at least one group.
    pub fn synonyms_of(&self, term: &str) -> Vec<String> {
        let groups = self.groups_of(term);
        if groups.is_empty() {
            return Vec::new();
        }
        self.terms
            .iter()
            .filter(|(t, data)| t.as_str() != term && data.groups.iter().any(|g| groups.contains(g)))
            .map(|(t, _)| t.clone())
            .collect()
    }

    /// A read-only, cheaply `Clone`-able snapshot for handing to concurrent
    /// readers while this map keeps accepting updates — the in-process
    /// analogue of the original's `GenerateReadOnlyCopy`.
    pub fn snapshot(&self) -> SynonymMap {
        self.clone()
    }
}

pub struct SynonymExpander {
    map: SynonymMap,
}

impl SynonymExpander {
    pub fn new(map: SynonymMap) -> Self {
        Self { map }
    }
}

impl Expander for SynonymExpander {
    fn expand_token(&mut self, _ctx: &mut ExpansionContext, token: &mut Token) -> QueryResult<Expansion> {
        let synonyms = self.map.synonyms_of(&token.text.to_string());
        if synonyms.is_empty() {
            return Ok(Expansion::InPlace);
        }
        let alternatives = synonyms
            .into_iter()
            .map(|syn| {
                let mut alt = Token::plain(syn);
                alt.expanded = true;
                crate::ast::Node::new(
                    crate::ast::NodeKind::Token(alt),
                    crate::ast::NodeOptions {
                        verbatim: true,
                        ..Default::default()
                    },
                )
            })
            .collect();
        Ok(Expansion::Alternatives(alternatives))
    }
}
