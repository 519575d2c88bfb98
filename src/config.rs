//! Evaluation-time configuration. Loading this from TOML/env/CLI is an
//! external collaborator's concern (see `StorageBackend`); this module only
//! owns the value type the rest of the crate reads from.

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Caps how many terms a single prefix/fuzzy expansion may fan out into.
    /// `None` means unbounded, matching an absent `maxPrefixExpansions`.
    pub max_prefix_expansions: Option<usize>,

    /// Default maximum edit distance for `%term%`-style fuzzy nodes when the
    /// query doesn't pin one explicitly via an attribute.
    pub default_fuzzy_edits: u32,

    /// How many cursor ticks elapse between cooperative yield checks.
    pub yield_every_ticks: u32,

    /// Upper bound on phrase slop accepted without an explicit `$slop`
    /// attribute override.
    pub default_max_slop: i64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_prefix_expansions: Some(200),
            default_fuzzy_edits: 1,
            yield_every_ticks: 1000,
            default_max_slop: -1,
        }
    }
}
