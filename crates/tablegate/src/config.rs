use serde::Deserialize;

/// How unparseable numeric filter values are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericLeniency {
    /// Unparseable values become `0` (legacy list-filter behavior).
    #[default]
    Lenient,
    /// Unparseable values fail with `InvalidFilterValue`.
    Strict,
}

/// Configuration for the query and mutation builders.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Numeric filter coercion policy.
    pub filter_numbers: NumericLeniency,
    /// Escape `%`, `_` and `[` in `contains`/`starts_with`/`ends_with` values.
    pub escape_like_wildcards: bool,
    /// Upper bound applied to a page window's `limit`.
    pub max_page_size: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            filter_numbers: NumericLeniency::Lenient,
            escape_like_wildcards: true,
            max_page_size: None,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject unparseable numeric filter values instead of defaulting them to `0`.
    pub fn strict_filters(mut self) -> Self {
        self.filter_numbers = NumericLeniency::Strict;
        self
    }

    /// Set the numeric filter coercion policy.
    pub fn filter_numbers(mut self, leniency: NumericLeniency) -> Self {
        self.filter_numbers = leniency;
        self
    }

    /// Pass LIKE wildcards in filter values through unescaped.
    pub fn legacy_like(mut self) -> Self {
        self.escape_like_wildcards = false;
        self
    }

    /// Clamp page sizes to `max`.
    pub fn max_page_size(mut self, max: u64) -> Self {
        self.max_page_size = Some(max);
        self
    }
}
