//! Query compiler configuration.

/// Limits applied while lexing and parsing query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    /// Longest accepted query text, in bytes
    pub max_query_length: usize,
    /// Deepest accepted nesting of parentheses and `NOT` in a predicate
    pub max_nesting_depth: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_query_length: 64 * 1024, // 64 KiB
            max_nesting_depth: 64,
        }
    }
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the longest accepted query text
    pub fn with_max_query_length(mut self, bytes: usize) -> Self {
        self.max_query_length = bytes;
        self
    }

    /// Set the deepest accepted predicate nesting
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
