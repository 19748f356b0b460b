/// Query dispatcher
///
/// Single entry point for query text: classifies the leading keyword and
/// routes to the matching statement-kind parser.
use super::delete::DeleteQueryParser;
use super::insert::InsertQueryParser;
use super::observer::NameObserver;
use super::prepared::PreparedStatement;
use super::select::SelectQueryParser;
use super::update::UpdateQueryParser;
use crate::config::QueryConfig;
use crate::error::{Error, Result};
use crate::manager::{EntityStream, Manager};
use std::fmt;
use std::iter;
use tracing::debug;

// Every statement keyword is six letters long
const KEYWORD_LENGTH: usize = 6;

/// Statement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Delete,
    Update,
    Insert,
}

impl QueryType {
    /// Classify `text` by its first word, case-insensitively.
    ///
    /// Text with no statement keyword (`FROM God`) is a select. Text shorter
    /// than a keyword is also classified as a select and left for the select
    /// parser to reject; this leniency is kept for compatibility and should
    /// not be extended.
    pub fn classify(text: &str) -> Result<QueryType> {
        let trimmed = text.trim();
        if trimmed.len() < KEYWORD_LENGTH {
            return Ok(QueryType::Select);
        }

        let word: String = trimmed
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();

        match word.to_ascii_uppercase().as_str() {
            "SELECT" | "FROM" => Ok(QueryType::Select),
            "DELETE" => Ok(QueryType::Delete),
            "UPDATE" => Ok(QueryType::Update),
            "INSERT" => Ok(QueryType::Insert),
            _ => Err(Error::syntax(
                text,
                format!("unknown query type: {}", trimmed.split_whitespace().next().unwrap_or("")),
            )),
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::Select => write!(f, "SELECT"),
            QueryType::Delete => write!(f, "DELETE"),
            QueryType::Update => write!(f, "UPDATE"),
            QueryType::Insert => write!(f, "INSERT"),
        }
    }
}

/// Parses and runs query text of any statement kind
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser {
    config: QueryConfig,
}

impl QueryParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Execute `text` immediately. Fails if the text contains placeholders.
    ///
    /// DELETE yields nothing; INSERT and UPDATE yield the written entity.
    pub fn query<'m>(
        &self,
        text: &str,
        manager: &'m dyn Manager,
        observer: &dyn NameObserver,
    ) -> Result<EntityStream<'m>> {
        let query_type = QueryType::classify(text)?;
        debug!(%query_type, query = text, "Executing query");

        match query_type {
            QueryType::Select => {
                SelectQueryParser::with_config(self.config).query(text, manager, observer)
            }
            QueryType::Delete => {
                DeleteQueryParser::with_config(self.config).query(text, manager, observer)?;
                Ok(Box::new(iter::empty()))
            }
            QueryType::Insert => {
                let entity =
                    InsertQueryParser::with_config(self.config).query(text, manager, observer)?;
                Ok(Box::new(iter::once(entity)))
            }
            QueryType::Update => {
                let entity =
                    UpdateQueryParser::with_config(self.config).query(text, manager, observer)?;
                Ok(Box::new(iter::once(entity)))
            }
        }
    }

    /// Compile `text` into a prepared statement, placeholders allowed
    pub fn prepare<'m>(
        &self,
        text: &str,
        manager: &'m dyn Manager,
        observer: &dyn NameObserver,
    ) -> Result<PreparedStatement<'m>> {
        let query_type = QueryType::classify(text)?;
        debug!(%query_type, query = text, "Preparing query");

        match query_type {
            QueryType::Select => {
                SelectQueryParser::with_config(self.config).prepare(text, manager, observer)
            }
            QueryType::Delete => {
                DeleteQueryParser::with_config(self.config).prepare(text, manager, observer)
            }
            QueryType::Insert => {
                InsertQueryParser::with_config(self.config).prepare(text, manager, observer)
            }
            QueryType::Update => {
                UpdateQueryParser::with_config(self.config).prepare(text, manager, observer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_keywords() {
        assert_eq!(QueryType::classify("SELECT * FROM God").unwrap(), QueryType::Select);
        assert_eq!(QueryType::classify("  select name from God").unwrap(), QueryType::Select);
        assert_eq!(QueryType::classify("FROM God").unwrap(), QueryType::Select);
        assert_eq!(QueryType::classify("delete from God").unwrap(), QueryType::Delete);
        assert_eq!(QueryType::classify("Update God (a = 1)").unwrap(), QueryType::Update);
        assert_eq!(QueryType::classify("INSERT God (a = 1)").unwrap(), QueryType::Insert);
    }

    #[test]
    fn test_short_text_defaults_to_select() {
        assert_eq!(QueryType::classify("").unwrap(), QueryType::Select);
        assert_eq!(QueryType::classify("FROM").unwrap(), QueryType::Select);
    }

    #[test]
    fn test_unknown_keyword() {
        let err = QueryType::classify("DROP TABLE God").unwrap_err();
        match err {
            Error::Syntax { query, message } => {
                assert_eq!(query, "DROP TABLE God");
                assert!(message.contains("DROP"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
