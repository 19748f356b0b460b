/// Query engine module
///
/// Query text parsing, translation into condition trees, the programmatic
/// builder and prepared-statement execution.
/// Abstract Syntax Tree types
#[allow(missing_docs)]
pub mod ast;
/// Fluent query builders
pub mod builder;
/// DELETE parser
pub mod delete;
/// Query dispatcher
pub mod dispatch;
/// INSERT parser
pub mod insert;
/// Query lexer
#[allow(missing_docs)]
pub mod lexer;
/// Query value objects
pub mod model;
/// Name observers
pub mod observer;
/// Query parser
#[allow(missing_docs)]
pub mod parser;
/// Prepared statements
pub mod prepared;
/// SELECT parser
pub mod select;
/// AST to condition translation
pub mod translator;
/// UPDATE parser
pub mod update;

// Re-export main types
pub use delete::DeleteQueryParser;
pub use dispatch::{QueryParser, QueryType};
pub use insert::{InsertQuery, InsertQueryParser};
pub use lexer::{Lexer, LexerError, Token};
pub use model::{DeleteQuery, Direction, SelectQuery, Sort};
pub use observer::{NameObserver, PassThroughObserver};
pub use parser::{ParseError, Parser};
pub use prepared::{PreparedQuery, PreparedStatement};
pub use select::SelectQueryParser;
pub use translator::ConditionTranslator;
pub use update::UpdateQueryParser;

use crate::config::QueryConfig;
use crate::error::{Error, Result};
use crate::params::Params;
use std::fmt;
use tracing::trace;

/// Run one parser entry point over `text`, folding failures into a syntax error
pub(crate) fn parse_with<T, F>(text: &str, config: &QueryConfig, parse: F) -> Result<T>
where
    T: fmt::Display,
    F: FnOnce(&mut Parser) -> std::result::Result<T, ParseError>,
{
    let statement = Parser::with_config(text, config)
        .and_then(|mut parser| parse(&mut parser))
        .map_err(|e| Error::syntax(text, e))?;
    trace!(%statement, "Parsed statement");
    Ok(statement)
}

/// Reject placeholders on the immediate execution path
pub(crate) fn ensure_no_params(text: &str, params: &Params) -> Result<()> {
    if !params.is_empty() {
        return Err(Error::PreparedStatementRequired {
            query: text.to_string(),
        });
    }
    Ok(())
}
