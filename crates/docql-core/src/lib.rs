//! # docql Core
//!
//! Condition algebra, query language compiler and prepared statements for
//! document and column-family stores.
//!
//! Query text is classified by [`QueryParser`], parsed into an AST, and
//! translated into a [`CriteriaCondition`] tree that is finalized into a
//! [`Condition`] inside a query object. Storage is never touched directly:
//! query objects are handed to a [`Manager`].

#![warn(clippy::all)]

pub mod condition;
pub mod config;
pub mod entity;
pub mod error;
pub mod manager;
pub mod params;
pub mod query;
pub mod value;

pub use condition::{Comparison, Condition, ConditionKind, CriteriaCondition};
pub use config::QueryConfig;
pub use entity::DocumentEntity;
pub use error::{Error, Result, ValidationError};
pub use manager::{EntityStream, Manager};
pub use params::Params;
pub use query::{
    DeleteQuery, Direction, NameObserver, PassThroughObserver, PreparedQuery, PreparedStatement,
    QueryParser, QueryType, SelectQuery, Sort,
};
pub use value::{Element, FromValue, Value, ValueType};
