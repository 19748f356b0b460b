//! # docql
//!
//! A storage-agnostic query language and condition algebra for document and
//! column-family stores.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docql::{DocumentEntity, Manager, Session};
//! # use docql::{DeleteQuery, EntityStream, Result, SelectQuery};
//! # use std::time::Duration;
//! # struct Store;
//! # impl Manager for Store {
//! #     fn select<'a>(&'a self, _: &SelectQuery) -> Result<EntityStream<'a>> { Ok(Box::new(std::iter::empty())) }
//! #     fn delete(&self, _: &DeleteQuery) -> Result<()> { Ok(()) }
//! #     fn insert(&self, e: DocumentEntity) -> Result<DocumentEntity> { Ok(e) }
//! #     fn insert_with_ttl(&self, e: DocumentEntity, _: Duration) -> Result<DocumentEntity> { Ok(e) }
//! #     fn update(&self, e: DocumentEntity) -> Result<DocumentEntity> { Ok(e) }
//! #     fn count(&self, _: &str) -> Result<u64> { Ok(0) }
//! # }
//!
//! fn main() -> docql::Result<()> {
//!     let session = Session::new(Store);
//!
//!     // Queries without placeholders run immediately
//!     for god in session.query("FROM God WHERE age > 100 ORDER BY name")? {
//!         println!("{:?}", god.get::<String>("name")?);
//!     }
//!
//!     // Placeholders need a prepared statement
//!     let mut statement = session.prepare("FROM God WHERE name = @name")?;
//!     statement.bind("name", "Diana")?;
//!     let diana = statement.single_result()?;
//!     println!("{:?}", diana);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod logging;

use tracing::debug;

// Re-export core types
pub use docql_core::query::builder::{delete, delete_all, select, select_all};
pub use docql_core::query::{
    DeleteQuery, DeleteQueryParser, Direction, InsertQuery, InsertQueryParser, NameObserver,
    PassThroughObserver, PreparedQuery, PreparedStatement, QueryParser, QueryType, SelectQuery,
    SelectQueryParser, Sort, UpdateQueryParser,
};
pub use docql_core::{
    Condition, ConditionKind, CriteriaCondition, DocumentEntity, Element, EntityStream, Error,
    FromValue, Manager, Params, QueryConfig, Result, ValidationError, Value, ValueType,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A manager bundled with a name observer and parser limits.
///
/// Query text and builder-made queries both run through the same manager.
///
/// # Examples
///
/// ```rust,no_run
/// # use docql::{DeleteQuery, DocumentEntity, EntityStream, Manager, Result, SelectQuery};
/// # use std::time::Duration;
/// # struct Store;
/// # impl Manager for Store {
/// #     fn select<'a>(&'a self, _: &SelectQuery) -> Result<EntityStream<'a>> { Ok(Box::new(std::iter::empty())) }
/// #     fn delete(&self, _: &DeleteQuery) -> Result<()> { Ok(()) }
/// #     fn insert(&self, e: DocumentEntity) -> Result<DocumentEntity> { Ok(e) }
/// #     fn insert_with_ttl(&self, e: DocumentEntity, _: Duration) -> Result<DocumentEntity> { Ok(e) }
/// #     fn update(&self, e: DocumentEntity) -> Result<DocumentEntity> { Ok(e) }
/// #     fn count(&self, _: &str) -> Result<u64> { Ok(0) }
/// # }
/// use docql::{select_all, QueryConfig, Session};
///
/// let session = Session::new(Store).with_config(QueryConfig::new().with_max_nesting_depth(8));
/// let query = select_all().from("God").where_("age").gt(100).build()?;
/// let gods = session.select(&query)?.count();
/// println!("{} gods", gods);
/// # Ok::<(), docql::Error>(())
/// ```
pub struct Session<M, O = PassThroughObserver> {
    manager: M,
    observer: O,
    parser: QueryParser,
}

impl<M: Manager> Session<M> {
    /// Creates a session that leaves entity and field names unchanged.
    pub fn new(manager: M) -> Self {
        Self {
            manager,
            observer: PassThroughObserver,
            parser: QueryParser::new(),
        }
    }
}

impl<M: Manager, O: NameObserver> Session<M, O> {
    /// Replaces the name observer.
    pub fn with_observer<P: NameObserver>(self, observer: P) -> Session<M, P> {
        Session {
            manager: self.manager,
            observer,
            parser: self.parser,
        }
    }

    /// Replaces the parser limits.
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.parser = QueryParser::with_config(config);
        self
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Runs query text that has no placeholders.
    pub fn query(&self, text: &str) -> Result<EntityStream<'_>> {
        self.parser.query(text, &self.manager, &self.observer)
    }

    /// Compiles query text into a prepared statement.
    pub fn prepare(&self, text: &str) -> Result<PreparedStatement<'_>> {
        self.parser.prepare(text, &self.manager, &self.observer)
    }

    /// Runs a builder-made select.
    pub fn select(&self, query: &SelectQuery) -> Result<EntityStream<'_>> {
        debug!(entity = query.name(), "Executing built select");
        self.manager.select(query)
    }

    /// Runs a builder-made delete.
    pub fn delete(&self, query: &DeleteQuery) -> Result<()> {
        debug!(entity = query.name(), "Executing built delete");
        self.manager.delete(query)
    }

    /// Number of stored entities named `name`.
    pub fn count(&self, name: &str) -> Result<u64> {
        let entity = self.observer.fire_entity(name);
        debug!(entity = %entity, "Counting entities");
        self.manager.count(&entity)
    }
}
