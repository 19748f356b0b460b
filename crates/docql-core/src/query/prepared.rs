/// Prepared statements
///
/// A compiled query whose placeholders are bound before execution. Binding
/// only records values; `result` substitutes them into a copy of the query,
/// so one statement can be bound and executed any number of times.
use super::insert::InsertQuery;
use super::model::{DeleteQuery, SelectQuery};
use crate::condition::Condition;
use crate::entity::DocumentEntity;
use crate::error::{Error, Result};
use crate::manager::{EntityStream, Manager};
use crate::params::Params;
use crate::value::Value;
use std::iter;
use tracing::debug;

/// The compiled query held by a prepared statement
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedQuery {
    Select(SelectQuery),
    Delete(DeleteQuery),
    Insert(InsertQuery),
    Update(DocumentEntity),
}

pub struct PreparedStatement<'m> {
    query: PreparedQuery,
    params: Params,
    manager: &'m dyn Manager,
    text: String,
}

impl<'m> PreparedStatement<'m> {
    pub(crate) fn new(
        query: PreparedQuery,
        params: Params,
        manager: &'m dyn Manager,
        text: &str,
    ) -> Self {
        debug!(query = text, params = ?params.names(), "Prepared statement");
        Self {
            query,
            params,
            manager,
            text: text.to_string(),
        }
    }

    /// Bind a value to a named placeholder
    pub fn bind(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.params.bind(name, value)?;
        debug!(name, "Bound parameter");
        Ok(self)
    }

    /// Bind a value to the `n`th `?` placeholder, counting from 1
    pub fn bind_position(&mut self, position: usize, value: impl Into<Value>) -> Result<&mut Self> {
        self.bind(&position.to_string(), value)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn query(&self) -> &PreparedQuery {
        &self.query
    }

    /// The query text this statement was compiled from
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Execute against the manager
    ///
    /// Fails with the unbound names while any placeholder is unbound. DELETE
    /// yields nothing; INSERT and UPDATE yield the entity the manager returns.
    pub fn result(&self) -> Result<EntityStream<'m>> {
        self.params.ensure_bound()?;
        debug!(query = %self.text, "Executing prepared statement");

        match &self.query {
            PreparedQuery::Select(query) => {
                let query = query.with_condition(self.resolve_condition(query.condition())?);
                self.manager.select(&query)
            }
            PreparedQuery::Delete(query) => {
                let query = query.with_condition(self.resolve_condition(query.condition())?);
                self.manager.delete(&query)?;
                Ok(Box::new(iter::empty()))
            }
            PreparedQuery::Insert(insert) => {
                let entity = self.params.resolve_entity(&insert.entity)?;
                let entity = match insert.ttl {
                    Some(ttl) => self.manager.insert_with_ttl(entity, ttl)?,
                    None => self.manager.insert(entity)?,
                };
                Ok(Box::new(iter::once(entity)))
            }
            PreparedQuery::Update(entity) => {
                let entity = self.manager.update(self.params.resolve_entity(entity)?)?;
                Ok(Box::new(iter::once(entity)))
            }
        }
    }

    /// Execute and return at most one entity
    pub fn single_result(&self) -> Result<Option<DocumentEntity>> {
        let mut results = self.result()?;
        let first = results.next();
        if first.is_some() && results.next().is_some() {
            return Err(Error::NonUniqueResult {
                query: self.text.clone(),
            });
        }
        Ok(first)
    }

    fn resolve_condition(&self, condition: Option<&Condition>) -> Result<Option<Condition>> {
        condition
            .map(|condition| self.params.resolve_condition(condition))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::CriteriaCondition;
    use crate::query::observer::PassThroughObserver;
    use crate::query::{DeleteQueryParser, InsertQueryParser, SelectQueryParser};
    use crate::value::Element;
    use std::cell::RefCell;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        rows: usize,
        selects: RefCell<Vec<SelectQuery>>,
        deletes: RefCell<Vec<DeleteQuery>>,
        inserts: RefCell<Vec<(DocumentEntity, Option<Duration>)>>,
    }

    impl Manager for Recorder {
        fn select<'a>(&'a self, query: &SelectQuery) -> Result<EntityStream<'a>> {
            self.selects.borrow_mut().push(query.clone());
            let name = query.name().to_string();
            Ok(Box::new(
                (0..self.rows).map(move |_| DocumentEntity::new(name.as_str())),
            ))
        }

        fn delete(&self, query: &DeleteQuery) -> Result<()> {
            self.deletes.borrow_mut().push(query.clone());
            Ok(())
        }

        fn insert(&self, entity: DocumentEntity) -> Result<DocumentEntity> {
            self.inserts.borrow_mut().push((entity.clone(), None));
            Ok(entity)
        }

        fn insert_with_ttl(&self, entity: DocumentEntity, ttl: Duration) -> Result<DocumentEntity> {
            self.inserts.borrow_mut().push((entity.clone(), Some(ttl)));
            Ok(entity)
        }

        fn update(&self, entity: DocumentEntity) -> Result<DocumentEntity> {
            Ok(entity)
        }

        fn count(&self, _name: &str) -> Result<u64> {
            Ok(self.rows as u64)
        }
    }

    #[test]
    fn test_result_requires_bound_params() {
        let manager = Recorder::default();
        let statement = SelectQueryParser::new()
            .prepare("FROM God WHERE age = @age AND name = @name", &manager, &PassThroughObserver)
            .unwrap();

        match statement.result() {
            Err(Error::UnboundParameters(names)) => assert_eq!(names, ["age", "name"]),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an error"),
        }
        assert!(manager.selects.borrow().is_empty());
    }

    #[test]
    fn test_bind_resolves_a_copy() {
        let manager = Recorder::default();
        let mut statement = SelectQueryParser::new()
            .prepare("FROM God WHERE age = @age", &manager, &PassThroughObserver)
            .unwrap();

        statement.bind("age", 12).unwrap();
        assert_eq!(statement.result().unwrap().count(), 0);

        let executed = manager.selects.borrow()[0].clone();
        assert_eq!(
            executed.condition().unwrap(),
            &CriteriaCondition::eq(Element::of("age", 12))
        );

        let PreparedQuery::Select(held) = statement.query() else {
            panic!("expected select");
        };
        assert!(held.condition().unwrap().as_criteria().has_parameters());
    }

    #[test]
    fn test_bind_unknown_name() {
        let manager = Recorder::default();
        let mut statement = SelectQueryParser::new()
            .prepare("FROM God WHERE age = @age", &manager, &PassThroughObserver)
            .unwrap();
        assert!(matches!(
            statement.bind("name", "Ada"),
            Err(Error::UnknownParameter(ref name)) if name == "name"
        ));
    }

    #[test]
    fn test_bind_position() {
        let manager = Recorder::default();
        let mut statement = SelectQueryParser::new()
            .prepare("FROM God WHERE age > ? AND age < ?", &manager, &PassThroughObserver)
            .unwrap();
        statement
            .bind_position(1, 10)
            .unwrap()
            .bind_position(2, 20)
            .unwrap();
        assert!(statement.result().is_ok());
    }

    #[test]
    fn test_single_result() {
        let none = Recorder::default();
        let one = Recorder {
            rows: 1,
            ..Recorder::default()
        };
        let two = Recorder {
            rows: 2,
            ..Recorder::default()
        };
        let parser = SelectQueryParser::new();

        let statement = parser.prepare("FROM God", &none, &PassThroughObserver).unwrap();
        assert_eq!(statement.single_result().unwrap(), None);

        let statement = parser.prepare("FROM God", &one, &PassThroughObserver).unwrap();
        assert!(statement.single_result().unwrap().is_some());

        let statement = parser.prepare("FROM God", &two, &PassThroughObserver).unwrap();
        assert!(matches!(
            statement.single_result(),
            Err(Error::NonUniqueResult { ref query }) if query == "FROM God"
        ));
    }

    #[test]
    fn test_delete_yields_nothing() {
        let manager = Recorder::default();
        let statement = DeleteQueryParser::new()
            .prepare("DELETE FROM God WHERE age = 1", &manager, &PassThroughObserver)
            .unwrap();
        assert_eq!(statement.result().unwrap().count(), 0);
        assert_eq!(manager.deletes.borrow().len(), 1);
    }

    #[test]
    fn test_insert_with_ttl_yields_entity() {
        let manager = Recorder::default();
        let mut statement = InsertQueryParser::new()
            .prepare("INSERT God (name = @name) 1 day", &manager, &PassThroughObserver)
            .unwrap();
        statement.bind("name", "Diana").unwrap();

        let entity = statement.single_result().unwrap().unwrap();
        assert_eq!(entity.get::<String>("name").unwrap().as_deref(), Some("Diana"));

        let inserts = manager.inserts.borrow();
        assert_eq!(inserts[0].1, Some(Duration::from_secs(86_400)));
    }
}
