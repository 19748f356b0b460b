/// Fluent query builders
///
/// Programmatic counterpart of the query language. A builder chain and the
/// equivalent query text compile to equal query objects.
///
/// ```
/// use docql_core::query::builder::select_all;
///
/// let query = select_all()
///     .from("God")
///     .where_("name").eq("Ada")
///     .and("age").gt(20)
///     .build()?;
/// assert_eq!(query.name(), "God");
/// # Ok::<(), docql_core::Error>(())
/// ```
use super::model::{DeleteQuery, Direction, SelectQuery, Sort};
use crate::condition::{ConditionKind, CriteriaCondition};
use crate::error::{Result, ValidationError};
use crate::value::{Element, Value};

/// How a new predicate joins the one already built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    And,
    Or,
}

/// A builder that accumulates a predicate
pub trait Filterable: Sized {
    fn attach(self, join: Join, condition: CriteriaCondition) -> Self;
}

fn combine(
    current: Option<CriteriaCondition>,
    join: Join,
    next: CriteriaCondition,
) -> CriteriaCondition {
    match (current, join) {
        (None, _) => next,
        (Some(current), Join::And) => current.and(next),
        (Some(current), Join::Or) => current.or(next),
    }
}

fn entity_name(name: Option<String>) -> Result<String> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ValidationError::MissingEntity.into()),
    }
}

/// Pending predicate on one field, waiting for its operator
pub struct WhereStep<B> {
    builder: B,
    field: String,
    join: Join,
    negated: bool,
}

impl<B: Filterable> WhereStep<B> {
    fn new(builder: B, field: String, join: Join) -> Self {
        Self {
            builder,
            field,
            join,
            negated: false,
        }
    }

    /// Negate the comparison that follows
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    fn finish(self, kind: ConditionKind, value: Value) -> B {
        let condition = CriteriaCondition::compare(kind, Element::new(self.field, value));
        let condition = if self.negated {
            condition.negate()
        } else {
            condition
        };
        self.builder.attach(self.join, condition)
    }

    pub fn eq(self, value: impl Into<Value>) -> B {
        self.finish(ConditionKind::Equals, value.into())
    }

    pub fn gt(self, value: impl Into<Value>) -> B {
        self.finish(ConditionKind::GreaterThan, value.into())
    }

    pub fn gte(self, value: impl Into<Value>) -> B {
        self.finish(ConditionKind::GreaterEquals, value.into())
    }

    pub fn lt(self, value: impl Into<Value>) -> B {
        self.finish(ConditionKind::LesserThan, value.into())
    }

    pub fn lte(self, value: impl Into<Value>) -> B {
        self.finish(ConditionKind::LesserEquals, value.into())
    }

    pub fn like(self, pattern: impl Into<Value>) -> B {
        self.finish(ConditionKind::Like, pattern.into())
    }

    pub fn in_<I, V>(self, values: I) -> B
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.finish(ConditionKind::In, Value::List(values))
    }

    pub fn between(self, low: impl Into<Value>, high: impl Into<Value>) -> B {
        self.finish(
            ConditionKind::Between,
            Value::List(vec![low.into(), high.into()]),
        )
    }
}

/// Start a select projecting `fields`
pub fn select<I, S>(fields: I) -> SelectBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SelectBuilder {
        fields: fields.into_iter().map(Into::into).collect(),
        ..SelectBuilder::default()
    }
}

/// Start a select over all fields
pub fn select_all() -> SelectBuilder {
    SelectBuilder::default()
}

/// Start a delete removing `fields`
pub fn delete<I, S>(fields: I) -> DeleteBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    DeleteBuilder {
        fields: fields.into_iter().map(Into::into).collect(),
        ..DeleteBuilder::default()
    }
}

/// Start a delete of whole entities
pub fn delete_all() -> DeleteBuilder {
    DeleteBuilder::default()
}

#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    name: Option<String>,
    fields: Vec<String>,
    condition: Option<CriteriaCondition>,
    sorts: Vec<Sort>,
    skip: u64,
    limit: u64,
}

impl SelectBuilder {
    pub fn from(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn where_(self, field: impl Into<String>) -> WhereStep<Self> {
        WhereStep::new(self, field.into(), Join::And)
    }

    pub fn and(self, field: impl Into<String>) -> WhereStep<Self> {
        WhereStep::new(self, field.into(), Join::And)
    }

    pub fn or(self, field: impl Into<String>) -> WhereStep<Self> {
        WhereStep::new(self, field.into(), Join::Or)
    }

    pub fn order_by(self, field: impl Into<String>) -> OrderStep {
        OrderStep {
            builder: self,
            field: field.into(),
        }
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn build(self) -> Result<SelectQuery> {
        Ok(SelectQuery::new(
            entity_name(self.name)?,
            self.condition.map(Into::into),
            self.sorts,
            self.fields,
            self.skip,
            self.limit,
        ))
    }
}

impl Filterable for SelectBuilder {
    fn attach(mut self, join: Join, condition: CriteriaCondition) -> Self {
        self.condition = Some(combine(self.condition.take(), join, condition));
        self
    }
}

/// Pending sort key, waiting for its direction
pub struct OrderStep {
    builder: SelectBuilder,
    field: String,
}

impl OrderStep {
    pub fn asc(self) -> SelectBuilder {
        self.direction(Direction::Asc)
    }

    pub fn desc(self) -> SelectBuilder {
        self.direction(Direction::Desc)
    }

    fn direction(mut self, direction: Direction) -> SelectBuilder {
        self.builder.sorts.push(Sort::new(self.field, direction));
        self.builder
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteBuilder {
    name: Option<String>,
    fields: Vec<String>,
    condition: Option<CriteriaCondition>,
}

impl DeleteBuilder {
    pub fn from(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn where_(self, field: impl Into<String>) -> WhereStep<Self> {
        WhereStep::new(self, field.into(), Join::And)
    }

    pub fn and(self, field: impl Into<String>) -> WhereStep<Self> {
        WhereStep::new(self, field.into(), Join::And)
    }

    pub fn or(self, field: impl Into<String>) -> WhereStep<Self> {
        WhereStep::new(self, field.into(), Join::Or)
    }

    pub fn build(self) -> Result<DeleteQuery> {
        Ok(DeleteQuery::new(
            entity_name(self.name)?,
            self.condition.map(Into::into),
            self.fields,
        ))
    }
}

impl Filterable for DeleteBuilder {
    fn attach(mut self, join: Join, condition: CriteriaCondition) -> Self {
        self.condition = Some(combine(self.condition.take(), join, condition));
        self
    }
}
