/// SELECT statement parser
use super::ast::OrderDirection;
use super::model::{Direction, SelectQuery, Sort};
use super::observer::NameObserver;
use super::prepared::{PreparedQuery, PreparedStatement};
use super::translator::ConditionTranslator;
use super::{ensure_no_params, parse_with};
use crate::condition::Condition;
use crate::config::QueryConfig;
use crate::error::{Result, ValidationError};
use crate::manager::{EntityStream, Manager};
use crate::params::Params;
use tracing::debug;

/// Compiles SELECT text into a [`SelectQuery`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectQueryParser {
    config: QueryConfig,
}

impl SelectQueryParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueryConfig) -> Self {
        Self { config }
    }

    /// Parse and translate `text`, returning the query and its placeholders
    pub fn compile(
        &self,
        text: &str,
        observer: &dyn NameObserver,
    ) -> Result<(SelectQuery, Params)> {
        let statement = parse_with(text, &self.config, |parser| parser.parse_select())?;

        if statement.skip < 0 {
            return Err(ValidationError::NegativeSkip(statement.skip).into());
        }
        if statement.limit < 0 {
            return Err(ValidationError::NegativeLimit(statement.limit).into());
        }

        let entity = observer.fire_entity(&statement.entity);
        let translator = ConditionTranslator::new(text, &entity, observer);
        let mut params = Params::new();

        let condition = statement
            .where_clause
            .as_ref()
            .map(|clause| translator.translate(&clause.condition, &mut params))
            .transpose()?
            .map(Condition::from);

        let sorts = statement
            .order_by
            .iter()
            .map(|column| {
                let direction = match column.direction {
                    OrderDirection::Asc => Direction::Asc,
                    OrderDirection::Desc => Direction::Desc,
                };
                Sort::new(translator.field(&column.column), direction)
            })
            .collect();

        let fields = statement
            .fields
            .iter()
            .map(|field| translator.field(field))
            .collect();

        let query = SelectQuery::new(
            entity,
            condition,
            sorts,
            fields,
            statement.skip as u64,
            statement.limit as u64,
        );
        Ok((query, params))
    }

    /// Run a query that has no placeholders
    pub fn query<'m>(
        &self,
        text: &str,
        manager: &'m dyn Manager,
        observer: &dyn NameObserver,
    ) -> Result<EntityStream<'m>> {
        let (query, params) = self.compile(text, observer)?;
        ensure_no_params(text, &params)?;
        debug!(entity = query.name(), "Executing select");
        manager.select(&query)
    }

    pub fn prepare<'m>(
        &self,
        text: &str,
        manager: &'m dyn Manager,
        observer: &dyn NameObserver,
    ) -> Result<PreparedStatement<'m>> {
        let (query, params) = self.compile(text, observer)?;
        Ok(PreparedStatement::new(
            PreparedQuery::Select(query),
            params,
            manager,
            text,
        ))
    }
}
