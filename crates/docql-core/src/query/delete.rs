/// DELETE statement parser
use super::model::DeleteQuery;
use super::observer::NameObserver;
use super::prepared::{PreparedQuery, PreparedStatement};
use super::translator::ConditionTranslator;
use super::{ensure_no_params, parse_with};
use crate::condition::Condition;
use crate::config::QueryConfig;
use crate::error::Result;
use crate::manager::Manager;
use crate::params::Params;
use tracing::debug;

/// Compiles DELETE text into a [`DeleteQuery`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteQueryParser {
    config: QueryConfig,
}

impl DeleteQueryParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn compile(
        &self,
        text: &str,
        observer: &dyn NameObserver,
    ) -> Result<(DeleteQuery, Params)> {
        let statement = parse_with(text, &self.config, |parser| parser.parse_delete())?;

        let entity = observer.fire_entity(&statement.entity);
        let translator = ConditionTranslator::new(text, &entity, observer);
        let mut params = Params::new();

        let condition = statement
            .where_clause
            .as_ref()
            .map(|clause| translator.translate(&clause.condition, &mut params))
            .transpose()?
            .map(Condition::from);

        let fields = statement
            .fields
            .iter()
            .map(|field| translator.field(field))
            .collect();

        Ok((DeleteQuery::new(entity, condition, fields), params))
    }

    pub fn query(
        &self,
        text: &str,
        manager: &dyn Manager,
        observer: &dyn NameObserver,
    ) -> Result<()> {
        let (query, params) = self.compile(text, observer)?;
        ensure_no_params(text, &params)?;
        debug!(entity = query.name(), "Executing delete");
        manager.delete(&query)
    }

    pub fn prepare<'m>(
        &self,
        text: &str,
        manager: &'m dyn Manager,
        observer: &dyn NameObserver,
    ) -> Result<PreparedStatement<'m>> {
        let (query, params) = self.compile(text, observer)?;
        Ok(PreparedStatement::new(
            PreparedQuery::Delete(query),
            params,
            manager,
            text,
        ))
    }
}
