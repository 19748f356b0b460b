/// UPDATE statement parser
use super::insert::entity_from_body;
use super::observer::NameObserver;
use super::prepared::{PreparedQuery, PreparedStatement};
use super::{ensure_no_params, parse_with};
use crate::config::QueryConfig;
use crate::entity::DocumentEntity;
use crate::error::Result;
use crate::manager::Manager;
use crate::params::Params;
use tracing::debug;

/// Compiles UPDATE text into the entity to write
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateQueryParser {
    config: QueryConfig,
}

impl UpdateQueryParser {
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
    ) -> Result<(DocumentEntity, Params)> {
        let statement = parse_with(text, &self.config, |parser| parser.parse_update())?;
        let mut params = Params::new();
        let entity = entity_from_body(
            text,
            &statement.entity,
            &statement.body,
            observer,
            &mut params,
        )?;
        Ok((entity, params))
    }

    pub fn query(
        &self,
        text: &str,
        manager: &dyn Manager,
        observer: &dyn NameObserver,
    ) -> Result<DocumentEntity> {
        let (entity, params) = self.compile(text, observer)?;
        ensure_no_params(text, &params)?;
        debug!(entity = entity.name(), "Executing update");
        manager.update(entity)
    }

    pub fn prepare<'m>(
        &self,
        text: &str,
        manager: &'m dyn Manager,
        observer: &dyn NameObserver,
    ) -> Result<PreparedStatement<'m>> {
        let (entity, params) = self.compile(text, observer)?;
        Ok(PreparedStatement::new(
            PreparedQuery::Update(entity),
            params,
            manager,
            text,
        ))
    }
}
