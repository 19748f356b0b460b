/// INSERT statement parser
use super::ast::{EntityBody, TimeUnit, Ttl};
use super::observer::NameObserver;
use super::prepared::{PreparedQuery, PreparedStatement};
use super::translator::ConditionTranslator;
use super::{ensure_no_params, parse_with};
use crate::config::QueryConfig;
use crate::entity::DocumentEntity;
use crate::error::{Result, ValidationError};
use crate::manager::Manager;
use crate::params::Params;
use crate::value::{Element, Value};
use std::time::Duration;
use tracing::debug;

// Expiry must be expressible as signed 64-bit milliseconds
const MAX_TTL_MILLIS: u128 = i64::MAX as u128;

/// Compiles INSERT text into an entity and an optional time to live
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertQueryParser {
    config: QueryConfig,
}

/// A compiled INSERT
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub entity: DocumentEntity,
    pub ttl: Option<Duration>,
}

impl InsertQueryParser {
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
    ) -> Result<(InsertQuery, Params)> {
        let statement = parse_with(text, &self.config, |parser| parser.parse_insert())?;

        let ttl = statement.ttl.map(ttl_duration).transpose()?;
        let mut params = Params::new();
        let entity = entity_from_body(
            text,
            &statement.entity,
            &statement.body,
            observer,
            &mut params,
        )?;

        Ok((InsertQuery { entity, ttl }, params))
    }

    pub fn query(
        &self,
        text: &str,
        manager: &dyn Manager,
        observer: &dyn NameObserver,
    ) -> Result<DocumentEntity> {
        let (insert, params) = self.compile(text, observer)?;
        ensure_no_params(text, &params)?;
        debug!(entity = insert.entity.name(), ttl = ?insert.ttl, "Executing insert");
        match insert.ttl {
            Some(ttl) => manager.insert_with_ttl(insert.entity, ttl),
            None => manager.insert(insert.entity),
        }
    }

    pub fn prepare<'m>(
        &self,
        text: &str,
        manager: &'m dyn Manager,
        observer: &dyn NameObserver,
    ) -> Result<PreparedStatement<'m>> {
        let (insert, params) = self.compile(text, observer)?;
        Ok(PreparedStatement::new(
            PreparedQuery::Insert(insert),
            params,
            manager,
            text,
        ))
    }
}

/// Build the entity written by INSERT or UPDATE
pub(crate) fn entity_from_body(
    text: &str,
    name: &str,
    body: &EntityBody,
    observer: &dyn NameObserver,
    params: &mut Params,
) -> Result<DocumentEntity> {
    let name = observer.fire_entity(name);
    let translator = ConditionTranslator::new(text, &name, observer);
    let mut entity = DocumentEntity::new(name.as_str());

    match body {
        EntityBody::Assignments(assignments) => {
            for assignment in assignments {
                let value = translator.value(&assignment.value, params)?;
                entity.add(Element::new(translator.field(&assignment.field), value));
            }
        }
        EntityBody::Json(document) => {
            for (field, value) in document {
                entity.add(Element::new(
                    translator.field(field),
                    Value::from(value.clone()),
                ));
            }
        }
    }
    Ok(entity)
}

fn ttl_duration(ttl: Ttl) -> Result<Duration> {
    if ttl.amount < 0 {
        return Err(ValidationError::NegativeTtl(ttl.amount).into());
    }
    let amount = ttl.amount as u64;
    let duration = match ttl.unit {
        TimeUnit::Day => amount.checked_mul(86_400).map(Duration::from_secs),
        TimeUnit::Hour => amount.checked_mul(3_600).map(Duration::from_secs),
        TimeUnit::Minute => amount.checked_mul(60).map(Duration::from_secs),
        TimeUnit::Second => Some(Duration::from_secs(amount)),
        TimeUnit::Millisecond => Some(Duration::from_millis(amount)),
        TimeUnit::Nanosecond => Some(Duration::from_nanos(amount)),
    };
    match duration {
        Some(duration) if duration.as_millis() <= MAX_TTL_MILLIS => Ok(duration),
        _ => Err(ValidationError::TtlOutOfRange {
            amount: ttl.amount,
            unit: ttl.unit.to_string(),
        }
        .into()),
    }
}
