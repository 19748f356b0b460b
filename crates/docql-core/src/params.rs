//! Parameter registry for prepared statements.
//!
//! Translation registers every placeholder it meets and leaves a
//! [`Value::Parameter`] in the tree. Binding records a value and clears the
//! name from the unbound set; resolution substitutes bound values into a copy
//! of the tree.

use crate::condition::Condition;
use crate::entity::DocumentEntity;
use crate::error::{Error, Result};
use crate::value::Value;
use std::collections::HashMap;

/// Placeholder names and their bound values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    // Declaration order, without duplicates
    names: Vec<String>,
    unbound: Vec<String>,
    bound: HashMap<String, Value>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a placeholder and return the value standing in for it.
    ///
    /// Registering the same name twice yields the same placeholder.
    pub fn add(&mut self, name: impl Into<String>) -> Value {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name.clone());
            self.unbound.push(name.clone());
        }
        Value::Parameter(name)
    }

    /// Bind `value` to `name`. Rebinding overwrites the previous value.
    pub fn bind(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if !self.names.iter().any(|n| n == name) {
            return Err(Error::UnknownParameter(name.to_string()));
        }
        self.unbound.retain(|n| n != name);
        self.bound.insert(name.to_string(), value.into());
        Ok(())
    }

    /// True when no placeholder was registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True while at least one placeholder is still unbound.
    pub fn has_unbound(&self) -> bool {
        !self.unbound.is_empty()
    }

    /// Unbound placeholder names, in declaration order.
    pub fn unbound_names(&self) -> &[String] {
        &self.unbound
    }

    /// All registered placeholder names, in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Fail with the remaining names unless every placeholder is bound.
    pub fn ensure_bound(&self) -> Result<()> {
        if self.has_unbound() {
            return Err(Error::UnboundParameters(self.unbound.clone()));
        }
        Ok(())
    }

    /// Substitute bound values for placeholders inside `value`.
    pub fn resolve_value(&self, value: &Value) -> Result<Value> {
        value.try_map_parameters(&mut |name| {
            self.bound
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UnboundParameters(vec![name.to_string()]))
        })
    }

    pub fn resolve_condition(&self, condition: &Condition) -> Result<Condition> {
        condition.try_map_values(&mut |value| self.resolve_value(value))
    }

    pub fn resolve_entity(&self, entity: &DocumentEntity) -> Result<DocumentEntity> {
        entity.try_map_values(&mut |value| self.resolve_value(value))
    }
}
