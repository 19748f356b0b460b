/// Query value objects
///
/// Immutable select/delete queries handed to a manager. Any embedded
/// condition is finalized and read-only.
use crate::condition::Condition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

/// A sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    name: String,
    direction: Direction,
}

impl Sort {
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }

    pub fn asc(name: impl Into<String>) -> Self {
        Self::new(name, Direction::Asc)
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self::new(name, Direction::Desc)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// A finalized select query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectQuery {
    name: String,
    condition: Option<Condition>,
    sorts: Vec<Sort>,
    fields: Vec<String>,
    skip: u64,
    limit: u64,
}

impl SelectQuery {
    pub(crate) fn new(
        name: String,
        condition: Option<Condition>,
        sorts: Vec<Sort>,
        fields: Vec<String>,
        skip: u64,
        limit: u64,
    ) -> Self {
        Self {
            name,
            condition,
            sorts,
            fields,
            skip,
            limit,
        }
    }

    /// Entity name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    /// Projected fields; empty means all fields
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    /// Maximum number of results; zero means unbounded
    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub(crate) fn with_condition(&self, condition: Option<Condition>) -> Self {
        Self {
            condition,
            ..self.clone()
        }
    }
}

/// A finalized delete query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteQuery {
    name: String,
    condition: Option<Condition>,
    fields: Vec<String>,
}

impl DeleteQuery {
    pub(crate) fn new(name: String, condition: Option<Condition>, fields: Vec<String>) -> Self {
        Self {
            name,
            condition,
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Fields to remove; empty means the whole entity
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub(crate) fn with_condition(&self, condition: Option<Condition>) -> Self {
        Self {
            condition,
            ..self.clone()
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => write!(f, "ASC"),
            Direction::Desc => write!(f, "DESC"),
        }
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        if self.fields.is_empty() {
            write!(f, "*")?;
        } else {
            write!(f, "{}", self.fields.join(", "))?;
        }
        write!(f, " FROM {}", self.name)?;
        if let Some(ref condition) = self.condition {
            write!(f, " WHERE {}", condition)?;
        }
        for (i, sort) in self.sorts.iter().enumerate() {
            let prefix = if i == 0 { " ORDER BY " } else { ", " };
            write!(f, "{}{} {}", prefix, sort.name, sort.direction)?;
        }
        if self.skip > 0 {
            write!(f, " SKIP {}", self.skip)?;
        }
        if self.limit > 0 {
            write!(f, " LIMIT {}", self.limit)?;
        }
        Ok(())
    }
}

impl fmt::Display for DeleteQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE")?;
        if !self.fields.is_empty() {
            write!(f, " {}", self.fields.join(", "))?;
        }
        write!(f, " FROM {}", self.name)?;
        if let Some(ref condition) = self.condition {
            write!(f, " WHERE {}", condition)?;
        }
        Ok(())
    }
}
