//! Condition algebra.
//!
//! [`CriteriaCondition`] is the composable predicate tree: leaf comparisons
//! plus n-ary `AND`/`OR` and unary `NOT`. Combinators consume the node and
//! return a new one, keeping conjunctions and disjunctions flat.
//!
//! [`Condition`] is the finalized form embedded in query objects. It only
//! exposes inspection, so a condition cannot be recombined once a query owns
//! it.

use crate::error::{Result, ValidationError};
use crate::value::{Element, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of predicate operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    Equals,
    GreaterThan,
    GreaterEquals,
    LesserThan,
    LesserEquals,
    Like,
    In,
    Between,
    And,
    Or,
    Not,
}

impl ConditionKind {
    /// Reserved element name under which a composite kind stores its children.
    pub fn synthetic_name(self) -> Option<&'static str> {
        match self {
            ConditionKind::And => Some("_AND"),
            ConditionKind::Or => Some("_OR"),
            ConditionKind::Not => Some("_NOT"),
            _ => None,
        }
    }

    /// True for the boolean composition kinds.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            ConditionKind::And | ConditionKind::Or | ConditionKind::Not
        )
    }

    fn symbol(self) -> &'static str {
        match self {
            ConditionKind::Equals => "=",
            ConditionKind::GreaterThan => ">",
            ConditionKind::GreaterEquals => ">=",
            ConditionKind::LesserThan => "<",
            ConditionKind::LesserEquals => "<=",
            ConditionKind::Like => "LIKE",
            ConditionKind::In => "IN",
            ConditionKind::Between => "BETWEEN",
            ConditionKind::And => "AND",
            ConditionKind::Or => "OR",
            ConditionKind::Not => "NOT",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConditionKind::Equals => "EQUALS",
            ConditionKind::GreaterThan => "GREATER_THAN",
            ConditionKind::GreaterEquals => "GREATER_EQUALS",
            ConditionKind::LesserThan => "LESSER_THAN",
            ConditionKind::LesserEquals => "LESSER_EQUALS",
            ConditionKind::Like => "LIKE",
            ConditionKind::In => "IN",
            ConditionKind::Between => "BETWEEN",
            ConditionKind::And => "AND",
            ConditionKind::Or => "OR",
            ConditionKind::Not => "NOT",
        };
        write!(f, "{}", name)
    }
}

/// A leaf comparison between a field and a value.
///
/// Only built through the [`CriteriaCondition`] constructors, which check
/// the `IN` and `BETWEEN` value shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    kind: ConditionKind,
    element: Element,
}

impl Comparison {
    pub fn kind(&self) -> ConditionKind {
        self.kind
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn field(&self) -> &str {
        self.element.name()
    }

    pub fn value(&self) -> &Value {
        self.element.value()
    }
}

/// Composable predicate tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CriteriaCondition {
    Compare(Comparison),
    And(Vec<CriteriaCondition>),
    Or(Vec<CriteriaCondition>),
    Not(Box<CriteriaCondition>),
}

impl CriteriaCondition {
    pub(crate) fn compare(kind: ConditionKind, element: Element) -> Self {
        CriteriaCondition::Compare(Comparison { kind, element })
    }

    pub fn eq(element: Element) -> Self {
        Self::compare(ConditionKind::Equals, element)
    }

    pub fn gt(element: Element) -> Self {
        Self::compare(ConditionKind::GreaterThan, element)
    }

    pub fn gte(element: Element) -> Self {
        Self::compare(ConditionKind::GreaterEquals, element)
    }

    pub fn lt(element: Element) -> Self {
        Self::compare(ConditionKind::LesserThan, element)
    }

    pub fn lte(element: Element) -> Self {
        Self::compare(ConditionKind::LesserEquals, element)
    }

    pub fn like(element: Element) -> Self {
        Self::compare(ConditionKind::Like, element)
    }

    /// Set membership. The element value must be a list.
    pub fn in_(element: Element) -> Result<Self> {
        if !element.value().is_iterable() {
            return Err(ValidationError::NotIterable {
                kind: ConditionKind::In,
                found: element.value().type_name().to_string(),
            }
            .into());
        }
        Ok(Self::compare(ConditionKind::In, element))
    }

    /// Inclusive range. The element value must be a list of exactly two items.
    pub fn between(element: Element) -> Result<Self> {
        match element.value().as_list() {
            None => Err(ValidationError::NotIterable {
                kind: ConditionKind::Between,
                found: element.value().type_name().to_string(),
            }
            .into()),
            Some(items) if items.len() != 2 => {
                Err(ValidationError::BetweenArity { found: items.len() }.into())
            }
            Some(_) => Ok(Self::compare(ConditionKind::Between, element)),
        }
    }

    /// Conjunction of all `conditions`, in order.
    pub fn all<I>(conditions: I) -> Result<Self>
    where
        I: IntoIterator<Item = CriteriaCondition>,
    {
        let children: Vec<_> = conditions.into_iter().collect();
        if children.is_empty() {
            return Err(ValidationError::EmptyComposition(ConditionKind::And).into());
        }
        Ok(CriteriaCondition::And(children))
    }

    /// Disjunction of all `conditions`, in order.
    pub fn any<I>(conditions: I) -> Result<Self>
    where
        I: IntoIterator<Item = CriteriaCondition>,
    {
        let children: Vec<_> = conditions.into_iter().collect();
        if children.is_empty() {
            return Err(ValidationError::EmptyComposition(ConditionKind::Or).into());
        }
        Ok(CriteriaCondition::Or(children))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(condition: CriteriaCondition) -> Self {
        condition.negate()
    }

    pub fn kind(&self) -> ConditionKind {
        match self {
            CriteriaCondition::Compare(c) => c.kind,
            CriteriaCondition::And(_) => ConditionKind::And,
            CriteriaCondition::Or(_) => ConditionKind::Or,
            CriteriaCondition::Not(_) => ConditionKind::Not,
        }
    }

    /// `self AND other`. Appends to an existing conjunction instead of nesting.
    pub fn and(self, other: CriteriaCondition) -> Self {
        match self {
            CriteriaCondition::And(mut children) => {
                children.push(other);
                CriteriaCondition::And(children)
            }
            node => CriteriaCondition::And(vec![node, other]),
        }
    }

    /// `self OR other`. Appends to an existing disjunction instead of nesting.
    pub fn or(self, other: CriteriaCondition) -> Self {
        match self {
            CriteriaCondition::Or(mut children) => {
                children.push(other);
                CriteriaCondition::Or(children)
            }
            node => CriteriaCondition::Or(vec![node, other]),
        }
    }

    /// Logical negation; negating a `NOT` unwraps it.
    pub fn negate(self) -> Self {
        match self {
            CriteriaCondition::Not(child) => *child,
            node => CriteriaCondition::Not(Box::new(node)),
        }
    }

    /// Whether any leaf still holds an unbound placeholder.
    pub fn has_parameters(&self) -> bool {
        match self {
            CriteriaCondition::Compare(c) => c.value().has_parameters(),
            CriteriaCondition::And(children) | CriteriaCondition::Or(children) => {
                children.iter().any(CriteriaCondition::has_parameters)
            }
            CriteriaCondition::Not(child) => child.has_parameters(),
        }
    }

    /// Rebuild the tree with every leaf value passed through `f`.
    pub(crate) fn try_map_values<F>(&self, f: &mut F) -> Result<Self>
    where
        F: FnMut(&Value) -> Result<Value>,
    {
        Ok(match self {
            CriteriaCondition::Compare(c) => CriteriaCondition::Compare(Comparison {
                kind: c.kind,
                element: c.element.with_value(f(c.value())?),
            }),
            CriteriaCondition::And(children) => CriteriaCondition::And(
                children
                    .iter()
                    .map(|child| child.try_map_values(f))
                    .collect::<Result<_>>()?,
            ),
            CriteriaCondition::Or(children) => CriteriaCondition::Or(
                children
                    .iter()
                    .map(|child| child.try_map_values(f))
                    .collect::<Result<_>>()?,
            ),
            CriteriaCondition::Not(child) => {
                CriteriaCondition::Not(Box::new(child.try_map_values(f)?))
            }
        })
    }
}

impl fmt::Display for CriteriaCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriteriaCondition::Compare(c) => match c.value() {
                Value::String(s) => write!(f, "{} {} \"{}\"", c.field(), c.kind.symbol(), s),
                value => write!(f, "{} {} {}", c.field(), c.kind.symbol(), value),
            },
            CriteriaCondition::And(children) | CriteriaCondition::Or(children) => {
                let joiner = self.kind().symbol();
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", joiner)?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            CriteriaCondition::Not(child) => write!(f, "NOT {}", child),
        }
    }
}

/// A finalized, read-only condition owned by a query object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition(CriteriaCondition);

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        self.0.kind()
    }

    /// The underlying tree, for pattern matching.
    pub fn as_criteria(&self) -> &CriteriaCondition {
        &self.0
    }

    /// The leaf comparison, when this condition is not composite.
    pub fn comparison(&self) -> Option<&Comparison> {
        match &self.0 {
            CriteriaCondition::Compare(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn try_map_values<F>(&self, f: &mut F) -> Result<Self>
    where
        F: FnMut(&Value) -> Result<Value>,
    {
        self.0.try_map_values(f).map(Condition)
    }
}

impl From<CriteriaCondition> for Condition {
    fn from(condition: CriteriaCondition) -> Self {
        Condition(condition)
    }
}

impl PartialEq<CriteriaCondition> for Condition {
    fn eq(&self, other: &CriteriaCondition) -> bool {
        &self.0 == other
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
