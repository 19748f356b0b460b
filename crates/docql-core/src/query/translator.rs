/// Condition translator
///
/// Walks a parsed WHERE expression and produces the equivalent
/// [`CriteriaCondition`] tree. Field names go through the name observer,
/// literals become concrete values and placeholders are registered in the
/// caller's [`Params`].
use super::ast::{ComparisonOperator, Expression, Literal, Operand};
use super::observer::NameObserver;
use crate::condition::{ConditionKind, CriteriaCondition};
use crate::error::{Error, Result};
use crate::params::Params;
use crate::value::{Element, Value, ValueType};
use tracing::trace;

/// Translates AST predicates for one entity of one query
pub struct ConditionTranslator<'a> {
    query: &'a str,
    entity: &'a str,
    observer: &'a dyn NameObserver,
}

impl<'a> ConditionTranslator<'a> {
    /// `entity` must already be resolved through the observer
    pub fn new(query: &'a str, entity: &'a str, observer: &'a dyn NameObserver) -> Self {
        Self {
            query,
            entity,
            observer,
        }
    }

    /// Translate a predicate, registering its placeholders in `params`
    pub fn translate(&self, expr: &Expression, params: &mut Params) -> Result<CriteriaCondition> {
        let condition = self.condition(expr, params)?;
        trace!(entity = self.entity, condition = %condition, "Translated condition");
        Ok(condition)
    }

    /// Resolve a field name through the observer
    pub fn field(&self, name: &str) -> String {
        self.observer.fire_field(self.entity, name)
    }

    /// Resolve one operand to a value; placeholders are registered in `params`
    pub fn value(&self, operand: &Operand, params: &mut Params) -> Result<Value> {
        match operand {
            Operand::Literal(literal) => Ok(literal_value(literal)),
            Operand::Parameter(name) => Ok(params.add(name.as_str())),
            Operand::Convert { value, target } => {
                let target = ValueType::from_name(target).ok_or_else(|| {
                    Error::syntax(self.query, format!("unknown conversion type: {}", target))
                })?;
                if let Operand::Parameter(name) = value.as_ref() {
                    return Err(Error::syntax(
                        self.query,
                        format!("convert() cannot be applied to parameter @{}", name),
                    ));
                }
                self.value(value, params)?.convert(target)
            }
        }
    }

    fn condition(&self, expr: &Expression, params: &mut Params) -> Result<CriteriaCondition> {
        match expr {
            Expression::Comparison { field, op, value } => {
                let kind = match op {
                    ComparisonOperator::Eq => ConditionKind::Equals,
                    ComparisonOperator::Gt => ConditionKind::GreaterThan,
                    ComparisonOperator::Ge => ConditionKind::GreaterEquals,
                    ComparisonOperator::Lt => ConditionKind::LesserThan,
                    ComparisonOperator::Le => ConditionKind::LesserEquals,
                    ComparisonOperator::Ne => {
                        return Err(Error::syntax(
                            self.query,
                            format!("unsupported condition kind: {}", op),
                        ))
                    }
                };
                let element = Element::new(self.field(field), self.value(value, params)?);
                Ok(CriteriaCondition::compare(kind, element))
            }
            Expression::Like { field, pattern } => {
                let element = Element::new(self.field(field), self.value(pattern, params)?);
                Ok(CriteriaCondition::like(element))
            }
            Expression::In { field, values } => {
                let values = values
                    .iter()
                    .map(|operand| self.value(operand, params))
                    .collect::<Result<Vec<_>>>()?;
                CriteriaCondition::in_(Element::new(self.field(field), Value::List(values)))
            }
            Expression::Between { field, low, high } => {
                let bounds = vec![self.value(low, params)?, self.value(high, params)?];
                CriteriaCondition::between(Element::new(self.field(field), Value::List(bounds)))
            }
            Expression::Not(inner) => Ok(self.condition(inner, params)?.negate()),
            Expression::And(children) => {
                CriteriaCondition::all(self.conditions(children, params)?)
            }
            Expression::Or(children) => {
                CriteriaCondition::any(self.conditions(children, params)?)
            }
        }
    }

    fn conditions(
        &self,
        children: &[Expression],
        params: &mut Params,
    ) -> Result<Vec<CriteriaCondition>> {
        children
            .iter()
            .map(|child| self.condition(child, params))
            .collect()
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Integer(i) => Value::Integer(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Null => Value::Null,
        Literal::Json(json) => Value::from(json.clone()),
    }
}
