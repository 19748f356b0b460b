// Common test utilities for docql integration tests

use docql::{
    CriteriaCondition, DeleteQuery, Direction, DocumentEntity, Element, EntityStream, Error,
    Manager, Result, SelectQuery, Value,
};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

/// A call received by [`MemoryManager`]
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum Call {
    Select(SelectQuery),
    Delete(DeleteQuery),
    Insert(DocumentEntity, Option<Duration>),
    Update(DocumentEntity),
}

/// In-memory manager that evaluates condition trees and records every call.
///
/// Entities are keyed by their `name` element for updates.
#[derive(Default)]
pub struct MemoryManager {
    entities: RefCell<Vec<DocumentEntity>>,
    calls: RefCell<Vec<Call>>,
}

#[allow(dead_code)]
impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager preloaded with a few gods
    pub fn pantheon() -> Self {
        let manager = Self::new();
        for (name, age, power) in [
            ("Ada", 20, "wisdom"),
            ("Diana", 3000, "hunt"),
            ("Mars", 4000, "war"),
            ("Minerva", 3500, "wisdom"),
        ] {
            manager.entities.borrow_mut().push(DocumentEntity::with_elements(
                "God",
                vec![
                    Element::of("name", name),
                    Element::of("age", age),
                    Element::of("power", power),
                ],
            ));
        }
        manager
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.borrow().last().cloned()
    }

    pub fn entities(&self) -> Vec<DocumentEntity> {
        self.entities.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Manager for MemoryManager {
    fn select<'a>(&'a self, query: &SelectQuery) -> Result<EntityStream<'a>> {
        self.record(Call::Select(query.clone()));

        let mut found: Vec<DocumentEntity> = self
            .entities
            .borrow()
            .iter()
            .filter(|e| e.name() == query.name())
            .filter(|e| {
                query
                    .condition()
                    .map_or(true, |c| matches(e, c.as_criteria()))
            })
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            query
                .sorts()
                .iter()
                .map(|sort| {
                    let ordering = compare_fields(a, b, sort.name());
                    match sort.direction() {
                        Direction::Asc => ordering,
                        Direction::Desc => ordering.reverse(),
                    }
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let skip = query.skip() as usize;
        let limit = match query.limit() {
            0 => usize::MAX,
            n => n as usize,
        };
        let fields = query.fields().to_vec();

        Ok(Box::new(
            found
                .into_iter()
                .skip(skip)
                .take(limit)
                .map(move |entity| project(entity, &fields)),
        ))
    }

    fn delete(&self, query: &DeleteQuery) -> Result<()> {
        self.record(Call::Delete(query.clone()));

        let mut entities = self.entities.borrow_mut();
        let hit = |e: &DocumentEntity| {
            e.name() == query.name()
                && query
                    .condition()
                    .map_or(true, |c| matches(e, c.as_criteria()))
        };

        if query.fields().is_empty() {
            entities.retain(|e| !hit(e));
        } else {
            for entity in entities.iter_mut().filter(|e| hit(e)) {
                let kept = entity
                    .elements()
                    .iter()
                    .filter(|el| !query.fields().iter().any(|f| f == el.name()))
                    .cloned()
                    .collect();
                *entity = DocumentEntity::with_elements(entity.name(), kept);
            }
        }
        Ok(())
    }

    fn insert(&self, entity: DocumentEntity) -> Result<DocumentEntity> {
        self.record(Call::Insert(entity.clone(), None));
        self.entities.borrow_mut().push(entity.clone());
        Ok(entity)
    }

    fn insert_with_ttl(&self, entity: DocumentEntity, ttl: Duration) -> Result<DocumentEntity> {
        self.record(Call::Insert(entity.clone(), Some(ttl)));
        self.entities.borrow_mut().push(entity.clone());
        Ok(entity)
    }

    fn update(&self, entity: DocumentEntity) -> Result<DocumentEntity> {
        self.record(Call::Update(entity.clone()));

        let mut entities = self.entities.borrow_mut();
        let key = entity.find("name").map(|e| e.value().clone());
        let same_key = |e: &&mut DocumentEntity| {
            e.name() == entity.name() && e.find("name").map(Element::value) == key.as_ref()
        };
        match entities.iter_mut().find(same_key) {
            Some(existing) => {
                for element in entity.elements() {
                    existing.add(element.clone());
                }
            }
            None => entities.push(entity.clone()),
        }
        Ok(entity)
    }

    fn count(&self, name: &str) -> Result<u64> {
        Ok(self
            .entities
            .borrow()
            .iter()
            .filter(|e| e.name() == name)
            .count() as u64)
    }
}

fn project(entity: DocumentEntity, fields: &[String]) -> DocumentEntity {
    if fields.is_empty() {
        return entity;
    }
    let elements = entity
        .elements()
        .iter()
        .filter(|e| fields.iter().any(|f| f == e.name()))
        .cloned()
        .collect();
    DocumentEntity::with_elements(entity.name(), elements)
}

fn compare_fields(a: &DocumentEntity, b: &DocumentEntity, field: &str) -> Ordering {
    match (a.find(field), b.find(field)) {
        (Some(x), Some(y)) => compare(x.value(), y.value()).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Integer(x), Value::Float(y)) => (*x as f64).partial_cmp(y),
        (Value::Float(x), Value::Integer(y)) => x.partial_cmp(&(*y as f64)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Evaluate a condition tree against one entity
pub fn matches(entity: &DocumentEntity, condition: &CriteriaCondition) -> bool {
    use docql::ConditionKind::*;

    match condition {
        CriteriaCondition::And(children) => children.iter().all(|c| matches(entity, c)),
        CriteriaCondition::Or(children) => children.iter().any(|c| matches(entity, c)),
        CriteriaCondition::Not(child) => !matches(entity, child),
        CriteriaCondition::Compare(comparison) => {
            let Some(actual) = entity.find(comparison.field()).map(Element::value) else {
                return false;
            };
            let expected = comparison.value();
            match comparison.kind() {
                Equals => compare(actual, expected) == Some(Ordering::Equal) || actual == expected,
                GreaterThan => compare(actual, expected) == Some(Ordering::Greater),
                GreaterEquals => matches!(
                    compare(actual, expected),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                LesserThan => compare(actual, expected) == Some(Ordering::Less),
                LesserEquals => matches!(
                    compare(actual, expected),
                    Some(Ordering::Less | Ordering::Equal)
                ),
                Like => match (actual, expected) {
                    (Value::String(text), Value::String(pattern)) => like(text, pattern),
                    _ => false,
                },
                In => expected.as_list().map_or(false, |items| {
                    items
                        .iter()
                        .any(|item| compare(actual, item) == Some(Ordering::Equal))
                }),
                Between => match expected.as_list() {
                    Some([low, high]) => {
                        matches!(
                            compare(actual, low),
                            Some(Ordering::Greater | Ordering::Equal)
                        ) && matches!(
                            compare(actual, high),
                            Some(Ordering::Less | Ordering::Equal)
                        )
                    }
                    _ => false,
                },
                And | Or | Not => false,
            }
        }
    }
}

// SQL-style pattern: `%` any run, `_` any single character
fn like(text: &str, pattern: &str) -> bool {
    fn go(text: &[char], pattern: &[char]) -> bool {
        match pattern.split_first() {
            None => text.is_empty(),
            Some(('%', rest)) => (0..=text.len()).any(|i| go(&text[i..], rest)),
            Some(('_', rest)) => !text.is_empty() && go(&text[1..], rest),
            Some((c, rest)) => text.first() == Some(c) && go(&text[1..], rest),
        }
    }
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    go(&text, &pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_patterns() {
        assert!(like("Minerva", "M%"));
        assert!(like("Mars", "M_rs"));
        assert!(!like("Diana", "M%"));
    }
}

/// Storage failure raised by [`UnavailableManager`]
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct StoreUnavailable(pub &'static str);

impl fmt::Display for StoreUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store unavailable: {}", self.0)
    }
}

impl std::error::Error for StoreUnavailable {}

/// Manager whose every operation fails with [`StoreUnavailable`]
#[allow(dead_code)]
pub struct UnavailableManager(pub &'static str);

impl UnavailableManager {
    fn fail<T>(&self) -> Result<T> {
        Err(Error::manager(StoreUnavailable(self.0)))
    }
}

impl Manager for UnavailableManager {
    fn select<'a>(&'a self, _query: &SelectQuery) -> Result<EntityStream<'a>> {
        self.fail()
    }

    fn delete(&self, _query: &DeleteQuery) -> Result<()> {
        self.fail()
    }

    fn insert(&self, _entity: DocumentEntity) -> Result<DocumentEntity> {
        self.fail()
    }

    fn insert_with_ttl(&self, _entity: DocumentEntity, _ttl: Duration) -> Result<DocumentEntity> {
        self.fail()
    }

    fn update(&self, _entity: DocumentEntity) -> Result<DocumentEntity> {
        self.fail()
    }

    fn count(&self, _name: &str) -> Result<u64> {
        self.fail()
    }
}
