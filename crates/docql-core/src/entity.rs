//! Document entity: the record inserted, updated and returned by a manager.

use crate::error::Result;
use crate::value::{Element, FromValue, Value};
use serde::{Deserialize, Serialize};

/// A named collection of elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntity {
    name: String,
    elements: Vec<Element>,
}

impl DocumentEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    pub fn with_elements(name: impl Into<String>, elements: Vec<Element>) -> Self {
        Self {
            name: name.into(),
            elements,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Append an element, replacing any existing one with the same name.
    pub fn add(&mut self, element: Element) {
        match self.elements.iter_mut().find(|e| e.name() == element.name()) {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
    }

    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }

    /// Read a field as `T`; `None` when the field is absent.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<Option<T>> {
        self.find(name).map(Element::get).transpose()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn try_map_values<F>(&self, f: &mut F) -> Result<Self>
    where
        F: FnMut(&Value) -> Result<Value>,
    {
        let elements = self
            .elements
            .iter()
            .map(|e| -> Result<Element> { Ok(e.with_value(f(e.value())?)) })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::with_elements(self.name.clone(), elements))
    }

    pub(crate) fn has_parameters(&self) -> bool {
        self.elements.iter().any(|e| e.value().has_parameters())
    }
}
