//! Append-only store of parsed stream elements.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::element::StreamElement;

/// An ordered, append-only sequence of stream elements, indexed from 0.
///
/// Elements are immutable once appended; there is no removal. The owning
/// parser is the single writer.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStore {
    elements: Vec<StreamElement>,
}

impl StreamStore {
    pub fn new() -> Self {
        StreamStore { elements: Vec::new() }
    }

    pub(crate) fn append(&mut self, element: StreamElement) -> &StreamElement {
        self.elements.push(element);
        self.elements.last().unwrap()
    }

    pub fn get(&self, index: usize) -> Option<&StreamElement> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StreamElement> {
        self.elements.iter()
    }

    pub fn last(&self) -> Option<&StreamElement> {
        self.elements.last()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Index<usize> for StreamStore {
    type Output = StreamElement;

    fn index(&self, index: usize) -> &StreamElement {
        &self.elements[index]
    }
}

impl<'a> IntoIterator for &'a StreamStore {
    type Item = &'a StreamElement;
    type IntoIter = std::slice::Iter<'a, StreamElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
