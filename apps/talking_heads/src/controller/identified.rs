//! Ordered collection keyed by element identity.

use std::{fmt::Debug, hash::Hash};

pub trait Identified {
    type Id: Copy + Eq + Hash + Debug;

    fn id(&self) -> Self::Id;
}

/// Keeps insertion order and at most one element per id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifiedVec<T> {
    items: Vec<T>,
}

impl<T> Default for IdentifiedVec<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> IdentifiedVec<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the collection in iteration order. A repeated id keeps the
    /// position of its first occurrence and the value of its last.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut collection = Self::new();
        for item in items {
            collection.upsert(item);
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    fn position(&self, id: T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.position(id).map(|index| &self.items[index])
    }

    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        let index = self.position(id)?;
        self.items.get_mut(index)
    }

    /// Overwrites the element with the same id in place, or appends.
    /// Returns `true` when the element was appended.
    pub fn upsert(&mut self, item: T) -> bool {
        match self.position(item.id()) {
            Some(index) => {
                self.items[index] = item;
                false
            }
            None => {
                self.items.push(item);
                true
            }
        }
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T> IntoIterator for &'a IdentifiedVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Identified> FromIterator<T> for IdentifiedVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}
