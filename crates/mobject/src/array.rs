/*
 * array.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Ordered, growable sequences of values.

use crate::MAX_ARRAY_LEN;
use crate::error::{Rejected, ValueError};
use crate::iter::ValueIter;
use crate::value::Value;

/// An owned sequence of [`Value`]s indexed `0..len`.
///
/// The length never exceeds [`MAX_ARRAY_LEN`]. Growth goes through
/// `try_reserve`, so an allocation failure is reported instead of aborting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    items: Vec<Value>,
}

impl Array {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Make room for `additional` more elements without going over the limit.
    fn grow(&mut self, additional: usize) -> Result<(), ValueError> {
        let wanted = self.items.len().saturating_add(additional);
        if wanted > MAX_ARRAY_LEN {
            return Err(ValueError::ArrayTooLarge {
                index: wanted - 1,
                max: MAX_ARRAY_LEN,
            });
        }
        self.items
            .try_reserve(additional)
            .map_err(|_| ValueError::AllocationFailed { len: wanted })
    }

    /// Add `value` after the last element.
    pub fn append(&mut self, value: Value) -> Result<(), Rejected> {
        if let Err(error) = self.grow(1) {
            return Err(Rejected::new(error, value));
        }
        self.items.push(value);
        Ok(())
    }

    /// Add `value` before the first element, shifting everything up by one.
    pub fn prepend(&mut self, value: Value) -> Result<(), Rejected> {
        if let Err(error) = self.grow(1) {
            return Err(Rejected::new(error, value));
        }
        self.items.insert(0, value);
        Ok(())
    }

    /// Store `value` at `index`.
    ///
    /// Any previous occupant is dropped. Setting past the end pads the
    /// newly exposed slots below `index` with [`Value::None`].
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), Rejected> {
        match self.slot(index) {
            Ok(slot) => {
                *slot = value;
                Ok(())
            }
            Err(error) => Err(Rejected::new(error, value)),
        }
    }

    /// Mutable access to `index`, padding with `None` up to and including it.
    pub(crate) fn slot(&mut self, index: usize) -> Result<&mut Value, ValueError> {
        if index >= MAX_ARRAY_LEN {
            return Err(ValueError::ArrayTooLarge {
                index,
                max: MAX_ARRAY_LEN,
            });
        }
        if index >= self.items.len() {
            self.grow(index + 1 - self.items.len())?;
            self.items.resize_with(index + 1, Value::default);
        }
        Ok(&mut self.items[index])
    }

    pub fn item(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&Value> {
        self.items.last()
    }

    /// Remove and return the element with the highest index.
    pub fn pop(&mut self) -> Option<Value> {
        self.items.pop()
    }

    /// Remove and return the element at index 0, shifting the rest down.
    pub fn pull(&mut self) -> Option<Value> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Borrowing iterator over the elements in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// `(index, element)` pairs, as produced by [`Value::iter`].
    pub fn entries(&self) -> ValueIter<'_> {
        ValueIter::array(self)
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
