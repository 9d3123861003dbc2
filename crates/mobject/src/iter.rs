/*
 * iter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Uniform iteration over the two container kinds.

use std::iter::{Enumerate, FusedIterator};

use crate::array::Array;
use crate::dict::Dict;
use crate::value::Value;

/// The key half of an iteration step.
///
/// Array indices are synthesised per step; dictionary keys are borrowed
/// from the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterKey<'a> {
    Index(usize),
    Name(&'a [u8]),
}

impl IterKey<'_> {
    /// An owned value for this key: `Int` for indices, `String` for names.
    pub fn to_value(&self) -> Value {
        match *self {
            // MAX_ARRAY_LEN keeps every index far below i64::MAX
            IterKey::Index(i) => Value::Int(i as i64),
            IterKey::Name(name) => Value::string(name),
        }
    }
}

/// A cursor over an [`Array`] or [`Dict`], created by [`Value::iter`].
///
/// Once exhausted it keeps returning `None`.
#[derive(Debug, Clone)]
pub enum ValueIter<'a> {
    Array(Enumerate<std::slice::Iter<'a, Value>>),
    Dict(indexmap::map::Iter<'a, Vec<u8>, Value>),
}

impl<'a> ValueIter<'a> {
    pub(crate) fn array(array: &'a Array) -> Self {
        ValueIter::Array(array.iter().enumerate())
    }

    pub(crate) fn dict(dict: &'a Dict) -> Self {
        ValueIter::Dict(dict.raw_iter())
    }
}

impl<'a> Iterator for ValueIter<'a> {
    type Item = (IterKey<'a>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ValueIter::Array(items) => items.next().map(|(i, v)| (IterKey::Index(i), v)),
            ValueIter::Dict(entries) => entries
                .next()
                .map(|(k, v)| (IterKey::Name(k.as_slice()), v)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            ValueIter::Array(items) => items.size_hint(),
            ValueIter::Dict(entries) => entries.size_hint(),
        }
    }
}

impl ExactSizeIterator for ValueIter<'_> {}

impl FusedIterator for ValueIter<'_> {}
