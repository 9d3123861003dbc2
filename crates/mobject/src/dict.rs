/*
 * dict.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Insertion-ordered dictionaries keyed by byte strings.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::{Rejected, ValueError, key_for_message};
use crate::iter::ValueIter;
use crate::value::Value;

/// An owned mapping from byte-string keys to [`Value`]s.
///
/// Iteration follows insertion order. Keys are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dict {
    // Boxed so that a `Value` stays small; array padding is paid per slot.
    entries: Box<IndexMap<Vec<u8>, Value>>,
}

impl Dict {
    pub fn new() -> Self {
        Self {
            entries: Box::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a new entry. Fails if `key` is already present, leaving the
    /// dictionary untouched and handing `value` back.
    pub fn insert(&mut self, key: impl AsRef<[u8]>, value: Value) -> Result<(), Rejected> {
        let key = key.as_ref();
        match self.entries.entry(key.to_vec()) {
            Entry::Occupied(_) => Err(Rejected::new(
                ValueError::DuplicateKey {
                    key: key_for_message(key),
                },
                value,
            )),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Store `value` under `key`, dropping any previous entry.
    ///
    /// The entry always ends up last in iteration order, even when it
    /// replaced an existing one.
    pub fn replace(&mut self, key: impl AsRef<[u8]>, value: Value) {
        let key = key.as_ref();
        self.entries.shift_remove(key);
        self.entries.insert(key.to_vec(), value);
    }

    pub fn item(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        self.entries.get(key.as_ref())
    }

    pub fn item_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut Value> {
        self.entries.get_mut(key.as_ref())
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.entries.contains_key(key.as_ref())
    }

    /// The entry for `key`, created with `fresh` when missing.
    pub(crate) fn get_or_insert_with(
        &mut self,
        key: &[u8],
        fresh: impl FnOnce() -> Value,
    ) -> &mut Value {
        self.entries.entry(key.to_vec()).or_insert_with(fresh)
    }

    /// Detach the entry for `key` and return its value.
    ///
    /// The remaining entries keep their relative order.
    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Option<Value> {
        self.entries.shift_remove(key.as_ref())
    }

    /// Remove the entry for `key` and drop its value.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> Result<(), ValueError> {
        let key = key.as_ref();
        match self.remove(key) {
            Some(_) => Ok(()),
            None => Err(ValueError::KeyNotFound {
                key: key_for_message(key),
            }),
        }
    }

    /// Borrowing iterator over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v))
    }

    /// `(key, value)` pairs, as produced by [`Value::iter`].
    pub fn entries(&self) -> ValueIter<'_> {
        ValueIter::dict(self)
    }

    pub(crate) fn raw_iter(&self) -> indexmap::map::Iter<'_, Vec<u8>, Value> {
        self.entries.iter()
    }
}

impl<K: AsRef<[u8]>> FromIterator<(K, Value)> for Dict {
    /// Later duplicates replace earlier ones.
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (key, value) in iter {
            dict.replace(key, value);
        }
        dict
    }
}
