/*
 * compare.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Total ordering over values.

use std::cmp::Ordering;

use crate::array::Array;
use crate::dict::Dict;
use crate::value::Value;

impl Value {
    /// Compare two values.
    ///
    /// Values of different variants order by type:
    /// `None < Int < String < Array < Dict`. Within a variant:
    ///
    /// - all `None`s are equal
    /// - integers compare numerically
    /// - strings compare byte-wise, a proper prefix ordering first
    /// - arrays compare by length, then element by element
    /// - a dictionary is only equal to itself; distinct dictionaries order
    ///   by address, which is stable for as long as neither is moved
    pub fn compare(&self, other: &Value) -> Ordering {
        if std::ptr::eq(self, other) {
            return Ordering::Equal;
        }
        match (self, other) {
            (Value::None, Value::None) => Ordering::Equal,
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.as_slice().cmp(b.as_slice()),
            (Value::Array(a), Value::Array(b)) => compare_arrays(a, b),
            (Value::Dict(a), Value::Dict(b)) => compare_dicts(a, b),
            (a, b) => a.value_type().cmp(&b.value_type()),
        }
    }
}

fn compare_arrays(a: &Array, b: &Array) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| x.compare(y))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

fn compare_dicts(a: &Dict, b: &Dict) -> Ordering {
    let a = a as *const Dict as usize;
    let b = b as *const Dict as usize;
    a.cmp(&b)
}

/// Free-function form of [`Value::compare`].
pub fn compare(a: &Value, b: &Value) -> Ordering {
    a.compare(b)
}
