/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The tagged value type.
//!
//! A [`Value`] has exactly one owner at a time: the caller, or the
//! [`Array`]/[`Dict`] it was moved into. Dropping a value drops everything
//! it still owns, and `Clone` is a full deep copy with no shared structure.
//! Containers only ever own their children, so the value graph is a tree.

use std::fmt;

use crate::array::Array;
use crate::dict::Dict;
use crate::error::ValueError;
use crate::iter::ValueIter;

/// A dynamically-typed value.
///
/// Equality (`==`) is structural and intended for assertions. The total
/// ordering used by the library is [`Value::compare`], which treats two
/// distinct dictionaries as unequal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The empty placeholder. Carries no data and needs no allocation.
    #[default]
    None,

    /// A signed 64-bit integer.
    Int(i64),

    /// An owned byte string. Need not be valid UTF-8.
    String(Vec<u8>),

    /// An ordered sequence of values.
    Array(Array),

    /// An insertion-ordered mapping from byte-string keys to values.
    Dict(Dict),
}

/// The variant tag of a [`Value`].
///
/// Variants are declared in comparison precedence order, so the derived
/// ordering is the cross-type ordering used by [`Value::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    None,
    Int,
    String,
    Array,
    Dict,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::None => "none",
            ValueType::Int => "integer",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Dict => "dictionary",
        })
    }
}

impl Value {
    /// Create a string value by copying `bytes`.
    pub fn string(bytes: impl AsRef<[u8]>) -> Self {
        Value::String(bytes.as_ref().to_vec())
    }

    /// Create an empty array value.
    pub fn array() -> Self {
        Value::Array(Array::new())
    }

    /// Create an empty dictionary value.
    pub fn dict() -> Self {
        Value::Dict(Dict::new())
    }

    /// The variant tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::None => ValueType::None,
            Value::Int(_) => ValueType::Int,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Dict(_) => ValueType::Dict,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Check if this value is "truthy" for conditional evaluation.
    ///
    /// - `None` is false
    /// - integers are true when nonzero
    /// - strings, arrays and dictionaries are true when nonempty
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Int(n) => *n != 0,
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Dict(d) => !d.is_empty(),
        }
    }

    fn wrong_type(&self, expected: ValueType) -> ValueError {
        ValueError::WrongType {
            expected,
            found: self.value_type(),
        }
    }

    pub fn as_int(&self) -> Result<i64, ValueError> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(other.wrong_type(ValueType::Int)),
        }
    }

    /// Add `addend` to an integer value in place.
    pub fn int_add(&mut self, addend: i64) -> Result<(), ValueError> {
        match self {
            Value::Int(n) => {
                *n = n.checked_add(addend).ok_or(ValueError::IntegerOverflow {
                    value: *n,
                    addend,
                })?;
                Ok(())
            }
            other => Err(other.wrong_type(ValueType::Int)),
        }
    }

    /// The bytes of a string value.
    pub fn as_bytes(&self) -> Result<&[u8], ValueError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.wrong_type(ValueType::String)),
        }
    }

    pub fn as_array(&self) -> Result<&Array, ValueError> {
        match self {
            Value::Array(a) => Ok(a),
            other => Err(other.wrong_type(ValueType::Array)),
        }
    }

    pub fn as_array_mut(&mut self) -> Result<&mut Array, ValueError> {
        match self {
            Value::Array(a) => Ok(a),
            other => Err(other.wrong_type(ValueType::Array)),
        }
    }

    pub fn as_dict(&self) -> Result<&Dict, ValueError> {
        match self {
            Value::Dict(d) => Ok(d),
            other => Err(other.wrong_type(ValueType::Dict)),
        }
    }

    pub fn as_dict_mut(&mut self) -> Result<&mut Dict, ValueError> {
        match self {
            Value::Dict(d) => Ok(d),
            other => Err(other.wrong_type(ValueType::Dict)),
        }
    }

    /// Iterate over the entries of an array or dictionary.
    ///
    /// Arrays yield `(index, element)` pairs in index order and dictionaries
    /// yield `(key, value)` pairs in insertion order. Any other variant is
    /// not iterable.
    pub fn iter(&self) -> Result<ValueIter<'_>, ValueError> {
        match self {
            Value::Array(a) => Ok(a.entries()),
            Value::Dict(d) => Ok(d.entries()),
            other => Err(ValueError::WrongType {
                expected: ValueType::Array,
                found: other.value_type(),
            }),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::String(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::String(bytes)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl From<Dict> for Value {
    fn from(dict: Dict) -> Self {
        Value::Dict(dict)
    }
}
