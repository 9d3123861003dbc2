/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for value model operations.

use thiserror::Error;

use crate::value::{Value, ValueType};

/// Errors reported by value model operations.
///
/// These are always local: an operation that fails leaves its receiver
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The operation requires a different variant.
    #[error("expected {expected} value, found {found}")]
    WrongType { expected: ValueType, found: ValueType },

    /// An array would grow past [`crate::MAX_ARRAY_LEN`].
    #[error("array index {index} exceeds the maximum array size {max}")]
    ArrayTooLarge { index: usize, max: usize },

    /// The allocator refused to grow a container.
    #[error("allocation failed while growing array to {len} entries")]
    AllocationFailed { len: usize },

    /// `insert` found the key already present.
    #[error("key \"{key}\" is already present")]
    DuplicateKey { key: String },

    /// `delete` did not find the key.
    #[error("key \"{key}\" not found")]
    KeyNotFound { key: String },

    /// Integer arithmetic left the signed 64-bit range.
    #[error("integer overflow adding {addend} to {value}")]
    IntegerOverflow { value: i64, addend: i64 },

    /// A foreign value has no counterpart in the model.
    #[error("cannot represent {what}")]
    Unrepresentable { what: String },
}

/// A failed operation that took ownership of a value.
///
/// Ownership of the value is handed back to the caller instead of being
/// dropped, so nothing is lost when an insert or append is refused.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejected {
    pub error: ValueError,
    pub value: Value,
}

impl Rejected {
    pub(crate) fn new(error: ValueError, value: Value) -> Self {
        Self { error, value }
    }

    /// Take the rejected value back.
    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Render a byte-string key for an error message.
pub(crate) fn key_for_message(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

/// Classification of a namespace path failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceErrorKind {
    EmptyPath,
    EmptyName,
    NameTooLong,
    NotFound,
    NotADict,
    NotAnArray,
    InvalidIndex,
    IndexOutOfBounds,
    ParseError,
    Allocation,
}

/// A failure to resolve a namespace path.
///
/// `offset` is the byte position in the path where the failure was
/// detected and `consumed` is the path text before it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", at_suffix(.offset, .consumed))]
pub struct NamespaceError {
    pub kind: NamespaceErrorKind,
    pub message: String,
    pub offset: usize,
    pub consumed: String,
}

fn at_suffix(offset: &usize, consumed: &str) -> String {
    if *offset > 0 {
        format!(" at \"{consumed}\"")
    } else {
        String::new()
    }
}

/// A failed [`crate::namespace::set`]. The value is handed back.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct NamespaceSetError {
    pub error: NamespaceError,
    pub value: Value,
}

impl NamespaceSetError {
    pub fn into_value(self) -> Value {
        self.value
    }
}
