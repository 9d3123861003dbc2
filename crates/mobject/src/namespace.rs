/*
 * namespace.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Dotted/bracketed path resolution over a dictionary-rooted value tree.
//!
//! ```text
//! path    := segment ("." segment | "[" index "]")*
//! segment := bytes up to the next '.' or '['
//! index   := decimal digits
//! ```
//!
//! [`lookup`] is read-only. [`set`] creates missing intermediate containers,
//! choosing a dictionary or an array from the separator that follows.

use crate::MAX_ARRAY_LEN;
use crate::array::Array;
use crate::dict::Dict;
use crate::error::{NamespaceError, NamespaceErrorKind, NamespaceSetError};
use crate::value::Value;

/// Names must be shorter than this many bytes.
pub const MAX_NAME_LEN: usize = 256;

/// Index tokens between `[` and `]` must be shorter than this many bytes.
pub const MAX_INDEX_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    End,
    Dot,
    Bracket,
    Other,
}

/// A position in a path being walked.
struct PathCursor<'p> {
    path: &'p str,
    offset: usize,
}

impl<'p> PathCursor<'p> {
    fn new(path: &'p str) -> Self {
        Self { path, offset: 0 }
    }

    fn rest(&self) -> &'p [u8] {
        &self.path.as_bytes()[self.offset..]
    }

    fn error(&self, kind: NamespaceErrorKind, message: impl Into<String>) -> NamespaceError {
        self.error_at(self.offset, kind, message)
    }

    fn error_at(
        &self,
        offset: usize,
        kind: NamespaceErrorKind,
        message: impl Into<String>,
    ) -> NamespaceError {
        NamespaceError {
            kind,
            message: message.into(),
            offset,
            consumed: self.path.get(..offset).unwrap_or(self.path).to_string(),
        }
    }

    /// Consume a segment name.
    fn name(&mut self) -> Result<&'p [u8], NamespaceError> {
        let rest = self.rest();
        let len = rest
            .iter()
            .position(|&b| b == b'.' || b == b'[')
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error(NamespaceErrorKind::EmptyName, "Empty name"));
        }
        if len >= MAX_NAME_LEN {
            return Err(self.error(
                NamespaceErrorKind::NameTooLong,
                format!("Name \"{}...\" too long", lossy(&rest[..8])),
            ));
        }
        self.offset += len;
        Ok(&rest[..len])
    }

    /// Consume the separator after a name or a closing `]`.
    fn separator(&mut self) -> Separator {
        match self.rest().first() {
            None => Separator::End,
            Some(&b) => {
                self.offset += 1;
                match b {
                    b'.' => Separator::Dot,
                    b'[' => Separator::Bracket,
                    _ => Separator::Other,
                }
            }
        }
    }

    /// Consume an index token and its closing `]`.
    fn index(&mut self) -> Result<usize, NamespaceError> {
        let rest = self.rest();
        let len = rest.iter().position(|&b| b == b']').unwrap_or(rest.len());
        if len >= MAX_INDEX_LEN {
            return Err(self.error(
                NamespaceErrorKind::InvalidIndex,
                "Array index is too long",
            ));
        }
        if len == 0 {
            return Err(self.error(NamespaceErrorKind::InvalidIndex, "Array index is empty"));
        }
        if len == rest.len() {
            self.offset += len;
            return Err(self.error(
                NamespaceErrorKind::InvalidIndex,
                "Array index is not terminated",
            ));
        }
        let token = &rest[..len];
        self.offset += len + 1;
        if !token.iter().all(u8::is_ascii_digit) {
            return Err(self.error(
                NamespaceErrorKind::InvalidIndex,
                "Array index is not a number",
            ));
        }
        // Digits only, so a parse failure can only be overflow
        match std::str::from_utf8(token).ok().and_then(|t| t.parse::<usize>().ok()) {
            Some(index) if index < MAX_ARRAY_LEN => Ok(index),
            _ => Err(self.error(
                NamespaceErrorKind::IndexOutOfBounds,
                "Array index is out of bounds",
            )),
        }
    }
}

fn lossy(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

fn parse_error(cursor: &PathCursor<'_>) -> NamespaceError {
    cursor.error(NamespaceErrorKind::ParseError, "Parse error")
}

/// Resolve `path` in `ns` and borrow the value found there.
pub fn lookup<'n>(ns: &'n Dict, path: &str) -> Result<&'n Value, NamespaceError> {
    let mut cursor = PathCursor::new(path);
    if path.is_empty() {
        return Err(cursor.error(NamespaceErrorKind::EmptyPath, "Empty location specified"));
    }

    let mut current = ns;
    loop {
        let start = cursor.offset;
        let name = cursor.name()?;
        let mut next = current.item(name).ok_or_else(|| {
            cursor.error_at(
                start,
                NamespaceErrorKind::NotFound,
                format!("Name \"{}\" not found", lossy(name)),
            )
        })?;

        loop {
            match cursor.separator() {
                Separator::End => return Ok(next),
                Separator::Dot => {
                    current = next.as_dict().map_err(|_| {
                        cursor.error(
                            NamespaceErrorKind::NotADict,
                            format!("Name \"{}\" is not a dictionary", lossy(name)),
                        )
                    })?;
                    break;
                }
                Separator::Bracket => {
                    let array = next.as_array().map_err(|_| {
                        cursor.error(
                            NamespaceErrorKind::NotAnArray,
                            format!("Name \"{}\" is not an array", lossy(name)),
                        )
                    })?;
                    let index = cursor.index()?;
                    next = array.item(index).ok_or_else(|| {
                        cursor.error(
                            NamespaceErrorKind::IndexOutOfBounds,
                            "Array index is out of bounds",
                        )
                    })?;
                }
                Separator::Other => return Err(parse_error(&cursor)),
            }
        }
    }
}

/// Where [`set`] will place its value.
enum Slot<'n, 'p> {
    Entry(&'n mut Dict, &'p [u8]),
    Element(&'n mut Array, usize),
}

/// An empty container of the kind a separator calls for.
fn container_for(separator: Separator) -> Option<Value> {
    match separator {
        Separator::Dot => Some(Value::dict()),
        Separator::Bracket => Some(Value::array()),
        Separator::End | Separator::Other => None,
    }
}

/// Walk `path`, creating missing intermediate containers, up to the slot
/// that the final segment names.
fn walk<'n, 'p>(
    ns: &'n mut Dict,
    cursor: &mut PathCursor<'p>,
) -> Result<Slot<'n, 'p>, NamespaceError> {
    let mut current = ns;
    loop {
        let name = cursor.name()?;
        let mut separator = cursor.separator();
        let Some(fresh) = container_for(separator) else {
            // A name only ever ends at '.', '[' or the end of the path
            return Ok(Slot::Entry(current, name));
        };
        let mut next = current.get_or_insert_with(name, || fresh);

        loop {
            match separator {
                Separator::Dot => match next {
                    Value::Dict(dict) => {
                        current = dict;
                        break;
                    }
                    _ => {
                        return Err(cursor.error(
                            NamespaceErrorKind::NotADict,
                            format!("\"{}\" is not a dictionary", lossy(name)),
                        ));
                    }
                },
                Separator::Bracket => {
                    let index = cursor.index()?;
                    let Value::Array(array) = next else {
                        return Err(cursor.error(
                            NamespaceErrorKind::NotAnArray,
                            format!("\"{}\" is not an array", lossy(name)),
                        ));
                    };
                    separator = cursor.separator();
                    if separator == Separator::End {
                        return Ok(Slot::Element(array, index));
                    }
                    if array.item(index).is_none() {
                        let fresh = container_for(separator).ok_or_else(|| parse_error(cursor))?;
                        array.set(index, fresh).map_err(|_| {
                            cursor.error(NamespaceErrorKind::Allocation, "Allocation of array failed")
                        })?;
                    }
                    next = array.slot(index).map_err(|_| {
                        cursor.error(NamespaceErrorKind::Allocation, "Allocation of array failed")
                    })?;
                }
                Separator::End | Separator::Other => return Err(parse_error(cursor)),
            }
        }
    }
}

/// Store `value` at `path` in `ns`.
///
/// Missing intermediate containers are created: a dictionary when the next
/// separator is `.`, an array when it is `[`. Arrays are padded with
/// [`Value::None`] as needed. Whatever previously occupied the final slot
/// is dropped. On failure the value is handed back; intermediate containers
/// created before the failing step are kept.
pub fn set(ns: &mut Dict, path: &str, value: Value) -> Result<(), NamespaceSetError> {
    let mut cursor = PathCursor::new(path);
    if path.is_empty() {
        return Err(NamespaceSetError {
            error: cursor.error(NamespaceErrorKind::EmptyPath, "Empty location specified"),
            value,
        });
    }

    let slot = match walk(ns, &mut cursor) {
        Ok(slot) => slot,
        Err(error) => return Err(NamespaceSetError { error, value }),
    };
    match slot {
        Slot::Entry(dict, name) => {
            dict.replace(name, value);
            Ok(())
        }
        Slot::Element(array, index) => array.set(index, value).map_err(|rejected| {
            NamespaceSetError {
                error: cursor.error(NamespaceErrorKind::Allocation, "Allocation of array failed"),
                value: rejected.into_value(),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dict {
        let mut ns = Dict::new();
        set(&mut ns, "a.b[2].c", Value::string("deep")).unwrap();
        set(&mut ns, "s", Value::string("text")).unwrap();
        set(&mut ns, "list[0]", Value::Int(10)).unwrap();
        set(&mut ns, "list[1]", Value::Int(11)).unwrap();
        ns
    }

    fn lookup_err(ns: &Dict, path: &str) -> String {
        lookup(ns, path).unwrap_err().to_string()
    }

    fn set_err(ns: &mut Dict, path: &str) -> String {
        set(ns, path, Value::Int(1)).unwrap_err().to_string()
    }

    #[test]
    fn test_set_then_lookup() {
        let ns = sample();
        assert_eq!(lookup(&ns, "a.b[2].c").unwrap(), &Value::string("deep"));
        assert_eq!(lookup(&ns, "s").unwrap(), &Value::string("text"));
        assert_eq!(lookup(&ns, "list[1]").unwrap(), &Value::Int(11));
    }

    #[test]
    fn test_set_creates_intermediates() {
        let ns = sample();
        let b = lookup(&ns, "a.b").unwrap().as_array().unwrap();
        assert_eq!(b.len(), 3);
        assert_eq!(b.item(0), Some(&Value::None));
        assert_eq!(b.item(1), Some(&Value::None));
        assert!(b.item(2).unwrap().as_dict().is_ok());
    }

    #[test]
    fn test_lookup_returns_stored_instance() {
        let mut ns = Dict::new();
        set(&mut ns, "x[0][1]", Value::string("v")).unwrap();
        let via_path = lookup(&ns, "x[0][1]").unwrap();
        let direct = ns.item("x").unwrap().as_array().unwrap().item(0).unwrap();
        let direct = direct.as_array().unwrap().item(1).unwrap();
        assert!(std::ptr::eq(via_path, direct));
    }

    #[test]
    fn test_set_replaces_existing() {
        let mut ns = sample();
        set(&mut ns, "s", Value::Int(5)).unwrap();
        assert_eq!(lookup(&ns, "s").unwrap(), &Value::Int(5));
        set(&mut ns, "list[0]", Value::string("zero")).unwrap();
        assert_eq!(lookup(&ns, "list[0]").unwrap(), &Value::string("zero"));
    }

    #[test]
    fn test_lookup_errors() {
        let ns = sample();
        assert_eq!(lookup_err(&ns, ""), "Empty location specified");
        assert_eq!(lookup_err(&ns, "nope"), "Name \"nope\" not found");
        assert_eq!(lookup_err(&ns, "a.zz"), "Name \"zz\" not found at \"a.\"");
        assert_eq!(
            lookup_err(&ns, "s.x"),
            "Name \"s\" is not a dictionary at \"s.\""
        );
        assert_eq!(lookup_err(&ns, "s[0]"), "Name \"s\" is not an array at \"s[\"");
        assert_eq!(lookup_err(&ns, "a..b"), "Empty name at \"a.\"");
        assert_eq!(
            lookup_err(&ns, "list[2]"),
            "Array index is out of bounds at \"list[2]\""
        );
        assert_eq!(lookup_err(&ns, "list[0]x"), "Parse error at \"list[0]x\"");
    }

    #[test]
    fn test_lookup_through_string_fails() {
        let ns = sample();
        let err = lookup(&ns, "a.b[2].c.d").unwrap_err();
        assert_eq!(err.kind, NamespaceErrorKind::NotADict);
        assert_eq!(err.consumed, "a.b[2].c.");
    }

    #[test]
    fn test_index_errors() {
        let ns = sample();
        assert_eq!(lookup_err(&ns, "list[]"), "Array index is empty at \"list[\"");
        assert_eq!(
            lookup_err(&ns, "list[12"),
            "Array index is not terminated at \"list[12\""
        );
        assert_eq!(
            lookup_err(&ns, "list[1x]"),
            "Array index is not a number at \"list[1x]\""
        );
        assert_eq!(
            lookup_err(&ns, "list[-1]"),
            "Array index is not a number at \"list[-1]\""
        );
        assert_eq!(
            lookup_err(&ns, "list[0123456789012345678901234567890123]"),
            "Array index is too long at \"list[\""
        );
        assert_eq!(
            lookup_err(&ns, "list[99999999999999999999]"),
            "Array index is out of bounds at \"list[99999999999999999999]\""
        );
    }

    #[test]
    fn test_name_too_long() {
        let ns = Dict::new();
        let long = "abcdefghij".repeat(26);
        assert_eq!(lookup_err(&ns, &long), "Name \"abcdefgh...\" too long");

        let just_fits = "x".repeat(MAX_NAME_LEN - 1);
        assert_eq!(
            lookup_err(&ns, &just_fits),
            format!("Name \"{just_fits}\" not found")
        );
    }

    #[test]
    fn test_set_type_mismatch_keeps_value() {
        let mut ns = sample();
        let err = set(&mut ns, "s.x", Value::string("mine")).unwrap_err();
        assert_eq!(err.error.kind, NamespaceErrorKind::NotADict);
        assert_eq!(err.to_string(), "\"s\" is not a dictionary at \"s.\"");
        assert_eq!(err.into_value(), Value::string("mine"));
        assert_eq!(lookup(&ns, "s").unwrap(), &Value::string("text"));
    }

    #[test]
    fn test_set_errors() {
        let mut ns = sample();
        assert_eq!(set_err(&mut ns, ""), "Empty location specified");
        assert_eq!(set_err(&mut ns, ".a"), "Empty name");
        assert_eq!(set_err(&mut ns, "a."), "Empty name at \"a.\"");
        // The index is read before the container type is checked
        assert_eq!(set_err(&mut ns, "s[3]"), "\"s\" is not an array at \"s[3]\"");
        assert_eq!(set_err(&mut ns, "list[x]"), "Array index is not a number at \"list[x]\"");
        assert_eq!(set_err(&mut ns, "list[0]y"), "Parse error at \"list[0]y\"");
    }

    #[test]
    fn test_set_through_none_placeholder_fails() {
        let mut ns = sample();
        // a.b[0] is a None pad left by an earlier set
        let err = set(&mut ns, "a.b[0].c", Value::Int(1)).unwrap_err();
        assert_eq!(err.error.kind, NamespaceErrorKind::NotADict);
    }

    #[test]
    fn test_set_nested_arrays() {
        let mut ns = Dict::new();
        set(&mut ns, "m[1][2]", Value::Int(12)).unwrap();
        set(&mut ns, "m[1][0]", Value::Int(10)).unwrap();
        let row = lookup(&ns, "m[1]").unwrap().as_array().unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row.item(0), Some(&Value::Int(10)));
        assert_eq!(row.item(1), Some(&Value::None));
        assert_eq!(lookup(&ns, "m[0]").unwrap(), &Value::None);
    }

    #[test]
    fn test_set_top_level_moves_to_end() {
        let mut ns = Dict::new();
        set(&mut ns, "a", Value::Int(1)).unwrap();
        set(&mut ns, "b", Value::Int(2)).unwrap();
        set(&mut ns, "a", Value::Int(3)).unwrap();
        let keys: Vec<&[u8]> = ns.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"b".as_slice(), b"a".as_slice()]);
    }
}
