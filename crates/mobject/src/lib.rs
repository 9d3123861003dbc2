/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A small dynamically-typed value model and a namespace resolver over it.
//!
//! A [`Value`] is one of `None`, `Int`, `String`, `Array` or `Dict`.
//! Containers own their elements outright, so inserting moves a value in,
//! removing moves it back out, and dropping a container drops everything
//! it holds. `Clone` is a deep copy.
//!
//! The [`namespace`] module treats a [`Dict`] as the root of a tree and
//! reads or writes values in it by path:
//!
//! ```
//! use mobject::{Dict, Value, namespace};
//!
//! let mut ns = Dict::new();
//! namespace::set(&mut ns, "site.pages[1].title", Value::string("About")).unwrap();
//!
//! let title = namespace::lookup(&ns, "site.pages[1].title").unwrap();
//! assert_eq!(title.to_string(), "About");
//! assert!(namespace::lookup(&ns, "site.pages[0].title").is_err());
//! ```

pub mod array;
pub mod compare;
pub mod dict;
pub mod display;
pub mod error;
pub mod iter;
pub mod json;
pub mod namespace;
pub mod value;

/// The largest number of elements an [`Array`] may hold.
///
/// Namespace paths use the same bound for the indices they accept. This is
/// a count, not a memory budget: setting the last index of an empty array
/// pads every earlier slot, which at the full bound is several GiB of
/// `Value`s.
pub const MAX_ARRAY_LEN: usize = 128 * 1024 * 1024;

pub use array::Array;
pub use compare::compare;
pub use dict::Dict;
pub use error::{
    NamespaceError, NamespaceErrorKind, NamespaceSetError, Rejected, ValueError,
};
pub use iter::{IterKey, ValueIter};
pub use value::{Value, ValueType};
