/*
 * json.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion from JSON documents.
//!
//! The value model has no booleans and no floating point, so `true`/`false`
//! become the integers 1 and 0 and any number that is not an `i64` is
//! rejected.

use crate::array::Array;
use crate::dict::Dict;
use crate::error::ValueError;
use crate::value::Value;

impl TryFrom<serde_json::Value> for Value {
    type Error = ValueError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;

        Ok(match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Int(i64::from(b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => {
                    return Err(ValueError::Unrepresentable {
                        what: format!("number {n}"),
                    });
                }
            },
            Json::String(s) => Value::String(s.into_bytes()),
            Json::Array(items) => {
                let mut array = Array::new();
                for item in items {
                    array.append(Value::try_from(item)?).map_err(|r| r.error)?;
                }
                Value::Array(array)
            }
            Json::Object(map) => Value::Dict(Dict::try_from(map)?),
        })
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for Dict {
    type Error = ValueError;

    /// Entries keep document order.
    fn try_from(map: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let mut dict = Dict::new();
        for (key, value) in map {
            dict.replace(key, Value::try_from(value)?);
        }
        Ok(dict)
    }
}
