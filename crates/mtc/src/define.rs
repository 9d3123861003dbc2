/*
 * define.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `-D KEY=VALUE` handling.

use std::ffi::OsStr;

use anyhow::{Context, Result, anyhow, bail};
use mobject::{Dict, Value, namespace};

/// Keys must be shorter than this many bytes.
const MAX_KEY_LEN: usize = 256;

/// Split a define into key and value at the first `=`.
///
/// The value is kept as raw bytes; the key is a namespace path and must be
/// UTF-8.
pub fn parse(kv: &[u8]) -> Result<(&str, &[u8])> {
    let split = kv
        .iter()
        .position(|&b| b == b'=')
        .map(|eq| (&kv[..eq], &kv[eq + 1..]));
    match split {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => {
            if key.len() >= MAX_KEY_LEN {
                bail!("Define key too long");
            }
            let key = std::str::from_utf8(key)
                .map_err(|_| anyhow!("Invalid define key (not UTF-8)"))?;
            Ok((key, value))
        }
        _ => bail!(
            "Invalid define \"{}\" (expected KEY=VALUE)",
            String::from_utf8_lossy(kv)
        ),
    }
}

/// Store a define in the namespace as a string value.
pub fn apply(ns: &mut Dict, kv: &OsStr) -> Result<()> {
    let (key, value) = parse(kv.as_encoded_bytes())?;
    namespace::set(ns, key, Value::string(value))
        .map_err(|e| anyhow!(e.error))
        .with_context(|| format!("Failed to define {key}"))
}
