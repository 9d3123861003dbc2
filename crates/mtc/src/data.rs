/*
 * data.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Namespace values loaded from JSON or YAML files.

use std::path::Path;

use anyhow::{Context, Result, bail};
use mobject::{Dict, Value};
use tracing::debug;

/// Parse a data document. Files ending in `.yaml` or `.yml` are YAML,
/// everything else is JSON.
fn parse(path: &Path, text: &str) -> Result<serde_json::Value> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        Ok(serde_yaml::from_str(text)?)
    } else {
        Ok(serde_json::from_str(text)?)
    }
}

/// Place every top-level entry of the document at `path` into `ns`,
/// replacing existing entries of the same name.
pub fn load(ns: &mut Dict, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    let document = parse(path, &text)
        .with_context(|| format!("Failed to parse data file {}", path.display()))?;

    let serde_json::Value::Object(entries) = document else {
        bail!("Data file {} must contain an object", path.display());
    };
    debug!(path = %path.display(), entries = entries.len(), "loading data file");

    for (key, value) in entries {
        let value = Value::try_from(value)
            .with_context(|| format!("Unsupported value for \"{key}\" in {}", path.display()))?;
        ns.replace(key, value);
    }
    Ok(())
}
