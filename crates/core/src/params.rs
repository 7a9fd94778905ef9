// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notebook parameters.
//!
//! Parameters travel to the job as a JSON object inside its environment,
//! and come back from a job description in that serialized form.

use indexmap::IndexMap;
use serde_json::Value;

/// Ordered parameter mapping passed to the notebook.
pub type Parameters = IndexMap<String, Value>;

/// Parse a `name=value` argument.
///
/// The value is read as JSON when it parses (`x=5` is a number, `flag=true`
/// a bool) and kept as a plain string otherwise.
pub fn parse_param(arg: &str) -> Result<(String, Value), String> {
    let mut parts = arg.split('=');
    let (Some(name), Some(raw), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!(
            "parameter \"{arg}\" is not in the form \"parameter=value\""
        ));
    };
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}

/// Collect repeated `name=value` arguments into a parameter mapping.
pub fn parse_params<'a>(args: impl IntoIterator<Item = &'a str>) -> Result<Parameters, String> {
    args.into_iter().map(parse_param).collect()
}

/// Decode serialized parameters into `name=value` strings.
///
/// Returns an empty list when the text is empty or not a JSON object.
pub fn param_pairs(serialized: &str) -> Vec<String> {
    match serde_json::from_str::<IndexMap<String, Value>>(serialized) {
        Ok(map) => map
            .iter()
            .map(|(name, value)| format!("{name}={}", display_value(value)))
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Render serialized parameters on one line: `a=1, b=text`.
pub fn expand_params(serialized: &str) -> String {
    param_pairs(serialized).join(", ")
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
