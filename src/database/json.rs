//! Lenient JSON codec for descriptor and profile files
//!
//! Files on the remote host and in installed databases are hand-edited, so
//! reading accepts trailing commas and matches keys case-insensitively.
//! Records declare their deserialize names in lowercase (see
//! [`crate::database::types`]).

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Parse `text` into `T`, tolerating trailing commas and key casing.
pub fn from_str<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    let value: Value = serde_json::from_str(&strip_trailing_commas(text))?;
    serde_json::from_value(lowercase_keys(value))
}

/// Serialize `value` the way database files are written.
pub fn to_string_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), lowercase_keys(value)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Drop commas that directly precede `}` or `]`, ignoring string contents.
fn strip_trailing_commas(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (index, c) in text.char_indices() {
        if in_string {
            output.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                output.push(c);
            }
            ',' => {
                let next = text[index + 1..].trim_start().chars().next();
                if !matches!(next, Some('}') | Some(']')) {
                    output.push(c);
                }
            }
            _ => output.push(c),
        }
    }

    output
}
