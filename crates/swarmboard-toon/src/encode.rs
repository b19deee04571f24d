//! Value → TOON text

use crate::options::{Delimiter, EncodeOptions};
use crate::syntax::{format_key, needs_quotes, quote, INDENT};
use serde_json::{Map, Number, Value};

/// Encode a value with default options (comma delimiter)
pub fn encode(value: &Value) -> String {
    encode_with(value, &EncodeOptions::default())
}

/// Encode a value with explicit options
///
/// Never fails: every `serde_json::Value` has a TOON rendering.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use swarmboard_toon::{encode_with, EncodeOptions};
///
/// let text = encode_with(&json!({"tags": ["a", "b"]}), &EncodeOptions::pipe());
/// assert_eq!(text, "tags[2|]: a|b");
/// ```
pub fn encode_with(value: &Value, options: &EncodeOptions) -> String {
    let mut writer = Writer {
        delimiter: options.delimiter,
        lines: Vec::new(),
    };
    match value {
        Value::Object(map) => writer.write_fields(map, 0),
        Value::Array(items) => writer.write_array("", items, 0),
        scalar => writer.push(0, format_scalar(scalar)),
    }
    writer.lines.join("\n")
}

struct Writer {
    delimiter: Delimiter,
    lines: Vec<String>,
}

impl Writer {
    fn push(&mut self, depth: usize, content: String) {
        let mut line = " ".repeat(depth * INDENT);
        line.push_str(&content);
        self.lines.push(line);
    }

    fn write_fields(&mut self, map: &Map<String, Value>, depth: usize) {
        for (key, value) in map {
            let key = format_key(key);
            match value {
                Value::Object(inner) => {
                    self.push(depth, format!("{}:", key));
                    self.write_fields(inner, depth + 1);
                }
                Value::Array(items) => self.write_array(&key, items, depth),
                scalar => self.push(depth, format!("{}: {}", key, format_scalar(scalar))),
            }
        }
    }

    /// Write an array header at `depth`; rows and items go one level deeper
    fn write_array(&mut self, prefix: &str, items: &[Value], depth: usize) {
        let marker = self.delimiter.header_marker();
        let delimiter = self.delimiter.as_char().to_string();
        let len = items.len();

        if items.is_empty() {
            self.push(depth, format!("{}[0{}]:", prefix, marker));
            return;
        }

        if items.iter().all(is_scalar) {
            let row = items
                .iter()
                .map(format_scalar)
                .collect::<Vec<_>>()
                .join(&delimiter);
            self.push(depth, format!("{}[{}{}]: {}", prefix, len, marker, row));
            return;
        }

        if let Some(fields) = tabular_fields(items) {
            let header = fields
                .iter()
                .map(|f| format_key(f))
                .collect::<Vec<_>>()
                .join(&delimiter);
            self.push(depth, format!("{}[{}{}]{{{}}}:", prefix, len, marker, header));
            for item in items {
                if let Value::Object(row) = item {
                    let cells = fields
                        .iter()
                        .map(|f| row.get(f.as_str()).map(format_scalar).unwrap_or_default())
                        .collect::<Vec<_>>()
                        .join(&delimiter);
                    self.push(depth + 1, cells);
                }
            }
            return;
        }

        self.push(depth, format!("{}[{}{}]:", prefix, len, marker));
        for item in items {
            match item {
                Value::Object(map) => {
                    self.push(depth + 1, "-".to_string());
                    self.write_fields(map, depth + 2);
                }
                Value::Array(inner) => self.write_array("- ", inner, depth + 1),
                scalar => self.push(depth + 1, format!("- {}", format_scalar(scalar))),
            }
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Field names when `items` is a uniform list of flat objects
fn tabular_fields(items: &[Value]) -> Option<Vec<String>> {
    let first = items.first()?.as_object()?;
    if first.is_empty() {
        return None;
    }
    let fields: Vec<String> = first.keys().cloned().collect();

    for item in items {
        let object = item.as_object()?;
        if object.len() != fields.len() {
            return None;
        }
        for field in &fields {
            match object.get(field) {
                Some(value) if is_scalar(value) => {}
                _ => return None,
            }
        }
    }
    Some(fields)
}

/// Render a scalar token; callers only pass scalars
fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => {
            if needs_quotes(s) {
                quote(s)
            } else {
                s.clone()
            }
        }
        nested => quote(&nested.to_string()),
    }
}

/// Integers print plainly; floats always carry `.` or an exponent
fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        // Debug formatting is the shortest representation that parses back
        // to the same f64 and always includes `.` or `e`.
        format!("{:?}", n.as_f64().unwrap_or(0.0))
    }
}
