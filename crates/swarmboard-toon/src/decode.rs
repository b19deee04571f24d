//! TOON text → value

use crate::error::DecodeError;
use crate::options::Delimiter;
use crate::syntax::{
    find_unquoted, is_bare_key, is_key_char, needs_quotes, parse_quoted, split_delimited, INDENT,
};
use serde_json::{Map, Number, Value};

/// Decode TOON text back into a value
///
/// Exact inverse of [`encode`](crate::encode): `decode(&encode(&v)) == Ok(v)`
/// for every value. Input that the encoder could not have produced is
/// rejected rather than guessed at.
///
/// # Errors
///
/// - [`DecodeError::MalformedStructure`] for bad indentation, wrong row or
///   item counts, duplicate keys and unterminated strings
/// - [`DecodeError::UnexpectedToken`] for tokens invalid in their position
/// - [`DecodeError::Escape`] for invalid escape sequences
pub fn decode(input: &str) -> Result<Value, DecodeError> {
    let lines = scan_lines(input)?;
    let Some(first) = lines.first() else {
        return Ok(Value::Object(Map::new()));
    };
    if first.depth != 0 {
        return Err(DecodeError::malformed(first.number, "document must start unindented"));
    }

    let first = *first;
    let mut parser = Parser { lines, pos: 0 };

    let value = if first.content.starts_with('[') {
        parser.pos = 1;
        parser.parse_array(first.content, 0, first.number)?
    } else if split_key(first.content, first.number)?.is_some() {
        Value::Object(parser.parse_object(0)?)
    } else {
        parser.pos = 1;
        parse_scalar(first.content, first.number)?
    };

    if let Some(extra) = parser.peek() {
        return Err(DecodeError::malformed(extra.number, "unexpected content after value"));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    depth: usize,
    content: &'a str,
}

fn scan_lines(input: &str) -> Result<Vec<Line<'_>>, DecodeError> {
    let mut lines = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let number = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let content = raw.trim_start_matches(' ');
        let spaces = raw.len() - content.len();
        if content.starts_with('\t') {
            return Err(DecodeError::malformed(number, "tabs are not allowed in indentation"));
        }
        if spaces % INDENT != 0 {
            return Err(DecodeError::malformed(
                number,
                format!("indentation of {} spaces is not a multiple of {}", spaces, INDENT),
            ));
        }
        lines.push(Line {
            number,
            depth: spaces / INDENT,
            content,
        });
    }
    Ok(lines)
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn next_at(&mut self, depth: usize, after: usize, what: &str) -> Result<Line<'a>, DecodeError> {
        match self.peek() {
            Some(line) if line.depth == depth => {
                self.pos += 1;
                Ok(line)
            }
            Some(line) => Err(DecodeError::malformed(line.number, format!("expected {}", what))),
            None => Err(DecodeError::malformed(after, format!("missing {}", what))),
        }
    }

    /// Whether the next line opens a block one level below `depth`
    fn has_child_block(&self, depth: usize) -> bool {
        self.peek().is_some_and(|line| line.depth == depth + 1)
    }

    fn parse_object(&mut self, depth: usize) -> Result<Map<String, Value>, DecodeError> {
        let mut map = Map::new();
        while let Some(line) = self.peek() {
            if line.depth < depth {
                break;
            }
            if line.depth > depth {
                return Err(DecodeError::malformed(line.number, "unexpected indentation"));
            }
            self.pos += 1;

            let (key, rest) = split_key(line.content, line.number)?
                .ok_or_else(|| DecodeError::unexpected(line.number, "expected `key:`"))?;
            let value = self.parse_field_value(rest, depth, line.number)?;
            if map.contains_key(&key) {
                return Err(DecodeError::malformed(line.number, format!("duplicate key `{}`", key)));
            }
            map.insert(key, value);
        }
        Ok(map)
    }

    fn parse_field_value(&mut self, rest: &'a str, depth: usize, number: usize) -> Result<Value, DecodeError> {
        if rest.starts_with('[') {
            return self.parse_array(rest, depth, number);
        }
        let after = rest
            .strip_prefix(':')
            .ok_or_else(|| DecodeError::unexpected(number, "expected `:` after key"))?;
        if after.is_empty() {
            if self.has_child_block(depth) {
                return Ok(Value::Object(self.parse_object(depth + 1)?));
            }
            return Ok(Value::Object(Map::new()));
        }
        let token = after
            .strip_prefix(' ')
            .ok_or_else(|| DecodeError::unexpected(number, "expected a space after `:`"))?;
        parse_scalar(token, number)
    }

    /// Parse an array whose header is `header`, at `depth`
    fn parse_array(&mut self, header: &'a str, depth: usize, number: usize) -> Result<Value, DecodeError> {
        let close = header
            .find(']')
            .ok_or_else(|| DecodeError::unexpected(number, "unterminated array length"))?;
        let inner = &header[1..close];
        let (len_text, delimiter) = match inner.strip_suffix('|') {
            Some(len) => (len, Delimiter::Pipe),
            None => (inner, Delimiter::Comma),
        };
        let len: usize = len_text
            .parse()
            .map_err(|_| DecodeError::unexpected(number, format!("invalid array length `{}`", len_text)))?;
        let delim = delimiter.as_char();

        let mut rest = &header[close + 1..];
        let mut fields = None;
        if rest.starts_with('{') {
            let end = find_unquoted(rest, '}')
                .ok_or_else(|| DecodeError::unexpected(number, "unterminated field list"))?;
            let names = split_delimited(&rest[1..end], delim, number)?
                .into_iter()
                .map(|name| parse_key_token(name, number))
                .collect::<Result<Vec<_>, _>>()?;
            fields = Some(names);
            rest = &rest[end + 1..];
        }

        let after = rest
            .strip_prefix(':')
            .ok_or_else(|| DecodeError::unexpected(number, "expected `:` after array header"))?;

        if let Some(fields) = fields {
            if !after.is_empty() {
                return Err(DecodeError::unexpected(number, "tabular header must end the line"));
            }
            let mut rows = Vec::with_capacity(len);
            for _ in 0..len {
                let line = self.next_at(depth + 1, number, &format!("{} tabular rows", len))?;
                let cells = split_delimited(line.content, delim, line.number)?;
                if cells.len() != fields.len() {
                    return Err(DecodeError::malformed(
                        line.number,
                        format!("row has {} values, header declares {}", cells.len(), fields.len()),
                    ));
                }
                let mut row = Map::new();
                for (field, cell) in fields.iter().zip(cells) {
                    row.insert(field.clone(), parse_scalar(cell, line.number)?);
                }
                rows.push(Value::Object(row));
            }
            return Ok(Value::Array(rows));
        }

        if !after.is_empty() {
            let values = after
                .strip_prefix(' ')
                .ok_or_else(|| DecodeError::unexpected(number, "expected a space after `:`"))?;
            let cells = split_delimited(values, delim, number)?;
            if len == 0 || cells.len() != len {
                return Err(DecodeError::malformed(
                    number,
                    format!("array declares {} values, found {}", len, cells.len()),
                ));
            }
            return cells
                .into_iter()
                .map(|cell| parse_scalar(cell, number))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array);
        }

        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.parse_list_item(depth + 1, number, len)?);
        }
        Ok(Value::Array(items))
    }

    fn parse_list_item(&mut self, depth: usize, header_line: usize, len: usize) -> Result<Value, DecodeError> {
        let line = self.next_at(depth, header_line, &format!("{} list items", len))?;
        if line.content == "-" {
            if self.has_child_block(depth) {
                return Ok(Value::Object(self.parse_object(depth + 1)?));
            }
            return Ok(Value::Object(Map::new()));
        }
        let rest = line
            .content
            .strip_prefix("- ")
            .ok_or_else(|| DecodeError::unexpected(line.number, "expected `-` list item"))?;
        if rest.starts_with('[') {
            return self.parse_array(rest, depth, line.number);
        }
        parse_scalar(rest, line.number)
    }
}

/// Split `key:` / `key[` at the start of a line
///
/// Returns `None` when the line is not a key line (e.g. a root scalar).
fn split_key(content: &str, number: usize) -> Result<Option<(String, &str)>, DecodeError> {
    let (key, end) = if content.starts_with('"') {
        parse_quoted(content, number)?
    } else {
        let end = content
            .char_indices()
            .find(|(_, c)| !is_key_char(*c))
            .map(|(idx, _)| idx)
            .unwrap_or(content.len());
        let key = &content[..end];
        if !is_bare_key(key) {
            return Ok(None);
        }
        (key.to_string(), end)
    };

    let rest = &content[end..];
    if rest.starts_with(':') || rest.starts_with('[') {
        Ok(Some((key, rest)))
    } else {
        Ok(None)
    }
}

fn parse_key_token(token: &str, number: usize) -> Result<String, DecodeError> {
    if token.starts_with('"') {
        let (key, end) = parse_quoted(token, number)?;
        if end != token.len() {
            return Err(DecodeError::unexpected(number, "characters after quoted field name"));
        }
        return Ok(key);
    }
    if is_bare_key(token) {
        Ok(token.to_string())
    } else {
        Err(DecodeError::unexpected(number, format!("invalid field name `{}`", token)))
    }
}

fn parse_scalar(token: &str, number: usize) -> Result<Value, DecodeError> {
    if token.starts_with('"') {
        let (s, end) = parse_quoted(token, number)?;
        if end != token.len() {
            return Err(DecodeError::unexpected(number, "characters after quoted string"));
        }
        return Ok(Value::String(s));
    }

    match token {
        "null" => return Ok(Value::Null),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }

    let starts_numeric = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-');
    if starts_numeric {
        return parse_number(token)
            .map(Value::Number)
            .ok_or_else(|| DecodeError::unexpected(number, format!("invalid number `{}`", token)));
    }

    if needs_quotes(token) {
        return Err(DecodeError::unexpected(
            number,
            format!("`{}` must be quoted", token),
        ));
    }
    Ok(Value::String(token.to_string()))
}

fn parse_number(token: &str) -> Option<Number> {
    if token.contains(['.', 'e', 'E']) {
        return token.parse::<f64>().ok().and_then(Number::from_f64);
    }
    if let Ok(i) = token.parse::<i64>() {
        return Some(Number::from(i));
    }
    token.parse::<u64>().ok().map(Number::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, encode_with, EncodeOptions};
    use serde_json::json;

    fn assert_round_trip(value: Value) {
        let text = encode(&value);
        assert_eq!(decode(&text).unwrap(), value, "round trip failed for:\n{}", text);
    }

    #[test]
    fn test_empty_document_is_empty_object() {
        assert_eq!(decode("").unwrap(), json!({}));
        assert_eq!(decode("\n\n").unwrap(), json!({}));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decode("null").unwrap(), json!(null));
        assert_eq!(decode("false").unwrap(), json!(false));
        assert_eq!(decode("17").unwrap(), json!(17));
        assert_eq!(decode("-3").unwrap(), json!(-3));
        assert_eq!(decode("2.0").unwrap(), json!(2.0));
        assert_eq!(decode("hello world").unwrap(), json!("hello world"));
        assert_eq!(decode(r#""a: b""#).unwrap(), json!("a: b"));
    }

    #[test]
    fn test_integer_and_float_stay_distinct() {
        let int = decode("5").unwrap();
        let float = decode("5.0").unwrap();
        assert!(int.is_i64());
        assert!(float.is_f64());
        assert_ne!(int, float);
    }

    #[test]
    fn test_u64_beyond_i64() {
        assert_round_trip(json!(u64::MAX));
    }

    #[test]
    fn test_round_trip_structures() {
        assert_round_trip(json!({}));
        assert_round_trip(json!([]));
        assert_round_trip(json!({"a": {}, "b": [], "c": {"d": {}}}));
        assert_round_trip(json!({"reviews": [
            {"id": 1, "text": "Great, really", "stars": 5},
            {"id": 2, "text": "Meh | ok", "stars": 3}
        ]}));
        assert_round_trip(json!([{"a": 1}, {"b": [1, {"c": null}]}, "x", [], [[]]]));
        assert_round_trip(json!([{}, {}]));
        assert_round_trip(json!({"s": "quote \" slash \\ newline \n tab \t", "k": "-"}));
        assert_round_trip(json!({"weird key: yes": {"[x]": [1.5, -0.25, 1e300]}}));
    }

    #[test]
    fn test_pipe_round_trip() {
        let value = json!({"rows": [{"a": "x,y", "b": "p|q"}, {"a": "", "b": "z"}]});
        let text = encode_with(&value, &EncodeOptions::pipe());
        assert_eq!(decode(&text).unwrap(), value);
    }

    #[test]
    fn test_bad_indentation() {
        let err = decode("a:\n   b: 1").unwrap_err();
        assert_eq!(err.kind(), "malformed_structure");
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_row_count_mismatch() {
        let err = decode("rows[3]{a}:\n  1\n  2").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedStructure { .. }));
    }

    #[test]
    fn test_row_width_mismatch() {
        let err = decode("rows[1]{a,b}:\n  1").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedStructure { line: 2, .. }));
    }

    #[test]
    fn test_inline_count_mismatch() {
        assert!(matches!(decode("xs[2]: 1,2,3"), Err(DecodeError::MalformedStructure { .. })));
    }

    #[test]
    fn test_unexpected_tokens() {
        assert!(matches!(decode("n: 12abc"), Err(DecodeError::UnexpectedToken { .. })));
        assert!(matches!(decode("n: a:b"), Err(DecodeError::UnexpectedToken { .. })));
        assert!(matches!(decode("xs[two]: 1"), Err(DecodeError::UnexpectedToken { .. })));
        assert!(matches!(decode("k:v"), Err(DecodeError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_bad_escape() {
        let err = decode(r#"k: "bad \x escape""#).unwrap_err();
        assert_eq!(err.kind(), "escape_error");
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(decode(r#"k: "open"#), Err(DecodeError::MalformedStructure { .. })));
    }

    #[test]
    fn test_duplicate_key() {
        assert!(matches!(decode("a: 1\na: 2"), Err(DecodeError::MalformedStructure { line: 2, .. })));
    }

    #[test]
    fn test_trailing_content_after_root_scalar() {
        assert!(matches!(decode("hello\nworld"), Err(DecodeError::MalformedStructure { line: 2, .. })));
    }

    #[test]
    fn test_stray_indented_line() {
        assert!(matches!(decode("a: 1\n  b: 2"), Err(DecodeError::MalformedStructure { line: 2, .. })));
    }
}
