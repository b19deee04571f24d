//! Lexical rules shared by the encoder and decoder

use crate::error::DecodeError;

/// Spaces per nesting level
pub(crate) const INDENT: usize = 2;

/// Characters that force a string to be quoted
const STRUCTURAL: &[char] = &[':', ',', '|', '"', '\\', '[', ']', '{', '}', '#'];

/// Whether a string must be quoted to survive a round trip
pub(crate) fn needs_quotes(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    if s.trim() != s {
        return true;
    }
    if matches!(s, "true" | "false" | "null") {
        return true;
    }
    if first.is_ascii_digit() || matches!(first, '-' | '+' | '.') {
        return true;
    }
    s.chars().any(|c| STRUCTURAL.contains(&c) || c.is_control())
}

/// Quote and escape a string
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Whether a key can be written without quotes
pub(crate) fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(is_key_char)
}

pub(crate) fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Render a key, quoting it when needed
pub(crate) fn format_key(key: &str) -> String {
    if is_bare_key(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Parse a quoted string at the start of `s`
///
/// Returns the unescaped string and the byte offset just past the closing quote.
pub(crate) fn parse_quoted(s: &str, line: usize) -> Result<(String, usize), DecodeError> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, '"')) => {}
        _ => return Err(DecodeError::unexpected(line, "expected opening quote")),
    }

    let mut out = String::new();
    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Ok((out, idx + 1)),
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    return Err(DecodeError::escape(line, "dangling backslash"));
                };
                match escaped {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'u' => {
                        let mut hex = String::with_capacity(4);
                        for _ in 0..4 {
                            match chars.next() {
                                Some((_, h)) if h.is_ascii_hexdigit() => hex.push(h),
                                _ => {
                                    return Err(DecodeError::escape(
                                        line,
                                        "\\u escape needs four hex digits",
                                    ))
                                }
                            }
                        }
                        let code = u32::from_str_radix(&hex, 16)
                            .map_err(|e| DecodeError::escape(line, e.to_string()))?;
                        let decoded = char::from_u32(code).ok_or_else(|| {
                            DecodeError::escape(line, format!("\\u{} is not a valid character", hex))
                        })?;
                        out.push(decoded);
                    }
                    other => {
                        return Err(DecodeError::escape(
                            line,
                            format!("unknown escape sequence \\{}", other),
                        ))
                    }
                }
            }
            c => out.push(c),
        }
    }

    Err(DecodeError::malformed(line, "unterminated quoted string"))
}

/// Split `s` on `delimiter`, ignoring delimiters inside quoted strings
pub(crate) fn split_delimited(s: &str, delimiter: char, line: usize) -> Result<Vec<&str>, DecodeError> {
    let mut cells = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (idx, c) in s.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            cells.push(&s[start..idx]);
            start = idx + c.len_utf8();
        }
    }

    if in_quotes {
        return Err(DecodeError::malformed(line, "unterminated quoted string"));
    }
    cells.push(&s[start..]);
    Ok(cells)
}

/// Find the first occurrence of `target` outside quoted strings
pub(crate) fn find_unquoted(s: &str, target: char) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, c) in s.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        if c == '"' {
            in_quotes = true;
        } else if c == target {
            return Some(idx);
        }
    }
    None
}
