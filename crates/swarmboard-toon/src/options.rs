//! Encoder options

use serde::{Deserialize, Serialize};

/// Separator between values of inline arrays and tabular rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// `,` (default, not marked in headers)
    #[default]
    Comma,
    /// `|`, announced in headers as `[N|]`
    Pipe,
}

impl Delimiter {
    /// The delimiter character
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Pipe => '|',
        }
    }

    /// Marker written inside array headers
    pub(crate) fn header_marker(&self) -> &'static str {
        match self {
            Delimiter::Comma => "",
            Delimiter::Pipe => "|",
        }
    }
}

/// Options controlling how values are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Delimiter for inline arrays and tabular rows
    pub delimiter: Delimiter,
}

impl EncodeOptions {
    /// Options using the pipe delimiter
    pub fn pipe() -> Self {
        Self {
            delimiter: Delimiter::Pipe,
        }
    }
}
