//! # Operand widths and writer expressions
//!
//! Every runtime operand is written at one of two wire widths. The value a
//! build-time instruction puts on the wire comes from a writer expression,
//! kept positionally aligned with the runtime operand list.
//!
//! Writer expressions are lexed into three shapes:
//!
//! ```text
//! arg0  | *arg0          passthrough of builder operand 0
//! arg1 as u8             narrowing cast of builder operand 1
//! b.offset(arg0) as u16  anything else, kept verbatim
//! ```

use logos::Logos;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire width of one runtime operand
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandWidth {
    /// One byte
    U8,
    /// Two bytes, little endian
    U16,
}

impl OperandWidth {
    /// Size on the wire in bytes
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            OperandWidth::U8 => 1,
            OperandWidth::U16 => 2,
        }
    }

    /// Rust type name used by generated code
    #[inline]
    pub const fn rust_type(self) -> &'static str {
        match self {
            OperandWidth::U8 => "u8",
            OperandWidth::U16 => "u16",
        }
    }

    /// Largest value representable at this width
    #[inline]
    pub const fn max_value(self) -> u64 {
        match self {
            OperandWidth::U8 => u8::MAX as u64,
            OperandWidth::U16 => u16::MAX as u64,
        }
    }

    /// Name of the `Bytecode` reader method
    pub const fn reader(self) -> &'static str {
        match self {
            OperandWidth::U8 => "read_u8",
            OperandWidth::U16 => "read_u16",
        }
    }

    /// Name of the `Bytecode` writer method
    pub const fn writer(self) -> &'static str {
        match self {
            OperandWidth::U8 => "write_u8",
            OperandWidth::U16 => "write_u16",
        }
    }
}

impl fmt::Display for OperandWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rust_type())
    }
}

/// Value-producing expression for one runtime operand
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperandWriter {
    /// Builder operand `index` written unchanged
    Arg(usize),
    /// Builder operand `index` narrowed with `as`
    Cast { index: usize, width: OperandWidth },
    /// Foreign snippet, emitted verbatim
    Opaque(String),
}

/// Tokens of a writer expression
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum WriterToken {
    #[token("*")]
    Deref,

    #[token("as")]
    As,

    /// Positional builder operand (arg0, arg1, ...)
    #[regex(r"arg[0-9]+", |lex| lex.slice()[3..].parse::<usize>().ok())]
    Arg(usize),

    #[token("u8", |_| OperandWidth::U8)]
    #[token("u16", |_| OperandWidth::U16)]
    Width(OperandWidth),
}

impl OperandWriter {
    /// Parse a writer expression; anything unrecognized becomes [`OperandWriter::Opaque`]
    pub fn parse(source: &str) -> Self {
        Self::parse_typed(source).unwrap_or_else(|| OperandWriter::Opaque(source.trim().to_string()))
    }

    fn parse_typed(source: &str) -> Option<Self> {
        let tokens: Vec<WriterToken> = WriterToken::lexer(source)
            .collect::<std::result::Result<_, _>>()
            .ok()?;

        let rest = match tokens.as_slice() {
            [WriterToken::Deref, rest @ ..] => rest,
            rest => rest,
        };

        match rest {
            [WriterToken::Arg(index)] => Some(OperandWriter::Arg(*index)),
            [WriterToken::Arg(index), WriterToken::As, WriterToken::Width(width)] => {
                Some(OperandWriter::Cast {
                    index: *index,
                    width: *width,
                })
            }
            _ => None,
        }
    }

    /// Builder operand this writer reads, if it is a typed form
    pub fn arg_index(&self) -> Option<usize> {
        match self {
            OperandWriter::Arg(index) | OperandWriter::Cast { index, .. } => Some(*index),
            OperandWriter::Opaque(_) => None,
        }
    }

    /// Check if this writer is a foreign snippet
    pub fn is_opaque(&self) -> bool {
        matches!(self, OperandWriter::Opaque(_))
    }
}

/// Renders the Rust expression used by the generated `write` method.
///
/// Match arms bind builder operands by reference, so typed forms dereference.
impl fmt::Display for OperandWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandWriter::Arg(index) => write!(f, "*arg{}", index),
            OperandWriter::Cast { index, width } => write!(f, "*arg{} as {}", index, width),
            OperandWriter::Opaque(source) => write!(f, "{}", source),
        }
    }
}

impl<'de> Deserialize<'de> for OperandWriter {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let source = String::deserialize(deserializer)?;
        Ok(OperandWriter::parse(&source))
    }
}
