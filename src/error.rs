//! Shared error types for the codec and the programmatic API.
//!
//! Mirrors the hand-rolled `Display` + `std::error::Error` convention used
//! throughout this crate's bitstream-reading lineage rather than pulling in
//! an error-derive crate: every variant carries the structured data a caller
//! needs (byte offset, function index, op index) instead of a pre-rendered
//! sentence.

use std::{error, fmt};

/// What kind of pool or table an out-of-range index pointed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Int,
    Int64,
    Float,
    String,
    Bytes,
    DebugFile,
    Type,
    Global,
    Native,
    Function,
    Reg,
    Field,
    Constant,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int pool",
            Self::Int64 => "int64 pool",
            Self::Float => "float pool",
            Self::String => "string pool",
            Self::Bytes => "bytes pool",
            Self::DebugFile => "debug file pool",
            Self::Type => "type table",
            Self::Global => "global table",
            Self::Native => "native table",
            Self::Function => "function table",
            Self::Reg => "register list",
            Self::Field => "field list",
            Self::Constant => "constant table",
        })
    }
}

/// Errors raised while reading or writing the binary module format.
#[derive(Debug, Clone)]
pub enum DecodeError {
    /// Truncated input, bad magic, unknown version, malformed varint.
    MalformedInput { offset: usize, reason: &'static str },
    /// A pool index (or jump offset) fell outside the valid range.
    InvalidReference {
        kind: RefKind,
        index: i64,
        limit: usize,
    },
    /// An opcode tag is not recognized, or isn't available at this module version.
    UnsupportedOpcode { tag: u8, offset: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput { offset, reason } => {
                write!(f, "malformed input at byte {offset}: {reason}")
            }
            Self::InvalidReference { kind, index, limit } => {
                write!(f, "invalid {kind} reference {index} (have {limit} entries)")
            }
            Self::UnsupportedOpcode { tag, offset } => {
                write!(f, "unsupported opcode tag {tag} at op {offset}")
            }
        }
    }
}

impl error::Error for DecodeError {}

/// Errors raised by the findex-taking entry points (`cfg_of`, `ir_of`, ...).
#[derive(Debug, Clone)]
pub enum CoreError {
    Decode(DecodeError),
    /// `findex` does not name any function in the module.
    InvalidFunctionIndex(u32),
    /// A jump or trap offset pointed outside the function's op list.
    InvalidReference {
        findex: u32,
        op_index: usize,
        detail: &'static str,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(err) => err.fmt(f),
            Self::InvalidFunctionIndex(findex) => write!(f, "no function with index {findex}"),
            Self::InvalidReference {
                findex,
                op_index,
                detail,
            } => write!(f, "fn@{findex} op {op_index}: {detail}"),
        }
    }
}

impl error::Error for CoreError {}

impl From<DecodeError> for CoreError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type CoreResult<T> = Result<T, CoreError>;
