//! Error taxonomy for encoding, decoding and on-chain queries

use alloy::primitives::{Address, Bytes};
use thiserror::Error;

/// Malformed, truncated or mistyped ABI data.
///
/// Every decode-side variant carries the byte position where the fault was
/// detected, relative to the start of the buffer being decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A read would run past the end of the buffer
    #[error("read of {len} bytes at position {position} exceeds buffer of {available} bytes")]
    OutOfBounds {
        position: usize,
        len: usize,
        available: usize,
    },

    /// An offset or length word is too large to address memory
    #[error("offset or length word at position {position} does not fit in usize")]
    WordOverflow { position: usize },

    /// Non-zero bytes in the padding of an address or narrow integer
    #[error("non-zero padding in {kind} word at position {position}")]
    DirtyPadding { position: usize, kind: &'static str },

    /// Bool word other than 0 or 1
    #[error("invalid bool word at position {position}")]
    InvalidBool { position: usize },

    /// String payload is not valid UTF-8
    #[error("invalid UTF-8 in string at position {position}")]
    InvalidUtf8 { position: usize },

    /// Offsets alias the same data so the decoded value would outgrow the input
    #[error("decoded content exceeds the {limit}-byte input at position {position}")]
    ExpansionLimit { position: usize, limit: usize },

    /// Encode side: a value does not match its type descriptor
    #[error("value does not match type `{expected}`")]
    TypeMismatch { expected: String },

    /// Encode side: integer does not fit in the declared bit width
    #[error("value does not fit in uint{bits}")]
    IntegerOverflow { bits: usize },
}

/// A decoded value did not have the shape of the agreement schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a {expected}")]
    WrongKind {
        field: &'static str,
        expected: &'static str,
    },
}

/// Failure reported by the RPC collaborator for a single `eth_call`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The contract reverted; carries the raw revert payload
    #[error("execution reverted (data: 0x{})", hex::encode(.0))]
    Revert(Bytes),

    /// The endpoint could not be reached or returned a non-revert error
    #[error("transport error: {0}")]
    Transport(String),
}

impl CallError {
    /// Raw revert payload, if this was a contract-level revert
    pub fn revert_data(&self) -> Option<&[u8]> {
        match self {
            CallError::Revert(data) => Some(data.as_ref()),
            CallError::Transport(_) => None,
        }
    }
}

/// Failure of a registry or direct agreement query
#[derive(Debug, Error)]
pub enum QueryError {
    /// Caller-supplied address is malformed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Registry lookup reverted with something other than `NoAgreement()`,
    /// or the transport failed
    #[error("registry call to {registry} failed: {source}")]
    RegistryCallFailed {
        registry: Address,
        #[source]
        source: CallError,
    },

    /// `getDetails()` could not be called on the agreement
    #[error("getDetails() call to {agreement} failed: {source}")]
    DetailsCallFailed {
        agreement: Address,
        #[source]
        source: CallError,
    },

    #[error("failed to decode call result: {0}")]
    Codec(#[from] CodecError),

    #[error("unexpected agreement layout: {0}")]
    Projection(#[from] ProjectionError),
}
