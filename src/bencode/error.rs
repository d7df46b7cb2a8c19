use thiserror::Error;

use super::value::ValueKind;

/// Errors produced by the bencode recognizers and the stream decoder.
///
/// Offsets are byte positions relative to the start of the slice handed to
/// the outermost recognizer.
#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("malformed integer at offset {offset}: {reason}")]
    MalformedInteger { offset: usize, reason: &'static str },

    #[error("malformed string at offset {offset}: {reason}")]
    MalformedString { offset: usize, reason: &'static str },

    #[error("malformed list at offset {offset}: {reason}")]
    MalformedList { offset: usize, reason: &'static str },

    #[error("malformed dictionary at offset {offset}: {reason}")]
    MalformedDictionary { offset: usize, reason: &'static str },

    /// The lookahead byte does not open any bencode value.
    #[error("unexpected byte {byte:#04x} at offset {offset}")]
    MalformedValue { offset: usize, byte: u8 },

    /// More bytes are required before the value can be accepted or rejected.
    ///
    /// `needed` is a lower bound; a length prefix or terminator may reveal
    /// that further bytes are missing once these arrive.
    #[error("incomplete input: at least {needed} more byte(s) required")]
    Incomplete { needed: usize },

    /// A complete buffer ended in the middle of a value.
    #[error("unexpected end of input: at least {needed} more byte(s) required")]
    UnexpectedEof { needed: usize },

    #[error("trailing data after value at offset {offset}")]
    TrailingData { offset: usize },

    /// The destination type can never be filled from a stream.
    #[error("cannot decode a {0} from a stream")]
    UnsupportedDestination(ValueKind),

    /// The next value in the stream is not of the destination's kind.
    #[error("destination expects {expected} but the stream holds {found}")]
    DestinationMismatch {
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("integer {value} does not fit in {target}")]
    OutOfRange { value: i64, target: &'static str },

    #[error("byte string is not valid utf-8")]
    InvalidUtf8,

    /// The byte source reported end of data while a value was incomplete.
    #[error("stream ended with {buffered} byte(s) of an incomplete value buffered")]
    StreamEnded { buffered: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The closed set of failure categories behind [`BencodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedInteger,
    MalformedString,
    MalformedList,
    MalformedDictionary,
    MalformedValue,
    IncompleteInput,
    UnexpectedEof,
    TrailingData,
    /// The destination type can never be decoded; raised before any read.
    InvalidDestination,
    /// The stream holds a value of another kind than the destination.
    DestinationMismatch,
    Bind,
    StreamEnded,
    Io,
}

impl BencodeError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BencodeError::MalformedInteger { .. } => ErrorKind::MalformedInteger,
            BencodeError::MalformedString { .. } => ErrorKind::MalformedString,
            BencodeError::MalformedList { .. } => ErrorKind::MalformedList,
            BencodeError::MalformedDictionary { .. } => ErrorKind::MalformedDictionary,
            BencodeError::MalformedValue { .. } => ErrorKind::MalformedValue,
            BencodeError::Incomplete { .. } => ErrorKind::IncompleteInput,
            BencodeError::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            BencodeError::TrailingData { .. } => ErrorKind::TrailingData,
            BencodeError::UnsupportedDestination(_) => ErrorKind::InvalidDestination,
            BencodeError::DestinationMismatch { .. } => ErrorKind::DestinationMismatch,
            BencodeError::OutOfRange { .. } | BencodeError::InvalidUtf8 => ErrorKind::Bind,
            BencodeError::StreamEnded { .. } => ErrorKind::StreamEnded,
            BencodeError::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns true if the input may still become valid once more bytes arrive.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, BencodeError::Incomplete { .. })
    }

    /// Returns true for errors caused by input that violates the grammar.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MalformedInteger
                | ErrorKind::MalformedString
                | ErrorKind::MalformedList
                | ErrorKind::MalformedDictionary
                | ErrorKind::MalformedValue
        )
    }

    /// Returns the byte offset the error points at, if it carries one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            BencodeError::MalformedInteger { offset, .. }
            | BencodeError::MalformedString { offset, .. }
            | BencodeError::MalformedList { offset, .. }
            | BencodeError::MalformedDictionary { offset, .. }
            | BencodeError::MalformedValue { offset, .. }
            | BencodeError::TrailingData { offset } => Some(*offset),
            _ => None,
        }
    }

    /// Shifts the offset of a nested recognizer's error onto the enclosing slice.
    pub(crate) fn rebase(mut self, base: usize) -> Self {
        match &mut self {
            BencodeError::MalformedInteger { offset, .. }
            | BencodeError::MalformedString { offset, .. }
            | BencodeError::MalformedList { offset, .. }
            | BencodeError::MalformedDictionary { offset, .. }
            | BencodeError::MalformedValue { offset, .. }
            | BencodeError::TrailingData { offset } => *offset += base,
            _ => {}
        }
        self
    }
}
