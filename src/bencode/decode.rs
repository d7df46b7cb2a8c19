use bytes::Bytes;
use indexmap::IndexMap;

use super::error::BencodeError;
use super::lookahead::{lookahead, Lookahead};
use super::value::{Value, ValueKind};

/// Decodes a complete buffer holding exactly one bencode value.
///
/// Unlike the recognizers, a truncated buffer is final here and reported as
/// [`BencodeError::UnexpectedEof`]; bytes after the value are rejected with
/// [`BencodeError::TrailingData`].
///
/// # Examples
///
/// ```
/// use bencode_stream::bencode::{decode, Value};
///
/// assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
/// assert!(decode(b"i42eextra").is_err());
/// ```
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    let (value, consumed) = parse_value(data).map_err(|e| match e {
        BencodeError::Incomplete { needed } => BencodeError::UnexpectedEof { needed },
        e => e,
    })?;

    if consumed != data.len() {
        return Err(BencodeError::TrailingData { offset: consumed });
    }

    Ok(value)
}

/// Parses whichever value `input` begins with, returning it and the number of
/// bytes it occupies.
///
/// The first byte picks the recognizer (see [`lookahead`]). A leading `e` is
/// [`BencodeError::MalformedValue`]: a terminator is only meaningful inside a
/// list or dictionary.
pub fn parse_value(input: &[u8]) -> Result<(Value, usize), BencodeError> {
    let Some(&byte) = input.first() else {
        return Err(BencodeError::Incomplete { needed: 1 });
    };

    match lookahead(byte)? {
        Lookahead::Value(kind) => parse_kind(kind, input),
        Lookahead::End => Err(BencodeError::MalformedValue { offset: 0, byte }),
    }
}

/// Parses an integer of the form `i<digits>e`.
///
/// Returns the integer and the number of bytes consumed, which includes the
/// closing `e`. Leading zeros and `-0` are accepted and decode to the same
/// number as their canonical form.
///
/// # Errors
///
/// - [`BencodeError::Incomplete`] if `input` is empty or no `e` is present yet.
/// - [`BencodeError::MalformedInteger`] if `input` does not start with `i`, or
///   the bytes before the `e` are not an optionally negative decimal that
///   fits in an `i64`.
///
/// # Examples
///
/// ```
/// use bencode_stream::bencode::parse_integer;
///
/// assert_eq!(parse_integer(b"i-42e4:spam").unwrap(), (-42, 5));
/// assert!(parse_integer(b"i42").unwrap_err().is_incomplete());
/// ```
pub fn parse_integer(input: &[u8]) -> Result<(i64, usize), BencodeError> {
    match input.first() {
        None => return Err(BencodeError::Incomplete { needed: 1 }),
        Some(b'i') => {}
        Some(_) => {
            return Err(BencodeError::MalformedInteger {
                offset: 0,
                reason: "expected 'i'",
            })
        }
    }

    let Some(end) = input[1..].iter().position(|&b| b == b'e').map(|pos| pos + 1) else {
        return Err(BencodeError::Incomplete { needed: 1 });
    };

    let value = parse_signed(&input[1..end])
        .map_err(|reason| BencodeError::MalformedInteger { offset: 1, reason })?;

    Ok((value, end + 1))
}

fn parse_signed(span: &[u8]) -> Result<i64, &'static str> {
    let digits = span.strip_prefix(b"-").unwrap_or(span);
    if digits.is_empty() {
        return Err("no digits");
    }
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err("not a decimal number");
    }

    std::str::from_utf8(span)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or("out of range for i64")
}

/// Parses a byte string of the form `<length>:<payload>`.
///
/// The payload is returned verbatim; it may contain any byte, including
/// bencode delimiters. The consumed count covers the length digits, the `:`
/// and the payload.
///
/// # Errors
///
/// - [`BencodeError::MalformedString`] if the first byte is not a digit (a `-`
///   length is rejected), if a non-digit appears before the `:`, or if the
///   length does not fit in `usize`.
/// - [`BencodeError::Incomplete`] if the `:` has not been reached yet, or if
///   fewer than `length` payload bytes follow it.
///
/// # Examples
///
/// ```
/// use bencode_stream::bencode::parse_bytes;
///
/// let (payload, consumed) = parse_bytes(b"4:spam5:ligma").unwrap();
/// assert_eq!(&payload[..], b"spam");
/// assert_eq!(consumed, 6);
///
/// assert!(parse_bytes(b"4:sp").unwrap_err().is_incomplete());
/// assert!(!parse_bytes(b"4spam").unwrap_err().is_incomplete());
/// ```
pub fn parse_bytes(input: &[u8]) -> Result<(Bytes, usize), BencodeError> {
    match input.first() {
        None => return Err(BencodeError::Incomplete { needed: 1 }),
        Some(b) if b.is_ascii_digit() => {}
        Some(_) => {
            return Err(BencodeError::MalformedString {
                offset: 0,
                reason: "length must start with a digit",
            })
        }
    }

    let digits = input.iter().take_while(|b| b.is_ascii_digit()).count();
    match input.get(digits) {
        None => return Err(BencodeError::Incomplete { needed: 1 }),
        Some(b':') => {}
        Some(_) => {
            return Err(BencodeError::MalformedString {
                offset: digits,
                reason: "expected ':' after length",
            })
        }
    }

    let len: usize = std::str::from_utf8(&input[..digits])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(BencodeError::MalformedString {
            offset: 0,
            reason: "length out of range",
        })?;

    let start = digits + 1;
    let available = input.len() - start;
    if available < len {
        return Err(BencodeError::Incomplete {
            needed: len - available,
        });
    }

    let end = start + len;
    Ok((Bytes::copy_from_slice(&input[start..end]), end))
}

/// Parses a list of the form `l<values>e`.
///
/// Elements are returned in encounter order. The consumed count is the two
/// delimiters plus the consumed count of every element.
///
/// This recognizer is not incompleteness-aware: it never returns
/// [`BencodeError::Incomplete`]. A list cut short, or an element cut short
/// inside it, is [`BencodeError::MalformedList`], so a caller receiving a list
/// in pieces must buffer all of it before calling. Syntax errors raised by an
/// element keep their kind and are reported at their offset within `input`.
///
/// # Examples
///
/// ```
/// use bencode_stream::bencode::{parse_list, Value};
///
/// let (list, consumed) = parse_list(b"li3ei5ei42ee").unwrap();
/// assert_eq!(list, vec![Value::Integer(3), Value::Integer(5), Value::Integer(42)]);
/// assert_eq!(consumed, 12);
/// ```
pub fn parse_list(input: &[u8]) -> Result<(Vec<Value>, usize), BencodeError> {
    if input.first() != Some(&b'l') {
        return Err(BencodeError::MalformedList {
            offset: 0,
            reason: "expected 'l'",
        });
    }

    match parse_nested(input, Frame::List(Vec::new()))? {
        (Frame::List(list), read) => Ok((list, read)),
        (Frame::Dict { .. }, _) => unreachable!("root frame opened as a list"),
    }
}

/// Parses a dictionary of the form `d<key><value>...e`.
///
/// Keys must be byte strings. When a key repeats, the later value replaces the
/// earlier one while the key keeps the position of its first appearance.
///
/// Like [`parse_list`], this recognizer reports a truncated dictionary as
/// [`BencodeError::MalformedDictionary`] rather than
/// [`BencodeError::Incomplete`].
///
/// # Errors
///
/// [`BencodeError::MalformedDictionary`] if `input` does not start with `d`,
/// a key position holds anything but a byte string, a key is followed by the
/// terminator or by the end of input, or the terminator is missing.
///
/// # Examples
///
/// ```
/// use bencode_stream::bencode::parse_dict;
///
/// let (dict, consumed) = parse_dict(b"d3:cow3:mooe").unwrap();
/// assert_eq!(dict.get(b"cow".as_slice()).and_then(|v| v.as_str()), Some("moo"));
/// assert_eq!(consumed, 12);
/// ```
pub fn parse_dict(input: &[u8]) -> Result<(IndexMap<Bytes, Value>, usize), BencodeError> {
    if input.first() != Some(&b'd') {
        return Err(BencodeError::MalformedDictionary {
            offset: 0,
            reason: "expected 'd'",
        });
    }

    match parse_nested(input, Frame::dict())? {
        (Frame::Dict { entries, .. }, read) => Ok((entries, read)),
        (Frame::List(_), _) => unreachable!("root frame opened as a dictionary"),
    }
}

/// An open list or dictionary whose terminator has not been reached yet.
enum Frame {
    List(Vec<Value>),
    Dict {
        entries: IndexMap<Bytes, Value>,
        /// Key read ahead of a value that is still being parsed.
        key: Option<Bytes>,
    },
}

/// What an open frame expects at the current position.
enum Step {
    Close,
    Element(ValueKind),
}

impl Frame {
    fn dict() -> Self {
        Frame::Dict {
            entries: IndexMap::new(),
            key: None,
        }
    }

    fn open(kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::List => Some(Frame::List(Vec::new())),
            ValueKind::Dictionary => Some(Frame::dict()),
            ValueKind::Integer | ValueKind::ByteString => None,
        }
    }

    /// Reads past a dictionary key if one is due and reports what comes next.
    fn step(&mut self, input: &[u8], pos: &mut usize) -> Result<Step, BencodeError> {
        let key = match self {
            Frame::List(_) => {
                let Some(&byte) = input.get(*pos) else {
                    return Err(BencodeError::MalformedList {
                        offset: *pos,
                        reason: "missing terminator",
                    });
                };
                return match lookahead(byte).map_err(|e| e.rebase(*pos))? {
                    Lookahead::End => Ok(Step::Close),
                    Lookahead::Value(kind) => Ok(Step::Element(kind)),
                };
            }
            Frame::Dict { key, .. } => key,
        };

        match input.get(*pos) {
            None => {
                return Err(BencodeError::MalformedDictionary {
                    offset: *pos,
                    reason: "missing terminator",
                })
            }
            Some(b'e') => return Ok(Step::Close),
            Some(b) if b.is_ascii_digit() => {}
            Some(_) => {
                return Err(BencodeError::MalformedDictionary {
                    offset: *pos,
                    reason: "key is not a byte string",
                })
            }
        }

        let (k, n) = parse_bytes(&input[*pos..]).map_err(|e| truncated_entry(e, *pos))?;
        *key = Some(k);
        *pos += n;

        let next = match input.get(*pos) {
            None => None,
            Some(&byte) => match lookahead(byte).map_err(|e| e.rebase(*pos))? {
                Lookahead::End => None,
                Lookahead::Value(kind) => Some(kind),
            },
        };
        next.map(Step::Element)
            .ok_or(BencodeError::MalformedDictionary {
                offset: *pos,
                reason: "key without value",
            })
    }

    fn push(&mut self, value: Value) {
        match self {
            Frame::List(list) => list.push(value),
            Frame::Dict { entries, key } => {
                if let Some(key) = key.take() {
                    entries.insert(key, value);
                }
            }
        }
    }

    /// Maps an error from a scalar element at `offset` onto this frame.
    fn element_error(&self, err: BencodeError, offset: usize) -> BencodeError {
        match self {
            Frame::List(_) if err.is_incomplete() => BencodeError::MalformedList {
                offset,
                reason: "element truncated",
            },
            Frame::List(_) => err.rebase(offset),
            Frame::Dict { .. } => truncated_entry(err, offset),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Frame::List(list) => Value::List(list),
            Frame::Dict { entries, .. } => Value::Dict(entries),
        }
    }
}

/// Parses the container `root` opens at the start of `input`.
///
/// Open containers live on an explicit stack rather than the call stack, so
/// nesting depth is bounded only by memory. Offsets are positions within
/// `input`.
fn parse_nested(input: &[u8], root: Frame) -> Result<(Frame, usize), BencodeError> {
    let mut parents: Vec<Frame> = Vec::new();
    let mut current = root;
    let mut pos = 1;

    loop {
        let value = match current.step(input, &mut pos)? {
            Step::Close => {
                pos += 1;
                match parents.pop() {
                    None => return Ok((current, pos)),
                    Some(parent) => std::mem::replace(&mut current, parent).into_value(),
                }
            }
            Step::Element(kind) => match Frame::open(kind) {
                Some(frame) => {
                    parents.push(std::mem::replace(&mut current, frame));
                    pos += 1;
                    continue;
                }
                None => {
                    let (value, n) = parse_scalar(kind, &input[pos..])
                        .map_err(|e| current.element_error(e, pos))?;
                    pos += n;
                    value
                }
            },
        };

        current.push(value);
    }
}

fn truncated_entry(err: BencodeError, offset: usize) -> BencodeError {
    if err.is_incomplete() {
        BencodeError::MalformedDictionary {
            offset,
            reason: "entry truncated",
        }
    } else {
        err.rebase(offset)
    }
}

fn parse_scalar(kind: ValueKind, input: &[u8]) -> Result<(Value, usize), BencodeError> {
    match kind {
        ValueKind::Integer => parse_integer(input).map(|(i, n)| (Value::Integer(i), n)),
        _ => parse_bytes(input).map(|(b, n)| (Value::Bytes(b), n)),
    }
}

fn parse_kind(kind: ValueKind, input: &[u8]) -> Result<(Value, usize), BencodeError> {
    match kind {
        ValueKind::Integer | ValueKind::ByteString => parse_scalar(kind, input),
        ValueKind::List => parse_list(input).map(|(l, n)| (Value::List(l), n)),
        ValueKind::Dictionary => parse_dict(input).map(|(d, n)| (Value::Dict(d), n)),
    }
}
