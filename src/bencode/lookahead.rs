use super::error::BencodeError;
use super::value::ValueKind;

/// What the next unconsumed byte announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    /// The byte opens a value of this kind.
    Value(ValueKind),
    /// The byte is `e`, closing the enclosing list or dictionary.
    End,
}

/// Classifies a lookahead byte without consuming it.
///
/// `i` opens an integer, an ASCII digit opens a byte string, `l` a list and
/// `d` a dictionary. Any other byte is [`BencodeError::MalformedValue`] at
/// offset 0; callers rebase the offset onto their own input.
///
/// # Examples
///
/// ```
/// use bencode_stream::bencode::{lookahead, Lookahead, ValueKind};
///
/// assert_eq!(lookahead(b'i').unwrap(), Lookahead::Value(ValueKind::Integer));
/// assert_eq!(lookahead(b'7').unwrap(), Lookahead::Value(ValueKind::ByteString));
/// assert_eq!(lookahead(b'e').unwrap(), Lookahead::End);
/// assert!(lookahead(b'x').is_err());
/// ```
pub fn lookahead(byte: u8) -> Result<Lookahead, BencodeError> {
    match byte {
        b'i' => Ok(Lookahead::Value(ValueKind::Integer)),
        b'0'..=b'9' => Ok(Lookahead::Value(ValueKind::ByteString)),
        b'l' => Ok(Lookahead::Value(ValueKind::List)),
        b'd' => Ok(Lookahead::Value(ValueKind::Dictionary)),
        b'e' => Ok(Lookahead::End),
        byte => Err(BencodeError::MalformedValue { offset: 0, byte }),
    }
}
