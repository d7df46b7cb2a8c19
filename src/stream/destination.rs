use bytes::Bytes;

use crate::bencode::{BencodeError, ValueKind};

/// A scalar decoded from a stream, before it is bound to a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Integer(i64),
    Bytes(Bytes),
}

impl Scalar {
    pub fn kind(&self) -> ValueKind {
        match self {
            Scalar::Integer(_) => ValueKind::Integer,
            Scalar::Bytes(_) => ValueKind::ByteString,
        }
    }
}

/// A type the [`StreamDecoder`](super::StreamDecoder) can decode into.
///
/// `KIND` names the bencode value the type receives. Only
/// [`ValueKind::Integer`] and [`ValueKind::ByteString`] can be read from a
/// stream; any other kind is rejected before the decoder touches its source.
///
/// # Examples
///
/// ```
/// use bencode_stream::bencode::{BencodeError, ValueKind};
/// use bencode_stream::stream::{Destination, Scalar};
///
/// struct Port(u16);
///
/// impl Destination for Port {
///     const KIND: ValueKind = ValueKind::Integer;
///
///     fn from_scalar(scalar: Scalar) -> Result<Self, BencodeError> {
///         match scalar {
///             Scalar::Integer(value) => u16::try_from(value)
///                 .map(Port)
///                 .map_err(|_| BencodeError::OutOfRange { value, target: "Port" }),
///             other => Err(BencodeError::DestinationMismatch {
///                 expected: Self::KIND,
///                 found: other.kind(),
///             }),
///         }
///     }
/// }
/// ```
pub trait Destination: Sized {
    const KIND: ValueKind;

    /// Converts a decoded scalar into the destination type.
    fn from_scalar(scalar: Scalar) -> Result<Self, BencodeError>;
}

fn mismatch(expected: ValueKind, scalar: &Scalar) -> BencodeError {
    BencodeError::DestinationMismatch {
        expected,
        found: scalar.kind(),
    }
}

macro_rules! integer_destination {
    ($($ty:ty),*) => {
        $(
            impl Destination for $ty {
                const KIND: ValueKind = ValueKind::Integer;

                fn from_scalar(scalar: Scalar) -> Result<Self, BencodeError> {
                    match scalar {
                        Scalar::Integer(value) => <$ty>::try_from(value).map_err(|_| {
                            BencodeError::OutOfRange {
                                value,
                                target: stringify!($ty),
                            }
                        }),
                        other => Err(mismatch(Self::KIND, &other)),
                    }
                }
            }
        )*
    };
}

integer_destination!(i64, i32, u32, u64, usize);

impl Destination for Bytes {
    const KIND: ValueKind = ValueKind::ByteString;

    fn from_scalar(scalar: Scalar) -> Result<Self, BencodeError> {
        match scalar {
            Scalar::Bytes(b) => Ok(b),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl Destination for Vec<u8> {
    const KIND: ValueKind = ValueKind::ByteString;

    fn from_scalar(scalar: Scalar) -> Result<Self, BencodeError> {
        Bytes::from_scalar(scalar).map(|b| b.to_vec())
    }
}

impl Destination for String {
    const KIND: ValueKind = ValueKind::ByteString;

    fn from_scalar(scalar: Scalar) -> Result<Self, BencodeError> {
        let bytes = Vec::<u8>::from_scalar(scalar)?;
        String::from_utf8(bytes).map_err(|_| BencodeError::InvalidUtf8)
    }
}
