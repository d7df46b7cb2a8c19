use std::io::{self, Read};

use bytes::{Buf, BytesMut};

use super::destination::{Destination, Scalar};
use crate::bencode::{lookahead, parse_bytes, parse_integer, BencodeError, Lookahead, ValueKind};
use crate::constants::{INITIAL_BUFFER_CAPACITY, READ_CHUNK_SIZE};

/// Decodes bencode scalars from a blocking byte source.
///
/// Bytes read from the source accumulate in an internal buffer until the
/// integer or string recognizer can accept or reject the value at its front.
/// A value may therefore arrive over any number of short reads.
///
/// Bytes that follow a decoded value stay buffered and are decoded by the
/// next call before the source is read again. After a syntax error the
/// buffer is left as it was; the stream is no longer aligned on a value.
///
/// The decoder is not shared between threads; a read that never returns
/// blocks the decode call that issued it.
///
/// # Examples
///
/// ```
/// use bencode_stream::StreamDecoder;
///
/// let mut decoder = StreamDecoder::new(&b"i42e4:spam"[..]);
///
/// let number: i64 = decoder.decode().unwrap();
/// let text: String = decoder.decode().unwrap();
///
/// assert_eq!(number, 42);
/// assert_eq!(text, "spam");
/// ```
pub struct StreamDecoder<R> {
    reader: R,
    buf: BytesMut,
    read_size: usize,
}

impl<R: Read> StreamDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            read_size: READ_CHUNK_SIZE,
        }
    }

    /// Creates a decoder whose buffer starts at `capacity` bytes and which
    /// requests at most `capacity` bytes per read.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(capacity),
            read_size: capacity.max(1),
        }
    }

    /// Decodes the next value from the stream into a new `T`.
    ///
    /// A first byte that opens no bencode value (`-`, `e`, `x`, ...) is handed
    /// to the string recognizer, so it is reported as
    /// [`BencodeError::MalformedString`] whatever the destination.
    ///
    /// # Errors
    ///
    /// - [`BencodeError::UnsupportedDestination`] if `T` is not an integer or
    ///   byte string destination; nothing is read.
    /// - [`BencodeError::DestinationMismatch`] if the next value is of another
    ///   kind; its first byte stays buffered.
    /// - [`BencodeError::MalformedInteger`] or [`BencodeError::MalformedString`]
    ///   on a syntax error.
    /// - [`BencodeError::StreamEnded`] if the source runs dry before the value
    ///   is complete, including before its first byte.
    /// - [`BencodeError::Io`] if the source fails.
    pub fn decode<T: Destination>(&mut self) -> Result<T, BencodeError> {
        if !matches!(T::KIND, ValueKind::Integer | ValueKind::ByteString) {
            return Err(BencodeError::UnsupportedDestination(T::KIND));
        }

        let scalar = match lookahead(self.peek()?) {
            Ok(Lookahead::Value(ValueKind::Integer)) if T::KIND == ValueKind::Integer => {
                Scalar::Integer(self.recognize(parse_integer)?)
            }
            Ok(Lookahead::Value(found)) if found != T::KIND => {
                return Err(BencodeError::DestinationMismatch {
                    expected: T::KIND,
                    found,
                });
            }
            _ => Scalar::Bytes(self.recognize(parse_bytes)?),
        };

        T::from_scalar(scalar)
    }

    /// Decodes the next value into `dest`, which is left untouched on error.
    pub fn decode_into<T: Destination>(&mut self, dest: &mut T) -> Result<(), BencodeError> {
        *dest = self.decode()?;
        Ok(())
    }

    /// Bytes read from the source but not yet consumed by a decoded value.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Returns the first buffered byte, reading until there is one.
    fn peek(&mut self) -> Result<u8, BencodeError> {
        while self.buf.is_empty() {
            if self.fill()? == 0 {
                return Err(BencodeError::StreamEnded { buffered: 0 });
            }
        }
        Ok(self.buf[0])
    }

    fn recognize<T>(
        &mut self,
        parse: fn(&[u8]) -> Result<(T, usize), BencodeError>,
    ) -> Result<T, BencodeError> {
        loop {
            match parse(&self.buf) {
                Ok((value, consumed)) => {
                    self.buf.advance(consumed);
                    return Ok(value);
                }
                Err(BencodeError::Incomplete { needed }) => {
                    tracing::trace!(
                        needed,
                        buffered = self.buf.len(),
                        "value incomplete, reading more"
                    );
                    if self.fill()? == 0 {
                        tracing::debug!(buffered = self.buf.len(), "source ended inside a value");
                        return Err(BencodeError::StreamEnded {
                            buffered: self.buf.len(),
                        });
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "rejecting buffered input");
                    return Err(e);
                }
            }
        }
    }

    /// Appends up to `read_size` bytes from the source; 0 means end of data.
    fn fill(&mut self) -> Result<usize, BencodeError> {
        let filled = self.buf.len();
        self.buf.resize(filled + self.read_size, 0);

        loop {
            match self.reader.read(&mut self.buf[filled..]) {
                Ok(n) => {
                    self.buf.truncate(filled + n);
                    tracing::trace!(read = n, buffered = filled + n, "filled decode buffer");
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.truncate(filled);
                    return Err(e.into());
                }
            }
        }
    }
}
