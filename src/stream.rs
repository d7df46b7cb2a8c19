//! Incremental decoding of bencode scalars from a byte source.
//!
//! [`StreamDecoder`] wraps any [`std::io::Read`] and decodes one integer or
//! byte string per call, reading more data whenever the bytes buffered so far
//! end in the middle of a value. The value kind is chosen by the destination
//! type through the [`Destination`] trait.
//!
//! Lists and dictionaries are not decoded from a stream. Buffer them whole and
//! use [`parse_list`](crate::bencode::parse_list) or
//! [`parse_dict`](crate::bencode::parse_dict).

mod decoder;
mod destination;

pub use decoder::StreamDecoder;
pub use destination::{Destination, Scalar};

#[cfg(test)]
mod tests;
