//! bencode-stream - Bencode decoding for BitTorrent data
//!
//! This library decodes the bencode format used by `.torrent` files, tracker
//! responses and peer-wire extension messages ([BEP-3]).
//!
//! # Modules
//!
//! - [`bencode`] - Buffer recognizers for integers, byte strings, lists and dictionaries
//! - [`stream`] - Incremental decoding of integers and byte strings from a [`std::io::Read`]
//! - [`constants`] - Buffer tuning parameters
//!
//! # Examples
//!
//! Decoding a value embedded in a larger message:
//!
//! ```
//! use bencode_stream::{parse_dict, Value};
//!
//! let message = b"d1:md11:ut_metadatai3eee<raw metadata piece>";
//! let (dict, consumed) = parse_dict(message).unwrap();
//!
//! let extensions = dict.get(b"m".as_slice()).unwrap();
//! assert_eq!(extensions.get(b"ut_metadata"), Some(&Value::Integer(3)));
//! assert_eq!(&message[consumed..], b"<raw metadata piece>");
//! ```
//!
//! Decoding scalars as they arrive from a reader:
//!
//! ```
//! use bencode_stream::StreamDecoder;
//! use std::io::Cursor;
//!
//! let mut decoder = StreamDecoder::new(Cursor::new(b"i16384e8:announce"));
//! let piece_length: u32 = decoder.decode().unwrap();
//! let key: String = decoder.decode().unwrap();
//!
//! assert_eq!(piece_length, 16384);
//! assert_eq!(key, "announce");
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

pub mod bencode;
pub mod constants;
pub mod stream;

pub use bencode::{
    decode, parse_bytes, parse_dict, parse_integer, parse_list, parse_value, BencodeError,
    ErrorKind, Value, ValueKind,
};
pub use stream::{Destination, Scalar, StreamDecoder};
