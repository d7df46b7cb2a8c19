//! Bencode recognizers ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Recognizers
//!
//! Each recognizer takes a slice that begins with an encoded value, possibly
//! followed by unrelated bytes, and returns the decoded value together with
//! the number of bytes it consumed. That count lets a caller embedding bencode
//! in a larger envelope find the next segment.
//!
//! ```
//! use bencode_stream::bencode::{parse_bytes, parse_integer};
//!
//! let input = b"i42e4:spam";
//! let (number, used) = parse_integer(input).unwrap();
//! let (text, _) = parse_bytes(&input[used..]).unwrap();
//!
//! assert_eq!(number, 42);
//! assert_eq!(&text[..], b"spam");
//! ```
//!
//! The integer and string recognizers return [`BencodeError::Incomplete`]
//! when the slice ends before the value can be judged, which the stream
//! decoder treats as a request for more bytes. The list and dictionary
//! recognizers report truncation as a syntax error and expect the whole
//! container to be buffered.
//!
//! # Leniency
//!
//! Integers with leading zeros (`i03e`) and negative zero (`i-0e`) are
//! accepted, as many clients in the wild produce them. Nesting depth and
//! value size are not limited.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod error;
mod lookahead;
mod value;

pub use decode::{decode, parse_bytes, parse_dict, parse_integer, parse_list, parse_value};
pub use error::{BencodeError, ErrorKind};
pub use lookahead::{lookahead, Lookahead};
pub use value::{Value, ValueKind};
