use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use bytes::Bytes;
use tempfile::tempfile;

use super::*;
use crate::bencode::{BencodeError, ErrorKind, ValueKind};

/// Hands out at most `chunk` bytes per read and counts the reads.
struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    reads: usize,
}

impl ChunkedReader {
    fn new(data: &[u8], chunk: usize) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            chunk,
            reads: 0,
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Fails once with `kind`, then reads from `inner`.
struct FlakyReader<R> {
    inner: R,
    failure: Option<io::ErrorKind>,
}

impl<R: Read> Read for FlakyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.failure.take() {
            Some(kind) => Err(io::Error::new(kind, "flaky")),
            None => self.inner.read(buf),
        }
    }
}

#[derive(Debug)]
struct Entries;

impl Destination for Entries {
    const KIND: ValueKind = ValueKind::List;

    fn from_scalar(_: Scalar) -> Result<Self, BencodeError> {
        Ok(Entries)
    }
}

#[test]
fn test_decode_string_split_across_reads() {
    let mut decoder = StreamDecoder::new(ChunkedReader::new(b"4:spam", 3));
    let value: String = decoder.decode().unwrap();
    assert_eq!(value, "spam");
    assert_eq!(decoder.get_ref().reads, 2);
}

#[test]
fn test_decode_integer_byte_by_byte() {
    let mut decoder = StreamDecoder::new(ChunkedReader::new(b"i2502859205e", 1));
    let value: i64 = decoder.decode().unwrap();
    assert_eq!(value, 2502859205);
    assert_eq!(decoder.get_ref().reads, 12);
}

#[test]
fn test_decode_negative_integer() {
    let mut decoder = StreamDecoder::new(&b"i-42e"[..]);
    assert_eq!(decoder.decode::<i64>().unwrap(), -42);
}

#[test]
fn test_decode_large_string_small_buffer() {
    let payload = vec![b'x'; 1000];
    let mut encoded = b"1000:".to_vec();
    encoded.extend_from_slice(&payload);

    let mut decoder = StreamDecoder::with_capacity(ChunkedReader::new(&encoded, 64), 16);
    let value: Vec<u8> = decoder.decode().unwrap();
    assert_eq!(value, payload);
    assert!(decoder.buffered().is_empty());
}

#[test]
fn test_leftover_bytes_stay_buffered() {
    let mut decoder = StreamDecoder::new(ChunkedReader::new(b"i42e4:spami7e", 64));

    assert_eq!(decoder.decode::<i64>().unwrap(), 42);
    assert_eq!(decoder.buffered(), b"4:spami7e");

    assert_eq!(decoder.decode::<String>().unwrap(), "spam");
    assert_eq!(decoder.decode::<i64>().unwrap(), 7);
    assert_eq!(decoder.get_ref().reads, 1);
}

#[test]
fn test_stream_ended_mid_value() {
    let mut decoder = StreamDecoder::new(ChunkedReader::new(b"4:sp", 2));
    let err = decoder.decode::<String>().unwrap_err();
    assert!(matches!(err, BencodeError::StreamEnded { buffered: 4 }));
    assert_eq!(err.kind(), ErrorKind::StreamEnded);
    assert!(!err.is_incomplete());
}

#[test]
fn test_stream_ended_before_value() {
    let mut decoder = StreamDecoder::new(&b""[..]);
    let err = decoder.decode::<i64>().unwrap_err();
    assert!(matches!(err, BencodeError::StreamEnded { buffered: 0 }));
}

#[test]
fn test_syntax_error_stops_reading() {
    let mut decoder = StreamDecoder::new(ChunkedReader::new(b"4spam and more", 5));
    let err = decoder.decode::<String>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedString);
    assert_eq!(decoder.get_ref().reads, 1);
    assert_eq!(decoder.buffered(), b"4spam");
}

#[test]
fn test_malformed_integer() {
    let mut decoder = StreamDecoder::new(&b"i4x2e"[..]);
    let err = decoder.decode::<i64>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInteger);
}

#[test]
fn test_unopened_value_goes_to_string_recognizer() {
    for input in [&b"e"[..], b"x", b"-4:spam"] {
        let mut decoder = StreamDecoder::new(input);
        let err = decoder.decode::<String>().unwrap_err();
        assert!(
            matches!(err, BencodeError::MalformedString { offset: 0, .. }),
            "input {:?}",
            input
        );
    }

    let mut decoder = StreamDecoder::new(&b"-4:spam"[..]);
    let err = decoder.decode::<i64>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedString);
    assert_eq!(decoder.buffered(), b"-4:spam");
}

#[test]
fn test_unsupported_destination_reads_nothing() {
    let mut decoder = StreamDecoder::new(Cursor::new(b"li1ee".to_vec()));
    let err = decoder.decode::<Entries>().unwrap_err();
    assert!(matches!(
        err,
        BencodeError::UnsupportedDestination(ValueKind::List)
    ));
    assert_eq!(err.kind(), ErrorKind::InvalidDestination);
    assert_eq!(decoder.get_ref().position(), 0);
    assert!(decoder.buffered().is_empty());
}

#[test]
fn test_destination_mismatch_keeps_value() {
    let mut decoder = StreamDecoder::new(&b"4:spam"[..]);
    let err = decoder.decode::<i64>().unwrap_err();
    assert!(matches!(
        err,
        BencodeError::DestinationMismatch {
            expected: ValueKind::Integer,
            found: ValueKind::ByteString,
        }
    ));
    assert_eq!(err.kind(), ErrorKind::DestinationMismatch);

    assert_eq!(decoder.decode::<String>().unwrap(), "spam");
}

#[test]
fn test_list_in_stream_is_mismatch() {
    let mut decoder = StreamDecoder::new(&b"li1ee"[..]);
    let err = decoder.decode::<i64>().unwrap_err();
    assert!(matches!(
        err,
        BencodeError::DestinationMismatch {
            found: ValueKind::List,
            ..
        }
    ));
}

#[test]
fn test_decode_into_leaves_destination_on_error() {
    let mut decoder = StreamDecoder::new(&b"i42e4:sp"[..]);

    let mut number = 0i64;
    decoder.decode_into(&mut number).unwrap();
    assert_eq!(number, 42);

    let mut text = String::from("untouched");
    assert!(decoder.decode_into(&mut text).is_err());
    assert_eq!(text, "untouched");
}

#[test]
fn test_integer_out_of_range() {
    let mut decoder = StreamDecoder::new(&b"i-1ei4294967296e"[..]);

    let err = decoder.decode::<u32>().unwrap_err();
    assert!(matches!(
        err,
        BencodeError::OutOfRange {
            value: -1,
            target: "u32"
        }
    ));

    let err = decoder.decode::<u32>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Bind);
}

#[test]
fn test_narrow_integer_destinations() {
    let mut decoder = StreamDecoder::new(&b"i7ei-7ei8e"[..]);
    assert_eq!(decoder.decode::<usize>().unwrap(), 7);
    assert_eq!(decoder.decode::<i32>().unwrap(), -7);
    assert_eq!(decoder.decode::<u64>().unwrap(), 8);
}

#[test]
fn test_byte_destinations() {
    let mut decoder = StreamDecoder::new(&b"2:\xff\xfe2:\xff\xfe2:\xff\xfe"[..]);

    assert!(matches!(
        decoder.decode::<String>().unwrap_err(),
        BencodeError::InvalidUtf8
    ));
    assert_eq!(decoder.decode::<Vec<u8>>().unwrap(), vec![0xff, 0xfe]);
    assert_eq!(
        decoder.decode::<Bytes>().unwrap(),
        Bytes::from_static(&[0xff, 0xfe])
    );
}

#[test]
fn test_io_error_is_propagated() {
    let reader = FlakyReader {
        inner: &b"i1e"[..],
        failure: Some(io::ErrorKind::ConnectionReset),
    };
    let mut decoder = StreamDecoder::new(reader);
    let err = decoder.decode::<i64>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(decoder.buffered().is_empty());
}

#[test]
fn test_interrupted_read_is_retried() {
    let reader = FlakyReader {
        inner: &b"i1e"[..],
        failure: Some(io::ErrorKind::Interrupted),
    };
    let mut decoder = StreamDecoder::new(reader);
    assert_eq!(decoder.decode::<i64>().unwrap(), 1);
}

#[test]
fn test_decode_from_file() {
    let mut file = tempfile().unwrap();
    file.write_all(b"i1024e11:example.txt").unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let mut decoder = StreamDecoder::with_capacity(file, 8);
    assert_eq!(decoder.decode::<u64>().unwrap(), 1024);
    assert_eq!(decoder.decode::<String>().unwrap(), "example.txt");
    assert!(matches!(
        decoder.decode::<i64>().unwrap_err(),
        BencodeError::StreamEnded { buffered: 0 }
    ));
}
