//! Buffer tuning parameters for the stream decoder.

/// Capacity reserved for a decoder's buffer when it is created (4 KiB).
pub const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;

/// Upper bound on the bytes requested from the source by a single read (4 KiB).
pub const READ_CHUNK_SIZE: usize = 4 * 1024;
