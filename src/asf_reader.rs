use byteorder::{BigEndian, ByteOrder};

/// Read a big-endian `u32` at `offset`.
///
/// The caller bounds-checks; `offset + 4` must not exceed `buffer.len()`.
pub fn read_u32_be(buffer: &[u8], offset: usize) -> u32 {
    BigEndian::read_u32(&buffer[offset..offset + 4])
}

/// Read a big-endian `u16` at `offset`. Same contract as [`read_u32_be`].
pub fn read_u16_be(buffer: &[u8], offset: usize) -> u16 {
    BigEndian::read_u16(&buffer[offset..offset + 2])
}

/// Read a NUL-terminated Latin-1 string starting at `offset`.
///
/// Returns the decoded text and the number of bytes consumed, terminator
/// included. When no terminator exists before the end of the buffer the
/// result is `("", 0)`, which tells the caller to stop reading strings.
pub fn read_cstring(buffer: &[u8], offset: usize) -> (String, usize) {
    let Some(tail) = buffer.get(offset..) else {
        return (String::new(), 0);
    };
    match tail.iter().position(|&byte| byte == 0) {
        Some(end) => (latin1_to_string(&tail[..end]), end + 1),
        None => (String::new(), 0),
    }
}

/// Decode bytes as Latin-1. Every byte value is a valid code point, so this
/// never fails.
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}
