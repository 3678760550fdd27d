//! Fixed-width little-endian integer reads at arbitrary byte offsets.
//!
//! Every decoder in this crate is built on these. No alignment is required
//! and the reconstruction is bit-exact: signed values keep their
//! two's-complement wraparound, which the legacy on-disk format relies on
//! for coordinates beyond the i16 range.

use crate::error::WadError;

/// Copy `N` bytes starting at `offset`, or fail with
/// [`WadError::OutOfBounds`] when the read would escape the buffer.
pub fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], WadError> {
    let end = offset
        .checked_add(N)
        .filter(|end| *end <= buf.len())
        .ok_or(WadError::OutOfBounds {
            what: "byte read",
            at: offset,
            limit: buf.len(),
        })?;
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[offset..end]);
    Ok(out)
}

pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16, WadError> {
    Ok(u16::from_le_bytes(read_array(buf, offset)?))
}

pub fn read_i16(buf: &[u8], offset: usize) -> Result<i16, WadError> {
    Ok(i16::from_le_bytes(read_array(buf, offset)?))
}

pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32, WadError> {
    Ok(u32::from_le_bytes(read_array(buf, offset)?))
}

pub fn read_i32(buf: &[u8], offset: usize) -> Result<i32, WadError> {
    Ok(i32::from_le_bytes(read_array(buf, offset)?))
}
