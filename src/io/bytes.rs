//! Bounds-checked access into an immutable byte buffer.
//!
//! Every decoder computes offsets and lengths from untrusted input, so none of
//! these helpers index without checking first. Offset arithmetic uses
//! `checked_add` so that a huge declared length cannot wrap around.

/// Borrow `len` bytes starting at `offset`, or `None` if the range leaves the buffer.
#[inline]
pub fn slice_at(data: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    let end = offset.checked_add(len)?;
    data.get(offset..end)
}

#[inline]
fn array_at<const N: usize>(data: &[u8], offset: usize) -> Option<[u8; N]> {
    slice_at(data, offset, N)?.try_into().ok()
}

/// Read a big-endian u16 at `offset`.
#[inline]
pub fn read_u16_be(data: &[u8], offset: usize) -> Option<u16> {
    array_at(data, offset).map(u16::from_be_bytes)
}

/// Read a little-endian u16 at `offset`.
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> Option<u16> {
    array_at(data, offset).map(u16::from_le_bytes)
}

/// Read a big-endian u32 at `offset`.
#[inline]
pub fn read_u32_be(data: &[u8], offset: usize) -> Option<u32> {
    array_at(data, offset).map(u32::from_be_bytes)
}

/// Read a little-endian u32 at `offset`.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    array_at(data, offset).map(u32::from_le_bytes)
}

/// Read a little-endian 24-bit unsigned integer at `offset`.
#[inline]
pub fn read_u24_le(data: &[u8], offset: usize) -> Option<u32> {
    let [b0, b1, b2] = array_at::<3>(data, offset)?;
    Some(u32::from_le_bytes([b0, b1, b2, 0]))
}

/// Read a 4-byte type tag (PNG chunk type, RIFF FourCC) at `offset`.
#[inline]
pub fn read_fourcc(data: &[u8], offset: usize) -> Option<[u8; 4]> {
    array_at(data, offset)
}

/// Strip trailing NUL bytes.
#[inline]
pub fn trim_trailing_nuls(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    &bytes[..end]
}

/// Split at the first NUL byte, returning the bytes before and after it.
///
/// Returns `None` when there is no NUL separator.
#[inline]
pub fn split_at_nul(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = bytes.iter().position(|&b| b == 0)?;
    Some((&bytes[..pos], &bytes[pos + 1..]))
}

// =============================================================================
// Tests
// =============================================================================
