//! Fixed byte layout of the V4L2 structs and the primitive readers over it.
//!
//! Every offset, field width and struct size used by the decoders lives here.
//! All multi-byte integers are little-endian.

use crate::traits::{DecodeError, FourCC, Result};

/// `struct v4l2_capability`.
pub mod capability {
    /// `__u8 driver[16]`.
    pub const DRIVER: usize = 0;
    /// Width of `driver`.
    pub const DRIVER_LEN: usize = 16;
    /// `__u8 card[32]`.
    pub const CARD: usize = 16;
    /// Width of `card`.
    pub const CARD_LEN: usize = 32;
    /// `__u8 bus_info[32]`.
    pub const BUS_INFO: usize = 48;
    /// Width of `bus_info`.
    pub const BUS_INFO_LEN: usize = 32;
    /// `__u32 version`.
    pub const VERSION: usize = 80;
    /// `__u32 capabilities`.
    pub const CAPABILITIES: usize = 84;
    /// Total struct size.
    pub const SIZE: usize = 104;

    /// `V4L2_CAP_VIDEO_CAPTURE`.
    pub const CAP_VIDEO_CAPTURE: u32 = 0x0000_0001;
    /// `V4L2_CAP_STREAMING`.
    pub const CAP_STREAMING: u32 = 0x0400_0000;
}

/// `struct v4l2_fmtdesc`.
pub mod fmtdesc {
    /// `__u32 index`.
    pub const INDEX: usize = 0;
    /// `__u32 type`.
    pub const TYPE: usize = 4;
    /// `__u32 flags`.
    pub const FLAGS: usize = 8;
    /// `__u8 description[32]`.
    pub const DESCRIPTION: usize = 12;
    /// Width of `description`.
    pub const DESCRIPTION_LEN: usize = 32;
    /// `__u32 pixelformat`.
    pub const PIXELFORMAT: usize = 44;
    /// Total struct size.
    pub const SIZE: usize = 64;

    /// `V4L2_FMT_FLAG_COMPRESSED`.
    pub const FLAG_COMPRESSED: u32 = 0x0001;
}

/// `struct v4l2_format` and the `v4l2_pix_format` member of its union.
pub mod format {
    /// `__u32 type`.
    pub const TYPE: usize = 0;
    /// Start of the `fmt` union. The union holds pointers, so it is aligned to them.
    pub const UNION: usize = std::mem::align_of::<*const u8>();
    /// Size of the `fmt` union (`__u8 raw_data[200]`).
    pub const UNION_LEN: usize = 200;
    /// Total struct size.
    pub const SIZE: usize = UNION + UNION_LEN;

    /// `width`, relative to the union.
    pub const WIDTH: usize = 0;
    /// `height`, relative to the union.
    pub const HEIGHT: usize = 4;
    /// `pixelformat`, relative to the union.
    pub const PIXELFORMAT: usize = 8;
    /// `field`, relative to the union. Not decoded.
    pub const FIELD: usize = 12;
    /// `bytesperline`, relative to the union. Not decoded.
    pub const BYTESPERLINE: usize = 16;
    /// `sizeimage`, relative to the union. Not decoded.
    pub const SIZEIMAGE: usize = 20;
    /// `colorspace`, relative to the union.
    pub const COLORSPACE: usize = 24;
    /// Bytes of the union the decoder reads.
    pub const PIX_LEN: usize = 28;
}

const _: () = assert!(format::PIX_LEN <= format::UNION_LEN);

/// `V4L2_BUF_TYPE_VIDEO_CAPTURE`.
pub const BUF_TYPE_VIDEO_CAPTURE: u32 = 1;

/// Borrow `width` bytes at `offset`, or fail with `TruncatedBuffer`.
pub fn field(buffer: &[u8], offset: usize, width: usize) -> Result<&[u8]> {
    offset
        .checked_add(width)
        .and_then(|end| buffer.get(offset..end))
        .ok_or(DecodeError::TruncatedBuffer {
            offset,
            width,
            len: buffer.len(),
        })
}

/// Decode a NUL-terminated string stored in a fixed `max_len` byte field.
///
/// Stops at the first NUL or at `max_len`. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_cstring(buffer: &[u8], offset: usize, max_len: usize) -> Result<String> {
    let bytes = field(buffer, offset, max_len)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = bytes.get(..end).unwrap_or_default();
    Ok(String::from_utf8_lossy(text).into_owned())
}

/// Decode a little-endian `u32` at `offset`.
pub fn decode_u32_le(buffer: &[u8], offset: usize) -> Result<u32> {
    let bytes = field(buffer, offset, 4)?;
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    Ok(u32::from_le_bytes(word))
}

/// Decode a four-character code at `offset`, taking the bytes verbatim.
pub fn decode_fourcc(buffer: &[u8], offset: usize) -> Result<FourCC> {
    let bytes = field(buffer, offset, 4)?;
    let mut code = [0u8; 4];
    code.copy_from_slice(bytes);
    Ok(FourCC(code))
}

/// Store `value` little-endian at `offset` of a request buffer.
pub fn encode_u32_le(buffer: &mut [u8], offset: usize, value: u32) -> Result<()> {
    let len = buffer.len();
    let slot = offset
        .checked_add(4)
        .and_then(|end| buffer.get_mut(offset..end))
        .ok_or(DecodeError::TruncatedBuffer {
            offset,
            width: 4,
            len,
        })?;
    slot.copy_from_slice(&value.to_le_bytes());
    Ok(())
}
