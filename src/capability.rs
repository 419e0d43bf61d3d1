//! Decoding of `VIDIOC_QUERYCAP` replies.

use crate::layout::{capability, decode_cstring, decode_u32_le};
use crate::traits::{BufferSource, DeviceCapabilities, Result};

/// Decode a `v4l2_capability` buffer.
pub fn decode_capabilities(buffer: &[u8]) -> Result<DeviceCapabilities> {
    let flags = decode_u32_le(buffer, capability::CAPABILITIES)?;

    let caps = DeviceCapabilities {
        driver: decode_cstring(buffer, capability::DRIVER, capability::DRIVER_LEN)?,
        card: decode_cstring(buffer, capability::CARD, capability::CARD_LEN)?,
        bus_info: decode_cstring(buffer, capability::BUS_INFO, capability::BUS_INFO_LEN)?,
        version: decode_u32_le(buffer, capability::VERSION)?,
        can_capture: flags & capability::CAP_VIDEO_CAPTURE != 0,
        can_stream: flags & capability::CAP_STREAMING != 0,
    };

    log::debug!("decoded capabilities: {caps:?} (flags {flags:#010x})");
    Ok(caps)
}

/// Query a source for its capabilities and decode them.
///
/// A failing query is returned unchanged as `DecodeError::QueryFailed`.
pub fn query_capabilities<S: BufferSource + ?Sized>(source: &S) -> Result<DeviceCapabilities> {
    let buffer = source.query_capability()?;
    decode_capabilities(&buffer)
}
