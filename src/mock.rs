//! Mock buffer source and kernel-struct builders for testing without hardware.

use crate::layout::{self, capability, encode_u32_le, fmtdesc, format};
use crate::traits::{BufferSource, Colorspace, FourCC, QueryError, QueryResult};

/// Copy `bytes` into `buffer` at `offset`.
fn put_bytes(buffer: &mut [u8], offset: usize, bytes: &[u8]) {
    offset
        .checked_add(bytes.len())
        .and_then(|end| buffer.get_mut(offset..end))
        .expect("field within struct")
        .copy_from_slice(bytes);
}

/// Write `text` as a NUL-terminated string into a `max_len` byte field.
fn put_cstring(buffer: &mut [u8], offset: usize, max_len: usize, text: &str) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(max_len.saturating_sub(1));
    put_bytes(buffer, offset, bytes.get(..len).unwrap_or_default());
}

fn put_u32(buffer: &mut [u8], offset: usize, value: u32) {
    encode_u32_le(buffer, offset, value).expect("offset within struct");
}

/// Build a `v4l2_capability` buffer.
pub fn capability_buffer(
    driver: &str,
    card: &str,
    bus_info: &str,
    version: u32,
    flags: u32,
) -> Vec<u8> {
    let mut buffer = vec![0u8; capability::SIZE];
    put_cstring(&mut buffer, capability::DRIVER, capability::DRIVER_LEN, driver);
    put_cstring(&mut buffer, capability::CARD, capability::CARD_LEN, card);
    put_cstring(&mut buffer, capability::BUS_INFO, capability::BUS_INFO_LEN, bus_info);
    put_u32(&mut buffer, capability::VERSION, version);
    put_u32(&mut buffer, capability::CAPABILITIES, flags);
    buffer
}

/// Build a `v4l2_fmtdesc` buffer for a capture format.
pub fn fmtdesc_buffer(index: u32, code: &[u8; 4], description: &str, compressed: bool) -> Vec<u8> {
    let mut buffer = vec![0u8; fmtdesc::SIZE];
    put_u32(&mut buffer, fmtdesc::INDEX, index);
    put_u32(&mut buffer, fmtdesc::TYPE, layout::BUF_TYPE_VIDEO_CAPTURE);
    put_u32(
        &mut buffer,
        fmtdesc::FLAGS,
        if compressed { fmtdesc::FLAG_COMPRESSED } else { 0 },
    );
    put_cstring(
        &mut buffer,
        fmtdesc::DESCRIPTION,
        fmtdesc::DESCRIPTION_LEN,
        description,
    );
    put_bytes(&mut buffer, fmtdesc::PIXELFORMAT, code);
    buffer
}

/// Build a `v4l2_format` buffer holding a single-planar pixel format.
pub fn format_buffer(width: u32, height: u32, code: &[u8; 4], colorspace: u32) -> Vec<u8> {
    let mut buffer = vec![0u8; format::SIZE];
    let pix = format::UNION;
    put_u32(&mut buffer, format::TYPE, layout::BUF_TYPE_VIDEO_CAPTURE);
    put_u32(&mut buffer, pix + format::WIDTH, width);
    put_u32(&mut buffer, pix + format::HEIGHT, height);
    put_bytes(&mut buffer, pix + format::PIXELFORMAT, code);
    // bytesperline and sizeimage as a YUYV driver would report them.
    put_u32(&mut buffer, pix + format::BYTESPERLINE, width * 2);
    put_u32(&mut buffer, pix + format::SIZEIMAGE, width * height * 2);
    put_u32(&mut buffer, pix + format::COLORSPACE, colorspace);
    buffer
}

/// Mock buffer source for testing without hardware.
pub struct MockSource {
    capability: QueryResult<Vec<u8>>,
    formats: Vec<(FourCC, String, bool)>,
    max_size: (u32, u32),
    negotiation_error: Option<QueryError>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Create a capture-capable mock offering YUYV and MJPG.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capability: Ok(capability_buffer(
                "mock",
                "Mock Camera",
                "mock:0",
                0x0006_0800,
                capability::CAP_VIDEO_CAPTURE | capability::CAP_STREAMING,
            )),
            formats: vec![
                (FourCC::YUYV, "YUYV 4:2:2".to_owned(), false),
                (FourCC::MJPG, "Motion-JPEG".to_owned(), true),
            ],
            max_size: (1920, 1080),
            negotiation_error: None,
        }
    }

    /// Replace the `VIDIOC_QUERYCAP` reply.
    #[must_use]
    pub fn with_capability(mut self, capability: QueryResult<Vec<u8>>) -> Self {
        self.capability = capability;
        self
    }

    /// Replace the enumerated formats.
    #[must_use]
    pub fn with_formats(mut self, formats: Vec<(FourCC, String, bool)>) -> Self {
        self.formats = formats;
        self
    }

    /// Clamp negotiated sizes to `width` x `height`.
    #[must_use]
    pub const fn with_max_size(mut self, width: u32, height: u32) -> Self {
        self.max_size = (width, height);
        self
    }

    /// Make `VIDIOC_S_FMT` fail.
    #[must_use]
    pub fn with_negotiation_error(mut self, err: QueryError) -> Self {
        self.negotiation_error = Some(err);
        self
    }
}

impl BufferSource for MockSource {
    fn query_capability(&self) -> QueryResult<Vec<u8>> {
        self.capability.clone()
    }

    fn query_format(&self, index: u32) -> QueryResult<Vec<u8>> {
        self.formats
            .get(index as usize)
            .map(|(code, description, compressed)| {
                fmtdesc_buffer(index, code.as_bytes(), description, *compressed)
            })
            .ok_or_else(|| QueryError("Invalid argument (os error 22)".to_owned()))
    }

    fn negotiate_size(&mut self, width: u32, height: u32) -> QueryResult<Vec<u8>> {
        if let Some(err) = &self.negotiation_error {
            return Err(err.clone());
        }
        let (max_width, max_height) = self.max_size;
        Ok(format_buffer(
            width.min(max_width),
            height.min(max_height),
            FourCC::YUYV.as_bytes(),
            u32::from(Colorspace::Rec709),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::query_formats;

    #[test]
    fn test_mock_source_defaults() {
        let source = MockSource::new();
        assert!(source.query_capability().is_ok());
        assert!(source.query_format(1).is_ok());
        assert!(source.query_format(2).is_err());
    }

    #[test]
    fn test_mock_source_with_formats() {
        let source = MockSource::new().with_formats(vec![(
            FourCC::RGB3,
            "24-bit RGB 8-8-8".to_owned(),
            false,
        )]);
        let formats = query_formats(&source).expect("enumeration should succeed");
        assert_eq!(formats.len(), 1);
        assert_eq!(formats.first().map(|f| f.pixelformat), Some(FourCC::RGB3));
    }

    #[test]
    fn test_put_cstring_keeps_terminator() {
        let buffer = capability_buffer(&"x".repeat(40), "card", "bus", 0, 0);
        assert_eq!(buffer.get(capability::DRIVER_LEN - 1), Some(&0));
        assert_eq!(
            buffer.get(..capability::DRIVER_LEN - 1),
            Some("x".repeat(15).as_bytes())
        );
    }
}
