//! Decoding of `VIDIOC_S_FMT` replies.

use crate::layout::{decode_fourcc, decode_u32_le, field, format};
use crate::traits::{BufferSource, Colorspace, ImageFormat, Result};

/// Decode the single-planar pixel format held in a `v4l2_format` buffer.
///
/// Only `width`, `height`, `pixelformat` and `colorspace` are read from the
/// union; `field`, `bytesperline` and `sizeimage` are skipped. A colorspace value
/// outside [`Colorspace`] is rejected.
pub fn decode_image_format(buffer: &[u8]) -> Result<ImageFormat> {
    let pix = field(buffer, format::UNION, format::PIX_LEN)?;

    let colorspace = decode_u32_le(pix, format::COLORSPACE)?;
    let image = ImageFormat {
        width: decode_u32_le(pix, format::WIDTH)?,
        height: decode_u32_le(pix, format::HEIGHT)?,
        pixelformat: decode_fourcc(pix, format::PIXELFORMAT)?,
        colorspace: Colorspace::try_from(colorspace)?,
    };

    log::debug!("decoded image format: {image:?}");
    Ok(image)
}

/// Ask a source for `width` x `height` and decode what the driver applied.
///
/// Drivers may adjust the size; a mismatch is logged, not rejected.
pub fn negotiate_format<S: BufferSource + ?Sized>(
    source: &mut S,
    width: u32,
    height: u32,
) -> Result<ImageFormat> {
    let buffer = source.negotiate_size(width, height)?;
    let image = decode_image_format(&buffer)?;

    if image.width != width || image.height != height {
        log::warn!(
            "requested {width}x{height}, driver applied {}x{}",
            image.width,
            image.height
        );
    }

    Ok(image)
}
