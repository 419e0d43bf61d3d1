//! Webcam-Probe: typed decoding of V4L2 device descriptors
//!
//! This library turns the raw buffers returned by `VIDIOC_QUERYCAP`,
//! `VIDIOC_ENUM_FMT` and `VIDIOC_S_FMT` into strongly-typed records. The
//! requests themselves go through the [`BufferSource`] trait, so the decoders
//! run the same against real hardware and mock sources.

pub mod capability;
pub mod device;
pub mod format;
pub mod image;
pub mod layout;
pub mod probe;
pub mod traits;

#[cfg(test)]
pub mod mock;

pub use capability::{decode_capabilities, query_capabilities};
pub use device::V4L2Source;
pub use format::{decode_format_description, enumerate_formats, query_formats, FormatIter};
pub use image::{decode_image_format, negotiate_format};
pub use probe::{probe, probe_source, Probe};
pub use traits::{
    BufferSource, CameraError, Colorspace, DecodeError, DeviceCapabilities, FormatDescription,
    FourCC, ImageFormat, QueryError, QueryResult, Result,
};
