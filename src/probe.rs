//! Open a capture device and report its negotiated configuration.

use std::path::{Path, PathBuf};

use crate::capability::query_capabilities;
use crate::device::V4L2Source;
use crate::format::query_formats;
use crate::image::negotiate_format;
use crate::traits::{
    BufferSource, CameraError, DecodeError, DeviceCapabilities, FormatDescription, ImageFormat,
};

/// Everything learned while probing a capture device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// Device path.
    pub path: PathBuf,
    /// Reported capabilities.
    pub capabilities: DeviceCapabilities,
    /// Supported capture formats, in driver order.
    pub formats: Vec<FormatDescription>,
    /// Format applied after requesting the size.
    pub format: ImageFormat,
}

/// Open the device at `path`, check it can capture, enumerate its formats and
/// request `width` x `height`.
pub fn probe<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Probe, CameraError> {
    let mut source = V4L2Source::open(path)?;
    let path = source.path().to_path_buf();
    probe_source(&mut source, path, width, height)
}

/// Probe an already opened source.
pub fn probe_source<S: BufferSource + ?Sized>(
    source: &mut S,
    path: PathBuf,
    width: u32,
    height: u32,
) -> Result<Probe, CameraError> {
    let query_err = |operation: &'static str, path: &Path| {
        let path = path.to_path_buf();
        move |source: DecodeError| CameraError::Query {
            operation,
            path,
            source,
        }
    };

    let capabilities =
        query_capabilities(&*source).map_err(query_err("getting capabilities of", &path))?;
    if !capabilities.can_capture {
        return Err(CameraError::NotCaptureDevice(path));
    }
    log::info!(
        "{}: {} ({}, {}), driver version {:?}",
        path.display(),
        capabilities.card,
        capabilities.driver,
        capabilities.bus_info,
        capabilities.kernel_version()
    );

    let formats =
        query_formats(&*source).map_err(query_err("getting supported formats from", &path))?;
    log::info!("{}: {} capture formats", path.display(), formats.len());

    let format =
        negotiate_format(source, width, height).map_err(query_err("resizing", &path))?;
    log::info!(
        "{}: resized to {}x{} {} ({})",
        path.display(),
        format.width,
        format.height,
        format.pixelformat,
        format.colorspace
    );

    Ok(Probe {
        path,
        capabilities,
        formats,
        format,
    })
}
