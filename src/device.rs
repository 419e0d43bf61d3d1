//! V4L2 buffer source issuing raw ioctls through the v4l crate.
#![allow(unsafe_code)]

use std::io;
use std::os::raw::c_void;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use v4l::v4l2;
use v4l::v4l2::vidioc;
use v4l::Device;

use crate::layout::{self, capability, encode_u32_le, fmtdesc, format};
use crate::traits::{BufferSource, CameraError, Colorspace, FourCC, QueryError, QueryResult};

/// Buffer source backed by an open `/dev/video*` node.
pub struct V4L2Source {
    device: Device,
    path: PathBuf,
}

impl V4L2Source {
    /// Open a V4L2 device node by path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let path = path.as_ref().to_path_buf();

        let metadata =
            std::fs::metadata(&path).map_err(|_| CameraError::NotFound(path.clone()))?;
        if !metadata.file_type().is_char_device() {
            return Err(CameraError::NotADevice(path));
        }

        let device = Device::with_path(&path).map_err(|source| CameraError::Open {
            path: path.clone(),
            source,
        })?;
        log::debug!("opened {}", path.display());

        Ok(Self { device, path })
    }

    /// Open a V4L2 device by index (e.g., 0 for /dev/video0).
    pub fn open_index(index: u32) -> Result<Self, CameraError> {
        Self::open(format!("/dev/video{index}"))
    }

    /// Path the device was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `request` against `buffer`, retrying while interrupted.
    fn ioctl(&self, request: vidioc::_IOC_TYPE, buffer: &mut [u8]) -> QueryResult<()> {
        let fd = self.device.handle().fd();
        loop {
            // SAFETY: `buffer` is exclusively borrowed and sized to the struct the
            // request encodes, so the kernel only writes within it.
            let result =
                unsafe { v4l2::ioctl(fd, request, buffer.as_mut_ptr().cast::<c_void>()) };
            match result {
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                other => return other.map_err(QueryError::from),
            }
        }
    }
}

/// Pre-filling a request buffer can only fail on a layout bug.
fn fill(buffer: &mut [u8], offset: usize, value: u32) -> QueryResult<()> {
    encode_u32_le(buffer, offset, value).map_err(|err| QueryError(err.to_string()))
}

impl BufferSource for V4L2Source {
    fn query_capability(&self) -> QueryResult<Vec<u8>> {
        let mut buffer = vec![0u8; capability::SIZE];
        self.ioctl(vidioc::VIDIOC_QUERYCAP, &mut buffer)?;
        Ok(buffer)
    }

    fn query_format(&self, index: u32) -> QueryResult<Vec<u8>> {
        let mut buffer = vec![0u8; fmtdesc::SIZE];
        fill(&mut buffer, fmtdesc::INDEX, index)?;
        fill(&mut buffer, fmtdesc::TYPE, layout::BUF_TYPE_VIDEO_CAPTURE)?;
        self.ioctl(vidioc::VIDIOC_ENUM_FMT, &mut buffer)?;
        Ok(buffer)
    }

    fn negotiate_size(&mut self, width: u32, height: u32) -> QueryResult<Vec<u8>> {
        let mut buffer = vec![0u8; format::SIZE];
        let pix = format::UNION;
        fill(&mut buffer, format::TYPE, layout::BUF_TYPE_VIDEO_CAPTURE)?;
        fill(&mut buffer, pix + format::WIDTH, width)?;
        fill(&mut buffer, pix + format::HEIGHT, height)?;
        fill(&mut buffer, pix + format::PIXELFORMAT, FourCC::YUYV.to_u32())?;
        fill(
            &mut buffer,
            pix + format::COLORSPACE,
            u32::from(Colorspace::Rec709),
        )?;
        self.ioctl(vidioc::VIDIOC_S_FMT, &mut buffer)?;
        Ok(buffer)
    }
}
