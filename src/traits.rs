//! Core records, errors and the buffer-source seam for V4L2 descriptor decoding.

use std::fmt;
use std::path::PathBuf;

/// Pixel format four-character code (e.g., YUYV, MJPG, RGB3).
///
/// Always exactly four bytes. The bytes are kept verbatim, in wire order, and are
/// not required to be printable.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Create a new `FourCC` from a 4-byte array.
    #[must_use]
    pub const fn new(code: &[u8; 4]) -> Self {
        Self(*code)
    }

    /// The raw code bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The code as the little-endian `u32` the kernel stores.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    /// YUYV pixel format (4:2:2 packed).
    pub const YUYV: Self = Self::new(b"YUYV");
    /// MJPEG pixel format (Motion JPEG).
    pub const MJPG: Self = Self::new(b"MJPG");
    /// RGB3 pixel format (24-bit RGB).
    pub const RGB3: Self = Self::new(b"RGB3");
}

impl From<v4l::FourCC> for FourCC {
    fn from(fourcc: v4l::FourCC) -> Self {
        Self(fourcc.repr)
    }
}

impl From<FourCC> for v4l::FourCC {
    fn from(fourcc: FourCC) -> Self {
        Self::new(&fourcc.0)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => f.write_str(s),
            // Formatting must not fail, so fall back to an escaped rendering.
            Err(_) => self
                .0
                .iter()
                .try_for_each(|b| write!(f, "{}", b.escape_ascii())),
        }
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FourCC")
            .field(&format_args!("{}", self.0.escape_ascii()))
            .finish()
    }
}

/// Identity and capability flags reported by `VIDIOC_QUERYCAP`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Driver name.
    pub driver: String,
    /// Card/device name.
    pub card: String,
    /// Bus information.
    pub bus_info: String,
    /// Driver version, packed as `KERNEL_VERSION(major, minor, patch)`.
    pub version: u32,
    /// Whether the device can capture video.
    pub can_capture: bool,
    /// Whether the device supports streaming I/O.
    pub can_stream: bool,
}

impl DeviceCapabilities {
    /// Split `version` into `(major, minor, patch)`.
    #[must_use]
    pub const fn kernel_version(&self) -> (u8, u8, u8) {
        let [patch, minor, major, _] = self.version.to_le_bytes();
        (major, minor, patch)
    }
}

/// One entry of the `VIDIOC_ENUM_FMT` enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescription {
    /// Pixel format code.
    pub pixelformat: FourCC,
    /// Human-readable description, e.g. "YUYV 4:2:2".
    pub description: String,
    /// Whether the driver flags this format as compressed.
    pub compressed: bool,
}

/// Single-planar image format negotiated through `VIDIOC_S_FMT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFormat {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel format.
    pub pixelformat: FourCC,
    /// Colorspace reported by the driver.
    pub colorspace: Colorspace,
}

/// Colorspace of an image format.
///
/// The discriminants are the wire values; the order must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Colorspace {
    /// ITU-R 601, broadcast NTSC/PAL.
    Smpte170m = 0,
    /// 1125-line (US) HDTV.
    Smpte240m = 1,
    /// HD and modern captures.
    Rec709 = 2,
    /// Broken BT878 extents (601, luma range 16-253 instead of 16-235).
    Bt878 = 3,
    /// System M, 601 extents.
    SystemM = 4,
    /// System B/G, 601 extents.
    SystemBg = 5,
    /// Unspecified chromaticities, full 0-255 range on each `Y'CbCr` component.
    Jpeg = 6,
    /// `sRGB`.
    Srgb = 7,
}

impl Colorspace {
    /// Every member, in wire order.
    pub const ALL: [Self; 8] = [
        Self::Smpte170m,
        Self::Smpte240m,
        Self::Rec709,
        Self::Bt878,
        Self::SystemM,
        Self::SystemBg,
        Self::Jpeg,
        Self::Srgb,
    ];

    /// Protocol name of the colorspace.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Smpte170m => "SMPTE170M",
            Self::Smpte240m => "SMPTE240M",
            Self::Rec709 => "REC709",
            Self::Bt878 => "BT878",
            Self::SystemM => "SYSTEM_M",
            Self::SystemBg => "SYSTEM_BG",
            Self::Jpeg => "JPEG",
            Self::Srgb => "SRGB",
        }
    }
}

impl TryFrom<u32> for Colorspace {
    type Error = DecodeError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::Smpte170m),
            1 => Ok(Self::Smpte240m),
            2 => Ok(Self::Rec709),
            3 => Ok(Self::Bt878),
            4 => Ok(Self::SystemM),
            5 => Ok(Self::SystemBg),
            6 => Ok(Self::Jpeg),
            7 => Ok(Self::Srgb),
            unknown => Err(DecodeError::UnknownColorspace(unknown)),
        }
    }
}

impl From<Colorspace> for u32 {
    fn from(colorspace: Colorspace) -> Self {
        colorspace as Self
    }
}

impl fmt::Display for Colorspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by a [`BufferSource`], carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct QueryError(pub String);

impl From<std::io::Error> for QueryError {
    fn from(err: std::io::Error) -> Self {
        Self(err.to_string())
    }
}

/// Error type for descriptor decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A fixed-offset read ran past the end of the buffer.
    #[error("truncated buffer: {width} bytes at offset {offset} exceed length {len}")]
    TruncatedBuffer {
        /// Offset of the attempted read.
        offset: usize,
        /// Width of the attempted read.
        width: usize,
        /// Actual buffer length.
        len: usize,
    },
    /// The buffer source itself failed.
    #[error(transparent)]
    QueryFailed(#[from] QueryError),
    /// Colorspace value outside the known set.
    #[error("unknown colorspace {0}")]
    UnknownColorspace(u32),
}

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Result type for buffer source requests.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Error type for opening and probing a camera device.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// Device path does not exist.
    #[error("Error opening {}: path not exists", .0.display())]
    NotFound(PathBuf),
    /// Path exists but is not a character device.
    #[error("Error opening {}: not a device", .0.display())]
    NotADevice(PathBuf),
    /// The operating system refused to open the device.
    #[error("Error opening {}: {source}", path.display())]
    Open {
        /// Device path.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },
    /// Device does not advertise video capture.
    #[error("Error opening {}: not a capturing device", .0.display())]
    NotCaptureDevice(PathBuf),
    /// A query or its decoding failed.
    #[error("Error {operation} {}: {source}", path.display())]
    Query {
        /// What was being done, e.g. "getting capabilities of".
        operation: &'static str,
        /// Device path.
        path: PathBuf,
        /// Decode failure.
        source: DecodeError,
    },
}

/// Raw buffer source backing the decoders.
///
/// Each request returns the kernel struct as a byte buffer, or the failure
/// reported by the device.
pub trait BufferSource {
    /// Issue `VIDIOC_QUERYCAP`.
    fn query_capability(&self) -> QueryResult<Vec<u8>>;

    /// Issue `VIDIOC_ENUM_FMT` for the capture format at `index`.
    fn query_format(&self, index: u32) -> QueryResult<Vec<u8>>;

    /// Issue `VIDIOC_S_FMT` requesting `width` x `height`. Returns the format the
    /// driver actually applied.
    fn negotiate_size(&mut self, width: u32, height: u32) -> QueryResult<Vec<u8>>;
}
