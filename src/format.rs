//! Decoding and enumeration of `VIDIOC_ENUM_FMT` replies.

use std::iter::FusedIterator;

use crate::layout::{decode_cstring, decode_fourcc, decode_u32_le, fmtdesc};
use crate::traits::{BufferSource, FormatDescription, QueryResult, Result};

/// Decode a single `v4l2_fmtdesc` buffer.
pub fn decode_format_description(buffer: &[u8]) -> Result<FormatDescription> {
    let flags = decode_u32_le(buffer, fmtdesc::FLAGS)?;

    Ok(FormatDescription {
        pixelformat: decode_fourcc(buffer, fmtdesc::PIXELFORMAT)?,
        description: decode_cstring(buffer, fmtdesc::DESCRIPTION, fmtdesc::DESCRIPTION_LEN)?,
        compressed: flags & fmtdesc::FLAG_COMPRESSED != 0,
    })
}

/// Lazy enumeration of format descriptions, one request per index.
///
/// The kernel ends the enumeration with the same error it uses for "not
/// supported", so a failing request only counts as the end once at least one
/// format was decoded. A failure at index 0 is yielded as an error instead.
/// A transient failure mid-way is indistinguishable from the end.
///
/// Decode failures are always yielded. The iterator is fused after the first
/// error or the end.
pub struct FormatIter<F> {
    fetch: F,
    index: u32,
    done: bool,
}

impl<F> FormatIter<F>
where
    F: FnMut(u32) -> QueryResult<Vec<u8>>,
{
    /// Start an enumeration at index 0.
    pub const fn new(fetch: F) -> Self {
        Self {
            fetch,
            index: 0,
            done: false,
        }
    }

    /// Index of the next request.
    pub const fn index(&self) -> u32 {
        self.index
    }
}

impl<F> Iterator for FormatIter<F>
where
    F: FnMut(u32) -> QueryResult<Vec<u8>>,
{
    type Item = Result<FormatDescription>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let index = self.index;
        let buffer = match (self.fetch)(index) {
            Ok(buffer) => buffer,
            Err(err) => {
                self.done = true;
                if index == 0 {
                    return Some(Err(err.into()));
                }
                log::debug!("format enumeration ended at index {index}: {err}");
                return None;
            }
        };

        match decode_format_description(&buffer) {
            Ok(desc) => {
                log::debug!("format {index}: {} ({})", desc.pixelformat, desc.description);
                match index.checked_add(1) {
                    Some(next) => self.index = next,
                    None => self.done = true,
                }
                Some(Ok(desc))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<F> FusedIterator for FormatIter<F> where F: FnMut(u32) -> QueryResult<Vec<u8>> {}

/// Collect every format description `fetch` yields, starting at index 0.
pub fn enumerate_formats<F>(fetch: F) -> Result<Vec<FormatDescription>>
where
    F: FnMut(u32) -> QueryResult<Vec<u8>>,
{
    FormatIter::new(fetch).collect()
}

/// Enumerate the capture formats of a source.
pub fn query_formats<S: BufferSource + ?Sized>(source: &S) -> Result<Vec<FormatDescription>> {
    enumerate_formats(|index| source.query_format(index))
}
