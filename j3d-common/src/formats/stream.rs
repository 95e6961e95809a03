//! Positioned big-endian output stream with section bookkeeping
//!
//! [`ByteStream`] tracks the absolute write position of any `Write + Seek`
//! sink so that alignment and offsets never need a seek to query.
//! [`SectionWriter`] borrows the stream for the lifetime of one section and
//! collects offset patches until [`SectionWriter::finish`] resolves them.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Seek, SeekFrom, Write};
use std::ops::{Deref, DerefMut};

/// Filler repeated byte-for-byte into alignment gaps
pub const PADDING_TEXT: &str = "This is padding data to alignm";

/// Alignment every section ends on
pub const DEFAULT_ALIGNMENT: u64 = 32;

/// Big-endian writer that knows its absolute position
pub struct ByteStream<W> {
    inner: W,
    position: u64,
    padding: Vec<u8>,
}

impl<W: Write + Seek> ByteStream<W> {
    /// Wrap a sink, starting at its current position
    pub fn new(mut inner: W) -> io::Result<Self> {
        let position = inner.stream_position()?;
        Ok(Self {
            inner,
            position,
            padding: PADDING_TEXT.as_bytes().to_vec(),
        })
    }

    /// Replace the alignment filler. An empty filler keeps the default.
    pub fn with_padding(mut self, padding: &str) -> Self {
        if !padding.is_empty() {
            self.padding = padding.as_bytes().to_vec();
        }
        self
    }

    /// Absolute position of the write cursor
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.inner.write_u8(value)?;
        self.position += 1;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.inner.write_u16::<BigEndian>(value)?;
        self.position += 2;
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> io::Result<()> {
        self.inner.write_i16::<BigEndian>(value)?;
        self.position += 2;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.inner.write_u32::<BigEndian>(value)?;
        self.position += 4;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> io::Result<()> {
        self.inner.write_f32::<BigEndian>(value)?;
        self.position += 4;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Advance to the next multiple of `alignment` (a power of two), computed
    /// from the absolute stream position, filling with the padding text.
    pub fn pad_to(&mut self, alignment: u64) -> io::Result<()> {
        debug_assert!(alignment.is_power_of_two());
        let aligned = (self.position + (alignment - 1)) & !(alignment - 1);
        let delta = (aligned - self.position) as usize;

        let filler: Vec<u8> = self.padding.iter().copied().cycle().take(delta).collect();
        self.write_bytes(&filler)
    }

    /// Overwrite a big-endian u32 at `location`, then restore the cursor
    pub fn patch_u32(&mut self, location: u64, value: u32) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(location))?;
        self.inner.write_u32::<BigEndian>(value)?;
        self.inner.seek(SeekFrom::Start(self.position))?;
        Ok(())
    }

    /// Write `position - relative_base` into the u32 field at
    /// `relative_base + field_location`.
    pub fn write_offset_backpatch(&mut self, relative_base: u64, field_location: u64) -> io::Result<()> {
        let value = offset_value(self.position, relative_base)?;
        self.patch_u32(relative_base + field_location, value)
    }

    /// Start a section: FourCC tag followed by a size placeholder
    pub fn begin_section(&mut self, fourcc: [u8; 4]) -> io::Result<SectionWriter<'_, W>> {
        let start = self.position;
        self.write_bytes(&fourcc)?;
        self.write_u32(0)?;

        Ok(SectionWriter {
            stream: self,
            start,
            patches: Vec::new(),
        })
    }
}

fn offset_value(position: u64, base: u64) -> io::Result<u32> {
    position
        .checked_sub(base)
        .and_then(|delta| u32::try_from(delta).ok())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("offset from {:#x} to {:#x} does not fit in u32", base, position),
            )
        })
}

/// Header field reserved for a section-relative offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "an offset field must be marked once its data is written"]
pub struct OffsetField {
    /// Location of the field, relative to the section start
    pub location: u64,
}

#[derive(Debug, Clone, Copy)]
struct PendingPatch {
    location: u64,
    value: u32,
}

/// One section being written
///
/// Dereferences to the underlying [`ByteStream`] for payload writes.
#[must_use = "a section must be finished to write its size"]
pub struct SectionWriter<'a, W: Write + Seek> {
    stream: &'a mut ByteStream<W>,
    start: u64,
    patches: Vec<PendingPatch>,
}

impl<W: Write + Seek> SectionWriter<'_, W> {
    /// Absolute position of the section's FourCC
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Cursor position relative to the section start
    pub fn relative_position(&self) -> u64 {
        self.stream.position - self.start
    }

    /// Write a zero placeholder for an offset field
    pub fn reserve_offset(&mut self) -> io::Result<OffsetField> {
        let location = self.relative_position();
        self.stream.write_u32(0)?;
        Ok(OffsetField { location })
    }

    /// Record that the data referenced by `field` starts at the cursor
    pub fn mark_offset(&mut self, field: OffsetField) -> io::Result<()> {
        let value = offset_value(self.stream.position, self.start)?;
        self.patches.push(PendingPatch {
            location: self.start + field.location,
            value,
        });
        Ok(())
    }

    /// Pad to 32 bytes, resolve pending offsets in order and write the
    /// section size. Returns the size.
    pub fn finish(mut self) -> io::Result<u32> {
        self.stream.pad_to(DEFAULT_ALIGNMENT)?;

        for patch in std::mem::take(&mut self.patches) {
            self.stream.patch_u32(patch.location, patch.value)?;
        }

        let size = offset_value(self.stream.position, self.start)?;
        self.stream.patch_u32(self.start + 4, size)?;
        Ok(size)
    }
}

impl<W: Write + Seek> Deref for SectionWriter<'_, W> {
    type Target = ByteStream<W>;

    fn deref(&self) -> &Self::Target {
        &*self.stream
    }
}

impl<W: Write + Seek> DerefMut for SectionWriter<'_, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.stream
    }
}
