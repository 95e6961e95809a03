//! J3D file header
//!
//! # Layout
//! ```text
//! 0x00: magic "J3D2"
//! 0x04: file type ("bmd3")
//! 0x08: file size u32 (backpatched)
//! 0x0C: section count u32
//! 0x10: "SVR3"
//! 0x14: 12 bytes of 0xFF
//! ```

use super::stream::ByteStream;
use std::io::{self, Seek, Write};

pub const J3D_MAGIC: [u8; 4] = *b"J3D2";
pub const BMD_FILE_TYPE: [u8; 4] = *b"bmd3";
pub const FILE_HEADER_SIZE: u64 = 0x20;

const SUBVERSION_TAG: [u8; 4] = *b"SVR3";

/// Write the file header with a size placeholder. Returns the header start.
pub fn write_file_header<W: Write + Seek>(
    stream: &mut ByteStream<W>,
    file_type: [u8; 4],
    section_count: u32,
) -> io::Result<u64> {
    let start = stream.position();
    stream.write_bytes(&J3D_MAGIC)?;
    stream.write_bytes(&file_type)?;
    stream.write_u32(0)?;
    stream.write_u32(section_count)?;
    stream.write_bytes(&SUBVERSION_TAG)?;
    stream.write_bytes(&[0xFF; 12])?;
    Ok(start)
}

/// Backpatch the total file size once every section is written
pub fn finish_file_header<W: Write + Seek>(stream: &mut ByteStream<W>, start: u64) -> io::Result<u32> {
    let size = u32::try_from(stream.position() - start)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "file exceeds 4 GiB"))?;
    stream.patch_u32(start + 8, size)?;
    Ok(size)
}
