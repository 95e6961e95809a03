//! TEX1: texture directory
//!
//! ```text
//! 0x00: "TEX1", size
//! 0x08: u16 texture count, u16 0xFFFF
//! 0x0C: u32 image header offset (0x20)
//! 0x10: u32 name table offset
//! ```
//!
//! Only the name directory is written; image headers and pixel data are
//! not produced.

use j3d_common::{ByteStream, JutNameTable, OffsetField};
use std::io::{self, Seek, Write};

const IMAGE_HEADER_OFFSET: u32 = 0x20;

pub fn write_tex1<W: Write + Seek>(stream: &mut ByteStream<W>, names: &[String]) -> io::Result<u32> {
    let count = u16::try_from(names.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many textures for TEX1"))?;

    let mut section = stream.begin_section(*b"TEX1")?;
    section.write_u16(count)?;
    section.write_u16(0xFFFF)?;
    section.write_u32(IMAGE_HEADER_OFFSET)?;
    let names_offset: OffsetField = section.reserve_offset()?;
    section.pad_to(32)?;

    let mut table = JutNameTable::new();
    for name in names {
        table.add_name(name.as_str());
    }

    section.mark_offset(names_offset)?;
    table.write(&mut *section)?;

    section.finish()
}
