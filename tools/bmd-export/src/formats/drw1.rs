//! DRW1: draw matrix table
//!
//! ```text
//! 0x00: "DRW1", size
//! 0x08: u16 entry count, u16 0xFFFF
//! 0x0C: u32 weighted flag table offset (u8 per entry)
//! 0x10: u32 index table offset (u16 per entry)
//! ```
//!
//! Unweighted entries index joints, weighted entries index envelopes.

use crate::envelope::EnvelopeData;
use j3d_common::ByteStream;
use std::io::{self, Seek, Write};

pub fn write_drw1<W: Write + Seek>(stream: &mut ByteStream<W>, data: &EnvelopeData) -> io::Result<u32> {
    let count = u16::try_from(data.draw_matrix_count())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many draw matrices for DRW1"))?;

    let mut section = stream.begin_section(*b"DRW1")?;
    section.write_u16(count)?;
    section.write_u16(0xFFFF)?;

    let flags_offset = section.reserve_offset()?;
    let indices_offset = section.reserve_offset()?;

    section.mark_offset(flags_offset)?;
    for matrix in data.draw_matrices() {
        section.write_u8(matrix.is_weighted() as u8)?;
    }
    section.pad_to(2)?;

    section.mark_offset(indices_offset)?;
    for matrix in data.draw_matrices() {
        section.write_u16(matrix.index())?;
    }

    section.finish()
}
