//! EVP1: skin envelopes
//!
//! ```text
//! 0x00: "EVP1", size
//! 0x08: u16 envelope count, u16 0xFFFF
//! 0x0C: u32 influence count table offset (u8 per envelope)
//! 0x10: u32 joint index table offset (u16)
//! 0x14: u32 weight table offset (f32)
//! 0x18: u32 inverse bind matrix offset (3x4 f32, row-major, per joint)
//! ```
//!
//! A model without envelopes leaves all four offsets zero.

use crate::envelope::EnvelopeData;
use j3d_common::ByteStream;
use std::io::{self, Seek, Write};

pub fn write_evp1<W: Write + Seek>(stream: &mut ByteStream<W>, data: &EnvelopeData) -> io::Result<u32> {
    let envelopes = data.envelopes();
    let count = u16::try_from(envelopes.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many envelopes for EVP1"))?;

    let mut section = stream.begin_section(*b"EVP1")?;
    section.write_u16(count)?;
    section.write_u16(0xFFFF)?;

    let counts_offset = section.reserve_offset()?;
    let indices_offset = section.reserve_offset()?;
    let weights_offset = section.reserve_offset()?;
    let matrices_offset = section.reserve_offset()?;

    if envelopes.is_empty() {
        return section.finish();
    }

    section.mark_offset(counts_offset)?;
    for envelope in envelopes {
        section.write_u8(envelope.len() as u8)?;
    }

    section.mark_offset(indices_offset)?;
    for envelope in envelopes {
        for &joint in &envelope.joints {
            section.write_u16(joint)?;
        }
    }

    section.mark_offset(weights_offset)?;
    for envelope in envelopes {
        for &weight in &envelope.weights {
            section.write_f32(weight)?;
        }
    }

    section.mark_offset(matrices_offset)?;
    for matrix in data.inverse_bind_matrices() {
        for row in 0..3 {
            for v in matrix.row(row).to_array() {
                section.write_f32(v)?;
            }
        }
    }

    section.finish()
}
