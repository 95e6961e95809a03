//! JNT1: joint table
//!
//! ```text
//! 0x00: "JNT1", size
//! 0x08: u16 joint count, u16 0xFFFF
//! 0x0C: u32 joint data offset
//! 0x10: u32 remap table offset
//! 0x14: u32 name table offset
//! ```
//!
//! Joint entries are 0x40 bytes each.

use crate::skeleton::Joint;
use j3d_common::{ByteStream, JutNameTable};
use std::io::{self, Seek, Write};

pub const JOINT_ENTRY_SIZE: u64 = 0x40;

pub fn write_jnt1<W: Write + Seek>(stream: &mut ByteStream<W>, joints: &[Joint]) -> io::Result<u32> {
    let count = u16::try_from(joints.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many joints for JNT1"))?;

    let mut section = stream.begin_section(*b"JNT1")?;
    section.write_u16(count)?;
    section.write_u16(0xFFFF)?;

    let data_offset = section.reserve_offset()?;
    let remap_offset = section.reserve_offset()?;
    let names_offset = section.reserve_offset()?;

    let mut names = JutNameTable::new();

    section.mark_offset(data_offset)?;
    for joint in joints {
        names.add_name(joint.name.as_str());

        section.write_u16(joint.matrix_type)?;
        section.write_u8(joint.no_inherit_scale as u8)?;
        section.write_u8(0xFF)?;

        for v in joint.scale.to_array() {
            section.write_f32(v)?;
        }
        for angle in joint.rotation_s16() {
            section.write_i16(angle)?;
        }
        section.write_u16(0xFFFF)?;
        for v in joint.translation.to_array() {
            section.write_f32(v)?;
        }

        section.write_f32(joint.bounds.radius)?;
        for v in joint.bounds.min.to_array() {
            section.write_f32(v)?;
        }
        for v in joint.bounds.max.to_array() {
            section.write_f32(v)?;
        }
    }

    // Identity remap
    section.mark_offset(remap_offset)?;
    for i in 0..count {
        section.write_u16(i)?;
    }
    section.pad_to(4)?;

    section.mark_offset(names_offset)?;
    names.write(&mut *section)?;

    section.finish()
}
