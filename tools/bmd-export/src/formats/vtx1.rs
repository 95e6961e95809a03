//! VTX1: vertex attribute tables
//!
//! ```text
//! 0x00: "VTX1", size
//! 0x08: u32 format list offset (0x40)
//! 0x0C: u32 x 13 data offsets (position, normal, NBT, color0-1, texcoord0-7)
//! 0x40: format list, Null-terminated, padded to 16
//! ```
//!
//! Each table starts at its offset and is padded to 32. Absent tables keep
//! a zero offset. The NBT table has no format entry.

use crate::vertex::{NbtRecord, VertexData};
use glam::Vec4;
use j3d_common::{
    pack_color_rgba8, to_fixed_point, ByteStream, GxComponentCount, OffsetField, SectionWriter,
    VertexAttribute, FIXED_POINT_EXP_NORMAL, GX_VA_NULL,
};
use std::io::{self, Seek, Write};

const FORMAT_LIST_OFFSET: u32 = 0x40;
const DATA_OFFSET_COUNT: usize = 13;

pub fn write_vtx1<W: Write + Seek>(stream: &mut ByteStream<W>, data: &VertexData) -> io::Result<u32> {
    let mut section = stream.begin_section(*b"VTX1")?;
    section.write_u32(FORMAT_LIST_OFFSET)?;
    for _ in 0..DATA_OFFSET_COUNT {
        section.write_u32(0)?;
    }

    for (attribute, _) in data.attributes() {
        section.write_u32(attribute.gx_id())?;
        section.write_u32(attribute.component_count().0)?;
        section.write_u32(attribute.component_type() as u32)?;
        section.write_u8(attribute.fraction_bits())?;
        section.write_u8(0xFF)?;
        section.write_u16(0xFFFF)?;
    }

    section.write_u32(GX_VA_NULL)?;
    section.write_u32(GxComponentCount::POSITION_XYZ.0)?;
    section.write_u32(0)?;
    section.write_u8(0)?;
    section.write_u8(0xFF)?;
    section.write_u16(0xFFFF)?;
    section.pad_to(16)?;

    for (attribute, values) in data.attributes() {
        section.mark_offset(OffsetField {
            location: attribute.vtx1_offset_field(),
        })?;
        for &value in values {
            write_value(&mut section, attribute, value)?;
        }
        section.pad_to(32)?;
    }

    let nbt = data.nbt_records();
    if !nbt.is_empty() {
        section.mark_offset(OffsetField {
            location: VertexAttribute::Nbt.vtx1_offset_field(),
        })?;
        for record in nbt {
            write_nbt(&mut section, record)?;
        }
        section.pad_to(32)?;
    }

    section.finish()
}

fn write_value<W: Write + Seek>(
    section: &mut SectionWriter<'_, W>,
    attribute: VertexAttribute,
    value: Vec4,
) -> io::Result<()> {
    match attribute {
        VertexAttribute::Position => {
            section.write_f32(value.x)?;
            section.write_f32(value.y)?;
            section.write_f32(value.z)?;
        }
        VertexAttribute::Normal | VertexAttribute::Nbt => {
            let bits = attribute.fraction_bits();
            section.write_i16(to_fixed_point(value.x, bits))?;
            section.write_i16(to_fixed_point(value.y, bits))?;
            section.write_i16(to_fixed_point(value.z, bits))?;
        }
        VertexAttribute::Color0 | VertexAttribute::Color1 => {
            section.write_bytes(&pack_color_rgba8(value.x, value.y, value.z, value.w))?;
        }
        _ => {
            let bits = attribute.fraction_bits();
            section.write_i16(to_fixed_point(value.x, bits))?;
            section.write_i16(to_fixed_point(value.y, bits))?;
        }
    }
    Ok(())
}

fn write_nbt<W: Write + Seek>(section: &mut SectionWriter<'_, W>, record: &NbtRecord) -> io::Result<()> {
    for v in [record.normal, record.tangent, record.bitangent] {
        for c in v.to_array() {
            section.write_i16(to_fixed_point(c, FIXED_POINT_EXP_NORMAL))?;
        }
    }
    Ok(())
}
