//! INF1: scene graph
//!
//! ```text
//! 0x00: "INF1", size
//! 0x08: u16 flags (0), u16 0xFFFF
//! 0x0C: u32 matrix group count (0)
//! 0x10: u32 vertex count
//! 0x14: u32 hierarchy offset (0x18)
//! 0x18: (u16 type, u16 index) instructions, ending with End
//! ```

use crate::skeleton::HierarchyNode;
use j3d_common::{ByteStream, HierarchyNodeType};
use std::io::{self, Seek, Write};

const HIERARCHY_OFFSET: u32 = 0x18;

pub fn write_inf1<W: Write + Seek>(
    stream: &mut ByteStream<W>,
    hierarchy: &[HierarchyNode],
    vertex_count: u32,
) -> io::Result<u32> {
    let mut section = stream.begin_section(*b"INF1")?;

    section.write_u16(0)?;
    section.write_u16(0xFFFF)?;
    section.write_u32(0)?;
    section.write_u32(vertex_count)?;
    section.write_u32(HIERARCHY_OFFSET)?;

    for node in hierarchy {
        section.write_u16(node.kind as u16)?;
        section.write_u16(node.index)?;
    }
    if hierarchy.last().map(|n| n.kind) != Some(HierarchyNodeType::End) {
        section.write_u16(HierarchyNodeType::End as u16)?;
        section.write_u16(0)?;
    }

    section.finish()
}
