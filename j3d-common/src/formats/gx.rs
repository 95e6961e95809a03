//! GX pipeline enumerations used by J3D sections

use crate::packing::{FIXED_POINT_EXP_NORMAL, FIXED_POINT_EXP_TEXCOORD};

/// Terminator of the VTX1 attribute format list
pub const GX_VA_NULL: u32 = 0xFF;

/// Vertex attribute kinds a model can carry
///
/// Discriminants are the GX attribute ids. Ordering follows the ids, which
/// is also the order tables are laid out in VTX1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum VertexAttribute {
    Position = 9,
    Normal = 10,
    Color0 = 11,
    Color1 = 12,
    TexCoord0 = 13,
    TexCoord1 = 14,
    TexCoord2 = 15,
    TexCoord3 = 16,
    TexCoord4 = 17,
    TexCoord5 = 18,
    TexCoord6 = 19,
    TexCoord7 = 20,
    /// Combined normal/tangent/bitangent; aliases the normal slot of a vertex
    Nbt = 25,
}

impl VertexAttribute {
    pub const COLORS: [VertexAttribute; 2] = [Self::Color0, Self::Color1];

    pub const TEX_COORDS: [VertexAttribute; 8] = [
        Self::TexCoord0,
        Self::TexCoord1,
        Self::TexCoord2,
        Self::TexCoord3,
        Self::TexCoord4,
        Self::TexCoord5,
        Self::TexCoord6,
        Self::TexCoord7,
    ];

    /// GX attribute id
    #[inline]
    pub fn gx_id(self) -> u32 {
        self as u32
    }

    /// Color channel `n` (0 or 1)
    pub fn color(n: usize) -> Option<Self> {
        Self::COLORS.get(n).copied()
    }

    /// Texture coordinate set `n` (0..8)
    pub fn tex_coord(n: usize) -> Option<Self> {
        Self::TEX_COORDS.get(n).copied()
    }

    pub fn color_slot(self) -> Option<usize> {
        Self::COLORS.iter().position(|&a| a == self)
    }

    pub fn tex_coord_slot(self) -> Option<usize> {
        Self::TEX_COORDS.iter().position(|&a| a == self)
    }

    /// Location of this attribute's data offset in the VTX1 header
    pub fn vtx1_offset_field(self) -> u64 {
        match self {
            Self::Position => 0x0C,
            Self::Normal => 0x10,
            Self::Nbt => 0x14,
            Self::Color0 | Self::Color1 => 0x18 + self.color_slot().unwrap_or(0) as u64 * 4,
            _ => 0x20 + self.tex_coord_slot().unwrap_or(0) as u64 * 4,
        }
    }

    pub fn component_count(self) -> GxComponentCount {
        match self {
            Self::Position => GxComponentCount::POSITION_XYZ,
            Self::Normal => GxComponentCount::NORMAL_XYZ,
            Self::Nbt => GxComponentCount::NORMAL_NBT,
            Self::Color0 | Self::Color1 => GxComponentCount::COLOR_RGBA,
            _ => GxComponentCount::TEX_COORD_ST,
        }
    }

    pub fn component_type(self) -> GxComponentType {
        match self {
            Self::Position => GxComponentType::Float32,
            Self::Normal | Self::Nbt => GxComponentType::Signed16,
            Self::Color0 | Self::Color1 => GxComponentType::Rgba8,
            _ => GxComponentType::Signed16,
        }
    }

    /// Fixed-point fraction bits of the stored components
    pub fn fraction_bits(self) -> u8 {
        match self {
            Self::Normal | Self::Nbt => FIXED_POINT_EXP_NORMAL,
            Self::Position | Self::Color0 | Self::Color1 => 0,
            _ => FIXED_POINT_EXP_TEXCOORD,
        }
    }
}

/// Component count field of a VTX1 format entry
///
/// The meaning of the raw value depends on the attribute, so several
/// names share a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GxComponentCount(pub u32);

impl GxComponentCount {
    pub const POSITION_XYZ: Self = Self(1);
    pub const NORMAL_XYZ: Self = Self(0);
    pub const NORMAL_NBT: Self = Self(1);
    pub const COLOR_RGBA: Self = Self(1);
    pub const TEX_COORD_ST: Self = Self(1);
}

/// Component type field of a VTX1 format entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum GxComponentType {
    Unsigned8 = 0,
    Signed8 = 1,
    Unsigned16 = 2,
    Signed16 = 3,
    Float32 = 4,
    Rgba8 = 5,
}

/// Primitive topology, as written in shape display lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GxPrimitiveType {
    Quads = 0x80,
    Triangles = 0x90,
    TriangleStrip = 0x98,
    TriangleFan = 0xA0,
    Lines = 0xA8,
    LineStrip = 0xB0,
    Points = 0xB8,
}

/// INF1 scene-graph instruction opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum HierarchyNodeType {
    End = 0x00,
    Down = 0x01,
    Up = 0x02,
    Joint = 0x10,
    Material = 0x11,
    Shape = 0x12,
}
