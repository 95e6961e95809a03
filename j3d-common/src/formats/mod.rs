//! J3D binary container building blocks
//!
//! Every J3D file is a fixed header followed by a sequence of sections.
//! Each section starts with a FourCC tag and a self-inclusive size, carries
//! section-relative offsets that are backpatched once the payload is placed,
//! and ends aligned to 32 bytes with a repeating ASCII filler.
//!
//! All multi-byte values are big-endian.

mod gx;
mod header;
mod name_table;
mod stream;

pub use gx::*;
pub use header::*;
pub use name_table::JutNameTable;
pub use stream::{ByteStream, OffsetField, SectionWriter, DEFAULT_ALIGNMENT, PADDING_TEXT};
