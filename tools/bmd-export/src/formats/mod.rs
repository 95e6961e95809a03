//! BMD section writers
//!
//! Sections are written in a fixed order behind the file header. Each
//! writer borrows the stream for its whole section; offsets inside a
//! section are resolved when the section finishes.

mod drw1;
mod evp1;
mod inf1;
mod jnt1;
mod tex1;
mod vtx1;

pub use drw1::write_drw1;
pub use evp1::write_evp1;
pub use inf1::write_inf1;
pub use jnt1::write_jnt1;
pub use tex1::write_tex1;
pub use vtx1::write_vtx1;

use crate::model::Model;
use j3d_common::{finish_file_header, write_file_header, ByteStream, BMD_FILE_TYPE};
use std::io::{self, Seek, Write};

/// Sections behind the file header
pub const SECTION_COUNT: u32 = 6;

/// Write a complete BMD file. Returns the file size.
pub fn write_bmd<W: Write + Seek>(stream: &mut ByteStream<W>, model: &Model) -> io::Result<u32> {
    let start = write_file_header(stream, BMD_FILE_TYPE, SECTION_COUNT)?;

    write_inf1(stream, &model.hierarchy(), model.vertex_count())?;
    write_jnt1(stream, model.skeleton.joints())?;
    write_evp1(stream, &model.envelopes)?;
    write_drw1(stream, &model.envelopes)?;
    write_vtx1(stream, &model.vertex_data)?;
    write_tex1(stream, &model.texture_names)?;

    finish_file_header(stream, start)
}
