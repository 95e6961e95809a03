//! Hashed name directory (JUTNameTab)
//!
//! # Layout
//! ```text
//! 0x00: count u16
//! 0x02: padding u16 (0xFFFF)
//! 0x04: entries (count × { hash u16, offset u16 })
//! ....: NUL-terminated names
//! ```
//!
//! Entry offsets are relative to the start of the table. Names keep their
//! insertion order; a consumer looks a name up by comparing hashes first.

use super::stream::ByteStream;
use std::io::{self, Seek, Write};

#[derive(Debug, Default, Clone)]
pub struct JutNameTable {
    names: Vec<String>,
}

impl JutNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_name(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Key code used by the runtime for name lookups
    pub fn hash_name(name: &str) -> u16 {
        name.bytes()
            .fold(0u16, |hash, byte| hash.wrapping_mul(3).wrapping_add(byte as u16))
    }

    /// Serialized size in bytes
    pub fn byte_len(&self) -> usize {
        4 + self.names.len() * 4 + self.names.iter().map(|n| n.len() + 1).sum::<usize>()
    }

    pub fn write<W: Write + Seek>(&self, stream: &mut ByteStream<W>) -> io::Result<()> {
        let count = u16::try_from(self.names.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("name table holds {} names, maximum is {}", self.names.len(), u16::MAX),
            )
        })?;
        if self.byte_len() > u16::MAX as usize + 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("name table is {} bytes, offsets are limited to u16", self.byte_len()),
            ));
        }

        stream.write_u16(count)?;
        stream.write_u16(u16::MAX)?;

        let mut offset = 4 + self.names.len() * 4;
        for name in &self.names {
            stream.write_u16(Self::hash_name(name))?;
            stream.write_u16(offset as u16)?;
            offset += name.len() + 1;
        }

        for name in &self.names {
            stream.write_bytes(name.as_bytes())?;
            stream.write_u8(0)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_hash_name() {
        assert_eq!(JutNameTable::hash_name(""), 0);
        assert_eq!(JutNameTable::hash_name("a"), 97);
        // ('a' * 3) + 'b' = 291 + 98
        assert_eq!(JutNameTable::hash_name("ab"), 389);
    }

    #[test]
    fn test_hash_wraps() {
        let long = "z".repeat(64);
        // Must not overflow-panic in debug builds
        let _ = JutNameTable::hash_name(&long);
    }

    #[test]
    fn test_table_layout() {
        let mut table = JutNameTable::new();
        table.add_name("root");
        table.add_name("arm");

        let mut stream = ByteStream::new(Cursor::new(Vec::new())).unwrap();
        table.write(&mut stream).unwrap();
        let bytes = stream.into_inner().into_inner();

        assert_eq!(bytes.len(), table.byte_len());
        assert_eq!(&bytes[0..4], &[0x00, 0x02, 0xFF, 0xFF]);

        let hash0 = u16::from_be_bytes([bytes[4], bytes[5]]);
        let off0 = u16::from_be_bytes([bytes[6], bytes[7]]);
        let off1 = u16::from_be_bytes([bytes[10], bytes[11]]);
        assert_eq!(hash0, JutNameTable::hash_name("root"));
        assert_eq!(off0, 12);
        assert_eq!(off1, 17);
        assert_eq!(&bytes[12..17], b"root\0");
        assert_eq!(&bytes[17..21], b"arm\0");
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut table = JutNameTable::new();
        table.add_name("zeta");
        table.add_name("alpha");
        assert_eq!(table.names(), &["zeta".to_string(), "alpha".to_string()]);
    }
}
