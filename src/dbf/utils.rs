//! Low-level byte reading utilities

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use super::types::error::{DbfError, Result};

/// Read exactly `N` bytes, naming `context` in the error on a short read.
pub fn read_array<const N: usize>(reader: &mut impl Read, context: &str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|e| DbfError::from_io(e, context))?;
    Ok(buf)
}

pub fn read_u8(reader: &mut impl Read, context: &str) -> Result<u8> {
    reader.read_u8().map_err(|e| DbfError::from_io(e, context))
}

/// Read a little-endian u16; all DBF multi-byte integers are little-endian.
pub fn read_u16(reader: &mut impl Read, context: &str) -> Result<u16> {
    reader
        .read_u16::<LittleEndian>()
        .map_err(|e| DbfError::from_io(e, context))
}

pub fn read_u32(reader: &mut impl Read, context: &str) -> Result<u32> {
    reader
        .read_u32::<LittleEndian>()
        .map_err(|e| DbfError::from_io(e, context))
}

/// Strip trailing NUL padding.
pub fn trim_nul_end(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}
