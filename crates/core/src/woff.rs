//! WOFF 1.0 decoding.
//!
//! A WOFF file is an sfnt whose tables are individually zlib-compressed.
//! Decoding inflates every table and re-assembles a plain sfnt.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::CoreError;
use crate::sfnt::{slice_at, Reader, SfntBuilder};

const WOFF_SIGNATURE: u32 = 0x774F_4646;
const HEADER_LEN: usize = 44;
const DIRECTORY_ENTRY_LEN: usize = 20;

/// Upper bound on the sum of all decoded tables.
const MAX_DECODED_SIZE: usize = 128 * 1024 * 1024;

/// Decode a WOFF 1.0 file into sfnt bytes.
pub fn decode(data: &[u8]) -> Result<Vec<u8>, CoreError> {
    let mut header = Reader::new(data, "WOFF header");
    if header.u32()? != WOFF_SIGNATURE {
        return Err(CoreError::InvalidFontFormat("missing WOFF signature".into()));
    }
    let flavor = header.u32()?;
    let _length = header.u32()?;
    let num_tables = header.u16()? as usize;
    if header.u16()? != 0 {
        return Err(CoreError::InvalidFontFormat(
            "WOFF reserved field is not zero".into(),
        ));
    }
    if num_tables == 0 {
        return Err(CoreError::InvalidFontFormat("WOFF file has no tables".into()));
    }

    let directory = slice_at(
        data,
        HEADER_LEN,
        num_tables * DIRECTORY_ENTRY_LEN,
        "WOFF table directory",
    )?;
    let mut reader = Reader::new(directory, "WOFF table directory");
    let entries = (0..num_tables)
        .map(|_| read_entry(&mut reader))
        .collect::<Result<Vec<_>, _>>()?;
    let decoded_total = entries
        .iter()
        .fold(0usize, |sum, e| sum.saturating_add(e.orig_length));
    if decoded_total > MAX_DECODED_SIZE {
        return Err(CoreError::InvalidFontFormat(
            "WOFF tables exceed the decoded size limit".into(),
        ));
    }

    let mut builder = SfntBuilder::new(flavor);
    for entry in entries {
        let stored = slice_at(data, entry.offset, entry.comp_length, "WOFF table")?;
        let table = match entry.comp_length.cmp(&entry.orig_length) {
            std::cmp::Ordering::Equal => stored.to_vec(),
            std::cmp::Ordering::Less => inflate(stored, entry.orig_length, entry.tag)?,
            std::cmp::Ordering::Greater => {
                return Err(CoreError::InvalidFontFormat(format!(
                    "WOFF table '{}' is larger compressed than decoded",
                    String::from_utf8_lossy(&entry.tag)
                )))
            }
        };
        builder.add_table(entry.tag, table);
    }

    Ok(builder.build())
}

struct TableEntry {
    tag: [u8; 4],
    offset: usize,
    comp_length: usize,
    orig_length: usize,
}

fn read_entry(reader: &mut Reader<'_>) -> Result<TableEntry, CoreError> {
    let tag = reader.tag()?;
    let offset = reader.u32()? as usize;
    let comp_length = reader.u32()? as usize;
    let orig_length = reader.u32()? as usize;
    let _orig_checksum = reader.u32()?;
    Ok(TableEntry {
        tag,
        offset,
        comp_length,
        orig_length,
    })
}

fn inflate(stored: &[u8], orig_length: usize, tag: [u8; 4]) -> Result<Vec<u8>, CoreError> {
    // Deflate never expands past 1032:1.
    let mut table = Vec::with_capacity(orig_length.min(stored.len().saturating_mul(1032)));
    ZlibDecoder::new(stored)
        .take(orig_length as u64 + 1)
        .read_to_end(&mut table)
        .map_err(|e| {
            CoreError::InvalidFontFormat(format!(
                "WOFF table '{}' failed to inflate: {e}",
                String::from_utf8_lossy(&tag)
            ))
        })?;

    if table.len() != orig_length {
        return Err(CoreError::InvalidFontFormat(format!(
            "WOFF table '{}' inflated to {} bytes, expected {orig_length}",
            String::from_utf8_lossy(&tag),
            table.len()
        )));
    }
    Ok(table)
}
