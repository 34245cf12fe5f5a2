//! Minimal sfnt (TrueType/OpenType) table-directory writer and a
//! big-endian cursor shared by the WOFF decoders.

use crate::error::CoreError;

/// Sequential big-endian reader over a byte slice.
///
/// Every read is bounds-checked; running off the end yields
/// [`CoreError::InvalidFontFormat`] naming what was being read.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8], what: &'static str) -> Self {
        Self { data, pos: 0, what }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Everything consumed since `start`.
    pub(crate) fn since(&self, start: usize) -> &'a [u8] {
        &self.data[start.min(self.pos)..self.pos]
    }

    pub(crate) fn bytes(&mut self, len: usize) -> Result<&'a [u8], CoreError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                CoreError::InvalidFontFormat(format!("truncated {} data", self.what))
            })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, CoreError> {
        Ok(self.bytes(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16, CoreError> {
        let b = self.bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn i16(&mut self) -> Result<i16, CoreError> {
        Ok(self.u16()? as i16)
    }

    pub(crate) fn u32(&mut self) -> Result<u32, CoreError> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn tag(&mut self) -> Result<[u8; 4], CoreError> {
        let b = self.bytes(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }
}

/// Slice `data[offset..offset + len]`, failing instead of panicking.
pub(crate) fn slice_at<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    what: &str,
) -> Result<&'a [u8], CoreError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| CoreError::InvalidFontFormat(format!("{what} lies outside the file")))
}

/// Sum of big-endian u32 words, zero-padding the tail.
pub fn table_checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

const HEAD_CHECKSUM_ADJUSTMENT: usize = 8;
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

/// Assembles decoded tables into a standalone sfnt file.
///
/// Tables are written in tag order, each 4-byte aligned, with fresh
/// checksums and a recomputed `head.checkSumAdjustment`.
#[derive(Debug)]
pub struct SfntBuilder {
    flavor: u32,
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl SfntBuilder {
    pub fn new(flavor: u32) -> Self {
        Self {
            flavor,
            tables: Vec::new(),
        }
    }

    pub fn add_table(&mut self, tag: [u8; 4], data: Vec<u8>) {
        self.tables.push((tag, data));
    }

    pub fn build(mut self) -> Vec<u8> {
        self.tables.sort_by(|a, b| a.0.cmp(&b.0));

        let num_tables = self.tables.len() as u16;
        let entry_selector = if num_tables == 0 {
            0
        } else {
            15 - num_tables.leading_zeros() as u16
        };
        let search_range = (1u16 << entry_selector) * 16;
        let range_shift = num_tables * 16 - search_range.min(num_tables * 16);

        let header_len = 12 + 16 * self.tables.len();
        let data_len: usize = self.tables.iter().map(|(_, d)| padded_len(d.len())).sum();
        let mut out = Vec::with_capacity(header_len + data_len);

        out.extend_from_slice(&self.flavor.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&range_shift.to_be_bytes());

        let mut offset = header_len;
        let mut head_offset = None;
        for (tag, data) in &mut self.tables {
            if *tag == *b"head" && data.len() >= HEAD_CHECKSUM_ADJUSTMENT + 4 {
                data[HEAD_CHECKSUM_ADJUSTMENT..HEAD_CHECKSUM_ADJUSTMENT + 4]
                    .copy_from_slice(&[0; 4]);
                head_offset = Some(offset);
            }
            out.extend_from_slice(&tag[..]);
            out.extend_from_slice(&table_checksum(&data[..]).to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            offset += padded_len(data.len());
        }

        for (_, data) in &self.tables {
            out.extend_from_slice(data);
            out.resize(padded_len(out.len()), 0);
        }

        if let Some(head) = head_offset {
            let adjustment = CHECKSUM_MAGIC.wrapping_sub(table_checksum(&out));
            let at = head + HEAD_CHECKSUM_ADJUSTMENT;
            out[at..at + 4].copy_from_slice(&adjustment.to_be_bytes());
        }

        out
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}
