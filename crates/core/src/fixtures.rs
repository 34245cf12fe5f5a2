//! Binary font fixtures shared by the unit tests.
//!
//! Generated by `fixtures/fonts/build_fixtures.py`. Every synthetic font
//! has 1000 units per em, ascender 900, descender -250, and the glyphs
//! `.notdef`, space, `H`, `i`, `A`, `V`, `o` with a single `A`/`V` kern
//! pair of -80.

macro_rules! fixture {
    ($name:literal) => {
        include_bytes!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../fixtures/fonts/",
            $name
        ))
    };
}

pub const SANS_TTF: &[u8] = fixture!("fixture-sans.ttf");
pub const SANS_WOFF: &[u8] = fixture!("fixture-sans.woff");
pub const SANS_WOFF2: &[u8] = fixture!("fixture-sans.woff2");
pub const SERIF_TTF: &[u8] = fixture!("fixture-serif.ttf");
pub const NAMELESS_TTF: &[u8] = fixture!("nameless.ttf");
pub const SOURCE_CODE_PRO_WOFF2: &[u8] = fixture!("source-code-pro-500.woff2");

/// Re-assemble `sfnt` with `extra` tables added, replacing any table of the
/// same tag.
pub fn with_tables(sfnt: &[u8], extra: Vec<([u8; 4], Vec<u8>)>) -> Vec<u8> {
    use crate::sfnt::{slice_at, Reader, SfntBuilder};

    let mut header = Reader::new(sfnt, "sfnt header");
    let flavor = header.u32().unwrap();
    let num_tables = header.u16().unwrap() as usize;
    let mut records = Reader::new(&sfnt[12..12 + num_tables * 16], "sfnt directory");

    let mut builder = SfntBuilder::new(flavor);
    for _ in 0..num_tables {
        let tag = records.tag().unwrap();
        let _checksum = records.u32().unwrap();
        let offset = records.u32().unwrap() as usize;
        let length = records.u32().unwrap() as usize;
        if extra.iter().all(|(t, _)| *t != tag) {
            builder.add_table(tag, slice_at(sfnt, offset, length, "table").unwrap().to_vec());
        }
    }
    for (tag, data) in extra {
        builder.add_table(tag, data);
    }
    builder.build()
}

/// A version 4 `OS/2` table with the given typo metrics and fsSelection.
pub fn os2_table(fs_selection: u16, typo_ascender: i16, typo_descender: i16) -> Vec<u8> {
    let mut os2 = vec![0u8; 96];
    os2[0..2].copy_from_slice(&4u16.to_be_bytes());
    os2[4..6].copy_from_slice(&400u16.to_be_bytes());
    os2[6..8].copy_from_slice(&5u16.to_be_bytes());
    os2[62..64].copy_from_slice(&fs_selection.to_be_bytes());
    os2[68..70].copy_from_slice(&typo_ascender.to_be_bytes());
    os2[70..72].copy_from_slice(&typo_descender.to_be_bytes());
    os2[74..76].copy_from_slice(&(typo_ascender as u16).to_be_bytes());
    os2[76..78].copy_from_slice(&(-typo_descender as u16).to_be_bytes());
    os2
}

/// A `GPOS` table whose single `kern` feature holds one format 1 pair
/// adjustment: `first` followed by `second` moves by `x_advance`.
pub fn gpos_kern_pair(first: u16, second: u16, x_advance: i16) -> Vec<u8> {
    let words: &[u16] = &[
        // Header: version 1.0, ScriptList 10, FeatureList 12, LookupList 26.
        1, 0, 10, 12, 26,
        // ScriptList: no scripts.
        0,
        // FeatureList: one 'kern' record pointing 8 bytes in.
        1, u16::from_be_bytes(*b"ke"), u16::from_be_bytes(*b"rn"), 8,
        // Feature: no params, lookup 0.
        0, 1, 0,
        // LookupList: one lookup, 4 bytes in.
        1, 4,
        // Lookup: pair adjustment, no flags, one subtable 8 bytes in.
        2, 0, 1, 8,
        // PairPos format 1: coverage at 12, XAdvance on the first glyph,
        // one pair set at 18.
        1, 12, 0x0004, 0, 1, 18,
        // Coverage format 1 with the first glyph.
        1, 1, first,
        // PairSet: one record.
        1, second, x_advance as u16,
    ];
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}
