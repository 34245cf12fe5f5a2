//! WOFF 2.0 decoding.
//!
//! The table data of a WOFF2 file is one brotli stream. `glyf` and `loca`
//! are usually stored in a transformed, split-stream form and `hmtx` may
//! omit left side bearings that can be recomputed from glyph bounding
//! boxes. Decoding reverses those transforms and re-assembles a plain
//! sfnt through [`SfntBuilder`].
//!
//! Font collections (`ttcf` flavor) are rejected.

use std::io::Read;

use crate::error::CoreError;
use crate::sfnt::{slice_at, Reader, SfntBuilder};

const WOFF2_SIGNATURE: u32 = 0x774F_4632;
const COLLECTION_FLAVOR: u32 = 0x7474_6366;
const HEADER_LEN: usize = 48;

/// Upper bound on the decompressed table stream.
const MAX_DECODED_SIZE: usize = 128 * 1024 * 1024;

const KNOWN_TAGS: [&[u8; 4]; 63] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep", b"CFF ", b"VORG", b"EBDT", b"EBLC", b"gasp", b"hdmx", b"kern",
    b"LTSH", b"PCLT", b"VDMX", b"vhea", b"vmtx", b"BASE", b"GDEF", b"GPOS", b"GSUB", b"EBSC",
    b"JSTF", b"MATH", b"CBDT", b"CBLC", b"COLR", b"CPAL", b"SVG ", b"sbix", b"acnt", b"avar",
    b"bdat", b"bloc", b"bsln", b"cvar", b"fdsc", b"feat", b"fmtx", b"fvar", b"gvar", b"hsty",
    b"just", b"lcar", b"mort", b"morx", b"opbd", b"prop", b"trak", b"Zapf", b"Silf", b"Glat",
    b"Gloc", b"Feat", b"Sill",
];

const GLYF: [u8; 4] = *b"glyf";
const LOCA: [u8; 4] = *b"loca";
const HMTX: [u8; 4] = *b"hmtx";
const HHEA: [u8; 4] = *b"hhea";
const MAXP: [u8; 4] = *b"maxp";

#[derive(Debug)]
struct TableEntry {
    tag: [u8; 4],
    transformed: bool,
    /// Offset into the decompressed stream.
    offset: usize,
    /// Bytes occupied in the decompressed stream.
    stream_len: usize,
}

/// Decode a WOFF 2.0 file into sfnt bytes.
pub fn decode(data: &[u8]) -> Result<Vec<u8>, CoreError> {
    let mut header = Reader::new(data, "WOFF2 header");
    if header.u32()? != WOFF2_SIGNATURE {
        return Err(CoreError::InvalidFontFormat("missing WOFF2 signature".into()));
    }
    let flavor = header.u32()?;
    if flavor == COLLECTION_FLAVOR {
        return Err(CoreError::InvalidFontFormat(
            "WOFF2 font collections are not supported".into(),
        ));
    }
    let _length = header.u32()?;
    let num_tables = header.u16()? as usize;
    if header.u16()? != 0 {
        return Err(CoreError::InvalidFontFormat(
            "WOFF2 reserved field is not zero".into(),
        ));
    }
    let _total_sfnt_size = header.u32()?;
    let total_compressed_size = header.u32()? as usize;
    if num_tables == 0 {
        return Err(CoreError::InvalidFontFormat("WOFF2 file has no tables".into()));
    }

    let directory = slice_at(
        data,
        HEADER_LEN,
        data.len().saturating_sub(HEADER_LEN),
        "WOFF2 table directory",
    )?;
    let mut dir = Reader::new(directory, "WOFF2 table directory");
    let entries = read_directory(&mut dir, num_tables)?;
    let stream_len = entries
        .last()
        .map(|e| e.offset + e.stream_len)
        .unwrap_or_default();
    if stream_len > MAX_DECODED_SIZE {
        return Err(CoreError::InvalidFontFormat(
            "WOFF2 tables exceed the decoded size limit".into(),
        ));
    }

    let compressed = slice_at(
        data,
        HEADER_LEN + dir.position(),
        total_compressed_size,
        "WOFF2 compressed data",
    )?;
    let stream = decompress(compressed, stream_len)?;

    let find = |tag: [u8; 4]| entries.iter().find(|e| e.tag == tag);

    let mut builder = SfntBuilder::new(flavor);
    let mut glyph_x_mins = None;

    if let Some(glyf) = find(GLYF).filter(|e| e.transformed) {
        let loca = find(LOCA).ok_or_else(|| {
            CoreError::InvalidFontFormat("transformed glyf without loca".into())
        })?;
        if !loca.transformed {
            return Err(CoreError::InvalidFontFormat(
                "glyf is transformed but loca is not".into(),
            ));
        }
        let rebuilt = reconstruct_glyf(table_data(&stream, glyf))?;
        builder.add_table(GLYF, rebuilt.glyf);
        builder.add_table(LOCA, rebuilt.loca);
        glyph_x_mins = Some(rebuilt.x_mins);
    } else if find(LOCA).is_some_and(|e| e.transformed) {
        return Err(CoreError::InvalidFontFormat(
            "loca is transformed but glyf is not".into(),
        ));
    }

    for entry in &entries {
        match entry.tag {
            GLYF | LOCA if entry.transformed => {}
            HMTX if entry.transformed => {
                let x_mins = glyph_x_mins.as_deref().ok_or_else(|| {
                    CoreError::InvalidFontFormat(
                        "transformed hmtx requires a transformed glyf table".into(),
                    )
                })?;
                let hhea = find(HHEA).map(|e| table_data(&stream, e)).ok_or_else(|| {
                    CoreError::InvalidFontFormat("transformed hmtx without hhea".into())
                })?;
                let hmtx = reconstruct_hmtx(table_data(&stream, entry), hhea, x_mins)?;
                builder.add_table(HMTX, hmtx);
            }
            tag if entry.transformed => {
                return Err(CoreError::InvalidFontFormat(format!(
                    "unsupported transform for table '{}'",
                    String::from_utf8_lossy(&tag)
                )))
            }
            tag => builder.add_table(tag, table_data(&stream, entry).to_vec()),
        }
    }

    if let (Some(x_mins), Some(maxp)) = (&glyph_x_mins, find(MAXP)) {
        let mut r = Reader::new(table_data(&stream, maxp), "maxp");
        let _version = r.u32()?;
        if r.u16()? as usize != x_mins.len() {
            return Err(CoreError::InvalidFontFormat(
                "glyph count in maxp disagrees with glyf".into(),
            ));
        }
    }

    Ok(builder.build())
}

fn table_data<'a>(stream: &'a [u8], entry: &TableEntry) -> &'a [u8] {
    &stream[entry.offset..entry.offset + entry.stream_len]
}

fn read_directory(dir: &mut Reader<'_>, num_tables: usize) -> Result<Vec<TableEntry>, CoreError> {
    let mut entries = Vec::with_capacity(num_tables);
    let mut offset = 0usize;

    for _ in 0..num_tables {
        let flags = dir.u8()?;
        let tag = match flags & 0x3F {
            63 => dir.tag()?,
            index => *KNOWN_TAGS[index as usize],
        };
        let transform_version = flags >> 6;
        let orig_length = read_base128(dir)? as usize;

        // glyf/loca use version 0 for their transform, every other table
        // uses version 0 for "stored as is".
        let transformed = if tag == GLYF || tag == LOCA {
            transform_version == 0
        } else {
            transform_version != 0
        };
        let stream_len = if transformed {
            let transform_length = read_base128(dir)? as usize;
            if tag == LOCA && transform_length != 0 {
                return Err(CoreError::InvalidFontFormat(
                    "transformed loca must be empty".into(),
                ));
            }
            transform_length
        } else {
            orig_length
        };

        entries.push(TableEntry {
            tag,
            transformed,
            offset,
            stream_len,
        });
        offset = offset.checked_add(stream_len).ok_or_else(|| {
            CoreError::InvalidFontFormat("WOFF2 table lengths overflow".into())
        })?;
    }

    Ok(entries)
}

fn decompress(compressed: &[u8], expected: usize) -> Result<Vec<u8>, CoreError> {
    let mut stream = Vec::with_capacity(expected);
    brotli_decompressor::Decompressor::new(compressed, 4096)
        .take(expected as u64 + 1)
        .read_to_end(&mut stream)
        .map_err(|e| CoreError::InvalidFontFormat(format!("WOFF2 brotli stream: {e}")))?;

    if stream.len() != expected {
        return Err(CoreError::InvalidFontFormat(format!(
            "WOFF2 stream decoded to {} bytes, expected {expected}",
            stream.len()
        )));
    }
    Ok(stream)
}

/// Variable-length unsigned integer of up to five bytes, seven bits each.
fn read_base128(r: &mut Reader<'_>) -> Result<u32, CoreError> {
    let mut value: u32 = 0;
    for i in 0..5 {
        let byte = r.u8()?;
        if i == 0 && byte == 0x80 {
            return Err(CoreError::InvalidFontFormat(
                "UIntBase128 has a leading zero".into(),
            ));
        }
        if value & 0xFE00_0000 != 0 {
            return Err(CoreError::InvalidFontFormat("UIntBase128 overflow".into()));
        }
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CoreError::InvalidFontFormat(
        "UIntBase128 is longer than five bytes".into(),
    ))
}

/// Compact encoding of values in `0..=65535` used by the glyf streams.
fn read_255_u16(r: &mut Reader<'_>) -> Result<u16, CoreError> {
    const WORD_CODE: u8 = 253;
    const ONE_MORE_BYTE_CODE_2: u8 = 254;
    const ONE_MORE_BYTE_CODE_1: u8 = 255;
    const LOWEST_U_CODE: u16 = 253;

    match r.u8()? {
        WORD_CODE => r.u16(),
        ONE_MORE_BYTE_CODE_1 => Ok(u16::from(r.u8()?) + LOWEST_U_CODE),
        ONE_MORE_BYTE_CODE_2 => Ok(u16::from(r.u8()?) + LOWEST_U_CODE * 2),
        code => Ok(u16::from(code)),
    }
}

// ---------------------------------------------------------------------------
// glyf / loca
// ---------------------------------------------------------------------------

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;

const ON_CURVE: u8 = 0x01;
const X_SHORT: u8 = 0x02;
const Y_SHORT: u8 = 0x04;
const X_SAME_OR_POSITIVE: u8 = 0x10;
const Y_SAME_OR_POSITIVE: u8 = 0x20;
const OVERLAP_SIMPLE: u8 = 0x40;

const HAS_OVERLAP_BITMAP: u16 = 0x0001;

struct RebuiltGlyf {
    glyf: Vec<u8>,
    loca: Vec<u8>,
    /// Per-glyph `xMin`, zero for empty glyphs.
    x_mins: Vec<i16>,
}

#[derive(Debug, Clone, Copy)]
struct Point {
    dx: i32,
    dy: i32,
    on_curve: bool,
}

struct GlyfStreams<'a> {
    n_contour: Reader<'a>,
    n_points: Reader<'a>,
    flags: Reader<'a>,
    glyphs: Reader<'a>,
    composite: Reader<'a>,
    bbox_bitmap: &'a [u8],
    bboxes: Reader<'a>,
    instructions: Reader<'a>,
    overlap_bitmap: Option<&'a [u8]>,
}

fn bit_set(bitmap: &[u8], index: usize) -> bool {
    bitmap
        .get(index >> 3)
        .is_some_and(|byte| byte & (0x80 >> (index & 7)) != 0)
}

fn reconstruct_glyf(data: &[u8]) -> Result<RebuiltGlyf, CoreError> {
    let mut header = Reader::new(data, "transformed glyf header");
    let _version = header.u16()?;
    let option_flags = header.u16()?;
    let num_glyphs = header.u16()? as usize;
    let index_format = header.u16()?;

    let mut sizes = [0usize; 7];
    for size in &mut sizes {
        *size = header.u32()? as usize;
    }

    let mut offset = header.position();
    let mut raw: [&[u8]; 7] = [&[]; 7];
    for (slot, &len) in raw.iter_mut().zip(&sizes) {
        *slot = slice_at(data, offset, len, "transformed glyf stream")?;
        offset += len;
    }
    let [n_contour, n_points, flags, glyphs, composite, bbox, instructions] = raw;
    let overlap_bitmap = if option_flags & HAS_OVERLAP_BITMAP != 0 {
        Some(slice_at(data, offset, (num_glyphs + 7) >> 3, "overlap bitmap")?)
    } else {
        None
    };

    let bitmap_len = ((num_glyphs + 31) >> 5) << 2;
    let bbox_bitmap = slice_at(bbox, 0, bitmap_len, "bbox bitmap")?;

    let mut streams = GlyfStreams {
        n_contour: Reader::new(n_contour, "nContour stream"),
        n_points: Reader::new(n_points, "nPoints stream"),
        flags: Reader::new(flags, "flag stream"),
        glyphs: Reader::new(glyphs, "glyph stream"),
        composite: Reader::new(composite, "composite stream"),
        bbox_bitmap,
        bboxes: Reader::new(&bbox[bitmap_len..], "bbox stream"),
        instructions: Reader::new(instructions, "instruction stream"),
        overlap_bitmap,
    };

    let mut glyf = Vec::new();
    let mut offsets = Vec::with_capacity(num_glyphs + 1);
    let mut x_mins = Vec::with_capacity(num_glyphs);

    for index in 0..num_glyphs {
        offsets.push(glyf.len());
        let x_min = rebuild_glyph(&mut streams, index, &mut glyf)?;
        x_mins.push(x_min);
        glyf.resize((glyf.len() + 3) & !3, 0);
    }
    offsets.push(glyf.len());

    let loca = encode_loca(&offsets, index_format)?;
    Ok(RebuiltGlyf { glyf, loca, x_mins })
}

/// Append one glyph record to `out` and return its `xMin`.
fn rebuild_glyph(s: &mut GlyfStreams<'_>, index: usize, out: &mut Vec<u8>) -> Result<i16, CoreError> {
    let n_contours = s.n_contour.i16()?;
    let has_bbox = bit_set(s.bbox_bitmap, index);

    match n_contours {
        0 => {
            if has_bbox {
                return Err(CoreError::InvalidFontFormat(
                    "empty glyph carries a bounding box".into(),
                ));
            }
            Ok(0)
        }
        -1 => {
            if !has_bbox {
                return Err(CoreError::InvalidFontFormat(
                    "composite glyph without a bounding box".into(),
                ));
            }
            let bbox = read_bbox(&mut s.bboxes)?;
            let (components, has_instructions) = read_composite(&mut s.composite)?;

            out.extend_from_slice(&(-1i16).to_be_bytes());
            write_bbox(out, bbox);
            out.extend_from_slice(components);
            if has_instructions {
                let len = read_255_u16(&mut s.glyphs)?;
                out.extend_from_slice(&len.to_be_bytes());
                out.extend_from_slice(s.instructions.bytes(len as usize)?);
            }
            Ok(bbox[0])
        }
        n if n > 0 => {
            let mut end_points = Vec::with_capacity(n as usize);
            let mut total: usize = 0;
            for _ in 0..n {
                total += read_255_u16(&mut s.n_points)? as usize;
                let end = total.checked_sub(1).filter(|e| *e <= 0xFFFF).ok_or_else(|| {
                    CoreError::InvalidFontFormat("invalid contour point count".into())
                })?;
                end_points.push(end as u16);
            }

            let flag_bytes = s.flags.bytes(total)?;
            let mut points = Vec::with_capacity(total);
            for &flag in flag_bytes {
                points.push(read_triplet(flag, &mut s.glyphs)?);
            }

            let instruction_len = read_255_u16(&mut s.glyphs)?;
            let instructions = s.instructions.bytes(instruction_len as usize)?;

            let bbox = if has_bbox {
                read_bbox(&mut s.bboxes)?
            } else {
                compute_bbox(&points)
            };

            let overlap = s
                .overlap_bitmap
                .is_some_and(|bitmap| bit_set(bitmap, index));

            out.extend_from_slice(&n_contours.to_be_bytes());
            write_bbox(out, bbox);
            for end in &end_points {
                out.extend_from_slice(&end.to_be_bytes());
            }
            out.extend_from_slice(&instruction_len.to_be_bytes());
            out.extend_from_slice(instructions);
            encode_points(out, &points, overlap)?;
            Ok(bbox[0])
        }
        _ => Err(CoreError::InvalidFontFormat(format!(
            "invalid contour count {n_contours}"
        ))),
    }
}

fn read_bbox(r: &mut Reader<'_>) -> Result<[i16; 4], CoreError> {
    Ok([r.i16()?, r.i16()?, r.i16()?, r.i16()?])
}

fn write_bbox(out: &mut Vec<u8>, bbox: [i16; 4]) {
    for v in bbox {
        out.extend_from_slice(&v.to_be_bytes());
    }
}

fn compute_bbox(points: &[Point]) -> [i16; 4] {
    let mut x = 0i32;
    let mut y = 0i32;
    let mut bbox: Option<[i32; 4]> = None;
    for p in points {
        x += p.dx;
        y += p.dy;
        bbox = Some(match bbox {
            None => [x, y, x, y],
            Some([x0, y0, x1, y1]) => [x0.min(x), y0.min(y), x1.max(x), y1.max(y)],
        });
    }
    let [x0, y0, x1, y1] = bbox.unwrap_or_default();
    [x0 as i16, y0 as i16, x1 as i16, y1 as i16]
}

/// Returns the raw component records and whether instructions follow.
fn read_composite<'a>(r: &mut Reader<'a>) -> Result<(&'a [u8], bool), CoreError> {
    let start = r.position();
    let mut has_instructions = false;

    loop {
        let flags = r.u16()?;
        let _glyph_index = r.u16()?;
        let mut arg_len = if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        if flags & WE_HAVE_A_SCALE != 0 {
            arg_len += 2;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            arg_len += 4;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            arg_len += 8;
        }
        r.bytes(arg_len)?;
        has_instructions |= flags & WE_HAVE_INSTRUCTIONS != 0;
        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }

    Ok((r.since(start), has_instructions))
}

fn read_triplet(flag: u8, r: &mut Reader<'_>) -> Result<Point, CoreError> {
    let on_curve = flag & 0x80 == 0;
    let flag = flag & 0x7F;

    let with_sign = |bit: u8, value: i32| if bit & 1 != 0 { value } else { -value };

    let (dx, dy) = if flag < 10 {
        let b0 = i32::from(r.u8()?);
        (0, with_sign(flag, (i32::from(flag & 14) << 7) + b0))
    } else if flag < 20 {
        let b0 = i32::from(r.u8()?);
        (with_sign(flag, (i32::from((flag - 10) & 14) << 7) + b0), 0)
    } else if flag < 84 {
        let b0 = i32::from(r.u8()?);
        let b = i32::from(flag - 20);
        (
            with_sign(flag, 1 + (b & 0x30) + (b0 >> 4)),
            with_sign(flag >> 1, 1 + ((b & 0x0C) << 2) + (b0 & 0x0F)),
        )
    } else if flag < 120 {
        let b0 = i32::from(r.u8()?);
        let b1 = i32::from(r.u8()?);
        let b = i32::from(flag - 84);
        (
            with_sign(flag, 1 + ((b / 12) << 8) + b0),
            with_sign(flag >> 1, 1 + (((b % 12) >> 2) << 8) + b1),
        )
    } else if flag < 124 {
        let b0 = i32::from(r.u8()?);
        let b1 = i32::from(r.u8()?);
        let b2 = i32::from(r.u8()?);
        (
            with_sign(flag, (b0 << 4) + (b1 >> 4)),
            with_sign(flag >> 1, ((b1 & 0x0F) << 8) + b2),
        )
    } else {
        let b0 = i32::from(r.u8()?);
        let b1 = i32::from(r.u8()?);
        let b2 = i32::from(r.u8()?);
        let b3 = i32::from(r.u8()?);
        (
            with_sign(flag, (b0 << 8) + b1),
            with_sign(flag >> 1, (b2 << 8) + b3),
        )
    };

    Ok(Point { dx, dy, on_curve })
}

/// Write the flag, x and y arrays of a simple glyph.
fn encode_points(out: &mut Vec<u8>, points: &[Point], overlap: bool) -> Result<(), CoreError> {
    let mut flags = Vec::with_capacity(points.len());
    let mut xs = Vec::with_capacity(points.len() * 2);
    let mut ys = Vec::with_capacity(points.len() * 2);

    for (i, p) in points.iter().enumerate() {
        let mut flag = if p.on_curve { ON_CURVE } else { 0 };
        if overlap && i == 0 {
            flag |= OVERLAP_SIMPLE;
        }
        flag |= encode_delta(p.dx, X_SHORT, X_SAME_OR_POSITIVE, &mut xs)?;
        flag |= encode_delta(p.dy, Y_SHORT, Y_SAME_OR_POSITIVE, &mut ys)?;
        flags.push(flag);
    }

    out.extend_from_slice(&flags);
    out.extend_from_slice(&xs);
    out.extend_from_slice(&ys);
    Ok(())
}

fn encode_delta(delta: i32, short: u8, same_or_positive: u8, out: &mut Vec<u8>) -> Result<u8, CoreError> {
    if delta == 0 {
        Ok(same_or_positive)
    } else if (-255..=255).contains(&delta) {
        out.push(delta.unsigned_abs() as u8);
        Ok(if delta > 0 { short | same_or_positive } else { short })
    } else {
        let delta = i16::try_from(delta).map_err(|_| {
            CoreError::InvalidFontFormat("glyph coordinate out of range".into())
        })?;
        out.extend_from_slice(&delta.to_be_bytes());
        Ok(0)
    }
}

fn encode_loca(offsets: &[usize], index_format: u16) -> Result<Vec<u8>, CoreError> {
    let mut loca = Vec::with_capacity(offsets.len() * 4);
    for &offset in offsets {
        if index_format == 0 {
            let half = u16::try_from(offset / 2).map_err(|_| {
                CoreError::InvalidFontFormat("glyf too large for short loca".into())
            })?;
            loca.extend_from_slice(&half.to_be_bytes());
        } else {
            let full = u32::try_from(offset).map_err(|_| {
                CoreError::InvalidFontFormat("glyf too large for loca".into())
            })?;
            loca.extend_from_slice(&full.to_be_bytes());
        }
    }
    Ok(loca)
}

// ---------------------------------------------------------------------------
// hmtx
// ---------------------------------------------------------------------------

const PROPORTIONAL_LSB_ABSENT: u8 = 0x01;
const MONOSPACE_LSB_ABSENT: u8 = 0x02;

fn reconstruct_hmtx(data: &[u8], hhea: &[u8], x_mins: &[i16]) -> Result<Vec<u8>, CoreError> {
    let num_h_metrics = {
        let field = slice_at(hhea, 34, 2, "hhea.numberOfHMetrics")?;
        u16::from_be_bytes([field[0], field[1]]) as usize
    };
    let num_glyphs = x_mins.len();
    if num_h_metrics == 0 || num_h_metrics > num_glyphs {
        return Err(CoreError::InvalidFontFormat(
            "hhea.numberOfHMetrics is out of range".into(),
        ));
    }

    let mut r = Reader::new(data, "transformed hmtx");
    let flags = r.u8()?;
    if flags & !(PROPORTIONAL_LSB_ABSENT | MONOSPACE_LSB_ABSENT) != 0
        || flags & (PROPORTIONAL_LSB_ABSENT | MONOSPACE_LSB_ABSENT) == 0
    {
        return Err(CoreError::InvalidFontFormat(format!(
            "invalid hmtx transform flags {flags:#04x}"
        )));
    }

    let mut advances = Vec::with_capacity(num_h_metrics);
    for _ in 0..num_h_metrics {
        advances.push(r.u16()?);
    }

    let mut lsbs = Vec::with_capacity(num_glyphs);
    for (i, x_min) in x_mins.iter().enumerate() {
        let absent = if i < num_h_metrics {
            flags & PROPORTIONAL_LSB_ABSENT != 0
        } else {
            flags & MONOSPACE_LSB_ABSENT != 0
        };
        lsbs.push(if absent { *x_min } else { 0 });
    }
    if flags & PROPORTIONAL_LSB_ABSENT == 0 {
        for lsb in &mut lsbs[..num_h_metrics] {
            *lsb = r.i16()?;
        }
    }
    if flags & MONOSPACE_LSB_ABSENT == 0 {
        for lsb in &mut lsbs[num_h_metrics..] {
            *lsb = r.i16()?;
        }
    }

    let mut hmtx = Vec::with_capacity(num_h_metrics * 4 + (num_glyphs - num_h_metrics) * 2);
    for (i, lsb) in lsbs.iter().enumerate() {
        if let Some(advance) = advances.get(i) {
            hmtx.extend_from_slice(&advance.to_be_bytes());
        }
        hmtx.extend_from_slice(&lsb.to_be_bytes());
    }
    Ok(hmtx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{SANS_TTF, SANS_WOFF2, SOURCE_CODE_PRO_WOFF2};
    use assert_matches::assert_matches;

    /// Records outline commands so two faces can be compared glyph by glyph.
    #[derive(Default, PartialEq, Debug)]
    struct Recorder(Vec<String>);

    impl ttf_parser::OutlineBuilder for Recorder {
        fn move_to(&mut self, x: f32, y: f32) {
            self.0.push(format!("M{x},{y}"));
        }
        fn line_to(&mut self, x: f32, y: f32) {
            self.0.push(format!("L{x},{y}"));
        }
        fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
            self.0.push(format!("Q{x1},{y1},{x},{y}"));
        }
        fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
            self.0.push(format!("C{x1},{y1},{x2},{y2},{x},{y}"));
        }
        fn close(&mut self) {
            self.0.push("Z".into());
        }
    }

    fn outline(face: &ttf_parser::Face<'_>, gid: u16) -> Recorder {
        let mut rec = Recorder::default();
        face.outline_glyph(ttf_parser::GlyphId(gid), &mut rec);
        rec
    }

    #[test]
    fn transformed_glyf_reconstructs_identical_outlines() {
        let sfnt = decode(SANS_WOFF2).unwrap();
        let decoded = ttf_parser::Face::parse(&sfnt, 0).unwrap();
        let original = ttf_parser::Face::parse(SANS_TTF, 0).unwrap();

        assert_eq!(decoded.number_of_glyphs(), original.number_of_glyphs());
        for gid in 0..original.number_of_glyphs() {
            assert_eq!(outline(&decoded, gid), outline(&original, gid), "glyph {gid}");
            assert_eq!(
                decoded.glyph_hor_advance(ttf_parser::GlyphId(gid)),
                original.glyph_hor_advance(ttf_parser::GlyphId(gid)),
            );
        }
    }

    #[test]
    fn decodes_real_world_font() {
        let sfnt = decode(SOURCE_CODE_PRO_WOFF2).unwrap();
        let face = ttf_parser::Face::parse(&sfnt, 0).unwrap();

        assert!(face.number_of_glyphs() > 100);
        let a = face.glyph_index('A').expect("Latin A is mapped");
        assert!(!outline(&face, a.0).0.is_empty());
        assert!(face.glyph_hor_advance(a).unwrap_or(0) > 0);
    }

    #[test]
    fn rejects_collections() {
        let mut header = Vec::new();
        header.extend_from_slice(b"wOF2");
        header.extend_from_slice(b"ttcf");
        header.resize(HEADER_LEN, 0);
        assert_matches!(decode(&header), Err(CoreError::InvalidFontFormat(msg)) if msg.contains("collection"));
    }

    #[test]
    fn rejects_truncated_stream() {
        let cut = &SANS_WOFF2[..SANS_WOFF2.len() - 40];
        assert_matches!(decode(cut), Err(CoreError::InvalidFontFormat(_)));
    }

    #[test]
    fn base128_encoding() {
        let read = |bytes: &[u8]| read_base128(&mut Reader::new(bytes, "test"));
        assert_eq!(read(&[0x3F]).unwrap(), 63);
        assert_eq!(read(&[0x81, 0x00]).unwrap(), 128);
        assert_eq!(read(&[0x8F, 0xFF, 0xFF, 0xFF, 0x7F]).unwrap(), u32::MAX);
        assert!(read(&[0x80, 0x01]).is_err());
        assert!(read(&[0x81, 0x81, 0x81, 0x81, 0x81, 0x01]).is_err());
    }

    #[test]
    fn u255_encoding() {
        let read = |bytes: &[u8]| read_255_u16(&mut Reader::new(bytes, "test")).unwrap();
        assert_eq!(read(&[100]), 100);
        assert_eq!(read(&[253, 0x01, 0x00]), 256);
        assert_eq!(read(&[255, 10]), 263);
        assert_eq!(read(&[254, 0]), 506);
    }

    #[test]
    fn triplets_apply_sign_bits() {
        let decode_one = |flag: u8, bytes: &[u8]| {
            let p = read_triplet(flag, &mut Reader::new(bytes, "test")).unwrap();
            (p.dx, p.dy, p.on_curve)
        };
        assert_eq!(decode_one(0, &[5]), (0, -5, true));
        assert_eq!(decode_one(1, &[5]), (0, 5, true));
        assert_eq!(decode_one(11, &[7]), (7, 0, true));
        assert_eq!(decode_one(0x80 | 125, &[0x01, 0x00, 0x00, 0x10]), (256, -16, false));
    }

    #[test]
    fn hmtx_recovers_bearings_from_glyph_bounds() {
        let mut hhea = vec![0u8; 36];
        hhea[34..36].copy_from_slice(&2u16.to_be_bytes());
        let mut data = vec![PROPORTIONAL_LSB_ABSENT | MONOSPACE_LSB_ABSENT];
        data.extend_from_slice(&500u16.to_be_bytes());
        data.extend_from_slice(&600u16.to_be_bytes());

        let hmtx = reconstruct_hmtx(&data, &hhea, &[10, 20, 30]).unwrap();
        let words: Vec<u16> = hmtx
            .chunks(2)
            .map(|w| u16::from_be_bytes([w[0], w[1]]))
            .collect();
        assert_eq!(words, vec![500, 10, 600, 20, 30]);
    }

    #[test]
    fn hmtx_rejects_zero_flags() {
        let mut hhea = vec![0u8; 36];
        hhea[34..36].copy_from_slice(&1u16.to_be_bytes());
        assert!(reconstruct_hmtx(&[0, 0, 1], &hhea, &[0]).is_err());
    }
}
