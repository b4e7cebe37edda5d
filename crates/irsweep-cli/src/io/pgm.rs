// crates/irsweep-cli/src/io/pgm.rs
//
// Binary PGM (P5). Written as maxval 65535, two bytes per sample, big-endian,
// row-major. Reading also accepts 8-bit files (maxval < 256).

use anyhow::{bail, Context};
use irsweep_core::{Geometry, SampleGrid};

pub fn encode_pgm16(grid: &SampleGrid) -> Vec<u8> {
    let g = grid.geometry();
    let mut out = format!("P5\n{} {}\n65535\n", g.width, g.height).into_bytes();
    out.extend_from_slice(&grid.to_be_bytes());
    out
}

pub fn write_pgm16(path: &str, grid: &SampleGrid) -> anyhow::Result<()> {
    std::fs::write(path, encode_pgm16(grid)).with_context(|| format!("write pgm: {path}"))?;
    Ok(())
}

/// Next header token, skipping whitespace and `#` comments.
fn next_token<'a>(bytes: &'a [u8], pos: &mut usize) -> anyhow::Result<&'a [u8]> {
    loop {
        while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
            *pos += 1;
        }
        if *pos < bytes.len() && bytes[*pos] == b'#' {
            while *pos < bytes.len() && bytes[*pos] != b'\n' {
                *pos += 1;
            }
            continue;
        }
        break;
    }
    let start = *pos;
    while *pos < bytes.len() && !bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
    if start == *pos {
        bail!("truncated pgm header");
    }
    Ok(&bytes[start..*pos])
}

fn header_num(bytes: &[u8], pos: &mut usize, what: &str) -> anyhow::Result<usize> {
    let tok = next_token(bytes, pos)?;
    std::str::from_utf8(tok)
        .ok()
        .and_then(|s| s.parse().ok())
        .with_context(|| format!("bad pgm {what}"))
}

pub fn decode_pgm(bytes: &[u8]) -> anyhow::Result<SampleGrid> {
    let mut pos = 0usize;
    if next_token(bytes, &mut pos)? != b"P5" {
        bail!("not a binary pgm (P5)");
    }
    let width = header_num(bytes, &mut pos, "width")?;
    let height = header_num(bytes, &mut pos, "height")?;
    let maxval = header_num(bytes, &mut pos, "maxval")?;
    if maxval == 0 || maxval > 65535 {
        bail!("pgm maxval out of range: {maxval}");
    }
    // Exactly one whitespace byte separates the header from the raster.
    pos += 1;

    let geometry = Geometry::new(width, height)?;
    let bps = if maxval < 256 { 1 } else { 2 };
    let need = geometry.cells() * bps;
    let raster = bytes.get(pos..pos + need).with_context(|| {
        format!("pgm raster truncated: need {need} bytes, have {}", bytes.len().saturating_sub(pos))
    })?;

    let samples = if bps == 1 {
        raster.iter().map(|&b| b as u16).collect()
    } else {
        raster.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect()
    };
    Ok(SampleGrid::from_samples(geometry, samples)?)
}

pub fn read_pgm(path: &str) -> anyhow::Result<SampleGrid> {
    let bytes = std::fs::read(path).with_context(|| format!("read pgm: {path}"))?;
    decode_pgm(&bytes).with_context(|| format!("parse pgm: {path}"))
}
