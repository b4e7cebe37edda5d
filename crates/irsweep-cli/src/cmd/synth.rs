// crates/irsweep-cli/src/cmd/synth.rs

use anyhow::{bail, Context};
use clap::Args;
use irsweep_core::encode::encode_frame_with_guard;
use irsweep_core::{Geometry, Hypothesis, SampleGrid};

use crate::io::pgm::{read_pgm, write_pgm16};

#[derive(Args)]
pub struct SynthArgs {
    /// Output raw stream path
    #[arg(long)]
    pub out: String,

    /// Frame width (required without --from)
    #[arg(long)]
    pub width: Option<usize>,

    /// Frame height (required without --from)
    #[arg(long)]
    pub height: Option<usize>,

    /// Hypothesis label to encode under
    #[arg(long)]
    pub hypothesis: String,

    /// Source frame (P5 PGM); a synthetic pattern is used when absent
    #[arg(long)]
    pub from: Option<String>,

    /// Seed of the synthetic pattern noise
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Also write the encoded frame as 16-bit PGM
    #[arg(long)]
    pub truth: Option<String>,

    #[arg(long, default_value_t = irsweep_core::entropy::UNARY_GUARD)]
    pub unary_guard: u32,
}

#[inline]
fn lcg_next(x: &mut u64) -> u64 {
    *x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
    *x
}

/// Smooth diagonal gradient plus small noise. Samples are multiples of 4 so
/// that 14-bit literals can carry them.
pub fn synthetic_pattern(geometry: Geometry, seed: u64) -> SampleGrid {
    let mut grid = SampleGrid::new(geometry);
    let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
    for y in 0..geometry.height {
        for x in 0..geometry.width {
            let noise = (lcg_next(&mut state) >> 58) as u32; // 0..64
            let v = 6000u32 + 24 * x as u32 + 16 * y as u32 + noise;
            grid.set(y, x, (v.min(u16::MAX as u32) as u16) & !3);
        }
    }
    grid
}

fn source_grid(args: &SynthArgs) -> anyhow::Result<SampleGrid> {
    match &args.from {
        Some(path) => {
            let grid = read_pgm(path)?;
            let g = grid.geometry();
            if let (Some(w), Some(h)) = (args.width, args.height) {
                if (w, h) != (g.width, g.height) {
                    bail!("--from is {} but --width/--height say {}x{}", g, w, h);
                }
            }
            Ok(grid)
        }
        None => {
            let (Some(w), Some(h)) = (args.width, args.height) else {
                bail!("--width and --height are required without --from");
            };
            Ok(synthetic_pattern(Geometry::new(w, h)?, args.seed))
        }
    }
}

pub fn run(args: SynthArgs) -> anyhow::Result<()> {
    let h: Hypothesis = args.hypothesis.parse().context("--hypothesis")?;
    let grid = source_grid(&args)?;

    let stream = encode_frame_with_guard(&grid, &h, args.unary_guard).with_context(|| format!("encode under {h}"))?;
    std::fs::write(&args.out, &stream).with_context(|| format!("write stream: {}", args.out))?;

    if let Some(truth) = &args.truth {
        write_pgm16(truth, &grid)?;
    }

    eprintln!(
        "synth ok: out={} bytes={} geometry={} frame_crc={:08x} id={}",
        args.out,
        stream.len(),
        grid.geometry(),
        grid.checksum(),
        h.id_hex()
    );
    eprintln!("hypothesis = {h}");
    Ok(())
}
