// crates/irsweep-cli/src/cmd/sweep.rs

use std::path::Path;

use anyhow::Context;
use clap::{Args, ValueEnum};
use irsweep_core::hypothesis::defaults::Preset;
use irsweep_core::hypothesis::space::{parse_aligns, parse_list, parse_schemes, parse_shifts};
use irsweep_core::hypothesis::SearchSpace;
use irsweep_core::search::Outcome;
use irsweep_core::{EvalLimits, Geometry, Search};

use crate::io::pgm::write_pgm16;
use crate::io::report::ReportSink;

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum PresetArg {
    Rice,
    Lzss,
    Bitplane,
    Tiles,
    Order2,
    Lanes,
    Parity,
}

impl From<PresetArg> for Preset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::Rice => Preset::Rice,
            PresetArg::Lzss => Preset::Lzss,
            PresetArg::Bitplane => Preset::Bitplane,
            PresetArg::Tiles => Preset::Tiles,
            PresetArg::Order2 => Preset::Order2,
            PresetArg::Lanes => Preset::Lanes,
            PresetArg::Parity => Preset::Parity,
        }
    }
}

#[derive(Args)]
pub struct SweepArgs {
    /// Raw stream files to sweep
    #[arg(required = true)]
    pub files: Vec<String>,

    #[arg(long)]
    pub width: usize,

    #[arg(long)]
    pub height: usize,

    /// Base search space
    #[arg(long, value_enum, default_value_t = PresetArg::Rice)]
    pub preset: PresetArg,

    /// Bit orders, e.g. "msb,lsb"
    #[arg(long)]
    pub orders: Option<String>,

    /// Start alignments, e.g. "0-7"
    #[arg(long)]
    pub aligns: Option<String>,

    /// Entropy schemes, e.g. "rice:4-6,rice:4/5,expgolomb,lzss,bitplane"
    #[arg(long)]
    pub schemes: Option<String>,

    /// Predictors: raw,left,up,med,up2,v2
    #[arg(long)]
    pub predictors: Option<String>,

    /// Sign conventions: plus,minus
    #[arg(long)]
    pub signs: Option<String>,

    /// Seeding modes: row16,row14,frame16,predicted
    #[arg(long)]
    pub seeding: Option<String>,

    /// Scan orders: row,serp,lanes
    #[arg(long)]
    pub scans: Option<String>,

    /// Reset policies: none,row,tile:WxH:zero|seed|carry[:align]
    #[arg(long)]
    pub resets: Option<String>,

    /// Output left shifts: 0,2,4
    #[arg(long)]
    pub shifts: Option<String>,

    /// Worker threads (0 = all cores)
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// Records printed per file
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Write the top records of every file as CSV
    #[arg(long)]
    pub report: Option<String>,

    /// Write the top records of every file as JSONL
    #[arg(long)]
    pub jsonl: Option<String>,

    /// Write the best frame of every file as 16-bit PGM into this directory
    #[arg(long)]
    pub best_dir: Option<String>,

    #[arg(long, default_value_t = irsweep_core::entropy::UNARY_GUARD)]
    pub unary_guard: u32,

    /// Per-hypothesis symbol budget (default: 2 x (cells + regions))
    #[arg(long)]
    pub max_steps: Option<u64>,
}

fn build_space(args: &SweepArgs, geometry: Geometry) -> anyhow::Result<SearchSpace> {
    let mut space = Preset::from(args.preset).space(geometry);
    if let Some(s) = &args.orders {
        space.orders = parse_list(s).context("--orders")?;
    }
    if let Some(s) = &args.aligns {
        space.aligns = parse_aligns(s).context("--aligns")?;
    }
    if let Some(s) = &args.schemes {
        space.schemes = parse_schemes(s).context("--schemes")?;
    }
    if let Some(s) = &args.predictors {
        space.predictors = parse_list(s).context("--predictors")?;
    }
    if let Some(s) = &args.signs {
        space.signs = parse_list(s).context("--signs")?;
    }
    if let Some(s) = &args.seeding {
        space.seedings = parse_list(s).context("--seeding")?;
    }
    if let Some(s) = &args.scans {
        space.scans = parse_list(s).context("--scans")?;
    }
    if let Some(s) = &args.resets {
        space.resets = parse_list(s).context("--resets")?;
    }
    if let Some(s) = &args.shifts {
        space.shifts = parse_shifts(s).context("--shifts")?;
    }
    Ok(space)
}

pub fn run(args: SweepArgs) -> anyhow::Result<()> {
    let geometry = Geometry::new(args.width, args.height)?;
    let space = build_space(&args, geometry)?;
    let (hypotheses, rejected) = space.enumerate(geometry);
    eprintln!(
        "space = {} hypotheses ({} rejected before dispatch) preset={:?}",
        hypotheses.len(),
        rejected.len(),
        args.preset
    );
    if let Some(r) = rejected.first() {
        eprintln!("first_rejected = {} ({})", r.hypothesis, r.reason);
    }

    let limits = EvalLimits {
        unary_guard: args.unary_guard,
        max_steps: args.max_steps,
    };

    let mut sink = ReportSink::default();
    if let Some(dir) = &args.best_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("create best dir: {dir}"))?;
    }

    for file in &args.files {
        let stream = std::fs::read(file).with_context(|| format!("read stream: {file}"))?;
        let search = Search::new(&stream, geometry)
            .with_workers(args.workers)
            .with_limits(limits);
        let report = search.run(&hypotheses)?;

        eprintln!(
            "file = {} bytes={} evaluated={} failed={} workers={} elapsed={:.3}s",
            file,
            stream.len(),
            report.evaluated,
            report.ranking.failed_count(),
            report.workers,
            report.elapsed.as_secs_f64()
        );

        let top = report.ranking.top(args.top);
        for (i, r) in top.iter().enumerate() {
            let tail = match r.outcome {
                Outcome::Complete {
                    bits_consumed,
                    slack_bytes,
                    ..
                } => format!("bits={bits_consumed} slack={slack_bytes}"),
                Outcome::Failed(f) => format!("failed: {f}"),
            };
            println!("{:3}. score={:14.3} id={} {} | {}", i + 1, r.score, r.hypothesis.id_hex(), tail, r.hypothesis);
        }
        sink.add(file, top);

        if let Some(best) = report.ranking.best().filter(|b| b.outcome.is_complete()) {
            let grid = search.render(&best.hypothesis)?;
            let raw = grid.to_be_bytes();
            let packed = zstd::encode_all(&raw[..], 19).context("zstd best frame")?;
            eprintln!(
                "best = {} frame_bytes={} zstd_bytes={} ratio={:.3}",
                best.hypothesis.id_hex(),
                raw.len(),
                packed.len(),
                packed.len() as f64 / raw.len().max(1) as f64
            );
            if let Some(dir) = &args.best_dir {
                let stem = Path::new(file)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("stream");
                let out = Path::new(dir).join(format!("{stem}.best.pgm"));
                let out = out.to_string_lossy().into_owned();
                write_pgm16(&out, &grid)?;
                eprintln!("best_frame = {out}");
            }
        } else {
            eprintln!("best = none (every hypothesis failed)");
        }
    }

    if let Some(path) = &args.report {
        sink.write_csv(path)?;
        eprintln!("report = {path}");
    }
    if let Some(path) = &args.jsonl {
        sink.write_jsonl(path)?;
        eprintln!("jsonl = {path}");
    }
    Ok(())
}
