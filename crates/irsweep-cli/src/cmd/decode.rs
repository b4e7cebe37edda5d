// crates/irsweep-cli/src/cmd/decode.rs

use anyhow::Context;
use clap::Args;
use irsweep_core::score::{score_decoded, ScoreWeights};
use irsweep_core::validate::validate_hypothesis;
use irsweep_core::{reconstruct, EvalLimits, Geometry, Hypothesis};

use crate::io::pgm::write_pgm16;

#[derive(Args)]
pub struct DecodeArgs {
    /// Raw stream path
    #[arg(long)]
    pub r#in: String,

    #[arg(long)]
    pub width: usize,

    #[arg(long)]
    pub height: usize,

    /// Hypothesis label, e.g. "order=msb scheme=rice:4 pred=left seed=row16"
    #[arg(long)]
    pub hypothesis: String,

    /// Write the reconstructed frame as 16-bit PGM
    #[arg(long)]
    pub out: Option<String>,

    #[arg(long, default_value_t = irsweep_core::entropy::UNARY_GUARD)]
    pub unary_guard: u32,
}

pub fn run(args: DecodeArgs) -> anyhow::Result<()> {
    let geometry = Geometry::new(args.width, args.height)?;
    let h: Hypothesis = args.hypothesis.parse().context("--hypothesis")?;
    validate_hypothesis(&h, geometry)?;

    let stream = std::fs::read(&args.r#in).with_context(|| format!("read stream: {}", args.r#in))?;
    let limits = EvalLimits {
        unary_guard: args.unary_guard,
        max_steps: None,
    };

    let decoded = reconstruct(&stream, geometry, &h, &limits).with_context(|| format!("decode {h}"))?;
    let (score, m) = score_decoded(&decoded, &ScoreWeights::default());

    eprintln!("hypothesis = {h}");
    eprintln!("id = {}", h.id_hex());
    eprintln!(
        "bits_consumed = {} slack_bytes = {} frame_crc = {:08x}",
        decoded.bits_consumed(),
        decoded.slack_bytes(),
        decoded.grid.checksum()
    );
    eprintln!(
        "score = {:.3} h_grad = {:.3} v_grad = {:.3} row_mean_var = {:.3} std = {:.3} sat = {:.4} chi2 = {}",
        score,
        m.h_grad,
        m.v_grad,
        m.row_mean_var,
        m.std_dev,
        m.saturation,
        m.chi2.map(|c| format!("{c:.3}")).unwrap_or_else(|| "-".into())
    );

    if let Some(out) = &args.out {
        decoded.grid.ensure_geometry(geometry)?;
        write_pgm16(out, &decoded.grid)?;
        eprintln!("decode ok: out={out}");
    }
    Ok(())
}
