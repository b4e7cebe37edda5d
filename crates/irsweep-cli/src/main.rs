// crates/irsweep-cli/src/main.rs

use clap::{Parser, Subcommand};

mod cmd;
mod io;

#[derive(Parser)]
#[command(name = "irsweep-cli")]
#[command(about = "Blind codec reconstruction: hypothesis sweeps over raw frame streams", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode each input under every hypothesis of a search space and rank them
    Sweep(cmd::sweep::SweepArgs),

    /// Reconstruct and score a single hypothesis
    Decode(cmd::decode::DecodeArgs),

    /// Encode a PGM (or a synthetic test pattern) under a hypothesis
    Synth(cmd::synth::SynthArgs),
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Sweep(args) => cmd::sweep::run(args),
        Commands::Decode(args) => cmd::decode::run(args),
        Commands::Synth(args) => cmd::synth::run(args),
    }
}
