// crates/irsweep-cli/src/cmd/mod.rs

pub mod decode;
pub mod sweep;
pub mod synth;
