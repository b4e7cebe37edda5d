// crates/irsweep-cli/src/io/mod.rs

pub mod pgm;
pub mod report;
