// crates/irsweep-core/src/frame/mod.rs

pub mod grid;

pub use grid::{Geometry, SampleGrid};
