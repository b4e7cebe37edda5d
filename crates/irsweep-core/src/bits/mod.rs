// crates/irsweep-core/src/bits/mod.rs

pub mod cursor;
pub mod writer;

pub use cursor::{BitAddress, BitCursor, BitOrder};
pub use writer::BitWriter;
