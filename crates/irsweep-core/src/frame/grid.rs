// crates/irsweep-core/src/frame/grid.rs

use std::fmt;

use crate::error::{Result, SweepError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub width: usize,
    pub height: usize,
}

impl Geometry {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SweepError::Validation(format!(
                "geometry must be non-empty, got {}x{}",
                width, height
            )));
        }
        width
            .checked_mul(height)
            .ok_or_else(|| SweepError::Validation(format!("geometry {}x{} overflows", width, height)))?;
        Ok(Self { width, height })
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.width * self.height
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Row-major grid of 16-bit samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleGrid {
    geometry: Geometry,
    samples: Vec<u16>,
}

impl SampleGrid {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            samples: vec![0; geometry.cells()],
        }
    }

    pub fn from_samples(geometry: Geometry, samples: Vec<u16>) -> Result<Self> {
        if samples.len() != geometry.cells() {
            return Err(SweepError::Validation(format!(
                "{} samples do not fill a {} grid",
                samples.len(),
                geometry
            )));
        }
        Ok(Self { geometry, samples })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn get(&self, y: usize, x: usize) -> u16 {
        self.samples[y * self.geometry.width + x]
    }

    #[inline]
    pub fn set(&mut self, y: usize, x: usize, v: u16) {
        self.samples[y * self.geometry.width + x] = v;
    }

    pub fn row(&self, y: usize) -> &[u16] {
        let w = self.geometry.width;
        &self.samples[y * w..(y + 1) * w]
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Boundary check before handing a grid to a renderer or report.
    pub fn ensure_geometry(&self, expected: Geometry) -> Result<()> {
        if self.geometry != expected || self.samples.len() != expected.cells() {
            return Err(SweepError::GeometryMismatch {
                expected,
                actual: self.geometry,
            });
        }
        Ok(())
    }

    /// Shift every sample left by `bits`, dropping bits above 16.
    pub fn shift_left(&mut self, bits: u8) {
        for s in &mut self.samples {
            *s = s.checked_shl(bits as u32).unwrap_or(0);
        }
    }

    /// Inverse of `shift_left`; None when a sample has any of its low `bits` set.
    pub fn shifted_right(&self, bits: u8) -> Option<SampleGrid> {
        let mask = (1u32 << bits) - 1;
        let samples = self
            .samples
            .iter()
            .map(|&s| (s as u32 & mask == 0).then(|| (s as u32 >> bits) as u16))
            .collect::<Option<Vec<u16>>>()?;
        Some(SampleGrid {
            geometry: self.geometry,
            samples,
        })
    }

    /// CRC-32 over the little-endian sample bytes.
    pub fn checksum(&self) -> u32 {
        let mut h = crc32fast::Hasher::new();
        for s in &self.samples {
            h.update(&s.to_le_bytes());
        }
        h.finalize()
    }

    /// Row-major big-endian bytes, two per sample.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.samples.len() * 2);
        for s in &self.samples {
            out.extend_from_slice(&s.to_be_bytes());
        }
        out
    }
}
