// crates/irsweep-core/src/hypothesis/space.rs
//
// The hypothesis space is the Cartesian product of per-axis value lists.
// Enumeration order is fixed (order, align, scheme, predictor, sign, seeding,
// reset, scan, shift; last axis varies fastest) so a search is reproducible.

use std::str::FromStr;

use log::debug;

use super::axes::{ResetPolicy, ScanOrder, Scheme, Seeding};
use super::Hypothesis;
use crate::bits::BitOrder;
use crate::entropy::SignConvention;
use crate::error::{Result, SweepError};
use crate::frame::Geometry;
use crate::predict::Predictor;
use crate::validate::validate_hypothesis;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchSpace {
    pub orders: Vec<BitOrder>,
    pub aligns: Vec<u8>,
    pub schemes: Vec<Scheme>,
    pub predictors: Vec<Predictor>,
    pub signs: Vec<SignConvention>,
    pub seedings: Vec<Seeding>,
    pub resets: Vec<ResetPolicy>,
    pub scans: Vec<ScanOrder>,
    pub shifts: Vec<u8>,
}

/// A hypothesis dropped before dispatch, with the reason.
#[derive(Clone, Debug)]
pub struct Rejected {
    pub hypothesis: Hypothesis,
    pub reason: String,
}

impl SearchSpace {
    /// Number of hypotheses before validation.
    pub fn size(&self) -> usize {
        self.orders.len()
            * self.aligns.len()
            * self.schemes.len()
            * self.predictors.len()
            * self.signs.len()
            * self.seedings.len()
            * self.resets.len()
            * self.scans.len()
            * self.shifts.len()
    }

    /// Expand the product and split it into dispatchable and rejected hypotheses.
    pub fn enumerate(&self, geometry: Geometry) -> (Vec<Hypothesis>, Vec<Rejected>) {
        let mut ok = Vec::with_capacity(self.size());
        let mut rejected = Vec::new();
        for &order in &self.orders {
            for &align in &self.aligns {
                for &scheme in &self.schemes {
                    for &predictor in &self.predictors {
                        for &sign in &self.signs {
                            for &seeding in &self.seedings {
                                for &reset in &self.resets {
                                    for &scan in &self.scans {
                                        for &shift in &self.shifts {
                                            let h = Hypothesis {
                                                order,
                                                align,
                                                scheme,
                                                predictor,
                                                sign,
                                                seeding,
                                                reset,
                                                scan,
                                                shift,
                                            };
                                            match validate_hypothesis(&h, geometry) {
                                                Ok(()) => ok.push(h),
                                                Err(e) => {
                                                    debug!("rejected {}: {}", h, e);
                                                    rejected.push(Rejected {
                                                        hypothesis: h,
                                                        reason: e.to_string(),
                                                    });
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        (ok, rejected)
    }
}

/// Comma-separated list of axis tokens.
pub fn parse_list<T>(s: &str) -> Result<Vec<T>>
where
    T: FromStr<Err = SweepError>,
{
    let out = s
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(T::from_str)
        .collect::<Result<Vec<T>>>()?;
    if out.is_empty() {
        return Err(SweepError::InvalidConfig(format!("empty axis list {:?}", s)));
    }
    Ok(out)
}

fn parse_range(tok: &str, what: &str) -> Result<Vec<u8>> {
    let bad = || SweepError::InvalidConfig(format!("bad {} {:?}", what, tok));
    match tok.split_once('-') {
        Some((lo, hi)) => {
            let lo: u8 = lo.trim().parse().map_err(|_| bad())?;
            let hi: u8 = hi.trim().parse().map_err(|_| bad())?;
            if lo > hi {
                return Err(bad());
            }
            Ok((lo..=hi).collect())
        }
        None => Ok(vec![tok.trim().parse().map_err(|_| bad())?]),
    }
}

fn parse_small_list(s: &str, what: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for tok in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        out.extend(parse_range(tok, what)?);
    }
    if out.is_empty() {
        return Err(SweepError::InvalidConfig(format!("empty {} list", what)));
    }
    Ok(out)
}

/// Alignments: `0-7`, `0,3,5`.
pub fn parse_aligns(s: &str) -> Result<Vec<u8>> {
    parse_small_list(s, "alignment")
}

/// Output shifts: `0,2,4`.
pub fn parse_shifts(s: &str) -> Result<Vec<u8>> {
    parse_small_list(s, "shift")
}

/// Schemes with shorthands: `rice:4-6`, `lzss`, `bitplane`, plus any single token.
pub fn parse_schemes(s: &str) -> Result<Vec<Scheme>> {
    let mut out = Vec::new();
    for tok in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match tok {
            "lzss" => out.extend(Scheme::lzss_family()),
            "bitplane" => out.extend(Scheme::bitplane_family()),
            _ => {
                if let Some(ks) = tok.strip_prefix("rice:") {
                    if ks.contains('-') {
                        out.extend(parse_range(ks, "rice k")?.into_iter().map(|k| Scheme::Rice { k }));
                        continue;
                    }
                }
                out.push(tok.parse()?);
            }
        }
    }
    if out.is_empty() {
        return Err(SweepError::InvalidConfig("empty scheme list".into()));
    }
    Ok(out)
}
