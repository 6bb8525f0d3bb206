// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positional scales.
//!
//! Continuous scales validate their domain once at construction: empty or non-finite domains are
//! rejected with a [`ScaleError`], and a degenerate domain (`min == max`) is widened by one unit
//! so that mapping never divides by zero.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use peniko::Color;

use crate::time;

/// Errors returned when building a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleError {
    /// No domain values were available.
    EmptyDomain,
    /// A domain bound is NaN or infinite.
    NonFiniteDomain,
    /// The output range is empty.
    EmptyRange,
    /// A range bound is NaN or infinite.
    NonFiniteRange,
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDomain => f.write_str("scale domain is empty"),
            Self::NonFiniteDomain => f.write_str("scale domain is not finite"),
            Self::EmptyRange => f.write_str("scale range is empty"),
            Self::NonFiniteRange => f.write_str("scale range is not finite"),
        }
    }
}

impl core::error::Error for ScaleError {}

/// The kind of a scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleKind {
    /// Continuous linear scale.
    Linear,
    /// Continuous time scale.
    Time,
    /// Discrete band scale.
    Band,
    /// Continuous domain onto a color ramp.
    Sequential,
    /// Categories onto a color list.
    Ordinal,
}

/// A scale domain.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleDomain {
    /// `[min, max]` (possibly inverted).
    Continuous(f64, f64),
    /// Discrete categories.
    Categories(Vec<String>),
}

/// A scale range.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleRange {
    /// `[start, end]` in pixels.
    Continuous(f64, f64),
    /// Band start offsets in pixels.
    Bands(Vec<f64>),
    /// Output colors.
    Colors(Vec<Color>),
}

/// A plain description of a built scale: kind, domain and range.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleSpec {
    /// Scale kind.
    pub kind: ScaleKind,
    /// Domain.
    pub domain: ScaleDomain,
    /// Range.
    pub range: ScaleRange,
}

impl ScaleSpec {
    /// Checks the invariants every built scale satisfies.
    ///
    /// Domain and range must be non-empty, and continuous domains must have `min != max`.
    pub fn validate(&self) -> Result<(), ScaleError> {
        match &self.domain {
            ScaleDomain::Continuous(d0, d1) => {
                if !d0.is_finite() || !d1.is_finite() {
                    return Err(ScaleError::NonFiniteDomain);
                }
                if d0 == d1 {
                    return Err(ScaleError::EmptyDomain);
                }
            }
            ScaleDomain::Categories(c) if c.is_empty() => return Err(ScaleError::EmptyDomain),
            ScaleDomain::Categories(_) => {}
        }
        match &self.range {
            ScaleRange::Continuous(r0, r1) if !r0.is_finite() || !r1.is_finite() => {
                Err(ScaleError::NonFiniteRange)
            }
            ScaleRange::Bands(b) if b.is_empty() => Err(ScaleError::EmptyRange),
            ScaleRange::Colors(c) if c.is_empty() => Err(ScaleError::EmptyRange),
            _ => Ok(()),
        }
    }
}

/// Validates a continuous domain, widening `min == max` to `[min, min + 1]`.
pub fn continuous_domain(d0: f64, d1: f64) -> Result<(f64, f64), ScaleError> {
    if !d0.is_finite() || !d1.is_finite() {
        return Err(ScaleError::NonFiniteDomain);
    }
    if d0 == d1 {
        return Ok((d0, d0 + 1.0));
    }
    Ok((d0, d1))
}

fn checked_range(r0: f64, r1: f64) -> Result<(f64, f64), ScaleError> {
    if !r0.is_finite() || !r1.is_finite() {
        return Err(ScaleError::NonFiniteRange);
    }
    Ok((r0, r1))
}

/// Returns `(min, max)` of the finite values, or `None` if there are none.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a scale mapping `domain` onto `range`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self, ScaleError> {
        Ok(Self {
            domain: continuous_domain(domain.0, domain.1)?,
            range: checked_range(range.0, range.1)?,
        })
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = (x - d0) / (d1 - d0);
        r0 + t * (r1 - r0)
    }

    /// Maps a range value back into the domain.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (y - r0) / (r1 - r0) * (d1 - d0)
    }

    /// The effective domain (after widening).
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns a copy with a new output range.
    pub fn with_range(self, range: (f64, f64)) -> Result<Self, ScaleError> {
        Self::new(self.domain, range)
    }

    /// Returns "nice" tick values for the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }

    /// Describes this scale.
    pub fn spec(&self) -> ScaleSpec {
        ScaleSpec {
            kind: ScaleKind::Linear,
            domain: ScaleDomain::Continuous(self.domain.0, self.domain.1),
            range: ScaleRange::Continuous(self.range.0, self.range.1),
        }
    }
}

/// Tick values at multiples of a nice step covering `[min, max]`.
///
/// Only ticks inside the domain are returned.
pub fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).ceil();
    let stop = (max / step).floor();
    let n_f = (stop - start).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f.min(10_000.0) as u64
        }
    } else {
        return Vec::new();
    };
    (0..=n).map(|i| (start + i as f64) * step).collect()
}

/// Rounds a raw step up to 1, 2, 5 or 10 times a power of ten.
pub fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.07 {
        10.0
    } else if error >= 3.16 {
        5.0
    } else if error >= 1.41 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// A time scale over epoch seconds (or seconds since midnight for durations).
///
/// Mapping is linear; ticks switch to calendar years once the domain spans more than a year.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self, ScaleError> {
        Ok(Self {
            inner: ScaleLinear::new(domain, range)?,
        })
    }

    /// Maps a timestamp (seconds) into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// The effective domain.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    /// The output range.
    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    /// Returns tick values: calendar years for long spans, clock steps otherwise.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.inner.domain();
        if (d1 - d0).abs() > time::SECONDS_PER_YEAR {
            time::year_ticks(d0, d1, count)
        } else {
            time::clock_ticks(d0, d1, count)
        }
    }

    /// Describes this scale.
    pub fn spec(&self) -> ScaleSpec {
        let (d0, d1) = self.inner.domain();
        let (r0, r1) = self.inner.range();
        ScaleSpec {
            kind: ScaleKind::Time,
            domain: ScaleDomain::Continuous(d0, d1),
            range: ScaleRange::Continuous(r0, r1),
        }
    }
}

/// A discrete band scale over `count` slots.
///
/// Padding defaults to zero, so adjacent bands touch (heat-map cells).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a band scale covering `count` bands over `range`.
    pub fn new(range: (f64, f64), count: usize) -> Result<Self, ScaleError> {
        if count == 0 {
            return Err(ScaleError::EmptyDomain);
        }
        Ok(Self {
            range: checked_range(range.0, range.1)?,
            count,
            padding_inner: 0.0,
            padding_outer: 0.0,
        })
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        let denom = n - self.padding_inner + 2.0 * self.padding_outer;
        if denom <= 0.0 {
            0.0
        } else {
            (r1 - r0).abs() / denom
        }
    }

    /// Width of a single band.
    pub fn band_width(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Start position of band `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let start = r0.min(r1);
        start + self.step() * (self.padding_outer + index as f64)
    }

    /// Center position of band `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + 0.5 * self.band_width()
    }

    /// Describes this scale.
    pub fn spec(&self) -> ScaleSpec {
        ScaleSpec {
            kind: ScaleKind::Band,
            domain: ScaleDomain::Categories((0..self.count).map(|i| alloc::format!("{i}")).collect()),
            range: ScaleRange::Bands((0..self.count).map(|i| self.x(i)).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn linear_midpoint() {
        let s = ScaleLinear::new((0.0, 100.0), (0.0, 10.0)).unwrap();
        assert_eq!(s.map(50.0), 5.0);
    }

    #[test]
    fn degenerate_domain_is_widened() {
        let s = ScaleLinear::new((5.0, 5.0), (0.0, 10.0)).unwrap();
        assert_eq!(s.domain(), (5.0, 6.0));
        assert_eq!(s.map(5.0), 0.0);
        assert!(s.map(7.0).is_finite());
        assert!(s.spec().validate().is_ok());
    }

    #[test]
    fn non_finite_domain_is_rejected() {
        assert_eq!(
            ScaleLinear::new((f64::NAN, 1.0), (0.0, 1.0)),
            Err(ScaleError::NonFiniteDomain)
        );
        assert_eq!(
            ScaleLinear::new((0.0, 1.0), (0.0, f64::INFINITY)),
            Err(ScaleError::NonFiniteRange)
        );
    }

    #[test]
    fn inverted_range_grows_downward() {
        let y = ScaleLinear::new((0.0, 20_000.0), (450.0, 50.0)).unwrap();
        assert_eq!(y.map(0.0), 450.0);
        assert_eq!(y.map(20_000.0), 50.0);
        assert!((y.invert(250.0) - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn nice_ticks_stay_inside_domain() {
        let ticks = nice_ticks(0.0, 18_000.0, 10);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&18_000.0));
        assert!(ticks.windows(2).all(|w| (w[1] - w[0] - 2000.0).abs() < 1e-9));
    }

    #[test]
    fn band_scale_without_padding_tiles_range() {
        let band = ScaleBand::new((80.0, 720.0), 12).unwrap();
        assert!((band.band_width() * 12.0 - 640.0).abs() < 1e-9);
        assert_eq!(band.x(0), 80.0);
        assert!((band.x(11) + band.band_width() - 720.0).abs() < 1e-9);
        assert!(ScaleBand::new((0.0, 1.0), 0).is_err());
    }

    #[test]
    fn spec_validation_rejects_empty_categories() {
        let spec = ScaleSpec {
            kind: ScaleKind::Ordinal,
            domain: ScaleDomain::Categories(Vec::new()),
            range: ScaleRange::Colors(Vec::new()),
        };
        assert_eq!(spec.validate(), Err(ScaleError::EmptyDomain));
    }

    #[test]
    fn extent_ignores_non_finite() {
        assert_eq!(extent([3.0, f64::NAN, -1.0, 8.0]), Some((-1.0, 8.0)));
        assert_eq!(extent([f64::NAN]), None);
    }

    proptest! {
        #[test]
        fn linear_map_is_finite_and_hits_endpoints(
            d0 in -1.0e6..1.0e6_f64,
            span in prop_oneof![Just(0.0), 1.0e-3..1.0e6_f64],
            r0 in -1.0e3..1.0e3_f64,
            r1 in -1.0e3..1.0e3_f64,
        ) {
            let s = ScaleLinear::new((d0, d0 + span), (r0, r1)).unwrap();
            let (lo, hi) = s.domain();
            prop_assert!(lo != hi);
            prop_assert!((s.map(lo) - r0).abs() < 1e-6);
            prop_assert!((s.map(hi) - r1).abs() < 1e-6);
            prop_assert!(s.map(d0 + 0.5 * span).is_finite());
        }
    }
}
