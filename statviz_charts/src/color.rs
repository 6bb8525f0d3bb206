// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color scales.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use peniko::Color;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::scale::{ScaleDomain, ScaleError, ScaleKind, ScaleRange, ScaleSpec, continuous_domain};
use crate::schemes::ColorScheme;

/// Maps a continuous domain onto a color ramp.
///
/// Values outside the domain clamp to the ramp ends. Between stops the ramp is interpolated
/// linearly in sRGB.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleSequential {
    domain: (f64, f64),
    stops: Vec<Color>,
}

impl ScaleSequential {
    /// Creates a sequential scale over `domain` using `stops` as the ramp.
    pub fn new(domain: (f64, f64), stops: Vec<Color>) -> Result<Self, ScaleError> {
        if stops.is_empty() {
            return Err(ScaleError::EmptyRange);
        }
        Ok(Self {
            domain: continuous_domain(domain.0, domain.1)?,
            stops,
        })
    }

    /// Creates a sequential scale over `domain` using a named scheme.
    pub fn with_scheme(domain: (f64, f64), scheme: ColorScheme) -> Result<Self, ScaleError> {
        Self::new(domain, scheme.colors())
    }

    /// The effective domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Ramp color at normalized position `t` (clamped to `0..=1`).
    pub fn interpolate(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.stops.len() - 1;
        if last == 0 {
            return self.stops[0];
        }
        let pos = t * last as f64;
        #[allow(clippy::cast_possible_truncation, reason = "pos is within 0..=last")]
        let i = (pos.floor() as usize).min(last - 1);
        let frac = pos - i as f64;
        lerp_rgb(self.stops[i], self.stops[i + 1], frac)
    }

    /// Maps a domain value to a color.
    pub fn map(&self, v: f64) -> Color {
        let (d0, d1) = self.domain;
        self.interpolate((v - d0) / (d1 - d0))
    }

    /// Samples the ramp at the centers of `n` equal slots, for discrete legends.
    pub fn quantize(&self, n: usize) -> Vec<Color> {
        (0..n)
            .map(|i| self.interpolate((i as f64 + 0.5) / n as f64))
            .collect()
    }

    /// Describes this scale.
    pub fn spec(&self) -> ScaleSpec {
        ScaleSpec {
            kind: ScaleKind::Sequential,
            domain: ScaleDomain::Continuous(self.domain.0, self.domain.1),
            range: ScaleRange::Colors(self.stops.clone()),
        }
    }
}

fn lerp_rgb(a: Color, b: Color, t: f64) -> Color {
    let a = a.to_rgba8();
    let b = b.to_rgba8();
    let mix = |x: u8, y: u8| -> u8 {
        let v = f64::from(x) + (f64::from(y) - f64::from(x)) * t;
        #[allow(clippy::cast_possible_truncation, reason = "clamped to the u8 range")]
        {
            v.round().clamp(0.0, 255.0) as u8
        }
    };
    Color::from_rgba8(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

/// Maps categories onto a color list, cycling when there are more categories than colors.
#[derive(Clone, Debug)]
pub struct ScaleOrdinal {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    colors: Vec<Color>,
}

impl ScaleOrdinal {
    /// Creates an ordinal scale. Duplicate categories keep their first position.
    pub fn new(domain: impl IntoIterator<Item = String>, colors: Vec<Color>) -> Result<Self, ScaleError> {
        if colors.is_empty() {
            return Err(ScaleError::EmptyRange);
        }
        let mut out = Self {
            domain: Vec::new(),
            index: HashMap::new(),
            colors,
        };
        for key in domain {
            if !out.index.contains_key(&key) {
                out.index.insert(key.clone(), out.domain.len());
                out.domain.push(key);
            }
        }
        if out.domain.is_empty() {
            return Err(ScaleError::EmptyDomain);
        }
        Ok(out)
    }

    /// The categories in domain order.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Color for `key`, or `None` for an unknown category.
    pub fn map(&self, key: &str) -> Option<Color> {
        let i = *self.index.get(key)?;
        Some(self.colors[i % self.colors.len()])
    }

    /// Describes this scale.
    pub fn spec(&self) -> ScaleSpec {
        ScaleSpec {
            kind: ScaleKind::Ordinal,
            domain: ScaleDomain::Categories(self.domain.clone()),
            range: ScaleRange::Colors(self.colors.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn sequential_midpoint_and_extremes() {
        let s = ScaleSequential::with_scheme((-7.0, 7.0), ColorScheme::YlOrRd).unwrap();
        let stops = ColorScheme::YlOrRd.colors();
        assert_eq!(s.map(0.0), s.interpolate(0.5));
        assert_eq!(s.map(0.0).to_rgba8(), stops[4].to_rgba8());
        assert_eq!(s.map(-7.0), s.interpolate(0.0));
        assert_eq!(s.map(7.0), s.interpolate(1.0));
        assert_eq!(s.map(-7.0).to_rgba8(), stops[0].to_rgba8());
        assert_eq!(s.map(7.0).to_rgba8(), stops[8].to_rgba8());
    }

    #[test]
    fn sequential_clamps_outside_domain() {
        let s = ScaleSequential::with_scheme((0.0, 10.0), ColorScheme::Blues).unwrap();
        assert_eq!(s.map(-3.0), s.map(0.0));
        assert_eq!(s.map(42.0), s.map(10.0));
    }

    #[test]
    fn quantize_samples_slot_centers() {
        let s = ScaleSequential::with_scheme((0.0, 10.0), ColorScheme::Blues).unwrap();
        let q = s.quantize(10);
        assert_eq!(q.len(), 10);
        assert_eq!(q[0], s.map(0.5));
        assert_eq!(q[9], s.map(9.5));
        assert!(s.quantize(0).is_empty());
    }

    #[test]
    fn ordinal_cycles_and_rejects_unknown() {
        let s = ScaleOrdinal::new(
            ["a", "b", "c"].map(ToString::to_string),
            vec![Color::from_rgb8(1, 0, 0), Color::from_rgb8(0, 1, 0)],
        )
        .unwrap();
        assert_eq!(s.map("c"), s.map("a"));
        assert_ne!(s.map("a"), s.map("b"));
        assert_eq!(s.map("zzz"), None);
        assert!(s.spec().validate().is_ok());
    }
}
