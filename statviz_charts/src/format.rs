// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting for tick labels.

extern crate alloc;

use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Formats `v` with as many decimals as `step` needs, grouping thousands with commas.
///
/// `format_number(12000.0, 2000.0)` is `"12,000"`, `format_number(0.25, 0.05)` is `"0.25"`.
pub fn format_number(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return alloc::format!("{v}");
    }
    let decimals = decimals_for_step(step);
    let raw = alloc::format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut out = String::with_capacity(raw.len() + raw.len() / 3 + 1);
    if v < 0.0 && raw.bytes().any(|b| b != b'0' && b != b'.') {
        out.push('-');
    }
    let digits = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

fn decimals_for_step(step: f64) -> usize {
    let step = step.abs();
    if !step.is_finite() || step == 0.0 || step >= 1.0 {
        return 0;
    }
    let d = (-step.log10()).ceil().clamp(0.0, 12.0);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to 0..=12")]
    {
        d as usize
    }
}
