// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record-level validation.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// Converts one raw record into a typed record.
///
/// Implementations are pure: they neither log nor keep state. [`extract_all`] handles the
/// bookkeeping for rejected records.
pub trait FieldExtractor {
    /// The record as it appears in the JSON payload.
    type Raw;
    /// The validated record.
    type Record;

    /// Name used in diagnostics (for example `"gdp"`).
    const DATASET: &'static str;

    /// Validates `raw`, returning why it was rejected on failure.
    fn extract(&self, raw: &Self::Raw) -> Result<Self::Record, InvalidRecord>;
}

/// Why a single record was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidRecord {
    /// The offending field.
    pub field: &'static str,
    /// What was wrong with it.
    pub reason: String,
}

impl InvalidRecord {
    /// The field is absent or `null`.
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            reason: String::from("missing"),
        }
    }

    /// The field is present but unusable.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Records that passed validation, plus a count of those that did not.
#[derive(Clone, Debug, PartialEq)]
pub struct Extracted<R> {
    /// Valid records in input order.
    pub records: Vec<R>,
    /// Number of rejected records.
    pub dropped: usize,
}

impl<R> Extracted<R> {
    /// Wraps records that needed no validation.
    pub fn all(records: Vec<R>) -> Self {
        Self {
            records,
            dropped: 0,
        }
    }
}

impl<R> Default for Extracted<R> {
    fn default() -> Self {
        Self::all(Vec::new())
    }
}

/// Runs `extractor` over every raw record, dropping and logging the invalid ones.
pub fn extract_all<'a, E>(
    extractor: &E,
    raws: impl IntoIterator<Item = &'a E::Raw>,
) -> Extracted<E::Record>
where
    E: FieldExtractor,
    E::Raw: 'a,
{
    let mut out = Extracted::default();
    for (row, raw) in raws.into_iter().enumerate() {
        match extractor.extract(raw) {
            Ok(record) => out.records.push(record),
            Err(err) => {
                log::warn!(
                    "{}: dropping record {row}: `{}` {}",
                    E::DATASET,
                    err.field,
                    err.reason
                );
                out.dropped += 1;
            }
        }
    }
    if out.dropped > 0 {
        log::debug!(
            "{}: kept {} records, dropped {}",
            E::DATASET,
            out.records.len(),
            out.dropped
        );
    }
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    struct Positive;

    impl FieldExtractor for Positive {
        type Raw = i32;
        type Record = u32;
        const DATASET: &'static str = "positive";

        fn extract(&self, raw: &i32) -> Result<u32, InvalidRecord> {
            u32::try_from(*raw).map_err(|_| InvalidRecord::invalid("value", "negative"))
        }
    }

    #[test]
    fn drops_invalid_and_keeps_order() {
        let raws = vec![3, -1, 5, -7, 0];
        let out = extract_all(&Positive, &raws);
        assert_eq!(out.records, vec![3, 5, 0]);
        assert_eq!(out.dropped, 2);
    }
}
