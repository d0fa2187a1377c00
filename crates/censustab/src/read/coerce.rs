//! Typed coercion of raw content cells to nullable numbers.
//!
//! Survey files mark missing cells with a non-numeric placeholder, most
//! often `.`. Coercion maps every declared placeholder to null, and any other
//! non-numeric cell to null as well, counting it separately so readers can
//! report unexpected values. Coercion never fails.

/// Placeholders that denote a missing value.
pub static MISSING_SENTINELS: &[&str] = &[".", "", "-", "(X)", "N", "NA", "null"];

/// Outcome of coercing one raw cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    Number(f64),
    /// A declared missing-value placeholder.
    Missing,
    /// Text that is neither a number nor a declared placeholder.
    Invalid,
}

impl Coerced {
    pub fn value(self) -> Option<f64> {
        match self {
            Coerced::Number(v) => Some(v),
            Coerced::Missing | Coerced::Invalid => None,
        }
    }
}

/// Whether a raw cell is a declared missing-value placeholder.
pub fn is_missing_sentinel(raw: &str) -> bool {
    let trimmed = raw.trim();
    MISSING_SENTINELS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(trimmed))
}

/// Coerce one raw cell.
pub fn coerce_cell(raw: &str) -> Coerced {
    if is_missing_sentinel(raw) {
        return Coerced::Missing;
    }
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Coerced::Number(v),
        _ => Coerced::Invalid,
    }
}

/// Coerce one raw cell to a nullable number.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    coerce_cell(raw).value()
}

/// Counts gathered while coercing a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoercionStats {
    pub values: usize,
    pub missing: usize,
    pub invalid: usize,
}

impl CoercionStats {
    /// Coerce a cell and record the outcome.
    pub fn coerce(&mut self, raw: &str) -> Option<f64> {
        let coerced = coerce_cell(raw);
        match coerced {
            Coerced::Number(_) => self.values += 1,
            Coerced::Missing => self.missing += 1,
            Coerced::Invalid => self.invalid += 1,
        }
        coerced.value()
    }
}
