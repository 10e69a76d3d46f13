//! Monoid catalog.
//!
//! Each type has an identity (`empty`) and an associative `combine`. The
//! real-valued accumulators that can drift under reassociation (`Additive`
//! and `Mean`) are compared with [`ApproxEq`]; the rest compare exactly.

use crate::constants::TOLERANCE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Associative combine with an identity element
pub trait Monoid: Sized {
    fn empty() -> Self;

    fn combine(&self, other: &Self) -> Self;

    /// Left fold from the identity
    fn concat<'a, I>(values: I) -> Self
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        values
            .into_iter()
            .fold(Self::empty(), |acc, value| acc.combine(value))
    }
}

/// Equality that tolerates floating point reassociation error
pub trait ApproxEq {
    fn approx_eq(&self, other: &Self) -> bool;
}

/// `|a - b| <= TOLERANCE * max(1, |a|, |b|)`; infinities must match exactly
pub fn approx_eq_f64(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    let scale = 1.0_f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= TOLERANCE * scale
}

/// Sum of reals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Additive(pub f64);

impl Additive {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Monoid for Additive {
    fn empty() -> Self {
        Additive(0.0)
    }

    fn combine(&self, other: &Self) -> Self {
        Additive(self.0 + other.0)
    }
}

impl ApproxEq for Additive {
    fn approx_eq(&self, other: &Self) -> bool {
        approx_eq_f64(self.0, other.0)
    }
}

/// Smallest real seen; `+inf` when nothing was seen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Min(pub f64);

impl Min {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Monoid for Min {
    fn empty() -> Self {
        Min(f64::INFINITY)
    }

    fn combine(&self, other: &Self) -> Self {
        Min(self.0.min(other.0))
    }
}

impl ApproxEq for Min {
    fn approx_eq(&self, other: &Self) -> bool {
        self == other
    }
}

/// Largest real seen; `-inf` when nothing was seen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Max(pub f64);

impl Max {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Monoid for Max {
    fn empty() -> Self {
        Max(f64::NEG_INFINITY)
    }

    fn combine(&self, other: &Self) -> Self {
        Max(self.0.max(other.0))
    }
}

impl ApproxEq for Max {
    fn approx_eq(&self, other: &Self) -> bool {
        self == other
    }
}

/// Running mean kept as total and count
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Mean {
    pub total: f64,
    pub count: u64,
}

impl Mean {
    pub fn of(value: f64) -> Self {
        Self {
            total: value,
            count: 1,
        }
    }

    /// `total / count`, absent while nothing was counted
    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

impl Monoid for Mean {
    fn empty() -> Self {
        Self::default()
    }

    fn combine(&self, other: &Self) -> Self {
        Self {
            total: self.total + other.total,
            count: self.count + other.count,
        }
    }
}

impl ApproxEq for Mean {
    fn approx_eq(&self, other: &Self) -> bool {
        self.count == other.count && approx_eq_f64(self.total, other.total)
    }
}

/// Leftmost present value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct First<T>(pub Option<T>);

impl<T> First<T> {
    pub fn value(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<T: Clone> Monoid for First<T> {
    fn empty() -> Self {
        First(None)
    }

    fn combine(&self, other: &Self) -> Self {
        First(self.0.clone().or_else(|| other.0.clone()))
    }
}

impl<T: PartialEq> ApproxEq for First<T> {
    fn approx_eq(&self, other: &Self) -> bool {
        self == other
    }
}

/// Rightmost present value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Last<T>(pub Option<T>);

impl<T> Last<T> {
    pub fn value(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<T: Clone> Monoid for Last<T> {
    fn empty() -> Self {
        Last(None)
    }

    fn combine(&self, other: &Self) -> Self {
        Last(other.0.clone().or_else(|| self.0.clone()))
    }
}

impl<T: PartialEq> ApproxEq for Last<T> {
    fn approx_eq(&self, other: &Self) -> bool {
        self == other
    }
}

/// Occurrence count per key
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupBy(pub BTreeMap<String, u64>);

impl GroupBy {
    /// One occurrence of `key`
    pub fn single(key: impl Into<String>) -> Self {
        let mut counts = BTreeMap::new();
        counts.insert(key.into(), 1);
        GroupBy(counts)
    }

    pub fn count(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.0
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl Monoid for GroupBy {
    fn empty() -> Self {
        Self::default()
    }

    fn combine(&self, other: &Self) -> Self {
        let mut counts = self.0.clone();
        for (key, count) in &other.0 {
            *counts.entry(key.clone()).or_insert(0) += count;
        }
        GroupBy(counts)
    }
}

impl ApproxEq for GroupBy {
    fn approx_eq(&self, other: &Self) -> bool {
        self == other
    }
}
