//! Invertible primitives shared by parsing and printing.
//!
//! A [`PartialIso`] runs forwards while parsing (`apply`) and backwards
//! while printing (`unapply`). Either direction may reject a value, which
//! is how range checks and unit conversions slot into a grammar without a
//! second, hand-written printer.

use crate::constants::{
    FAHRENHEIT_OFFSET, FAHRENHEIT_SCALE, KELVIN_OFFSET, MAX_WIRE_MAGNITUDE, METRES_PER_KILOMETRE,
    MILES_PER_KILOMETRE,
};
use std::sync::Arc;

/// A pair of partial functions that invert each other where both are defined
pub trait PartialIso {
    type Source;
    type Target;

    /// Parse direction
    fn apply(&self, a: Self::Source) -> Option<Self::Target>;

    /// Print direction
    fn unapply(&self, b: &Self::Target) -> Option<Self::Source>;
}

/// Total isomorphism: `backward(forward(a)) == a` and `forward(backward(b)) == b`
pub struct Iso<A, B> {
    forward: Arc<dyn Fn(A) -> B + Send + Sync>,
    backward: Arc<dyn Fn(&B) -> A + Send + Sync>,
}

impl<A: 'static, B: 'static> Iso<A, B> {
    pub fn new(
        forward: impl Fn(A) -> B + Send + Sync + 'static,
        backward: impl Fn(&B) -> A + Send + Sync + 'static,
    ) -> Self {
        Self {
            forward: Arc::new(forward),
            backward: Arc::new(backward),
        }
    }

    pub fn forward(&self, a: A) -> B {
        (self.forward)(a)
    }

    pub fn backward(&self, b: &B) -> A {
        (self.backward)(b)
    }
}

impl<A, B> Clone for Iso<A, B> {
    fn clone(&self) -> Self {
        Self {
            forward: Arc::clone(&self.forward),
            backward: Arc::clone(&self.backward),
        }
    }
}

impl<A: 'static, B: 'static> PartialIso for Iso<A, B> {
    type Source = A;
    type Target = B;

    fn apply(&self, a: A) -> Option<B> {
        Some(self.forward(a))
    }

    fn unapply(&self, b: &B) -> Option<A> {
        Some(self.backward(b))
    }
}

/// Refinement of `A` into the subset `B`.
///
/// `embed` is total and `refine` rejects anything outside the subset, so
/// `refine(embed(b)) == Some(b)` for every `b`.
pub struct Prism<A, B> {
    embed: Arc<dyn Fn(&B) -> A + Send + Sync>,
    refine: Arc<dyn Fn(A) -> Option<B> + Send + Sync>,
}

impl<A: 'static, B: 'static> Prism<A, B> {
    pub fn new(
        embed: impl Fn(&B) -> A + Send + Sync + 'static,
        refine: impl Fn(A) -> Option<B> + Send + Sync + 'static,
    ) -> Self {
        Self {
            embed: Arc::new(embed),
            refine: Arc::new(refine),
        }
    }

    pub fn embed(&self, b: &B) -> A {
        (self.embed)(b)
    }

    pub fn refine(&self, a: A) -> Option<B> {
        (self.refine)(a)
    }
}

impl<A, B> Clone for Prism<A, B> {
    fn clone(&self) -> Self {
        Self {
            embed: Arc::clone(&self.embed),
            refine: Arc::clone(&self.refine),
        }
    }
}

impl<A: 'static, B: 'static> PartialIso for Prism<A, B> {
    type Source = A;
    type Target = B;

    fn apply(&self, a: A) -> Option<B> {
        self.refine(a)
    }

    fn unapply(&self, b: &B) -> Option<A> {
        Some(self.embed(b))
    }
}

/// Partial in both directions
pub struct Partial<A, B> {
    apply: Arc<dyn Fn(A) -> Option<B> + Send + Sync>,
    unapply: Arc<dyn Fn(&B) -> Option<A> + Send + Sync>,
}

impl<A: 'static, B: 'static> Partial<A, B> {
    pub fn new(
        apply: impl Fn(A) -> Option<B> + Send + Sync + 'static,
        unapply: impl Fn(&B) -> Option<A> + Send + Sync + 'static,
    ) -> Self {
        Self {
            apply: Arc::new(apply),
            unapply: Arc::new(unapply),
        }
    }
}

impl<A, B> Clone for Partial<A, B> {
    fn clone(&self) -> Self {
        Self {
            apply: Arc::clone(&self.apply),
            unapply: Arc::clone(&self.unapply),
        }
    }
}

impl<A: 'static, B: 'static> PartialIso for Partial<A, B> {
    type Source = A;
    type Target = B;

    fn apply(&self, a: A) -> Option<B> {
        (self.apply)(a)
    }

    fn unapply(&self, b: &B) -> Option<A> {
        (self.unapply)(b)
    }
}

/// Sequential composition `A <-> B <-> C`
pub struct Compose<I, J> {
    first: I,
    second: J,
}

impl<I, J> PartialIso for Compose<I, J>
where
    I: PartialIso,
    J: PartialIso<Source = I::Target>,
{
    type Source = I::Source;
    type Target = J::Target;

    fn apply(&self, a: I::Source) -> Option<J::Target> {
        self.second.apply(self.first.apply(a)?)
    }

    fn unapply(&self, c: &J::Target) -> Option<I::Source> {
        let b = self.second.unapply(c)?;
        self.first.unapply(&b)
    }
}

pub fn compose<I, J>(first: I, second: J) -> Compose<I, J>
where
    I: PartialIso,
    J: PartialIso<Source = I::Target>,
{
    Compose { first, second }
}

// =============================================================================
// Primitives
// =============================================================================

pub fn identity<T: Clone + 'static>() -> Iso<T, T> {
    Iso::new(|t| t, |t: &T| t.clone())
}

/// Characters to the string they spell
pub fn chars_to_string() -> Iso<Vec<char>, String> {
    Iso::new(|chars: Vec<char>| chars.into_iter().collect(), |s: &String| s.chars().collect())
}

/// Decimal text to the integer it denotes
pub fn decimal() -> Prism<String, i64> {
    Prism::new(|n: &i64| n.to_string(), |s: String| s.parse().ok())
}

/// Admit only integers within `[lower, upper]`
pub fn bounded(lower: i64, upper: i64) -> Prism<i64, i64> {
    Prism::new(|n: &i64| *n, move |n| (lower..=upper).contains(&n).then_some(n))
}

/// Left-pad printed characters up to `width`; parsing passes through
pub fn pad_left(width: usize, fill: char) -> Iso<Vec<char>, Vec<char>> {
    Iso::new(
        |chars| chars,
        move |chars: &Vec<char>| {
            let padding = width.saturating_sub(chars.len());
            std::iter::repeat_n(fill, padding)
                .chain(chars.iter().copied())
                .collect()
        },
    )
}

/// Integer to real; printing rounds to the nearest integer.
///
/// Both directions reject magnitudes above [`MAX_WIRE_MAGNITUDE`], and
/// printing also rejects non-finite values.
pub fn integral() -> Partial<i64, f64> {
    Partial::new(
        |n| {
            let value = n as f64;
            (value.abs() <= MAX_WIRE_MAGNITUDE).then_some(value)
        },
        |v: &f64| {
            let rounded = v.round();
            (rounded.is_finite() && rounded.abs() <= MAX_WIRE_MAGNITUDE).then_some(rounded as i64)
        },
    )
}

pub fn celsius_to_kelvin() -> Iso<f64, f64> {
    Iso::new(|c| c + KELVIN_OFFSET, |k: &f64| k - KELVIN_OFFSET)
}

pub fn fahrenheit_to_kelvin() -> Iso<f64, f64> {
    Iso::new(
        |f| (f - FAHRENHEIT_OFFSET) / FAHRENHEIT_SCALE + KELVIN_OFFSET,
        |k: &f64| (k - KELVIN_OFFSET) * FAHRENHEIT_SCALE + FAHRENHEIT_OFFSET,
    )
}

pub fn miles_to_kilometres() -> Iso<f64, f64> {
    Iso::new(
        |mi| mi / MILES_PER_KILOMETRE,
        |km: &f64| km * MILES_PER_KILOMETRE,
    )
}

pub fn metres_to_kilometres() -> Iso<f64, f64> {
    Iso::new(
        |m| m / METRES_PER_KILOMETRE,
        |km: &f64| km * METRES_PER_KILOMETRE,
    )
}
