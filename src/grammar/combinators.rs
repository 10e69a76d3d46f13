//! Grammar combinators that parse and print from one definition.
//!
//! Every combinator implements [`Syntax`] in both directions. Larger
//! grammars are built by nesting these values; nothing here knows about
//! observations.

use super::Syntax;
use super::iso::PartialIso;
use std::fmt::Write;

/// Result of an alternation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<T> Either<T, T> {
    pub fn into_inner(self) -> T {
        match self {
            Either::Left(value) | Either::Right(value) => value,
        }
    }
}

/// Exact text carrying no value
#[derive(Debug, Clone, Copy)]
pub struct Literal {
    text: &'static str,
}

impl Syntax for Literal {
    type Value = ();

    fn parse<'a>(&self, input: &'a str) -> Option<((), &'a str)> {
        input.strip_prefix(self.text).map(|rest| ((), rest))
    }

    fn print(&self, _value: &(), out: &mut String) -> Option<()> {
        out.push_str(self.text);
        Some(())
    }
}

pub fn literal(text: &'static str) -> Literal {
    Literal { text }
}

/// Exact text that is also the value; prints only that same text
#[derive(Debug, Clone, Copy)]
pub struct Token {
    text: &'static str,
}

impl Syntax for Token {
    type Value = String;

    fn parse<'a>(&self, input: &'a str) -> Option<(String, &'a str)> {
        input
            .strip_prefix(self.text)
            .map(|rest| (self.text.to_string(), rest))
    }

    fn print(&self, value: &String, out: &mut String) -> Option<()> {
        (value == self.text).then(|| out.push_str(self.text))
    }
}

pub fn token(text: &'static str) -> Token {
    Token { text }
}

/// A single character accepted by a predicate
#[derive(Debug, Clone, Copy)]
pub struct Satisfy<F> {
    predicate: F,
}

impl<F> Syntax for Satisfy<F>
where
    F: Fn(char) -> bool,
{
    type Value = char;

    fn parse<'a>(&self, input: &'a str) -> Option<(char, &'a str)> {
        let c = input.chars().next()?;
        (self.predicate)(c).then(|| (c, &input[c.len_utf8()..]))
    }

    fn print(&self, value: &char, out: &mut String) -> Option<()> {
        (self.predicate)(*value).then(|| out.push(*value))
    }
}

pub fn satisfy<F: Fn(char) -> bool>(predicate: F) -> Satisfy<F> {
    Satisfy { predicate }
}

pub fn digit() -> Satisfy<fn(char) -> bool> {
    satisfy(|c| c.is_ascii_digit())
}

pub fn upper() -> Satisfy<fn(char) -> bool> {
    satisfy(|c| c.is_ascii_uppercase())
}

/// Canonical decimal numeral, optionally signed.
///
/// Leading zeros and `-0` are rejected so that every accepted numeral is
/// exactly what printing its value produces.
#[derive(Debug, Clone, Copy)]
pub struct Numeral {
    signed: bool,
}

impl Syntax for Numeral {
    type Value = i64;

    fn parse<'a>(&self, input: &'a str) -> Option<(i64, &'a str)> {
        let negative = self.signed && input.starts_with('-');
        let unsigned = if negative { &input[1..] } else { input };
        let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let magnitude = &unsigned[..digits];
        if magnitude.len() > 1 && magnitude.starts_with('0') {
            return None;
        }
        if negative && magnitude == "0" {
            return None;
        }
        let end = digits + usize::from(negative);
        let value = input[..end].parse().ok()?;
        Some((value, &input[end..]))
    }

    fn print(&self, value: &i64, out: &mut String) -> Option<()> {
        if !self.signed && *value < 0 {
            return None;
        }
        write!(out, "{}", value).ok()
    }
}

/// Non-negative integer
pub fn natural() -> Numeral {
    Numeral { signed: false }
}

/// Integer with an optional leading `-`
pub fn integer() -> Numeral {
    Numeral { signed: true }
}

/// Two grammars back to back, keeping both values
#[derive(Debug, Clone, Copy)]
pub struct Pair<A, B> {
    first: A,
    second: B,
}

impl<A: Syntax, B: Syntax> Syntax for Pair<A, B> {
    type Value = (A::Value, B::Value);

    fn parse<'a>(&self, input: &'a str) -> Option<(Self::Value, &'a str)> {
        let (a, rest) = self.first.parse(input)?;
        let (b, rest) = self.second.parse(rest)?;
        Some(((a, b), rest))
    }

    fn print(&self, (a, b): &Self::Value, out: &mut String) -> Option<()> {
        self.first.print(a, out)?;
        self.second.print(b, out)
    }
}

pub fn pair<A: Syntax, B: Syntax>(first: A, second: B) -> Pair<A, B> {
    Pair { first, second }
}

/// Two grammars back to back, keeping only the right value
#[derive(Debug, Clone, Copy)]
pub struct Preceded<A, B> {
    prefix: A,
    inner: B,
}

impl<A: Syntax<Value = ()>, B: Syntax> Syntax for Preceded<A, B> {
    type Value = B::Value;

    fn parse<'a>(&self, input: &'a str) -> Option<(B::Value, &'a str)> {
        let ((), rest) = self.prefix.parse(input)?;
        self.inner.parse(rest)
    }

    fn print(&self, value: &B::Value, out: &mut String) -> Option<()> {
        self.prefix.print(&(), out)?;
        self.inner.print(value, out)
    }
}

pub fn preceded<A: Syntax<Value = ()>, B: Syntax>(prefix: A, inner: B) -> Preceded<A, B> {
    Preceded { prefix, inner }
}

/// Two grammars back to back, keeping only the left value
#[derive(Debug, Clone, Copy)]
pub struct Terminated<A, B> {
    inner: A,
    suffix: B,
}

impl<A: Syntax, B: Syntax<Value = ()>> Syntax for Terminated<A, B> {
    type Value = A::Value;

    fn parse<'a>(&self, input: &'a str) -> Option<(A::Value, &'a str)> {
        let (value, rest) = self.inner.parse(input)?;
        let ((), rest) = self.suffix.parse(rest)?;
        Some((value, rest))
    }

    fn print(&self, value: &A::Value, out: &mut String) -> Option<()> {
        self.inner.print(value, out)?;
        self.suffix.print(&(), out)
    }
}

pub fn terminated<A: Syntax, B: Syntax<Value = ()>>(inner: A, suffix: B) -> Terminated<A, B> {
    Terminated { inner, suffix }
}

/// Ordered alternation.
///
/// Parsing commits to the left grammar whenever it succeeds; printing
/// follows the variant of the value.
#[derive(Debug, Clone, Copy)]
pub struct Choose<A, B> {
    left: A,
    right: B,
}

impl<A: Syntax, B: Syntax> Syntax for Choose<A, B> {
    type Value = Either<A::Value, B::Value>;

    fn parse<'a>(&self, input: &'a str) -> Option<(Self::Value, &'a str)> {
        if let Some((value, rest)) = self.left.parse(input) {
            return Some((Either::Left(value), rest));
        }
        self.right
            .parse(input)
            .map(|(value, rest)| (Either::Right(value), rest))
    }

    fn print(&self, value: &Self::Value, out: &mut String) -> Option<()> {
        match value {
            Either::Left(value) => self.left.print(value, out),
            Either::Right(value) => self.right.print(value, out),
        }
    }
}

pub fn choose<A: Syntax, B: Syntax>(left: A, right: B) -> Choose<A, B> {
    Choose { left, right }
}

/// Exactly `count` repetitions
#[derive(Debug, Clone, Copy)]
pub struct Replicate<S> {
    count: usize,
    inner: S,
}

impl<S: Syntax> Syntax for Replicate<S> {
    type Value = Vec<S::Value>;

    fn parse<'a>(&self, input: &'a str) -> Option<(Self::Value, &'a str)> {
        let mut values = Vec::with_capacity(self.count);
        let mut rest = input;
        for _ in 0..self.count {
            let (value, remaining) = self.inner.parse(rest)?;
            values.push(value);
            rest = remaining;
        }
        Some((values, rest))
    }

    fn print(&self, values: &Self::Value, out: &mut String) -> Option<()> {
        if values.len() != self.count {
            return None;
        }
        values
            .iter()
            .try_for_each(|value| self.inner.print(value, out))
    }
}

pub fn replicate<S: Syntax>(count: usize, inner: S) -> Replicate<S> {
    Replicate { count, inner }
}

/// A grammar viewed through a partial isomorphism
#[derive(Debug, Clone, Copy)]
pub struct Adapt<I, S> {
    iso: I,
    inner: S,
}

impl<I, S> Syntax for Adapt<I, S>
where
    S: Syntax,
    I: PartialIso<Source = S::Value>,
{
    type Value = I::Target;

    fn parse<'a>(&self, input: &'a str) -> Option<(I::Target, &'a str)> {
        let (value, rest) = self.inner.parse(input)?;
        self.iso.apply(value).map(|adapted| (adapted, rest))
    }

    fn print(&self, value: &I::Target, out: &mut String) -> Option<()> {
        let inner = self.iso.unapply(value)?;
        self.inner.print(&inner, out)
    }
}

pub fn adapt<I, S>(iso: I, inner: S) -> Adapt<I, S>
where
    S: Syntax,
    I: PartialIso<Source = S::Value>,
{
    Adapt { iso, inner }
}

/// Value-dependent continuation.
///
/// Parses `inner`, hands its value to `continuation` to pick the grammar
/// for the rest of the input. Printing runs the other way: `selector`
/// recovers the inner value from the full value, which must pick the same
/// continuation that parsing would have.
#[derive(Debug, Clone, Copy)]
pub struct Bind<S, F, G> {
    inner: S,
    continuation: F,
    selector: G,
}

impl<S, F, G, T> Syntax for Bind<S, F, G>
where
    S: Syntax,
    F: Fn(S::Value) -> T,
    T: Syntax,
    G: Fn(&T::Value) -> S::Value,
{
    type Value = T::Value;

    fn parse<'a>(&self, input: &'a str) -> Option<(T::Value, &'a str)> {
        let (selected, rest) = self.inner.parse(input)?;
        (self.continuation)(selected).parse(rest)
    }

    fn print(&self, value: &T::Value, out: &mut String) -> Option<()> {
        let selected = (self.selector)(value);
        self.inner.print(&selected, out)?;
        (self.continuation)(selected).print(value, out)
    }
}

pub fn bind<S, F, G, T>(inner: S, continuation: F, selector: G) -> Bind<S, F, G>
where
    S: Syntax,
    F: Fn(S::Value) -> T,
    T: Syntax,
    G: Fn(&T::Value) -> S::Value,
{
    Bind {
        inner,
        continuation,
        selector,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::iso::{Iso, bounded, chars_to_string};
    use crate::grammar::{parse_complete, print};

    #[test]
    fn test_literal_and_token() {
        assert_eq!(literal("|").parse("|rest"), Some(((), "rest")));
        assert_eq!(literal("|").parse("rest"), None);
        assert_eq!(print(&literal("T"), &()), Some("T".to_string()));

        assert_eq!(parse_complete(&token("AU"), "AU"), Some("AU".to_string()));
        assert_eq!(print(&token("AU"), &"AU".to_string()), Some("AU".to_string()));
        assert_eq!(print(&token("AU"), &"FR".to_string()), None);
    }

    #[test]
    fn test_satisfy() {
        assert_eq!(digit().parse("7x"), Some(('7', "x")));
        assert_eq!(digit().parse("x7"), None);
        assert_eq!(digit().parse(""), None);
        assert_eq!(print(&upper(), &'Q'), Some("Q".to_string()));
        assert_eq!(print(&upper(), &'q'), None);
    }

    #[test]
    fn test_numerals_are_canonical() {
        assert_eq!(natural().parse("123|"), Some((123, "|")));
        assert_eq!(natural().parse("0,"), Some((0, ",")));
        assert_eq!(natural().parse("007"), None);
        assert_eq!(natural().parse("-1"), None);
        assert_eq!(natural().parse(""), None);

        assert_eq!(integer().parse("-40|"), Some((-40, "|")));
        assert_eq!(integer().parse("-0"), None);
        assert_eq!(integer().parse("-"), None);
        assert_eq!(integer().parse("-05"), None);
        assert_eq!(integer().parse("99999999999999999999"), None);

        assert_eq!(print(&natural(), &-1), None);
        assert_eq!(print(&integer(), &-1), Some("-1".to_string()));
    }

    #[test]
    fn test_sequences_print_discarded_parts() {
        let key_value = pair(terminated(natural(), literal("=")), natural());
        assert_eq!(parse_complete(&key_value, "3=4"), Some((3, 4)));
        assert_eq!(print(&key_value, &(3, 4)), Some("3=4".to_string()));

        let tagged = preceded(literal("#"), natural());
        assert_eq!(parse_complete(&tagged, "#12"), Some(12));
        assert_eq!(print(&tagged, &12), Some("#12".to_string()));
        assert_eq!(parse_complete(&tagged, "12"), None);
    }

    #[test]
    fn test_choose_commits_to_first_match() {
        let grammar = choose(token("AB"), adapt(chars_to_string(), replicate(2, upper())));
        assert_eq!(
            parse_complete(&grammar, "AB"),
            Some(Either::Left("AB".to_string()))
        );
        assert_eq!(
            parse_complete(&grammar, "CD"),
            Some(Either::Right("CD".to_string()))
        );
        assert_eq!(
            print(&grammar, &Either::Right("AB".to_string())),
            Some("AB".to_string())
        );
        assert_eq!(parse_complete(&grammar, "ABC"), None);
    }

    #[test]
    fn test_replicate_exact_count() {
        let grammar = replicate(3, digit());
        assert_eq!(parse_complete(&grammar, "123"), Some(vec!['1', '2', '3']));
        assert_eq!(parse_complete(&grammar, "12"), None);
        assert_eq!(print(&grammar, &vec!['1', '2']), None);
        assert_eq!(print(&grammar, &vec!['4', '5', '6']), Some("456".to_string()));
    }

    #[test]
    fn test_adapt_rejects_in_both_directions() {
        let small = adapt(bounded(1, 9), natural());
        assert_eq!(parse_complete(&small, "5"), Some(5));
        assert_eq!(parse_complete(&small, "10"), None);
        assert_eq!(print(&small, &10), None);
    }

    #[test]
    fn test_bind_selects_continuation_from_value() {
        // "<limit>:<n>" where n must not exceed the limit
        let grammar = bind(
            terminated(natural(), literal(":")),
            |limit: i64| {
                adapt(
                    Iso::new(move |n: i64| (limit, n), |(_, n): &(i64, i64)| *n),
                    adapt(bounded(0, limit), natural()),
                )
            },
            |(limit, _): &(i64, i64)| *limit,
        );

        assert_eq!(parse_complete(&grammar, "5:3"), Some((5, 3)));
        assert_eq!(parse_complete(&grammar, "5:6"), None);
        assert_eq!(print(&grammar, &(5, 3)), Some("5:3".to_string()));
        assert_eq!(print(&grammar, &(2, 3)), None);
    }
}
