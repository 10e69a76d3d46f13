//! Bidirectional grammar engine.
//!
//! One grammar value describes a textual layout once and yields both a
//! parser and a printer. For every grammar `g` built from these parts:
//!
//! - `print(g, v)` followed by `parse_complete(g, ..)` yields `v` again
//! - `parse_complete(g, s)` followed by `print(g, ..)` yields `s` again
//!
//! wherever both directions are defined.

pub mod combinators;
pub mod iso;
pub mod observation;

pub use combinators::Either;
pub use observation::ObservationCodec;

/// A grammar usable as both parser and printer
pub trait Syntax {
    type Value;

    /// Consume a prefix of `input`, returning the value and the remainder
    fn parse<'a>(&self, input: &'a str) -> Option<(Self::Value, &'a str)>;

    /// Append the text for `value`, or `None` if the grammar cannot express it
    fn print(&self, value: &Self::Value, out: &mut String) -> Option<()>;
}

impl<S: Syntax + ?Sized> Syntax for Box<S> {
    type Value = S::Value;

    fn parse<'a>(&self, input: &'a str) -> Option<(S::Value, &'a str)> {
        (**self).parse(input)
    }

    fn print(&self, value: &S::Value, out: &mut String) -> Option<()> {
        (**self).print(value, out)
    }
}

/// Type-erased grammar, shareable across tasks
pub type BoxedSyntax<T> = Box<dyn Syntax<Value = T> + Send + Sync>;

/// Parse the whole of `input`; trailing text is a failure
pub fn parse_complete<S: Syntax + ?Sized>(syntax: &S, input: &str) -> Option<S::Value> {
    match syntax.parse(input)? {
        (value, "") => Some(value),
        _ => None,
    }
}

/// Render `value` as text
pub fn print<S: Syntax + ?Sized>(syntax: &S, value: &S::Value) -> Option<String> {
    let mut out = String::new();
    syntax.print(value, &mut out)?;
    Some(out)
}
