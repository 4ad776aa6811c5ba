//! The single-pass scanning shape shared by the inline tokenizers.
//!
//! A tokenizer is fed one unit at a time and answers with either "give me the
//! next unit" or a terminal outcome. States never look more than one unit
//! ahead; re-evaluation of an unconsumed unit happens inside `feed` by
//! dispatching the same unit to the next state, never by rewinding a cursor.

use crate::unit::Unit;

/// Terminal result of one tokenizer invocation.
///
/// `Nok` is ordinary control flow, not an error: it means "this text does not
/// start the construct", and the caller reinterprets it as plain content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Nok,
}

impl Outcome {
    pub fn is_ok(self) -> bool {
        matches!(self, Outcome::Ok)
    }
}

/// Answer from feeding one unit to a tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The unit was consumed; feed the next one.
    Next,
    /// Scanning finished. On `Ok` the final unit was consumed and the caller
    /// resumes just past it; on `Nok` the final unit was left for the caller
    /// to reinterpret.
    Done(Outcome),
}

/// A tokenizer drivable by the generic scanning loop.
pub trait Tokenize {
    fn feed(&mut self, unit: Unit) -> Step;
}

/// Feed units to `tokenizer` until it reaches a terminal outcome.
///
/// The unit source must end with [`Unit::Eof`]; a source that runs dry before
/// the tokenizer finishes counts as a malformed construct.
pub fn drive<T, I>(tokenizer: &mut T, units: I) -> Outcome
where
    T: Tokenize,
    I: IntoIterator<Item = Unit>,
{
    for unit in units {
        if let Step::Done(outcome) = tokenizer.feed(unit) {
            return outcome;
        }
    }
    Outcome::Nok
}
