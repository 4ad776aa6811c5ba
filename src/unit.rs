//! Input units fed to the tokenizers.
//!
//! The scanning loop works one unit at a time: a unit is either a concrete
//! code point, a logical line ending, or the end-of-input sentinel. Carriage
//! return, line feed, and CRLF are classified up front as a single logical
//! line-ending unit so that no state machine ever has to peek past a `\r`.

use std::iter::Peekable;
use std::str::Chars;

/// A logical line ending, classified from the raw character stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineEnding {
    CarriageReturn,
    LineFeed,
    CarriageReturnLineFeed,
}

impl LineEnding {
    /// The source text this line ending was classified from.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::CarriageReturn => "\r",
            LineEnding::LineFeed => "\n",
            LineEnding::CarriageReturnLineFeed => "\r\n",
        }
    }
}

/// One unit of tokenizer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    /// A concrete code point that is not part of a line ending.
    Char(char),
    /// A logical line ending (CR, LF, or CRLF).
    LineEnding(LineEnding),
    /// End of input. Emitted exactly once, after the last character.
    Eof,
}

impl Unit {
    pub fn is_eof(self) -> bool {
        matches!(self, Unit::Eof)
    }

    pub fn is_line_ending(self) -> bool {
        matches!(self, Unit::LineEnding(_))
    }

    pub fn is_char(self, ch: char) -> bool {
        matches!(self, Unit::Char(c) if c == ch)
    }

    /// Byte length of the source text this unit covers.
    pub fn len_bytes(self) -> usize {
        match self {
            Unit::Char(c) => c.len_utf8(),
            Unit::LineEnding(eol) => eol.as_str().len(),
            Unit::Eof => 0,
        }
    }

    /// Append the source text of this unit to `out`. The end-of-input
    /// sentinel covers no text.
    pub fn write_to(self, out: &mut String) {
        match self {
            Unit::Char(c) => out.push(c),
            Unit::LineEnding(eol) => out.push_str(eol.as_str()),
            Unit::Eof => {}
        }
    }
}

/// Classify `input` into a unit sequence, ending with [`Unit::Eof`].
pub fn units(input: &str) -> Units<'_> {
    Units {
        chars: input.chars().peekable(),
        done: false,
    }
}

/// Iterator produced by [`units`].
pub struct Units<'a> {
    chars: Peekable<Chars<'a>>,
    done: bool,
}

impl Iterator for Units<'_> {
    type Item = Unit;

    fn next(&mut self) -> Option<Unit> {
        if self.done {
            return None;
        }
        match self.chars.next() {
            None => {
                self.done = true;
                Some(Unit::Eof)
            }
            Some('\r') => {
                if self.chars.peek() == Some(&'\n') {
                    self.chars.next();
                    Some(Unit::LineEnding(LineEnding::CarriageReturnLineFeed))
                } else {
                    Some(Unit::LineEnding(LineEnding::CarriageReturn))
                }
            }
            Some('\n') => Some(Unit::LineEnding(LineEnding::LineFeed)),
            Some(c) => Some(Unit::Char(c)),
        }
    }
}
