//! Tokenizer for bracketed label constructs: `[…]`-delimited inline spans.
//!
//! Labels back both classic link/image text and the component-slot syntax,
//! where a label may itself contain nested, balanced bracket groups. The
//! tokenizer is a recursive-descent state machine fed one [`Unit`] at a time;
//! it emits a strictly nested span stream to a [`TokenSink`] and finishes with
//! an [`Outcome`] the caller turns into "label" or "literal bracket".
//!
//! Grammar policy, all load-bearing:
//! - the empty label `[]` is valid;
//! - bracket groups nest to a total depth of three, counting the label's own
//!   brackets: `[a[b[c]]]` parses, `[a[b[c[d]]]]` does not;
//! - `\[`, `\]`, and `\\` are escape sequences; a backslash before anything
//!   else is literal;
//! - at most 999 escape sequences per label (the counter tracks escapes only,
//!   not total length; keep it that way);
//! - line endings inside the label are allowed or refused per invocation.

use crate::sink::{GreenSink, TokenSink};
use crate::state::{Outcome, Step, Tokenize};
use crate::syntax::{SyntaxKind, SyntaxNode};
use crate::unit::{Unit, units};

/// Total bracket depth a label may reach, counting its own brackets.
const MAX_NESTING: usize = 3;

/// Ceiling on escape sequences consumed in one label.
const MAX_ESCAPES: usize = 999;

/// The three span-type tags a caller selects for one label context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelKinds {
    /// Span covering the whole construct, brackets included.
    pub label: SyntaxKind,
    /// Span for each bracket, emitted once per marker.
    pub marker: SyntaxKind,
    /// Span covering everything between the markers.
    pub string: SyntaxKind,
}

impl LabelKinds {
    /// Link and image text: `[text](url)`.
    pub const LINK: LabelKinds = LabelKinds {
        label: SyntaxKind::Label,
        marker: SyntaxKind::LabelMarker,
        string: SyntaxKind::LabelText,
    };

    /// Reference labels: `[label]` in reference links and definitions.
    pub const REFERENCE: LabelKinds = LabelKinds {
        label: SyntaxKind::ReferenceLabel,
        marker: SyntaxKind::ReferenceLabelMarker,
        string: SyntaxKind::ReferenceLabelString,
    };

    /// Component slots: the `[content]` part of `:name[content]{attrs}`.
    pub const COMPONENT: LabelKinds = LabelKinds {
        label: SyntaxKind::ComponentLabel,
        marker: SyntaxKind::ComponentLabelMarker,
        string: SyntaxKind::ComponentLabelString,
    };
}

/// Per-invocation configuration, fixed for the lifetime of one parse attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelOptions {
    pub kinds: LabelKinds,
    /// Refuse line endings inside the label (single-line contexts such as
    /// inline component slots).
    pub disallow_eol: bool,
}

impl LabelOptions {
    pub fn new(kinds: LabelKinds) -> Self {
        Self {
            kinds,
            disallow_eol: false,
        }
    }

    pub fn single_line(kinds: LabelKinds) -> Self {
        Self {
            kinds,
            disallow_eol: true,
        }
    }
}

/// Where to resume when the next unit arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    AfterStart,
    AtBreak,
    Label,
    LabelEscape,
}

/// What one state transition decided.
enum Flow {
    Next(State),
    Done(Outcome),
}

/// One label parse attempt. No state is shared across invocations; create a
/// fresh tokenizer for every candidate `[`.
pub struct LabelTokenizer<S: TokenSink> {
    sink: S,
    options: LabelOptions,
    state: State,
    /// Currently open nested bracket groups inside the content.
    balance: usize,
    /// Escape sequences consumed so far, checked against [`MAX_ESCAPES`].
    size: usize,
}

impl<S: TokenSink> LabelTokenizer<S> {
    pub fn new(sink: S, options: LabelOptions) -> Self {
        Self {
            sink,
            options,
            state: State::Start,
            balance: 0,
            size: 0,
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// First unit. The caller has already peeked an opening bracket; anything
    /// else is a bug on its side, not a parse failure.
    fn start(&mut self, unit: Unit) -> Flow {
        assert!(
            unit.is_char('['),
            "label tokenizer started on {unit:?}, caller must peek a `[` first"
        );
        self.sink.enter(self.options.kinds.label);
        self.sink.enter(self.options.kinds.marker);
        self.sink.consume(unit);
        self.sink.exit(self.options.kinds.marker);
        Flow::Next(State::AfterStart)
    }

    /// Just past the opening bracket. A closing bracket here means the label
    /// is empty, which this grammar permits.
    fn after_start(&mut self, unit: Unit) -> Flow {
        if unit.is_char(']') {
            self.sink.enter(self.options.kinds.marker);
            self.sink.consume(unit);
            self.sink.exit(self.options.kinds.marker);
            self.sink.exit(self.options.kinds.label);
            return Flow::Done(Outcome::Ok);
        }
        self.sink.enter(self.options.kinds.string);
        self.at_break(unit)
    }

    /// Before starting or resuming a text chunk. This is the state that makes
    /// the pass/fail decisions; `label` hands back to it on every break.
    fn at_break(&mut self, unit: Unit) -> Flow {
        if unit.is_eof() || self.size > MAX_ESCAPES {
            return Flow::Done(Outcome::Nok);
        }
        if unit.is_char(']') {
            if self.balance == 0 {
                return self.at_closing_brace(unit);
            }
            // A nested group is closing, not the label: the bracket is
            // ordinary content.
            self.balance -= 1;
            self.sink.enter(SyntaxKind::TextChunk);
            self.sink.consume(unit);
            return Flow::Next(State::Label);
        }
        if unit.is_line_ending() {
            if self.options.disallow_eol {
                return Flow::Done(Outcome::Nok);
            }
            self.sink.enter(SyntaxKind::LineEnding);
            self.sink.consume(unit);
            self.sink.exit(SyntaxKind::LineEnding);
            return Flow::Next(State::AtBreak);
        }
        self.sink.enter(SyntaxKind::TextChunk);
        self.label(unit)
    }

    /// Inside a text chunk, one content unit per step.
    fn label(&mut self, unit: Unit) -> Flow {
        if unit.is_eof() || unit.is_line_ending() || self.size > MAX_ESCAPES {
            // Not a verdict: close the chunk and let `at_break` decide.
            self.sink.exit(SyntaxKind::TextChunk);
            return self.at_break(unit);
        }
        match unit {
            Unit::Char('[') => {
                self.balance += 1;
                if self.balance + 1 > MAX_NESTING {
                    return Flow::Done(Outcome::Nok);
                }
                self.sink.consume(unit);
                Flow::Next(State::Label)
            }
            Unit::Char(']') => {
                if self.balance == 0 {
                    self.sink.exit(SyntaxKind::TextChunk);
                    return self.at_closing_brace(unit);
                }
                self.balance -= 1;
                self.sink.consume(unit);
                Flow::Next(State::Label)
            }
            Unit::Char('\\') => {
                self.sink.consume(unit);
                Flow::Next(State::LabelEscape)
            }
            _ => {
                self.sink.consume(unit);
                Flow::Next(State::Label)
            }
        }
    }

    /// The closing bracket, with the content string still open. The single
    /// unconditional success exit.
    fn at_closing_brace(&mut self, unit: Unit) -> Flow {
        self.sink.exit(self.options.kinds.string);
        self.sink.enter(self.options.kinds.marker);
        self.sink.consume(unit);
        self.sink.exit(self.options.kinds.marker);
        self.sink.exit(self.options.kinds.label);
        Flow::Done(Outcome::Ok)
    }

    /// Just past a backslash that was consumed as content.
    fn label_escape(&mut self, unit: Unit) -> Flow {
        match unit {
            Unit::Char('[' | ']' | '\\') => {
                self.sink.consume(unit);
                self.size += 1;
                Flow::Next(State::Label)
            }
            // Not an escape introducer after all; the follower is re-evaluated
            // as ordinary content.
            _ => self.label(unit),
        }
    }
}

impl<S: TokenSink> Tokenize for LabelTokenizer<S> {
    fn feed(&mut self, unit: Unit) -> Step {
        log::trace!("label tokenizer: {:?} <- {:?}", self.state, unit);
        let flow = match self.state {
            State::Start => self.start(unit),
            State::AfterStart => self.after_start(unit),
            State::AtBreak => self.at_break(unit),
            State::Label => self.label(unit),
            State::LabelEscape => self.label_escape(unit),
        };
        match flow {
            Flow::Next(state) => {
                self.state = state;
                Step::Next
            }
            Flow::Done(outcome) => Step::Done(outcome),
        }
    }
}

/// Run the label tokenizer over a prefix of `input`, emitting to `sink`.
///
/// Input that does not start with `[` is declined with `None` before the
/// state machine ever runs; only direct [`LabelTokenizer`] users carry the
/// peek-a-bracket obligation.
///
/// On success returns the byte length of the label, i.e. the position just
/// past the closing bracket. On failure returns `None`; the sink keeps
/// whatever was emitted before the attempt failed, so callers that need a
/// clean stream should hand in a scratch sink and replay on success.
pub fn tokenize_label<S: TokenSink>(
    input: &str,
    options: LabelOptions,
    sink: &mut S,
) -> Option<usize> {
    if input.as_bytes().first() != Some(&b'[') {
        return None;
    }
    let mut tokenizer = LabelTokenizer::new(sink, options);
    let mut consumed = 0;
    for unit in units(input) {
        match tokenizer.feed(unit) {
            Step::Next => consumed += unit.len_bytes(),
            Step::Done(Outcome::Ok) => {
                let len = consumed + unit.len_bytes();
                log::debug!("label parsed: {} bytes", len);
                return Some(len);
            }
            Step::Done(Outcome::Nok) => {
                log::debug!("label rejected at byte {}", consumed);
                return None;
            }
        }
    }
    None
}

/// A successfully recognized label prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLabel<'a> {
    /// Byte length of the whole construct, brackets included.
    pub len: usize,
    /// Raw text between the markers, escapes left as written.
    pub content: &'a str,
}

/// Try to recognize a label at the start of `text`.
pub fn try_parse_label(text: &str, options: LabelOptions) -> Option<ParsedLabel<'_>> {
    let mut scratch = crate::sink::EventLog::new();
    let len = tokenize_label(text, options, &mut scratch)?;
    Some(ParsedLabel {
        len,
        content: &text[1..len - 1],
    })
}

/// Try to recognize a label at the start of `text` and build its lossless
/// syntax tree. Returns the tree and the byte length of the label.
pub fn parse_label_tree(text: &str, options: LabelOptions) -> Option<(SyntaxNode, usize)> {
    let mut sink = GreenSink::new();
    let len = tokenize_label(text, options, &mut sink)?;
    Some((sink.finish_node(), len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Event, EventLog};

    fn attempt(input: &str, options: LabelOptions) -> (Option<usize>, EventLog) {
        crate::init_logger();
        let mut log = EventLog::new();
        let len = tokenize_label(input, options, &mut log);
        (len, log)
    }

    fn multi_line() -> LabelOptions {
        LabelOptions::new(LabelKinds::LINK)
    }

    fn single_line() -> LabelOptions {
        LabelOptions::single_line(LabelKinds::LINK)
    }

    #[test]
    fn simple_label() {
        let (len, log) = attempt("[abc]", multi_line());
        assert_eq!(len, Some(5));
        assert!(log.is_balanced());
        assert_eq!(log.text(), "[abc]");
        assert_eq!(
            log.events(),
            &[
                Event::Enter(SyntaxKind::Label),
                Event::Enter(SyntaxKind::LabelMarker),
                Event::Consume(Unit::Char('[')),
                Event::Exit(SyntaxKind::LabelMarker),
                Event::Enter(SyntaxKind::LabelText),
                Event::Enter(SyntaxKind::TextChunk),
                Event::Consume(Unit::Char('a')),
                Event::Consume(Unit::Char('b')),
                Event::Consume(Unit::Char('c')),
                Event::Exit(SyntaxKind::TextChunk),
                Event::Exit(SyntaxKind::LabelText),
                Event::Enter(SyntaxKind::LabelMarker),
                Event::Consume(Unit::Char(']')),
                Event::Exit(SyntaxKind::LabelMarker),
                Event::Exit(SyntaxKind::Label),
            ]
        );
    }

    #[test]
    fn empty_label() {
        let (len, log) = attempt("[]", multi_line());
        assert_eq!(len, Some(2));
        assert!(log.is_balanced());
        // No content string at all for `[]`.
        assert!(
            !log.events()
                .contains(&Event::Enter(SyntaxKind::LabelText))
        );
        assert_eq!(
            log.events(),
            &[
                Event::Enter(SyntaxKind::Label),
                Event::Enter(SyntaxKind::LabelMarker),
                Event::Consume(Unit::Char('[')),
                Event::Exit(SyntaxKind::LabelMarker),
                Event::Enter(SyntaxKind::LabelMarker),
                Event::Consume(Unit::Char(']')),
                Event::Exit(SyntaxKind::LabelMarker),
                Event::Exit(SyntaxKind::Label),
            ]
        );
    }

    #[test]
    fn label_length_ignores_trailing_text() {
        let (len, _) = attempt("[abc](url)", multi_line());
        assert_eq!(len, Some(5));
    }

    #[test]
    fn escaped_closing_bracket_is_content() {
        let (len, log) = attempt(r"[a\]b]", multi_line());
        assert_eq!(len, Some(6));
        assert!(log.is_balanced());
        assert_eq!(log.text(), r"[a\]b]");
        assert_eq!(try_parse_label(r"[a\]b]", multi_line()).unwrap().content, r"a\]b");
    }

    #[test]
    fn backslash_before_ordinary_unit_is_literal() {
        let (len, log) = attempt(r"[a\b]", multi_line());
        assert_eq!(len, Some(5));
        // The backslash and its follower are each consumed exactly once.
        assert_eq!(log.text(), r"[a\b]");
    }

    #[test]
    fn backslash_then_line_ending_hands_back_to_at_break() {
        let (len, log) = attempt("[a\\\nb]", multi_line());
        assert_eq!(len, Some(6));
        assert!(log.is_balanced());
        assert_eq!(log.text(), "[a\\\nb]");
    }

    #[test]
    fn nested_groups_parse_to_depth_three() {
        let (len, log) = attempt("[a[b[c]]]", multi_line());
        assert_eq!(len, Some(9));
        assert!(log.is_balanced());
        assert_eq!(try_parse_label("[a[b[c]]]", multi_line()).unwrap().content, "a[b[c]]");
    }

    #[test]
    fn fourth_nesting_level_fails() {
        let (len, _) = attempt("[a[b[c[d]]]]", multi_line());
        assert_eq!(len, None);
    }

    #[test]
    fn text_without_a_leading_bracket_is_declined() {
        // The prefix scanners decline non-bracket text instead of tripping
        // the state machine's caller contract.
        assert_eq!(try_parse_label("plain text", multi_line()), None);
        assert_eq!(try_parse_label("", multi_line()), None);
        assert_eq!(parse_label_tree("a[b]", multi_line()), None);

        let mut log = EventLog::new();
        assert_eq!(tokenize_label("x[y]", multi_line(), &mut log), None);
        assert!(log.events().is_empty());
    }

    #[test]
    fn unterminated_label_fails() {
        let (len, _) = attempt("[abc", multi_line());
        assert_eq!(len, None);
    }

    #[test]
    fn unbalanced_nested_group_still_needs_outer_bracket() {
        let (len, _) = attempt("[a[b", multi_line());
        assert_eq!(len, None);
    }

    #[test]
    fn line_ending_refused_when_disallowed() {
        let (len, _) = attempt("[a\nb]", single_line());
        assert_eq!(len, None);
    }

    #[test]
    fn line_ending_spans_emitted_when_allowed() {
        let (len, log) = attempt("[a\nb]", multi_line());
        assert_eq!(len, Some(5));
        assert!(log.is_balanced());
        assert!(log.events().contains(&Event::Enter(SyntaxKind::LineEnding)));
        assert_eq!(log.text(), "[a\nb]");
    }

    #[test]
    fn crlf_is_one_line_ending_unit() {
        let (len, log) = attempt("[a\r\nb]", multi_line());
        assert_eq!(len, Some(6));
        assert_eq!(log.text(), "[a\r\nb]");
    }

    #[test]
    fn nested_closer_after_line_ending_is_content() {
        // The `]` after the break closes the nested group, not the label.
        let (len, _) = attempt("[a[b\n]c]", multi_line());
        assert_eq!(len, Some(8));
        assert_eq!(
            try_parse_label("[a[b\n]c]", multi_line()).unwrap().content,
            "a[b\n]c"
        );
    }

    #[test]
    fn escape_ceiling_allows_999() {
        let input = format!("[{}]", r"\]".repeat(999));
        let (len, log) = attempt(&input, multi_line());
        assert_eq!(len, Some(input.len()));
        assert!(log.is_balanced());
    }

    #[test]
    fn escape_ceiling_rejects_1000() {
        let input = format!("[{}]", r"\]".repeat(1000));
        let (len, _) = attempt(&input, multi_line());
        assert_eq!(len, None);
    }

    #[test]
    fn long_label_without_escapes_is_fine() {
        // The ceiling tracks escapes, not total length.
        let input = format!("[{}]", "x".repeat(5000));
        let (len, _) = attempt(&input, multi_line());
        assert_eq!(len, Some(input.len()));
    }

    #[test]
    fn unconsumed_units_are_seen_exactly_once() {
        // `c` after `\` re-enters `label`; every unit must show up once in
        // the consumed text, never twice nor skipped.
        let (len, log) = attempt(r"[\ca]", multi_line());
        assert_eq!(len, Some(5));
        assert_eq!(log.text(), r"[\ca]");
    }

    #[test]
    fn component_kinds_flow_through() {
        let (len, log) = attempt("[slot]", LabelOptions::single_line(LabelKinds::COMPONENT));
        assert_eq!(len, Some(6));
        assert!(log.events().contains(&Event::Enter(SyntaxKind::ComponentLabel)));
        assert!(
            log.events()
                .contains(&Event::Enter(SyntaxKind::ComponentLabelString))
        );
    }

    #[test]
    fn fresh_invocations_share_no_state() {
        let mut log = EventLog::new();
        assert_eq!(tokenize_label("[a[b]]", multi_line(), &mut log), Some(6));
        let mut log = EventLog::new();
        // A previous invocation's balance must not leak into this one.
        assert_eq!(tokenize_label("[c]", multi_line(), &mut log), Some(3));
    }

    #[test]
    #[should_panic(expected = "caller must peek a `[`")]
    fn starting_on_a_non_bracket_is_a_caller_bug() {
        let mut log = EventLog::new();
        let mut tokenizer = LabelTokenizer::new(&mut log, multi_line());
        tokenizer.feed(Unit::Char('x'));
    }
}
