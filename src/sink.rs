//! Token emission: the sink interface tokenizers write to, plus the two
//! sinks shipped with the crate (an event log for tests and pipeline replay,
//! and a rowan-backed sink that builds a lossless syntax tree).

use crate::syntax::{SyntaxKind, SyntaxNode};
use crate::unit::Unit;
use rowan::{GreenNode, GreenNodeBuilder};

/// Receiver for the tokenizer's output events.
///
/// Calls arrive in strict span order: every `enter` is matched by exactly one
/// `exit` of the same kind before any ancestor span exits, and `consume` only
/// occurs between them. The stream is append-only; a consumed unit is never
/// rolled back.
pub trait TokenSink {
    fn enter(&mut self, kind: SyntaxKind);
    fn consume(&mut self, unit: Unit);
    fn exit(&mut self, kind: SyntaxKind);
}

impl<S: TokenSink + ?Sized> TokenSink for &mut S {
    fn enter(&mut self, kind: SyntaxKind) {
        (**self).enter(kind);
    }

    fn consume(&mut self, unit: Unit) {
        (**self).consume(unit);
    }

    fn exit(&mut self, kind: SyntaxKind) {
        (**self).exit(kind);
    }
}

/// One recorded emission event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    Enter(SyntaxKind),
    Consume(Unit),
    Exit(SyntaxKind),
}

/// A sink that records every event, in order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The source text covered by the consumed units.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            if let Event::Consume(unit) = event {
                unit.write_to(&mut out);
            }
        }
        out
    }

    /// Check that enters and exits form a strict, fully closed stack.
    pub fn is_balanced(&self) -> bool {
        let mut stack = Vec::new();
        for event in &self.events {
            match event {
                Event::Enter(kind) => stack.push(*kind),
                Event::Exit(kind) => {
                    if stack.pop() != Some(*kind) {
                        return false;
                    }
                }
                Event::Consume(_) => {}
            }
        }
        stack.is_empty()
    }
}

impl TokenSink for EventLog {
    fn enter(&mut self, kind: SyntaxKind) {
        self.events.push(Event::Enter(kind));
    }

    fn consume(&mut self, unit: Unit) {
        self.events.push(Event::Consume(unit));
    }

    fn exit(&mut self, kind: SyntaxKind) {
        self.events.push(Event::Exit(kind));
    }
}

/// A sink that builds a lossless green tree as the events arrive.
///
/// Spans whose kind [`is a token`](SyntaxKind::is_token) collect their
/// consumed units into a single leaf token; all other spans become nodes.
pub struct GreenSink {
    builder: GreenNodeBuilder<'static>,
    text: String,
}

impl GreenSink {
    pub fn new() -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            text: String::new(),
        }
    }

    /// Finish the tree. The root is the outermost span that was emitted.
    pub fn finish(self) -> GreenNode {
        debug_assert!(self.text.is_empty(), "unflushed token text at finish");
        self.builder.finish()
    }

    /// Finish and wrap the tree in a typed syntax node.
    pub fn finish_node(self) -> SyntaxNode {
        SyntaxNode::new_root(self.finish())
    }
}

impl Default for GreenSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSink for GreenSink {
    fn enter(&mut self, kind: SyntaxKind) {
        debug_assert!(self.text.is_empty(), "consumed text outside a token span");
        if !kind.is_token() {
            self.builder.start_node(kind.into());
        }
    }

    fn consume(&mut self, unit: Unit) {
        unit.write_to(&mut self.text);
    }

    fn exit(&mut self, kind: SyntaxKind) {
        if kind.is_token() {
            self.builder.token(kind.into(), &self.text);
            self.text.clear();
        } else {
            debug_assert!(self.text.is_empty(), "consumed text outside a token span");
            self.builder.finish_node();
        }
    }
}
