//! Streaming tokenizer for bracketed label constructs in a Markdown dialect
//! with component syntax.
//!
//! A label is a `[…]`-delimited inline span. The same construct backs link
//! and image text, reference labels, and component slots, which may contain
//! nested balanced bracket groups. This crate recognizes a label's boundaries
//! and internal structure one input unit at a time and reports the result as
//! a strictly nested span stream; it never interprets the content.
//!
//! ```rust
//! use mdlabel::{LabelKinds, LabelOptions, try_parse_label};
//!
//! let options = LabelOptions::new(LabelKinds::LINK);
//! let label = try_parse_label("[link text](url)", options).unwrap();
//! assert_eq!(label.len, 11);
//! assert_eq!(label.content, "link text");
//! ```
//!
//! For callers that want the full token stream or a lossless syntax tree,
//! see [`tokenize_label`] with a [`TokenSink`], and [`parse_label_tree`].

pub mod label;
pub mod sink;
pub mod state;
pub mod syntax;
pub mod unit;

pub use label::{
    LabelKinds, LabelOptions, LabelTokenizer, ParsedLabel, parse_label_tree, tokenize_label,
    try_parse_label,
};
pub use sink::{Event, EventLog, GreenSink, TokenSink};
pub use state::{Outcome, Step, Tokenize, drive};
pub use syntax::{SyntaxKind, SyntaxNode};
pub use unit::{LineEnding, Unit, units};

#[cfg(test)]
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
