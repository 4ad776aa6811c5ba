use rowan::Language;

/// Span-type tags for the token streams produced by the tokenizers.
///
/// The first two kinds are generic: every tokenizer may emit them. The rest
/// come in label/marker/string triples, one triple per label context, so a
/// single state machine can serve link text, reference labels, and component
/// slots without knowing which one it is scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum SyntaxKind {
    // Generic tokens
    LineEnding = 0,
    TextChunk,

    // Link and image labels: [text](url), ![alt](url)
    Label,
    LabelMarker, // [ and ]
    LabelText,   // text between the markers

    // Reference labels: [label] in reference links and definitions
    ReferenceLabel,
    ReferenceLabelMarker,
    ReferenceLabelString,

    // Component slots: :name[content]{attrs}
    ComponentLabel,
    ComponentLabelMarker,
    ComponentLabelString,
}

impl SyntaxKind {
    /// Whether this kind is emitted as a leaf token in the syntax tree.
    ///
    /// Token kinds delimit spans whose only children are consumed units;
    /// everything else becomes a node.
    pub fn is_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::LineEnding
                | SyntaxKind::TextChunk
                | SyntaxKind::LabelMarker
                | SyntaxKind::ReferenceLabelMarker
                | SyntaxKind::ComponentLabelMarker
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LabelLanguage {}

impl Language for LabelLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<LabelLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<LabelLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<LabelLanguage>;
