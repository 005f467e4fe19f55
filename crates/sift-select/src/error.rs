//! Selector parse errors.

use thiserror::Error;

/// Why a selector string was rejected.
///
/// A selector that parses but matches nothing is not an error; it produces an
/// empty [`NodeSet`](crate::NodeSet).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The selector was empty or only whitespace.
    #[error("empty selector")]
    EmptySelector,

    /// A comma-separated group had no steps, as in `div,,p` or `div,`.
    #[error("empty selector group #{index} in `{selector}`")]
    EmptyGroup {
        /// The full selector text.
        selector: String,
        /// Zero-based index of the empty group.
        index: usize,
    },

    /// A `'` or `"` was opened and never closed.
    #[error("unterminated quote in `{selector}`")]
    UnterminatedQuote {
        /// The full selector text.
        selector: String,
    },

    /// A `>` or `+` with no step after it, as in `div >` or `div > + p`.
    #[error("combinator `{combinator}` is not followed by a step in `{group}`")]
    DanglingCombinator {
        /// The group containing the combinator.
        group: String,
        /// The combinator character.
        combinator: char,
    },

    /// Text inside a step that no grammar rule recognizes.
    #[error("unrecognized selector text `{remainder}` in step `{step}`")]
    UnrecognizedToken {
        /// The whole raw step.
        step: String,
        /// The unparsed tail of the step.
        remainder: String,
    },
}
