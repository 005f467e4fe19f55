//! CSS-subset selector engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Parser** - comma-separated groups of steps joined by descendant (` `),
//!   child (`>`) and adjacent-sibling (`+`) combinators
//! - **Compound matching** - tag (`div`, `*`), `#id`, `.class`, `[attr]`,
//!   `[attr="v"]`, `[attr~="v"]`, `[attr|="v"]`
//! - **Positional filters** - `:first-child` and `:lang(code)`
//! - **Assembly** - ordered, duplicate-free results and chained re-queries
//!
//! Matching runs against any tree implementing [`sift_dom::ElementTree`].
//!
//! # Example
//!
//! ```
//! use sift_dom::parse_markup;
//! use sift_select::Selection;
//!
//! let tree = parse_markup(r#"<div id="a"><p>1</p></div><div id="b"><p>2</p></div>"#).unwrap();
//! let paragraphs = Selection::select(&tree, "#a").unwrap().find("p").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```
//!
//! # Not Yet Implemented
//!
//! - Pseudo-classes other than `:first-child` and `:lang()`
//! - Subsequent-sibling (`~`) combinator
//! - Specificity

pub mod engine;
pub mod error;
pub mod matcher;
pub mod node_set;
pub mod parser;
pub mod search;
pub mod selection;

pub use engine::{MatchContext, evaluate, query};
pub use error::ParseError;
pub use node_set::NodeSet;
pub use parser::{
    AttributePolicy, AttributeTest, Combinator, PredicateSet, Selector, SelectorGroup,
    SelectorStep, parse,
};
pub use selection::Selection;
