//! Quire Stylesheet Parser & Style Cascade
//!
//! Parses the CSS-like stylesheet language used by Quire templates into rules and
//! resolves, per component of a render tree, which declarations apply.
//!
//! ```
//! use quire_style::Stylesheet;
//!
//! let sheet = Stylesheet::parse(".title { font-size: 18pt; color: navy }");
//! assert_eq!(sheet.rules.len(), 1);
//! assert!(sheet.errors.is_empty());
//! ```

mod colors;
mod entities;
mod enumerator;
mod scanner;

pub mod cascade;
pub mod declarations;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod properties;
pub mod rules;
pub mod selector;
pub mod tokenizer;
pub mod values;

pub use cascade::{MatchedRule, ResolveOptions, ResolvedStyle, StyleResolver};
pub use declarations::{Declaration, DeclarationSet, Variable, VariableSet};
pub use error::{ParseError, ParseErrorKind, Result, SelectorError, StyleError, TokenError, ValueError};
pub use matcher::{ComponentContext, StyleMatcher, StyleTree};
pub use parser::{Conformance, ParserOptions, Stylesheet, StylesheetParser};
pub use properties::{PropertyParser, PropertyRegistry, ValueKind, register_property, registry};
pub use rules::{FontFace, MediaGroup, MediaQuery, OutputFormat, PageGroup, PageSelector, Rule, StyleDefinition};
pub use selector::{Combinator, ComponentState, Compound, Selector};
pub use values::{Color, FontSource, FontSourceKind, RelativeUnit, StyleValue, Unit};

/// Parse a stylesheet into its rules and the errors logged along the way
pub fn parse(text: &str) -> (Vec<Rule>, Vec<ParseError>) {
    let stylesheet = Stylesheet::parse(text);
    (stylesheet.rules, stylesheet.errors)
}

/// Parse a stylesheet with explicit options
pub fn parse_stylesheet(text: &str, options: &ParserOptions) -> Stylesheet {
    Stylesheet::parse_with(text, options)
}
