//! Stylesheet Parser
//!
//! Entry point over a whole stylesheet. Comments are blanked out first (keeping byte
//! offsets intact), then a top-level [`BlockEnumerator`] yields rules lazily. Errors
//! never abort parsing; they accumulate and are available once iteration is done.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::enumerator::{BlockEnumerator, ParseSession};
use crate::error::{ParseError, Result, StyleError};
use crate::properties::{PropertyRegistry, registry};
use crate::rules::{FontFace, PageGroup, Rule, StyleDefinition};

/// How a consumer treats a stylesheet that logged errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conformance {
    /// Any logged error fails [`Stylesheet::check`]
    Strict,
    /// Errors are diagnostics only
    #[default]
    Lax,
}

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    pub conformance: Conformance,
    /// Deepest `@media` nesting that is still read
    pub max_nesting_depth: usize,
    /// Rules produced per parse, nested ones included, before the rest is dropped
    pub max_rules: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            conformance: Conformance::Lax,
            max_nesting_depth: 16,
            max_rules: 100_000,
        }
    }
}

/// Replace every `/* ... */` comment with spaces, keeping newlines and byte offsets.
///
/// Comment markers inside quoted strings are left alone. An unterminated comment
/// runs to the end of the text.
pub fn strip_comments(text: &str) -> String {
    if !text.contains("/*") {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(open) => {
                if c == open || c == '\n' {
                    quote = None;
                }
                out.push(c);
            }
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                out.push(c);
            }
            None if c == '/' && chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str("  ");
                let mut last = '\0';
                for inner in chars.by_ref() {
                    blank(&mut out, inner);
                    if last == '*' && inner == '/' {
                        break;
                    }
                    last = inner;
                }
            }
            None => out.push(c),
        }
    }
    out
}

/// Push whitespace occupying the same bytes as `c`
fn blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat_n(' ', c.len_utf8()));
    }
}

/// Lazy rule iterator over one stylesheet
pub struct StylesheetParser {
    text: String,
    enumerator: BlockEnumerator,
    session: ParseSession,
}

impl StylesheetParser {
    /// Parser with default options and the process-wide property registry
    pub fn new(text: &str) -> Self {
        Self::with_options(text, ParserOptions::default())
    }

    pub fn with_options(text: &str, options: ParserOptions) -> Self {
        Self::with_registry(text, options, registry())
    }

    /// Parser using a specific registry snapshot
    pub fn with_registry(text: &str, options: ParserOptions, registry: Arc<PropertyRegistry>) -> Self {
        let text = strip_comments(text);
        Self {
            enumerator: BlockEnumerator::new(0, text.len(), 0),
            session: ParseSession::new(registry, options),
            text,
        }
    }

    /// Errors logged so far
    pub fn errors(&self) -> &[ParseError] {
        self.session.errors()
    }

    /// Drain the remaining rules into a [`Stylesheet`]
    pub fn into_stylesheet(mut self) -> Stylesheet {
        let rules: Vec<Rule> = self.by_ref().collect();
        let errors = self.session.into_errors();
        tracing::info!(rules = rules.len(), errors = errors.len(), "parsed stylesheet");
        Stylesheet { rules, errors }
    }
}

impl Iterator for StylesheetParser {
    type Item = Rule;

    fn next(&mut self) -> Option<Rule> {
        self.enumerator.next_rule(&self.text, &mut self.session)
    }
}

/// A parsed stylesheet and its error log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
    pub errors: Vec<ParseError>,
}

impl Stylesheet {
    pub fn parse(text: &str) -> Self {
        StylesheetParser::new(text).into_stylesheet()
    }

    pub fn parse_with(text: &str, options: &ParserOptions) -> Self {
        StylesheetParser::with_options(text, options.clone()).into_stylesheet()
    }

    /// Parse and apply the configured conformance
    pub fn parse_checked(text: &str, options: &ParserOptions) -> Result<Self> {
        let stylesheet = Self::parse_with(text, options);
        stylesheet.check(options.conformance)?;
        Ok(stylesheet)
    }

    /// Fail under strict conformance if any error was logged
    pub fn check(&self, conformance: Conformance) -> Result<()> {
        match (conformance, self.errors.first()) {
            (Conformance::Strict, Some(first)) => Err(StyleError::Conformance {
                count: self.errors.len(),
                first: first.clone(),
            }),
            _ => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Top-level style definitions, in source order
    pub fn styles(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.rules.iter().filter_map(Rule::as_style)
    }

    pub fn pages(&self) -> impl Iterator<Item = &PageGroup> {
        self.rules.iter().filter_map(Rule::as_page)
    }

    pub fn font_faces(&self) -> impl Iterator<Item = &FontFace> {
        self.rules.iter().filter_map(Rule::as_font_face)
    }

    /// Stylesheet text that parses back into the same rules
    pub fn to_css(&self) -> String {
        self.rules.iter().map(Rule::to_string).collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments_keeps_offsets() {
        let text = "a /* x */ b";
        let stripped = strip_comments(text);
        assert_eq!(stripped.len(), text.len());
        assert_eq!(stripped, "a         b");
    }

    #[test]
    fn test_strip_comments_multiline_and_multibyte() {
        let text = "a/* é\nz */b";
        let stripped = strip_comments(text);
        assert_eq!(stripped.len(), text.len());
        assert_eq!(stripped.find('b'), text.find('b'));
        assert!(stripped.contains('\n'));
    }

    #[test]
    fn test_strip_comments_ignores_quoted_markers() {
        let text = "content: '/* not a comment */'";
        assert_eq!(strip_comments(text), text);
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        assert_eq!(strip_comments("a /* b"), "a     ");
    }

    #[test]
    fn test_iterator_is_lazy() {
        let mut parser = StylesheetParser::new(".a { color: red } .b { bad: 1pt !! }");
        assert!(parser.next().is_some());
        assert!(parser.errors().is_empty());
        assert!(parser.next().is_some());
        assert_eq!(parser.errors().len(), 1);
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_conformance_check() {
        let sheet = Stylesheet::parse(".a { color: red; width: 1pt 2pt }");
        assert!(sheet.has_errors());
        assert!(sheet.check(Conformance::Lax).is_ok());
        assert!(matches!(
            sheet.check(Conformance::Strict),
            Err(StyleError::Conformance { count: 1, .. })
        ));

        let options = ParserOptions {
            conformance: Conformance::Strict,
            ..ParserOptions::default()
        };
        assert!(Stylesheet::parse_checked(".a { color: red }", &options).is_ok());
    }

    #[test]
    fn test_options_defaults_from_partial_json() {
        let options: ParserOptions = serde_json::from_str(r#"{ "conformance": "strict" }"#).unwrap();
        assert_eq!(options.conformance, Conformance::Strict);
        assert_eq!(options.max_nesting_depth, 16);
        assert_eq!(options.max_rules, 100_000);
    }
}
