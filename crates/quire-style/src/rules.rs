//! Stylesheet rules
//!
//! Everything the parser emits: style definitions, `@media` groups holding nested
//! rules, `@page` groups and `@font-face` declarations. Each rule prints back to
//! stylesheet text that parses into an equivalent rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::declarations::{DeclarationSet, VariableSet};
use crate::matcher::{StyleMatcher, has_class};
use crate::values::{FontSource, StyleValue};

/// Output medium a document is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Print,
    Screen,
}

impl OutputFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Screen => "screen",
        }
    }
}

/// A parsed rule
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Style(StyleDefinition),
    Media(MediaGroup),
    Page(PageGroup),
    FontFace(FontFace),
}

impl Rule {
    pub fn as_style(&self) -> Option<&StyleDefinition> {
        match self {
            Self::Style(style) => Some(style),
            _ => None,
        }
    }

    pub fn as_media(&self) -> Option<&MediaGroup> {
        match self {
            Self::Media(media) => Some(media),
            _ => None,
        }
    }

    pub fn as_page(&self) -> Option<&PageGroup> {
        match self {
            Self::Page(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_font_face(&self) -> Option<&FontFace> {
        match self {
            Self::FontFace(face) => Some(face),
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style(style) => style.fmt(f),
            Self::Media(media) => media.fmt(f),
            Self::Page(page) => page.fmt(f),
            Self::FontFace(face) => face.fmt(f),
        }
    }
}

/// Writes ` { decl; decl; }` shared by every block rule
fn write_block(f: &mut fmt::Formatter<'_>, variables: Option<&VariableSet>, declarations: &DeclarationSet) -> fmt::Result {
    f.write_str(" {")?;
    if let Some(variables) = variables {
        for variable in variables {
            write!(f, " {variable};")?;
        }
    }
    if !declarations.is_empty() {
        write!(f, " {declarations}")?;
    }
    f.write_str(" }")
}

/// Selector text, its compiled matcher and the declarations it applies
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefinition {
    pub selector_text: String,
    pub matcher: StyleMatcher,
    pub declarations: DeclarationSet,
    pub variables: VariableSet,
}

impl StyleDefinition {
    /// Compile `selector_text`; text that fails to compile becomes a never-matching rule
    pub fn new(selector_text: impl Into<String>) -> Self {
        let selector_text = selector_text.into();
        let (matcher, _) = StyleMatcher::parse_or_never(&selector_text);
        Self {
            selector_text,
            matcher,
            declarations: DeclarationSet::new(),
            variables: VariableSet::new(),
        }
    }
}

impl fmt::Display for StyleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector_text)?;
        write_block(f, Some(&self.variables), &self.declarations)
    }
}

/// Parsed `@media` predicate: `[not|only] [type] [and] [(features)]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaQuery {
    pub negate: bool,
    pub only: bool,
    /// Lower-case media type; `None` when the query is features only
    pub media_type: Option<String>,
    /// Feature text such as `(orientation: portrait)`, kept verbatim
    pub features: Option<String>,
}

impl MediaQuery {
    pub fn parse(text: &str) -> Self {
        let mut query = Self::default();
        let mut rest = text.trim();

        if let Some(after) = strip_word(rest, "not") {
            query.negate = true;
            rest = after;
        } else if let Some(after) = strip_word(rest, "only") {
            query.only = true;
            rest = after;
        }

        if !rest.is_empty() && !rest.starts_with('(') {
            let end = rest.find(|c: char| c.is_whitespace() || c == '(').unwrap_or(rest.len());
            query.media_type = Some(rest[..end].to_ascii_lowercase());
            rest = rest[end..].trim_start();
            if let Some(after) = strip_word(rest, "and") {
                rest = after;
            }
        }

        if !rest.is_empty() {
            query.features = Some(rest.to_string());
        }
        query
    }

    /// Whether the group applies when generating for `output`.
    ///
    /// Features are recorded but not evaluated.
    pub fn matches(&self, output: OutputFormat) -> bool {
        let type_matches = match self.media_type.as_deref() {
            None | Some("all") => true,
            Some(media_type) => media_type == output.media_type(),
        };
        type_matches != self.negate
    }
}

/// Strip a leading keyword followed by whitespace, `(` or the end of the text
fn strip_word<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let head = text.get(..word.len())?;
    if !head.eq_ignore_ascii_case(word) {
        return None;
    }
    let after = &text[word.len()..];
    match after.chars().next() {
        None => Some(after),
        Some(c) if c.is_whitespace() || c == '(' => Some(after.trim_start()),
        Some(_) => None,
    }
}

/// `@media <predicate> { rules }`
#[derive(Debug, Clone, PartialEq)]
pub struct MediaGroup {
    pub predicate_text: String,
    pub query: MediaQuery,
    pub rules: Vec<Rule>,
}

impl MediaGroup {
    pub fn new(predicate_text: impl Into<String>) -> Self {
        let predicate_text = predicate_text.into();
        Self {
            query: MediaQuery::parse(&predicate_text),
            predicate_text,
            rules: Vec::new(),
        }
    }

    pub fn matches(&self, output: OutputFormat) -> bool {
        self.query.matches(output)
    }
}

impl fmt::Display for MediaGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@media {} {{", self.predicate_text)?;
        for rule in &self.rules {
            write!(f, " {rule}")?;
        }
        f.write_str(" }")
    }
}

/// Which pages an `@page` group applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelector {
    /// `@page { }`: every page
    All,
    /// `@page name, other { }`: pages carrying one of these style classes
    Named(Vec<String>),
}

impl PageSelector {
    pub fn parse(text: &str) -> Self {
        let names: Vec<String> = text
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() { Self::All } else { Self::Named(names) }
    }

    pub fn matches(&self, page_class: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Named(names) => page_class.is_some_and(|class| names.iter().any(|name| has_class(class, name))),
        }
    }
}

/// `@page [names] { declarations }`
#[derive(Debug, Clone, PartialEq)]
pub struct PageGroup {
    pub predicate_text: String,
    pub selector: PageSelector,
    pub declarations: DeclarationSet,
}

impl PageGroup {
    pub fn new(predicate_text: impl Into<String>) -> Self {
        let predicate_text = predicate_text.into();
        Self {
            selector: PageSelector::parse(&predicate_text),
            predicate_text,
            declarations: DeclarationSet::new(),
        }
    }

    pub fn matches(&self, page_class: Option<&str>) -> bool {
        self.selector.matches(page_class)
    }
}

impl fmt::Display for PageGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("@page")?;
        if !self.predicate_text.is_empty() {
            write!(f, " {}", self.predicate_text)?;
        }
        write_block(f, None, &self.declarations)
    }
}

/// `@font-face { declarations }`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontFace {
    pub declarations: DeclarationSet,
}

impl FontFace {
    pub fn family(&self) -> Option<&str> {
        self.declarations.get("font-family").and_then(StyleValue::as_text)
    }

    pub fn sources(&self) -> &[FontSource] {
        match self.declarations.get("src") {
            Some(StyleValue::FontSources(sources)) => sources,
            _ => &[],
        }
    }

    pub fn weight(&self) -> Option<i32> {
        match self.declarations.get("font-weight") {
            Some(StyleValue::Integer(weight)) => Some(*weight),
            _ => None,
        }
    }

    pub fn style(&self) -> Option<&str> {
        self.declarations.get("font-style").and_then(StyleValue::as_keyword)
    }
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("@font-face")?;
        write_block(f, None, &self.declarations)
    }
}
