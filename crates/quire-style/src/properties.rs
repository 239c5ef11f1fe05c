//! Property Parser Registry
//!
//! Maps property names to the parser that converts their raw text into typed
//! [`StyleValue`]s. Shorthands expand into their longhands; colours with alpha
//! write the alpha to a companion opacity property.
//!
//! The process-wide registry is a snapshot behind a lock. Registration copies the
//! table, so parsers that already hold a snapshot never observe a half-updated map.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::declarations::{Declaration, DeclarationSet};
use crate::error::{Result, StyleError, ValueError};
use crate::tokenizer::{VARIABLE_PREFIX, split_list, split_parts};
use crate::values::{
    StyleValue, is_color_like, is_expression, is_number_like, is_url, parse_color, parse_font_sources, parse_number,
    parse_unit, parse_url,
};

/// Signature of a parser supplied at registration time
pub type CustomParser = fn(name: &str, raw: &str, out: &mut DeclarationSet) -> std::result::Result<(), ValueError>;

/// `(top, right, bottom, left)` longhand names
pub type Sides = [&'static str; 4];

/// `(width, style, color)` longhand names of one border edge
pub type BorderEdge = [&'static str; 3];

/// How a property's raw text is converted
#[derive(Debug, Clone, Copy)]
pub enum ValueKind {
    /// A single length, or one of `keywords`
    Length { keywords: &'static [&'static str] },
    /// One to four lengths expanded onto four sides
    Sides { sides: Sides, keywords: &'static [&'static str] },
    /// A colour; alpha goes to the named companion property
    Color { alpha: Option<&'static str> },
    /// One to four colours expanded onto four sides
    SideColors { sides: Sides, alpha: Option<&'static str> },
    /// One to four keywords expanded onto four sides
    SideKeywords { sides: Sides, keywords: &'static [&'static str] },
    /// A number, `%` allowed, clamped to the range
    Number { min: f64, max: f64 },
    Integer,
    Keyword(&'static [&'static str]),
    /// One or more space separated keywords
    KeywordList(&'static [&'static str]),
    /// `url(...)` or `none`
    Url,
    /// Free text kept verbatim
    Text,
    FontFamily,
    FontWeight,
    FontSources,
    /// Border shorthand: width, style and colour in any order
    Border { edges: &'static [BorderEdge] },
    Background,
    Custom(CustomParser),
}

/// Named parser for one property
#[derive(Debug, Clone)]
pub struct PropertyParser {
    name: String,
    kind: ValueKind,
}

impl PropertyParser {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether parsing writes longhands rather than this property's own name
    pub fn is_shorthand(&self) -> bool {
        matches!(
            self.kind,
            ValueKind::Sides { .. }
                | ValueKind::SideColors { .. }
                | ValueKind::SideKeywords { .. }
                | ValueKind::Border { .. }
                | ValueKind::Background
        )
    }

    /// Convert `raw` and append the produced declarations to `out`
    pub fn parse(&self, raw: &str, out: &mut DeclarationSet) -> std::result::Result<(), ValueError> {
        let name = self.name.as_str();
        match self.kind {
            ValueKind::Length { keywords } => out.push(name, parse_length(name, raw, keywords)?),
            ValueKind::Sides { sides, keywords } => {
                let values = split_parts(raw)?
                    .into_iter()
                    .map(|part| parse_length(name, part, keywords))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                push_sides(out, sides, values)?;
            }
            ValueKind::Color { alpha } => {
                let parsed = parse_color(raw)?;
                out.push(name, StyleValue::Color(parsed.color));
                push_alpha(out, alpha, parsed.alpha);
            }
            ValueKind::SideColors { sides, alpha } => {
                let mut opacity = None;
                let mut values = Vec::new();
                for part in split_parts(raw)? {
                    let parsed = parse_color(part)?;
                    opacity = opacity.or(parsed.alpha);
                    values.push(StyleValue::Color(parsed.color));
                }
                push_sides(out, sides, values)?;
                push_alpha(out, alpha, opacity);
            }
            ValueKind::SideKeywords { sides, keywords } => {
                let values = split_parts(raw)?
                    .into_iter()
                    .map(|part| parse_keyword(name, part, keywords))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                push_sides(out, sides, values)?;
            }
            ValueKind::Number { min, max } => {
                let trimmed = raw.trim();
                let value = match trimmed.strip_suffix('%') {
                    Some(pct) => parse_number(pct)? / 100.0,
                    None => parse_number(trimmed)?,
                };
                out.push(name, StyleValue::Number(value.clamp(min, max)));
            }
            ValueKind::Integer => {
                let value = raw
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| ValueError::InvalidNumber(raw.to_string()))?;
                out.push(name, StyleValue::Integer(value));
            }
            ValueKind::Keyword(keywords) => out.push(name, parse_keyword(name, raw, keywords)?),
            ValueKind::KeywordList(keywords) => {
                let parts = split_parts(raw)?;
                let mut words = Vec::with_capacity(parts.len());
                for part in parts {
                    match parse_keyword(name, part, keywords)? {
                        StyleValue::Keyword(word) => words.push(word),
                        other => return Err(ValueError::UnexpectedPart(other.to_string())),
                    }
                }
                out.push(name, StyleValue::Keyword(words.join(" ")));
            }
            ValueKind::Url => {
                let value = if raw.trim().eq_ignore_ascii_case("none") {
                    StyleValue::Keyword("none".to_string())
                } else {
                    StyleValue::Url(parse_url(raw)?)
                };
                out.push(name, value);
            }
            ValueKind::Text => out.push(name, StyleValue::Text(raw.trim().to_string())),
            ValueKind::FontFamily => {
                let families = split_list(raw, ',')?;
                if families.is_empty() {
                    return Err(ValueError::PartCount {
                        expected: "at least 1",
                        found: 0,
                    });
                }
                out.push(name, StyleValue::Text(families.join(", ")));
            }
            ValueKind::FontWeight => out.push(name, parse_font_weight(name, raw)?),
            ValueKind::FontSources => out.push(name, StyleValue::FontSources(parse_font_sources(raw)?)),
            ValueKind::Border { edges } => parse_border(raw, edges, out)?,
            ValueKind::Background => parse_background(raw, out)?,
            ValueKind::Custom(parser) => parser(name, raw, out)?,
        }
        Ok(())
    }
}

/// Outcome of [`PropertyRegistry::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Number of declarations produced
    Parsed(usize),
    /// No parser is registered under the name
    Unknown,
}

/// Case-insensitive table of property parsers
#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    parsers: HashMap<String, PropertyParser>,
}

impl PropertyRegistry {
    /// Registry with no properties
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the built-in properties
    pub fn standard() -> Self {
        let mut registry = Self::default();
        for (name, kind) in STANDARD_PROPERTIES {
            registry.insert(PropertyParser::new(*name, *kind));
        }
        registry
    }

    /// Add or replace a parser, returning the one it replaced
    pub fn insert(&mut self, parser: PropertyParser) -> Option<PropertyParser> {
        self.parsers.insert(parser.name.clone(), parser)
    }

    pub fn get(&self, name: &str) -> Option<&PropertyParser> {
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            self.parsers.get(&name.to_ascii_lowercase())
        } else {
            self.parsers.get(name)
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Parse `raw` for `name` and append the results to `out`.
    ///
    /// Global keywords and `var()`/`calc()` expressions are stored as-is under the
    /// property's own name. Nothing is appended when parsing fails.
    pub fn apply(
        &self,
        name: &str,
        raw: &str,
        important: bool,
        out: &mut DeclarationSet,
    ) -> std::result::Result<Applied, ValueError> {
        let Some(parser) = self.get(name) else {
            return Ok(Applied::Unknown);
        };

        let raw = raw.trim();
        let mut parsed = DeclarationSet::new();
        if let Some(keyword) = GLOBAL_KEYWORDS.iter().find(|k| raw.eq_ignore_ascii_case(k)) {
            parsed.push(parser.name(), StyleValue::Keyword((*keyword).to_string()));
        } else if is_expression(raw) {
            parsed.push(parser.name(), StyleValue::Expression(raw.to_string()));
        } else {
            parser.parse(raw, &mut parsed)?;
        }

        let count = parsed.len();
        out.extend(parsed.into_iter().map(|d| Declaration { important, ..d }));
        Ok(Applied::Parsed(count))
    }
}

static GLOBAL_REGISTRY: OnceLock<RwLock<Arc<PropertyRegistry>>> = OnceLock::new();

fn global() -> &'static RwLock<Arc<PropertyRegistry>> {
    GLOBAL_REGISTRY.get_or_init(|| RwLock::new(Arc::new(PropertyRegistry::standard())))
}

/// Snapshot of the process-wide registry
pub fn registry() -> Arc<PropertyRegistry> {
    let guard = global().read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&guard)
}

/// Add a parser to the process-wide registry.
///
/// Parsers already running keep the snapshot they started with.
pub fn register_property(parser: PropertyParser) -> Result<()> {
    let name = parser.name();
    if name.is_empty() {
        return Err(StyleError::Registry("property name is empty".to_string()));
    }
    if name.starts_with(VARIABLE_PREFIX) {
        return Err(StyleError::Registry(format!("'{name}' is reserved for variables")));
    }
    if name.chars().any(|c| c.is_whitespace() || matches!(c, ':' | ';' | '{' | '}')) {
        return Err(StyleError::Registry(format!("'{name}' is not a valid property name")));
    }

    let name = name.to_string();
    let mut guard = global().write().unwrap_or_else(PoisonError::into_inner);
    let mut next = PropertyRegistry::clone(&guard);
    if next.insert(parser).is_some() {
        tracing::debug!(property = %name, "replaced property parser");
    }
    *guard = Arc::new(next);
    Ok(())
}

fn parse_keyword(
    property: &str,
    raw: &str,
    keywords: &[&str],
) -> std::result::Result<StyleValue, ValueError> {
    let trimmed = raw.trim();
    keywords
        .iter()
        .find(|k| trimmed.eq_ignore_ascii_case(k))
        .map(|k| StyleValue::Keyword((*k).to_string()))
        .ok_or_else(|| ValueError::UnknownKeyword {
            property: property.to_string(),
            value: trimmed.to_string(),
        })
}

fn parse_length(
    property: &str,
    raw: &str,
    keywords: &[&str],
) -> std::result::Result<StyleValue, ValueError> {
    let trimmed = raw.trim();
    if !is_number_like(trimmed) && !keywords.is_empty() {
        return parse_keyword(property, trimmed, keywords);
    }
    parse_unit(trimmed).map(StyleValue::Unit)
}

fn parse_font_weight(property: &str, raw: &str) -> std::result::Result<StyleValue, ValueError> {
    let trimmed = raw.trim();
    if is_number_like(trimmed) {
        return match trimmed.parse::<i32>() {
            Ok(weight) if (1..=1000).contains(&weight) => Ok(StyleValue::Integer(weight)),
            _ => Err(ValueError::InvalidNumber(trimmed.to_string())),
        };
    }
    match parse_keyword(property, trimmed, FONT_WEIGHT_KEYWORDS)? {
        StyleValue::Keyword(k) if k == "normal" => Ok(StyleValue::Integer(400)),
        StyleValue::Keyword(k) if k == "bold" => Ok(StyleValue::Integer(700)),
        other => Ok(other),
    }
}

/// Expand one to four values onto `(top, right, bottom, left)`
fn push_sides(out: &mut DeclarationSet, sides: Sides, values: Vec<StyleValue>) -> std::result::Result<(), ValueError> {
    let expanded = match values.as_slice() {
        [all] => [all, all, all, all],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        _ => {
            return Err(ValueError::PartCount {
                expected: "1 to 4",
                found: values.len(),
            });
        }
    };
    for (side, value) in sides.iter().zip(expanded) {
        out.push(*side, value.clone());
    }
    Ok(())
}

fn push_alpha(out: &mut DeclarationSet, companion: Option<&str>, alpha: Option<f64>) {
    if let (Some(companion), Some(alpha)) = (companion, alpha) {
        out.push(companion, StyleValue::Number(alpha));
    }
}

fn parse_border(raw: &str, edges: &[BorderEdge], out: &mut DeclarationSet) -> std::result::Result<(), ValueError> {
    let parts = split_parts(raw)?;
    if parts.is_empty() || parts.len() > 3 {
        return Err(ValueError::PartCount {
            expected: "1 to 3",
            found: parts.len(),
        });
    }

    let mut width = None;
    let mut style = None;
    let mut color = None;
    let mut alpha = None;
    for part in parts {
        if style.is_none() && BORDER_STYLES.iter().any(|k| part.eq_ignore_ascii_case(k)) {
            style = Some(StyleValue::Keyword(part.to_ascii_lowercase()));
        } else if width.is_none() && (is_number_like(part) || BORDER_WIDTHS.iter().any(|k| part.eq_ignore_ascii_case(k))) {
            width = Some(parse_length("border-width", part, BORDER_WIDTHS)?);
        } else if color.is_none() && is_color_like(part) {
            let parsed = parse_color(part)?;
            color = Some(StyleValue::Color(parsed.color));
            alpha = parsed.alpha;
        } else {
            return Err(ValueError::UnexpectedPart(part.to_string()));
        }
    }

    for [width_name, style_name, color_name] in edges {
        if let Some(value) = &width {
            out.push(*width_name, value.clone());
        }
        if let Some(value) = &style {
            out.push(*style_name, value.clone());
        }
        if let Some(value) = &color {
            out.push(*color_name, value.clone());
        }
    }
    push_alpha(out, Some("border-opacity"), alpha);
    Ok(())
}

fn parse_background(raw: &str, out: &mut DeclarationSet) -> std::result::Result<(), ValueError> {
    let parts = split_parts(raw)?;
    if parts.is_empty() {
        return Err(ValueError::PartCount {
            expected: "at least 1",
            found: 0,
        });
    }
    for part in parts {
        if is_url(part) {
            out.push("background-image", StyleValue::Url(parse_url(part)?));
        } else if part.eq_ignore_ascii_case("none") {
            out.push("background-image", StyleValue::Keyword("none".to_string()));
        } else if BACKGROUND_REPEAT.iter().any(|k| part.eq_ignore_ascii_case(k)) {
            out.push("background-repeat", StyleValue::Keyword(part.to_ascii_lowercase()));
        } else if is_color_like(part) {
            let parsed = parse_color(part)?;
            out.push("background-color", StyleValue::Color(parsed.color));
            push_alpha(out, Some("background-opacity"), parsed.alpha);
        } else {
            return Err(ValueError::UnexpectedPart(part.to_string()));
        }
    }
    Ok(())
}

const GLOBAL_KEYWORDS: &[&str] = &["inherit", "initial", "unset"];

const NONE: &[&str] = &[];
const AUTO: &[&str] = &["auto"];
const AUTO_NONE: &[&str] = &["auto", "none"];
const NORMAL: &[&str] = &["normal"];

const DISPLAY: &[&str] = &[
    "block", "inline", "inline-block", "none", "table", "table-row", "table-cell", "list-item",
];
const POSITION: &[&str] = &["static", "relative", "absolute", "fixed"];
const FLOAT: &[&str] = &["none", "left", "right"];
const CLEAR: &[&str] = &["none", "left", "right", "both"];
const TEXT_ALIGN: &[&str] = &["left", "right", "center", "justify", "start", "end"];
const VERTICAL_ALIGN: &[&str] = &["top", "middle", "bottom", "baseline", "sub", "super", "text-top", "text-bottom"];
const FONT_STYLE: &[&str] = &["normal", "italic", "oblique"];
const FONT_SIZES: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller", "larger",
];
const FONT_WEIGHT_KEYWORDS: &[&str] = &["normal", "bold", "bolder", "lighter"];
const FONT_DISPLAY: &[&str] = &["auto", "block", "swap", "fallback", "optional"];
const FONT_STRETCH: &[&str] = &[
    "normal",
    "ultra-condensed",
    "extra-condensed",
    "condensed",
    "semi-condensed",
    "semi-expanded",
    "expanded",
    "extra-expanded",
    "ultra-expanded",
];
const TEXT_DECORATION: &[&str] = &["none", "underline", "overline", "line-through"];
const TEXT_TRANSFORM: &[&str] = &["none", "capitalize", "uppercase", "lowercase"];
const WHITE_SPACE: &[&str] = &["normal", "nowrap", "pre", "pre-wrap", "pre-line"];
const OVERFLOW: &[&str] = &["visible", "hidden", "clip", "scroll", "auto"];
const VISIBILITY: &[&str] = &["visible", "hidden", "collapse"];
const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "solid", "dashed", "dotted", "double", "groove", "ridge", "inset", "outset",
];
const BORDER_WIDTHS: &[&str] = &["thin", "medium", "thick"];
const PAGE_BREAK: &[&str] = &["auto", "always", "avoid", "left", "right"];
const BREAK: &[&str] = &["auto", "avoid", "always", "page", "column", "avoid-page", "avoid-column"];
const BREAK_INSIDE: &[&str] = &["auto", "avoid", "avoid-page", "avoid-column"];
const LIST_STYLE_TYPE: &[&str] = &[
    "none",
    "disc",
    "circle",
    "square",
    "decimal",
    "decimal-leading-zero",
    "lower-roman",
    "upper-roman",
    "lower-alpha",
    "upper-alpha",
    "lower-latin",
    "upper-latin",
];
const BACKGROUND_REPEAT: &[&str] = &["repeat", "repeat-x", "repeat-y", "no-repeat", "space", "round"];
const HYPHENS: &[&str] = &["none", "manual", "auto"];
const PAGE_ORIENTATION: &[&str] = &["portrait", "landscape"];

const MARGIN_SIDES: Sides = ["margin-top", "margin-right", "margin-bottom", "margin-left"];
const PADDING_SIDES: Sides = ["padding-top", "padding-right", "padding-bottom", "padding-left"];
const BORDER_WIDTH_SIDES: Sides = [
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
];
const BORDER_STYLE_SIDES: Sides = [
    "border-top-style",
    "border-right-style",
    "border-bottom-style",
    "border-left-style",
];
const BORDER_COLOR_SIDES: Sides = [
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
];

const TOP_EDGE: BorderEdge = ["border-top-width", "border-top-style", "border-top-color"];
const RIGHT_EDGE: BorderEdge = ["border-right-width", "border-right-style", "border-right-color"];
const BOTTOM_EDGE: BorderEdge = ["border-bottom-width", "border-bottom-style", "border-bottom-color"];
const LEFT_EDGE: BorderEdge = ["border-left-width", "border-left-style", "border-left-color"];
const ALL_EDGES: &[BorderEdge] = &[TOP_EDGE, RIGHT_EDGE, BOTTOM_EDGE, LEFT_EDGE];

const OPACITY: ValueKind = ValueKind::Number { min: 0.0, max: 1.0 };
const LENGTH: ValueKind = ValueKind::Length { keywords: NONE };
const LENGTH_OR_AUTO: ValueKind = ValueKind::Length { keywords: AUTO };
const LENGTH_OR_NORMAL: ValueKind = ValueKind::Length { keywords: NORMAL };
const BORDER_WIDTH: ValueKind = ValueKind::Length { keywords: BORDER_WIDTHS };
const BORDER_STYLE: ValueKind = ValueKind::Keyword(BORDER_STYLES);
const BORDER_COLOR: ValueKind = ValueKind::Color {
    alpha: Some("border-opacity"),
};

static STANDARD_PROPERTIES: &[(&str, ValueKind)] = &[
    // Box
    ("display", ValueKind::Keyword(DISPLAY)),
    ("position", ValueKind::Keyword(POSITION)),
    ("float", ValueKind::Keyword(FLOAT)),
    ("clear", ValueKind::Keyword(CLEAR)),
    ("overflow", ValueKind::Keyword(OVERFLOW)),
    ("visibility", ValueKind::Keyword(VISIBILITY)),
    ("width", LENGTH_OR_AUTO),
    ("height", LENGTH_OR_AUTO),
    ("min-width", LENGTH_OR_AUTO),
    ("min-height", LENGTH_OR_AUTO),
    ("max-width", ValueKind::Length { keywords: AUTO_NONE }),
    ("max-height", ValueKind::Length { keywords: AUTO_NONE }),
    ("top", LENGTH_OR_AUTO),
    ("right", LENGTH_OR_AUTO),
    ("bottom", LENGTH_OR_AUTO),
    ("left", LENGTH_OR_AUTO),
    ("z-index", ValueKind::Integer),
    // Margins and padding
    ("margin", ValueKind::Sides { sides: MARGIN_SIDES, keywords: AUTO }),
    ("margin-top", LENGTH_OR_AUTO),
    ("margin-right", LENGTH_OR_AUTO),
    ("margin-bottom", LENGTH_OR_AUTO),
    ("margin-left", LENGTH_OR_AUTO),
    ("padding", ValueKind::Sides { sides: PADDING_SIDES, keywords: NONE }),
    ("padding-top", LENGTH),
    ("padding-right", LENGTH),
    ("padding-bottom", LENGTH),
    ("padding-left", LENGTH),
    // Borders
    ("border", ValueKind::Border { edges: ALL_EDGES }),
    ("border-top", ValueKind::Border { edges: &[TOP_EDGE] }),
    ("border-right", ValueKind::Border { edges: &[RIGHT_EDGE] }),
    ("border-bottom", ValueKind::Border { edges: &[BOTTOM_EDGE] }),
    ("border-left", ValueKind::Border { edges: &[LEFT_EDGE] }),
    ("border-width", ValueKind::Sides { sides: BORDER_WIDTH_SIDES, keywords: BORDER_WIDTHS }),
    ("border-style", ValueKind::SideKeywords { sides: BORDER_STYLE_SIDES, keywords: BORDER_STYLES }),
    ("border-color", ValueKind::SideColors { sides: BORDER_COLOR_SIDES, alpha: Some("border-opacity") }),
    ("border-top-width", BORDER_WIDTH),
    ("border-right-width", BORDER_WIDTH),
    ("border-bottom-width", BORDER_WIDTH),
    ("border-left-width", BORDER_WIDTH),
    ("border-top-style", BORDER_STYLE),
    ("border-right-style", BORDER_STYLE),
    ("border-bottom-style", BORDER_STYLE),
    ("border-left-style", BORDER_STYLE),
    ("border-top-color", BORDER_COLOR),
    ("border-right-color", BORDER_COLOR),
    ("border-bottom-color", BORDER_COLOR),
    ("border-left-color", BORDER_COLOR),
    ("border-radius", LENGTH),
    ("border-opacity", OPACITY),
    // Colour and background
    ("color", ValueKind::Color { alpha: Some("fill-opacity") }),
    ("opacity", OPACITY),
    ("background", ValueKind::Background),
    ("background-color", ValueKind::Color { alpha: Some("background-opacity") }),
    ("background-image", ValueKind::Url),
    ("background-repeat", ValueKind::Keyword(BACKGROUND_REPEAT)),
    ("background-opacity", OPACITY),
    ("fill", ValueKind::Color { alpha: Some("fill-opacity") }),
    ("fill-opacity", OPACITY),
    ("stroke", ValueKind::Color { alpha: Some("stroke-opacity") }),
    ("stroke-opacity", OPACITY),
    ("stroke-width", LENGTH),
    // Fonts
    ("font-family", ValueKind::FontFamily),
    ("font-size", ValueKind::Length { keywords: FONT_SIZES }),
    ("font-weight", ValueKind::FontWeight),
    ("font-style", ValueKind::Keyword(FONT_STYLE)),
    ("font-stretch", ValueKind::Keyword(FONT_STRETCH)),
    ("font-display", ValueKind::Keyword(FONT_DISPLAY)),
    ("src", ValueKind::FontSources),
    // Text
    ("text-align", ValueKind::Keyword(TEXT_ALIGN)),
    ("vertical-align", ValueKind::Keyword(VERTICAL_ALIGN)),
    ("text-decoration", ValueKind::KeywordList(TEXT_DECORATION)),
    ("text-transform", ValueKind::Keyword(TEXT_TRANSFORM)),
    ("text-indent", LENGTH),
    ("line-height", LENGTH_OR_NORMAL),
    ("letter-spacing", LENGTH_OR_NORMAL),
    ("word-spacing", LENGTH_OR_NORMAL),
    ("white-space", ValueKind::Keyword(WHITE_SPACE)),
    ("hyphens", ValueKind::Keyword(HYPHENS)),
    ("content", ValueKind::Text),
    // Lists
    ("list-style-type", ValueKind::Keyword(LIST_STYLE_TYPE)),
    ("list-style-image", ValueKind::Url),
    ("counter-reset", ValueKind::Text),
    ("counter-increment", ValueKind::Text),
    // Columns and pagination
    ("column-count", ValueKind::Integer),
    ("column-gap", LENGTH_OR_NORMAL),
    ("column-width", LENGTH_OR_AUTO),
    ("column-span", ValueKind::Integer),
    ("page-break-before", ValueKind::Keyword(PAGE_BREAK)),
    ("page-break-after", ValueKind::Keyword(PAGE_BREAK)),
    ("page-break-inside", ValueKind::Keyword(BREAK_INSIDE)),
    ("break-before", ValueKind::Keyword(BREAK)),
    ("break-after", ValueKind::Keyword(BREAK)),
    ("break-inside", ValueKind::Keyword(BREAK_INSIDE)),
    ("orphans", ValueKind::Integer),
    ("widows", ValueKind::Integer),
    ("page", ValueKind::Text),
    ("size", ValueKind::Text),
    ("orientation", ValueKind::Keyword(PAGE_ORIENTATION)),
];
