//! Typed declaration values
//!
//! Conversion helpers shared by the property parsers: units, colours, urls,
//! font sources and the pass-through expression marker.

use std::borrow::Cow;
use std::fmt;

use crate::colors;
use crate::entities::unescape_html;
use crate::error::ValueError;
use crate::tokenizer::{split_list, split_parts};

pub const PIXEL_TO_POINT: f64 = 72.0 / 96.0;
pub const PICA_TO_POINT: f64 = 72.0 / 6.0;
pub const INCH_TO_POINT: f64 = 72.0;
pub const CENTIMETRE_TO_POINT: f64 = 72.0 / 2.54;
pub const MILLIMETRE_TO_POINT: f64 = 72.0 / 25.4;

/// Units resolved later against a base size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeUnit {
    Percent,
    Em,
    Rem,
    Ex,
    Ch,
    Vw,
    Vh,
    Vmin,
    Vmax,
}

impl RelativeUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Ex => "ex",
            Self::Ch => "ch",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Vmin => "vmin",
            Self::Vmax => "vmax",
        }
    }
}

// longer suffixes first: "vmin" ends in "in", "rem" ends in "em"
const RELATIVE_SUFFIXES: [(&str, RelativeUnit); 9] = [
    ("vmin", RelativeUnit::Vmin),
    ("vmax", RelativeUnit::Vmax),
    ("rem", RelativeUnit::Rem),
    ("em", RelativeUnit::Em),
    ("ex", RelativeUnit::Ex),
    ("ch", RelativeUnit::Ch),
    ("vw", RelativeUnit::Vw),
    ("vh", RelativeUnit::Vh),
    ("%", RelativeUnit::Percent),
];

const ABSOLUTE_SUFFIXES: [(&str, f64); 6] = [
    ("pt", 1.0),
    ("px", PIXEL_TO_POINT),
    ("pc", PICA_TO_POINT),
    ("in", INCH_TO_POINT),
    ("cm", CENTIMETRE_TO_POINT),
    ("mm", MILLIMETRE_TO_POINT),
];

/// A length. Absolute lengths are held in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unit {
    Points(f64),
    Relative(f64, RelativeUnit),
}

impl Unit {
    pub const ZERO: Unit = Unit::Points(0.0);

    /// Value in points, if absolute
    pub fn points(&self) -> Option<f64> {
        match self {
            Self::Points(pt) => Some(*pt),
            Self::Relative(..) => None,
        }
    }

    pub fn is_relative(&self) -> bool {
        matches!(self, Self::Relative(..))
    }

    /// Resolve against a base size in points (font size for em, container for %)
    pub fn resolve(&self, base: f64) -> f64 {
        match self {
            Self::Points(pt) => *pt,
            Self::Relative(value, RelativeUnit::Percent) => base * value / 100.0,
            Self::Relative(value, _) => base * value,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Points(pt) => write!(f, "{pt}pt"),
            Self::Relative(value, unit) => write!(f, "{value}{}", unit.suffix()),
        }
    }
}

/// Parse a plain number (no unit)
pub fn parse_number(text: &str) -> Result<f64, ValueError> {
    let trimmed = text.trim();
    let starts_numeric = trimmed
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'));
    if !starts_numeric {
        return Err(ValueError::InvalidNumber(text.to_string()));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ValueError::InvalidNumber(text.to_string()))
}

/// Whether a value part starts like a number (`10pt`, `-1`, `.5em`)
pub fn is_number_like(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-' | '+' | '.') => chars.next().is_some_and(|c| c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}

/// Parse a length such as `12pt`, `10px`, `1.5em` or `50%`. A bare number is points.
pub fn parse_unit(text: &str) -> Result<Unit, ValueError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValueError::InvalidUnit(text.to_string()));
    }
    let lower = trimmed.to_ascii_lowercase();
    let invalid = |_| ValueError::InvalidUnit(text.to_string());

    for (suffix, unit) in RELATIVE_SUFFIXES {
        if let Some(number) = lower.strip_suffix(suffix) {
            let value = parse_number(number).map_err(invalid)?;
            return Ok(Unit::Relative(value, unit));
        }
    }
    for (suffix, factor) in ABSOLUTE_SUFFIXES {
        if let Some(number) = lower.strip_suffix(suffix) {
            let value = parse_number(number).map_err(invalid)?;
            return Ok(Unit::Points(value * factor));
        }
    }
    parse_number(&lower).map(Unit::Points).map_err(invalid)
}

/// sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_u32(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Parse `#RGB` or `#RRGGBB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            3 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::rgb(channel(0)?, channel(1)?, channel(2)?))
            }
            6 => u32::from_str_radix(digits, 16).ok().map(Self::from_u32),
            _ => None,
        }
    }

    /// Convert hue (degrees), saturation and lightness (0..=1) to RGB
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        if s == 0.0 {
            let grey = (l * 255.0).round() as u8;
            return Self::rgb(grey, grey, grey);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |t: f64| {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };
        Self::rgb(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A parsed colour with its alpha split out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedColor {
    pub color: Color,
    pub alpha: Option<f64>,
}

/// Whether a value part looks like a colour
pub fn is_color_like(part: &str) -> bool {
    let lower = part.to_ascii_lowercase();
    lower.starts_with('#')
        || lower.starts_with("rgb(")
        || lower.starts_with("rgba(")
        || lower.starts_with("hsl(")
        || lower.starts_with("hsla(")
        || lower == "transparent"
        || colors::lookup(&lower).is_some()
}

/// Parse a named, hex, `rgb()`, `rgba()`, `hsl()` or `hsla()` colour
pub fn parse_color(text: &str) -> Result<ParsedColor, ValueError> {
    let trimmed = text.trim();
    let invalid = || ValueError::InvalidColor(text.to_string());
    let lower = trimmed.to_ascii_lowercase();

    if lower == "transparent" {
        return Ok(ParsedColor {
            color: Color::BLACK,
            alpha: Some(0.0),
        });
    }
    if lower.starts_with('#') {
        let color = Color::from_hex(&lower).ok_or_else(invalid)?;
        return Ok(ParsedColor { color, alpha: None });
    }
    if let Some((name, args)) = function_arguments(trimmed) {
        let name = name.to_ascii_lowercase();
        return match name.as_str() {
            "rgb" | "rgba" => parse_rgb_args(&args).ok_or_else(invalid),
            "hsl" | "hsla" => parse_hsl_args(&args).ok_or_else(invalid),
            _ => Err(invalid()),
        };
    }
    colors::lookup(&lower)
        .map(|rgb| ParsedColor {
            color: Color::from_u32(rgb),
            alpha: None,
        })
        .ok_or_else(invalid)
}

/// Split `name(body)` into its name and raw body
fn function_body(text: &str) -> Option<(&str, &str)> {
    let open = text.find('(')?;
    let inner = text.strip_suffix(')')?.get(open + 1..)?;
    Some((text[..open].trim(), inner))
}

/// Split `name(a, b, c)` into its name and trimmed arguments.
/// Space separated arguments (with an optional `/ alpha`) are accepted too.
fn function_arguments(text: &str) -> Option<(&str, Vec<&str>)> {
    let (name, inner) = function_body(text)?;
    let args: Vec<&str> = if inner.contains(',') {
        inner.split(',').map(str::trim).collect()
    } else {
        inner.split(|c: char| c.is_whitespace() || c == '/').filter(|s| !s.is_empty()).collect()
    };
    Some((name, args))
}

fn parse_channel(part: &str) -> Option<u8> {
    let value = match part.strip_suffix('%') {
        Some(pct) => parse_number(pct).ok()? * 2.55,
        None => parse_number(part).ok()?,
    };
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(part: &str) -> Option<f64> {
    let value = match part.strip_suffix('%') {
        Some(pct) => parse_number(pct).ok()? / 100.0,
        None => parse_number(part).ok()?,
    };
    Some(value.clamp(0.0, 1.0))
}

fn parse_fraction(part: &str) -> Option<f64> {
    let pct = part.strip_suffix('%').unwrap_or(part);
    Some(parse_number(pct).ok()? / 100.0)
}

fn parse_rgb_args(args: &[&str]) -> Option<ParsedColor> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let color = Color::rgb(parse_channel(args[0])?, parse_channel(args[1])?, parse_channel(args[2])?);
    let alpha = match args.get(3) {
        Some(part) => Some(parse_alpha(part)?),
        None => None,
    };
    Some(ParsedColor { color, alpha })
}

fn parse_hsl_args(args: &[&str]) -> Option<ParsedColor> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let hue = parse_number(args[0].trim_end_matches("deg")).ok()?;
    let color = Color::from_hsl(hue, parse_fraction(args[1])?, parse_fraction(args[2])?);
    let alpha = match args.get(3) {
        Some(part) => Some(parse_alpha(part)?),
        None => None,
    };
    Some(ParsedColor { color, alpha })
}

pub fn is_url(part: &str) -> bool {
    part.get(..4).is_some_and(|head| head.eq_ignore_ascii_case("url("))
}

/// Remove matching outer quotes, decoding `\\` and an escaped quote mark inside them
fn strip_quotes(text: &str) -> Cow<'_, str> {
    let text = text.trim();
    for mark in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(mark) && text.ends_with(mark) {
            return unescape_quoted(&text[1..text.len() - 1], mark);
        }
    }
    Cow::Borrowed(text)
}

fn unescape_quoted(inner: &str, mark: char) -> Cow<'_, str> {
    if !inner.contains('\\') {
        return Cow::Borrowed(inner);
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == '\\' && (next == '\\' || next == mark) => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Parse `url(path)`, `url('path')` or `url("path")`, decoding html entities in the path
pub fn parse_url(text: &str) -> Result<String, ValueError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_suffix(')')
        .filter(|_| is_url(trimmed))
        .map(|rest| &rest[4..])
        .ok_or_else(|| ValueError::InvalidUrl(text.to_string()))?;
    Ok(unescape_html(&strip_quotes(inner)))
}

/// Quote a string for output, preferring single quotes.
///
/// Text holding both quote marks gets its single quotes escaped, along with any
/// backslash that would otherwise read as an escape.
pub fn quote(text: &str) -> String {
    let mark = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(mark);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let escapes_next = c == '\\' && chars.peek().is_none_or(|&next| next == '\\' || next == mark);
        if c == mark || escapes_next {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(mark);
    out
}

/// Where a font face gets its data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSourceKind {
    Url,
    Local,
}

/// One entry of a font-face `src` list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSource {
    pub kind: FontSourceKind,
    pub source: String,
    pub format: Option<String>,
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FontSourceKind::Url => write!(f, "url({})", quote(&self.source))?,
            FontSourceKind::Local => write!(f, "local({})", quote(&self.source))?,
        }
        if let Some(format) = &self.format {
            write!(f, " format({})", quote(format))?;
        }
        Ok(())
    }
}

/// Parse a comma separated `src` list
pub fn parse_font_sources(text: &str) -> Result<Vec<FontSource>, ValueError> {
    let mut sources = Vec::new();
    for item in split_list(text, ',')? {
        let parts = split_parts(item)?;
        let (first, rest) = parts
            .split_first()
            .ok_or_else(|| ValueError::InvalidUrl(item.to_string()))?;

        let source = if is_url(first) {
            FontSource {
                kind: FontSourceKind::Url,
                source: parse_url(first)?,
                format: None,
            }
        } else if let Some((_, body)) = function_body(first).filter(|(n, _)| n.eq_ignore_ascii_case("local")) {
            FontSource {
                kind: FontSourceKind::Local,
                source: strip_quotes(body).to_string(),
                format: None,
            }
        } else {
            return Err(ValueError::UnexpectedPart(first.to_string()));
        };

        let format = match rest {
            [] => None,
            [format] => {
                let (_, body) = function_body(format)
                    .filter(|(n, _)| n.eq_ignore_ascii_case("format"))
                    .ok_or_else(|| ValueError::UnexpectedPart(format.to_string()))?;
                Some(strip_quotes(body).to_string())
            }
            [_, extra, ..] => return Err(ValueError::UnexpectedPart(extra.to_string())),
        };
        sources.push(FontSource { format, ..source });
    }
    if sources.is_empty() {
        return Err(ValueError::PartCount {
            expected: "at least 1",
            found: 0,
        });
    }
    Ok(sources)
}

/// Whether a raw value defers to the binding layer (`var(...)` or `calc(...)`)
pub fn is_expression(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.contains("var(") || lower.contains("calc(")
}

/// A typed declaration value
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Unit(Unit),
    Color(Color),
    Number(f64),
    Integer(i32),
    /// Enumerated keyword, lower case
    Keyword(String),
    Url(String),
    /// Free text kept verbatim (font families, generated content, names)
    Text(String),
    FontSources(Vec<FontSource>),
    /// Unresolved `var()` / `calc()` expression passed through for later binding
    Expression(String),
}

impl StyleValue {
    pub fn as_unit(&self) -> Option<Unit> {
        match self {
            Self::Unit(unit) => Some(*unit),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(f64::from(*i)),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Self::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) | Self::Url(t) | Self::Expression(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(unit) => unit.fmt(f),
            Self::Color(color) => color.fmt(f),
            Self::Number(n) => write!(f, "{n}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Keyword(k) => f.write_str(k),
            Self::Url(url) => write!(f, "url({})", quote(url)),
            Self::Text(text) | Self::Expression(text) => f.write_str(text),
            Self::FontSources(sources) => {
                for (i, source) in sources.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    source.fmt(f)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(text: &str) -> f64 {
        parse_unit(text).unwrap().points().unwrap()
    }

    #[test]
    fn test_absolute_units() {
        assert_eq!(points("12pt"), 12.0);
        assert_eq!(points("10px"), 7.5);
        assert_eq!(points("1in"), 72.0);
        assert_eq!(points("1pc"), 12.0);
        assert!((points("2.54cm") - 72.0).abs() < 1e-9);
        assert!((points("25.4mm") - 72.0).abs() < 1e-9);
        assert_eq!(points("12PT"), 12.0);
    }

    #[test]
    fn test_bare_number_is_points() {
        assert_eq!(points("14"), 14.0);
        assert_eq!(points("-3.5"), -3.5);
        assert_eq!(points("0"), 0.0);
    }

    #[test]
    fn test_relative_units() {
        assert_eq!(parse_unit("50%").unwrap(), Unit::Relative(50.0, RelativeUnit::Percent));
        assert_eq!(parse_unit("1.5em").unwrap(), Unit::Relative(1.5, RelativeUnit::Em));
        assert_eq!(parse_unit("2rem").unwrap(), Unit::Relative(2.0, RelativeUnit::Rem));
        assert_eq!(parse_unit("10vmin").unwrap(), Unit::Relative(10.0, RelativeUnit::Vmin));
        assert_eq!(parse_unit("3ch").unwrap(), Unit::Relative(3.0, RelativeUnit::Ch));
        assert_eq!(Unit::Relative(50.0, RelativeUnit::Percent).resolve(200.0), 100.0);
        assert_eq!(Unit::Relative(2.0, RelativeUnit::Em).resolve(12.0), 24.0);
    }

    #[test]
    fn test_malformed_units() {
        assert!(parse_unit("").is_err());
        assert!(parse_unit("pt").is_err());
        assert!(parse_unit("abc").is_err());
        assert!(parse_unit("12qq").is_err());
        assert!(parse_unit("inf").is_err());
    }

    #[test]
    fn test_unit_display_reparses() {
        for text in ["10px", "3cm", "1.25em", "33%", "7"] {
            let unit = parse_unit(text).unwrap();
            assert_eq!(parse_unit(&unit.to_string()).unwrap(), unit);
        }
    }

    #[test]
    fn test_colors() {
        assert_eq!(parse_color("red").unwrap().color, Color::rgb(255, 0, 0));
        assert_eq!(parse_color("#222").unwrap().color, Color::rgb(0x22, 0x22, 0x22));
        assert_eq!(parse_color("#808080").unwrap().color, Color::rgb(128, 128, 128));
        assert_eq!(parse_color("rgb(1, 2, 3)").unwrap().color, Color::rgb(1, 2, 3));
        assert_eq!(parse_color("RGB(100%, 0%, 0%)").unwrap().color, Color::rgb(255, 0, 0));

        let rgba = parse_color("rgba(0, 0, 255, 0.5)").unwrap();
        assert_eq!(rgba.color, Color::rgb(0, 0, 255));
        assert_eq!(rgba.alpha, Some(0.5));

        assert_eq!(parse_color("hsl(120, 100%, 25%)").unwrap().color, Color::rgb(0, 128, 0));
        assert_eq!(parse_color("transparent").unwrap().alpha, Some(0.0));
    }

    #[test]
    fn test_bad_colors() {
        assert!(parse_color("#12").is_err());
        assert!(parse_color("#ggg").is_err());
        assert!(parse_color("rgb(1, 2)").is_err());
        assert!(parse_color("rgb(1, 2, 3").is_err());
        assert!(parse_color("notacolor").is_err());
    }

    #[test]
    fn test_urls() {
        assert_eq!(parse_url("url(a.png)").unwrap(), "a.png");
        assert_eq!(parse_url("url('a;b.png')").unwrap(), "a;b.png");
        assert_eq!(parse_url("URL(\"x y.png\")").unwrap(), "x y.png");
        assert_eq!(parse_url("url(img?a=1&amp;b=2)").unwrap(), "img?a=1&b=2");
        assert!(parse_url("url(a.png").is_err());
        assert!(parse_url("a.png").is_err());
    }

    #[test]
    fn test_quote_escapes_mixed_marks() {
        assert_eq!(quote("a.png"), "'a.png'");
        assert_eq!(quote("it's.png"), "\"it's.png\"");
        assert_eq!(quote(r#"it's "x".png"#), r#"'it\'s "x".png'"#);

        for path in [r#"it's "x".png"#, r#"C:\fonts\a.ttf"#, r#"a\'b"c"#, r#"end\"#, r#"two\\b"'"#] {
            let printed = format!("url({})", quote(path));
            assert_eq!(parse_url(&printed).unwrap(), path, "{printed}");
        }
    }

    #[test]
    fn test_font_sources() {
        let sources = parse_font_sources(
            "url(https://fonts.example.com/roboto.ttf) format('truetype'), local('Roboto Regular')",
        )
        .unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].kind, FontSourceKind::Url);
        assert_eq!(sources[0].source, "https://fonts.example.com/roboto.ttf");
        assert_eq!(sources[0].format.as_deref(), Some("truetype"));
        assert_eq!(sources[1].kind, FontSourceKind::Local);
        assert_eq!(sources[1].source, "Roboto Regular");

        let printed = StyleValue::FontSources(sources.clone()).to_string();
        assert_eq!(parse_font_sources(&printed).unwrap(), sources);
    }

    #[test]
    fn test_expressions() {
        assert!(is_expression("var(--main)"));
        assert!(is_expression("CALC(100% - 10pt)"));
        assert!(!is_expression("10pt"));
    }
}
