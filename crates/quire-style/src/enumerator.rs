//! Block Enumerator
//!
//! Walks a byte range of comment-free stylesheet text one rule at a time. Each step
//! scans a prelude up to `{`, classifies it, finds the end of the block and reads the
//! body. `@media` bodies are enumerated recursively over their own range. Failures are
//! logged to the session and scanning resumes after the broken block or declaration.

use std::sync::Arc;

use crate::declarations::{DeclarationSet, VariableSet};
use crate::error::{ParseError, ParseErrorKind};
use crate::matcher::StyleMatcher;
use crate::parser::ParserOptions;
use crate::properties::{Applied, PropertyRegistry};
use crate::rules::{FontFace, MediaGroup, PageGroup, Rule, StyleDefinition};
use crate::scanner::Scanner;
use crate::tokenizer::{DeclarationReader, is_variable_name};

/// State shared by every enumerator of one parse
#[derive(Debug)]
pub(crate) struct ParseSession {
    registry: Arc<PropertyRegistry>,
    options: ParserOptions,
    errors: Vec<ParseError>,
    emitted: usize,
    /// Set once `max_rules` is reached; every enumerator stops from then on
    limit_hit: bool,
}

impl ParseSession {
    pub fn new(registry: Arc<PropertyRegistry>, options: ParserOptions) -> Self {
        Self {
            registry,
            options,
            errors: Vec::new(),
            emitted: 0,
            limit_hit: false,
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    fn error(&mut self, offset: usize, context: &str, kind: impl Into<ParseErrorKind>) {
        let error = ParseError::new(offset, context, kind);
        tracing::warn!(offset, context = %error.context, "{}", error.kind);
        self.errors.push(error);
    }
}

/// How the text before a `{` ended
enum Prelude {
    /// `{` at this offset
    Block(usize),
    /// `;` at this offset, no block follows
    Statement(usize),
    /// `}` at this offset with no open block
    StrayClose(usize),
    /// Range ended first
    Exhausted,
}

enum BlockKind<'t> {
    Style,
    Media,
    Page,
    FontFace,
    Unsupported(&'t str),
}

/// Split a prelude into its block kind and the predicate after the at-keyword
fn classify(prelude: &str) -> (BlockKind<'_>, &str) {
    let Some(rest) = prelude.strip_prefix('@') else {
        return (BlockKind::Style, prelude);
    };
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '(' || c == ':')
        .unwrap_or(rest.len());
    let keyword = &rest[..end];
    let predicate = rest[end..].trim();
    let kind = if keyword.eq_ignore_ascii_case("media") {
        BlockKind::Media
    } else if keyword.eq_ignore_ascii_case("page") {
        BlockKind::Page
    } else if keyword.eq_ignore_ascii_case("font-face") {
        BlockKind::FontFace
    } else {
        BlockKind::Unsupported(keyword)
    };
    (kind, predicate)
}

/// Visit each character of `text[from..end]` that is outside a quoted string.
///
/// A backslash escapes the next character. A newline ends an unterminated string.
fn find_outside_quotes<T>(
    text: &str,
    from: usize,
    end: usize,
    mut visit: impl FnMut(usize, char) -> Option<T>,
) -> Option<T> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text[from..end].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match quote {
            _ if c == '\\' => escaped = true,
            Some(open) if c == open || c == '\n' => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {
                if let Some(found) = visit(from + i, c) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn scan_prelude(text: &str, from: usize, end: usize) -> Prelude {
    find_outside_quotes(text, from, end, |at, c| match c {
        '{' => Some(Prelude::Block(at)),
        ';' => Some(Prelude::Statement(at)),
        '}' => Some(Prelude::StrayClose(at)),
        _ => None,
    })
    .unwrap_or(Prelude::Exhausted)
}

/// Offset of the `}` that balances the `{` at `open`
fn find_matching_close(text: &str, open: usize, end: usize) -> Option<usize> {
    let mut depth = 0usize;
    find_outside_quotes(text, open, end, |at, c| {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(at);
                }
            }
            _ => {}
        }
        None
    })
}

/// Offset of the first `}` after `open`
fn find_flat_close(text: &str, open: usize, end: usize) -> Option<usize> {
    find_outside_quotes(text, open + 1, end, |at, c| (c == '}').then_some(at))
}

/// Split a trailing `!important` off a raw value.
///
/// Any other `!` outside quotes and parentheses makes the value malformed.
fn split_important<'v>(property: &str, raw: &'v str) -> Result<(&'v str, bool), ParseErrorKind> {
    let mut depth = 0usize;
    let bang = find_outside_quotes(raw, 0, raw.len(), |at, c| {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '!' if depth == 0 => return Some(at),
            _ => {}
        }
        None
    });
    let Some(bang) = bang else {
        return Ok((raw, false));
    };
    let value = raw[..bang].trim_end();
    if raw[bang + 1..].trim().eq_ignore_ascii_case("important") && !value.is_empty() {
        Ok((value, true))
    } else {
        Err(ParseErrorKind::MalformedValue {
            property: property.to_string(),
            value: raw.to_string(),
        })
    }
}

/// Read the declarations of a block body `text[start..end]`
fn read_declarations(
    text: &str,
    start: usize,
    end: usize,
    context: &str,
    allow_variables: bool,
    session: &mut ParseSession,
) -> (DeclarationSet, VariableSet) {
    let mut declarations = DeclarationSet::new();
    let mut variables = VariableSet::new();
    let mut reader = DeclarationReader::with_range(text, start, end - start);

    loop {
        let offset = reader.offset();
        let name = match reader.read_next_attribute_name() {
            Ok(Some(name)) => name,
            Ok(None) => break,
            Err(err) => {
                session.error(offset, context, err);
                if !reader.skip_to_next_attribute() {
                    break;
                }
                continue;
            }
        };
        if name.is_empty() {
            session.error(offset, context, ParseErrorKind::EmptyName);
            reader.skip_to_next_attribute();
            continue;
        }

        let raw = match reader.read_declaration_value() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                session.error(offset, context, ParseErrorKind::MissingValue(name.to_string()));
                reader.skip_to_next_attribute();
                continue;
            }
            Err(err) => {
                session.error(offset, context, err);
                reader.skip_to_next_attribute();
                continue;
            }
        };

        if is_variable_name(name) {
            if allow_variables {
                variables.set(name, raw);
            } else {
                session.error(offset, context, ParseErrorKind::MisplacedVariable);
            }
            continue;
        }

        let (value, important) = match split_important(name, raw) {
            Ok(split) => split,
            Err(kind) => {
                session.error(offset, context, kind);
                continue;
            }
        };

        let applied = session.registry.apply(name, value, important, &mut declarations);
        match applied {
            Ok(Applied::Parsed(_)) => {}
            Ok(Applied::Unknown) => tracing::debug!(property = name, "ignoring unknown property"),
            Err(source) => session.error(
                offset,
                context,
                ParseErrorKind::Value {
                    property: name.to_string(),
                    source,
                },
            ),
        }
    }

    (declarations, variables)
}

/// Yields the rules found in `text[position..end]`
#[derive(Debug, Clone)]
pub(crate) struct BlockEnumerator {
    position: usize,
    end: usize,
    depth: usize,
}

impl BlockEnumerator {
    pub fn new(start: usize, end: usize, depth: usize) -> Self {
        Self {
            position: start,
            end,
            depth,
        }
    }

    /// The next rule, or `None` once the range is exhausted or abandoned
    pub fn next_rule(&mut self, text: &str, session: &mut ParseSession) -> Option<Rule> {
        loop {
            if session.limit_hit {
                self.position = self.end;
                return None;
            }
            let mut scanner = Scanner::with_range(text, self.position, self.end - self.position);
            if !scanner.skip_whitespace() {
                self.position = self.end;
                return None;
            }
            let start = scanner.offset();

            if session.emitted >= session.options.max_rules {
                let limit = session.options.max_rules;
                session.error(start, "", ParseErrorKind::TooManyRules { limit });
                session.limit_hit = true;
                self.position = self.end;
                return None;
            }

            match scan_prelude(text, start, self.end) {
                Prelude::Exhausted => {
                    session.error(start, text[start..self.end].trim(), ParseErrorKind::UnterminatedBlock);
                    self.position = self.end;
                    return None;
                }
                Prelude::StrayClose(at) => {
                    session.error(at, text[start..at].trim(), ParseErrorKind::UnexpectedCloseBrace);
                    self.position = at + 1;
                }
                Prelude::Statement(at) => {
                    let statement = text[start..at].trim();
                    if statement.starts_with('@') {
                        tracing::debug!(statement, "skipping statement at-rule");
                    } else {
                        session.error(start, statement, ParseErrorKind::MissingBlock);
                    }
                    self.position = at + 1;
                }
                Prelude::Block(open) => {
                    if let Some(rule) = self.read_block(text, start, open, session) {
                        return Some(rule);
                    }
                }
            }
        }
    }

    /// Read the block opened at `open`, moving past it. `None` when the block was skipped.
    fn read_block(&mut self, text: &str, start: usize, open: usize, session: &mut ParseSession) -> Option<Rule> {
        let prelude = text[start..open].trim();
        let (kind, predicate) = classify(prelude);

        match kind {
            BlockKind::Media => {
                let Some(close) = find_matching_close(text, open, self.end) else {
                    session.error(start, prelude, ParseErrorKind::UnbalancedBraces);
                    self.position = self.end;
                    return None;
                };
                self.position = close + 1;

                let limit = session.options.max_nesting_depth;
                if self.depth + 1 > limit {
                    session.error(start, prelude, ParseErrorKind::NestingTooDeep { limit });
                    return None;
                }

                let mut group = MediaGroup::new(predicate);
                let mut inner = BlockEnumerator::new(open + 1, close, self.depth + 1);
                while let Some(rule) = inner.next_rule(text, session) {
                    group.rules.push(rule);
                }
                // a group cut short by the rule limit is kept but not counted
                if !session.limit_hit {
                    session.emitted += 1;
                }
                tracing::trace!(media = predicate, rules = group.rules.len(), "parsed media group");
                Some(Rule::Media(group))
            }
            BlockKind::Unsupported(keyword) => {
                match find_matching_close(text, open, self.end) {
                    Some(close) => {
                        tracing::debug!(at_rule = keyword, "skipping unsupported at-rule");
                        self.position = close + 1;
                    }
                    None => {
                        session.error(start, prelude, ParseErrorKind::UnbalancedBraces);
                        self.position = self.end;
                    }
                }
                None
            }
            BlockKind::Style | BlockKind::Page | BlockKind::FontFace => {
                let Some(close) = find_flat_close(text, open, self.end) else {
                    session.error(start, prelude, ParseErrorKind::UnterminatedBlock);
                    self.position = self.end;
                    return None;
                };
                self.position = close + 1;

                let body_start = open + 1;
                let rule = match kind {
                    BlockKind::Page => {
                        let mut page = PageGroup::new(predicate);
                        page.declarations = read_declarations(text, body_start, close, prelude, false, session).0;
                        Rule::Page(page)
                    }
                    BlockKind::FontFace => {
                        let (declarations, _) = read_declarations(text, body_start, close, prelude, false, session);
                        Rule::FontFace(FontFace { declarations })
                    }
                    _ => {
                        let (matcher, invalid) = StyleMatcher::parse_or_never(prelude);
                        if let Some(err) = invalid {
                            session.error(start, prelude, err);
                        }
                        let (declarations, variables) =
                            read_declarations(text, body_start, close, prelude, true, session);
                        Rule::Style(StyleDefinition {
                            selector_text: prelude.to_string(),
                            matcher,
                            declarations,
                            variables,
                        })
                    }
                };
                session.emitted += 1;
                tracing::trace!(rule = prelude, "parsed rule");
                Some(rule)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enumerate(text: &str) -> (Vec<Rule>, Vec<ParseError>) {
        let mut session = ParseSession::new(Arc::new(PropertyRegistry::standard()), ParserOptions::default());
        let mut enumerator = BlockEnumerator::new(0, text.len(), 0);
        let mut rules = Vec::new();
        while let Some(rule) = enumerator.next_rule(text, &mut session) {
            rules.push(rule);
        }
        (rules, session.into_errors())
    }

    #[test]
    fn test_important_split() {
        assert_eq!(split_important("color", "red !important"), Ok(("red", true)));
        assert_eq!(split_important("color", "red ! IMPORTANT"), Ok(("red", true)));
        assert_eq!(split_important("content", "'wow!'"), Ok(("'wow!'", false)));
        assert!(split_important("x", "!!").is_err());
        assert!(split_important("x", "!important").is_err());
        assert!(split_important("x", "red !imp").is_err());
        assert_eq!(split_important("background-image", "url(a!b.png)"), Ok(("url(a!b.png)", false)));
        assert_eq!(split_important("background-image", "url(a!b.png) !important"), Ok(("url(a!b.png)", true)));
    }

    #[test]
    fn test_brace_helpers() {
        let text = "a { b { '}' } } c";
        assert_eq!(find_matching_close(text, 2, text.len()), Some(14));
        assert_eq!(find_flat_close(text, 2, text.len()), Some(12));
    }

    #[test]
    fn test_style_rules_in_order() {
        let (rules, errors) = enumerate(".a { color: red } .b{width:1pt}");
        assert!(errors.is_empty());
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].as_style().unwrap().selector_text, ".b");
    }

    #[test]
    fn test_statement_at_rules_are_skipped() {
        let (rules, errors) = enumerate("@import url('x.css'); @charset \"utf-8\"; .a { color: red }");
        assert!(errors.is_empty());
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_unsupported_block_at_rule_is_skipped() {
        let (rules, errors) = enumerate("@keyframes spin { from { width: 1pt } to { width: 2pt } } .a { color: red }");
        assert!(errors.is_empty());
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_stray_close_brace() {
        let (rules, errors) = enumerate("} .a { color: red }");
        assert_eq!(rules.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::UnexpectedCloseBrace);
    }

    #[test]
    fn test_missing_close_abandons_rest() {
        let (rules, errors) = enumerate(".a { color: red } .b { color: blue");
        assert_eq!(rules.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::UnterminatedBlock);
    }

    #[test]
    fn test_variables_only_on_style_rules() {
        let (rules, errors) = enumerate("@page { --x: 1; margin: 1pt } .a { --y: 2pt }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::MisplacedVariable);
        assert_eq!(rules[1].as_style().unwrap().variables.get("--y"), Some("2pt"));
    }

    #[test]
    fn test_nesting_limit() {
        let text = "@media print { @media print { @media print { .a { color: red } } } }";
        let mut options = ParserOptions::default();
        options.max_nesting_depth = 2;
        let mut session = ParseSession::new(Arc::new(PropertyRegistry::standard()), options);
        let mut enumerator = BlockEnumerator::new(0, text.len(), 0);
        let outer = enumerator.next_rule(text, &mut session).unwrap();
        let outer = outer.as_media().unwrap();
        assert_eq!(outer.rules.len(), 1);
        // the innermost group is dropped
        assert!(outer.rules[0].as_media().unwrap().rules.is_empty());
        assert_eq!(session.errors().len(), 1);
        assert_eq!(session.errors()[0].kind, ParseErrorKind::NestingTooDeep { limit: 2 });
    }

    #[test]
    fn test_rule_limit() {
        let mut options = ParserOptions::default();
        options.max_rules = 2;
        let text = ".a{} .b{} .c{}";
        let mut session = ParseSession::new(Arc::new(PropertyRegistry::standard()), options);
        let mut enumerator = BlockEnumerator::new(0, text.len(), 0);
        let mut count = 0;
        while enumerator.next_rule(text, &mut session).is_some() {
            count += 1;
        }
        assert_eq!(count, 2);
        assert_eq!(session.emitted, 2);
        assert_eq!(session.errors()[0].kind, ParseErrorKind::TooManyRules { limit: 2 });
    }

    #[test]
    fn test_rule_limit_inside_media_stops_everything() {
        let mut options = ParserOptions::default();
        options.max_rules = 1;
        let text = "@media print { .a{} .b{} } .c{}";
        let mut session = ParseSession::new(Arc::new(PropertyRegistry::standard()), options);
        let mut enumerator = BlockEnumerator::new(0, text.len(), 0);

        let group = enumerator.next_rule(text, &mut session).unwrap();
        assert_eq!(group.as_media().unwrap().rules.len(), 1);
        assert!(enumerator.next_rule(text, &mut session).is_none());
        assert_eq!(session.emitted, 1);
        assert_eq!(session.errors().len(), 1);
        assert_eq!(session.errors()[0].kind, ParseErrorKind::TooManyRules { limit: 1 });
    }
}
