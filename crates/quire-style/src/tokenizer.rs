//! Declaration Tokenizer
//!
//! Splits one rule body into `name: value` pairs. Single quotes, double quotes and
//! parentheses open nesting contexts: separators and whitespace inside them never
//! end a value.

use crate::error::TokenError;
use crate::scanner::{Scanner, is_css_whitespace};

/// Prefix of a custom-variable declaration name
pub const VARIABLE_PREFIX: &str = "--";

/// Reads declarations out of a rule body
#[derive(Debug, Clone)]
pub struct DeclarationReader<'a> {
    scanner: Scanner<'a>,
}

impl<'a> DeclarationReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { scanner: Scanner::new(text) }
    }

    /// Reader over `len` bytes of `text` starting at `start`
    pub fn with_range(text: &'a str, start: usize, len: usize) -> Self {
        Self {
            scanner: Scanner::with_range(text, start, len),
        }
    }

    pub fn offset(&self) -> usize {
        self.scanner.offset()
    }

    pub fn is_at_end(&self) -> bool {
        self.scanner.is_at_end()
    }

    /// Current character, `'\0'` at the end
    pub fn current(&self) -> char {
        self.scanner.current()
    }

    /// Read the next property name up to its `:`.
    ///
    /// Leading whitespace and stray `;` are skipped. Returns `Ok(None)` once the body is
    /// exhausted. On success the reader is left on the `:`. A name that runs into `;` or the
    /// end of the body without a `:` is a [`TokenError::MissingColon`].
    pub fn read_next_attribute_name(&mut self) -> Result<Option<&'a str>, TokenError> {
        loop {
            if !self.scanner.skip_whitespace() {
                return Ok(None);
            }
            if self.scanner.current() == ';' {
                self.scanner.advance();
            } else {
                break;
            }
        }

        let start = self.scanner.offset();
        while !self.scanner.is_at_end() {
            match self.scanner.current() {
                ':' | ';' => break,
                _ => {
                    self.scanner.advance();
                }
            }
        }

        let name = self.scanner.slice_from(start).trim();
        if self.scanner.current() == ':' && !self.scanner.is_at_end() {
            Ok(Some(name))
        } else {
            Err(TokenError::MissingColon(name.to_string()))
        }
    }

    /// Read one value, stopping at any of `separators` or, unless `ignore_whitespace`
    /// is set, at whitespace.
    ///
    /// A `:` under the cursor and leading whitespace are skipped first. Returns `Ok(None)`
    /// when nothing is left or the cursor already sits on a separator. The terminating
    /// separator is not consumed.
    pub fn read_next_value(
        &mut self,
        separators: &[char],
        ignore_whitespace: bool,
    ) -> Result<Option<&'a str>, TokenError> {
        if self.scanner.current() == ':' && !self.scanner.is_at_end() {
            self.scanner.advance();
        }
        if !self.scanner.skip_whitespace() {
            return Ok(None);
        }
        if separators.contains(&self.scanner.current()) {
            return Ok(None);
        }

        let start = self.scanner.offset();
        let mut quote: Option<char> = None;
        let mut depth = 0usize;

        while !self.scanner.is_at_end() {
            let c = self.scanner.current();
            if c == '\\' {
                // escaped character never closes or separates anything
                self.scanner.advance();
                self.scanner.advance();
                continue;
            }
            if let Some(open) = quote {
                if c == open {
                    quote = None;
                }
                self.scanner.advance();
                continue;
            }
            match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    if depth == 0 {
                        return Err(TokenError::UnbalancedParentheses);
                    }
                    depth -= 1;
                }
                _ if depth == 0 && separators.contains(&c) => break,
                _ if depth == 0 && !ignore_whitespace && is_css_whitespace(c) => break,
                _ => {}
            }
            self.scanner.advance();
        }

        if let Some(open) = quote {
            return Err(TokenError::UnterminatedQuote { quote: open });
        }
        if depth > 0 {
            return Err(TokenError::UnbalancedParentheses);
        }
        Ok(Some(self.scanner.slice_from(start).trim_end()))
    }

    /// Read the rest of a declaration value up to the next top-level `;`.
    ///
    /// On an unterminated quote or parenthesis the reader is put back where the value
    /// started, so [`skip_to_next_attribute`](Self::skip_to_next_attribute) resumes at the
    /// first raw `;` after it.
    pub fn read_declaration_value(&mut self) -> Result<Option<&'a str>, TokenError> {
        let start = self.scanner.offset();
        let value = self.read_next_value(&[';'], true);
        if value.is_err() {
            self.scanner.rewind(start);
        }
        value
    }

    /// Discard everything up to and including the next `;`.
    ///
    /// Returns false when the body is exhausted.
    pub fn skip_to_next_attribute(&mut self) -> bool {
        while !self.scanner.is_at_end() {
            let c = self.scanner.current();
            self.scanner.advance();
            if c == ';' {
                break;
            }
        }
        !self.scanner.is_at_end()
    }
}

/// Whether a declaration name introduces a custom variable
pub fn is_variable_name(name: &str) -> bool {
    name.starts_with(VARIABLE_PREFIX) && name.len() > VARIABLE_PREFIX.len()
}

/// Split a value into whitespace separated parts, keeping quoted and
/// parenthesised sections whole
pub fn split_parts(raw: &str) -> Result<Vec<&str>, TokenError> {
    let mut reader = DeclarationReader::new(raw);
    let mut parts = Vec::new();
    while let Some(part) = reader.read_next_value(&[], false)? {
        parts.push(part);
    }
    Ok(parts)
}

/// Split a value into `separator` delimited items; empty items are dropped
pub fn split_list(raw: &str, separator: char) -> Result<Vec<&str>, TokenError> {
    let mut reader = DeclarationReader::new(raw);
    let mut items = Vec::new();
    loop {
        match reader.read_next_value(&[separator], true)? {
            Some(item) => items.push(item),
            None if reader.is_at_end() => break,
            None => {}
        }
        if reader.current() == separator && !reader.is_at_end() {
            reader.scanner.advance();
        } else if reader.is_at_end() {
            break;
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(body: &str) -> Vec<(String, String)> {
        let mut reader = DeclarationReader::new(body);
        let mut out = Vec::new();
        while let Ok(Some(name)) = reader.read_next_attribute_name() {
            let value = reader.read_declaration_value().unwrap().unwrap_or("");
            out.push((name.to_string(), value.to_string()));
        }
        out
    }

    #[test]
    fn test_simple_pairs() {
        let pairs = read_all(" color : red; width:10pt ;");
        assert_eq!(
            pairs,
            vec![
                ("color".to_string(), "red".to_string()),
                ("width".to_string(), "10pt".to_string()),
            ]
        );
    }

    #[test]
    fn test_leading_and_doubled_semicolons() {
        let pairs = read_all(";;color:red;;;width:1pt");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].0, "width");
    }

    #[test]
    fn test_semicolon_inside_quotes() {
        let pairs = read_all("background-image: url('a;b.png'); color: blue");
        assert_eq!(pairs[0].1, "url('a;b.png')");
        assert_eq!(pairs[1].1, "blue");
    }

    #[test]
    fn test_semicolon_inside_parentheses() {
        let pairs = read_all("background-image: url(a;b.png)");
        assert_eq!(pairs[0].1, "url(a;b.png)");
    }

    #[test]
    fn test_whitespace_separated_values() {
        let mut reader = DeclarationReader::new("margin: 10pt  'a b' rgb(1, 2, 3);");
        assert_eq!(reader.read_next_attribute_name().unwrap(), Some("margin"));
        assert_eq!(reader.read_next_value(&[';'], false).unwrap(), Some("10pt"));
        assert_eq!(reader.read_next_value(&[';'], false).unwrap(), Some("'a b'"));
        assert_eq!(reader.read_next_value(&[';'], false).unwrap(), Some("rgb(1, 2, 3)"));
        assert_eq!(reader.read_next_value(&[';'], false).unwrap(), None);
    }

    #[test]
    fn test_unmatched_parenthesis_is_an_error() {
        let mut reader = DeclarationReader::new("width: calc(1pt + 2pt; color: red");
        reader.read_next_attribute_name().unwrap();
        assert_eq!(
            reader.read_declaration_value(),
            Err(TokenError::UnbalancedParentheses)
        );
        assert!(reader.skip_to_next_attribute());
        assert_eq!(reader.read_next_attribute_name().unwrap(), Some("color"));
        assert_eq!(reader.read_declaration_value().unwrap(), Some("red"));

        let mut reader = DeclarationReader::new("width: 1pt)");
        reader.read_next_attribute_name().unwrap();
        assert_eq!(
            reader.read_declaration_value(),
            Err(TokenError::UnbalancedParentheses)
        );
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        let mut reader = DeclarationReader::new("content: 'abc; color: red");
        reader.read_next_attribute_name().unwrap();
        assert_eq!(
            reader.read_declaration_value(),
            Err(TokenError::UnterminatedQuote { quote: '\'' })
        );
        assert!(reader.skip_to_next_attribute());
        assert_eq!(reader.read_next_attribute_name().unwrap(), Some("color"));
    }

    #[test]
    fn test_missing_colon_and_resync() {
        let mut reader = DeclarationReader::new("color red; width: 2pt");
        assert_eq!(
            reader.read_next_attribute_name(),
            Err(TokenError::MissingColon("color red".to_string()))
        );
        assert!(reader.skip_to_next_attribute());
        assert_eq!(reader.read_next_attribute_name().unwrap(), Some("width"));
        assert_eq!(reader.read_declaration_value().unwrap(), Some("2pt"));
    }

    #[test]
    fn test_variable_value_keeps_inner_whitespace() {
        let mut reader = DeclarationReader::new("--main-font: 'Gill Sans', serif ;");
        let name = reader.read_next_attribute_name().unwrap().unwrap();
        assert!(is_variable_name(name));
        assert_eq!(reader.read_declaration_value().unwrap(), Some("'Gill Sans', serif"));
    }

    #[test]
    fn test_ranged_reader() {
        let text = ".a{color:red}";
        let mut reader = DeclarationReader::with_range(text, 3, 9);
        assert_eq!(reader.read_next_attribute_name().unwrap(), Some("color"));
        assert_eq!(reader.read_declaration_value().unwrap(), Some("red"));
        assert_eq!(reader.read_next_attribute_name().unwrap(), None);
    }

    #[test]
    fn test_split_helpers() {
        assert_eq!(split_parts("1pt  solid rgb(0, 0, 0)").unwrap(), vec!["1pt", "solid", "rgb(0, 0, 0)"]);
        assert_eq!(
            split_list("'Gill Sans', , serif,Arial", ',').unwrap(),
            vec!["'Gill Sans'", "serif", "Arial"]
        );
    }
}
