//! Character Scanner
//!
//! A cursor over a byte range of a string. Offsets are absolute byte offsets into
//! the underlying text. The scanner knows nothing about quotes or escapes; the
//! layers above track that state themselves.

/// Cursor over `text[start..end]`
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    end: usize,
    offset: usize,
}

impl<'a> Scanner<'a> {
    /// Scanner over the whole text
    pub fn new(text: &'a str) -> Self {
        Self::with_range(text, 0, text.len())
    }

    /// Scanner over `len` bytes of `text` starting at `start`.
    ///
    /// Both ends must fall on character boundaries.
    pub fn with_range(text: &'a str, start: usize, len: usize) -> Self {
        let end = (start + len).min(text.len());
        debug_assert!(text.is_char_boundary(start) && text.is_char_boundary(end));
        Self {
            text,
            end,
            offset: start,
        }
    }

    /// Current absolute offset
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move back to an absolute offset at or before the cursor
    pub fn rewind(&mut self, offset: usize) {
        self.offset = offset.min(self.offset);
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.end
    }

    /// Character under the cursor, or `'\0'` once the range is exhausted
    pub fn current(&self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        self.text[self.offset..self.end].chars().next().unwrap_or('\0')
    }

    /// Step over the current character. Returns false when the end of the range is reached.
    pub fn advance(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.offset += self.current().len_utf8();
        !self.is_at_end()
    }

    /// Step over whitespace; returns false if the range was exhausted
    pub fn skip_whitespace(&mut self) -> bool {
        while !self.is_at_end() && is_css_whitespace(self.current()) {
            self.advance();
        }
        !self.is_at_end()
    }

    /// Text between an absolute offset and the cursor
    pub fn slice_from(&self, from: usize) -> &'a str {
        &self.text[from..self.offset]
    }
}

/// Whitespace as the stylesheet grammar sees it
pub fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0C')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_every_character() {
        let text = "0123456789";
        let mut scanner = Scanner::new(text);
        let mut seen = String::new();
        loop {
            seen.push(scanner.current());
            if !scanner.advance() {
                break;
            }
        }
        assert_eq!(seen, text);
        assert!(scanner.is_at_end());
        assert!(!scanner.advance());
        assert_eq!(scanner.current(), '\0');
    }

    #[test]
    fn test_range_is_respected() {
        let text = "abc{def}ghi";
        let mut scanner = Scanner::with_range(text, 4, 3);
        assert_eq!(scanner.current(), 'd');
        scanner.advance();
        scanner.advance();
        assert_eq!(scanner.current(), 'f');
        assert!(!scanner.advance());
        assert_eq!(scanner.offset(), 7);
        assert_eq!(scanner.slice_from(4), "def");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut scanner = Scanner::new("é;x");
        assert_eq!(scanner.current(), 'é');
        scanner.advance();
        assert_eq!(scanner.offset(), 2);
        assert_eq!(scanner.current(), ';');
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new("  \n\tx ");
        assert!(scanner.skip_whitespace());
        assert_eq!(scanner.current(), 'x');
        scanner.advance();
        assert!(!scanner.skip_whitespace());
    }
}
