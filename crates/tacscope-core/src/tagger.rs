use std::collections::HashSet;
use std::sync::LazyLock;

use crate::config::TaggerConfig;
use crate::types::{Span, TokenCategory};

/// Partitions C-like source into categorized spans for display.
///
/// Recognizers are tried at every position in priority order: comments,
/// string/char literals, preprocessor directives, keywords, numbers. The first
/// one that matches claims its range; unclaimed text is `Plain`.
#[derive(Debug, Clone)]
pub struct LexicalTagger {
    keywords: HashSet<String>,
    directives: HashSet<String>,
}

impl Default for LexicalTagger {
    fn default() -> Self {
        Self::new(&TaggerConfig::default())
    }
}

impl LexicalTagger {
    pub fn new(config: &TaggerConfig) -> Self {
        Self {
            keywords: config.keywords.iter().cloned().collect(),
            directives: config.directives.iter().cloned().collect(),
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }

    pub fn is_directive(&self, word: &str) -> bool {
        self.directives.contains(word)
    }

    /// Tag `source`. Concatenating the returned spans' text yields `source`.
    pub fn tag(&self, source: &str) -> Vec<Span> {
        Scanner::new(self, source).run()
    }
}

static DEFAULT_TAGGER: LazyLock<LexicalTagger> = LazyLock::new(LexicalTagger::default);

/// Tag `source` with the default keyword and directive tables.
pub fn tag(source: &str) -> Vec<Span> {
    DEFAULT_TAGGER.tag(source)
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

struct Scanner<'t, 'src> {
    tagger: &'t LexicalTagger,
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    plain_start: Option<usize>,
    spans: Vec<Span>,
}

impl<'t, 'src> Scanner<'t, 'src> {
    fn new(tagger: &'t LexicalTagger, src: &'src str) -> Self {
        Self {
            tagger,
            src,
            bytes: src.as_bytes(),
            pos: 0,
            plain_start: None,
            spans: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Span> {
        while self.pos < self.bytes.len() {
            match self.recognize() {
                Some((category, end)) => {
                    self.flush_plain();
                    let span = Span::new(category, self.src, self.pos, end);
                    self.spans.push(span);
                    self.pos = end;
                }
                None => {
                    self.plain_start.get_or_insert(self.pos);
                    self.pos = self.next_char_boundary();
                }
            }
        }
        self.flush_plain();
        self.spans
    }

    fn flush_plain(&mut self) {
        if let Some(start) = self.plain_start.take() {
            let span = Span::new(TokenCategory::Plain, self.src, start, self.pos);
            self.spans.push(span);
        }
    }

    fn next_char_boundary(&self) -> usize {
        let width = self.src[self.pos..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.pos + width
    }

    fn peek(&self, at: usize) -> Option<u8> {
        self.bytes.get(at).copied()
    }

    fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.src
            .get(from..)
            .and_then(|rest| rest.find(needle))
            .map(|i| from + i)
    }

    fn recognize(&self) -> Option<(TokenCategory, usize)> {
        if let Some(end) = self.comment() {
            return Some((TokenCategory::Comment, end));
        }
        if let Some(end) = self.string_literal() {
            return Some((TokenCategory::String, end));
        }
        if let Some(end) = self.preprocessor() {
            return Some((TokenCategory::Preprocessor, end));
        }
        if !self.at_word_start() {
            return None;
        }
        let word_end = self.word_end(self.pos);
        if self.tagger.is_keyword(&self.src[self.pos..word_end]) {
            return Some((TokenCategory::Keyword, word_end));
        }
        self.number().map(|end| (TokenCategory::Number, end))
    }

    /// `//` to end of line, or `/* ... */`. Unterminated block comments run to
    /// end of input.
    fn comment(&self) -> Option<usize> {
        if self.peek(self.pos) != Some(b'/') {
            return None;
        }
        match self.peek(self.pos + 1) {
            Some(b'/') => Some(self.find_from(self.pos, "\n").unwrap_or(self.bytes.len())),
            Some(b'*') => Some(
                self.find_from(self.pos + 2, "*/")
                    .map_or(self.bytes.len(), |i| i + 2),
            ),
            _ => None,
        }
    }

    /// A run from an opening quote to the next quote of the same kind.
    fn string_literal(&self) -> Option<usize> {
        let quote = match self.peek(self.pos) {
            Some(b'"') => "\"",
            Some(b'\'') => "'",
            _ => return None,
        };
        Some(
            self.find_from(self.pos + 1, quote)
                .map_or(self.bytes.len(), |i| i + 1),
        )
    }

    /// `#` preceded only by blanks on its line, then a directive word. The
    /// span runs to end of line but stops before a comment marker outside
    /// quoted text.
    fn preprocessor(&self) -> Option<usize> {
        if self.peek(self.pos) != Some(b'#') || !self.at_line_start() {
            return None;
        }
        let mut cursor = self.pos + 1;
        while matches!(self.peek(cursor), Some(b' ' | b'\t')) {
            cursor += 1;
        }
        let word_end = self.word_end(cursor);
        if word_end == cursor || !self.tagger.is_directive(&self.src[cursor..word_end]) {
            return None;
        }

        let mut quote: Option<u8> = None;
        let mut end = word_end;
        while let Some(b) = self.peek(end) {
            match (b, quote) {
                (b'\n', _) => break,
                (b'"' | b'\'', None) => quote = Some(b),
                (_, Some(open)) if b == open => quote = None,
                (b'/', None) if matches!(self.peek(end + 1), Some(b'/' | b'*')) => break,
                _ => {}
            }
            end += 1;
        }
        Some(end)
    }

    fn at_line_start(&self) -> bool {
        let mut i = self.pos;
        while i > 0 {
            match self.bytes[i - 1] {
                b' ' | b'\t' => i -= 1,
                b'\n' => return true,
                _ => return false,
            }
        }
        true
    }

    fn at_word_start(&self) -> bool {
        is_word_byte(self.bytes[self.pos]) && (self.pos == 0 || !is_word_byte(self.bytes[self.pos - 1]))
    }

    fn at_word_boundary(&self, at: usize) -> bool {
        !self.peek(at).is_some_and(is_word_byte)
    }

    fn word_end(&self, from: usize) -> usize {
        let mut end = from;
        while self.peek(end).is_some_and(is_word_byte) {
            end += 1;
        }
        end
    }

    fn digits_end(&self, from: usize) -> usize {
        let mut end = from;
        while self.peek(end).is_some_and(|b| b.is_ascii_digit()) {
            end += 1;
        }
        end
    }

    /// `\d+(\.\d+)?([eE][+-]?\d+)?` ending on a word boundary. The longest
    /// form that ends on a boundary wins; `1.5x` yields `1`.
    fn number(&self) -> Option<usize> {
        if !self.peek(self.pos).is_some_and(|b| b.is_ascii_digit()) {
            return None;
        }
        let mut candidates = vec![self.digits_end(self.pos)];
        let mut end = candidates[0];

        if self.peek(end) == Some(b'.') && self.peek(end + 1).is_some_and(|b| b.is_ascii_digit()) {
            end = self.digits_end(end + 1);
            candidates.push(end);
        }

        if matches!(self.peek(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(self.peek(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            if self.peek(exp).is_some_and(|b| b.is_ascii_digit()) {
                candidates.push(self.digits_end(exp));
            }
        }

        candidates
            .into_iter()
            .rev()
            .find(|&end| self.at_word_boundary(end))
    }
}
