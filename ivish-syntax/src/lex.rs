// This file is part of ivish, an interactive shell for embedded hosts.
// Copyright (C) 2026 The ivish authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Command-line tokenizer.
//!
//! [`tokenize`] scans a command line in a single forward pass and splits
//! it into [`Token`]s and [`Delimiter`]s. Single quotes, double quotes
//! and backslashes are honored while scanning; the de-quoted text ends up
//! in [`Token::content`] while the `start`/`end` fields keep the byte
//! positions of the token in the original line so callers can map tokens
//! back to columns.
//!
//! Positions are byte offsets into the input line. They are opaque to
//! this module's callers: the line editor converts them to terminal cells
//! and the edit buffer moves in character units, but neither conversion
//! happens here.

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

/// Single word produced by the tokenizer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    /// Position of the first byte of the token in the original line
    pub start: usize,
    /// Position of the last character that extended the token
    ///
    /// Quote characters count: the token for `"ab"` ends at the closing
    /// quote, not at `b`.
    pub end: usize,
    /// Token text with quoting and escaping applied once
    pub content: String,
}

/// Kind of a command-line delimiter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DelimiterKind {
    /// `|`
    Pipe,
    /// `|&`
    PipeErrRedi,
    /// `;`
    CommandSep,
}

impl DelimiterKind {
    /// Returns the delimiter as it appeared in the line.
    #[must_use]
    pub const fn literal(self) -> &'static str {
        match self {
            DelimiterKind::Pipe => "|",
            DelimiterKind::PipeErrRedi => "|&",
            DelimiterKind::CommandSep => ";",
        }
    }

    /// Returns true for `|` and `|&`.
    #[must_use]
    pub const fn is_pipe(self) -> bool {
        matches!(self, DelimiterKind::Pipe | DelimiterKind::PipeErrRedi)
    }
}

impl std::fmt::Display for DelimiterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.literal())
    }
}

/// Delimiter record.
///
/// A delimiter never becomes a [`Token`]. `token_range` is the half-open
/// interval of token indices between the previous delimiter (or the
/// start of the line) and this one, so `token_range.is_empty()` directly
/// answers "is my left side empty".
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Delimiter {
    pub kind: DelimiterKind,
    /// Position of the first byte of the delimiter in the original line
    pub position: usize,
    /// Indices of the tokens on the left of this delimiter, up to the
    /// previous delimiter
    pub token_range: Range<usize>,
}

impl Delimiter {
    /// Position one past the last byte of the delimiter literal.
    #[must_use]
    pub fn end(&self) -> usize {
        self.position + self.kind.literal().len()
    }
}

/// Kind of quoting that was still open when the scan ended.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EscapeKind {
    SingleQuote,
    DoubleQuote,
    Backslash,
}

impl EscapeKind {
    /// The character that opened this escape.
    #[must_use]
    pub const fn opening_char(self) -> char {
        match self {
            EscapeKind::SingleQuote => '\'',
            EscapeKind::DoubleQuote => '"',
            EscapeKind::Backslash => '\\',
        }
    }
}

/// Reported when the scan ended in the middle of an escape.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EscapeInfo {
    /// Position of the character that opened the escape
    pub start: usize,
    pub kind: EscapeKind,
}

/// Everything the tokenizer found out about a line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenizeResult {
    /// The scanned line, verbatim
    pub line: String,
    pub tokens: Vec<Token>,
    pub delimiters: Vec<Delimiter>,
    /// Unconsumed suffix of the line
    ///
    /// Empty when the whole line was consumed. When a token limit
    /// stopped the scan, this starts right after the last consumed
    /// character; when the scan ended inside an escape, it starts at the
    /// beginning of the still-open token.
    pub rest: String,
    /// Present iff the scan ended inside a quote or backslash escape
    pub unfinished_escape: Option<EscapeInfo>,
}

impl TokenizeResult {
    /// Tests whether the delimiter at the given index is valid.
    ///
    /// `|` and `|&` need at least one token on both sides; the right
    /// side is satisfied by the next delimiter having a non-empty left
    /// side, or by a token following this delimiter when it is the last
    /// one. `;` only needs a non-empty left side, so a trailing `;` is
    /// accepted.
    #[must_use]
    pub fn delimiter_is_valid(&self, index: usize) -> bool {
        let delimiter = &self.delimiters[index];
        if delimiter.token_range.is_empty() {
            return false;
        }
        if !delimiter.kind.is_pipe() {
            return true;
        }
        match self.delimiters.get(index + 1) {
            Some(next) => !next.token_range.is_empty(),
            None => delimiter.token_range.end < self.tokens.len(),
        }
    }

    /// Returns the indices of all invalid delimiters, in line order.
    #[must_use]
    pub fn invalid_delimiters(&self) -> Vec<usize> {
        (0..self.delimiters.len())
            .filter(|&i| !self.delimiter_is_valid(i))
            .collect()
    }

    /// Tokens on the left of the delimiter at the given index.
    #[must_use]
    pub fn tokens_before(&self, index: usize) -> &[Token] {
        &self.tokens[self.delimiters[index].token_range.clone()]
    }
}

/// Tokenizes a whole line.
#[must_use]
pub fn tokenize(line: &str) -> TokenizeResult {
    Scanner::new(line).run(None)
}

/// Tokenizes a line, stopping after `count` tokens have been produced.
///
/// The returned [`TokenizeResult::rest`] holds the unconsumed suffix. A
/// delimiter that would immediately follow the `count`-th token is left
/// in `rest` rather than being consumed and reported.
#[must_use]
pub fn tokenize_at_most(line: &str, count: usize) -> TokenizeResult {
    Scanner::new(line).run(Some(count))
}

struct Scanner<'a> {
    line: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// Text of the token being accumulated, if any
    accum: Option<String>,
    /// Position of the first character of `accum`
    start: usize,
    /// Position of the last character that extended `accum`
    end: usize,
    escaping: Option<EscapeKind>,
    /// Position of the character that opened `escaping`
    escape_start: usize,
    /// One-character lookahead state for a backslash seen inside a
    /// double quote
    sub_escaping: bool,
    tokens: Vec<Token>,
    delimiters: Vec<Delimiter>,
    /// Token-index upper bound covered by the previous delimiter
    covered: usize,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str) -> Self {
        Scanner {
            line,
            chars: line.char_indices().peekable(),
            accum: None,
            start: 0,
            end: 0,
            escaping: None,
            escape_start: 0,
            sub_escaping: false,
            tokens: Vec::new(),
            delimiters: Vec::new(),
            covered: 0,
        }
    }

    fn run(mut self, limit: Option<usize>) -> TokenizeResult {
        let mut rest_from = self.line.len();
        let mut unfinished_escape = None;

        while let Some((index, c)) = self.chars.next() {
            if let Some(kind) = self.escaping {
                self.continue_escape(kind, index, c);
                continue;
            }

            match c {
                '\'' => self.open_escape(EscapeKind::SingleQuote, index),
                '"' => self.open_escape(EscapeKind::DoubleQuote, index),
                '\\' => self.open_escape(EscapeKind::Backslash, index),
                _ if c.is_whitespace() => {
                    self.harvest();
                    if limit == Some(self.tokens.len()) {
                        rest_from = self.next_index();
                        break;
                    }
                }
                '|' | ';' => {
                    self.harvest();
                    if limit == Some(self.tokens.len()) {
                        rest_from = index;
                        break;
                    }
                    self.delimiter(index, c);
                }
                _ => self.extend(index, c),
            }
        }

        if let Some(kind) = self.escaping {
            // The open token is not harvested; it is conveyed through
            // `rest` and `unfinished_escape` instead.
            unfinished_escape = Some(EscapeInfo {
                start: self.escape_start,
                kind,
            });
            rest_from = self.start;
            self.accum = None;
        } else if self.chars.peek().is_none() && rest_from == self.line.len() {
            self.harvest();
        }

        TokenizeResult {
            line: self.line.to_owned(),
            tokens: self.tokens,
            delimiters: self.delimiters,
            rest: self.line[rest_from..].to_owned(),
            unfinished_escape,
        }
    }

    /// Position of the next unconsumed character, or the line length.
    fn next_index(&mut self) -> usize {
        self.chars.peek().map_or(self.line.len(), |&(i, _)| i)
    }

    fn accum_mut(&mut self, index: usize) -> &mut String {
        self.accum.get_or_insert_with(|| {
            self.start = index;
            String::new()
        })
    }

    fn extend(&mut self, index: usize, c: char) {
        self.accum_mut(index).push(c);
        self.end = index;
    }

    fn open_escape(&mut self, kind: EscapeKind, index: usize) {
        self.accum_mut(index);
        self.end = index;
        self.escaping = Some(kind);
        self.escape_start = index;
        self.sub_escaping = false;
    }

    fn continue_escape(&mut self, kind: EscapeKind, index: usize, c: char) {
        self.end = index;
        match kind {
            EscapeKind::SingleQuote => {
                if c == '\'' {
                    self.escaping = None;
                } else {
                    self.accum_mut(index).push(c);
                }
            }
            EscapeKind::DoubleQuote => {
                if self.sub_escaping {
                    // Only `\"` and `\\` collapse; any other backslash
                    // pair is kept literally.
                    if c != '"' && c != '\\' {
                        self.accum_mut(index).push('\\');
                    }
                    self.accum_mut(index).push(c);
                    self.sub_escaping = false;
                } else if c == '\\' {
                    self.sub_escaping = true;
                } else if c == '"' {
                    self.escaping = None;
                } else {
                    self.accum_mut(index).push(c);
                }
            }
            EscapeKind::Backslash => {
                self.accum_mut(index).push(c);
                self.escaping = None;
            }
        }
    }

    fn harvest(&mut self) {
        if let Some(content) = self.accum.take() {
            self.tokens.push(Token {
                start: self.start,
                end: self.end,
                content,
            });
        }
    }

    fn delimiter(&mut self, index: usize, c: char) {
        let kind = match c {
            ';' => DelimiterKind::CommandSep,
            _ => {
                if self.chars.peek().is_some_and(|&(_, next)| next == '&') {
                    self.chars.next();
                    DelimiterKind::PipeErrRedi
                } else {
                    DelimiterKind::Pipe
                }
            }
        };
        self.delimiters.push(Delimiter {
            kind,
            position: index,
            token_range: self.covered..self.tokens.len(),
        });
        self.covered = self.tokens.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn contents(result: &TokenizeResult) -> Vec<&str> {
        result.tokens.iter().map(|t| t.content.as_str()).collect()
    }

    #[test]
    fn plain_words() {
        let result = tokenize("echo hello  world");
        assert_eq!(contents(&result), ["echo", "hello", "world"]);
        assert!(result.delimiters.is_empty());
        assert_eq!(result.rest, "");
        assert_eq!(result.unfinished_escape, None);

        let echo = &result.tokens[0];
        assert_eq!((echo.start, echo.end), (0, 3));
        let world = &result.tokens[2];
        assert_eq!((world.start, world.end), (12, 16));
    }

    #[test]
    fn empty_and_blank_lines() {
        assert!(tokenize("").tokens.is_empty());
        assert!(tokenize("   \t ").tokens.is_empty());
    }

    #[test]
    fn quoting_mix() {
        let result = tokenize("a 'b c' \"d\\\"e\"");
        assert_eq!(contents(&result), ["a", "b c", "d\"e"]);
        assert!(result.delimiters.is_empty());
        assert_eq!(result.unfinished_escape, None);

        let quoted = &result.tokens[1];
        assert_eq!((quoted.start, quoted.end), (2, 6));
        let double = &result.tokens[2];
        assert_eq!((double.start, double.end), (8, 13));
    }

    #[test]
    fn single_quotes_are_verbatim() {
        let result = tokenize(r"'a\\b|;'");
        assert_eq!(contents(&result), [r"a\\b|;"]);
    }

    #[test]
    fn double_quote_keeps_other_backslash_pairs() {
        let result = tokenize(r#""a\xb" "c\\d""#);
        assert_eq!(contents(&result), [r"a\xb", r"c\d"]);
    }

    #[test]
    fn backslash_escapes_next_character() {
        let result = tokenize(r"a\ b c\'d");
        assert_eq!(contents(&result), ["a b", "c'd"]);
    }

    #[test]
    fn empty_quotes_preserve_empty_token() {
        let result = tokenize("a '' b \"\"");
        assert_eq!(contents(&result), ["a", "", "b", ""]);
        let empty = &result.tokens[1];
        assert_eq!((empty.start, empty.end), (2, 3));
    }

    #[test]
    fn quotes_adjacent_to_word() {
        let result = tokenize(r#"ab"cd"ef"#);
        assert_eq!(contents(&result), ["abcdef"]);
        let token = &result.tokens[0];
        assert_eq!((token.start, token.end), (0, 7));
    }

    #[test]
    fn pipeline_and_separator() {
        let result = tokenize("ls | grep foo ; echo done");
        assert_eq!(contents(&result), ["ls", "grep", "foo", "echo", "done"]);

        assert_eq!(result.delimiters.len(), 2);
        let pipe = &result.delimiters[0];
        assert_eq!(pipe.kind, DelimiterKind::Pipe);
        assert_eq!(pipe.position, 3);
        assert_eq!(pipe.token_range, 0..1);
        let sep = &result.delimiters[1];
        assert_eq!(sep.kind, DelimiterKind::CommandSep);
        assert_eq!(sep.position, 14);
        assert_eq!(sep.token_range, 1..3);

        assert_eq!(result.tokens_before(1).len(), 2);
        assert!(result.invalid_delimiters().is_empty());
    }

    #[test]
    fn pipe_err_redi() {
        let result = tokenize("make|&tee log");
        assert_eq!(contents(&result), ["make", "tee", "log"]);
        let delimiter = &result.delimiters[0];
        assert_eq!(delimiter.kind, DelimiterKind::PipeErrRedi);
        assert_eq!(delimiter.position, 4);
        assert_eq!(delimiter.end(), 6);
    }

    #[test]
    fn pipe_followed_by_non_ampersand() {
        let result = tokenize("a |b");
        assert_eq!(result.delimiters[0].kind, DelimiterKind::Pipe);
        assert_eq!(contents(&result), ["a", "b"]);
    }

    #[test]
    fn delimiters_never_become_tokens() {
        let result = tokenize(";|;");
        assert!(result.tokens.is_empty());
        assert_eq!(result.delimiters.len(), 3);
    }

    #[test]
    fn leading_pipe_is_invalid() {
        let result = tokenize("| ls");
        assert_eq!(result.delimiters[0].position, 0);
        assert!(result.delimiters[0].token_range.is_empty());
        assert_eq!(result.invalid_delimiters(), [0]);
    }

    #[test]
    fn trailing_pipe_is_invalid() {
        let result = tokenize("ls |");
        assert_eq!(result.invalid_delimiters(), [0]);
    }

    #[test]
    fn trailing_separator_is_valid() {
        let result = tokenize("ls ;");
        assert!(result.invalid_delimiters().is_empty());
    }

    #[test]
    fn leading_separator_is_invalid() {
        let result = tokenize("; ls");
        assert_eq!(result.invalid_delimiters(), [0]);
    }

    #[test]
    fn double_pipe_invalidates_both() {
        let result = tokenize("a | | b");
        assert_eq!(result.invalid_delimiters(), [0, 1]);
    }

    #[test]
    fn pipe_before_separator_is_invalid() {
        let result = tokenize("a | ; b");
        assert_eq!(result.invalid_delimiters(), [0, 1]);
    }

    #[test]
    fn valid_delimiters_have_no_empty_pipe_sides() {
        let result = tokenize("a | b |& c ; d ;");
        assert!(result.invalid_delimiters().is_empty());
        for (i, delimiter) in result.delimiters.iter().enumerate() {
            assert!(!delimiter.token_range.is_empty());
            if delimiter.kind.is_pipe() {
                let right = match result.delimiters.get(i + 1) {
                    Some(next) => !next.token_range.is_empty(),
                    None => delimiter.token_range.end < result.tokens.len(),
                };
                assert!(right);
            }
        }
    }

    #[test]
    fn unfinished_double_quote() {
        let result = tokenize("echo \"hi");
        assert_eq!(contents(&result), ["echo"]);
        assert_matches!(
            result.unfinished_escape,
            Some(EscapeInfo {
                start: 5,
                kind: EscapeKind::DoubleQuote,
            })
        );
        assert_eq!(result.rest, "\"hi");
    }

    #[test]
    fn unfinished_single_quote() {
        let result = tokenize("echo 'oops");
        assert_matches!(
            result.unfinished_escape,
            Some(EscapeInfo {
                start: 5,
                kind: EscapeKind::SingleQuote,
            })
        );
        assert_eq!(result.rest, "'oops");
    }

    #[test]
    fn unfinished_backslash() {
        let result = tokenize("echo \\");
        assert_eq!(contents(&result), ["echo"]);
        assert_matches!(
            result.unfinished_escape,
            Some(EscapeInfo {
                start: 5,
                kind: EscapeKind::Backslash,
            })
        );
        assert_eq!(result.rest, "\\");
    }

    #[test]
    fn unfinished_quote_in_mid_token_rests_at_token_start() {
        let result = tokenize("echo ab\"cd");
        assert_eq!(contents(&result), ["echo"]);
        assert_matches!(result.unfinished_escape, Some(info) if info.start == 7);
        assert_eq!(result.rest, "ab\"cd");
    }

    #[test]
    fn reopened_quote_reports_last_open_position() {
        let result = tokenize("\"a\"b\"c");
        assert_matches!(result.unfinished_escape, Some(info) if info.start == 4);
        assert_eq!(result.rest, "\"a\"b\"c");
    }

    #[test]
    fn count_stops_after_first_token() {
        let result = tokenize_at_most("ls -l -a", 1);
        assert_eq!(contents(&result), ["ls"]);
        assert_eq!(result.rest, "-l -a");
    }

    #[test]
    fn count_leaves_delimiter_unconsumed() {
        let result = tokenize_at_most("ls|grep x", 1);
        assert_eq!(contents(&result), ["ls"]);
        assert!(result.delimiters.is_empty());
        assert_eq!(result.rest, "|grep x");
    }

    #[test]
    fn count_larger_than_token_count() {
        let result = tokenize_at_most("a b", 5);
        assert_eq!(contents(&result), ["a", "b"]);
        assert_eq!(result.rest, "");
    }

    #[test]
    fn token_positions_cover_original_slices() {
        let line = "foo 'bar baz' qux";
        let result = tokenize(line);
        for token in &result.tokens {
            let end = token.end + line[token.end..].chars().next().unwrap().len_utf8();
            let slice = &line[token.start..end];
            assert!(!slice.is_empty());
            // De-quoting never grows a token.
            assert!(token.content.len() <= slice.len());
        }
    }

    #[test]
    fn multibyte_positions_are_byte_offsets() {
        let result = tokenize("héllo wörld");
        assert_eq!(contents(&result), ["héllo", "wörld"]);
        let second = &result.tokens[1];
        assert_eq!(second.start, 7);
    }
}
