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

//! Completion-site classification.
//!
//! Given the text before the cursor, [`classify`] determines what kind
//! of word is being completed and which part of the line it replaces.
//! The actual candidates come from the host through
//! [`CompletionProvider`](ivish_env::host::CompletionProvider); the
//! editor only mediates.

use ivish_env::host::CompletionKind;
use ivish_syntax::lex::tokenize;

/// Where and what a completion request applies to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Site {
    pub kind: CompletionKind,
    /// The partial word being completed (may be empty)
    pub pattern: String,
    /// Byte position where the pattern starts
    pub start: usize,
}

/// Result of a completion request, carried in a
/// [`Completion`](crate::editor::ReadEvent::Completion) event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Completion {
    pub site: Site,
    pub candidates: Vec<String>,
}

/// Classifies the completion site at the end of `before_cursor`.
///
/// The word under completion is the token the cursor touches; with
/// whitespace (or nothing) before the cursor a fresh empty word starts
/// there. The first word of a command segment completes as a command
/// name, a word starting with `-` as an option, anything else as a
/// path.
#[must_use]
pub fn classify(before_cursor: &str) -> Site {
    let result = tokenize(before_cursor);

    // Tokens of the segment the cursor is in
    let segment_start = result
        .delimiters
        .last()
        .map_or(0, |delimiter| delimiter.token_range.end);
    let segment_len = result.tokens.len() - segment_start;

    // The pattern: an open escape keeps its whole token in `rest`
    // rather than in `tokens`; otherwise the last token counts only if
    // nothing follows it.
    let (pattern, start, pattern_is_a_token) = if result.unfinished_escape.is_some() {
        let start = before_cursor.len() - result.rest.len();
        (result.rest.clone(), start, false)
    } else {
        match result.tokens.last() {
            Some(token) if token_touches_end(before_cursor, token.end) => {
                (token.content.clone(), token.start, true)
            }
            _ => (String::new(), before_cursor.len(), false),
        }
    };

    let preceding_words = segment_len - usize::from(pattern_is_a_token);

    let kind = if preceding_words == 0 {
        CompletionKind::Command
    } else if pattern.starts_with('-') {
        CompletionKind::CommandOption
    } else {
        CompletionKind::Path
    };

    Site {
        kind,
        pattern,
        start,
    }
}

/// Whether a token whose last character sits at `end` extends to the
/// end of the text.
fn token_touches_end(text: &str, end: usize) -> bool {
    text[end..].chars().count() == 1
}

/// The longest prefix shared by every candidate.
#[must_use]
pub fn common_prefix(candidates: &[String]) -> String {
    let Some(first) = candidates.first() else {
        return String::new();
    };
    let mut rest: Vec<_> = candidates[1..].iter().map(|c| c.chars()).collect();
    let mut prefix = String::new();
    for c in first.chars() {
        if rest.iter_mut().all(|chars| chars.next() == Some(c)) {
            prefix.push(c);
        } else {
            break;
        }
    }
    prefix
}
