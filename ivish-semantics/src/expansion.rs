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

//! Alias expansion.
//!
//! A command line is translated segment by segment, where segments are
//! the stretches between `|`, `|&` and `;` delimiters (re-inserted
//! verbatim). In each segment only the first word is alias-eligible; a
//! replacement ending in whitespace makes the following word eligible
//! too, which is the familiar rule that lets `alias sudo='sudo '` chain.
//!
//! Expansion is recursive with a per-segment visited set, so alias
//! graphs with cycles terminate after each name has been substituted
//! once.

use ivish_syntax::alias::AliasSet;
use ivish_syntax::lex::{tokenize, tokenize_at_most};
use std::collections::HashSet;

/// Translates a command line.
///
/// Returns `Some(translated)` iff any segment was translated, `None`
/// when the line has no alias to expand.
#[must_use]
pub fn translate(aliases: &AliasSet, line: &str) -> Option<String> {
    if aliases.is_empty() {
        return None;
    }

    let result = tokenize(line);
    let mut out = String::new();
    let mut any = false;
    let mut start = 0;

    for delimiter in &result.delimiters {
        push_segment(aliases, &line[start..delimiter.position], &mut out, &mut any);
        out += delimiter.kind.literal();
        start = delimiter.end();
    }
    push_segment(aliases, &line[start..], &mut out, &mut any);

    any.then_some(out)
}

fn push_segment(aliases: &AliasSet, segment: &str, out: &mut String, any: &mut bool) {
    let mut visited = HashSet::new();
    match translate_segment(aliases, segment, &mut visited) {
        Some(translated) => {
            *out += &translated;
            *any = true;
        }
        None => *out += segment,
    }
}

/// Translates one delimiter-free segment.
///
/// The segment's first token is looked up in the alias set. On a match
/// the replacement is recursively translated as a segment of its own,
/// sharing the visited set so a name is never substituted twice. The
/// rest of the segment is appended unchanged, except that a replacement
/// with a trailing whitespace chains a fresh translation of the rest
/// when this segment is the outermost one.
fn translate_segment(
    aliases: &AliasSet,
    segment: &str,
    visited: &mut HashSet<String>,
) -> Option<String> {
    let result = tokenize_at_most(segment, 1);
    let first = result.tokens.first()?;
    let name = &first.content;

    let entry = aliases.get(name.as_str())?;
    if visited.contains(name) {
        return None;
    }
    let was_outermost = visited.is_empty();
    visited.insert(name.clone());

    // The rest of the segment, starting at the character that ended the
    // first token (usually the separating whitespace).
    let token_end = first.end + segment[first.end..].chars().next().map_or(0, char::len_utf8);
    let rest = &segment[token_end..];

    let replacement = &entry.0.replacement;
    let expanded = translate_segment(aliases, replacement, visited)
        .unwrap_or_else(|| replacement.clone());

    let mut out = segment[..first.start].to_owned();
    out += &expanded;
    let chains = was_outermost
        && replacement
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
    if chains {
        let tail = rest.trim_start();
        let mut fresh = HashSet::new();
        match translate_segment(aliases, tail, &mut fresh) {
            Some(translated) => out += &translated,
            None => out += tail,
        }
    } else {
        out += rest;
    }
    Some(out)
}
