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

//! Defining aliases.
//!
//! This module provides the data structures for alias definitions shared
//! between the expansion engine and the `alias`/`unalias` built-ins.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::hash::Hasher;
use std::rc::Rc;
use thiserror::Error;

/// Name-value pair that defines an alias.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alias {
    /// Name that is matched against the first word of a command segment
    pub name: String,
    /// String that substitutes the name when it matches
    pub replacement: String,
}

/// Wrapper of [`Alias`] for inserting into a hash set.
///
/// A `HashEntry` wraps an `Alias` in `Rc` so that the definition can be
/// referred to even after it is removed from the set. The `Hash` and
/// `PartialEq` implementations compare only names, so inserting an entry
/// with an existing name replaces the old definition.
#[derive(Clone, Debug, Eq)]
pub struct HashEntry(pub Rc<Alias>);

impl HashEntry {
    /// Convenience method for creating a new alias definition as `HashEntry`
    pub fn new<N: Into<String>, R: Into<String>>(name: N, replacement: R) -> HashEntry {
        HashEntry(Rc::new(Alias {
            name: name.into(),
            replacement: replacement.into(),
        }))
    }
}

impl PartialEq for HashEntry {
    fn eq(&self, other: &HashEntry) -> bool {
        self.0.name == other.0.name
    }
}

impl Hash for HashEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state)
    }
}

impl Borrow<str> for HashEntry {
    fn borrow(&self) -> &str {
        &self.0.name
    }
}

/// Collection of aliases.
pub type AliasSet = HashSet<HashEntry>;

/// Characters that must not appear in an alias name.
///
/// These are the shell break characters, the quoting characters, the
/// expansion characters and the path separator.
pub const ILLEGAL_NAME_CHARS: &str = "()<>;&| \t\n\"'`\\$/";

/// Error returned for a name that contains an illegal character.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("'{name}': invalid alias name")]
pub struct InvalidName {
    pub name: String,
}

/// Checks whether a string can be used as an alias name.
///
/// A valid name is non-empty and contains none of
/// [`ILLEGAL_NAME_CHARS`].
pub fn validate_name(name: &str) -> Result<(), InvalidName> {
    if !name.is_empty() && !name.contains(|c| ILLEGAL_NAME_CHARS.contains(c)) {
        Ok(())
    } else {
        Err(InvalidName {
            name: name.to_owned(),
        })
    }
}

/// Splits a textual `name=value` definition.
///
/// The split happens at the first `=`. If the `=` is missing, at index
/// zero, or followed by nothing, the whole word is returned as the name
/// with no value.
#[must_use]
pub fn split_definition(word: &str) -> (&str, Option<&str>) {
    match word.find('=') {
        Some(index) if index > 0 && index + 1 < word.len() => {
            (&word[..index], Some(&word[index + 1..]))
        }
        _ => (word, None),
    }
}
