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

//! ANSI escape sequences the editor emits.
//!
//! Movement builders return an empty string for a zero distance so the
//! redraw code can concatenate them unconditionally.

const CSI: &str = "\u{1b}[";

/// Moves the cursor right by `n` cells.
#[must_use]
pub fn cursor_forward(n: usize) -> String {
    if n == 0 { String::new() } else { format!("{CSI}{n}C") }
}

/// Moves the cursor left by `n` cells.
#[must_use]
pub fn cursor_backward(n: usize) -> String {
    if n == 0 { String::new() } else { format!("{CSI}{n}D") }
}

/// Moves the cursor up by `n` rows.
#[must_use]
pub fn cursor_up(n: usize) -> String {
    if n == 0 { String::new() } else { format!("{CSI}{n}A") }
}

/// Moves the cursor down by `n` rows.
#[must_use]
pub fn cursor_down(n: usize) -> String {
    if n == 0 { String::new() } else { format!("{CSI}{n}B") }
}

/// Moves the cursor up by `n` rows, to the first column.
#[must_use]
pub fn cursor_up_home(n: usize) -> String {
    if n == 0 { String::new() } else { format!("{CSI}{n}F") }
}

/// Moves the cursor down by `n` rows, to the first column.
#[must_use]
pub fn cursor_down_home(n: usize) -> String {
    if n == 0 { String::new() } else { format!("{CSI}{n}E") }
}

/// Moves the cursor to the given column (one-based).
#[must_use]
pub fn cursor_to_column(column: usize) -> String {
    format!("{CSI}{column}G")
}

/// Scrolls the screen contents up by `n` rows.
#[must_use]
pub fn scroll_up(n: usize) -> String {
    if n == 0 { String::new() } else { format!("{CSI}{n}S") }
}

/// Scrolls the screen contents down by `n` rows.
#[must_use]
pub fn scroll_down(n: usize) -> String {
    if n == 0 { String::new() } else { format!("{CSI}{n}T") }
}

/// Erases from the cursor to the end of the row.
pub const ERASE_RIGHT: &str = "\u{1b}[K";
/// Erases the row under the cursor.
pub const ERASE_ROW: &str = "\u{1b}[2K";
/// Erases the whole screen.
pub const CLEAR_SCREEN: &str = "\u{1b}[2J";
/// Moves the cursor to the top-left corner.
pub const HOME_CURSOR: &str = "\u{1b}[H";
/// Saves the cursor position.
pub const SAVE_CURSOR: &str = "\u{1b}7";
/// Restores the saved cursor position.
pub const RESTORE_CURSOR: &str = "\u{1b}8";
/// Moves the cursor down one row, scrolling at the bottom of the screen.
pub const CURSOR_DOWN_SCROLL: &str = "\u{1b}D";
/// Moves the cursor up one row, scrolling at the top of the screen.
pub const CURSOR_UP_SCROLL: &str = "\u{1b}M";
/// Asks the terminal to report the cursor location.
pub const QUERY_CURSOR: &str = "\u{1b}[6n";
/// Resets colors and attributes.
pub const RESET_COLOR: &str = "\u{1b}[0m";

/// Sets an 8-color foreground (color index 0 to 7), optionally bold.
#[must_use]
pub fn fg_color(color: u8, bold: bool) -> String {
    if bold {
        format!("{CSI}1;{}m", 30 + u32::from(color & 7))
    } else {
        format!("{CSI}{}m", 30 + u32::from(color & 7))
    }
}

/// Sets a 256-color foreground.
#[must_use]
pub fn fg_color_256(index: u8) -> String {
    format!("{CSI}38;5;{index}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_builders() {
        assert_eq!(cursor_forward(3), "\u{1b}[3C");
        assert_eq!(cursor_backward(12), "\u{1b}[12D");
        assert_eq!(cursor_up(1), "\u{1b}[1A");
        assert_eq!(cursor_down_home(2), "\u{1b}[2E");
        assert_eq!(cursor_to_column(1), "\u{1b}[1G");
        assert_eq!(scroll_up(1), "\u{1b}[1S");
    }

    #[test]
    fn zero_distance_moves_are_empty() {
        assert_eq!(cursor_forward(0), "");
        assert_eq!(cursor_backward(0), "");
        assert_eq!(cursor_up_home(0), "");
        assert_eq!(scroll_down(0), "");
    }

    #[test]
    fn colors() {
        assert_eq!(fg_color(1, false), "\u{1b}[31m");
        assert_eq!(fg_color(4, true), "\u{1b}[1;34m");
        assert_eq!(fg_color_256(178), "\u{1b}[38;5;178m");
    }
}
