use alloc::string::String;
use core::fmt::{self, Write as _};

use crate::*;

impl Game {
    /// Plain-text board, one row per `y` under a header of column indices.
    ///
    /// `show_mines` uncovers every mine that is still hidden.
    pub fn render(&self, show_mines: bool) -> String {
        let mut s = String::new();
        // writing into a String cannot fail
        let _ = self.write_board(&mut s, show_mines);
        s
    }

    fn write_board(&self, out: &mut impl fmt::Write, show_mines: bool) -> fmt::Result {
        let (width, height) = self.size();
        // widest index on each axis, never narrower than two columns
        let label_w = digits(height.saturating_sub(1)).max(2);
        let col_w = digits(width.saturating_sub(1)).max(2);

        write!(out, "{:label_w$}  ", "")?;
        for x in 0..width {
            write!(out, "{:>col_w$} ", x)?;
        }
        out.write_char('\n')?;
        write!(out, "{:label_w$} ", "")?;
        for _ in 0..(col_w + 1) * usize::from(width) + 1 {
            out.write_char('-')?;
        }
        out.write_char('\n')?;

        for y in 0..height {
            write!(out, "{:>label_w$} |", y)?;
            for x in 0..width {
                let coords = (x, y);
                let glyph = match self.cell_at(coords) {
                    Cell::Exploded => '*',
                    _ if show_mines && self.has_mine_at(coords) => '*',
                    Cell::Unknown => '.',
                    Cell::Flagged => 'F',
                    Cell::Revealed(0) => ' ',
                    Cell::Revealed(count) => char::from(b'0' + count),
                };
                write!(out, " {:>glyph_w$} ", glyph, glyph_w = col_w - 1)?;
            }
            out.write_char('\n')?;
        }
        Ok(())
    }
}

fn digits(n: Coord) -> usize {
    n.checked_ilog10().map_or(1, |log| log as usize + 1)
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_board(f, false)
    }
}
