//! Snapshot rendering helpers.
//!
//! Functions for converting committed strips into plain-text strings
//! suitable for snapshot testing and assertions.

use crate::render::strip::Strip;
use crate::widget::traits::Renderable;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render a widget's current template to a plain text string.
///
/// Each row becomes one line in the output, with trailing spaces trimmed.
/// A widget with no output renders as the empty string.
pub fn render_to_string(widget: &dyn Renderable, width: i32, height: i32) -> String {
    match widget.template() {
        Some(strips) => strips_to_string(&strips, width, height),
        None => String::new(),
    }
}

/// Convert raw strips to a plain text string.
///
/// Builds a `width` x `height` grid of spaces, then overlays each strip's
/// cells at the appropriate (x, y) positions. Each row is right-trimmed of
/// spaces, and rows are joined with `'\n'`.
pub fn strips_to_string(strips: &[Strip], width: i32, height: i32) -> String {
    if width <= 0 || height <= 0 {
        return String::new();
    }

    let w = width as usize;
    let h = height as usize;
    let mut grid = vec![vec![' '; w]; h];

    for strip in strips {
        if strip.y < 0 || strip.y as usize >= h {
            continue;
        }
        let row = &mut grid[strip.y as usize];
        for (i, cell) in strip.cells.iter().enumerate() {
            let x = strip.x_offset + i as i32;
            if x < 0 || x as usize >= w {
                continue;
            }
            row[x as usize] = cell.ch;
        }
    }

    grid.iter()
        .map(|row| row.iter().collect::<String>().trim_end().to_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================
