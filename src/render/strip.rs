//! Strip: a horizontal line of styled terminal cells.
//!
//! A `Strip` is the template primitive of cadence-tui. A widget's template
//! function produces `Vec<Strip>`, which the scheduler commits to a
//! [`Surface`](crate::render::surface::Surface). Styles are built directly by
//! widgets; there is no stylesheet cascade behind them.

// ---------------------------------------------------------------------------
// CellStyle
// ---------------------------------------------------------------------------

/// Visual style for a single terminal cell.
///
/// Colors are stored as optional strings that the terminal driver parses as
/// named colors or `#rrggbb` hex values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl CellStyle {
    /// A style with all attributes unset/false.
    pub fn new() -> Self {
        Self::default()
    }

    /// A bold variant of the default style.
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    /// A dim variant of the default style.
    pub fn dim() -> Self {
        Self {
            dim: true,
            ..Self::default()
        }
    }

    /// A reverse-video variant of the default style.
    pub fn reverse() -> Self {
        Self {
            reverse: true,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// StyledCell
// ---------------------------------------------------------------------------

/// A single terminal cell: one character with associated style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub style: CellStyle,
}

impl StyledCell {
    /// Create a new styled cell.
    pub fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }

    /// A blank (space) cell with default style.
    pub fn blank() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }

    /// A blank (space) cell with the given style.
    pub fn blank_styled(style: CellStyle) -> Self {
        Self { ch: ' ', style }
    }
}

impl Default for StyledCell {
    fn default() -> Self {
        Self::blank()
    }
}

// ---------------------------------------------------------------------------
// Strip
// ---------------------------------------------------------------------------

/// A horizontal line of styled terminal cells.
///
/// Each strip occupies one row (`y`) starting at `x_offset`. Widget templates
/// produce strips; the surface places them on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    /// The row this strip occupies (0-based from top of the element's area).
    pub y: i32,
    /// Starting x position for this strip's cells.
    pub x_offset: i32,
    /// The cells in left-to-right order.
    pub cells: Vec<StyledCell>,
}

impl Strip {
    /// Create a new empty strip at the given row and x offset.
    pub fn new(y: i32, x_offset: i32) -> Self {
        Self {
            y,
            x_offset,
            cells: Vec::new(),
        }
    }

    /// Build a single-row strip from text with one style.
    pub fn from_text(y: i32, text: &str, style: CellStyle) -> Self {
        let mut strip = Strip::new(y, 0);
        strip.push_str(text, style);
        strip
    }

    /// Push a single character with the given style.
    pub fn push(&mut self, ch: char, style: CellStyle) {
        self.cells.push(StyledCell::new(ch, style));
    }

    /// Push every character of `text` with the same style.
    pub fn push_str(&mut self, text: &str, style: CellStyle) {
        for ch in text.chars() {
            self.cells.push(StyledCell::new(ch, style.clone()));
        }
    }

    /// The width of this strip in cells.
    pub fn width(&self) -> i32 {
        self.cells.len() as i32
    }

    /// Pad the strip to exactly `width` cells using spaces with the given
    /// style. If the strip is already wider, it is truncated.
    pub fn fill(&mut self, width: i32, style: CellStyle) {
        let w = width.max(0) as usize;
        if self.cells.len() < w {
            self.cells.resize(w, StyledCell::blank_styled(style));
        } else if self.cells.len() > w {
            self.cells.truncate(w);
        }
    }

    /// The plain text content of this strip.
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.ch).collect()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
