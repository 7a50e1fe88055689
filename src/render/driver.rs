//! Crossterm terminal output backend.
//!
//! The `Driver` wraps a buffered stdout writer and provides methods for
//! entering/leaving alternate screen, painting committed strips, and
//! controlling the cursor. Color strings are parsed as named colors or
//! `#rrggbb` hex values. [`TerminalSurface`] adapts a `Driver` to the
//! [`Surface`](crate::render::surface::Surface) commit boundary.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::element::ElementId;
use crate::render::strip::{CellStyle, Strip};
use crate::render::surface::Surface;

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Terminal output backend using crossterm.
///
/// Wraps a `BufWriter<Stdout>` for efficient batched writes. The driver does
/// NOT automatically enter alternate screen on creation — call
/// `enter_alt_screen` explicitly.
pub struct Driver {
    writer: BufWriter<Stdout>,
}

impl Driver {
    /// Create a new driver wrapping stdout.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(io::stdout()),
        })
    }

    /// Enter alternate screen and enable raw mode.
    pub fn enter_alt_screen(&mut self) -> io::Result<()> {
        execute!(self.writer, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        Ok(())
    }

    /// Leave alternate screen and disable raw mode.
    pub fn leave_alt_screen(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.writer, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Clear the whole screen.
    pub fn clear(&mut self) -> io::Result<()> {
        queue!(self.writer, Clear(ClearType::All))
    }

    /// Paint a batch of strips to the terminal.
    ///
    /// For each strip, the cursor is moved to `(x_offset, y)` and the cells
    /// are printed left to right with their styles. Uses `queue!` for
    /// batching; call `flush()` afterward to send to the terminal.
    pub fn apply_strips(&mut self, strips: &[Strip]) -> io::Result<()> {
        for strip in strips {
            if strip.y < 0 {
                continue;
            }
            queue!(
                self.writer,
                cursor::MoveTo(strip.x_offset.max(0) as u16, strip.y as u16)
            )?;
            for cell in &strip.cells {
                self.apply_cell_style(&cell.style)?;
                queue!(self.writer, Print(cell.ch))?;
                queue!(self.writer, ResetColor)?;
            }
        }
        Ok(())
    }

    /// Flush the internal write buffer to the terminal.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Get the terminal size (columns, rows) via crossterm.
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Hide the cursor.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(self.writer, cursor::Hide)
    }

    /// Show the cursor.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        execute!(self.writer, cursor::Show)
    }

    /// Queue crossterm style commands for a given `CellStyle`.
    fn apply_cell_style(&mut self, style: &CellStyle) -> io::Result<()> {
        if let Some(ref fg) = style.fg {
            if let Some(color) = parse_color(fg) {
                queue!(self.writer, SetForegroundColor(color))?;
            }
        }
        if let Some(ref bg) = style.bg {
            if let Some(color) = parse_color(bg) {
                queue!(self.writer, SetBackgroundColor(color))?;
            }
        }
        if style.bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(self.writer, SetAttribute(Attribute::Dim))?;
        }
        if style.italic {
            queue!(self.writer, SetAttribute(Attribute::Italic))?;
        }
        if style.underline {
            queue!(self.writer, SetAttribute(Attribute::Underlined))?;
        }
        if style.reverse {
            queue!(self.writer, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TerminalSurface
// ---------------------------------------------------------------------------

/// A [`Surface`] that paints commits straight to a [`Driver`].
///
/// IO errors during painting are recorded rather than propagated, since the
/// commit boundary is infallible; the app shell checks `take_error` after
/// each frame.
pub struct TerminalSurface {
    driver: Driver,
    error: Option<io::Error>,
}

impl TerminalSurface {
    /// Wrap a driver as a commit surface.
    pub fn new(driver: Driver) -> Self {
        Self { driver, error: None }
    }

    /// Take the first IO error recorded since the last call, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Access the underlying driver.
    pub fn driver_mut(&mut self) -> &mut Driver {
        &mut self.driver
    }

    /// Consume the surface, returning the driver.
    pub fn into_driver(self) -> Driver {
        self.driver
    }
}

impl Surface for TerminalSurface {
    fn commit(&mut self, _id: ElementId, strips: Vec<Strip>, _context: ElementId) {
        let result = self
            .driver
            .apply_strips(&strips)
            .and_then(|_| self.driver.flush());
        if let Err(err) = result {
            if self.error.is_none() {
                self.error = Some(err);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Color parsing
// ---------------------------------------------------------------------------

/// Parse a color string into a crossterm `Color`.
///
/// Supports:
/// - Hex colors: `#rrggbb` or `#rgb`
/// - Named colors: `black`, `red`, `green`, `yellow`, `blue`, `magenta`,
///   `cyan`, `white`, the `dark_*` variants, and `grey`/`gray`
///
/// Returns `None` if the color string cannot be parsed.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();

    // Hex color
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    // Named colors (case-insensitive)
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "dark_red" | "darkred" => Some(Color::DarkRed),
        "dark_green" | "darkgreen" => Some(Color::DarkGreen),
        "dark_yellow" | "darkyellow" => Some(Color::DarkYellow),
        "dark_blue" | "darkblue" => Some(Color::DarkBlue),
        "dark_magenta" | "darkmagenta" => Some(Color::DarkMagenta),
        "dark_cyan" | "darkcyan" => Some(Color::DarkCyan),
        "dark_grey" | "dark_gray" | "darkgrey" | "darkgray" => Some(Color::DarkGrey),
        "grey" | "gray" => Some(Color::Grey),
        _ => None,
    }
}

/// Parse a hex color string (without the leading `#`).
///
/// Supports 6-digit (`rrggbb`) and 3-digit (`rgb`) formats.
fn parse_hex_color(hex: &str) -> Option<Color> {
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb { r, g, b })
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            // Expand: 0xA -> 0xAA
            Some(Color::Rgb {
                r: r * 16 + r,
                g: g * 16 + g,
                b: b * 16 + b,
            })
        }
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
