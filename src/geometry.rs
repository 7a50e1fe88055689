//! Core geometry: the cell-grid `Size`.
//!
//! Used for sizing widgets and reporting viewport dimensions. Layout itself
//! is an external concern; this type only describes the space a widget has
//! been given.

/// A 2D size in terminal cells (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

// ===========================================================================
// Tests
// ===========================================================================
