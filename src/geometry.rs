//! Core geometry types: Offset, Size, Region, Padding, Pack.
//!
//! All layout math in cellwin is integer and cell-based. Coordinates are
//! absolute screen cells; `Region`s are half-open on the right and bottom.

use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Offset
// ---------------------------------------------------------------------------

/// A 2D position or displacement in terminal cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    /// Create a new offset.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Build an offset from pack-relative components.
    #[inline]
    pub const fn from_axes(pack: Pack, along: i32, across: i32) -> Offset {
        match pack {
            Pack::Horizontal => Offset { x: along, y: across },
            Pack::Vertical => Offset { x: across, y: along },
        }
    }
}

impl Add for Offset {
    type Output = Offset;
    #[inline]
    fn add(self, rhs: Offset) -> Offset {
        Offset { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Offset {
    type Output = Offset;
    #[inline]
    fn sub(self, rhs: Offset) -> Offset {
        Offset { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A 2D size in terminal cells (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0, height: 0 };

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Size) -> Size {
        Size {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Extent along the given pack axis.
    #[inline]
    pub const fn along(self, pack: Pack) -> i32 {
        match pack {
            Pack::Horizontal => self.width,
            Pack::Vertical => self.height,
        }
    }

    /// Extent across the given pack axis.
    #[inline]
    pub const fn across(self, pack: Pack) -> i32 {
        match pack {
            Pack::Horizontal => self.height,
            Pack::Vertical => self.width,
        }
    }

    /// Build a size from pack-relative extents.
    #[inline]
    pub const fn from_axes(pack: Pack, along: i32, across: i32) -> Size {
        match pack {
            Pack::Horizontal => Size { width: along, height: across },
            Pack::Vertical => Size { width: across, height: along },
        }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A rectangular region in terminal cells defined by position and size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// An empty region at the origin.
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    /// Create a new region.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a region from a position and a size.
    #[inline]
    pub const fn from_parts(offset: Offset, size: Size) -> Self {
        Self { x: offset.x, y: offset.y, width: size.width, height: size.height }
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// The top-left corner as an [`Offset`].
    #[inline]
    pub const fn offset(self) -> Offset {
        Offset { x: self.x, y: self.y }
    }

    /// The dimensions as a [`Size`].
    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Whether the region has no area.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the point (x, y) lies inside this region.
    #[inline]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` is entirely contained within this region.
    #[inline]
    pub const fn contains_region(self, other: Region) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Compute the intersection of two regions.
    ///
    /// Returns [`Region::EMPTY`] if the regions do not overlap.
    #[inline]
    pub const fn intersection(self, other: Region) -> Region {
        let x1 = if self.x > other.x { self.x } else { other.x };
        let y1 = if self.y > other.y { self.y } else { other.y };

        let sr = self.right();
        let or = other.right();
        let x2 = if sr < or { sr } else { or };

        let sb = self.bottom();
        let ob = other.bottom();
        let y2 = if sb < ob { sb } else { ob };

        let w = x2 - x1;
        let h = y2 - y1;

        if w <= 0 || h <= 0 {
            Region::EMPTY
        } else {
            Region { x: x1, y: y1, width: w, height: h }
        }
    }

    /// Contract the region inward by the given [`Padding`] on every side.
    ///
    /// Width and height are clamped to zero.
    #[inline]
    pub const fn shrink(self, padding: Padding) -> Region {
        let w = self.width - 2 * padding.x;
        let h = self.height - 2 * padding.y;
        Region {
            x: self.x + padding.x,
            y: self.y + padding.y,
            width: if w > 0 { w } else { 0 },
            height: if h > 0 { h } else { 0 },
        }
    }
}

// ---------------------------------------------------------------------------
// Padding
// ---------------------------------------------------------------------------

/// Symmetric inner margin: `x` cells on the left and right, `y` on top and bottom.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Padding {
    pub x: i32,
    pub y: i32,
}

impl Padding {
    /// No padding.
    pub const ZERO: Padding = Padding { x: 0, y: 0 };

    /// Create a new padding, clamping negative values to zero.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x: if x > 0 { x } else { 0 },
            y: if y > 0 { y } else { 0 },
        }
    }

    /// Padding along one side of the given pack axis.
    #[inline]
    pub const fn along(self, pack: Pack) -> i32 {
        match pack {
            Pack::Horizontal => self.x,
            Pack::Vertical => self.y,
        }
    }

    /// Padding along one side of the cross axis.
    #[inline]
    pub const fn across(self, pack: Pack) -> i32 {
        match pack {
            Pack::Horizontal => self.y,
            Pack::Vertical => self.x,
        }
    }
}

// ---------------------------------------------------------------------------
// Pack
// ---------------------------------------------------------------------------

/// Direction in which a container stacks its children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Pack {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

// ===========================================================================
// Tests
// ===========================================================================
