use serde::{Deserialize, Serialize};

/// Integer grid position of a single tile.
///
/// The grid is unbounded in every direction, so both components may be
/// negative. Identity is value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoordinate {
    pub x: i32,
    pub y: i32,
}

impl TileCoordinate {
    /// Creates a new tile coordinate
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for TileCoordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A rectangular span of tile coordinates with inclusive bounds.
///
/// Represents the set of tile coordinates currently of interest, e.g. the
/// tiles overlapping the viewport. Invariant: `left <= right` and
/// `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRange {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TileRange {
    /// Creates a new range; panics in debug builds if the bounds are inverted
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        debug_assert!(left <= right, "inverted horizontal bounds");
        debug_assert!(top <= bottom, "inverted vertical bounds");
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether the given coordinate falls inside this range
    pub fn contains(&self, coord: TileCoordinate) -> bool {
        coord.x >= self.left && coord.x <= self.right && coord.y >= self.top && coord.y <= self.bottom
    }

    /// Number of tile columns spanned
    pub fn width(&self) -> u32 {
        (self.right - self.left + 1) as u32
    }

    /// Number of tile rows spanned
    pub fn height(&self) -> u32 {
        (self.bottom - self.top + 1) as u32
    }

    /// Total number of coordinates in the range
    pub fn count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Iterates the range row-major: top row first, left to right
    pub fn iter(&self) -> impl Iterator<Item = TileCoordinate> + '_ {
        let range = *self;
        (range.top..=range.bottom)
            .flat_map(move |y| (range.left..=range.right).map(move |x| TileCoordinate::new(x, y)))
    }
}
