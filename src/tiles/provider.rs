use crate::core::coord::{TileCoordinate, TileRange};
use crate::tiles::tile::Tile;
use serde::{Deserialize, Serialize};

/// Which position of the infinite grid is treated as the coordinate
/// origin when mapping tiles to screen positions. A layout concern for
/// the renderer; the grid math itself is anchor-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridAnchor {
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl GridAnchor {
    /// Pixel position of tile (0,0)'s own anchor corner within a screen of
    /// the given size, e.g. `SouthEast` puts the origin tile in the
    /// bottom-right corner.
    pub fn origin_px(&self, screen_w: u32, screen_h: u32, tile_edge: u32) -> (i32, i32) {
        let max_x = screen_w.saturating_sub(tile_edge) as i32;
        let max_y = screen_h.saturating_sub(tile_edge) as i32;
        let mid_x = max_x / 2;
        let mid_y = max_y / 2;

        match self {
            GridAnchor::NorthWest => (0, 0),
            GridAnchor::North => (mid_x, 0),
            GridAnchor::NorthEast => (max_x, 0),
            GridAnchor::West => (0, mid_y),
            GridAnchor::Center => (mid_x, mid_y),
            GridAnchor::East => (max_x, mid_y),
            GridAnchor::SouthWest => (0, max_y),
            GridAnchor::South => (mid_x, max_y),
            GridAnchor::SouthEast => (max_x, max_y),
        }
    }
}

/// The polymorphic tile-source boundary.
///
/// Implementations split their work into a non-blocking read path
/// ([`TileProvider::get_tile`]) used by renderers, and a blocking
/// generation path ([`TileProvider::generate_next_pending`]) driven from a
/// single background worker. Static palettes, procedural generators and
/// remote fetchers all fit behind this trait.
pub trait TileProvider: Send + Sync {
    /// Fixed pixel edge length of every tile this provider produces
    fn tile_edge_length(&self) -> u32;

    /// Current cached tile for `coord`, possibly still without content, or
    /// `None` if the coordinate was never requested. Never performs
    /// generation work inline.
    fn get_tile(&self, coord: TileCoordinate) -> Option<Tile>;

    /// Which grid position is the logical origin
    fn grid_anchor(&self) -> GridAnchor {
        GridAnchor::NorthWest
    }

    /// Foreground-thread callback for a visible-range change.
    ///
    /// Implementations must clear cached content for tiles now outside
    /// `new_range` and rebuild the pending-work queue to exactly the
    /// in-range coordinates lacking content. Each call fully supersedes
    /// work queued by the previous call, so rapid repetition during a fast
    /// swipe is safe.
    fn on_visible_range_changed(&self, new_range: TileRange);

    /// Pops one coordinate off the pending queue and generates its
    /// content. A no-op when the queue is empty or the popped entry was
    /// already satisfied. May take arbitrarily long; must only ever be
    /// called off the foreground thread, from a single worker.
    fn generate_next_pending(&self);

    /// One-line cache/queue statistics for diagnostic overlays
    fn debug_summary(&self) -> String;
}
