use crate::core::coord::TileCoordinate;
use std::sync::Arc;

/// One tile of the grid: a coordinate plus, once generated, its pixel
/// content.
///
/// Content is shared via `Arc` so a renderer can keep painting a payload
/// that the cache has since cleared. Within the cache a tile's lifecycle
/// is: created empty when first queued, content set once by generation,
/// content cleared (not the record) when the tile leaves the tracked
/// visible range.
#[derive(Debug, Clone)]
pub struct Tile {
    pub coord: TileCoordinate,
    content: Option<Arc<Vec<u8>>>,
}

impl Tile {
    /// Creates a tile with no content yet
    pub fn empty(coord: TileCoordinate) -> Self {
        Self {
            coord,
            content: None,
        }
    }

    /// The generated pixel payload, if any
    pub fn content(&self) -> Option<&Arc<Vec<u8>>> {
        self.content.as_ref()
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Publishes generated content. Setting the same coordinate's content
    /// again is safe but unnecessary.
    pub fn set_content(&mut self, content: Arc<Vec<u8>>) {
        self.content = Some(content);
    }

    /// Drops the pixel payload, keeping the record itself
    pub fn clear_content(&mut self) {
        self.content = None;
    }
}
