//! # tilegrid
//!
//! An effectively infinite, pannable, zoomable grid of square image tiles,
//! rendered through a fixed-size viewport.
//!
//! The crate splits into two halves: viewport/grid math that turns pixel
//! pan and zoom input into a stable set of visible tile coordinates
//! (exposed to a renderer as an atomic snapshot), and a tile cache plus
//! background generation queue that produces tile content off the
//! rendering path. The actual paint loop, gesture detection and window
//! wiring are left to the embedding application.

pub mod core;
pub mod prelude;
pub mod tiles;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::GridConfig,
    coord::{TileCoordinate, TileRange},
    viewport::{ScrollBounds, Snapshot, Viewport},
};

pub use crate::tiles::{
    cache::CachedTileProvider,
    provider::{GridAnchor, TileProvider},
    source::{PatternSource, TileSource},
    tile::Tile,
    worker::GenerationWorker,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("tile generation failed for ({x},{y}): {reason}")]
    Generation { x: i32, y: i32, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
