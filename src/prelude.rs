//! Prelude module for common tilegrid types and traits
//!
//! Re-exports the most commonly used types, traits, and functions for easy
//! importing with `use tilegrid::prelude::*;`

pub use crate::core::{
    config::GridConfig,
    constants,
    coord::{TileCoordinate, TileRange},
    viewport::{ScrollBounds, Snapshot, Viewport},
};

pub use crate::tiles::{
    cache::CachedTileProvider,
    provider::{GridAnchor, TileProvider},
    source::{PatternSource, TileSource},
    tile::Tile,
    worker::{GenerationWorker, WorkerConfig},
};

pub use crate::{Error, Result};

pub use std::{
    sync::Arc,
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
