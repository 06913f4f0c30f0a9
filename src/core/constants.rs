//! Shared constants for viewport and tile behavior

use std::time::Duration;

/// Smallest effective zoom factor reported to renderers
pub const MIN_ZOOM: f32 = 1.0;

/// Largest effective zoom factor reported to renderers
pub const MAX_ZOOM: f32 = 5.0;

/// Default tile edge length in pixels
pub const DEFAULT_TILE_EDGE: u32 = 256;

/// Default palette size for the pattern tile source (per axis)
pub const DEFAULT_PALETTE_SIZE: usize = 5;

/// Default capacity of the decoded-pattern memo cache
pub const DEFAULT_PATTERN_CACHE_CAPACITY: usize = 32;

/// How long the generation worker sleeps between idle polls of the queue
pub const DEFAULT_WORKER_IDLE_TICK: Duration = Duration::from_millis(25);
