//! Configuration for viewport geometry and tile generation behavior
//!
//! A single flat struct rather than a preset hierarchy: the grid engine has
//! few enough knobs that presets would only obscure them.

use crate::core::constants::{
    DEFAULT_PALETTE_SIZE, DEFAULT_PATTERN_CACHE_CAPACITY, DEFAULT_TILE_EDGE,
    DEFAULT_WORKER_IDLE_TICK,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable options for a tile grid instance.
///
/// Deserializable so embedders can load it from settings files. A
/// `scroll_bounds` descriptor that does not have exactly four elements is
/// treated as a non-fatal configuration error and discarded with a
/// diagnostic when the viewport is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Viewport width in pixels
    pub screen_w: u32,
    /// Viewport height in pixels
    pub screen_h: u32,
    /// Edge length of one square tile in pixels
    pub tile_edge: u32,
    /// Optional `[left, top, right, bottom]` tile-id scroll limits; each
    /// element independently optional
    pub scroll_bounds: Option<Vec<Option<i32>>>,
    /// How long the generation worker waits between idle queue polls
    pub worker_idle_tick: Duration,
    /// Palette size per axis for the built-in pattern source
    pub palette_size: usize,
    /// Capacity of the rendered-pattern memo cache
    pub pattern_cache_capacity: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            screen_w: 800,
            screen_h: 600,
            tile_edge: DEFAULT_TILE_EDGE,
            scroll_bounds: None,
            worker_idle_tick: DEFAULT_WORKER_IDLE_TICK,
            palette_size: DEFAULT_PALETTE_SIZE,
            pattern_cache_capacity: DEFAULT_PATTERN_CACHE_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_usable() {
        let config = GridConfig::default();
        assert!(config.tile_edge > 0);
        assert!(config.palette_size > 0);
        assert!(config.scroll_bounds.is_none());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = GridConfig {
            scroll_bounds: Some(vec![Some(0), None, Some(50), None]),
            ..GridConfig::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: GridConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
