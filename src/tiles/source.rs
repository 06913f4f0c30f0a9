use crate::core::config::GridConfig;
use crate::core::coord::TileCoordinate;
use crate::{Error, Result};
use lru::LruCache;
use once_cell::sync::Lazy;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// The decode/compute primitive behind a cached provider: produces the
/// pixel content for one tile.
///
/// Implementations may take arbitrarily long; they are only ever invoked
/// from the background generation path. A failure is non-fatal: the tile
/// stays empty and is retried only if a later range change re-queues it.
pub trait TileSource: Send + Sync {
    /// Fixed pixel edge length of generated tiles
    fn tile_edge_length(&self) -> u32;

    /// Produce the RGBA pixel payload (`edge * edge * 4` bytes) for `coord`
    fn generate(&self, coord: TileCoordinate) -> Result<Arc<Vec<u8>>>;
}

/// Base color ramp shared by all pattern sources. Built once; palette
/// indices wrap around it.
static BASE_COLORS: Lazy<Vec<[u8; 3]>> = Lazy::new(|| {
    (0..12)
        .map(|i| {
            // Coarse hue sweep, kept away from full black/white so the
            // border stroke stays visible.
            let phase = i as f32 / 12.0 * std::f32::consts::TAU;
            let channel = |shift: f32| (140.0 + 100.0 * (phase + shift).sin()) as u8;
            [
                channel(0.0),
                channel(std::f32::consts::TAU / 3.0),
                channel(2.0 * std::f32::consts::TAU / 3.0),
            ]
        })
        .collect()
});

/// Maps `id` into `0..n` with explicit normalization, so negative tile ids
/// index the palette the same way on every platform's remainder semantics.
pub(crate) fn palette_index(id: i32, n: usize) -> usize {
    let n = n as i32;
    (((id % n) + n) % n) as usize
}

/// Procedural tile source mapping each coordinate onto a small fixed
/// palette of pattern bitmaps.
///
/// Each axis independently selects a palette row/column via
/// `((id % n) + n) % n`; the selected pattern is rendered once and
/// memoized, so every tile mapping to it reuses the same pixels. This is
/// the reference generation policy, not a mandate; any [`TileSource`]
/// satisfying the timing contract works.
pub struct PatternSource {
    tile_edge: u32,
    palette_size: usize,
    patterns: Mutex<LruCache<(usize, usize), Arc<Vec<u8>>>>,
}

impl PatternSource {
    pub fn new(tile_edge: u32, palette_size: usize, cache_capacity: usize) -> Result<Self> {
        if tile_edge == 0 {
            return Err(Error::InvalidConfig("tile edge length must be > 0".into()));
        }
        if palette_size == 0 {
            return Err(Error::InvalidConfig("palette size must be > 0".into()));
        }
        let capacity = NonZeroUsize::new(cache_capacity)
            .ok_or_else(|| Error::InvalidConfig("pattern cache capacity must be > 0".into()))?;

        Ok(Self {
            tile_edge,
            palette_size,
            patterns: Mutex::new(LruCache::new(capacity)),
        })
    }

    pub fn from_config(config: &GridConfig) -> Result<Self> {
        Self::new(
            config.tile_edge,
            config.palette_size,
            config.pattern_cache_capacity,
        )
    }

    /// Renders the pattern bitmap for one palette cell: a flat fill with a
    /// darker border and a diagonal accent, visually distinct per cell.
    fn render_pattern(&self, row: usize, col: usize) -> Vec<u8> {
        let edge = self.tile_edge as usize;
        let color = BASE_COLORS[(row * 7 + col) % BASE_COLORS.len()];
        let border = [color[0] / 2, color[1] / 2, color[2] / 2];

        let mut pixels = vec![0u8; edge * edge * 4];
        for y in 0..edge {
            for x in 0..edge {
                let on_border = x == 0 || y == 0 || x == edge - 1 || y == edge - 1;
                // Accent phase depends on the cell indices, so every
                // palette cell is visually distinct even when two cells
                // share a base color.
                let on_accent = (x + y + row * 2 + col * 3) % (edge / 2 + 1) == 0;
                let rgb = if on_border || on_accent { border } else { color };

                let i = (y * edge + x) * 4;
                pixels[i..i + 3].copy_from_slice(&rgb);
                pixels[i + 3] = 0xff;
            }
        }
        pixels
    }
}

impl TileSource for PatternSource {
    fn tile_edge_length(&self) -> u32 {
        self.tile_edge
    }

    fn generate(&self, coord: TileCoordinate) -> Result<Arc<Vec<u8>>> {
        let col = palette_index(coord.x, self.palette_size);
        let row = palette_index(coord.y, self.palette_size);

        let mut patterns = self
            .patterns
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(pattern) = patterns.get(&(row, col)) {
            return Ok(Arc::clone(pattern));
        }

        let pattern = Arc::new(self.render_pattern(row, col));
        log::debug!("rendered palette pattern ({row},{col})");
        patterns.put((row, col), Arc::clone(&pattern));
        Ok(pattern)
    }
}
