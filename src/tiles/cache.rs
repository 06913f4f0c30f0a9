use crate::core::coord::{TileCoordinate, TileRange};
use crate::prelude::HashMap;
use crate::tiles::provider::{GridAnchor, TileProvider};
use crate::tiles::source::TileSource;
use crate::tiles::tile::Tile;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Reference [`TileProvider`] strategy: a coordinate-keyed tile cache plus
/// a FIFO queue of coordinates awaiting generation.
///
/// The foreground thread reconciles both on every visible-range change
/// ([`TileProvider::on_visible_range_changed`]); a single background
/// worker drains the queue one coordinate per call
/// ([`TileProvider::generate_next_pending`]). Eviction clears tile content
/// only, never cache keys, so bookkeeping grows with the extent of
/// navigation rather than with time.
///
/// The cache and the queue are guarded by independent locks. The queue
/// lock serializes "clear + rebuild" against "pop one", making a rebuild
/// mid-drain atomic with respect to any single pop.
pub struct CachedTileProvider<S: TileSource> {
    source: S,
    anchor: GridAnchor,
    cache: Mutex<HashMap<TileCoordinate, Tile>>,
    queue: Mutex<VecDeque<TileCoordinate>>,
}

impl<S: TileSource> CachedTileProvider<S> {
    pub fn new(source: S) -> Self {
        Self::with_anchor(source, GridAnchor::NorthWest)
    }

    pub fn with_anchor(source: S, anchor: GridAnchor) -> Self {
        Self {
            source,
            anchor,
            cache: Mutex::new(HashMap::default()),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    fn cache_lock(&self) -> MutexGuard<'_, HashMap<TileCoordinate, Tile>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn queue_lock(&self) -> MutexGuard<'_, VecDeque<TileCoordinate>> {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of coordinates ever cached (records are never removed)
    pub fn cached_count(&self) -> usize {
        self.cache_lock().len()
    }

    /// Number of coordinates currently awaiting generation
    pub fn pending_count(&self) -> usize {
        self.queue_lock().len()
    }

    /// Current queue contents, in drain order
    pub fn pending_coords(&self) -> Vec<TileCoordinate> {
        self.queue_lock().iter().copied().collect()
    }
}

impl<S: TileSource> TileProvider for CachedTileProvider<S> {
    fn tile_edge_length(&self) -> u32 {
        self.source.tile_edge_length()
    }

    fn get_tile(&self, coord: TileCoordinate) -> Option<Tile> {
        // Never generate here; that would hold up the foreground thread.
        // Missing tiles are queued by on_visible_range_changed and filled
        // in by the worker.
        self.cache_lock().get(&coord).cloned()
    }

    fn grid_anchor(&self) -> GridAnchor {
        self.anchor
    }

    fn on_visible_range_changed(&self, new_range: TileRange) {
        let mut missing = Vec::new();
        let mut evicted = 0usize;

        {
            let mut cache = self.cache_lock();

            // Clear pixel payloads of anything that scrolled out of range,
            // keeping the records themselves.
            for tile in cache.values_mut() {
                if tile.has_content() && !new_range.contains(tile.coord) {
                    tile.clear_content();
                    evicted += 1;
                }
            }

            // Everything in range without content gets (re)generated; seed
            // an empty record so renderers see "requested, not ready".
            for coord in new_range.iter() {
                let tile = cache.entry(coord).or_insert_with(|| Tile::empty(coord));
                if !tile.has_content() {
                    missing.push(coord);
                }
            }
        }

        let queued = missing.len();
        {
            // Wholesale replacement: whatever the previous range queued is
            // superseded, and the swap is atomic w.r.t. any single pop.
            let mut queue = self.queue_lock();
            queue.clear();
            queue.extend(missing);
        }

        log::debug!(
            "range changed to {new_range:?}: queued {queued}, evicted {evicted} payloads"
        );
    }

    fn generate_next_pending(&self) {
        let coord = match self.queue_lock().pop_front() {
            Some(coord) => coord,
            None => return,
        };

        // Already satisfied by an earlier pass over the same coordinate
        if self
            .cache_lock()
            .get(&coord)
            .is_some_and(|tile| tile.has_content())
        {
            return;
        }

        // Unbounded duration is fine here; no lock is held and only the
        // single worker thread ever reaches this point.
        match self.source.generate(coord) {
            Ok(content) => {
                let mut cache = self.cache_lock();
                let tile = cache.entry(coord).or_insert_with(|| Tile::empty(coord));
                tile.set_content(content);
                log::debug!("generated tile ({},{})", coord.x, coord.y);
            }
            Err(e) => {
                // Non-fatal: the tile stays empty and is only retried if a
                // later range change queues it again.
                log::warn!("tile ({},{}) generation failed: {e}", coord.x, coord.y);
            }
        }
    }

    fn debug_summary(&self) -> String {
        format!(
            "CachedTileProvider[cache={},queue={}]",
            self.cached_count(),
            self.pending_count()
        )
    }
}
