use crate::core::config::GridConfig;
use crate::core::constants::{MAX_ZOOM, MIN_ZOOM};
use crate::core::coord::TileRange;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// Per-side scroll limits, expressed as tile ids.
///
/// Each side is independently optional; `None` means the grid is unbounded
/// on that side. Clamping is evaluated against the visible tile-id range,
/// not the pixel offset, so it composes with zoom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollBounds {
    pub left: Option<i32>,
    pub top: Option<i32>,
    pub right: Option<i32>,
    pub bottom: Option<i32>,
}

impl ScrollBounds {
    pub fn new(
        left: Option<i32>,
        top: Option<i32>,
        right: Option<i32>,
        bottom: Option<i32>,
    ) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Parses a four-element `[left, top, right, bottom]` descriptor.
    ///
    /// A descriptor of any other length is a non-fatal configuration error:
    /// it is discarded with a diagnostic and the viewport proceeds
    /// unconstrained.
    pub fn from_descriptor(descriptor: &[Option<i32>]) -> Option<Self> {
        if descriptor.len() != 4 {
            log::warn!(
                "scroll bounds descriptor has {} elements, must be 4 - ignoring",
                descriptor.len()
            );
            return None;
        }
        Some(Self::new(
            descriptor[0],
            descriptor[1],
            descriptor[2],
            descriptor[3],
        ))
    }
}

/// Immutable copy of the viewport state needed to render one frame.
///
/// A renderer takes a snapshot at the start of a paint pass instead of
/// holding the viewport lock across it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Pixel pan offset of the grid surface
    pub surface_offset_x: i32,
    pub surface_offset_y: i32,
    /// Where to begin painting the first visible tile, always in
    /// `(-tile_edge, 0]`
    pub canvas_offset_x: i32,
    pub canvas_offset_y: i32,
    /// Tiles currently overlapping the viewport
    pub visible_range: TileRange,
    /// Effective zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub zoom: f32,
}

/// The owned, mutable viewport state. Lives behind the [`Viewport`] lock
/// and is never exposed directly.
#[derive(Debug)]
struct ViewState {
    tile_edge: i32,
    tiles_horiz: i32,
    tiles_vert: i32,
    bounds: Option<ScrollBounds>,
    surface_offset_x: i32,
    surface_offset_y: i32,
    canvas_offset_x: i32,
    canvas_offset_y: i32,
    /// Running product of all zoom factors ever applied. Deliberately
    /// unclamped; only values handed outward are clamped to
    /// `[MIN_ZOOM, MAX_ZOOM]`.
    zoom_accumulator: f32,
    visible_range: TileRange,
}

impl ViewState {
    /// Tile-id span for one axis: start at `-(offset / tile_edge)`, one
    /// tile earlier when a strictly positive remainder exposes a partial
    /// tile, then `num_tiles` wide.
    fn axis_span(&self, offset_px: i32, num_tiles: i32) -> (i32, i32) {
        let mut start = -(offset_px / self.tile_edge);
        if offset_px % self.tile_edge > 0 {
            start -= 1;
        }
        (start, start + num_tiles - 1)
    }

    fn apply_offset(&mut self, mut offset_x: i32, mut offset_y: i32) -> bool {
        let mut range_horiz = self.axis_span(offset_x, self.tiles_horiz);
        let mut range_vert = self.axis_span(offset_y, self.tiles_vert);

        if let Some(bounds) = self.bounds {
            // Check the axes independently, so that a diagonal swipe which
            // hits a boundary on one axis still scrolls on the other.
            let horiz_out = bounds.left.is_some_and(|b| range_horiz.0 < b)
                || bounds.right.is_some_and(|b| range_horiz.1 > b);
            if horiz_out {
                range_horiz = (self.visible_range.left, self.visible_range.right);
                offset_x = self.surface_offset_x;
            }

            let vert_out = bounds.top.is_some_and(|b| range_vert.0 < b)
                || bounds.bottom.is_some_and(|b| range_vert.1 > b);
            if vert_out {
                range_vert = (self.visible_range.top, self.visible_range.bottom);
                offset_y = self.surface_offset_y;
            }
        }

        let new_range = TileRange::new(range_horiz.0, range_vert.0, range_horiz.1, range_vert.1);
        let range_changed = new_range != self.visible_range;
        self.visible_range = new_range;

        self.surface_offset_x = offset_x;
        self.surface_offset_y = offset_y;

        // The range already starts one tile early whenever a positive
        // remainder exposes a partial tile, so shift the draw origin back
        // by a full tile in that case.
        self.canvas_offset_x = offset_x % self.tile_edge;
        self.canvas_offset_y = offset_y % self.tile_edge;
        if self.canvas_offset_x > 0 {
            self.canvas_offset_x -= self.tile_edge;
        }
        if self.canvas_offset_y > 0 {
            self.canvas_offset_y -= self.tile_edge;
        }

        range_changed
    }

    fn effective_zoom(&self) -> f32 {
        self.zoom_accumulator.clamp(MIN_ZOOM, MAX_ZOOM)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            surface_offset_x: self.surface_offset_x,
            surface_offset_y: self.surface_offset_y,
            canvas_offset_x: self.canvas_offset_x,
            canvas_offset_y: self.canvas_offset_y,
            visible_range: self.visible_range,
            zoom: self.effective_zoom(),
        }
    }
}

/// Thread-safe handle over the viewport state.
///
/// The foreground (interaction) thread mutates offsets and zoom through
/// this handle; a renderer on any thread reads consistent [`Snapshot`]s.
/// All operations inside the critical section are O(1) arithmetic.
#[derive(Debug, Clone)]
pub struct Viewport {
    inner: Arc<Mutex<ViewState>>,
}

impl Viewport {
    /// Creates a viewport for the given screen size and tile edge length.
    ///
    /// The initial visible range is derived from a zero offset; scroll
    /// bounds are not enforced for this bootstrap range, only for later
    /// offset changes.
    pub fn new(
        screen_w: u32,
        screen_h: u32,
        tile_edge: u32,
        bounds: Option<ScrollBounds>,
    ) -> Result<Self> {
        if tile_edge == 0 {
            return Err(Error::InvalidConfig("tile edge length must be > 0".into()));
        }
        if screen_w == 0 || screen_h == 0 {
            return Err(Error::InvalidConfig(format!(
                "screen size {screen_w}x{screen_h} must be non-zero"
            )));
        }

        let tiles_horiz = Self::tiles_per_axis(screen_w as i32, tile_edge as i32);
        let tiles_vert = Self::tiles_per_axis(screen_h as i32, tile_edge as i32);

        let mut state = ViewState {
            tile_edge: tile_edge as i32,
            tiles_horiz,
            tiles_vert,
            bounds: None,
            surface_offset_x: 0,
            surface_offset_y: 0,
            canvas_offset_x: 0,
            canvas_offset_y: 0,
            zoom_accumulator: 1.0,
            visible_range: TileRange::new(0, 0, 0, 0),
        };
        state.apply_offset(0, 0);
        state.bounds = bounds;

        Ok(Self {
            inner: Arc::new(Mutex::new(state)),
        })
    }

    /// Builds a viewport from a [`GridConfig`], discarding a malformed
    /// bounds descriptor with a diagnostic rather than failing.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        let bounds = config
            .scroll_bounds
            .as_deref()
            .and_then(ScrollBounds::from_descriptor);
        Self::new(config.screen_w, config.screen_h, config.tile_edge, bounds)
    }

    /// Largest number of tiles needed to cover one axis: one extra tile
    /// for scroll overhang, and another when the division floored.
    fn tiles_per_axis(available_px: i32, tile_edge: i32) -> i32 {
        let mut num = available_px / tile_edge + 1;
        if available_px % tile_edge != 0 {
            num += 1;
        }
        num
    }

    /// All fields behind the lock are plain scalars, so a poisoned lock
    /// still holds a consistent state and can be recovered.
    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets the absolute pixel pan offset, recomputing the visible tile
    /// range and clamping each axis independently against the scroll
    /// bounds. Returns whether the visible range changed.
    pub fn apply_offset(&self, offset_x: i32, offset_y: i32) -> bool {
        self.state().apply_offset(offset_x, offset_y)
    }

    /// Adds a delta to the current pan offset. Returns whether the visible
    /// range changed.
    pub fn apply_offset_relative(&self, delta_x: i32, delta_y: i32) -> bool {
        let mut state = self.state();
        let x = state.surface_offset_x + delta_x;
        let y = state.surface_offset_y + delta_y;
        state.apply_offset(x, y)
    }

    /// Multiplies the running zoom accumulator by `factor` and returns the
    /// effective zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    ///
    /// The accumulator itself is not clamped; see [`Viewport::zoom_accumulator`].
    pub fn update_zoom(&self, factor: f32) -> f32 {
        let mut state = self.state();
        state.zoom_accumulator *= factor;
        state.effective_zoom()
    }

    /// Raw running zoom product, which may lie outside the clamp range
    pub fn zoom_accumulator(&self) -> f32 {
        self.state().zoom_accumulator
    }

    /// Tiles currently overlapping the viewport
    pub fn visible_range(&self) -> TileRange {
        self.state().visible_range
    }

    /// Atomically captures offsets, canvas draw offsets, visible range and
    /// effective zoom for one paint pass.
    pub fn snapshot(&self) -> Snapshot {
        self.state().snapshot()
    }
}
