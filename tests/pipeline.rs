//! End-to-end exercise of the viewport → provider → worker pipeline:
//! a foreground thread pans the viewport while the background worker
//! fills the cache, and a renderer-style reader consumes snapshots.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tilegrid::prelude::*;

fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let end = Instant::now() + deadline;
    while Instant::now() < end {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    done()
}

fn all_visible_tiles_ready(provider: &dyn TileProvider, range: TileRange) -> bool {
    range
        .iter()
        .all(|coord| provider.get_tile(coord).is_some_and(|t| t.has_content()))
}

fn test_config() -> GridConfig {
    GridConfig {
        screen_w: 300,
        screen_h: 300,
        tile_edge: 100,
        worker_idle_tick: Duration::from_millis(1),
        palette_size: 5,
        pattern_cache_capacity: 8,
        ..GridConfig::default()
    }
}

#[test]
fn worker_fills_visible_tiles_after_pan() {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = test_config();
    let viewport = Viewport::from_config(&config).unwrap();
    let provider: Arc<dyn TileProvider> = Arc::new(CachedTileProvider::with_anchor(
        PatternSource::from_config(&config).unwrap(),
        GridAnchor::SouthEast,
    ));
    let worker = GenerationWorker::spawn(Arc::clone(&provider), WorkerConfig::from(&config));

    // Initial frame
    provider.on_visible_range_changed(viewport.visible_range());
    worker.notify();

    assert_eq!(viewport.visible_range(), TileRange::new(0, 0, 3, 3));
    assert!(
        wait_until(Duration::from_secs(10), || all_visible_tiles_ready(
            provider.as_ref(),
            viewport.visible_range()
        )),
        "initial range never filled: {}",
        provider.debug_summary()
    );

    // Pan into negative tile territory, one swipe at a time
    for _ in 0..6 {
        if viewport.apply_offset_relative(60, 45) {
            provider.on_visible_range_changed(viewport.visible_range());
            worker.notify();
        }
    }

    let range = viewport.visible_range();
    assert!(range.left < 0 && range.top < 0);
    assert!(
        wait_until(Duration::from_secs(10), || all_visible_tiles_ready(
            provider.as_ref(),
            range
        )),
        "panned range {range:?} never filled: {}",
        provider.debug_summary()
    );

    // Renderer-style snapshot consumption: every visible coordinate
    // resolves to ready content of the provider's tile size.
    let snapshot = viewport.snapshot();
    let edge = provider.tile_edge_length() as usize;
    for coord in snapshot.visible_range.iter() {
        let tile = provider.get_tile(coord).expect("visible tile missing");
        let content = tile.content().expect("visible tile empty");
        assert_eq!(content.len(), edge * edge * 4);
    }
    assert!(snapshot.zoom >= 1.0 && snapshot.zoom <= 5.0);

    worker.shutdown();
}

#[test]
fn eviction_keeps_memory_bounded_to_the_visible_range() {
    let config = test_config();
    let viewport = Viewport::from_config(&config).unwrap();
    let provider = Arc::new(CachedTileProvider::new(
        PatternSource::from_config(&config).unwrap(),
    ));
    let worker = GenerationWorker::spawn(
        Arc::clone(&provider) as Arc<dyn TileProvider>,
        WorkerConfig::from(&config),
    );

    provider.on_visible_range_changed(viewport.visible_range());
    worker.notify();
    let first_range = viewport.visible_range();
    assert!(wait_until(Duration::from_secs(10), || {
        all_visible_tiles_ready(provider.as_ref(), first_range)
    }));

    // Jump far away; the old range's payloads must be cleared
    viewport.apply_offset(-1000, -1000);
    provider.on_visible_range_changed(viewport.visible_range());
    worker.notify();

    let new_range = viewport.visible_range();
    assert_eq!(new_range, TileRange::new(10, 10, 13, 13));

    for coord in first_range.iter() {
        let tile = provider
            .get_tile(coord)
            .expect("evicted tile record should remain");
        assert!(!tile.has_content(), "{coord:?} kept content after eviction");
    }

    assert!(wait_until(Duration::from_secs(10), || {
        all_visible_tiles_ready(provider.as_ref(), new_range)
    }));

    // Records for both ranges remain tracked
    assert_eq!(provider.cached_count(), first_range.count() + new_range.count());
    worker.shutdown();
}

#[test]
fn rapid_swipes_supersede_queued_work_without_losing_the_final_range() {
    let config = test_config();
    let viewport = Viewport::from_config(&config).unwrap();
    let provider = Arc::new(CachedTileProvider::new(
        PatternSource::from_config(&config).unwrap(),
    ));
    let worker = GenerationWorker::spawn(
        Arc::clone(&provider) as Arc<dyn TileProvider>,
        WorkerConfig::from(&config),
    );

    // Fast swipe: a flurry of range changes, each superseding the last
    for step in 0..40 {
        if viewport.apply_offset_relative(-35 - step % 3, -20) {
            provider.on_visible_range_changed(viewport.visible_range());
            worker.notify();
        }
    }

    let final_range = viewport.visible_range();
    assert!(
        wait_until(Duration::from_secs(10), || all_visible_tiles_ready(
            provider.as_ref(),
            final_range
        )),
        "final range {final_range:?} never filled: {}",
        provider.debug_summary()
    );

    // Once settled, nothing outside the final range is queued
    assert!(provider
        .pending_coords()
        .iter()
        .all(|c| final_range.contains(*c)));

    worker.shutdown();
}

#[test]
fn bounded_viewport_clamps_against_provider_edges() {
    let config = GridConfig {
        scroll_bounds: Some(vec![Some(0), Some(0), None, None]),
        ..test_config()
    };
    let viewport = Viewport::from_config(&config).unwrap();

    // Diagonal swipe at the origin corner: both axes would go below tile 0,
    // so neither offset moves.
    assert!(!viewport.apply_offset(200, 200));
    assert_eq!(viewport.visible_range(), TileRange::new(0, 0, 3, 3));

    // Swiping away from the corner works on both axes
    assert!(viewport.apply_offset(-150, -250));
    assert_eq!(viewport.visible_range(), TileRange::new(1, 2, 4, 5));

    // Back at the corner, the free axis still scrolls
    viewport.apply_offset(0, 0);
    assert!(viewport.apply_offset(250, -150));
    let range = viewport.visible_range();
    assert_eq!((range.left, range.right), (0, 3));
    assert_eq!((range.top, range.bottom), (1, 4));
}
