use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::Instant;

use glam::{UVec2, Vec2};
use tilescape_assets::TextureStore;
use tilescape_gen::{ProceduralGenerator, WorldConfig, WorldSize};
use tilescape_kernel::TileGrid;
use tilescape_render::{DrawList, Frame, RenderView, ViewportRenderer};

fn make_grid(size: WorldSize) -> TileGrid {
    let config = WorldConfig {
        world_size: size,
        ..WorldConfig::default()
    };
    match ProceduralGenerator::new(config).generate() {
        Ok(grid) => grid,
        Err(e) => panic!("generation failed: {e}"),
    }
}

fn bench_generate(size: WorldSize, iterations: usize) {
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(make_grid(black_box(size)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  generate ({}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}", size.name());
}

fn bench_frame(grid: &TileGrid, render_distance: u32, iterations: usize) {
    let settings = BTreeMap::from([
        ("renderDistance".to_string(), render_distance.to_string()),
        ("fogIntensity".to_string(), "75".to_string()),
    ]);
    let centre = Vec2::new(grid.width() as f32, grid.height() as f32) * 0.5;
    let mut view = RenderView {
        canvas_size: UVec2::new(1280, 720),
        player: centre,
        ..RenderView::default()
    };
    view.camera.center_on(centre, view.canvas_size);
    let textures = TextureStore::new();
    let frame = Frame {
        grid,
        view: &view,
        settings: &settings,
        textures: &textures,
    };
    let renderer = ViewportRenderer::new();

    let mut canvas = DrawList::new();
    let start = Instant::now();
    for _ in 0..iterations {
        canvas.commands.clear();
        black_box(renderer.paint(black_box(&frame), &mut canvas));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  frame (render distance {render_distance}, {iterations} iters): {per_iter:?}/iter, {} commands, total {elapsed:?}",
        canvas.len()
    );
}

fn main() {
    println!("=== tilescape-render benchmarks ===\n");

    println!("Generation:");
    bench_generate(WorldSize::Small, 50);
    bench_generate(WorldSize::Medium, 20);
    bench_generate(WorldSize::Large, 5);

    let grid = make_grid(WorldSize::Large);
    println!("\nFixed frames:");
    bench_frame(&grid, 16, 500);
    bench_frame(&grid, 32, 200);
    bench_frame(&grid, 96, 50);

    println!("\nDynamic frames:");
    bench_frame(&grid, 128, 50);
    bench_frame(&grid, 400, 50);

    println!("\nDone.");
}
