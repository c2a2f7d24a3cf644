use glam::{UVec2, Vec2};
use tilescape_assets::{TextureHandle, TextureStore};
use tilescape_common::{Rgb, Rgba, SettingsSource, TileType};
use tilescape_kernel::TileGrid;

use crate::camera::Camera2D;
use crate::fog::{FogDecision, FogParams};
use crate::region::{CellCoord, VisibleRegion};
use crate::settings::{RenderMode, RenderSettings};

/// Fog overlays are this color at the decision's opacity.
pub const FOG_COLOR: Rgb = Rgb::new(0, 0, 0);

/// Grid outline color.
pub const GRID_LINE_COLOR: Rgba = Rgba {
    r: 0,
    g: 0,
    b: 0,
    a: 0.2,
};

/// Cells past the world edge are painted as this type.
pub const OUT_OF_BOUNDS_TYPE: TileType = TileType::Water;

/// Screen-space rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub origin: Vec2,
    pub size: Vec2,
}

/// Drawing surface. Implementations decide how primitives reach pixels.
pub trait Canvas {
    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba);
    fn draw_texture(&mut self, rect: ScreenRect, texture: TextureHandle, variant: u32);
    fn stroke_rect(&mut self, rect: ScreenRect, color: Rgba, width: f32);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill { rect: ScreenRect, color: Rgba },
    Texture { rect: ScreenRect, texture: TextureHandle, variant: u32 },
    Stroke { rect: ScreenRect, color: Rgba, width: f32 },
}

/// A canvas that records commands in order, for headless callers and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Canvas for DrawList {
    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn draw_texture(&mut self, rect: ScreenRect, texture: TextureHandle, variant: u32) {
        self.commands.push(DrawCommand::Texture {
            rect,
            texture,
            variant,
        });
    }

    fn stroke_rect(&mut self, rect: ScreenRect, color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Stroke { rect, color, width });
    }
}

/// Camera and viewport state for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    pub camera: Camera2D,
    /// Canvas size in pixels.
    pub canvas_size: UVec2,
    /// Player position in world pixels.
    pub player: Vec2,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            camera: Camera2D::default(),
            canvas_size: UVec2::new(800, 600),
            player: Vec2::ZERO,
        }
    }
}

impl RenderView {
    /// Screen rectangle covered by a cell.
    pub fn cell_rect(&self, cell: CellCoord, tile_size: u32) -> ScreenRect {
        let ts = tile_size as f32;
        let world = Vec2::new(cell.col as f32 * ts, cell.row as f32 * ts);
        ScreenRect {
            origin: self.camera.world_to_screen(world),
            size: Vec2::splat(ts * self.camera.effective_zoom()),
        }
    }
}

/// Everything a renderer reads for one frame. All borrows are shared: the
/// grid, the textures, and the settings are never mutated by rendering.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub grid: &'a TileGrid,
    pub view: &'a RenderView,
    pub settings: &'a dyn SettingsSource,
    pub textures: &'a TextureStore,
}

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub mode: RenderMode,
    /// Cells in the visible region.
    pub considered: usize,
    /// Cells whose content was drawn.
    pub drawn: usize,
    /// Cells drawn as fog only.
    pub fog_only: usize,
    /// Cells beyond the fog band.
    pub skipped: usize,
    /// Drawn cells that lie outside the grid.
    pub out_of_bounds: usize,
    /// Drawn cells that used a texture rather than a flat color.
    pub textured: usize,
}

/// Renderer-agnostic interface.
///
/// A renderer reads a frame and produces output. It never mutates the grid.
pub trait Renderer {
    type Output;

    fn render(&self, frame: &Frame<'_>) -> Self::Output;
}

/// Paints the visible part of a grid with fog compositing.
#[derive(Debug, Default)]
pub struct ViewportRenderer;

impl ViewportRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Paint one frame onto `canvas`. Safe to call before any texture loads.
    pub fn paint(&self, frame: &Frame<'_>, canvas: &mut dyn Canvas) -> FrameStats {
        let settings = RenderSettings::from_source(frame.settings);
        let grid = frame.grid;
        let view = frame.view;
        let ts = grid.tile_size();
        let region = VisibleRegion::compute(
            &settings,
            &view.camera,
            view.canvas_size,
            view.player,
            ts,
        );
        let fog = FogParams::new(settings.half_extent(), settings.fog_intensity);
        let _span = tracing::debug_span!(
            "render_frame",
            mode = ?region.mode,
            render_distance = settings.render_distance,
            cells = region.cell_count()
        )
        .entered();

        let mut stats = FrameStats {
            mode: region.mode,
            ..FrameStats::default()
        };

        for cell in region.cells() {
            stats.considered += 1;
            let rect = view.cell_rect(cell, ts);
            match fog.decide(cell.distance(region.centre)) {
                FogDecision::Skip => stats.skipped += 1,
                FogDecision::FogOnly(alpha) => {
                    stats.fog_only += 1;
                    if alpha > 0.0 {
                        canvas.fill_rect(rect, FOG_COLOR.with_alpha(alpha));
                    }
                }
                FogDecision::Content { overlay } => {
                    stats.drawn += 1;
                    if draw_content(grid, frame.textures, cell, rect, canvas, &mut stats) {
                        stats.textured += 1;
                    }
                    if overlay > 0.0 {
                        canvas.fill_rect(rect, FOG_COLOR.with_alpha(overlay));
                    }
                    if grid.grid_lines_visible() {
                        canvas.stroke_rect(rect, GRID_LINE_COLOR, 1.0);
                    }
                }
            }
        }

        tracing::trace!(?stats, "frame rendered");
        stats
    }
}

/// Draw a cell's tile. Returns whether a texture was used.
fn draw_content(
    grid: &TileGrid,
    textures: &TextureStore,
    cell: CellCoord,
    rect: ScreenRect,
    canvas: &mut dyn Canvas,
    stats: &mut FrameStats,
) -> bool {
    let (tile_type, color, variant) = if grid.contains_cell(cell.col, cell.row) {
        match grid.record_at(cell.col as u32, cell.row as u32) {
            Some(record) => (record.tile_type, record.color, record.texture_variant),
            None => (TileGrid::DEFAULT_TYPE, TileGrid::DEFAULT_TYPE.fallback_color(), 0.0),
        }
    } else {
        stats.out_of_bounds += 1;
        (OUT_OF_BOUNDS_TYPE, OUT_OF_BOUNDS_TYPE.fallback_color(), 0.0)
    };

    match textures.texture_for(tile_type) {
        Some(handle) => {
            canvas.draw_texture(rect, handle, handle.variant_index(variant));
            true
        }
        None => {
            canvas.fill_rect(rect, color.with_alpha(1.0));
            false
        }
    }
}

impl Renderer for ViewportRenderer {
    type Output = (DrawList, FrameStats);

    fn render(&self, frame: &Frame<'_>) -> (DrawList, FrameStats) {
        let mut list = DrawList::new();
        let stats = self.paint(frame, &mut list);
        (list, stats)
    }
}

/// Debug text renderer: one character per visible cell.
///
/// Uses the same region and fog decisions as [`ViewportRenderer`], so the
/// output shows exactly which cells a frame would draw. Useful for CLI
/// output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct AsciiRenderer;

impl AsciiRenderer {
    pub const PLAYER: char = '@';
    pub const FOG: char = ':';
    pub const SKIPPED: char = ' ';

    pub fn new() -> Self {
        Self
    }

    pub fn glyph(tile: TileType) -> char {
        match tile {
            TileType::Grass => '.',
            TileType::Water => '~',
            TileType::Wall => '#',
            TileType::Cave => 'o',
            TileType::Trail => '=',
            TileType::Mana => '*',
        }
    }
}

impl Renderer for AsciiRenderer {
    type Output = String;

    fn render(&self, frame: &Frame<'_>) -> String {
        let settings = RenderSettings::from_source(frame.settings);
        let grid = frame.grid;
        let view = frame.view;
        let region = VisibleRegion::compute(
            &settings,
            &view.camera,
            view.canvas_size,
            view.player,
            grid.tile_size(),
        );
        let fog = FogParams::new(settings.half_extent(), settings.fog_intensity);

        let mut out = format!(
            "=== {:?} view: {}x{} cells around ({}, {}) ===\n",
            region.mode,
            region.max.col.saturating_sub(region.min.col).saturating_add(1),
            region.max.row.saturating_sub(region.min.row).saturating_add(1),
            region.centre.col,
            region.centre.row
        );
        for row in region.min.row..=region.max.row {
            let line: String = (region.min.col..=region.max.col)
                .map(|col| {
                    let cell = CellCoord::new(col, row);
                    if cell == region.centre {
                        return Self::PLAYER;
                    }
                    match fog.decide(cell.distance(region.centre)) {
                        FogDecision::Skip => Self::SKIPPED,
                        FogDecision::FogOnly(_) => Self::FOG,
                        FogDecision::Content { .. } => {
                            let tile = if grid.contains_cell(col, row) {
                                grid.tile_at(col as u32, row as u32)
                                    .unwrap_or(TileGrid::DEFAULT_TYPE)
                            } else {
                                OUT_OF_BOUNDS_TYPE
                            };
                            Self::glyph(tile)
                        }
                    }
                })
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tilescape_common::NoSettings;
    use tilescape_kernel::TileRecord;

    fn settings(render_distance: u32, fog: u32) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("renderDistance".to_string(), render_distance.to_string()),
            ("fogIntensity".to_string(), fog.to_string()),
        ])
    }

    fn small_grid() -> TileGrid {
        // 4x4 tiles of 16px, one wall at (1, 1), the rest absent
        TileGrid::new(64, 64, 16, vec![TileRecord::new(16, 16, TileType::Wall)]).unwrap()
    }

    fn view_at_tile(col: u32, row: u32, ts: u32) -> RenderView {
        RenderView {
            player: Vec2::new((col * ts) as f32 + 1.0, (row * ts) as f32 + 1.0),
            ..RenderView::default()
        }
    }

    fn fills(list: &DrawList) -> Vec<&DrawCommand> {
        list.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { .. }))
            .collect()
    }

    #[test]
    fn fixed_frame_counts_add_up() {
        let grid = small_grid();
        let view = view_at_tile(1, 1, 16);
        let textures = TextureStore::new();
        let source = settings(4, 75);
        let frame = Frame {
            grid: &grid,
            view: &view,
            settings: &source,
            textures: &textures,
        };
        let (_, stats) = ViewportRenderer::new().render(&frame);
        assert_eq!(stats.mode, RenderMode::Fixed);
        // half extent 2, reach ceil(2.4) = 3: a 7x7 region
        assert_eq!(stats.considered, 49);
        assert_eq!(stats.considered, stats.drawn + stats.fog_only + stats.skipped);
        // distance <= 2 from the centre: 13 cells
        assert_eq!(stats.drawn, 13);
        assert!(stats.out_of_bounds > 0);
    }

    #[test]
    fn renders_before_textures_load() {
        let grid = small_grid();
        let view = view_at_tile(1, 1, 16);
        let textures = TextureStore::new();
        let frame = Frame {
            grid: &grid,
            view: &view,
            settings: &NoSettings,
            textures: &textures,
        };
        let (list, stats) = ViewportRenderer::new().render(&frame);
        assert_eq!(stats.textured, 0);
        assert!(!list.is_empty());
        assert!(list.commands.iter().all(|c| !matches!(c, DrawCommand::Texture { .. })));
        let wall = TileType::Wall.fallback_color().with_alpha(1.0);
        assert!(fills(&list).iter().any(|c| matches!(c, DrawCommand::Fill { color, .. } if *color == wall)));
    }

    #[test]
    fn loaded_textures_replace_colors() {
        let grid = small_grid();
        let view = view_at_tile(1, 1, 16);
        let mut textures = TextureStore::new();
        let handle = textures.mark_loaded(TileType::Wall, "tiles/wall.png", 1);
        let source = settings(2, 0);
        let frame = Frame {
            grid: &grid,
            view: &view,
            settings: &source,
            textures: &textures,
        };
        let (list, stats) = ViewportRenderer::new().render(&frame);
        assert_eq!(stats.textured, 1);
        assert!(list.commands.contains(&DrawCommand::Texture {
            rect: view.cell_rect(CellCoord::new(1, 1), 16),
            texture: handle,
            variant: 0,
        }));
    }

    #[test]
    fn cell_draw_order_is_content_fog_outline() {
        let grid = small_grid().with_grid_lines(true);
        let view = view_at_tile(1, 1, 16);
        let textures = TextureStore::new();
        let source = settings(10, 100);
        let frame = Frame {
            grid: &grid,
            view: &view,
            settings: &source,
            textures: &textures,
        };
        let (list, _) = ViewportRenderer::new().render(&frame);
        // (5, 1) is 4 tiles away: past the fog start (3.0), inside max (5.0)
        let for_cell = commands_for(&list, view.cell_rect(CellCoord::new(5, 1), 16));
        assert_eq!(for_cell.len(), 3);
        assert!(matches!(for_cell[0], DrawCommand::Fill { color, .. } if color.a == 1.0));
        assert!(matches!(for_cell[1], DrawCommand::Fill { color, .. } if (color.a - 0.5).abs() < 1e-6));
        assert!(matches!(for_cell[2], DrawCommand::Stroke { width, .. } if *width == 1.0));
    }

    fn commands_for(list: &DrawList, rect: ScreenRect) -> Vec<&DrawCommand> {
        list.commands
            .iter()
            .filter(|c| match c {
                DrawCommand::Fill { rect: r, .. }
                | DrawCommand::Texture { rect: r, .. }
                | DrawCommand::Stroke { rect: r, .. } => *r == rect,
            })
            .collect()
    }

    fn stroke_count(list: &DrawList) -> usize {
        list.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke { .. }))
            .count()
    }

    #[test]
    fn fog_band_cells_get_no_outline() {
        let grid = small_grid().with_grid_lines(true);
        let view = view_at_tile(1, 1, 16);
        let textures = TextureStore::new();
        let source = settings(10, 100);
        let frame = Frame {
            grid: &grid,
            view: &view,
            settings: &source,
            textures: &textures,
        };
        let (list, stats) = ViewportRenderer::new().render(&frame);
        // (6, 2) is about 5.1 tiles away: inside the band between 5.0 and 6.0
        let band = commands_for(&list, view.cell_rect(CellCoord::new(6, 2), 16));
        assert_eq!(band.len(), 1);
        assert!(matches!(band[0], DrawCommand::Fill { color, .. } if color.a < 0.1));
        assert!(stats.fog_only > 0);
        assert_eq!(stroke_count(&list), stats.drawn);
    }

    #[test]
    fn dynamic_mode_skips_past_fog_band() {
        let grid = TileGrid::empty(400, 400, 16).unwrap().with_grid_lines(true);
        let player = Vec2::new(200.0 * 16.0, 200.0 * 16.0);
        let mut view = RenderView {
            camera: Camera2D::default(),
            canvas_size: UVec2::new(4000, 600),
            player,
        };
        view.camera.center_on(player, view.canvas_size);
        let textures = TextureStore::new();
        let source = settings(128, 75);
        let frame = Frame {
            grid: &grid,
            view: &view,
            settings: &source,
            textures: &textures,
        };
        let (list, stats) = ViewportRenderer::new().render(&frame);
        assert_eq!(stats.mode, RenderMode::Dynamic);
        // the viewport is 250 tiles wide; fog ends 76.8 tiles from the player
        assert!(stats.skipped > 0);
        assert!(stats.fog_only > 0);
        let far = view.cell_rect(CellCoord::new(300, 200), 16);
        assert!(commands_for(&list, far).is_empty());
        let edge = view.cell_rect(CellCoord::new(276, 200), 16);
        assert!(matches!(
            commands_for(&list, edge).as_slice(),
            [DrawCommand::Fill { .. }]
        ));
        assert_eq!(stroke_count(&list), stats.drawn);
    }

    #[test]
    fn out_of_bounds_cells_are_water() {
        let grid = small_grid();
        let view = view_at_tile(0, 0, 16);
        let textures = TextureStore::new();
        let source = settings(2, 0);
        let frame = Frame {
            grid: &grid,
            view: &view,
            settings: &source,
            textures: &textures,
        };
        let (list, _) = ViewportRenderer::new().render(&frame);
        let water = TileType::Water.fallback_color().with_alpha(1.0);
        let rect = view.cell_rect(CellCoord::new(-1, 0), 16);
        assert!(list.commands.contains(&DrawCommand::Fill { rect, color: water }));
    }

    #[test]
    fn nothing_drawn_beyond_fog_band() {
        let grid = TileGrid::empty(100, 100, 16).unwrap();
        let view = view_at_tile(50, 50, 16);
        let textures = TextureStore::new();
        let source = settings(20, 60);
        let frame = Frame {
            grid: &grid,
            view: &view,
            settings: &source,
            textures: &textures,
        };
        let (list, stats) = ViewportRenderer::new().render(&frame);
        assert!(stats.skipped > 0);
        let far = view.cell_rect(CellCoord::new(62, 62), 16);
        assert!(list.commands.iter().all(|c| match c {
            DrawCommand::Fill { rect, .. } => *rect != far,
            _ => true,
        }));
    }

    #[test]
    fn dynamic_mode_uses_camera_region() {
        let grid = TileGrid::empty(300, 300, 16).unwrap();
        let view = RenderView {
            camera: Camera2D::new(Vec2::new(160.0, 160.0), 1.0),
            canvas_size: UVec2::new(160, 160),
            player: Vec2::new(240.0, 240.0),
        };
        let textures = TextureStore::new();
        let source = settings(200, 75);
        let frame = Frame {
            grid: &grid,
            view: &view,
            settings: &source,
            textures: &textures,
        };
        let (_, stats) = ViewportRenderer::new().render(&frame);
        assert_eq!(stats.mode, RenderMode::Dynamic);
        // cols/rows 10..=20 padded by 2: 15x15
        assert_eq!(stats.considered, 225);
        assert_eq!(stats.drawn, 225);
    }

    #[test]
    fn ascii_marks_player_fog_and_tiles() {
        let grid = small_grid();
        let view = view_at_tile(0, 1, 16);
        let textures = TextureStore::new();
        let source = settings(4, 75);
        let frame = Frame {
            grid: &grid,
            view: &view,
            settings: &source,
            textures: &textures,
        };
        let out = AsciiRenderer::new().render(&frame);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("=== Fixed view: 7x7"));
        // centre row, cols -3..=3: past the band, two water cells off the
        // west edge, the player, the wall, grass, past the band
        assert_eq!(lines[4], " ~~@#.");
        assert!(out.contains(AsciiRenderer::FOG));
    }
}
