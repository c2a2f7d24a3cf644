//! Viewport renderer: paints the visible part of a tile grid with distance
//! fog.
//!
//! # Invariants
//! - Rendering reads the grid and never mutates it.
//! - Settings are read through a [`SettingsSource`] on every frame.
//! - A frame can be drawn before any texture has loaded; flat colors are
//!   always available.
//!
//! The [`Canvas`] trait is the only seam to a real drawing backend.
//! [`DrawList`] records commands and [`AsciiRenderer`] prints a text view.
//!
//! [`SettingsSource`]: tilescape_common::SettingsSource

pub mod camera;
pub mod fog;
pub mod region;
mod renderer;
pub mod settings;

pub use camera::Camera2D;
pub use fog::{FogDecision, FogParams};
pub use region::{CellCoord, VisibleRegion};
pub use renderer::{
    AsciiRenderer, Canvas, DrawCommand, DrawList, Frame, FrameStats, RenderView, Renderer,
    ScreenRect, ViewportRenderer,
};
pub use settings::{RenderMode, RenderSettings};

pub fn crate_info() -> &'static str {
    "tilescape-render v0.1.0"
}
