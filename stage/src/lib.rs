//! Shared harness for the terminal effect demos.
//!
//! Every demo is a [`Scene`]: a struct that advances its simulation once per
//! tick, paints a [`Grid`] of glyph cells, and reacts to keys. The harness
//! owns what the scenes would otherwise duplicate: the tick loop, pause and
//! reset handling, resize plumbing, and the diffing terminal renderer.

mod color;
mod grid;
mod render;
mod runner;
mod scene;
mod transport;

pub use color::{mix, Gradient, GlyphRamp, Rgb, Shader};
pub use grid::{Cell, Grid};
pub use render::Renderer;
pub use runner::{run, run_with, Options};
pub use scene::Scene;
pub use transport::{Directive, Transport};

pub use crossterm::event::{KeyCode, KeyModifiers};

#[inline]
pub fn clamp01(t: f32) -> f32 {
    t.max(0.0).min(1.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cheap position hash in [0, 1). Used where the effect wants per-cell
/// variation that must stay stable across frames (glyph jitter while paused).
#[inline]
pub fn hash01(a: u32, b: u32, salt: u32) -> f32 {
    let mut x = a.wrapping_mul(1664525).wrapping_add(1013904223);
    x ^= b.wrapping_mul(2246822519);
    x = x.rotate_left(13);
    x ^= salt.wrapping_mul(3266489917);
    (x >> 8) as f32 / (1u32 << 24) as f32
}
