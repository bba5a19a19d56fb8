//! Catch the Hearts - a tiny bouncing-hearts browser mini-game
//!
//! Core modules:
//! - `sim`: Heart motion and the stage controller (no DOM dependencies)
//! - `pointer`: Screen to play-field coordinate mapping
//! - `effects`: Celebration burst parameters
//! - `settings`: Runtime configuration

pub mod effects;
pub mod pointer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical play field dimensions
    pub const FIELD_WIDTH: f32 = 900.0;
    pub const FIELD_HEIGHT: f32 = 520.0;

    /// Hearts bounce off walls this far inside the field edge
    pub const WALL_MARGIN: f32 = 24.0;
    /// Hearts spawn at least this far inside the field edge
    pub const SPAWN_MARGIN: f32 = 60.0;

    /// Heart size range (diameter, field units)
    pub const HEART_MIN_SIZE: f32 = 40.0;
    pub const HEART_MAX_SIZE: f32 = 58.0;

    /// Initial speed ranges per axis
    pub const SPAWN_MAX_VX: f32 = 1.2;
    pub const SPAWN_MAX_VY: f32 = 1.0;
    /// Substitutes for an initial velocity component that came out exactly zero
    pub const FALLBACK_VX: f32 = 0.8;
    pub const FALLBACK_VY: f32 = -0.6;

    /// Cursor repulsion kicks in below this distance
    pub const REPEL_RADIUS: f32 = 220.0;
    /// Velocity added per frame at full repulsion
    pub const REPEL_ACCEL: f32 = 1.35;
    /// Total width of the per-axis jitter range (centered on zero)
    pub const JITTER_SPAN: f32 = 0.12;
    /// Per-axis speed cap for the runner
    pub const RUNNER_MAX_SPEED: f32 = 4.8;

    /// Default number of hearts to collect
    pub const DEFAULT_TOTAL_HEARTS: usize = 7;
    /// Default wait before offering help (ms)
    pub const DEFAULT_HELP_DELAY_MS: u32 = 5000;
}

/// Center of the play field (freeze point for the runner)
#[inline]
pub fn field_center() -> Vec2 {
    Vec2::new(consts::FIELD_WIDTH / 2.0, consts::FIELD_HEIGHT / 2.0)
}

/// Inner bounds hearts are kept within: (min, max) corners
#[inline]
pub fn inner_bounds() -> (Vec2, Vec2) {
    let m = consts::WALL_MARGIN;
    (
        Vec2::splat(m),
        Vec2::new(consts::FIELD_WIDTH - m, consts::FIELD_HEIGHT - m),
    )
}
