//! Per-frame heart motion
//!
//! Hearts drift and bounce inside the field. While the evasive condition holds,
//! the runner is pushed away from the cursor and jittered so its flight is hard
//! to predict. Once help is used the runner is pinned to the center for good.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Heart};
use crate::consts::*;
use crate::inner_bounds;

/// Create a heart at a random spot with a random drift
pub fn spawn_heart<R: Rng + ?Sized>(id: usize, message: &str, rng: &mut R) -> Heart {
    let size = rng.random_range(HEART_MIN_SIZE..HEART_MAX_SIZE);
    let pos = Vec2::new(
        rng.random_range(SPAWN_MARGIN..FIELD_WIDTH - SPAWN_MARGIN),
        rng.random_range(SPAWN_MARGIN..FIELD_HEIGHT - SPAWN_MARGIN),
    );

    // An exact zero would leave the heart stuck on that axis forever
    let mut vx = rng.random_range(-SPAWN_MAX_VX..SPAWN_MAX_VX);
    if vx == 0.0 {
        vx = FALLBACK_VX;
    }
    let mut vy = rng.random_range(-SPAWN_MAX_VY..SPAWN_MAX_VY);
    if vy == 0.0 {
        vy = FALLBACK_VY;
    }

    Heart {
        id,
        pos,
        vel: Vec2::new(vx, vy),
        size,
        collected: false,
        message: message.to_string(),
    }
}

/// How the heart should behave this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Plain drift and bounce
    Drift,
    /// Flee the pointer
    Evade,
    /// Locked to the field center
    Frozen,
}

/// Repulsion strength in [0, 1]: 1 at the pointer, 0 at `REPEL_RADIUS` and beyond
#[inline]
pub fn repel_strength(dist: f32) -> f32 {
    ((REPEL_RADIUS - dist) / REPEL_RADIUS).clamp(0.0, 1.0)
}

/// Push the runner's velocity away from the pointer, add jitter, cap speed
pub fn evade<R: Rng + ?Sized>(pos: Vec2, vel: Vec2, pointer: Vec2, rng: &mut R) -> Vec2 {
    let away = pos - pointer;
    let mut dist = away.length();
    if dist == 0.0 {
        dist = 1.0;
    }

    let push = away / dist * (REPEL_ACCEL * repel_strength(dist));
    let half = JITTER_SPAN / 2.0;
    let jitter = Vec2::new(
        rng.random_range(-half..half),
        rng.random_range(-half..half),
    );

    (vel + push + jitter).clamp(Vec2::splat(-RUNNER_MAX_SPEED), Vec2::splat(RUNNER_MAX_SPEED))
}

/// Advance one heart by a single frame
pub fn step_heart<R: Rng + ?Sized>(heart: &mut Heart, motion: Motion, pointer: Vec2, rng: &mut R) {
    if heart.collected {
        return;
    }

    let mut vel = match motion {
        Motion::Frozen => {
            heart.freeze_at_center();
            return;
        }
        Motion::Evade => evade(heart.pos, heart.vel, pointer, rng),
        Motion::Drift => heart.vel,
    };

    let next = heart.pos + vel;
    let (min, max) = inner_bounds();

    if next.x < min.x || next.x > max.x {
        vel.x = -vel.x;
    }
    if next.y < min.y || next.y > max.y {
        vel.y = -vel.y;
    }

    // Fast runners can overshoot the wall in one step
    heart.pos = next.clamp(min, max);
    heart.vel = vel;
}

/// Advance every uncollected heart by one animation frame
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let runner = state.runner();
    let frozen = state.runner_frozen();
    let pointer = state.pointer;

    for heart in &mut state.hearts {
        let motion = match runner {
            Some(id) if id == heart.id && frozen => Motion::Frozen,
            Some(id) if id == heart.id => Motion::Evade,
            _ => Motion::Drift,
        };
        step_heart(heart, motion, pointer, rng);
    }
}
