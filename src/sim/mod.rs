//! Simulation module
//!
//! All gameplay logic lives here, free of DOM and timer dependencies:
//! - `state`: hearts, stage and overlay state, derived queries
//! - `motion`: per-frame drift, bounce, evasion and freeze
//! - `stage`: discrete actions and the side effects they request

pub mod motion;
pub mod stage;
pub mod state;

pub use motion::{Motion, evade, repel_strength, spawn_heart, step_heart, tick};
pub use stage::{Action, GameEvent};
pub use state::{GameState, Heart, HelperState, IntroChoice, Stage};
