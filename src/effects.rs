//! Celebration effect parameters
//!
//! The particle effect itself is an external JS library; this module only
//! describes what to ask it for and when.

use serde::Serialize;

/// Options passed to the confetti library, serialized as its options object
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfettiBurst {
    pub particle_count: u32,
    /// Spread angle in degrees
    pub spread: f32,
    pub origin: Origin,
}

/// Burst origin, normalized to the viewport (0..1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Origin {
    pub y: f32,
}

/// A burst fired `delay_ms` after the celebration starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledBurst {
    pub delay_ms: u32,
    pub burst: ConfettiBurst,
}

/// Big immediate burst, then a smaller, wider one shortly after
pub const CELEBRATION: [ScheduledBurst; 2] = [
    ScheduledBurst {
        delay_ms: 0,
        burst: ConfettiBurst {
            particle_count: 160,
            spread: 70.0,
            origin: Origin { y: 0.65 },
        },
    },
    ScheduledBurst {
        delay_ms: 250,
        burst: ConfettiBurst {
            particle_count: 120,
            spread: 90.0,
            origin: Origin { y: 0.6 },
        },
    },
];

impl ConfettiBurst {
    /// JSON options object for the JS side
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
