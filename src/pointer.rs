//! Pointer tracking
//!
//! Maps client (screen) coordinates onto the fixed logical play field by a
//! linear rescale against the field element's on-screen box.

use glam::Vec2;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// On-screen box of the play field, in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Convert a client position to field coordinates, clamped to the field.
///
/// Returns `None` when the box has no usable size (not laid out yet, hidden);
/// callers should skip the update in that case.
pub fn client_to_field(client: Vec2, rect: ScreenRect) -> Option<Vec2> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }

    let x = (client.x - rect.left) / rect.width * FIELD_WIDTH;
    let y = (client.y - rect.top) / rect.height * FIELD_HEIGHT;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    Some(Vec2::new(x.clamp(0.0, FIELD_WIDTH), y.clamp(0.0, FIELD_HEIGHT)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_box() {
        let rect = ScreenRect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT);
        assert_eq!(
            client_to_field(Vec2::new(123.0, 45.0), rect),
            Some(Vec2::new(123.0, 45.0))
        );
    }

    #[test]
    fn test_scaled_and_offset_box() {
        // Field drawn at half size, offset by (100, 50)
        let rect = ScreenRect::new(100.0, 50.0, FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
        let p = client_to_field(Vec2::new(100.0 + 225.0, 50.0 + 130.0), rect).unwrap();
        assert_eq!(p, Vec2::new(450.0, 260.0));
    }

    #[test]
    fn test_outside_is_clamped() {
        let rect = ScreenRect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT);
        let p = client_to_field(Vec2::new(-50.0, 9000.0), rect).unwrap();
        assert_eq!(p, Vec2::new(0.0, FIELD_HEIGHT));
    }

    #[test]
    fn test_degenerate_box_is_skipped() {
        let rect = ScreenRect::new(0.0, 0.0, 0.0, 520.0);
        assert_eq!(client_to_field(Vec2::new(10.0, 10.0), rect), None);
    }
}
