//! Full-screen quad in clip space.
//!
//! The raymarcher only needs something that covers every pixel; the depth is
//! pushed to just in front of the far plane.

use crate::api::DrawMode;

/// Corner positions as `vec4`, counter-clockwise from bottom-left.
pub const POSITIONS: [[f32; 4]; 4] = [
    [-1.0, -1.0, 0.999, 1.0],
    [1.0, -1.0, 0.999, 1.0],
    [1.0, 1.0, 0.999, 1.0],
    [-1.0, 1.0, 0.999, 1.0],
];

pub const INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

pub const DRAW_MODE: DrawMode = DrawMode::Triangles;

/// Components per position, matching the `vs_Pos` layout.
pub const POSITION_COMPONENTS: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_cover_both_triangles() {
        assert!(INDICES.iter().all(|&i| (i as usize) < POSITIONS.len()));
        assert_eq!(INDICES.len() % 3, 0);
    }
}
