use glam::Mat4;

/// Per-frame values pushed to the raymarching shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub cam_to_world: Mat4,
    pub screen_width: f32,
    pub screen_height: f32,
    /// World-space width of one pixel at the near plane.
    pub pixel_len_x: f32,
    /// World-space height of one pixel at the near plane.
    pub pixel_len_y: f32,
}

impl FrameUniforms {
    /// Derive frame values from a world-to-camera `view` matrix and a
    /// perspective with vertical field of view `fov_y` (radians).
    ///
    /// Zero-sized viewports are treated as one pixel.
    pub fn from_camera(view: Mat4, fov_y: f32, near: f32, width: f32, height: f32) -> Self {
        let w = width.max(1.0);
        let h = height.max(1.0);
        let near_height = 2.0 * near * (fov_y * 0.5).tan();
        let near_width = near_height * (w / h);
        Self {
            view,
            cam_to_world: view.inverse(),
            screen_width: width,
            screen_height: height,
            pixel_len_x: near_width / w,
            pixel_len_y: near_height / h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn square_pixels_have_equal_footprint() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let frame = FrameUniforms::from_camera(view, 90f32.to_radians(), 0.1, 800.0, 600.0);
        assert!((frame.pixel_len_x - frame.pixel_len_y).abs() < 1e-8);
        // tan(45deg) == 1, so the near plane is 0.2 tall.
        assert!((frame.pixel_len_y - 0.2 / 600.0).abs() < 1e-7);
    }

    #[test]
    fn cam_to_world_inverts_view() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let frame = FrameUniforms::from_camera(view, 1.0, 0.1, 640.0, 480.0);
        let origin = frame.cam_to_world.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(eye, 1e-4));
    }

    #[test]
    fn zero_viewport_stays_finite() {
        let frame = FrameUniforms::from_camera(Mat4::IDENTITY, 1.0, 0.1, 0.0, 0.0);
        assert!(frame.pixel_len_x.is_finite());
        assert!(frame.pixel_len_y.is_finite());
    }
}
