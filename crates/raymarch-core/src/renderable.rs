use crate::api::DrawMode;

/// Geometry a [`Pipeline`](crate::Pipeline) can draw.
///
/// Implementors bind their own buffers; the pipeline only describes the
/// position attribute layout and issues the indexed draw. Indices are `u32`.
pub trait Renderable {
    /// Bind the position vertex buffer. Returns `false` when there is
    /// nothing to bind; the draw still goes ahead without the attribute.
    fn bind_position(&self) -> bool;

    /// Bind the element (index) buffer.
    fn bind_index(&self);

    fn draw_mode(&self) -> DrawMode;

    fn element_count(&self) -> u32;
}
