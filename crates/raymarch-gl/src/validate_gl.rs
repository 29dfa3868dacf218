//! Reset and inspect the GL state the raymarcher touches.

use gl::types::GLint;
use raymarch_core::GpuContext;

use crate::native::NativeGl;

/// Unbind the program, buffers and vertex array the pipeline may have left
/// bound, and clear the context's active-program cache to match.
///
/// Call before handing the context back to code that expects a clean slate.
pub fn gl_reset(ctx: &GpuContext<NativeGl>) {
    ctx.release_active();

    unsafe {
        gl::BindVertexArray(0);
        gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0);
    }
}

/// Current viewport as `[x, y, width, height]`.
pub fn viewport(_ctx: &GpuContext<NativeGl>) -> [GLint; 4] {
    let mut dims: [GLint; 4] = [0; 4];
    unsafe { gl::GetIntegerv(gl::VIEWPORT, dims.as_mut_ptr()) };
    dims
}
