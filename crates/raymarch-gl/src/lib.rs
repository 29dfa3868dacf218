//! OpenGL backend for `raymarch-core`.
//!
//! [`NativeGl`] issues the pipeline's commands through the `gl` crate against
//! the context that is current on the calling thread. Window and context
//! creation stay with the host.
//!
//! ```rust,ignore
//! let ctx = unsafe { raymarch_gl::native_context() };
//! let version = unsafe { raymarch_gl::query_glsl_version((width, height))? };
//! let pipeline = raymarch_gl::build_pipeline(&ctx, version, VERTEX, FRAGMENT)?;
//! let quad = ScreenQuad::new(ctx.api());
//!
//! // each frame
//! pipeline.apply_frame(&raymarch_gl::frame_for_viewport(&ctx, view, fov_y, near));
//! pipeline.draw(&quad);
//! ```
//!
//! ### Warning
//!
//! Everything here assumes the host keeps the same GL context current for the
//! lifetime of the objects built on it.

use std::rc::Rc;

use anyhow::{Context as _, Result};
use glam::Mat4;
use raymarch_core::{FrameUniforms, GlApi, GpuContext, Pipeline, Stage};

mod gl_backend;
pub mod glsl;
mod logging;
mod native;
mod screen_quad;
pub mod validate_gl;

pub use gl_backend::query_glsl_version;
pub use glsl::GlslVersion;
pub use logging::{init_logging, LOG_ENV};
pub use native::NativeGl;
pub use screen_quad::ScreenQuad;

/// A context over the current GL context, timed from process start.
///
/// # Safety
///
/// See [`NativeGl::new`].
pub unsafe fn native_context() -> Rc<GpuContext<NativeGl>> {
    let ctx = GpuContext::new(NativeGl::new());
    tracing::debug!("CONTEXT: {ctx:?}");
    ctx
}

/// Compile both stages and link them.
///
/// When `version` is given, sources without a `#version` line get its
/// directive prepended.
pub fn build_pipeline<A: GlApi>(
    ctx: &Rc<GpuContext<A>>,
    version: Option<GlslVersion>,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<Pipeline<A>> {
    let prepare = |src: &str| match version {
        Some(v) => glsl::with_version_directive(src, v).into_owned(),
        None => src.to_owned(),
    };

    let vertex = Stage::vertex(ctx, &prepare(vertex_src)).context("building vertex stage")?;
    let fragment =
        Stage::fragment(ctx, &prepare(fragment_src)).context("building fragment stage")?;

    Pipeline::new(ctx, &[Rc::new(vertex), Rc::new(fragment)]).context("linking raymarch pipeline")
}

/// Frame values for the current viewport.
pub fn frame_for_viewport(
    ctx: &GpuContext<NativeGl>,
    view: Mat4,
    fov_y: f32,
    near: f32,
) -> FrameUniforms {
    let [_, _, width, height] = validate_gl::viewport(ctx);
    FrameUniforms::from_camera(view, fov_y, near, width as f32, height as f32)
}
