//! Function loading and a glium backend over the host-provided GL context.

use std::sync::Once;

use anyhow::Result;
use glium::CapabilitiesSource;

use crate::glsl::{self, GlslVersion};

pub(crate) static GL_INIT_ONCE: Once = Once::new();

/// Load GL function pointers exactly once via `gl_loader`.
pub(crate) fn load_gl() {
    GL_INIT_ONCE.call_once(|| {
        gl_loader::init_gl();
        gl::load_with(|s| gl_loader::get_proc_address(s).cast());
    });
}

/// glium backend that borrows whatever context is current on the thread.
#[derive(Debug)]
pub(crate) struct RawGlBackend {
    pub(crate) size: (u32, u32),
}

impl RawGlBackend {
    pub(crate) fn new(size: (u32, u32)) -> Self {
        load_gl();
        Self { size }
    }
}

/// # Safety
///
/// The embedding application owns the window and its GL context; this
/// backend never creates, swaps or switches one, so `is_current` reports
/// `true` unconditionally. The glium context built over it exists only inside
/// [`query_glsl_version`] to read capabilities and is dropped before any
/// `Stage` or `Pipeline` issues raw calls, so glium's cached state never
/// shadows ours.
unsafe impl glium::backend::Backend for RawGlBackend {
    fn swap_buffers(&self) -> Result<(), glium::SwapBuffersError> {
        Ok(())
    }

    unsafe fn get_proc_address(&self, symbol: &str) -> *const std::os::raw::c_void {
        gl_loader::get_proc_address(symbol).cast()
    }

    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.size
    }

    fn is_current(&self) -> bool {
        true
    }

    unsafe fn make_current(&self) {}

    fn resize(&self, _new_size: (u32, u32)) {}
}

/// Query the current context for the best GLSL dialect to compile with.
///
/// Builds a throwaway glium context over the current GL context and reads its
/// capabilities.
///
/// # Safety
///
/// The host's GL context must be current on the calling thread. glium may
/// bind state while reading capabilities; call [`crate::validate_gl::gl_reset`]
/// afterwards if the host shares the context with other renderers.
pub unsafe fn query_glsl_version(size: (u32, u32)) -> Result<Option<GlslVersion>> {
    let backend = RawGlBackend::new(size);
    let ctx = glium::backend::Context::new(
        backend,
        false,
        glium::debug::DebugCallbackBehavior::Ignore,
    )
    .map_err(|e| anyhow::anyhow!("Incompatible OpenGL context: {e:?}"))?;

    let supported = &ctx.get_capabilities().supported_glsl_versions;
    tracing::debug!("SUPPORTED GLSL: {supported:?}");
    tracing::debug!("OPENGL_VERSION {}", ctx.get_opengl_version_string());

    Ok(glsl::pick_version(supported))
}
