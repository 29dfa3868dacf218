//! Compiled shader stages.

use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::api::{GlApi, ShaderId, ShaderKind};
use crate::context::GpuContext;
use crate::error::{PipelineError, Result};

/// One successfully compiled shader stage.
///
/// There is no partially valid `Stage`: construction either compiles or
/// fails. The shader object is deleted on drop; a program it is attached to
/// keeps working, as GL defers deletion until detach.
pub struct Stage<A: GlApi> {
    ctx: Rc<GpuContext<A>>,
    kind: ShaderKind,
    id: ShaderId,
}

impl<A: GlApi> Debug for Stage<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

impl<A: GlApi> Stage<A> {
    /// Compile `source` as a stage of `kind`.
    pub fn new(ctx: &Rc<GpuContext<A>>, kind: ShaderKind, source: &str) -> Result<Self> {
        let api = ctx.api();
        let id = api
            .create_shader(kind)
            .ok_or(PipelineError::Allocation("shader"))?;

        // Owned from here so the failure path below releases the object.
        let stage = Self {
            ctx: Rc::clone(ctx),
            kind,
            id,
        };

        api.shader_source(id, source);
        api.compile_shader(id);

        if !api.shader_compile_status(id) {
            let log = api.shader_info_log(id);
            warn!(%kind, shader = id.0, "compile failed:\n{log}");
            return Err(PipelineError::Compilation { kind, log });
        }

        debug!(%kind, shader = id.0, "compiled");
        Ok(stage)
    }

    pub fn vertex(ctx: &Rc<GpuContext<A>>, source: &str) -> Result<Self> {
        Self::new(ctx, ShaderKind::Vertex, source)
    }

    pub fn fragment(ctx: &Rc<GpuContext<A>>, source: &str) -> Result<Self> {
        Self::new(ctx, ShaderKind::Fragment, source)
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn id(&self) -> ShaderId {
        self.id
    }

    /// Whether this stage was compiled in `ctx`. Shader names are only
    /// meaningful inside the context that created them.
    pub fn belongs_to(&self, ctx: &Rc<GpuContext<A>>) -> bool {
        Rc::ptr_eq(&self.ctx, ctx)
    }
}

impl<A: GlApi> Drop for Stage<A> {
    fn drop(&mut self) {
        self.ctx.api().delete_shader(self.id);
    }
}
