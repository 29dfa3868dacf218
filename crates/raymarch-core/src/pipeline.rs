//! Linked shader program with resolved parameter slots.
//!
//! A [`Pipeline`] owns one program object built from shared [`Stage`]s.
//! Every setter and [`Pipeline::draw`] first activates the program through
//! the context's cache, so a frame's worth of calls on one pipeline issues a
//! single `use_program`. Writes to absent slots are skipped.

use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use glam::Mat4;
use tracing::{debug, warn};

use crate::api::{FloatAttribLayout, GlApi, ProgramId, UniformLocation};
use crate::config::PipelineConfig;
use crate::context::GpuContext;
use crate::error::{PipelineError, Result};
use crate::frame::FrameUniforms;
use crate::quad::POSITION_COMPONENTS;
use crate::renderable::Renderable;
use crate::slots::{SlotLocation, SlotTable};
use crate::stage::Stage;

/// Program object released on drop, including on a failed link.
struct ProgramHandle<A: GlApi> {
    ctx: Rc<GpuContext<A>>,
    id: ProgramId,
}

impl<A: GlApi> Drop for ProgramHandle<A> {
    fn drop(&mut self) {
        self.ctx.forget(self.id);
        self.ctx.api().delete_program(self.id);
    }
}

const POSITION_LAYOUT: FloatAttribLayout = FloatAttribLayout {
    components: POSITION_COMPONENTS,
    normalized: false,
    stride: 0,
    offset: 0,
};

pub struct Pipeline<A: GlApi> {
    // Dropped before `stages`.
    program: ProgramHandle<A>,
    stages: Vec<Rc<Stage<A>>>,
    slots: SlotTable,
    config: PipelineConfig,
}

impl<A: GlApi> Debug for Pipeline<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("program", &self.program.id)
            .field("stages", &self.stages)
            .field("slots", &self.slots)
            .field("config", &self.config)
            .finish()
    }
}

impl<A: GlApi> Pipeline<A> {
    /// Link `stages`, in order, with the default config.
    pub fn new(ctx: &Rc<GpuContext<A>>, stages: &[Rc<Stage<A>>]) -> Result<Self> {
        Self::with_config(ctx, stages, PipelineConfig::default())
    }

    pub fn with_config(
        ctx: &Rc<GpuContext<A>>,
        stages: &[Rc<Stage<A>>],
        config: PipelineConfig,
    ) -> Result<Self> {
        if let Some(stage) = stages.iter().find(|s| !s.belongs_to(ctx)) {
            let log = format!(
                "{} shader {} belongs to another context",
                stage.kind(),
                stage.id().0
            );
            warn!("link refused: {log}");
            return Err(PipelineError::Link { log });
        }

        let api = ctx.api();
        let program = ProgramHandle {
            ctx: Rc::clone(ctx),
            id: api
                .create_program()
                .ok_or(PipelineError::Allocation("program"))?,
        };

        for stage in stages {
            api.attach_shader(program.id, stage.id());
        }
        api.link_program(program.id);

        if !api.program_link_status(program.id) {
            let log = api.program_info_log(program.id);
            warn!(program = program.id.0, "link failed:\n{log}");
            return Err(PipelineError::Link { log });
        }

        let slots = SlotTable::resolve(api, program.id);
        let absent = slots.absent();
        debug!(
            program = program.id.0,
            stages = stages.len(),
            ?absent,
            "linked"
        );

        Ok(Self {
            program,
            stages: stages.to_vec(),
            slots,
            config,
        })
    }

    pub fn program(&self) -> ProgramId {
        self.program.id
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn stages(&self) -> &[Rc<Stage<A>>] {
        &self.stages
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn ctx(&self) -> &GpuContext<A> {
        &self.program.ctx
    }

    /// Make this program current unless the context already has it bound.
    pub fn activate(&self) {
        self.ctx().activate(self.program.id);
    }

    fn set_matrix(&self, slot: SlotLocation<UniformLocation>, m: &Mat4) {
        self.activate();
        if let SlotLocation::Present(loc) = slot {
            self.ctx().api().uniform_matrix4(loc, &m.to_cols_array());
        }
    }

    fn set_float(&self, slot: SlotLocation<UniformLocation>, value: f32) {
        self.activate();
        if let SlotLocation::Present(loc) = slot {
            self.ctx().api().uniform_1f(loc, value);
        }
    }

    pub fn set_view_matrix(&self, view: &Mat4) {
        self.set_matrix(self.slots.view, view);
    }

    pub fn set_cam_to_world_matrix(&self, cam_to_world: &Mat4) {
        self.set_matrix(self.slots.cam_to_world, cam_to_world);
    }

    pub fn set_screen_width(&self, width: f32) {
        self.set_float(self.slots.screen_width, width);
    }

    pub fn set_screen_height(&self, height: f32) {
        self.set_float(self.slots.screen_height, height);
    }

    pub fn set_pixel_len_x(&self, len: f32) {
        self.set_float(self.slots.pixel_len_x, len);
    }

    pub fn set_pixel_len_y(&self, len: f32) {
        self.set_float(self.slots.pixel_len_y, len);
    }

    /// Upload elapsed wall time, scaled by the configured time warp.
    pub fn set_time(&self) {
        self.activate();
        if let SlotLocation::Present(loc) = self.slots.time {
            let t = self.config.shader_time(self.ctx().elapsed_ms());
            self.ctx().api().uniform_1f(loc, t);
        }
    }

    /// Push every per-frame value, including time.
    pub fn apply_frame(&self, frame: &FrameUniforms) {
        self.set_view_matrix(&frame.view);
        self.set_cam_to_world_matrix(&frame.cam_to_world);
        self.set_screen_width(frame.screen_width);
        self.set_screen_height(frame.screen_height);
        self.set_pixel_len_x(frame.pixel_len_x);
        self.set_pixel_len_y(frame.pixel_len_y);
        self.set_time();
    }

    /// Draw `renderable` with `u32` indices.
    ///
    /// The index bind and draw always happen. The position attribute is
    /// only wired up when `vs_Pos` is present and the renderable managed to
    /// bind its position buffer, and is disabled again after the draw.
    pub fn draw<R: Renderable + ?Sized>(&self, renderable: &R) {
        self.activate();
        let api = self.ctx().api();

        let position = match self.slots.position {
            SlotLocation::Present(loc) if renderable.bind_position() => {
                api.enable_vertex_attrib_array(loc);
                api.vertex_attrib_pointer(loc, POSITION_LAYOUT);
                Some(loc)
            }
            _ => None,
        };

        renderable.bind_index();
        let count = renderable.element_count();
        let count = i32::try_from(count).unwrap_or_else(|_| {
            warn!(count, "element count exceeds i32::MAX, clamping");
            i32::MAX
        });
        api.draw_elements_u32(renderable.draw_mode(), count, 0);

        if let Some(loc) = position {
            api.disable_vertex_attrib_array(loc);
        }
    }
}
