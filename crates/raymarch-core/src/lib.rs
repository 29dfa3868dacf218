//! Shader stage and pipeline lifecycle for a full-screen raymarcher.
//!
//! The raymarching itself lives in GLSL supplied by the caller. This crate
//! compiles and links it, resolves the parameter slots the shaders share with
//! the host, and pushes per-frame values before drawing a screen quad.
//!
//! # Overview
//!
//! - [`GlApi`] is the backend seam; `raymarch-gl` drives a real OpenGL
//!   context, [`headless::HeadlessGl`] records commands without a GPU.
//! - [`GpuContext`] owns the backend, the active-program cache and the clock.
//! - [`Stage`] is one compiled shader; [`Pipeline`] links stages and exposes
//!   the uniform setters and [`Pipeline::draw`].
//! - [`Renderable`] is what a pipeline can draw.
//!
//! ```rust,ignore
//! let ctx = GpuContext::new(backend);
//! let vs = Rc::new(Stage::vertex(&ctx, VERTEX_SRC)?);
//! let fs = Rc::new(Stage::fragment(&ctx, FRAGMENT_SRC)?);
//! let pipeline = Pipeline::new(&ctx, &[vs, fs])?;
//!
//! // each frame
//! pipeline.apply_frame(&FrameUniforms::from_camera(view, fov_y, near, w, h));
//! pipeline.draw(&quad);
//! ```

pub mod api;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod frame;
pub mod headless;
pub mod pipeline;
pub mod quad;
pub mod renderable;
pub mod slots;
pub mod stage;

pub use api::{DrawMode, GlApi, ProgramId, ShaderId, ShaderKind};
pub use clock::{Clock, ManualClock, ProcessClock};
pub use config::PipelineConfig;
pub use context::GpuContext;
pub use error::{PipelineError, Result};
pub use frame::FrameUniforms;
pub use pipeline::Pipeline;
pub use renderable::Renderable;
pub use slots::{Slot, SlotLocation, SlotTable};
pub use stage::Stage;
