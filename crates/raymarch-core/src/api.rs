//! Backend seam: the GL entry points the pipeline issues.
//!
//! [`GlApi`] is implemented by the native OpenGL backend in `raymarch-gl` and
//! by [`HeadlessGl`](crate::headless::HeadlessGl) for GPU-free use. Methods
//! take `&self`; backends that need bookkeeping use interior mutability, the
//! same way a GL driver hides its own state behind the current context.

use std::fmt;

/// Shader stage kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderKind::Vertex => f.write_str("vertex"),
            ShaderKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Name of a driver shader object. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

/// Name of a driver program object. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Resolved vertex attribute index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttribLocation(pub u32);

/// Resolved uniform location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

/// Primitive assembly mode for indexed draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Layout of a float vertex attribute array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatAttribLayout {
    /// Components per vertex (1..=4).
    pub components: i32,
    pub normalized: bool,
    /// Byte stride; zero means tightly packed.
    pub stride: i32,
    /// Byte offset into the bound array buffer.
    pub offset: usize,
}

/// GL command stream used by stages and pipelines.
///
/// Implementations assume the correct context is current on the calling
/// thread.
pub trait GlApi {
    /// Allocate a shader object. `None` when the driver returns no name.
    fn create_shader(&self, kind: ShaderKind) -> Option<ShaderId>;
    fn shader_source(&self, shader: ShaderId, source: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    /// Allocate a program object. `None` when the driver returns no name.
    fn create_program(&self) -> Option<ProgramId>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId);
    fn program_link_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn delete_program(&self, program: ProgramId);

    /// Look up an active attribute. `None` when the linked program has none
    /// by that name (including ones the compiler optimised out).
    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation>;
    /// Look up an active uniform. Same absence rules as [`attrib_location`](Self::attrib_location).
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Make `program` current, or unbind with `None`.
    fn use_program(&self, program: Option<ProgramId>);

    /// Upload a column-major 4x4 matrix without transposing.
    fn uniform_matrix4(&self, location: UniformLocation, cols: &[f32; 16]);
    fn uniform_1f(&self, location: UniformLocation, value: f32);

    fn enable_vertex_attrib_array(&self, location: AttribLocation);
    fn vertex_attrib_pointer(&self, location: AttribLocation, layout: FloatAttribLayout);
    fn disable_vertex_attrib_array(&self, location: AttribLocation);

    /// Indexed draw with `u32` indices read from the bound element buffer.
    fn draw_elements_u32(&self, mode: DrawMode, count: i32, offset: usize);
}
