//! [`GlApi`] over raw OpenGL calls.

use std::ffi::{c_void, CString};
use std::marker::PhantomData;

use gl::types::{GLboolean, GLchar, GLenum, GLint, GLsizei, GLuint};
use raymarch_core::api::{
    AttribLocation, DrawMode, FloatAttribLayout, GlApi, ProgramId, ShaderId, ShaderKind,
    UniformLocation,
};

use crate::gl_backend;

/// Raw OpenGL backend bound to the context current on the creating thread.
///
/// Not `Send`: GL contexts are thread-affine.
#[derive(Debug)]
pub struct NativeGl {
    _not_send: PhantomData<*const ()>,
}

impl NativeGl {
    /// Load GL function pointers through `gl_loader` (once per process).
    ///
    /// # Safety
    ///
    /// A GL context must be current on the calling thread for as long as
    /// this value, and everything built on it, is used.
    pub unsafe fn new() -> Self {
        gl_backend::load_gl();
        Self {
            _not_send: PhantomData,
        }
    }

    /// Use function pointers already loaded by the windowing layer.
    ///
    /// # Safety
    ///
    /// Same as [`NativeGl::new`]; additionally `gl::load_with` must have run.
    pub unsafe fn preloaded() -> Self {
        Self {
            _not_send: PhantomData,
        }
    }
}

fn shader_type(kind: ShaderKind) -> GLenum {
    match kind {
        ShaderKind::Vertex => gl::VERTEX_SHADER,
        ShaderKind::Fragment => gl::FRAGMENT_SHADER,
    }
}

pub(crate) fn draw_mode(mode: DrawMode) -> GLenum {
    match mode {
        DrawMode::Points => gl::POINTS,
        DrawMode::Lines => gl::LINES,
        DrawMode::LineStrip => gl::LINE_STRIP,
        DrawMode::Triangles => gl::TRIANGLES,
        DrawMode::TriangleStrip => gl::TRIANGLE_STRIP,
        DrawMode::TriangleFan => gl::TRIANGLE_FAN,
    }
}

/// Read an info log of `len` bytes (including the terminator).
fn read_log(len: GLint, read: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
    let mut buf = vec![0u8; len.max(1) as usize];
    let mut written: GLsizei = 0;
    read(
        buf.len() as GLsizei,
        &mut written as *mut GLsizei,
        buf.as_mut_ptr().cast::<GLchar>(),
    );
    buf.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buf).into_owned()
}

impl GlApi for NativeGl {
    fn create_shader(&self, kind: ShaderKind) -> Option<ShaderId> {
        let id = unsafe { gl::CreateShader(shader_type(kind)) };
        (id != 0).then_some(ShaderId(id))
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        let ptr = source.as_ptr().cast::<GLchar>();
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader.0, 1, &ptr, &len) };
    }

    fn compile_shader(&self, shader: ShaderId) {
        unsafe { gl::CompileShader(shader.0) };
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        let mut status = GLint::from(gl::FALSE);
        unsafe { gl::GetShaderiv(shader.0, gl::COMPILE_STATUS, &mut status) };
        status == GLint::from(gl::TRUE)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        let mut len = 0;
        unsafe { gl::GetShaderiv(shader.0, gl::INFO_LOG_LENGTH, &mut len) };
        read_log(len, |cap, written, buf| unsafe {
            gl::GetShaderInfoLog(shader.0, cap, written, buf)
        })
    }

    fn delete_shader(&self, shader: ShaderId) {
        unsafe { gl::DeleteShader(shader.0) };
    }

    fn create_program(&self) -> Option<ProgramId> {
        let id = unsafe { gl::CreateProgram() };
        (id != 0).then_some(ProgramId(id))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe { gl::AttachShader(program.0, shader.0) };
    }

    fn link_program(&self, program: ProgramId) {
        unsafe { gl::LinkProgram(program.0) };
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        let mut status = GLint::from(gl::FALSE);
        unsafe { gl::GetProgramiv(program.0, gl::LINK_STATUS, &mut status) };
        status == GLint::from(gl::TRUE)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program.0, gl::INFO_LOG_LENGTH, &mut len) };
        read_log(len, |cap, written, buf| unsafe {
            gl::GetProgramInfoLog(program.0, cap, written, buf)
        })
    }

    fn delete_program(&self, program: ProgramId) {
        unsafe { gl::DeleteProgram(program.0) };
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation> {
        let name = CString::new(name).ok()?;
        let loc = unsafe { gl::GetAttribLocation(program.0, name.as_ptr()) };
        (loc >= 0).then_some(AttribLocation(loc as GLuint))
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let name = CString::new(name).ok()?;
        let loc = unsafe { gl::GetUniformLocation(program.0, name.as_ptr()) };
        (loc >= 0).then_some(UniformLocation(loc))
    }

    fn use_program(&self, program: Option<ProgramId>) {
        unsafe { gl::UseProgram(program.map_or(0, |p| p.0)) };
    }

    fn uniform_matrix4(&self, location: UniformLocation, cols: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location.0, 1, gl::FALSE, cols.as_ptr()) };
    }

    fn uniform_1f(&self, location: UniformLocation, value: f32) {
        unsafe { gl::Uniform1f(location.0, value) };
    }

    fn enable_vertex_attrib_array(&self, location: AttribLocation) {
        unsafe { gl::EnableVertexAttribArray(location.0) };
    }

    fn vertex_attrib_pointer(&self, location: AttribLocation, layout: FloatAttribLayout) {
        let normalized: GLboolean = if layout.normalized { gl::TRUE } else { gl::FALSE };
        unsafe {
            gl::VertexAttribPointer(
                location.0,
                layout.components,
                gl::FLOAT,
                normalized,
                layout.stride,
                layout.offset as *const c_void,
            )
        };
    }

    fn disable_vertex_attrib_array(&self, location: AttribLocation) {
        unsafe { gl::DisableVertexAttribArray(location.0) };
    }

    fn draw_elements_u32(&self, mode: DrawMode, count: i32, offset: usize) {
        unsafe {
            gl::DrawElements(
                draw_mode(mode),
                count,
                gl::UNSIGNED_INT,
                offset as *const c_void,
            )
        };
    }
}
