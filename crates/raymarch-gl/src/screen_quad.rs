//! Full-screen quad uploaded to GL buffers.

use std::marker::PhantomData;

use gl::types::{GLsizeiptr, GLuint};
use raymarch_core::{quad, DrawMode, Renderable};

use crate::native::NativeGl;

/// The raymarcher's only geometry: two triangles covering clip space.
///
/// Owns a vertex array, a position buffer and an index buffer, all deleted
/// on drop.
#[derive(Debug)]
pub struct ScreenQuad {
    vao: GLuint,
    positions: GLuint,
    indices: GLuint,
    _not_send: PhantomData<*const ()>,
}

impl ScreenQuad {
    /// Upload the quad. Taking `&NativeGl` ties creation to a loaded, current
    /// context.
    pub fn new(_gl: &NativeGl) -> Self {
        let mut quad = Self {
            vao: 0,
            positions: 0,
            indices: 0,
            _not_send: PhantomData,
        };

        unsafe {
            gl::GenVertexArrays(1, &mut quad.vao);
            gl::BindVertexArray(quad.vao);

            gl::GenBuffers(1, &mut quad.positions);
            gl::BindBuffer(gl::ARRAY_BUFFER, quad.positions);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(&quad::POSITIONS) as GLsizeiptr,
                quad::POSITIONS.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            gl::GenBuffers(1, &mut quad.indices);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, quad.indices);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                std::mem::size_of_val(&quad::INDICES) as GLsizeiptr,
                quad::INDICES.as_ptr().cast(),
                gl::STATIC_DRAW,
            );

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        tracing::debug!(
            vao = quad.vao,
            positions = quad.positions,
            indices = quad.indices,
            "screen quad uploaded"
        );
        quad
    }
}

impl Renderable for ScreenQuad {
    fn bind_position(&self) -> bool {
        if self.positions == 0 {
            return false;
        }
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, self.positions);
        }
        true
    }

    fn bind_index(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, self.indices);
        }
    }

    fn draw_mode(&self) -> DrawMode {
        quad::DRAW_MODE
    }

    fn element_count(&self) -> u32 {
        quad::INDICES.len() as u32
    }
}

impl Drop for ScreenQuad {
    fn drop(&mut self) {
        unsafe {
            if self.positions != 0 {
                gl::DeleteBuffers(1, &self.positions);
            }
            if self.indices != 0 {
                gl::DeleteBuffers(1, &self.indices);
            }
            if self.vao != 0 {
                gl::DeleteVertexArrays(1, &self.vao);
            }
        }
    }
}
