//! GPU-free [`GlApi`] backend that records every command it receives.
//!
//! `HeadlessGl` stands in for a driver in tests and tooling. It keeps a
//! small model of shader and program objects:
//!
//! - Compilation fails for empty source or a `#error` directive, with a
//!   driver-style info log.
//! - Linking needs every attached shader compiled plus at least one vertex
//!   and one fragment stage.
//! - A name counts as an active attribute or uniform when it appears as an
//!   identifier in an attached source (attributes: vertex sources only). A
//!   name the shaders never mention resolves as absent, which is how a real
//!   compiler reports an unused uniform.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::api::{
    AttribLocation, DrawMode, FloatAttribLayout, GlApi, ProgramId, ShaderId, ShaderKind,
    UniformLocation,
};
use crate::context::GpuContext;
use crate::quad;
use crate::renderable::Renderable;

/// A command as issued to the backend. Queries are not recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateShader(ShaderKind, ShaderId),
    ShaderSource(ShaderId),
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    AttachShader(ProgramId, ShaderId),
    LinkProgram(ProgramId),
    DeleteProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    UniformMatrix4(UniformLocation, [f32; 16]),
    Uniform1f(UniformLocation, f32),
    EnableVertexAttribArray(AttribLocation),
    VertexAttribPointer(AttribLocation, FloatAttribLayout),
    DisableVertexAttribArray(AttribLocation),
    DrawElements {
        mode: DrawMode,
        count: i32,
        offset: usize,
    },
    /// Recorded by renderables through [`HeadlessGl::record`].
    BindArrayBuffer(u32),
    /// Recorded by renderables through [`HeadlessGl::record`].
    BindElementBuffer(u32),
}

#[derive(Debug)]
struct ShaderObject {
    kind: ShaderKind,
    source: String,
    compiled: bool,
    log: String,
    deleted: bool,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<ShaderId>,
    linked: bool,
    log: String,
    attribs: Vec<String>,
    uniforms: Vec<String>,
    deleted: bool,
}

#[derive(Debug, Default)]
struct State {
    next_name: u32,
    fail_allocations: u32,
    shaders: HashMap<ShaderId, ShaderObject>,
    programs: HashMap<ProgramId, ProgramObject>,
    commands: Vec<Command>,
}

impl State {
    fn allocate(&mut self) -> Option<u32> {
        if self.fail_allocations > 0 {
            self.fail_allocations -= 1;
            return None;
        }
        self.next_name += 1;
        Some(self.next_name)
    }
}

#[derive(Debug, Default)]
pub struct HeadlessGl {
    state: RefCell<State>,
}

impl HeadlessGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` create calls return no object.
    pub fn fail_next_allocations(&self, count: u32) {
        self.state.borrow_mut().fail_allocations = count;
    }

    /// Append a command issued outside the [`GlApi`] surface.
    pub fn record(&self, command: Command) {
        self.state.borrow_mut().commands.push(command);
    }

    pub fn commands(&self) -> Vec<Command> {
        self.state.borrow().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.state.borrow_mut().commands.clear();
    }

    /// Number of recorded commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.state.borrow().commands.iter().filter(|c| pred(*c)).count()
    }

    /// Shader objects created and not yet deleted.
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.values().filter(|s| !s.deleted).count()
    }

    /// Program objects created and not yet deleted.
    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.values().filter(|p| !p.deleted).count()
    }
}

fn identifiers(source: &str) -> impl Iterator<Item = &str> {
    source
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|tok| tok.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_'))
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_owned());
    }
}

fn compile(source: &str) -> Result<(), String> {
    if source.trim().is_empty() {
        return Err("ERROR: 0:0: empty shader source".to_owned());
    }
    for (line, text) in source.lines().enumerate() {
        if let Some(message) = text.trim_start().strip_prefix("#error") {
            return Err(format!("ERROR: 0:{}: '#error' : {}", line + 1, message.trim()));
        }
    }
    Ok(())
}

impl GlApi for HeadlessGl {
    fn create_shader(&self, kind: ShaderKind) -> Option<ShaderId> {
        let mut state = self.state.borrow_mut();
        let id = ShaderId(state.allocate()?);
        state.shaders.insert(
            id,
            ShaderObject {
                kind,
                source: String::new(),
                compiled: false,
                log: String::new(),
                deleted: false,
            },
        );
        state.commands.push(Command::CreateShader(kind, id));
        Some(id)
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(obj) = state.shaders.get_mut(&shader) {
            obj.source = source.to_owned();
        }
        state.commands.push(Command::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        if let Some(obj) = state.shaders.get_mut(&shader) {
            match compile(&obj.source) {
                Ok(()) => {
                    obj.compiled = true;
                    obj.log.clear();
                }
                Err(log) => {
                    obj.compiled = false;
                    obj.log = log;
                }
            }
        }
        state.commands.push(Command::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        if let Some(obj) = state.shaders.get_mut(&shader) {
            obj.deleted = true;
        }
        state.commands.push(Command::DeleteShader(shader));
    }

    fn create_program(&self) -> Option<ProgramId> {
        let mut state = self.state.borrow_mut();
        let id = ProgramId(state.allocate()?);
        state.programs.insert(id, ProgramObject::default());
        state.commands.push(Command::CreateProgram(id));
        Some(id)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        if let Some(obj) = state.programs.get_mut(&program) {
            obj.attached.push(shader);
        }
        state.commands.push(Command::AttachShader(program, shader));
    }

    fn link_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        state.commands.push(Command::LinkProgram(program));

        let attached = match state.programs.get(&program) {
            Some(obj) => obj.attached.clone(),
            None => return,
        };

        let mut log = String::new();
        let mut vertex = 0;
        let mut fragment = 0;
        let mut attribs = Vec::new();
        let mut uniforms = Vec::new();
        for id in &attached {
            let Some(shader) = state.shaders.get(id) else {
                log = format!("error: shader {} does not exist", id.0);
                break;
            };
            if !shader.compiled {
                log = format!("error: {} shader {} is not compiled", shader.kind, id.0);
                break;
            }
            for name in identifiers(&shader.source) {
                push_unique(&mut uniforms, name);
                if shader.kind == ShaderKind::Vertex {
                    push_unique(&mut attribs, name);
                }
            }
            match shader.kind {
                ShaderKind::Vertex => vertex += 1,
                ShaderKind::Fragment => fragment += 1,
            }
        }
        if log.is_empty() && vertex == 0 {
            log = "error: no vertex shader attached".to_owned();
        }
        if log.is_empty() && fragment == 0 {
            log = "error: no fragment shader attached".to_owned();
        }

        if let Some(obj) = state.programs.get_mut(&program) {
            obj.linked = log.is_empty();
            if obj.linked {
                obj.attribs = attribs;
                obj.uniforms = uniforms;
            } else {
                obj.attribs.clear();
                obj.uniforms.clear();
            }
            obj.log = log;
        }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        if let Some(obj) = state.programs.get_mut(&program) {
            obj.deleted = true;
        }
        state.commands.push(Command::DeleteProgram(program));
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<AttribLocation> {
        let state = self.state.borrow();
        let obj = state.programs.get(&program).filter(|p| p.linked)?;
        let index = obj.attribs.iter().position(|n| n == name)?;
        Some(AttribLocation(index as u32))
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let state = self.state.borrow();
        let obj = state.programs.get(&program).filter(|p| p.linked)?;
        let index = obj.uniforms.iter().position(|n| n == name)?;
        Some(UniformLocation(index as i32))
    }

    fn use_program(&self, program: Option<ProgramId>) {
        self.record(Command::UseProgram(program));
    }

    fn uniform_matrix4(&self, location: UniformLocation, cols: &[f32; 16]) {
        self.record(Command::UniformMatrix4(location, *cols));
    }

    fn uniform_1f(&self, location: UniformLocation, value: f32) {
        self.record(Command::Uniform1f(location, value));
    }

    fn enable_vertex_attrib_array(&self, location: AttribLocation) {
        self.record(Command::EnableVertexAttribArray(location));
    }

    fn vertex_attrib_pointer(&self, location: AttribLocation, layout: FloatAttribLayout) {
        self.record(Command::VertexAttribPointer(location, layout));
    }

    fn disable_vertex_attrib_array(&self, location: AttribLocation) {
        self.record(Command::DisableVertexAttribArray(location));
    }

    fn draw_elements_u32(&self, mode: DrawMode, count: i32, offset: usize) {
        self.record(Command::DrawElements { mode, count, offset });
    }
}

/// Full-screen quad for [`HeadlessGl`]: buffer binds are recorded rather
/// than issued.
#[derive(Debug)]
pub struct HeadlessQuad {
    ctx: Rc<GpuContext<HeadlessGl>>,
    position_bind_ok: bool,
}

/// Buffer names reported by [`HeadlessQuad`] binds.
pub const HEADLESS_POSITION_BUFFER: u32 = 1;
pub const HEADLESS_INDEX_BUFFER: u32 = 2;

impl HeadlessQuad {
    pub fn new(ctx: Rc<GpuContext<HeadlessGl>>) -> Self {
        Self {
            ctx,
            position_bind_ok: true,
        }
    }

    /// A quad whose position buffer bind reports failure.
    pub fn without_positions(ctx: Rc<GpuContext<HeadlessGl>>) -> Self {
        Self {
            ctx,
            position_bind_ok: false,
        }
    }
}

impl Renderable for HeadlessQuad {
    fn bind_position(&self) -> bool {
        if self.position_bind_ok {
            self.ctx
                .api()
                .record(Command::BindArrayBuffer(HEADLESS_POSITION_BUFFER));
        }
        self.position_bind_ok
    }

    fn bind_index(&self) {
        self.ctx
            .api()
            .record(Command::BindElementBuffer(HEADLESS_INDEX_BUFFER));
    }

    fn draw_mode(&self) -> DrawMode {
        quad::DRAW_MODE
    }

    fn element_count(&self) -> u32 {
        quad::INDICES.len() as u32
    }
}
