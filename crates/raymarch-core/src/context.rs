//! Rendering context: the GL backend plus the state shared by every pipeline
//! built against it.
//!
//! Each context tracks which program is current so that consecutive setters
//! and draws on the same pipeline issue a single `use_program`. Independent
//! contexts (tests, separate canvases) never see each other's state.

use std::cell::Cell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use tracing::trace;

use crate::api::{GlApi, ProgramId};
use crate::clock::{Clock, ProcessClock};

pub struct GpuContext<A: GlApi> {
    api: A,
    active: Cell<Option<ProgramId>>,
    clock: Box<dyn Clock>,
}

impl<A: GlApi> Debug for GpuContext<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext")
            .field("active", &self.active.get())
            .finish()
    }
}

impl<A: GlApi> GpuContext<A> {
    /// Wrap a backend, timing `u_Time` from process start.
    pub fn new(api: A) -> Rc<Self> {
        Self::with_clock(api, ProcessClock::start())
    }

    pub fn with_clock(api: A, clock: impl Clock + 'static) -> Rc<Self> {
        Rc::new(Self {
            api,
            active: Cell::new(None),
            clock: Box::new(clock),
        })
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Program this context last made current, if it still knows it.
    pub fn active_program(&self) -> Option<ProgramId> {
        self.active.get()
    }

    /// Make `program` current unless it already is. Returns whether a GL
    /// call was issued.
    pub(crate) fn activate(&self, program: ProgramId) -> bool {
        if self.active.get() == Some(program) {
            return false;
        }
        trace!(program = program.0, "use_program");
        self.api.use_program(Some(program));
        self.active.set(Some(program));
        true
    }

    /// Forget the cached program without touching GL.
    ///
    /// Call after foreign code (a host, another GL wrapper) changed the
    /// current program, so the next activation is issued for real.
    pub fn invalidate_active(&self) {
        self.active.set(None);
    }

    /// Unbind any program and clear the cache.
    pub fn release_active(&self) {
        self.api.use_program(None);
        self.active.set(None);
    }

    /// Drop the cached identity if it names `program`. Program names are
    /// recycled by drivers, so a stale entry could mask a later activation.
    pub(crate) fn forget(&self, program: ProgramId) {
        if self.active.get() == Some(program) {
            self.active.set(None);
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::headless::{Command, HeadlessGl};

    #[test]
    fn activation_is_cached() {
        let ctx = GpuContext::new(HeadlessGl::new());
        assert!(ctx.activate(ProgramId(7)));
        assert!(!ctx.activate(ProgramId(7)));
        assert_eq!(ctx.active_program(), Some(ProgramId(7)));
        assert_eq!(ctx.api().count(|c| matches!(c, Command::UseProgram(_))), 1);
    }

    #[test]
    fn invalidate_forces_reissue() {
        let ctx = GpuContext::new(HeadlessGl::new());
        ctx.activate(ProgramId(3));
        ctx.invalidate_active();
        assert_eq!(ctx.active_program(), None);
        assert!(ctx.activate(ProgramId(3)));
    }

    #[test]
    fn release_unbinds() {
        let ctx = GpuContext::new(HeadlessGl::new());
        ctx.activate(ProgramId(3));
        ctx.release_active();
        assert_eq!(ctx.active_program(), None);
        assert_eq!(
            ctx.api().commands().last(),
            Some(&Command::UseProgram(None))
        );
    }

    #[test]
    fn forget_only_clears_matching() {
        let ctx = GpuContext::new(HeadlessGl::new());
        ctx.activate(ProgramId(3));
        ctx.forget(ProgramId(4));
        assert_eq!(ctx.active_program(), Some(ProgramId(3)));
        ctx.forget(ProgramId(3));
        assert_eq!(ctx.active_program(), None);
    }

    #[test]
    fn reads_injected_clock() {
        let ctx = GpuContext::with_clock(HeadlessGl::new(), ManualClock::new(42.0));
        assert_eq!(ctx.elapsed_ms(), 42.0);
    }
}
