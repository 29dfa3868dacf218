//! Wall-clock sources for the `u_Time` uniform.

use std::cell::Cell;
use std::time::Instant;

use once_cell::sync::Lazy;

static PROCESS_START: Lazy<Instant> = Lazy::new(Instant::now);

/// Source of elapsed milliseconds since some fixed start point.
pub trait Clock {
    fn elapsed_ms(&self) -> f64;
}

/// Real time since the process first touched the clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessClock;

impl ProcessClock {
    /// Pin the start instant now instead of on first read.
    pub fn start() -> Self {
        Lazy::force(&PROCESS_START);
        Self
    }
}

impl Clock for ProcessClock {
    fn elapsed_ms(&self) -> f64 {
        PROCESS_START.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand. Makes `u_Time` reproducible across runs.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    pub fn set_ms(&self, ms: f64) {
        self.now_ms.set(ms);
    }

    pub fn advance_ms(&self, delta_ms: f64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn elapsed_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn elapsed_ms(&self) -> f64 {
        (**self).elapsed_ms()
    }
}
