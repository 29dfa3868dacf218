use crate::error::{PipelineError, Result};

/// Divisor applied to shader time; 2.0 plays animation at half speed.
pub const DEFAULT_TIME_WARP: f32 = 2.0;

/// Tunables for a [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    time_warp: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            time_warp: DEFAULT_TIME_WARP,
        }
    }
}

impl PipelineConfig {
    /// Replace the time warp. Must be finite and positive.
    pub fn with_time_warp(mut self, time_warp: f32) -> Result<Self> {
        if !time_warp.is_finite() || time_warp <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "time warp must be finite and positive, got {time_warp}"
            )));
        }
        self.time_warp = time_warp;
        Ok(self)
    }

    pub fn time_warp(&self) -> f32 {
        self.time_warp
    }

    /// Seconds value uploaded to `u_Time` for `elapsed_ms` of wall time.
    pub fn shader_time(&self, elapsed_ms: f64) -> f32 {
        (elapsed_ms / (1000.0 * f64::from(self.time_warp))) as f32
    }
}
