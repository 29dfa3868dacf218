use crate::api::ShaderKind;

/// Errors raised while building stages and pipelines.
///
/// Per-frame setters and draws never fail; only construction does.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{kind} shader failed to compile: {log}")]
    Compilation { kind: ShaderKind, log: String },

    #[error("program failed to link: {log}")]
    Link { log: String },

    #[error("driver could not allocate a {0} object")]
    Allocation(&'static str),

    #[error("invalid pipeline config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
