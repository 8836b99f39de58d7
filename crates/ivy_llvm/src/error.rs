//! Error types for the wrapper layer.

use thiserror::Error;

/// An error raised while using the LLVM wrappers.
///
/// Nearly all native faults are left on the native contract (see the
/// crate docs); these variants cover the few places the C API reports
/// failure explicitly, plus the misuse checks this layer adds.
#[derive(Debug, Error)]
pub enum LlvmError {
    #[error("unknown target triple `{triple}`: {message}")]
    TargetLookup { triple: String, message: String },

    #[error("failed to create a target machine for `{triple}`")]
    TargetMachineCreation { triple: String },

    #[error("native target initialization failed")]
    NativeTargetInit,

    #[error("function `{name}` already declared with type `{found}`, requested `{requested}`")]
    FunctionTypeMismatch {
        name: String,
        found: String,
        requested: String,
    },

    #[error("module verification failed: {0}")]
    InvalidModule(String),

    #[error("failed to write module to `{path}`: {message}")]
    ModuleWrite { path: String, message: String },

    #[error("builder error: {0}")]
    Builder(#[from] BuilderError),
}

/// An error raised by [`Builder`](crate::Builder) instruction emission.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    /// A `build_*` call was made before the builder was positioned.
    #[error("builder has no insertion position set")]
    UnsetPosition,
}

/// Result type for wrapper operations.
pub type LlvmResult<T> = Result<T, LlvmError>;
