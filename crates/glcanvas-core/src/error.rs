use std::path::PathBuf;

use thiserror::Error;

/// Engine-level errors used across glcanvas crates.
///
/// Contract rule: this type lives in `glcanvas-core` and is re-exported by the uniform and
/// runtime crates, so callers only ever match on one error enum.
#[derive(Debug, Error)]
pub enum CanvasError {
    // ---- Uniform declaration / resolution ----
    /// A declared value's type is outside the closed set of uniform kinds.
    ///
    /// This is a programmer error (a missing case, not bad input data) and is never retried.
    #[error("unsupported uniform type: {type_name}")]
    UnsupportedType { type_name: &'static str },

    /// A reference-bound uniform outlived the `Live` storage it points at.
    #[error("uniform '{name}' ({kind}) references storage that was dropped")]
    DanglingReference { name: String, kind: &'static str },

    // ---- Runtime-facing (backend) ----
    #[error("vertex shader compile error: {0}")]
    VertexCompile(String),
    #[error("fragment shader compile error: {0}")]
    FragmentCompile(String),
    #[error("program link error: {0}")]
    Link(String),
    #[error("backend object creation failed: {0}")]
    GlCreate(String),

    // ---- Threading ----
    #[error("{operation} must run on the thread that owns the graphics context")]
    WrongThread { operation: &'static str },
    #[error("render thread is no longer accepting calls")]
    RenderThreadClosed,

    // ---- Config ----
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("json parse error at {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config at {}: {msg}", path.display())]
    InvalidConfig { path: PathBuf, msg: String },

    // ---- Fallback ----
    #[error("{0}")]
    Other(String),
}

impl CanvasError {
    pub fn other<T: Into<String>>(s: T) -> Self {
        CanvasError::Other(s.into())
    }

    /// True for the three ways the driver can reject a shader program.
    pub fn is_shader_compilation(&self) -> bool {
        matches!(
            self,
            CanvasError::VertexCompile(_) | CanvasError::FragmentCompile(_) | CanvasError::Link(_)
        )
    }

    /// The driver's diagnostic text, if this is a compilation error.
    pub fn driver_log(&self) -> Option<&str> {
        match self {
            CanvasError::VertexCompile(log)
            | CanvasError::FragmentCompile(log)
            | CanvasError::Link(log) => Some(log),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compilation_errors_expose_driver_log() {
        let err = CanvasError::FragmentCompile("0:3: syntax error".into());
        assert!(err.is_shader_compilation());
        assert_eq!(err.driver_log(), Some("0:3: syntax error"));
        assert!(err.to_string().starts_with("fragment shader compile error"));
    }

    #[test]
    fn non_compilation_errors_have_no_driver_log() {
        let err = CanvasError::UnsupportedType { type_name: "u64" };
        assert!(!err.is_shader_compilation());
        assert_eq!(err.driver_log(), None);
        assert_eq!(err.to_string(), "unsupported uniform type: u64");
    }
}
