#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

//! Shared SDK pieces for glcanvas crates: the error type, canvas config, and logging setup.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{load_typed_json, CanvasConfig};
pub use error::CanvasError;
pub use logging::{init_logging, LoggingConfig};
