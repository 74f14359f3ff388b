//! glcanvas runtime (glow/OpenGL backend)
//
// This crate contains the driver-facing half of a canvas:
// - compile/link the canvas program and relink it when the uniform format changes
// - upload resolved uniform values before each draw
// - marshal graphics calls onto the thread that owns the context
//
// It does NOT contain windowing, input, file IO, or drawing primitives; the host issues its own
// draw calls once `Canvas::prepare_draw` has bound the program.
#![allow(clippy::missing_safety_doc)]
#![deny(missing_debug_implementations)]

pub mod canvas;
pub mod driver;
pub mod glow_driver;
pub mod program;
pub mod shaders;
pub mod thread;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use glcanvas_core::CanvasError;

pub use canvas::{Canvas, CanvasUniforms};
pub use driver::GraphicsDriver;
pub use glow_driver::{compile_program, GlowDriver};
pub use program::ShaderProgramManager;
pub use shaders::{DEFAULT_FRAGMENT_SHADER, DEFAULT_VERTEX_SHADER};
pub use thread::{RenderThread, RenderThreadHandle};
