use glcanvas_uniform::{AttributeFormat, UniformValue};

use crate::CanvasError;

/// The graphics API seen from a canvas: compile/link a program, look up uniforms, upload values.
///
/// Implementations talk to a context that is current on exactly one thread. They are not `Send`
/// in practice, so a driver lives inside a [`RenderThread`](crate::RenderThread) or on the
/// host's render loop thread.
pub trait GraphicsDriver {
    type Program: Copy + Eq + std::hash::Hash + std::fmt::Debug;
    type Location: Clone + std::fmt::Debug;

    /// Compiles both stages and links them, binding each vertex attribute to its index in
    /// `vertex_format`.
    ///
    /// Failure carries the driver's info log and leaves no program object behind.
    fn compile_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
        vertex_format: &AttributeFormat,
    ) -> Result<Self::Program, CanvasError>;

    fn delete_program(&mut self, program: Self::Program);

    fn use_program(&mut self, program: Option<Self::Program>);

    /// `None` if the program has no active uniform of that name.
    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Self::Location>;

    /// Uploads to the currently bound program.
    fn upload_uniform(&mut self, location: &Self::Location, value: &UniformValue);
}
