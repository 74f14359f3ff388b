use std::fmt;

use glow::HasContext;

use glcanvas_uniform::{AttributeFormat, UniformValue};

use crate::driver::GraphicsDriver;
use crate::CanvasError;

/// Compiles and links a vertex/fragment pair.
///
/// Vertex attributes are bound to their position in `vertex_format` before linking.
pub unsafe fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
    vertex_format: &AttributeFormat,
) -> Result<glow::NativeProgram, CanvasError> {
    let vs = gl
        .create_shader(glow::VERTEX_SHADER)
        .map_err(|e| CanvasError::GlCreate(format!("create_shader(VS) failed: {e:?}")))?;
    gl.shader_source(vs, vert_src);
    gl.compile_shader(vs);
    if !gl.get_shader_compile_status(vs) {
        let log = gl.get_shader_info_log(vs);
        gl.delete_shader(vs);
        return Err(CanvasError::VertexCompile(log));
    }

    let fs = gl
        .create_shader(glow::FRAGMENT_SHADER)
        .map_err(|e| CanvasError::GlCreate(format!("create_shader(FS) failed: {e:?}")))?;
    gl.shader_source(fs, frag_src);
    gl.compile_shader(fs);
    if !gl.get_shader_compile_status(fs) {
        let log = gl.get_shader_info_log(fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        return Err(CanvasError::FragmentCompile(log));
    }

    let program = gl
        .create_program()
        .map_err(|e| CanvasError::GlCreate(format!("create_program failed: {e:?}")))?;
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    for (index, attr) in vertex_format.iter().enumerate() {
        gl.bind_attrib_location(program, index as u32, &attr.name);
    }
    gl.link_program(program);

    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);
    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(CanvasError::Link(log));
    }

    Ok(program)
}

/// Uploads one value to `location` of the bound program, matching the kind's GL entry point.
pub unsafe fn upload_value(
    gl: &glow::Context,
    location: &glow::NativeUniformLocation,
    value: &UniformValue,
) {
    let loc = Some(location);
    let f = value.as_f32_slice().unwrap_or_default();
    match value {
        UniformValue::Int(i) => gl.uniform_1_i32(loc, *i),
        UniformValue::Float(v) => gl.uniform_1_f32(loc, *v),
        UniformValue::Vec2(_) => gl.uniform_2_f32_slice(loc, f),
        UniformValue::Vec3(_) => gl.uniform_3_f32_slice(loc, f),
        UniformValue::Vec4(_) => gl.uniform_4_f32_slice(loc, f),
        UniformValue::Mat2(_) => gl.uniform_matrix_2_f32_slice(loc, false, f),
        UniformValue::Mat2x3(_) => gl.uniform_matrix_2x3_f32_slice(loc, false, f),
        UniformValue::Mat2x4(_) => gl.uniform_matrix_2x4_f32_slice(loc, false, f),
        UniformValue::Mat3(_) => gl.uniform_matrix_3_f32_slice(loc, false, f),
        UniformValue::Mat3x2(_) => gl.uniform_matrix_3x2_f32_slice(loc, false, f),
        UniformValue::Mat3x4(_) => gl.uniform_matrix_3x4_f32_slice(loc, false, f),
        UniformValue::Mat4(_) => gl.uniform_matrix_4_f32_slice(loc, false, f),
        UniformValue::Mat4x2(_) => gl.uniform_matrix_4x2_f32_slice(loc, false, f),
        UniformValue::Mat4x3(_) => gl.uniform_matrix_4x3_f32_slice(loc, false, f),
    }
}

/// [`GraphicsDriver`] over a glow/OpenGL context.
pub struct GlowDriver {
    gl: glow::Context,
}

impl GlowDriver {
    /// # Safety
    /// `gl` must be current on the calling thread, and the driver must only be used on it.
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Raw context, for the host's own draw calls.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn into_inner(self) -> glow::Context {
        self.gl
    }
}

impl fmt::Debug for GlowDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowDriver").finish_non_exhaustive()
    }
}

// SAFETY (all blocks below): `GlowDriver::new` requires the context to be current on this thread.
impl GraphicsDriver for GlowDriver {
    type Program = glow::NativeProgram;
    type Location = glow::NativeUniformLocation;

    fn compile_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
        vertex_format: &AttributeFormat,
    ) -> Result<Self::Program, CanvasError> {
        unsafe { compile_program(&self.gl, vertex_src, fragment_src, vertex_format) }
    }

    fn delete_program(&mut self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&mut self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Self::Location> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn upload_uniform(&mut self, location: &Self::Location, value: &UniformValue) {
        unsafe { upload_value(&self.gl, location, value) }
    }
}
