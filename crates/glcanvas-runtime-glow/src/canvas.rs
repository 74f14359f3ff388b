use std::any::Any;
use std::fmt;

use glam::{Mat3, Vec4};

use glcanvas_core::CanvasConfig;
use glcanvas_uniform::{Live, UniformBinding, UniformResolver, UniformTable};

use crate::driver::GraphicsDriver;
use crate::program::ShaderProgramManager;
use crate::CanvasError;

/// Canvas-owned storage behind the built-in uniforms.
///
/// The canvas declares each of these by reference, so writes here are visible at the next draw
/// without re-declaring anything.
#[derive(Debug, Clone)]
pub struct CanvasUniforms {
    /// `u_transform`
    pub transform: Live<Mat3>,
    /// `u_colormask`
    pub color_mask: Live<Vec4>,
    /// `u_bounds`: `(min_x, min_y, width, height)`
    pub bounds: Live<Vec4>,
    /// `u_texbounds`: `(min_x, min_y, width, height)` of the sampled texture region
    pub tex_bounds: Live<Vec4>,
}

impl CanvasUniforms {
    fn new(bounds: [f32; 4]) -> Self {
        Self {
            transform: Live::new(Mat3::IDENTITY),
            color_mask: Live::new(Vec4::ONE),
            bounds: Live::new(bounds_vec(bounds)),
            tex_bounds: Live::new(Vec4::ZERO),
        }
    }
}

fn bounds_vec([min_x, min_y, max_x, max_y]: [f32; 4]) -> Vec4 {
    Vec4::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// A render target's shader program plus its uniform set.
///
/// Policy: eager rebuild. Any [`declare`](Self::declare) that changes the attribute format, and
/// any source change, relinks before returning. A failed relink keeps the previous program and
/// the previous source text.
pub struct Canvas<D: GraphicsDriver> {
    uniforms: CanvasUniforms,
    table: UniformTable,
    shader: ShaderProgramManager<D>,
    resolver: UniformResolver,
    built_revision: Option<u64>,
}

impl<D: GraphicsDriver> Canvas<D> {
    /// Creates a canvas over `bounds` (`[min_x, min_y, max_x, max_y]`) and links the default
    /// shaders.
    pub fn new(driver: &mut D, bounds: [f32; 4]) -> Result<Self, CanvasError> {
        let uniforms = CanvasUniforms::new(bounds);

        let mut table = UniformTable::new();
        table.declare("u_transform", &uniforms.transform);
        table.declare("u_colormask", &uniforms.color_mask);
        table.declare("u_bounds", &uniforms.bounds);
        table.declare("u_texbounds", &uniforms.tex_bounds);

        let mut canvas = Self {
            uniforms,
            table,
            shader: ShaderProgramManager::new(),
            resolver: UniformResolver::new(),
            built_revision: None,
        };
        canvas.rebuild(driver)?;
        Ok(canvas)
    }

    pub fn from_config(driver: &mut D, config: &CanvasConfig) -> Result<Self, CanvasError> {
        config.validate().map_err(CanvasError::Other)?;
        let canvas = Self::new(driver, config.bounds)?;
        canvas
            .uniforms
            .transform
            .set(Mat3::from_cols_array(&config.transform));
        canvas
            .uniforms
            .color_mask
            .set(Vec4::from_array(config.color_mask));
        Ok(canvas)
    }

    /// Declares or overwrites a uniform, relinking if the attribute format changed.
    ///
    /// Pass a value to snapshot it, or `&Live<T>` to have every draw read the current value.
    pub fn declare(
        &mut self,
        driver: &mut D,
        name: impl Into<String>,
        binding: impl Into<UniformBinding>,
    ) -> Result<(), CanvasError> {
        self.table.declare(name, binding);
        self.rebuild_if_stale(driver)
    }

    /// [`declare`](Self::declare) for a value whose type is only known at runtime.
    pub fn declare_any<V: Any>(
        &mut self,
        driver: &mut D,
        name: impl Into<String>,
        value: &V,
    ) -> Result<(), CanvasError> {
        self.table.declare_any(name, value)?;
        self.rebuild_if_stale(driver)
    }

    pub fn set_fragment_source(
        &mut self,
        driver: &mut D,
        src: impl Into<String>,
    ) -> Result<(), CanvasError> {
        let previous = self.shader.set_fragment_source(src);
        if let Err(e) = self.rebuild(driver) {
            self.shader.set_fragment_source(previous);
            return Err(e);
        }
        Ok(())
    }

    pub fn set_vertex_source(
        &mut self,
        driver: &mut D,
        src: impl Into<String>,
    ) -> Result<(), CanvasError> {
        let previous = self.shader.set_vertex_source(src);
        if let Err(e) = self.rebuild(driver) {
            self.shader.set_vertex_source(previous);
            return Err(e);
        }
        Ok(())
    }

    /// Relinks against the current table, even if nothing changed.
    pub fn rebuild(&mut self, driver: &mut D) -> Result<(), CanvasError> {
        let format = self.table.attribute_format();
        self.shader.rebuild(driver, &format)?;
        self.built_revision = Some(self.table.format_revision());
        Ok(())
    }

    fn rebuild_if_stale(&mut self, driver: &mut D) -> Result<(), CanvasError> {
        if self.built_revision == Some(self.table.format_revision()) {
            return Ok(());
        }
        self.rebuild(driver)
    }

    pub fn set_matrix(&self, transform: Mat3) {
        self.uniforms.transform.set(transform);
    }

    pub fn set_color_mask(&self, mask: Vec4) {
        self.uniforms.color_mask.set(mask);
    }

    /// `[min_x, min_y, max_x, max_y]`
    pub fn set_bounds(&self, bounds: [f32; 4]) {
        self.uniforms.bounds.set(bounds_vec(bounds));
    }

    /// `[min_x, min_y, max_x, max_y]` of the texture region sampled by textured vertices.
    pub fn set_texture_bounds(&self, bounds: [f32; 4]) {
        self.uniforms.tex_bounds.set(bounds_vec(bounds));
    }

    pub fn uniforms(&self) -> &CanvasUniforms {
        &self.uniforms
    }

    pub fn table(&self) -> &UniformTable {
        &self.table
    }

    pub fn shader(&self) -> &ShaderProgramManager<D> {
        &self.shader
    }

    pub fn program(&self) -> Option<D::Program> {
        self.shader.program()
    }

    /// Binds the program and uploads the current value of every uniform.
    ///
    /// Call right before issuing draw calls. References are re-read on every call.
    pub fn prepare_draw(&mut self, driver: &mut D) -> Result<(), CanvasError> {
        self.rebuild_if_stale(driver)?;
        let resolved = self.resolver.resolve(&self.table)?;
        self.shader.upload(driver, &resolved)
    }

    /// [`prepare_draw`](Self::prepare_draw), then `draw` with the program bound.
    pub fn draw_with<R, F>(&mut self, driver: &mut D, draw: F) -> Result<R, CanvasError>
    where
        F: FnOnce(&mut D) -> R,
    {
        self.prepare_draw(driver)?;
        Ok(draw(driver))
    }

    /// Deletes the program.
    pub fn destroy(mut self, driver: &mut D) -> Result<(), CanvasError> {
        self.shader.destroy(driver)
    }
}

impl<D: GraphicsDriver> fmt::Debug for Canvas<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("uniforms", &self.uniforms)
            .field("table", &self.table)
            .field("shader", &self.shader)
            .field("built_revision", &self.built_revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDriver;
    use glcanvas_uniform::{AttributeKind, UniformValue};

    fn canvas(driver: &mut RecordingDriver) -> Canvas<RecordingDriver> {
        Canvas::new(driver, [0.0, 0.0, 600.0, 310.0]).expect("default shaders link")
    }

    #[test]
    fn builtin_uniforms_are_declared_by_reference() {
        let mut driver = RecordingDriver::new();
        let c = canvas(&mut driver);

        let names: Vec<_> = c.table().iter().map(|d| (d.name(), d.kind())).collect();
        assert_eq!(
            names,
            [
                ("u_transform", AttributeKind::Mat3),
                ("u_colormask", AttributeKind::Vec4),
                ("u_bounds", AttributeKind::Vec4),
                ("u_texbounds", AttributeKind::Vec4),
            ]
        );
        assert!(c.table().iter().all(|d| d.is_reference()));
        assert!(c.program().is_some());
    }

    #[test]
    fn canvas_setters_reach_the_next_draw() {
        let mut driver = RecordingDriver::new();
        let mut c = canvas(&mut driver);

        c.prepare_draw(&mut driver).expect("draw 1");
        assert_eq!(
            driver.last_upload("u_bounds"),
            Some(UniformValue::Vec4(Vec4::new(0.0, 0.0, 600.0, 310.0)))
        );
        assert_eq!(driver.last_upload("u_colormask"), Some(UniformValue::Vec4(Vec4::ONE)));

        c.set_bounds([10.0, 20.0, 110.0, 70.0]);
        c.set_matrix(Mat3::from_translation(glam::Vec2::new(300.0, 300.0)));
        c.prepare_draw(&mut driver).expect("draw 2");
        assert_eq!(
            driver.last_upload("u_bounds"),
            Some(UniformValue::Vec4(Vec4::new(10.0, 20.0, 100.0, 50.0)))
        );
        assert_eq!(
            driver.last_upload("u_transform"),
            Some(UniformValue::Mat3(Mat3::from_translation(glam::Vec2::new(300.0, 300.0))))
        );
    }

    #[test]
    fn value_only_redeclare_does_not_relink() {
        let mut driver = RecordingDriver::new();
        let mut c = canvas(&mut driver);
        c.declare(&mut driver, "u_time", 0.0f32).expect("declare");
        let generation = c.shader().generation();
        let compiles = driver.compile_calls();

        c.declare(&mut driver, "u_time", 1.0f32).expect("redeclare");
        assert_eq!(c.shader().generation(), generation);
        assert_eq!(driver.compile_calls(), compiles);

        c.declare(&mut driver, "u_time", 1i32).expect("kind change");
        assert_eq!(c.shader().generation(), generation + 1);
    }

    #[test]
    fn failed_source_change_restores_previous_source() {
        let mut driver = RecordingDriver::new();
        let mut c = canvas(&mut driver);
        let program = c.program();
        let original = c.shader().fragment_source().to_string();

        let err = c
            .set_fragment_source(&mut driver, "#error does not compile")
            .expect_err("must fail");
        assert!(err.is_shader_compilation());
        assert_eq!(c.program(), program);
        assert_eq!(c.shader().fragment_source(), original);

        // Later format changes still link against the last good source.
        c.declare(&mut driver, "u_amount", 0.2f32).expect("relink with restored source");
    }

    #[test]
    fn failed_vertex_change_restores_previous_source() {
        let mut driver = RecordingDriver::new();
        let mut c = canvas(&mut driver);
        let program = c.program();
        let original = c.shader().vertex_source().to_string();

        let err = c
            .set_vertex_source(&mut driver, "#version 330 core\n#error no main\n")
            .expect_err("must fail");
        assert!(matches!(err, CanvasError::VertexCompile(_)), "got {err:?}");
        assert_eq!(c.program(), program);
        assert_eq!(c.shader().vertex_source(), original);

        let generation = c.shader().generation();
        c.declare(&mut driver, "u_amount", 0.2f32).expect("relink with restored source");
        assert_eq!(c.shader().generation(), generation + 1);
    }

    #[test]
    fn draw_with_runs_after_upload() {
        let mut driver = RecordingDriver::new();
        let mut c = canvas(&mut driver);
        let bound = c
            .draw_with(&mut driver, |d| d.bound_program())
            .expect("draw");
        assert_eq!(bound, c.program());
    }

    #[test]
    fn from_config_applies_defaults() {
        let mut driver = RecordingDriver::new();
        let mut cfg = CanvasConfig::new([0.0, 0.0, 100.0, 100.0]);
        cfg.color_mask = [0.5, 0.5, 0.5, 1.0];
        let c = Canvas::from_config(&mut driver, &cfg).expect("canvas");
        assert_eq!(c.uniforms().color_mask.get(), Vec4::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(c.uniforms().transform.get(), Mat3::IDENTITY);

        let bad = CanvasConfig::new([0.0, 0.0, 0.0, 100.0]);
        assert!(Canvas::from_config(&mut driver, &bad).is_err());
    }

    #[test]
    fn destroy_deletes_program() {
        let mut driver = RecordingDriver::new();
        let c = canvas(&mut driver);
        assert_eq!(driver.live_program_count(), 1);
        c.destroy(&mut driver).expect("destroy");
        assert_eq!(driver.live_program_count(), 0);
    }
}
