//! Compile-only compatibility crate.
//!
//! This crate exists to ensure the public SDK surface remains usable by third-party
//! consumers. It is not shipped or run; it must only build.

use glam::{Mat3, Vec2, Vec4};
use glcanvas_core::{CanvasConfig, CanvasError};
use glcanvas_runtime_glow::{
    Canvas, GlowDriver, GraphicsDriver, RenderThread, RenderThreadHandle, DEFAULT_FRAGMENT_SHADER,
};
use glcanvas_uniform::{
    classify_any, default_vertex_format, AttributeKind, Live, Mat2x3, UniformResolver,
    UniformTable, UniformValue,
};

#[allow(dead_code)]
pub fn _compile_witness() -> Result<(), CanvasError> {
    // Uniform tables build and resolve using only public APIs.
    let time = Live::new(0.0f32);
    let mut table = UniformTable::new();
    table.declare("u_time", &time);
    table.declare("u_offset", Vec2::ZERO);
    table.declare("u_skew", Mat2x3::ZERO);
    table.declare_any("u_tint", &Vec4::ONE)?;

    let _format = table.attribute_format();
    let _vertex = default_vertex_format();
    let _ = classify_any(&time)?;
    let _ = AttributeKind::Mat2x3.glsl_name();

    let mut resolver = UniformResolver::new();
    let resolved = resolver.resolve(&table)?;
    let _: Option<&UniformValue> = resolved.get("u_time");

    let _config = CanvasConfig::new([0.0, 0.0, 640.0, 480.0]);
    Ok(())
}

/// Canvas operations must stay callable through any driver, including the glow one.
#[allow(dead_code)]
pub fn _canvas_witness<D: GraphicsDriver>(driver: &mut D) -> Result<(), CanvasError> {
    let mut canvas = Canvas::new(driver, [0.0, 0.0, 640.0, 480.0])?;
    canvas.declare(driver, "u_amount", 0.5f32)?;
    canvas.set_fragment_source(driver, DEFAULT_FRAGMENT_SHADER)?;
    canvas.set_matrix(Mat3::IDENTITY);
    canvas.prepare_draw(driver)?;
    canvas.destroy(driver)
}

#[allow(dead_code)]
pub fn _glow_witness(driver: &mut GlowDriver) -> Result<(), CanvasError> {
    _canvas_witness(driver)
}

// Render-thread handles must be sendable to other threads.
#[allow(dead_code)]
fn _assert_send<T: Send>() {}

#[allow(dead_code)]
fn _thread_witness() {
    _assert_send::<RenderThreadHandle<Vec<u32>>>();
    let rt = RenderThread::new(Vec::<u32>::new());
    let _handle = rt.handle();
}
