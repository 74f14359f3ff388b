#![forbid(unsafe_code)]

//! Uniform vocabulary for a glcanvas canvas.
//!
//! This crate is **contract-only**: no GL handles, no threads, no driver calls. It classifies
//! host values into the closed set of uniform kinds, keeps the ordered name-keyed declaration
//! table, and resolves every declaration to the exact payload a backend uploads before a draw.
//!
//! Declarations bind either a snapshot value or a [`Live`] cell. A live binding holds only a
//! weak handle: the table never keeps the host's storage alive, and a binding whose storage was
//! dropped resolves to [`CanvasError::DanglingReference`].
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

// Single source of truth for the supported Rust types, one `Variant(Type)` per kind.
// Variant names match `AttributeKind` variants.
macro_rules! for_each_uniform_type {
    ($m:ident) => {
        $m! {
            Int(i32),
            Float(f32),
            Vec2(glam::Vec2),
            Vec3(glam::Vec3),
            Vec4(glam::Vec4),
            Mat2(glam::Mat2),
            Mat2x3($crate::value::Mat2x3),
            Mat2x4($crate::value::Mat2x4),
            Mat3(glam::Mat3),
            Mat3x2($crate::value::Mat3x2),
            Mat3x4($crate::value::Mat3x4),
            Mat4(glam::Mat4),
            Mat4x2($crate::value::Mat4x2),
            Mat4x3($crate::value::Mat4x3),
        }
    };
}

pub mod binding;
pub mod kind;
pub mod live;
pub mod resolve;
pub mod table;
pub mod value;

pub use glcanvas_core::CanvasError;

pub use binding::{binding_from_any, classify, classify_any, UniformBinding};
pub use kind::{default_vertex_format, Attr, AttributeFormat, AttributeKind, Scalar};
pub use live::{Live, LiveRef, ReferenceHandle};
pub use resolve::{resolve_decl, Resolved, UniformResolver};
pub use table::{UniformDecl, UniformTable};
pub use value::{Mat2x3, Mat2x4, Mat3x2, Mat3x4, Mat4x2, Mat4x3, Uniform, UniformValue};
