use bytemuck::{Pod, Zeroable};

use crate::kind::AttributeKind;
use crate::live::{LiveRef, ReferenceHandle};

// glam only ships square matrices; the non-square ones are plain column arrays.
macro_rules! column_matrix {
    ($(#[$doc:meta])* $name:ident, $cols:literal x $rows:literal) => {
        $(#[$doc])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
        pub struct $name {
            pub cols: [[f32; $rows]; $cols],
        }

        impl $name {
            pub const ZERO: Self = Self {
                cols: [[0.0; $rows]; $cols],
            };

            pub const fn from_cols(cols: [[f32; $rows]; $cols]) -> Self {
                Self { cols }
            }

            /// Column-major components.
            pub fn as_slice(&self) -> &[f32] {
                bytemuck::cast_slice(&self.cols)
            }
        }
    };
}

column_matrix!(
    /// 2 columns, 3 rows (GLSL `mat2x3`).
    Mat2x3, 2 x 3
);
column_matrix!(
    /// 2 columns, 4 rows (GLSL `mat2x4`).
    Mat2x4, 2 x 4
);
column_matrix!(
    /// 3 columns, 2 rows (GLSL `mat3x2`).
    Mat3x2, 3 x 2
);
column_matrix!(
    /// 3 columns, 4 rows (GLSL `mat3x4`).
    Mat3x4, 3 x 4
);
column_matrix!(
    /// 4 columns, 2 rows (GLSL `mat4x2`).
    Mat4x2, 4 x 2
);
column_matrix!(
    /// 4 columns, 3 rows (GLSL `mat4x3`).
    Mat4x3, 4 x 3
);

mod sealed {
    pub trait Sealed {}
}

/// A Rust type that maps onto exactly one [`AttributeKind`].
///
/// Sealed: the set of kinds is closed, so the set of implementors is too.
pub trait Uniform: sealed::Sealed + Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    const KIND: AttributeKind;

    fn into_value(self) -> UniformValue;

    fn from_value(value: UniformValue) -> Option<Self>;

    fn into_reference(handle: LiveRef<Self>) -> ReferenceHandle;
}

macro_rules! define_values {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// A concrete uniform payload, tagged with its kind.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum UniformValue {
            $($variant($ty),)*
        }

        impl UniformValue {
            pub fn kind(&self) -> AttributeKind {
                match self {
                    $(UniformValue::$variant(_) => AttributeKind::$variant,)*
                }
            }

            /// Raw payload: `kind().byte_size()` bytes of 4-byte components, column-major.
            pub fn as_bytes(&self) -> &[u8] {
                match self {
                    $(UniformValue::$variant(v) => bytemuck::bytes_of(v),)*
                }
            }
        }

        $(
            impl sealed::Sealed for $ty {}

            impl Uniform for $ty {
                const KIND: AttributeKind = AttributeKind::$variant;

                fn into_value(self) -> UniformValue {
                    UniformValue::$variant(self)
                }

                fn from_value(value: UniformValue) -> Option<Self> {
                    match value {
                        UniformValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn into_reference(handle: LiveRef<Self>) -> ReferenceHandle {
                    ReferenceHandle::$variant(handle)
                }
            }

            impl From<$ty> for UniformValue {
                fn from(v: $ty) -> Self {
                    UniformValue::$variant(v)
                }
            }
        )*
    };
}

for_each_uniform_type!(define_values);

impl UniformValue {
    /// Float components, or `None` for `Int`.
    pub fn as_f32_slice(&self) -> Option<&[f32]> {
        match self {
            UniformValue::Int(_) => None,
            _ => Some(bytemuck::cast_slice(self.as_bytes())),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            UniformValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}
