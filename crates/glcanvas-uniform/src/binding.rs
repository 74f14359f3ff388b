use std::any::Any;

use glcanvas_core::CanvasError;

use crate::kind::AttributeKind;
use crate::live::{Live, LiveRef, ReferenceHandle};
use crate::value::{Uniform, UniformValue};

/// What a declaration is bound to: a snapshot taken at declaration time, or a live cell
/// re-read at every resolution.
#[derive(Debug, Clone)]
pub enum UniformBinding {
    Value(UniformValue),
    Reference(ReferenceHandle),
}

impl UniformBinding {
    pub fn kind(&self) -> AttributeKind {
        match self {
            UniformBinding::Value(v) => v.kind(),
            UniformBinding::Reference(r) => r.kind(),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, UniformBinding::Reference(_))
    }
}

impl<T: Uniform> From<T> for UniformBinding {
    fn from(value: T) -> Self {
        UniformBinding::Value(value.into_value())
    }
}

impl<T: Uniform> From<&Live<T>> for UniformBinding {
    fn from(live: &Live<T>) -> Self {
        UniformBinding::Reference(T::into_reference(live.downgrade()))
    }
}

impl<T: Uniform> From<LiveRef<T>> for UniformBinding {
    fn from(handle: LiveRef<T>) -> Self {
        UniformBinding::Reference(T::into_reference(handle))
    }
}

impl From<UniformValue> for UniformBinding {
    fn from(value: UniformValue) -> Self {
        UniformBinding::Value(value)
    }
}

impl From<ReferenceHandle> for UniformBinding {
    fn from(handle: ReferenceHandle) -> Self {
        UniformBinding::Reference(handle)
    }
}

/// `(kind, is_reference)` of a typed binding.
pub fn classify(binding: &UniformBinding) -> (AttributeKind, bool) {
    (binding.kind(), binding.is_reference())
}

/// `(kind, is_reference)` of an arbitrary value.
///
/// Fails with [`CanvasError::UnsupportedType`] for anything outside the closed set of uniform
/// types and live handles to them.
pub fn classify_any<V: Any>(value: &V) -> Result<(AttributeKind, bool), CanvasError> {
    binding_from_any(value).map(|b| classify(&b))
}

macro_rules! define_binding_from_any {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// Builds a binding from an arbitrary value by downcasting against every supported type,
        /// `Live<T>` and `LiveRef<T>`.
        pub fn binding_from_any<V: Any>(value: &V) -> Result<UniformBinding, CanvasError> {
            let any = value as &dyn Any;
            $(
                if let Some(v) = any.downcast_ref::<$ty>() {
                    return Ok(UniformBinding::from(*v));
                }
                if let Some(live) = any.downcast_ref::<Live<$ty>>() {
                    return Ok(UniformBinding::from(live));
                }
                if let Some(handle) = any.downcast_ref::<LiveRef<$ty>>() {
                    return Ok(UniformBinding::from(handle.clone()));
                }
            )*
            if let Some(v) = any.downcast_ref::<UniformValue>() {
                return Ok(UniformBinding::Value(*v));
            }
            if let Some(b) = any.downcast_ref::<UniformBinding>() {
                return Ok(b.clone());
            }
            Err(CanvasError::UnsupportedType {
                type_name: std::any::type_name::<V>(),
            })
        }
    };
}

for_each_uniform_type!(define_binding_from_any);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Mat2x3, Mat2x4, Mat3x2, Mat3x4, Mat4x2, Mat4x3};
    use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

    fn check_value_and_live<T: Uniform + Default>(expected: AttributeKind) {
        assert_eq!(
            classify_any(&T::default()).expect("value should classify"),
            (expected, false),
            "value {}",
            std::any::type_name::<T>()
        );

        let live = Live::new(T::default());
        assert_eq!(
            classify_any(&live).expect("live should classify"),
            (expected, true),
            "live {}",
            std::any::type_name::<T>()
        );
        assert_eq!(
            classify_any(&live.downgrade()).expect("live ref should classify"),
            (expected, true)
        );
    }

    #[test]
    fn every_supported_type_classifies_to_its_kind() {
        check_value_and_live::<i32>(AttributeKind::Int);
        check_value_and_live::<f32>(AttributeKind::Float);
        check_value_and_live::<Vec2>(AttributeKind::Vec2);
        check_value_and_live::<Vec3>(AttributeKind::Vec3);
        check_value_and_live::<Vec4>(AttributeKind::Vec4);
        check_value_and_live::<Mat2>(AttributeKind::Mat2);
        check_value_and_live::<Mat2x3>(AttributeKind::Mat2x3);
        check_value_and_live::<Mat2x4>(AttributeKind::Mat2x4);
        check_value_and_live::<Mat3>(AttributeKind::Mat3);
        check_value_and_live::<Mat3x2>(AttributeKind::Mat3x2);
        check_value_and_live::<Mat3x4>(AttributeKind::Mat3x4);
        check_value_and_live::<Mat4>(AttributeKind::Mat4);
        check_value_and_live::<Mat4x2>(AttributeKind::Mat4x2);
        check_value_and_live::<Mat4x3>(AttributeKind::Mat4x3);
    }

    #[test]
    fn unsupported_types_are_rejected_with_their_name() {
        let cases: Vec<Result<(AttributeKind, bool), CanvasError>> = vec![
            classify_any(&1u32),
            classify_any(&1.0f64),
            classify_any(&"u_time"),
            classify_any(&[1.0f32, 2.0]),
            classify_any(&glam::DVec2::ZERO),
        ];
        for res in cases {
            let err = res.expect_err("unsupported type must fail");
            assert!(
                matches!(err, CanvasError::UnsupportedType { .. }),
                "unexpected err: {err:?}"
            );
        }

        let err = classify_any(&1u64).unwrap_err();
        assert!(err.to_string().contains("u64"), "got: {err}");
    }

    #[test]
    fn typed_conversions_pick_value_or_reference() {
        let live = Live::new(0.2f32);
        assert_eq!(classify(&UniformBinding::from(&live)), (AttributeKind::Float, true));
        assert_eq!(
            classify(&UniformBinding::from(Mat3::IDENTITY)),
            (AttributeKind::Mat3, false)
        );
    }
}
