use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::kind::AttributeKind;
use crate::value::{Uniform, UniformValue};

/// Host-owned storage for a uniform that changes between frames.
///
/// Cloning shares the same cell. Declaring `&live` on a canvas binds a [`LiveRef`], so the
/// canvas reads the current value at every draw without keeping the storage alive.
pub struct Live<T>(Arc<RwLock<T>>);

impl<T: Uniform> Live<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    pub fn get(&self) -> T {
        *self.0.read()
    }

    pub fn set(&self, value: T) {
        *self.0.write() = value;
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let mut guard = self.0.write();
        f(&mut *guard);
    }

    pub fn downgrade(&self) -> LiveRef<T> {
        LiveRef(Arc::downgrade(&self.0))
    }
}

impl<T> Clone for Live<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Uniform + Default> Default for Live<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Uniform> fmt::Debug for Live<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Live").field(&self.get()).finish()
    }
}

/// Non-owning handle to a [`Live`] cell.
pub struct LiveRef<T>(Weak<RwLock<T>>);

impl<T: Uniform> LiveRef<T> {
    /// Current value, or `None` once every `Live` owner has been dropped.
    pub fn get(&self) -> Option<T> {
        self.0.upgrade().map(|cell| *cell.read())
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// True if both handles point at the same cell.
    pub fn ptr_eq(&self, other: &LiveRef<T>) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl<T> Clone for LiveRef<T> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}

impl<T> fmt::Debug for LiveRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveRef")
            .field("alive", &(self.0.strong_count() > 0))
            .finish()
    }
}

macro_rules! define_references {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// A live binding, one variant per kind.
        ///
        /// The variant fixes the referenced type, so the kind recorded at declaration time always
        /// matches what resolution reads back.
        #[derive(Debug, Clone)]
        pub enum ReferenceHandle {
            $($variant(LiveRef<$ty>),)*
        }

        impl ReferenceHandle {
            pub fn kind(&self) -> AttributeKind {
                match self {
                    $(ReferenceHandle::$variant(_) => AttributeKind::$variant,)*
                }
            }

            /// Reads the current value through the handle.
            pub fn resolve(&self) -> Option<UniformValue> {
                match self {
                    $(ReferenceHandle::$variant(r) => r.get().map(UniformValue::$variant),)*
                }
            }

            pub fn is_alive(&self) -> bool {
                match self {
                    $(ReferenceHandle::$variant(r) => r.is_alive(),)*
                }
            }
        }
    };
}

for_each_uniform_type!(define_references);
