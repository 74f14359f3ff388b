use glcanvas_core::CanvasError;

use crate::binding::UniformBinding;
use crate::table::{UniformDecl, UniformTable};
use crate::value::UniformValue;

/// Current payload of a single declaration.
///
/// Values come back as stored. References are read through the handle, so every call sees the
/// host's latest write.
pub fn resolve_decl(decl: &UniformDecl) -> Result<UniformValue, CanvasError> {
    match decl.binding() {
        UniformBinding::Value(v) => Ok(*v),
        UniformBinding::Reference(handle) => {
            handle
                .resolve()
                .ok_or_else(|| CanvasError::DanglingReference {
                    name: decl.name().to_string(),
                    kind: handle.kind().glsl_name(),
                })
        }
    }
}

/// Per-draw resolution of a whole table.
///
/// Keeps its output buffer between frames; nothing else is carried over, so a live uniform
/// changed between two draws is always re-read.
#[derive(Debug, Default)]
pub struct UniformResolver {
    values: Vec<UniformValue>,
}

impl UniformResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every declaration in table order. Does not mutate the table.
    pub fn resolve<'t>(&'t mut self, table: &'t UniformTable) -> Result<Resolved<'t>, CanvasError> {
        self.values.clear();
        self.values.reserve(table.len());
        for decl in table.iter() {
            self.values.push(resolve_decl(decl)?);
        }
        Ok(Resolved {
            table,
            values: &self.values,
        })
    }
}

/// Output of [`UniformResolver::resolve`]: one value per declaration, in table order.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'t> {
    table: &'t UniformTable,
    values: &'t [UniformValue],
}

impl<'t> Resolved<'t> {
    pub fn iter(&self) -> impl Iterator<Item = (&'t str, &'t UniformValue)> + 't {
        self.table.iter().map(|d| d.name()).zip(self.values.iter())
    }

    pub fn get(&self, name: &str) -> Option<&'t UniformValue> {
        self.table.find(name).map(|i| &self.values[i])
    }

    pub fn values(&self) -> &'t [UniformValue] {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
