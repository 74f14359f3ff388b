use std::any::Any;

use glcanvas_core::CanvasError;

use crate::binding::{binding_from_any, UniformBinding};
use crate::kind::{Attr, AttributeFormat, AttributeKind};

/// One named uniform and what it is bound to.
#[derive(Debug, Clone)]
pub struct UniformDecl {
    name: String,
    binding: UniformBinding,
}

impl UniformDecl {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> &UniformBinding {
        &self.binding
    }

    pub fn kind(&self) -> AttributeKind {
        self.binding.kind()
    }

    pub fn is_reference(&self) -> bool {
        self.binding.is_reference()
    }
}

/// Ordered, name-keyed uniform declarations of one canvas.
///
/// Names are unique. Re-declaring a name replaces its binding in place; only new names append.
/// Declaration order is the order of [`UniformTable::attribute_format`].
#[derive(Debug, Clone, Default)]
pub struct UniformTable {
    decls: Vec<UniformDecl>,
    format_revision: u64,
}

impl UniformTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `name`.
    ///
    /// Bumps [`format_revision`](Self::format_revision) when the attribute format changes: a new
    /// name, or an existing name whose kind changed. Overwriting with the same kind does not.
    pub fn declare(&mut self, name: impl Into<String>, binding: impl Into<UniformBinding>) {
        let name = name.into();
        let binding = binding.into();

        match self.find(&name) {
            Some(index) => {
                let decl = &mut self.decls[index];
                if decl.binding.kind() != binding.kind() {
                    self.format_revision += 1;
                }
                decl.binding = binding;
            }
            None => {
                self.decls.push(UniformDecl { name, binding });
                self.format_revision += 1;
            }
        }
    }

    /// Like [`declare`](Self::declare) for a value whose type is only known at runtime.
    pub fn declare_any<V: Any>(
        &mut self,
        name: impl Into<String>,
        value: &V,
    ) -> Result<(), CanvasError> {
        let binding = binding_from_any(value)?;
        self.declare(name, binding);
        Ok(())
    }

    /// Position of `name` in declaration order.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.decls.iter().position(|d| d.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&UniformDecl> {
        self.decls.get(index)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&UniformDecl> {
        self.find(name).map(|i| &self.decls[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &UniformDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// `(name, kind)` of every declaration, in declaration order.
    pub fn attribute_format(&self) -> AttributeFormat {
        self.decls
            .iter()
            .map(|d| Attr::new(d.name.clone(), d.kind()))
            .collect()
    }

    /// Counter that changes exactly when [`attribute_format`](Self::attribute_format) does.
    pub fn format_revision(&self) -> u64 {
        self.format_revision
    }
}
