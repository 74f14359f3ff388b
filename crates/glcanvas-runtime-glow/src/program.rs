use std::fmt;
use std::thread::{self, ThreadId};

use glcanvas_uniform::{default_vertex_format, AttributeFormat, Resolved, UniformValue};

use crate::driver::GraphicsDriver;
use crate::shaders::{DEFAULT_FRAGMENT_SHADER, DEFAULT_VERTEX_SHADER};
use crate::CanvasError;

struct LinkedProgram<D: GraphicsDriver> {
    program: D::Program,
    uniform_format: AttributeFormat,
    locations: Vec<Option<D::Location>>,
    last_uploaded: Vec<Option<UniformValue>>,
}

impl<D: GraphicsDriver> LinkedProgram<D> {
    // Resolved values arrive in table order, which matches the linked format unless the table
    // changed since the last rebuild.
    fn slot(&self, index: usize, name: &str) -> Option<usize> {
        match self.uniform_format.0.get(index) {
            Some(attr) if attr.name == name => Some(index),
            _ => self.uniform_format.position(name),
        }
    }
}

/// Owns the shader sources and the linked program of one canvas.
///
/// Programs are replaced, never mutated: [`rebuild`](Self::rebuild) links a new one and only
/// then deletes the old one. Every driver-touching call must run on the thread that created
/// the manager.
pub struct ShaderProgramManager<D: GraphicsDriver> {
    vertex_src: String,
    fragment_src: String,
    vertex_format: AttributeFormat,
    linked: Option<LinkedProgram<D>>,
    generation: u64,
    owner: ThreadId,
}

impl<D: GraphicsDriver> ShaderProgramManager<D> {
    /// Manager with the default canvas shaders and vertex format. Nothing is compiled yet.
    pub fn new() -> Self {
        Self::with_sources(DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER)
    }

    pub fn with_sources(vertex_src: impl Into<String>, fragment_src: impl Into<String>) -> Self {
        Self {
            vertex_src: vertex_src.into(),
            fragment_src: fragment_src.into(),
            vertex_format: default_vertex_format(),
            linked: None,
            generation: 0,
            owner: thread::current().id(),
        }
    }

    /// Replaces the vertex source. Takes effect at the next [`rebuild`](Self::rebuild).
    pub fn set_vertex_source(&mut self, src: impl Into<String>) -> String {
        std::mem::replace(&mut self.vertex_src, src.into())
    }

    /// Replaces the fragment source. Takes effect at the next [`rebuild`](Self::rebuild).
    pub fn set_fragment_source(&mut self, src: impl Into<String>) -> String {
        std::mem::replace(&mut self.fragment_src, src.into())
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex_src
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_src
    }

    pub fn vertex_format(&self) -> &AttributeFormat {
        &self.vertex_format
    }

    /// Handle of the active program, if one has been linked.
    pub fn program(&self) -> Option<D::Program> {
        self.linked.as_ref().map(|l| l.program)
    }

    /// Uniform format the active program was linked against.
    pub fn linked_format(&self) -> Option<&AttributeFormat> {
        self.linked.as_ref().map(|l| &l.uniform_format)
    }

    /// Number of successful rebuilds so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn ensure_owner(&self, operation: &'static str) -> Result<(), CanvasError> {
        if thread::current().id() != self.owner {
            return Err(CanvasError::WrongThread { operation });
        }
        Ok(())
    }

    /// Compiles and links the current sources against `uniform_format`.
    ///
    /// On success the new program becomes active and the previous one is deleted. On failure the
    /// previous program (or none, on a first build) stays active and the driver log is returned.
    pub fn rebuild(
        &mut self,
        driver: &mut D,
        uniform_format: &AttributeFormat,
    ) -> Result<D::Program, CanvasError> {
        self.ensure_owner("ShaderProgramManager::rebuild")?;

        let program =
            match driver.compile_program(&self.vertex_src, &self.fragment_src, &self.vertex_format)
            {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(error = %e, "shader rebuild failed, keeping previous program");
                    return Err(e);
                }
            };

        let locations: Vec<_> = uniform_format
            .iter()
            .map(|attr| driver.uniform_location(program, &attr.name))
            .collect();
        for (attr, loc) in uniform_format.iter().zip(&locations) {
            if loc.is_none() {
                tracing::debug!(uniform = %attr.name, kind = %attr.kind, "uniform inactive in program");
            }
        }

        let linked = LinkedProgram {
            program,
            uniform_format: uniform_format.clone(),
            last_uploaded: vec![None; locations.len()],
            locations,
        };
        if let Some(old) = self.linked.replace(linked) {
            driver.delete_program(old.program);
        }
        self.generation += 1;

        tracing::debug!(
            ?program,
            uniforms = uniform_format.len(),
            generation = self.generation,
            "shader program rebuilt"
        );
        Ok(program)
    }

    /// Binds the active program and uploads every resolved value.
    ///
    /// Values equal to the last upload for the same program are skipped. Uniforms the program
    /// does not use, or that were declared after the last rebuild, are ignored.
    pub fn upload(&mut self, driver: &mut D, resolved: &Resolved<'_>) -> Result<(), CanvasError> {
        self.ensure_owner("ShaderProgramManager::upload")?;

        let linked = self
            .linked
            .as_mut()
            .ok_or_else(|| CanvasError::other("upload: no program has been linked"))?;
        driver.use_program(Some(linked.program));

        for (index, (name, value)) in resolved.iter().enumerate() {
            let Some(slot) = linked.slot(index, name) else {
                continue;
            };
            if linked.uniform_format.0[slot].kind != value.kind() {
                tracing::warn!(uniform = name, "kind changed since last rebuild, skipping upload");
                continue;
            }
            let Some(location) = &linked.locations[slot] else {
                continue;
            };
            if linked.last_uploaded[slot].as_ref() == Some(value) {
                continue;
            }
            driver.upload_uniform(location, value);
            linked.last_uploaded[slot] = Some(*value);
            tracing::trace!(uniform = name, "uploaded");
        }
        Ok(())
    }

    /// Deletes the active program.
    pub fn destroy(&mut self, driver: &mut D) -> Result<(), CanvasError> {
        self.ensure_owner("ShaderProgramManager::destroy")?;
        if let Some(old) = self.linked.take() {
            driver.use_program(None);
            driver.delete_program(old.program);
        }
        Ok(())
    }
}

impl<D: GraphicsDriver> Default for ShaderProgramManager<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: GraphicsDriver> fmt::Debug for ShaderProgramManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgramManager")
            .field("program", &self.program())
            .field("linked_format", &self.linked_format())
            .field("generation", &self.generation)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
