//! In-memory [`GraphicsDriver`] for tests that run without a GL context.
//!
//! Compilation fails when a stage's source contains the failure marker (`#error` by default, the
//! GLSL directive a real compiler rejects), or is empty. Every upload is recorded.

use std::collections::{HashMap, HashSet};

use glcanvas_uniform::{AttributeFormat, UniformValue};

use crate::driver::GraphicsDriver;
use crate::CanvasError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordedProgram(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordedLocation {
    pub program: RecordedProgram,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub program: Option<RecordedProgram>,
    pub name: String,
    pub value: UniformValue,
}

#[derive(Debug)]
pub struct RecordingDriver {
    next_program: u32,
    live: HashMap<RecordedProgram, Vec<String>>,
    bound: Option<RecordedProgram>,
    uploads: Vec<Upload>,
    inactive: HashSet<String>,
    fail_marker: String,
    compile_calls: usize,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self {
            next_program: 1,
            live: HashMap::new(),
            bound: None,
            uploads: Vec::new(),
            inactive: HashSet::new(),
            fail_marker: "#error".to_string(),
            compile_calls: 0,
        }
    }

    pub fn with_fail_marker(marker: impl Into<String>) -> Self {
        Self {
            fail_marker: marker.into(),
            ..Self::new()
        }
    }

    /// Makes `uniform_location(_, name)` return `None`, as for a uniform the compiler dropped.
    pub fn mark_inactive(&mut self, name: impl Into<String>) {
        self.inactive.insert(name.into());
    }

    pub fn is_live(&self, program: RecordedProgram) -> bool {
        self.live.contains_key(&program)
    }

    pub fn live_program_count(&self) -> usize {
        self.live.len()
    }

    pub fn bound_program(&self) -> Option<RecordedProgram> {
        self.bound
    }

    pub fn compile_calls(&self) -> usize {
        self.compile_calls
    }

    /// Vertex attribute names in bound index order.
    pub fn attribute_bindings(&self, program: RecordedProgram) -> Option<&[String]> {
        self.live.get(&program).map(|v| v.as_slice())
    }

    pub fn uploads(&self) -> &[Upload] {
        &self.uploads
    }

    pub fn last_upload(&self, name: &str) -> Option<UniformValue> {
        self.uploads
            .iter()
            .rev()
            .find(|u| u.name == name)
            .map(|u| u.value)
    }

    pub fn clear_uploads(&mut self) {
        self.uploads.clear();
    }

    fn check_stage(&self, src: &str) -> Result<(), String> {
        if src.trim().is_empty() {
            return Err("0:0: error: empty shader source".to_string());
        }
        if let Some(line) = src.lines().position(|l| l.contains(&self.fail_marker)) {
            return Err(format!("0:{}: error: {}", line + 1, self.fail_marker));
        }
        Ok(())
    }
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDriver for RecordingDriver {
    type Program = RecordedProgram;
    type Location = RecordedLocation;

    fn compile_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
        vertex_format: &AttributeFormat,
    ) -> Result<Self::Program, CanvasError> {
        self.compile_calls += 1;
        self.check_stage(vertex_src)
            .map_err(CanvasError::VertexCompile)?;
        self.check_stage(fragment_src)
            .map_err(CanvasError::FragmentCompile)?;

        let program = RecordedProgram(self.next_program);
        self.next_program += 1;
        let attrs = vertex_format.iter().map(|a| a.name.clone()).collect();
        self.live.insert(program, attrs);
        Ok(program)
    }

    fn delete_program(&mut self, program: Self::Program) {
        self.live.remove(&program);
        if self.bound == Some(program) {
            self.bound = None;
        }
    }

    fn use_program(&mut self, program: Option<Self::Program>) {
        self.bound = program;
    }

    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Self::Location> {
        if !self.is_live(program) || self.inactive.contains(name) {
            return None;
        }
        Some(RecordedLocation {
            program,
            name: name.to_string(),
        })
    }

    fn upload_uniform(&mut self, location: &Self::Location, value: &UniformValue) {
        debug_assert_eq!(self.bound, Some(location.program), "upload to unbound program");
        self.uploads.push(Upload {
            program: self.bound,
            name: location.name.clone(),
            value: *value,
        });
    }
}
