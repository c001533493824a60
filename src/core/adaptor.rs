// This module defines the traits through which the compiler talks to the external shader
// front end (a Slang-style compiler). The front end is an external collaborator: it parses
// source text, discovers entry points, links programs against one or more target
// configurations, reflects them, and emits target code. FrontEnd creates the process-wide
// global session and per-request sessions from a SessionDesc; FrontEndSession loads a
// module from source and links it with a subset of its entry points; LinkedProgram exposes
// reflection (as the owned tree in core::reflection) and code per (entry point, target).
// Every call receives the request's Diagnostics so benign output is accumulated, while a
// failure returns the collaborator's diagnostic text as the error. The descriptors here
// (SessionDesc, TargetDesc, CompilerOption) are the only configuration a front end sees.

//! Front-end collaborator interface.
//!
//! The adaptor is the glue between this crate and a concrete shader compiler.
//! Implementations convert their native handles into the types of
//! [`reflection`](super::reflection) and report diagnostics through
//! [`Diagnostics`]. The crate ships an in-memory implementation in
//! [`test_front_end`](crate::test_front_end).

use std::path::PathBuf;

use super::reflection::ProgramLayout;
use super::status::Diagnostics;

/// Code format the front end has to produce for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTarget {
    Dxbc,
    Spirv,
}

/// Resource class a binding shift applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    UnorderedAccess = 0,
    Sampler = 1,
    ShaderResource = 2,
    ConstantBuffer = 3,
}

/// A single option handed to the front end for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilerOption {
    Optimization(u32),
    /// Shift every binding of `kind` by `shift` slots when laying out for Vulkan.
    VulkanBindShiftAll { kind: ShiftKind, shift: u32 },
    MacroDefine { name: String, value: String },
    MatrixLayoutColumnMajor,
}

/// One target configuration inside a session.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDesc {
    pub format: CodeTarget,
    /// Front-end profile identifier, e.g. `sm_5_0` or `spirv_1_3`.
    pub profile: String,
    pub options: Vec<CompilerOption>,
}

/// Everything needed to create a front-end session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionDesc {
    pub targets: Vec<TargetDesc>,
    pub search_paths: Vec<PathBuf>,
    pub column_major_matrices: bool,
}

/// Entry into the external shader compiler.
pub trait FrontEnd {
    /// Process-wide state, created once and reused.
    type GlobalSession;
    type Session: FrontEndSession;

    /// Create the global session. Called at most once per
    /// [`GlobalSession`](super::session::GlobalSession) handle.
    fn create_global_session(&self) -> Result<Self::GlobalSession, String>;

    /// Create a session for the given targets and search paths.
    fn create_session(
        &self,
        global: &Self::GlobalSession,
        desc: &SessionDesc,
    ) -> Result<Self::Session, String>;
}

/// A configured front-end session.
pub trait FrontEndSession {
    type Module;
    type Program: LinkedProgram;

    /// Parse `source` into a module named `name` as if read from `path`.
    fn load_module(
        &mut self,
        name: &str,
        path: &str,
        source: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self::Module, String>;

    /// Number of entry points the module defines.
    fn defined_entry_point_count(&self, module: &Self::Module) -> usize;

    /// Compose the module with the listed defined entry points and link.
    fn link(
        &mut self,
        module: &Self::Module,
        entry_points: &[usize],
        diagnostics: &mut Diagnostics,
    ) -> Result<Self::Program, String>;
}

/// A linked program ready for reflection and code generation.
pub trait LinkedProgram {
    fn layout(
        &self,
        target_index: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<ProgramLayout, String>;

    fn entry_point_code(
        &self,
        entry_point_index: usize,
        target_index: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<u8>, String>;
}
