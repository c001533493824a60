// This module serves as the hub for the infrastructure shared by every part of the shader
// container compiler. It exports the front-end adaptor traits and their descriptors, the
// owned reflection tree those adaptors produce, stage and entry point types, the lazily
// created global session handle, the three-level status with its diagnostics accumulator,
// and the thiserror-based error type. The extractors, encoder, text post-processor and
// compiler all build on these types without depending on any concrete front end.

//! Core infrastructure.
//!
//! # Key Components
//!
//! ## Front-end adaptor (`adaptor`)
//! - Traits for the external shader compiler: sessions, modules, linked programs
//! - Session and target descriptors, per-target compiler options
//!
//! ## Reflection (`reflection`)
//! - Owned, closed tagged-variant type tree
//!
//! ## Session (`session`)
//! - Explicitly initialised global session handle
//!
//! ## Status and errors (`status`, `error`)
//! - Ok / Warning status with appended diagnostics
//! - `CompileError` for everything that aborts a compile

pub mod adaptor;
pub mod entry_point;
pub mod error;
pub mod reflection;
pub mod session;
pub mod status;

pub use adaptor::{
    CodeTarget,
    CompilerOption,
    FrontEnd,
    FrontEndSession,
    LinkedProgram,
    SessionDesc,
    ShiftKind,
    TargetDesc,
};

pub use entry_point::{AttributeValue, EntryPoint, Stage, UserAttribute};

pub use error::{CompileError, CompileResult};

pub use reflection::{
    EntryPointLayout,
    ImageFormat,
    ProgramLayout,
    ResourceShape,
    ResourceType,
    ScalarType,
    StructLayout,
    TypeLayout,
    VariableLayout,
};

pub use session::GlobalSession;
pub use status::{Diagnostics, Status};
