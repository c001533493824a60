//! bgfx-slang - Shader binary containers from Slang programs.
//!
//! This crate turns a shader program, compiled and reflected by a Slang-style
//! front end, into the versioned binary container the bgfx runtime loads.
//! One container is produced per (entry point, target) pair, carrying the
//! stage magic, input/output fingerprints, the uniform table and the code:
//! DXBC or SPIR-V bytecode, or GLSL text decompiled from SPIR-V.
//!
//! # Primary Usage
//!
//! ```ignore
//! use bgfx_slang::compiler::Compiler;
//! use bgfx_slang::writer::BufferWriter;
//!
//! let mut compiler = Compiler::new(front_end).with_decompiler(decompiler);
//! compiler.add_target("spirv", Vec::new())?;
//! compiler.load_program_from_path("cubes.slang")?;
//!
//! let mut container = BufferWriter::new();
//! compiler.compile(0, 0, &mut container)?;
//! ```
//!
//! # Architecture
//!
//! - [`core`] - Front-end adaptor traits, reflection tree, status and errors
//! - [`target`] - Target profile registry and per-stage compiler options
//! - [`reflect`] - Param, uniform and texture extraction
//! - [`hash`] - Stage compatibility fingerprints
//! - [`container`] - Container encoding
//! - [`glsl`] - Decompiler interface and GLSL post-processing
//! - [`compiler`] - Session building and compile orchestration
//! - [`writer`] - Output sinks (memory, file, C array)
//! - [`driver`] - Command-line driver
//! - [`test_front_end`] - In-memory front end and decompiler

pub mod compiler;
pub mod container;
pub mod core;
pub mod driver;
pub mod glsl;
pub mod hash;
pub mod reflect;
pub mod target;
pub mod test_front_end;
pub mod writer;

pub use crate::core::{
    CompileError, CompileResult, Diagnostics, EntryPoint, FrontEnd, FrontEndSession,
    GlobalSession, LinkedProgram, Stage, Status,
};
pub use compiler::Compiler;
pub use container::{ContainerEncoder, ContainerHeader, Magic, Payload};
pub use glsl::{DecompiledModule, Decompiler};
pub use reflect::{Attrib, Param, Uniform, UniformType};
pub use target::{find_profile, OutputKind, TargetProfile, TargetSettings};
pub use writer::{Bin2cWriter, BufferWriter, FileSink, FileWriter, Writer};
