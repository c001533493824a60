// This module defines the error type for the shader container compiler using the thiserror
// crate. CompileError covers every way a single (entry point, target) compile can abort:
// unknown target profiles, missing targets, front-end failures while loading, linking,
// reflecting or generating code, unsupported reflection shapes (unknown semantics,
// unsupported parameter or uniform types, a global scope that is not a structure), values
// that do not fit the container's fixed-width fields, decompiler failures and I/O errors
// from output sinks. Front-end failures carry the diagnostic text the collaborator produced
// so it can be surfaced verbatim. CompileResult<T> is the convenience alias used everywhere.

//! Error types for the shader container compiler.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for a compile request.
///
/// Any of these aborts the whole (entry point, target) pair; no container is
/// written when one is returned.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Unknown target profile: {name}")]
    UnknownTarget { name: String },

    #[error("No targets specified")]
    NoTargetsConfigured,

    #[error("Target index {index} is out of range")]
    TargetIndex { index: usize },

    #[error("Entry point index {index} is out of range")]
    EntryPointIndex { index: usize },

    #[error("Entry point not found: {name}")]
    EntryPointNotFound { name: String },

    #[error("Entry point not found for stage: {stage}")]
    NoEntryPointForStage { stage: &'static str },

    #[error("Failed to open file: {}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create global session: {reason}")]
    GlobalSession { reason: String },

    #[error("Failed to create session: {reason}")]
    Session { reason: String },

    #[error("{diagnostics}")]
    ModuleLoad { diagnostics: String },

    #[error("{diagnostics}")]
    Link { diagnostics: String },

    #[error("{diagnostics}")]
    Layout { diagnostics: String },

    #[error("{diagnostics}")]
    CodeGeneration { diagnostics: String },

    #[error("Program layout has no entry point at index {index}")]
    MissingEntryPointLayout { index: usize },

    #[error("Unsupported semantic name `{semantic}` on param {field}")]
    UnsupportedSemantic { semantic: String, field: String },

    #[error("Unsupported type of param {field}")]
    UnsupportedParamType { field: String },

    #[error("Global scope is not a struct or constant buffer")]
    GlobalScopeNotStruct,

    #[error("Global scope elements are not a struct")]
    GlobalScopeElementsNotStruct,

    #[error("Unsupported uniform type for param {field}")]
    UnsupportedUniformType { field: String },

    #[error("{what} of {field} does not fit the container ({value} > {max})")]
    ValueOutOfRange {
        field: String,
        what: &'static str,
        value: usize,
        max: usize,
    },

    #[error("Unsupported stage: {stage}")]
    UnsupportedStage { stage: &'static str },

    #[error("No decompiler configured for text target {target}")]
    NoDecompiler { target: &'static str },

    #[error("Decompilation failed: {reason}")]
    Decompile { reason: String },

    #[error("Invalid rewrite pattern for {member}: {source}")]
    RewritePattern {
        member: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type alias for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_end_errors_show_diagnostics_verbatim() {
        let err = CompileError::Link {
            diagnostics: "sh.slang(3): error 30015: undefined identifier 'foo'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "sh.slang(3): error 30015: undefined identifier 'foo'"
        );
    }

    #[test]
    fn semantic_error_names_field() {
        let err = CompileError::UnsupportedSemantic {
            semantic: "FOO".to_string(),
            field: "input.bar".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("FOO"));
        assert!(msg.contains("input.bar"));
    }
}
