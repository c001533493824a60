//! Tests for the session builder and compile orchestration using the
//! in-memory front end.

mod common;

use std::sync::Arc;

use bgfx_slang::compiler::Compiler;
use bgfx_slang::core::{
    CodeTarget, CompileError, CompilerOption, GlobalSession, ShiftKind, Stage, Status,
    VariableLayout,
};
use bgfx_slang::test_front_end::{
    entry_point, float4, float4x4, no_result, structure, varying, TestFrontEnd, TestShader,
};
use bgfx_slang::writer::BufferWriter;

use common::{cube_shader, init_logging, CUBE_SOURCE};

fn cube_compiler(targets: &[&str]) -> Compiler<TestFrontEnd> {
    let mut compiler = Compiler::new(TestFrontEnd::new(cube_shader()));
    for target in targets {
        compiler.add_target(target, Vec::new()).unwrap();
    }
    compiler
}

fn cb_shift(options: &[CompilerOption]) -> Option<u32> {
    options.iter().find_map(|option| match option {
        CompilerOption::VulkanBindShiftAll {
            kind: ShiftKind::ConstantBuffer,
            shift,
        } => Some(*shift),
        _ => None,
    })
}

#[test]
fn test_load_discovers_entry_points() {
    init_logging();
    let mut compiler = cube_compiler(&["dx", "spirv"]);
    let status = compiler.load_program(CUBE_SOURCE).unwrap();
    assert_eq!(status, Status::Ok);

    let names: Vec<_> = compiler.entry_points().iter().map(|ep| ep.name.as_str()).collect();
    assert_eq!(names, ["vsMain", "fsMain"]);
    assert_eq!(compiler.entry_point_by_name("fsMain").unwrap().stage, Stage::Fragment);
    assert_eq!(compiler.entry_point_by_index(1).unwrap().index, 1);
    assert!(matches!(
        compiler.entry_point_by_index(2),
        Err(CompileError::EntryPointIndex { index: 2 })
    ));
}

#[test]
fn test_discovery_session_covers_every_target() {
    init_logging();
    let mut compiler = cube_compiler(&["dx", "glsl_330"]);
    compiler.add_search_path("shaders/include");
    compiler.load_program(CUBE_SOURCE).unwrap();

    let sessions = compiler.front_end().sessions();
    assert_eq!(sessions.len(), 1);
    let desc = &sessions[0];
    assert!(desc.column_major_matrices);
    assert_eq!(desc.search_paths.len(), 1);
    assert_eq!(desc.targets.len(), 2);
    assert_eq!(desc.targets[0].format, CodeTarget::Dxbc);
    assert_eq!(desc.targets[0].profile, "sm_5_0");
    assert_eq!(desc.targets[1].format, CodeTarget::Spirv);
    assert_eq!(desc.targets[1].profile, "spirv_1_3");
}

#[test]
fn test_load_without_targets_fails() {
    init_logging();
    let mut compiler = Compiler::new(TestFrontEnd::new(cube_shader()));
    assert!(matches!(
        compiler.load_program(CUBE_SOURCE),
        Err(CompileError::NoTargetsConfigured)
    ));
    assert!(compiler.front_end().sessions().is_empty());
}

#[test]
fn test_unknown_target_is_rejected() {
    let mut compiler = Compiler::new(TestFrontEnd::new(cube_shader()));
    let err = compiler.add_target("metal", Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Unknown target profile: metal");
    assert!(compiler.targets().is_empty());
}

#[test]
fn test_compile_session_uses_stage_binding_shift() {
    init_logging();
    let mut compiler = cube_compiler(&["spirv"]);
    compiler.load_program(CUBE_SOURCE).unwrap();

    let mut out = BufferWriter::new();
    compiler.compile(0, 0, &mut out).unwrap();
    compiler.compile(1, 0, &mut out).unwrap();

    let sessions = compiler.front_end().sessions();
    assert_eq!(sessions.len(), 3, "one discovery session and one per compile");
    let vertex = &sessions[1].targets;
    let fragment = &sessions[2].targets;
    assert_eq!(vertex.len(), 1);
    assert_eq!(cb_shift(&vertex[0].options), Some(0));
    assert_eq!(cb_shift(&fragment[0].options), Some(1));
}

#[test]
fn test_caller_options_come_first() {
    init_logging();
    let mut compiler = Compiler::new(TestFrontEnd::new(cube_shader()));
    compiler
        .add_target("dx", vec![CompilerOption::MatrixLayoutColumnMajor])
        .unwrap();
    let desc = compiler.session_desc(Some((0, Stage::Vertex))).unwrap();
    assert_eq!(desc.targets[0].options[0], CompilerOption::MatrixLayoutColumnMajor);
    assert_eq!(cb_shift(&desc.targets[0].options), None);
    assert!(matches!(
        compiler.session_desc(Some((3, Stage::Vertex))),
        Err(CompileError::TargetIndex { index: 3 })
    ));
}

#[test]
fn test_global_session_created_once() {
    init_logging();
    let mut compiler = cube_compiler(&["dx"]);
    assert!(!compiler.global_session().is_initialized());
    compiler.load_program(CUBE_SOURCE).unwrap();
    let mut out = BufferWriter::new();
    compiler.compile(0, 0, &mut out).unwrap();
    compiler.compile(1, 0, &mut out).unwrap();

    assert!(compiler.global_session().is_initialized());
    assert_eq!(compiler.front_end().global_sessions_created(), 1);
}

#[test]
fn test_shared_global_session() {
    init_logging();
    let shared = Arc::new(GlobalSession::new());
    let mut first = Compiler::with_global_session(TestFrontEnd::new(cube_shader()), shared.clone());
    first.add_target("dx", Vec::new()).unwrap();
    first.load_program(CUBE_SOURCE).unwrap();

    let mut second =
        Compiler::with_global_session(TestFrontEnd::new(cube_shader()), shared.clone());
    second.add_target("spirv", Vec::new()).unwrap();
    second.load_program(CUBE_SOURCE).unwrap();

    assert_eq!(first.front_end().global_sessions_created(), 1);
    assert_eq!(second.front_end().global_sessions_created(), 0);
}

#[test]
fn test_entry_point_selection() {
    init_logging();
    let mut compiler = cube_compiler(&["dx"]);
    compiler.load_program(CUBE_SOURCE).unwrap();

    compiler.add_entry_points_for_stage(Stage::Fragment).unwrap();
    let selected: Vec<_> = compiler.entry_points().iter().map(|ep| ep.name.as_str()).collect();
    assert_eq!(selected, ["fsMain"]);

    // Position 0 of the selection links discovery index 1.
    let mut out = BufferWriter::new();
    compiler.compile(0, 0, &mut out).unwrap();
    assert_eq!(&out.as_bytes()[..3], b"FSH");

    assert!(matches!(
        compiler.add_entry_point("psMain"),
        Err(CompileError::EntryPointNotFound { .. })
    ));
    assert!(matches!(
        compiler.add_entry_points_for_stage(Stage::Compute),
        Err(CompileError::NoEntryPointForStage { stage: "cs" })
    ));
}

#[test]
fn test_reload_clears_selection() {
    init_logging();
    let mut compiler = cube_compiler(&["dx"]);
    compiler.load_program(CUBE_SOURCE).unwrap();
    compiler.add_entry_point("vsMain").unwrap();
    assert_eq!(compiler.entry_points().len(), 1);

    compiler.load_program(CUBE_SOURCE).unwrap();
    assert_eq!(compiler.entry_points().len(), 2);
}

#[test]
fn test_load_failure_returns_diagnostics() {
    init_logging();
    let front_end =
        TestFrontEnd::new(cube_shader()).with_load_error("error 30015: undefined identifier");
    let mut compiler = Compiler::new(front_end);
    compiler.add_target("dx", Vec::new()).unwrap();

    match compiler.load_program(CUBE_SOURCE) {
        Err(CompileError::ModuleLoad { diagnostics }) => {
            assert_eq!(diagnostics, "sh.slang: error 30015: undefined identifier")
        }
        other => panic!("expected a module load error, got {:?}", other),
    }
}

#[test]
fn test_missing_source_file() {
    let mut compiler = cube_compiler(&["dx"]);
    let err = compiler
        .load_program_from_path("does/not/exist.slang")
        .unwrap_err();
    assert!(matches!(err, CompileError::SourceUnreadable { .. }));
    assert!(err.to_string().starts_with("Failed to open file"));
}

#[test]
fn test_warnings_accumulate() {
    init_logging();
    let front_end = TestFrontEnd::new(cube_shader())
        .with_load_warning("warning: implicit conversion\n")
        .with_link_warning("warning: unused parameter\n");
    let mut compiler = Compiler::new(front_end);
    compiler.add_target("dx", Vec::new()).unwrap();

    let status = compiler.load_program(CUBE_SOURCE).unwrap();
    assert_eq!(
        status,
        Status::Warning("warning: implicit conversion\nwarning: unused parameter\n".to_string())
    );

    let mut out = BufferWriter::new();
    let status = compiler.compile(0, 0, &mut out).unwrap();
    assert!(status.is_warning());
    assert!(status.message().contains("unused parameter"));
    assert!(!out.is_empty(), "warnings do not prevent the container");
}

#[test]
fn test_unknown_semantic_aborts_without_output() {
    init_logging();
    let shader = TestShader::new().with_entry_point(entry_point(
        "vsMain",
        Stage::Vertex,
        vec![structure(
            Some("input"),
            "VSInput",
            vec![varying("pos", "POSITION", 0), varying("bar", "FOO", 0)],
        )],
        no_result(),
    ));
    let mut compiler = Compiler::new(TestFrontEnd::new(shader));
    compiler.add_target("spirv", Vec::new()).unwrap();
    compiler.load_program(CUBE_SOURCE).unwrap();

    let mut out = BufferWriter::new();
    let err = compiler.compile(0, 0, &mut out).unwrap_err();
    match &err {
        CompileError::UnsupportedSemantic { semantic, field } => {
            assert_eq!(semantic, "FOO");
            assert_eq!(field, "input.bar");
        }
        other => panic!("expected an unsupported semantic error, got {:?}", other),
    }
    assert!(out.is_empty(), "no partial container may be written");
}

#[test]
fn test_unsupported_uniform_aborts() {
    init_logging();
    let shader = TestShader::new()
        .with_entry_point(entry_point("fsMain", Stage::Fragment, Vec::new(), no_result()))
        .with_global(VariableLayout::new("u_mvp", float4x4()), 64)
        .with_global(
            structure(Some("u_light"), "Light", vec![VariableLayout::new("dir", float4())]),
            16,
        );
    let mut compiler = Compiler::new(TestFrontEnd::new(shader));
    compiler.add_target("dx", Vec::new()).unwrap();
    compiler.load_program(CUBE_SOURCE).unwrap();

    let mut out = BufferWriter::new();
    assert!(matches!(
        compiler.compile(0, 0, &mut out),
        Err(CompileError::UnsupportedUniformType { field }) if field == "u_light"
    ));
    assert!(out.is_empty());
}

#[test]
fn test_text_target_needs_decompiler() {
    init_logging();
    let mut compiler = cube_compiler(&["glsl"]);
    compiler.load_program(CUBE_SOURCE).unwrap();

    let mut out = BufferWriter::new();
    assert!(matches!(
        compiler.compile(0, 0, &mut out),
        Err(CompileError::NoDecompiler { target: "glsl" })
    ));
    assert!(out.is_empty());
}

#[test]
fn test_compile_indices_are_checked() {
    init_logging();
    let mut compiler = cube_compiler(&["dx"]);
    compiler.load_program(CUBE_SOURCE).unwrap();

    let mut out = BufferWriter::new();
    assert!(matches!(
        compiler.compile(0, 1, &mut out),
        Err(CompileError::TargetIndex { index: 1 })
    ));
    assert!(matches!(
        compiler.compile(5, 0, &mut out),
        Err(CompileError::EntryPointIndex { index: 5 })
    ));
}
