// This module defines Compiler, which owns one loaded shader program and turns each
// (entry point, target) pair into a container. Loading runs a discovery pass: a session is
// configured with every registered target, the source is loaded as module "sh", linked with
// all of its entry points, and the reflected entry points are recorded. Compiling builds a
// fresh session with only the selected target and its stage-dependent options, links just
// the selected entry point, extracts params and uniforms, computes the fingerprints, fetches
// the code (decompiling it to GLSL for text targets) and hands everything to the container
// encoder. Collaborator diagnostics are accumulated per call and returned as a warning when
// the call succeeds. The front end's global session lives in a shared GlobalSession handle
// that is initialised on first use.

//! Program session builder and compile orchestration.
//!
//! The compile flow for one container:
//! ```text
//! session  = front_end.create_session(only the selected target)
//! module   = session.load_module("sh", source)
//! program  = session.link(module, [entry point])
//! layout   = program.layout(0)
//! inputs, outputs, uniforms = reflect(layout)
//! code     = program.entry_point_code(0, 0)
//! payload  = code, or decompile(code) for text targets
//! encoder.encode(header, uniforms, payload, writer)
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::container::{attribute_id, ContainerEncoder, ContainerHeader, Payload};
use crate::core::{
    CompileError, CompileResult, CompilerOption, Diagnostics, EntryPoint, FrontEnd,
    FrontEndSession, GlobalSession, LinkedProgram, SessionDesc, Stage, Status, TargetDesc,
};
use crate::glsl::{emit_glsl, Decompiler};
use crate::hash::fingerprints;
use crate::reflect::{extract_uniforms, input_params, output_params};
use crate::target::{find_profile, TargetSettings};
use crate::writer::Writer;

/// Name the source is registered under in the front end.
pub const MODULE_NAME: &str = "sh";
/// Path reported for the source in front-end diagnostics.
pub const MODULE_PATH: &str = "sh.slang";

type ProgramOf<F> = <<F as FrontEnd>::Session as FrontEndSession>::Program;

/// Compiles one shader program into containers.
pub struct Compiler<F: FrontEnd> {
    front_end: F,
    global_session: Arc<GlobalSession<F::GlobalSession>>,
    decompiler: Option<Box<dyn Decompiler>>,
    targets: Vec<TargetSettings>,
    search_paths: Vec<PathBuf>,
    source: String,
    available_entry_points: Vec<EntryPoint>,
    selected_entry_points: Vec<EntryPoint>,
    encoder: ContainerEncoder,
}

impl<F: FrontEnd> Compiler<F> {
    /// A compiler with its own global session handle.
    pub fn new(front_end: F) -> Self {
        Self::with_global_session(front_end, Arc::new(GlobalSession::new()))
    }

    /// A compiler sharing `global_session` with other compilers.
    pub fn with_global_session(
        front_end: F,
        global_session: Arc<GlobalSession<F::GlobalSession>>,
    ) -> Self {
        Self {
            front_end,
            global_session,
            decompiler: None,
            targets: Vec::new(),
            search_paths: Vec::new(),
            source: String::new(),
            available_entry_points: Vec::new(),
            selected_entry_points: Vec::new(),
            encoder: ContainerEncoder::new(),
        }
    }

    /// Decompiler used for GLSL and GLSL ES targets.
    pub fn with_decompiler(mut self, decompiler: Box<dyn Decompiler>) -> Self {
        self.decompiler = Some(decompiler);
        self
    }

    pub fn set_decompiler(&mut self, decompiler: Box<dyn Decompiler>) {
        self.decompiler = Some(decompiler);
    }

    pub fn front_end(&self) -> &F {
        &self.front_end
    }

    pub fn global_session(&self) -> &Arc<GlobalSession<F::GlobalSession>> {
        &self.global_session
    }

    /// Register a target by profile name.
    pub fn add_target(&mut self, name: &str, options: Vec<CompilerOption>) -> CompileResult<()> {
        let profile = find_profile(name);
        if profile.is_unknown() {
            return Err(CompileError::UnknownTarget {
                name: name.to_string(),
            });
        }
        self.targets.push(TargetSettings::new(profile, options));
        Ok(())
    }

    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    pub fn targets(&self) -> &[TargetSettings] {
        &self.targets
    }

    pub fn target(&self, index: usize) -> CompileResult<&TargetSettings> {
        self.targets
            .get(index)
            .ok_or(CompileError::TargetIndex { index })
    }

    /// Read `path` and load it with [`load_program`](Self::load_program).
    pub fn load_program_from_path(&mut self, path: impl AsRef<Path>) -> CompileResult<Status> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| CompileError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_program(&source)
    }

    /// Load `source` and discover its entry points.
    pub fn load_program(&mut self, source: &str) -> CompileResult<Status> {
        info!("Loading Program...");
        self.source = source.to_string();
        self.available_entry_points.clear();
        self.selected_entry_points.clear();

        let mut diagnostics = Diagnostics::new();
        let program = self.process_program(None, None, &mut diagnostics)?;
        let layout = program
            .layout(0, &mut diagnostics)
            .map_err(|diagnostics| CompileError::Layout { diagnostics })?;

        debug!("   Found {} entry points:", layout.entry_points.len());
        for (index, ep) in layout.entry_points.iter().enumerate() {
            let entry_point = EntryPoint {
                name: ep.name.clone(),
                index,
                stage: ep.stage,
                attributes: ep.attributes.clone(),
            };
            debug!("      - {} ({})", entry_point.name, entry_point.stage);
            self.available_entry_points.push(entry_point);
        }

        Ok(diagnostics.into_status())
    }

    /// Restrict compilation to the entry point called `name`.
    pub fn add_entry_point(&mut self, name: &str) -> CompileResult<()> {
        let entry_point = self
            .available_entry_points
            .iter()
            .find(|ep| ep.name == name)
            .cloned()
            .ok_or_else(|| CompileError::EntryPointNotFound {
                name: name.to_string(),
            })?;
        self.selected_entry_points.push(entry_point);
        Ok(())
    }

    /// Restrict compilation to every entry point of `stage`.
    pub fn add_entry_points_for_stage(&mut self, stage: Stage) -> CompileResult<()> {
        let matching: Vec<EntryPoint> = self
            .available_entry_points
            .iter()
            .filter(|ep| ep.stage == stage)
            .cloned()
            .collect();
        if matching.is_empty() {
            return Err(CompileError::NoEntryPointForStage {
                stage: stage.short_name(),
            });
        }
        self.selected_entry_points.extend(matching);
        Ok(())
    }

    /// Entry points that will be compiled: the selection, or everything discovered.
    pub fn entry_points(&self) -> &[EntryPoint] {
        if self.selected_entry_points.is_empty() {
            &self.available_entry_points
        } else {
            &self.selected_entry_points
        }
    }

    pub fn entry_point_by_index(&self, index: usize) -> CompileResult<&EntryPoint> {
        self.entry_points()
            .get(index)
            .ok_or(CompileError::EntryPointIndex { index })
    }

    pub fn entry_point_by_name(&self, name: &str) -> CompileResult<&EntryPoint> {
        self.entry_points()
            .iter()
            .find(|ep| ep.name == name)
            .ok_or_else(|| CompileError::EntryPointNotFound {
                name: name.to_string(),
            })
    }

    /// Session description for a discovery pass (`None`) or one target.
    pub fn session_desc(&self, selection: Option<(usize, Stage)>) -> CompileResult<SessionDesc> {
        let targets = match selection {
            Some((target_index, stage)) => {
                let target = self.target(target_index)?;
                info!(
                    "CreateSession: Creating session for target {}...",
                    target.profile.id
                );
                vec![TargetDesc {
                    format: target.profile.front_end_target(),
                    profile: target.profile.front_end_profile().to_string(),
                    options: target.compiler_options(stage),
                }]
            }
            None => {
                if self.targets.is_empty() {
                    return Err(CompileError::NoTargetsConfigured);
                }
                info!("CreateSession: Creating session for preprocess...");
                self.targets
                    .iter()
                    .map(|target| TargetDesc {
                        format: target.profile.front_end_target(),
                        profile: target.profile.front_end_profile().to_string(),
                        options: target.compiler_options(Stage::Vertex),
                    })
                    .collect()
            }
        };

        Ok(SessionDesc {
            targets,
            search_paths: self.search_paths.clone(),
            column_major_matrices: true,
        })
    }

    fn create_session(&self, selection: Option<(usize, Stage)>) -> CompileResult<F::Session> {
        let desc = self.session_desc(selection)?;
        let global = self
            .global_session
            .ensure_initialized(|| self.front_end.create_global_session())?;
        self.front_end
            .create_session(global, &desc)
            .map_err(|reason| CompileError::Session { reason })
    }

    /// Build a session, load the source and link it with one or all entry points.
    fn process_program(
        &self,
        entry_point: Option<&EntryPoint>,
        target_index: Option<usize>,
        diagnostics: &mut Diagnostics,
    ) -> CompileResult<ProgramOf<F>> {
        let selection = target_index.map(|index| {
            let stage = entry_point.map_or(Stage::Unknown, |ep| ep.stage);
            (index, stage)
        });
        let mut session = self.create_session(selection)?;

        let module = session
            .load_module(MODULE_NAME, MODULE_PATH, &self.source, diagnostics)
            .map_err(|diagnostics| CompileError::ModuleLoad { diagnostics })?;

        let entry_points: Vec<usize> = match entry_point {
            Some(ep) => vec![ep.index],
            None => (0..session.defined_entry_point_count(&module)).collect(),
        };

        info!("LoadProgram: Linking program...");
        session
            .link(&module, &entry_points, diagnostics)
            .map_err(|diagnostics| CompileError::Link { diagnostics })
    }

    /// Compile entry point `entry_point_index` of [`entry_points`](Self::entry_points)
    /// for target `target_index` and write the container to `writer`.
    ///
    /// Nothing is written unless every step succeeds.
    pub fn compile(
        &self,
        entry_point_index: usize,
        target_index: usize,
        writer: &mut dyn Writer,
    ) -> CompileResult<Status> {
        let entry_point = self.entry_point_by_index(entry_point_index)?;
        let target = self.target(target_index)?;
        info!(
            "Compiling {} ({}) for {}",
            entry_point.name, entry_point.stage, target.profile
        );

        let mut diagnostics = Diagnostics::new();
        let program =
            self.process_program(Some(entry_point), Some(target_index), &mut diagnostics)?;

        // The session holds exactly one target and the program one entry point.
        let layout = program
            .layout(0, &mut diagnostics)
            .map_err(|diagnostics| CompileError::Layout { diagnostics })?;
        let ep_layout = layout
            .entry_point(0)
            .ok_or(CompileError::MissingEntryPointLayout { index: 0 })?;

        let inputs = input_params(ep_layout)?;
        let outputs = output_params(ep_layout)?;
        let (uniforms, block_size) = extract_uniforms(&layout)?;

        let code = program
            .entry_point_code(0, 0, &mut diagnostics)
            .map_err(|diagnostics| CompileError::CodeGeneration { diagnostics })?;

        let stage = ep_layout.stage;
        let (input_hash, output_hash) = fingerprints(stage, &inputs, &outputs);
        let header = ContainerHeader {
            stage,
            input_hash,
            output_hash,
        };

        let kind = target.profile.kind;
        let payload = if kind.is_text() {
            let decompiler = self
                .decompiler
                .as_deref()
                .ok_or(CompileError::NoDecompiler {
                    target: target.profile.name,
                })?;
            let text = emit_glsl(
                decompiler,
                &code,
                &target.profile,
                stage,
                &inputs,
                &uniforms,
                &mut diagnostics,
            )?;
            Payload::Text(text)
        } else {
            Payload::Bytecode {
                attribute_ids: inputs.iter().map(|param| attribute_id(param, kind)).collect(),
                code,
                block_size,
            }
        };

        self.encoder.encode(&header, &uniforms, &payload, writer)?;

        Ok(diagnostics.into_status())
    }
}
