// This module implements the command-line surface of the shader compiler. Args is the clap
// definition: one input file, one or more targets, an output path template, optional stage
// and entry point filters, an optional bin2c mode with its own variable name template,
// include directories and a verbose switch. run() registers the targets, loads the program,
// applies the filters and then compiles every (target, entry point) pair, writing each
// container to the path the template expands to. A container is only written once its
// compile succeeded; warnings are logged and the loop continues, while the first error
// stops the run and leaves earlier outputs in place. main_with() wires logging, argument
// parsing and exit codes together for a binary that supplies the native front end.

//! Command-line driver.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use thiserror::Error;

use crate::compiler::Compiler;
use crate::core::{CompileError, EntryPoint, FrontEnd, Stage};
use crate::glsl::Decompiler;
use crate::target::TargetProfile;
use crate::writer::{Bin2cWriter, BufferWriter, FileSink, FileWriter, Writer};

/// Default output path template.
pub const DEFAULT_OUTPUT: &str = "{{target}}/{{name}}_{{stage}}.bin";
/// Default bin2c variable name template.
pub const DEFAULT_BIN2C_NAME: &str = "{{name}}_{{stage}}_{{target}}";

/// Compile a Slang shader into bgfx shader binaries.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "bgfx-slang", version)]
pub struct Args {
    /// Shader source file
    pub input: PathBuf,

    /// Target profile (dx, spirv, glsl, gles, glsl_330, ...); repeat for more targets
    #[arg(short = 't', long = "target", required = true)]
    pub targets: Vec<String>,

    /// Output path template; supports {{name}}, {{filename}}, {{entryPoint}}, {{stage}}, {{target}}
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Only compile entry points of this stage (vs, fs, cs)
    #[arg(short, long)]
    pub stage: Option<Stage>,

    /// Only compile the entry point with this name
    #[arg(short, long)]
    pub entry: Option<String>,

    /// Emit a C array instead of a binary, named by this template
    #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_BIN2C_NAME)]
    pub bin2c: Option<String>,

    /// Module search path
    #[arg(short = 'i', long = "include")]
    pub include: Vec<PathBuf>,

    /// Log discovered entry points, params and uniforms
    #[arg(short, long)]
    pub verbose: bool,
}

/// Errors that stop a driver run.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open file: {}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Expand the placeholders of an output path or variable name template.
pub fn format_output_path(
    template: &str,
    input: &Path,
    target: &TargetProfile,
    entry_point: &EntryPoint,
) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let file_name = input
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    [
        ("{{name}}", stem.as_ref()),
        ("{{filename}}", file_name.as_ref()),
        ("{{entryPoint}}", entry_point.name.as_str()),
        ("{{stage}}", entry_point.stage.short_name()),
        ("{{target}}", target.short_name()),
    ]
    .into_iter()
    .fold(template.to_string(), |text, (placeholder, value)| {
        text.replace(placeholder, value)
    })
}

/// Initialise `env_logger`; `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn write_output(
    path: &Path,
    sink: &mut dyn FileSink,
    container: &[u8],
) -> Result<(), DriverError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DriverError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    sink.open(path).map_err(|source| DriverError::OpenOutput {
        path: path.to_path_buf(),
        source,
    })?;

    let written = sink.write_bytes(container).and_then(|()| sink.close());
    written.map_err(|source| DriverError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// Compile every selected (target, entry point) pair; returns the written paths.
pub fn run<F: FrontEnd>(
    args: &Args,
    front_end: F,
    decompiler: Option<Box<dyn Decompiler>>,
) -> Result<Vec<PathBuf>, DriverError> {
    let mut compiler = Compiler::new(front_end);
    if let Some(decompiler) = decompiler {
        compiler.set_decompiler(decompiler);
    }

    for path in &args.include {
        compiler.add_search_path(path.clone());
    }

    for target in &args.targets {
        info!("Adding target: {}", target);
        compiler.add_target(target, Vec::new())?;
    }

    info!("Loading program: {}...", args.input.display());
    let status = compiler.load_program_from_path(&args.input)?;
    if status.is_warning() {
        warn!("{}", status);
    }

    if let Some(entry) = &args.entry {
        compiler.add_entry_point(entry)?;
    }
    if let Some(stage) = args.stage {
        compiler.add_entry_points_for_stage(stage)?;
    }

    let mut written = Vec::new();
    for target_index in 0..compiler.targets().len() {
        let profile = compiler.target(target_index)?.profile;

        for (entry_point_index, entry_point) in compiler.entry_points().iter().enumerate() {
            let output = PathBuf::from(format_output_path(
                &args.output,
                &args.input,
                &profile,
                entry_point,
            ));
            info!(
                "Compiling entry point '{}' ({}) to: {}",
                entry_point.name,
                entry_point.stage,
                output.display()
            );

            let mut container = BufferWriter::new();
            let status = compiler.compile(entry_point_index, target_index, &mut container)?;
            if status.is_warning() {
                warn!("{}", status);
            }

            let mut sink: Box<dyn FileSink> = match &args.bin2c {
                Some(template) => Box::new(Bin2cWriter::new(format_output_path(
                    template,
                    &args.input,
                    &profile,
                    entry_point,
                ))),
                None => Box::new(FileWriter::new()),
            };
            write_output(&output, sink.as_mut(), container.as_bytes())?;
            written.push(output);
        }
    }

    Ok(written)
}

/// Parse the process arguments, run, and map the outcome to an exit code.
pub fn main_with<F: FrontEnd>(front_end: F, decompiler: Option<Box<dyn Decompiler>>) -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(args.verbose);

    match run(&args, front_end, decompiler) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
