// This module produces the text payload of GLSL and GLSL ES containers. The front end emits
// SPIR-V, an external decompiler (SPIRV-Cross or similar, reached through the Decompiler
// and DecompiledModule traits) turns it back into GLSL, and this module reconciles the
// decompiler's generic names with what the runtime expects. Vertex inputs take the runtime
// attribute names, varyings take entryPointParam_ names so both stages agree, combined
// image samplers take their texture's name, and uniform buffer blocks are flattened into
// plain global uniforms. The text rewrites live in rewrite.rs.

//! GLSL text post-processing.

pub mod rewrite;

use log::{debug, trace};

use crate::core::{CompileError, CompileResult, Diagnostics, Stage};
use crate::reflect::{Param, Uniform};
use crate::target::{OutputKind, TargetProfile};

pub use rewrite::{
    flatten_uniform_block, input_name, output_name, uniform_decl_line, UniformBlock,
    ENTRY_POINT_PARAM_PREFIX,
};

/// Float precision qualifier for the default precision statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    Lowp,
    Mediump,
    #[default]
    Highp,
}

/// Options applied to a decompiled module before emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlslOptions {
    pub version: u32,
    pub es: bool,
    pub emit_uniform_buffer_as_plain_uniforms: bool,
    pub enable_420pack_extension: bool,
    pub fragment_default_float_precision: Precision,
}

impl GlslOptions {
    /// Options for a text profile.
    pub fn for_profile(profile: &TargetProfile) -> CompileResult<Self> {
        let version = profile.glsl_version().ok_or(CompileError::UnknownTarget {
            name: profile.name.to_string(),
        })?;
        Ok(Self {
            version,
            es: profile.kind == OutputKind::GlslEs,
            emit_uniform_buffer_as_plain_uniforms: true,
            enable_420pack_extension: false,
            fragment_default_float_precision: Precision::Highp,
        })
    }
}

/// A declared interface variable or block of the decompiled module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: u32,
    pub type_id: u32,
    pub base_type_id: u32,
    /// For blocks this is the block type name, otherwise the variable name.
    pub name: String,
}

impl Resource {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            type_id: 0,
            base_type_id: 0,
            name: name.into(),
        }
    }
}

/// Interface of a decompiled module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderResources {
    pub stage_inputs: Vec<Resource>,
    pub stage_outputs: Vec<Resource>,
    pub uniform_buffers: Vec<Resource>,
}

/// One member of a uniform block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMember {
    pub name: String,
    /// Arrays and matrices are wrapped in structs with a `data` member.
    pub is_struct: bool,
}

impl BlockMember {
    pub fn new(name: impl Into<String>, is_struct: bool) -> Self {
        Self {
            name: name.into(),
            is_struct,
        }
    }
}

/// Result of merging a texture and a sampler into one GLSL sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinedImageSampler {
    pub combined_id: u32,
    pub image_id: u32,
    pub sampler_id: u32,
}

/// SPIR-V to GLSL decompiler.
pub trait Decompiler {
    fn parse(&self, spirv: &[u8]) -> Result<Box<dyn DecompiledModule>, String>;
}

/// A parsed module that can be renamed and emitted as GLSL.
pub trait DecompiledModule {
    fn set_options(&mut self, options: &GlslOptions);

    fn shader_resources(&self) -> ShaderResources;

    /// Current name of the declaration with `id`.
    fn name(&self, id: u32) -> String;

    fn set_name(&mut self, id: u32, name: &str);

    fn block_members(&self, block: &Resource) -> Vec<BlockMember>;

    fn build_combined_image_samplers(&mut self) -> Vec<CombinedImageSampler>;

    /// Emit the GLSL text. Decompiler warnings go to `diagnostics`.
    fn compile(&mut self, diagnostics: &mut Diagnostics) -> Result<String, String>;
}

/// Decompile `spirv` and post-process the text for `profile`.
pub fn emit_glsl(
    decompiler: &dyn Decompiler,
    spirv: &[u8],
    profile: &TargetProfile,
    stage: Stage,
    inputs: &[Param],
    uniforms: &[Uniform],
    diagnostics: &mut Diagnostics,
) -> CompileResult<String> {
    let options = GlslOptions::for_profile(profile)?;
    let mut module = decompiler
        .parse(spirv)
        .map_err(|reason| CompileError::Decompile { reason })?;
    module.set_options(&options);

    let resources = module.shader_resources();

    for output in &resources.stage_outputs {
        if let Some(name) = output_name(stage, &output.name) {
            trace!("Renaming output {} to {}", output.name, name);
            module.set_name(output.id, &name);
        }
    }

    for input in &resources.stage_inputs {
        if let Some(name) = input_name(stage, &input.name, inputs) {
            trace!("Renaming input {} to {}", input.name, name);
            module.set_name(input.id, &name);
        }
    }

    for sampler in module.build_combined_image_samplers() {
        let image_name = module.name(sampler.image_id);
        module.set_name(sampler.combined_id, &image_name);
    }

    let blocks: Vec<UniformBlock> = resources
        .uniform_buffers
        .iter()
        .map(|ubo| UniformBlock {
            type_name: ubo.name.clone(),
            instance_name: module.name(ubo.id),
            members: module.block_members(ubo),
        })
        .collect();

    let mut source = module
        .compile(diagnostics)
        .map_err(|reason| CompileError::Decompile { reason })?;

    for block in &blocks {
        debug!(
            "Flattening uniform block {} ({} members)",
            block.instance_name,
            block.members.len()
        );
        source = flatten_uniform_block(&source, block, uniforms)?;
    }

    Ok(source)
}
