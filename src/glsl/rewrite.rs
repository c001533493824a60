//! Name and text rewrites applied to decompiled GLSL.
//!
//! The decompiler names varyings after their dotted reflection path and keeps
//! uniform data inside a block instance. The runtime expects flat uniforms
//! and fixed attribute names, so references are rewritten textually. The
//! patterns rely on the decompiler's naming being deterministic.

use log::trace;
use regex::{Captures, Regex};

use crate::core::{CompileError, CompileResult, Stage};
use crate::reflect::{Attrib, Param, Uniform};

use super::BlockMember;

/// Prefix shared by vertex outputs and fragment inputs so both stages link.
pub const ENTRY_POINT_PARAM_PREFIX: &str = "entryPointParam_";

/// A uniform buffer as it appears in the decompiled text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBlock {
    /// Block type name in `uniform <type_name> <instance_name>;`.
    pub type_name: String,
    pub instance_name: String,
    pub members: Vec<BlockMember>,
}

fn entry_point_param_name(name: &str) -> Option<String> {
    name.rfind('.')
        .map(|dot| format!("{}{}", ENTRY_POINT_PARAM_PREFIX, &name[dot + 1..]))
}

/// New name of a decompiled stage output, `None` to keep it.
pub fn output_name(stage: Stage, name: &str) -> Option<String> {
    match stage {
        Stage::Vertex => entry_point_param_name(name),
        _ => None,
    }
}

/// New name of a decompiled stage input, `None` to keep it.
///
/// Vertex inputs are matched against the extracted params by qualified name
/// and take the runtime attribute name of their slot.
pub fn input_name(stage: Stage, name: &str, inputs: &[Param]) -> Option<String> {
    if stage != Stage::Vertex {
        return entry_point_param_name(name);
    }

    let param = inputs.iter().find(|param| param.qualified_name == name)?;
    let instance_name = if param.attrib >= Attrib::TexCoord3 && param.name.contains("data") {
        param.attrib.instance_data_name()
    } else {
        None
    };

    instance_name
        .or_else(|| param.attrib.runtime_name())
        .map(str::to_string)
}

/// Flat declaration for `uniform`, empty for samplers.
pub fn uniform_decl_line(uniform: &Uniform) -> String {
    let Some(ty) = uniform.ty.glsl_type() else {
        return String::new();
    };
    if uniform.count > 1 {
        format!("uniform {} {}[{}];\n", ty, uniform.name, uniform.count)
    } else {
        format!("uniform {} {};\n", ty, uniform.name)
    }
}

fn pattern(member: &str, source: &str) -> CompileResult<Regex> {
    Regex::new(source).map_err(|source| CompileError::RewritePattern {
        member: member.to_string(),
        source,
    })
}

/// Replace the block `block` by flat uniforms and strip the instance name from its references.
pub fn flatten_uniform_block(
    source: &str,
    block: &UniformBlock,
    uniforms: &[Uniform],
) -> CompileResult<String> {
    let buffer = regex::escape(&block.instance_name);
    let mut text = source.to_string();
    let mut declarations = String::new();

    for member in &block.members {
        let name = member.name.as_str();
        if let Some(uniform) = uniforms.iter().find(|uniform| uniform.name == name) {
            declarations.push_str(&uniform_decl_line(uniform));
        }

        let escaped = regex::escape(name);

        if member.is_struct {
            let chain = pattern(
                name,
                &format!(r"{buffer}\.{escaped}\.data(\[\w+\])?(?:\.data(\[\w+\])?)?"),
            )?;
            text = chain
                .replace_all(&text, |caps: &Captures| {
                    let group = |i| caps.get(i).map_or("", |m| m.as_str());
                    format!("{}{}{}", name, group(1), group(2))
                })
                .into_owned();
        }

        // A following letter belongs to a longer member name.
        let plain = pattern(name, &format!(r"{buffer}\.{escaped}([^A-Za-z]|$)"))?;
        text = plain
            .replace_all(&text, |caps: &Captures| {
                format!("{}{}", name, caps.get(1).map_or("", |m| m.as_str()))
            })
            .into_owned();

        trace!("Rewrote references to {}.{}", block.instance_name, name);
    }

    let declaration = format!("uniform {} {};\n", block.type_name, block.instance_name);
    Ok(text.replace(&declaration, &declarations))
}
