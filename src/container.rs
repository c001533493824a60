// This module encodes the binary shader container the runtime loads. A container starts with
// a stage-selected magic word carrying the format version in its high byte, followed by the
// two cross-stage fingerprints, the uniform table, and one of two payload shapes: bytecode
// with its vertex attribute ID table and uniform block size, or NUL-terminated shader text
// with no trailer. The two payload shapes are intentionally kept as separate variants
// because the runtime parses them differently. Every width check is done before the first
// byte is written, so a rejected container never leaves a partial one in the sink.

//! Binary container encoder.

use crate::core::{CompileError, CompileResult, Stage};
use crate::reflect::{Param, Uniform, INSTANCE_DATA_ID};
use crate::target::OutputKind;
use crate::writer::Writer;

/// Container format version stored in the magic word.
pub const CONTAINER_VERSION: u8 = 11;

/// Bit OR'd into every uniform type byte of a fragment container.
pub const FRAGMENT_BIT: u8 = 0x10;

/// Stage tag plus version, as stored in the first four bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Magic(pub u32);

const fn compose_magic(tag: [u8; 3], version: u8) -> u32 {
    u32::from_le_bytes([tag[0], tag[1], tag[2], version])
}

impl Magic {
    pub const VERTEX: Magic = Magic(compose_magic(*b"VSH", CONTAINER_VERSION));
    pub const FRAGMENT: Magic = Magic(compose_magic(*b"FSH", CONTAINER_VERSION));
    pub const COMPUTE: Magic = Magic(compose_magic(*b"CSH", CONTAINER_VERSION));

    pub fn for_stage(stage: Stage) -> CompileResult<Magic> {
        match stage {
            Stage::Vertex => Ok(Magic::VERTEX),
            Stage::Fragment => Ok(Magic::FRAGMENT),
            Stage::Compute => Ok(Magic::COMPUTE),
            Stage::Unknown => Err(CompileError::UnsupportedStage {
                stage: stage.short_name(),
            }),
        }
    }

    pub fn tag(self) -> [u8; 3] {
        let [a, b, c, _] = self.0.to_le_bytes();
        [a, b, c]
    }

    pub fn version(self) -> u8 {
        self.0.to_le_bytes()[3]
    }
}

/// Fixed leading fields of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub stage: Stage,
    pub input_hash: u32,
    pub output_hash: u32,
}

/// Stage-specific tail of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Bytecode {
        code: Vec<u8>,
        attribute_ids: Vec<u16>,
        block_size: u16,
    },
    Text(String),
}

/// Attribute ID written for an input parameter.
///
/// Portable bytecode marks inputs whose name mentions `data` as instance data,
/// which must not bind to a vertex attribute.
pub fn attribute_id(param: &Param, kind: OutputKind) -> u16 {
    if kind == OutputKind::PortableBytecode && param.name.contains("data") {
        return INSTANCE_DATA_ID;
    }
    param.attrib.id().unwrap_or(INSTANCE_DATA_ID)
}

fn check_width(value: usize, max: usize, what: &'static str, field: &str) -> CompileResult<()> {
    if value > max {
        return Err(CompileError::ValueOutOfRange {
            field: field.to_string(),
            what,
            value,
            max,
        });
    }
    Ok(())
}

/// Streams containers into a [`Writer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerEncoder;

impl ContainerEncoder {
    pub fn new() -> Self {
        Self
    }

    fn validate(uniforms: &[Uniform], payload: &Payload) -> CompileResult<()> {
        check_width(uniforms.len(), u16::MAX as usize, "uniform count", "uniforms")?;
        for uniform in uniforms {
            check_width(uniform.name.len(), u8::MAX as usize, "name length", &uniform.name)?;
        }

        match payload {
            Payload::Bytecode {
                code,
                attribute_ids,
                ..
            } => {
                check_width(code.len(), u32::MAX as usize, "code size", "bytecode")?;
                check_width(attribute_ids.len(), u8::MAX as usize, "input count", "inputs")
            }
            Payload::Text(text) => {
                check_width(text.len(), u32::MAX as usize, "text size", "source")
            }
        }
    }

    /// Encode one container.
    pub fn encode(
        &self,
        header: &ContainerHeader,
        uniforms: &[Uniform],
        payload: &Payload,
        writer: &mut dyn Writer,
    ) -> CompileResult<()> {
        let magic = Magic::for_stage(header.stage)?;
        Self::validate(uniforms, payload)?;

        writer.write_u32(magic.0)?;
        writer.write_u32(header.input_hash)?;
        writer.write_u32(header.output_hash)?;

        let fragment_bit = if header.stage == Stage::Fragment {
            FRAGMENT_BIT
        } else {
            0
        };

        writer.write_u16(uniforms.len() as u16)?;
        for uniform in uniforms {
            writer.write_u8(uniform.name.len() as u8)?;
            writer.write_bytes(uniform.name.as_bytes())?;
            writer.write_u8(uniform.ty as u8 | fragment_bit)?;
            writer.write_u8(uniform.count)?;
            writer.write_u16(uniform.reg_index)?;
            writer.write_u16(uniform.reg_count)?;
            writer.write_u8(uniform.tex_component as u8)?;
            writer.write_u8(uniform.tex_dimension as u8)?;
            writer.write_u16(uniform.tex_format as u16)?;
        }

        match payload {
            Payload::Bytecode {
                code,
                attribute_ids,
                block_size,
            } => {
                writer.write_u32(code.len() as u32)?;
                writer.write_bytes(code)?;
                writer.write_u8(0)?;
                writer.write_u8(attribute_ids.len() as u8)?;
                for id in attribute_ids {
                    writer.write_u16(*id)?;
                }
                writer.write_u16(*block_size)?;
            }
            Payload::Text(text) => {
                writer.write_u32(text.len() as u32)?;
                writer.write_bytes(text.as_bytes())?;
                writer.write_u8(0)?;
            }
        }

        Ok(())
    }
}
