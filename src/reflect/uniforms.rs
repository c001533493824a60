//! Uniform table extraction from the global parameter scope.

use std::fmt;

use log::debug;

use crate::core::{CompileError, CompileResult, ProgramLayout, StructLayout, TypeLayout};

use super::texture::{
    component_type, dimension, texture_format, TextureComponentType, TextureDimension,
    TextureFormat,
};

/// Uniform kinds the runtime understands, with their wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UniformType {
    Sampler = 0,
    /// Terminator value of the runtime's enumeration; never produced here.
    End = 1,
    Vec4 = 2,
    Mat3 = 3,
    Mat4 = 4,
}

impl UniformType {
    /// Declaration type in GLSL, `None` for kinds that are not declared as plain uniforms.
    pub fn glsl_type(self) -> Option<&'static str> {
        match self {
            UniformType::Vec4 => Some("vec4"),
            UniformType::Mat3 => Some("mat3"),
            UniformType::Mat4 => Some("mat4"),
            UniformType::Sampler | UniformType::End => None,
        }
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UniformType::Sampler => "sampler",
            UniformType::End => "end",
            UniformType::Vec4 => "vec4",
            UniformType::Mat3 => "mat3",
            UniformType::Mat4 => "mat4",
        };
        f.write_str(name)
    }
}

/// One entry of the container's uniform table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uniform {
    pub name: String,
    pub ty: UniformType,
    pub count: u8,
    /// Byte offset for data uniforms, binding slot for samplers.
    pub reg_index: u16,
    pub reg_count: u16,
    pub tex_component: TextureComponentType,
    pub tex_dimension: TextureDimension,
    pub tex_format: TextureFormat,
}

impl Uniform {
    /// A data uniform with default texture fields.
    pub fn new(
        name: impl Into<String>,
        ty: UniformType,
        count: u8,
        reg_index: u16,
        reg_count: u16,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            count,
            reg_index,
            reg_count,
            tex_component: TextureComponentType::default(),
            tex_dimension: TextureDimension::default(),
            tex_format: TextureFormat::default(),
        }
    }

    pub fn is_sampler(&self) -> bool {
        self.ty == UniformType::Sampler
    }
}

fn narrow<T: TryFrom<usize>>(
    value: usize,
    max: usize,
    what: &'static str,
    field: &str,
) -> CompileResult<T> {
    T::try_from(value).map_err(|_| CompileError::ValueOutOfRange {
        field: field.to_string(),
        what,
        value,
        max,
    })
}

/// Resolve the struct holding the global uniforms, unwrapping one constant buffer.
fn global_struct(layout: &ProgramLayout) -> CompileResult<&StructLayout> {
    let elements = match &layout.global_params.ty {
        TypeLayout::Struct(_) => &layout.global_params,
        TypeLayout::ConstantBuffer(element) => element.as_ref(),
        _ => return Err(CompileError::GlobalScopeNotStruct),
    };

    match &elements.ty {
        TypeLayout::Struct(layout) => Ok(layout),
        _ => Err(CompileError::GlobalScopeElementsNotStruct),
    }
}

/// Build the uniform table and return it with the uniform block size in bytes.
pub fn extract_uniforms(layout: &ProgramLayout) -> CompileResult<(Vec<Uniform>, u16)> {
    let scope = global_struct(layout)?;
    let mut uniforms = Vec::with_capacity(scope.fields.len());
    let mut texture_index = 0;

    for field in &scope.fields {
        let name = field.name_or_empty();
        let (element, count) = match &field.ty {
            TypeLayout::Array { element, count } => (element.as_ref(), *count),
            ty => (ty, 1),
        };

        let ty = match element {
            TypeLayout::SamplerState => continue,
            TypeLayout::Resource(_) => UniformType::Sampler,
            TypeLayout::Vector { .. } => UniformType::Vec4,
            TypeLayout::Matrix { rows: 3, .. } => UniformType::Mat3,
            TypeLayout::Matrix { .. } => UniformType::Mat4,
            _ => {
                return Err(CompileError::UnsupportedUniformType {
                    field: name.to_string(),
                })
            }
        };

        narrow::<u8>(name.len(), u8::MAX as usize, "name length", name)?;
        let count_u8 = narrow::<u8>(count, u8::MAX as usize, "element count", name)?;

        let uniform = match element {
            TypeLayout::Resource(resource) => {
                let binding = field.binding_index as usize;
                let mut uniform = Uniform::new(
                    name,
                    ty,
                    count_u8,
                    narrow(binding, u16::MAX as usize, "binding index", name)?,
                    u16::from(count_u8),
                );
                uniform.tex_component = component_type(resource);
                uniform.tex_dimension = dimension(resource);
                uniform.tex_format =
                    texture_format(scope.binding_range_image_format(texture_index));
                texture_index += 1;
                uniform
            }
            _ => {
                let rows = element.row_count() as usize;
                Uniform::new(
                    name,
                    ty,
                    count_u8,
                    narrow(field.offset, u16::MAX as usize, "offset", name)?,
                    narrow(rows * count, u16::MAX as usize, "register count", name)?,
                )
            }
        };
        uniforms.push(uniform);
    }

    let block_size = narrow(scope.size, u16::MAX as usize, "block size", &scope.name)?;

    debug!("   Found {} uniforms:", uniforms.len());
    for uniform in &uniforms {
        debug!("      - {} ({})", uniform.name, uniform.ty);
    }

    Ok((uniforms, block_size))
}
