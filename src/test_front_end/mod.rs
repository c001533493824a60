//! In-memory shader front end and decompiler.
//!
//! This module lets the whole pipeline run without a native shader compiler.
//! A [`TestShader`] describes what the front end would reflect: the entry
//! points with their parameter trees and the global uniform scope. The
//! [`TestFrontEnd`] serves that description through the adaptor traits and
//! emits recognisable fake code. [`TestDecompiler`] turns that fake SPIR-V
//! back into GLSL from a per-entry-point template.
//!
//! # Template format
//!
//! GLSL templates reference declarations by id with `$<id>`; the current name
//! of the declaration is substituted when the module is compiled, so renames
//! show up in the output:
//!
//! ```text
//! in vec4 $1;
//! out vec4 $2;
//! void main() { $2 = $1; }
//! ```

pub mod decompiler;
pub mod front_end;

use crate::core::{
    EntryPointLayout, ImageFormat, ResourceShape, ResourceType, ScalarType, Stage, StructLayout,
    TypeLayout, UserAttribute, VariableLayout,
};

pub use decompiler::{TestDecompiler, TestGlslModule};
pub use front_end::{TestFrontEnd, TestGlobalSession, TestModule, TestProgram, TestSession};

/// Reflection a [`TestFrontEnd`] reports for its source.
#[derive(Debug, Clone, PartialEq)]
pub struct TestShader {
    pub entry_points: Vec<EntryPointLayout>,
    pub global_params: VariableLayout,
}

impl Default for TestShader {
    fn default() -> Self {
        Self {
            entry_points: Vec::new(),
            global_params: VariableLayout::unnamed(TypeLayout::Struct(StructLayout {
                name: "GlobalParams".to_string(),
                ..StructLayout::default()
            })),
        }
    }
}

impl TestShader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_point(mut self, entry_point: EntryPointLayout) -> Self {
        self.entry_points.push(entry_point);
        self
    }

    /// Append a global uniform and grow the block size to cover it.
    pub fn with_global(mut self, field: VariableLayout, size: usize) -> Self {
        if let TypeLayout::Struct(layout) = &mut self.global_params.ty {
            layout.size = layout.size.max(field.offset + size);
            layout.fields.push(field);
        }
        self
    }

    /// Image format of the next sampler binding range.
    pub fn with_image_format(mut self, format: ImageFormat) -> Self {
        if let TypeLayout::Struct(layout) = &mut self.global_params.ty {
            layout.binding_range_image_formats.push(format);
        }
        self
    }
}

/// Entry point reflection with the given parameters and result.
pub fn entry_point(
    name: &str,
    stage: Stage,
    parameters: Vec<VariableLayout>,
    result: VariableLayout,
) -> EntryPointLayout {
    EntryPointLayout {
        name: name.to_string(),
        stage,
        parameters,
        result,
        attributes: Vec::<UserAttribute>::new(),
    }
}

pub fn float4() -> TypeLayout {
    TypeLayout::Vector {
        element: ScalarType::Float32,
        count: 4,
    }
}

pub fn float4x4() -> TypeLayout {
    TypeLayout::Matrix {
        element: ScalarType::Float32,
        rows: 4,
        columns: 4,
    }
}

pub fn texture_2d() -> TypeLayout {
    TypeLayout::Resource(ResourceType {
        shape: ResourceShape::Texture2D,
        result: ScalarType::Float32,
    })
}

/// A `float4` varying with a semantic.
pub fn varying(name: &str, semantic: &str, index: u32) -> VariableLayout {
    VariableLayout::new(name, float4()).with_semantic(semantic, index)
}

/// A struct-typed variable; `None` leaves it unnamed like an entry point result.
pub fn structure(
    name: Option<&str>,
    type_name: &str,
    fields: Vec<VariableLayout>,
) -> VariableLayout {
    let ty = TypeLayout::Struct(StructLayout {
        name: type_name.to_string(),
        fields,
        ..StructLayout::default()
    });
    match name {
        Some(name) => VariableLayout::new(name, ty),
        None => VariableLayout::unnamed(ty),
    }
}

/// Result of an entry point that returns nothing the container records.
pub fn no_result() -> VariableLayout {
    structure(None, "Void", Vec::new())
}
