// This module defines the owned reflection tree a front end hands back after linking a
// program. The shape mirrors what shader compilers such as Slang expose through their
// reflection API: a ProgramLayout with one EntryPointLayout per linked entry point and a
// VariableLayout describing the global parameter scope. Every variable carries its type
// layout as a closed TypeLayout enum (struct, scalar, vector, matrix, array, resource,
// sampler state, constant buffer wrapper, or anything else) so the extractors can match
// exhaustively instead of dispatching through trait objects. Struct layouts also carry
// their byte size and the per-binding-range image formats the uniform extractor needs.
// Front-end adaptors are expected to convert their native reflection into these types.

//! Reflection tree produced by the shader front end.

use super::entry_point::{Stage, UserAttribute};

/// Scalar element types reported by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    None,
    Void,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
}

/// Shape of a texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceShape {
    Texture1D,
    Texture1DArray,
    Texture2D,
    Texture2DArray,
    Texture2DMultisample,
    Texture3D,
    TextureCube,
    TextureCubeArray,
    Buffer,
    Other,
}

/// Image format attached to a binding range (storage images declare one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Unknown,
    Rgba32f,
    Rgba16f,
    Rg32f,
    Rg16f,
    R11fG11fB10f,
    R32f,
    R16f,
    Rgba16,
    Rgb10A2,
    Rgba8,
    Rg16,
    Rg8,
    R16,
    R8,
    Rgba16Snorm,
    Rgba8Snorm,
    Rg16Snorm,
    Rg8Snorm,
    R16Snorm,
    R8Snorm,
    Rgba32i,
    Rgba16i,
    Rgba8i,
    Rg32i,
    Rg16i,
    Rg8i,
    R32i,
    R16i,
    R8i,
    Rgba32ui,
    Rgba16ui,
    Rgb10A2ui,
    Rgba8ui,
    Rg32ui,
    Rg16ui,
    Rg8ui,
    R32ui,
    R16ui,
    R8ui,
    R64ui,
    R64i,
    Bgra8,
}

/// A texture-like resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceType {
    pub shape: ResourceShape,
    /// Scalar type of the sampled value (`Texture2D<uint4>` → `UInt32`).
    pub result: ScalarType,
}

/// Layout of a struct type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructLayout {
    pub name: String,
    pub fields: Vec<VariableLayout>,
    /// Size in bytes of the uniform data of this struct.
    pub size: usize,
    /// Image format of each binding range, in binding-range order.
    pub binding_range_image_formats: Vec<ImageFormat>,
}

impl StructLayout {
    /// Image format of the `index`th binding range, `Unknown` if absent.
    pub fn binding_range_image_format(&self, index: usize) -> ImageFormat {
        self.binding_range_image_formats
            .get(index)
            .copied()
            .unwrap_or_default()
    }
}

/// Closed set of type layout kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeLayout {
    Struct(StructLayout),
    Scalar(ScalarType),
    Vector { element: ScalarType, count: u32 },
    Matrix { element: ScalarType, rows: u32, columns: u32 },
    Array { element: Box<TypeLayout>, count: usize },
    Resource(ResourceType),
    SamplerState,
    ConstantBuffer(Box<VariableLayout>),
    /// Anything the extractors do not model, with the front end's kind name.
    Other(String),
}

impl TypeLayout {
    /// Number of rows: matrices report their row count, everything else one.
    pub fn row_count(&self) -> u32 {
        match self {
            TypeLayout::Matrix { rows, .. } => *rows,
            _ => 1,
        }
    }

    /// Human readable kind, used in log output.
    pub fn kind_name(&self) -> &str {
        match self {
            TypeLayout::Struct(_) => "struct",
            TypeLayout::Scalar(_) => "scalar",
            TypeLayout::Vector { .. } => "vector",
            TypeLayout::Matrix { .. } => "matrix",
            TypeLayout::Array { .. } => "array",
            TypeLayout::Resource(_) => "resource",
            TypeLayout::SamplerState => "sampler state",
            TypeLayout::ConstantBuffer(_) => "constant buffer",
            TypeLayout::Other(kind) => kind,
        }
    }
}

/// A named variable together with its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableLayout {
    pub name: Option<String>,
    pub semantic_name: Option<String>,
    pub semantic_index: u32,
    /// Byte offset inside the enclosing uniform block.
    pub offset: usize,
    /// Binding slot for resources.
    pub binding_index: u32,
    pub ty: TypeLayout,
}

impl VariableLayout {
    pub fn new(name: impl Into<String>, ty: TypeLayout) -> Self {
        Self {
            name: Some(name.into()),
            semantic_name: None,
            semantic_index: 0,
            offset: 0,
            binding_index: 0,
            ty,
        }
    }

    /// A variable with no name, such as an entry point's result.
    pub fn unnamed(ty: TypeLayout) -> Self {
        Self {
            name: None,
            ..Self::new("", ty)
        }
    }

    pub fn with_semantic(mut self, name: impl Into<String>, index: u32) -> Self {
        self.semantic_name = Some(name.into());
        self.semantic_index = index;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_binding(mut self, binding_index: u32) -> Self {
        self.binding_index = binding_index;
        self
    }

    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Reflection of one linked entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPointLayout {
    pub name: String,
    pub stage: Stage,
    pub parameters: Vec<VariableLayout>,
    pub result: VariableLayout,
    pub attributes: Vec<UserAttribute>,
}

/// Reflection of a whole linked program for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramLayout {
    pub entry_points: Vec<EntryPointLayout>,
    pub global_params: VariableLayout,
}

impl ProgramLayout {
    pub fn entry_point(&self, index: usize) -> Option<&EntryPointLayout> {
        self.entry_points.get(index)
    }
}
