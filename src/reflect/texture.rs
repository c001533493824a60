// This module holds the texture descriptors written next to every sampler uniform: the
// component kind of the sampled data, the texture dimensionality and the pixel format. The
// enums carry the runtime's wire numbering. The conversion functions translate the
// reflection tree's scalar result types, resource shapes and binding-range image formats
// into those values. A plain 2D texture is reported as a 2D array to match what the
// runtime's own shader compiler produces for Vulkan, and image formats the runtime
// cannot represent (64-bit integer formats, anything unlisted) become Unknown.

//! Texture data attached to sampler uniforms.

use crate::core::{ImageFormat, ResourceShape, ResourceType, ScalarType};

/// Kind of value a sampler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TextureComponentType {
    #[default]
    Float = 0,
    Int = 1,
    Uint = 2,
    Depth = 3,
    UnfilterableFloat = 4,
}

/// Dimensionality of a sampled texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TextureDimension {
    #[default]
    Dimension1D = 0,
    Dimension2D = 1,
    Dimension2DArray = 2,
    DimensionCube = 3,
    DimensionCubeArray = 4,
    Dimension3D = 5,
    Unknown = 6,
}

/// Runtime texture format, numbered as the runtime numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u16)]
pub enum TextureFormat {
    #[default]
    BC1 = 0,
    BC2,
    BC3,
    BC4,
    BC5,
    BC6H,
    BC7,
    ETC1,
    ETC2,
    ETC2A,
    ETC2A1,
    PTC12,
    PTC14,
    PTC12A,
    PTC14A,
    PTC22,
    PTC24,
    ATC,
    ATCE,
    ATCI,
    ASTC4x4,
    ASTC5x4,
    ASTC5x5,
    ASTC6x5,
    ASTC6x6,
    ASTC8x5,
    ASTC8x6,
    ASTC8x8,
    ASTC10x5,
    ASTC10x6,
    ASTC10x8,
    ASTC10x10,
    ASTC12x10,
    ASTC12x12,
    Unknown,
    R1,
    A8,
    R8,
    R8I,
    R8U,
    R8S,
    R16,
    R16I,
    R16U,
    R16F,
    R16S,
    R32I,
    R32U,
    R32F,
    RG8,
    RG8I,
    RG8U,
    RG8S,
    RG16,
    RG16I,
    RG16U,
    RG16F,
    RG16S,
    RG32I,
    RG32U,
    RG32F,
    RGB8,
    RGB8I,
    RGB8U,
    RGB8S,
    RGB9E5F,
    BGRA8,
    RGBA8,
    RGBA8I,
    RGBA8U,
    RGBA8S,
    RGBA16,
    RGBA16I,
    RGBA16U,
    RGBA16F,
    RGBA16S,
    RGBA32I,
    RGBA32U,
    RGBA32F,
    B5G6R5,
    R5G6B5,
    BGRA4,
    RGBA4,
    BGR5A1,
    RGB5A1,
    RGB10A2,
    RG11B10F,
    UnknownDepth,
    D16,
    D24,
    D24S8,
    D32,
    D16F,
    D24F,
    D32F,
    D0S8,
}

/// Component kind from the scalar type a texture resource returns.
pub fn component_type(resource: &ResourceType) -> TextureComponentType {
    match resource.result {
        ScalarType::Float16 | ScalarType::Float32 | ScalarType::Float64 => {
            TextureComponentType::Float
        }
        ScalarType::Int8 | ScalarType::Int16 | ScalarType::Int32 | ScalarType::Int64 => {
            TextureComponentType::Int
        }
        ScalarType::UInt8 | ScalarType::UInt16 | ScalarType::UInt32 | ScalarType::UInt64 => {
            TextureComponentType::Uint
        }
        _ => TextureComponentType::Float,
    }
}

/// Runtime dimension for a resource shape.
pub fn dimension(resource: &ResourceType) -> TextureDimension {
    match resource.shape {
        ResourceShape::Texture1D => TextureDimension::Dimension1D,
        // Reported as an array for parity with the runtime's own Vulkan shader compiler.
        ResourceShape::Texture2D | ResourceShape::Texture2DArray => {
            TextureDimension::Dimension2DArray
        }
        ResourceShape::TextureCube => TextureDimension::DimensionCube,
        ResourceShape::TextureCubeArray => TextureDimension::DimensionCubeArray,
        ResourceShape::Texture3D => TextureDimension::Dimension3D,
        _ => TextureDimension::Unknown,
    }
}

/// Runtime texture format for a binding range's image format.
pub fn texture_format(format: ImageFormat) -> TextureFormat {
    use ImageFormat as I;
    use TextureFormat as T;

    match format {
        I::Unknown => T::Unknown,
        I::Rgba32f => T::RGBA32F,
        I::Rgba16f => T::RGBA16F,
        I::Rg32f => T::RG32F,
        I::Rg16f => T::RG16F,
        I::R11fG11fB10f => T::RG11B10F,
        I::R32f => T::R32F,
        I::R16f => T::R16F,
        I::Rgba16 => T::RGBA16,
        I::Rgb10A2 => T::RGB10A2,
        I::Rgba8 => T::RGBA8,
        I::Rg16 => T::RG16,
        I::Rg8 => T::RG8,
        I::R16 => T::R16,
        I::R8 => T::R8,
        I::Rgba16Snorm => T::RGBA16S,
        I::Rgba8Snorm => T::RGBA8S,
        I::Rg16Snorm => T::RG16S,
        I::Rg8Snorm => T::RG8S,
        I::R16Snorm => T::R16S,
        I::R8Snorm => T::R8S,
        I::Rgba32i => T::RGBA32I,
        I::Rgba16i => T::RGBA16I,
        I::Rgba8i => T::RGBA8I,
        I::Rg32i => T::RG32I,
        I::Rg16i => T::RG16I,
        I::Rg8i => T::RG8I,
        I::R32i => T::R32I,
        I::R16i => T::R16I,
        I::R8i => T::R8I,
        I::Rgba32ui => T::RGBA32U,
        I::Rgba16ui => T::RGBA16U,
        I::Rgb10A2ui => T::RGB10A2,
        I::Rgba8ui => T::RGBA8U,
        I::Rg32ui => T::RG32U,
        I::Rg16ui => T::RG16U,
        I::Rg8ui => T::RG8U,
        I::R32ui => T::R32U,
        I::R16ui => T::R16U,
        I::R8ui => T::R8U,
        I::R64ui | I::R64i => T::Unknown,
        I::Bgra8 => T::BGRA8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(shape: ResourceShape, result: ScalarType) -> ResourceType {
        ResourceType { shape, result }
    }

    #[test]
    fn wire_numbering() {
        assert_eq!(TextureFormat::BC1 as u16, 0);
        assert_eq!(TextureFormat::Unknown as u16, 34);
        assert_eq!(TextureFormat::R8 as u16, 37);
        assert_eq!(TextureFormat::BGRA8 as u16, 66);
        assert_eq!(TextureFormat::RGBA8 as u16, 67);
        assert_eq!(TextureFormat::D0S8 as u16, 95);
    }

    #[test]
    fn plain_2d_reports_as_array() {
        let tex = texture(ResourceShape::Texture2D, ScalarType::Float32);
        assert_eq!(dimension(&tex), TextureDimension::Dimension2DArray);
        let cube = texture(ResourceShape::TextureCubeArray, ScalarType::Float32);
        assert_eq!(dimension(&cube), TextureDimension::DimensionCubeArray);
        let buffer = texture(ResourceShape::Buffer, ScalarType::Float32);
        assert_eq!(dimension(&buffer), TextureDimension::Unknown);
    }

    #[test]
    fn component_from_result_scalar() {
        let tex = |s| texture(ResourceShape::Texture2D, s);
        assert_eq!(component_type(&tex(ScalarType::Float16)), TextureComponentType::Float);
        assert_eq!(component_type(&tex(ScalarType::Int32)), TextureComponentType::Int);
        assert_eq!(component_type(&tex(ScalarType::UInt8)), TextureComponentType::Uint);
        assert_eq!(component_type(&tex(ScalarType::Bool)), TextureComponentType::Float);
    }

    #[test]
    fn sixty_four_bit_formats_are_unknown() {
        assert_eq!(texture_format(ImageFormat::R64ui), TextureFormat::Unknown);
        assert_eq!(texture_format(ImageFormat::R64i), TextureFormat::Unknown);
        assert_eq!(texture_format(ImageFormat::Rgba8), TextureFormat::RGBA8);
        assert_eq!(texture_format(ImageFormat::Rgb10A2ui), TextureFormat::RGB10A2);
    }
}
