//! Shared fixtures for the integration tests: a textured cube shader and a
//! container reader.

#![allow(dead_code)]

use bgfx_slang::core::{ImageFormat, Stage, TypeLayout, VariableLayout};
use bgfx_slang::glsl::BlockMember;
use bgfx_slang::test_front_end::{
    entry_point, float4, float4x4, structure, texture_2d, varying, TestDecompiler, TestGlslModule,
    TestShader,
};

pub const CUBE_SOURCE: &str =
    "// cube.slang\n[shader(\"vertex\")] VSOutput vsMain(VSInput input) { ... }\n";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `vsMain` transforms a position and passes `uv` through; `fsMain` samples `s_tex`.
pub fn cube_shader() -> TestShader {
    let vs_input = structure(
        Some("input"),
        "VSInput",
        vec![varying("pos", "POSITION", 0), varying("uv", "TEXCOORD", 0)],
    );
    let vs_output = structure(
        None,
        "VSOutput",
        vec![varying("position", "SV_Position", 0), varying("uv", "TEXCOORD", 0)],
    );
    let fs_input = structure(
        Some("input"),
        "VSOutput",
        vec![varying("position", "SV_Position", 0), varying("uv", "TEXCOORD", 0)],
    );
    let fs_output = VariableLayout::unnamed(float4()).with_semantic("SV_Target", 0);

    TestShader::new()
        .with_entry_point(entry_point("vsMain", Stage::Vertex, vec![vs_input], vs_output))
        .with_entry_point(entry_point("fsMain", Stage::Fragment, vec![fs_input], fs_output))
        .with_global(VariableLayout::new("u_color", float4()).with_offset(0), 16)
        .with_global(VariableLayout::new("u_mvp", float4x4()).with_offset(16), 64)
        .with_global(VariableLayout::new("s_tex", texture_2d()).with_binding(0), 0)
        .with_global(VariableLayout::new("s_texSampler", TypeLayout::SamplerState), 0)
        .with_image_format(ImageFormat::Rgba8)
}

/// Decompiled GLSL for both cube entry points, in the decompiler's own naming.
pub fn cube_decompiler() -> TestDecompiler {
    let members = || {
        vec![
            BlockMember::new("u_color", false),
            BlockMember::new("u_mvp", false),
        ]
    };

    let vertex = TestGlslModule::new(concat!(
        "uniform _Globals $10;\n",
        "in vec4 $1;\n",
        "in vec4 $2;\n",
        "out vec4 $3;\n",
        "void main() {\n",
        "    gl_Position = $10.u_mvp * $1;\n",
        "    $3 = $2;\n",
        "}\n",
    ))
    .with_input(1, "input.pos")
    .with_input(2, "input.uv")
    .with_output(3, "entryPointParam_vsMain.uv")
    .with_uniform_buffer(10, "_Globals", "buffer0", members());

    let fragment = TestGlslModule::new(concat!(
        "uniform _Globals $10;\n",
        "uniform sampler2D $22;\n",
        "in vec4 $4;\n",
        "out vec4 $5;\n",
        "void main() {\n",
        "    $5 = texture($22, $4.xy) * $10.u_color;\n",
        "}\n",
    ))
    .with_input(4, "input.uv")
    .with_output(5, "entryPointParam_fsMain")
    .with_uniform_buffer(10, "_Globals", "buffer0", members())
    .with_combined_sampler(22, (20, "s_tex"), (21, "s_texSampler"));

    TestDecompiler::new()
        .with_module("vsMain", vertex)
        .with_module("fsMain", fragment)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUniform {
    pub name: String,
    pub ty: u8,
    pub count: u8,
    pub reg_index: u16,
    pub reg_count: u16,
    pub tex_component: u8,
    pub tex_dimension: u8,
    pub tex_format: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedContainer {
    pub magic: [u8; 4],
    pub input_hash: u32,
    pub output_hash: u32,
    pub uniforms: Vec<ParsedUniform>,
    pub code: Vec<u8>,
    /// Attribute ids and block size, present for bytecode containers only.
    pub attributes: Option<Vec<u16>>,
    pub block_size: Option<u16>,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> &'a [u8] {
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        slice
    }

    fn u8(&mut self) -> u8 {
        self.take(1)[0]
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take(2).try_into().unwrap())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take(4).try_into().unwrap())
    }
}

/// Read a container back; panics if the layout is off by a single byte.
pub fn parse_container(bytes: &[u8], bytecode: bool) -> ParsedContainer {
    let mut r = Reader { bytes, pos: 0 };
    let magic: [u8; 4] = r.take(4).try_into().unwrap();
    let input_hash = r.u32();
    let output_hash = r.u32();

    let count = r.u16();
    let mut uniforms = Vec::new();
    for _ in 0..count {
        let len = r.u8() as usize;
        let name = String::from_utf8(r.take(len).to_vec()).unwrap();
        uniforms.push(ParsedUniform {
            name,
            ty: r.u8(),
            count: r.u8(),
            reg_index: r.u16(),
            reg_count: r.u16(),
            tex_component: r.u8(),
            tex_dimension: r.u8(),
            tex_format: r.u16(),
        });
    }

    let size = r.u32() as usize;
    let code = r.take(size).to_vec();
    assert_eq!(r.u8(), 0, "code must be followed by a zero byte");

    let (attributes, block_size) = if bytecode {
        let n = r.u8();
        let ids = (0..n).map(|_| r.u16()).collect();
        (Some(ids), Some(r.u16()))
    } else {
        (None, None)
    };

    assert_eq!(r.pos, bytes.len(), "trailing bytes after container");

    ParsedContainer {
        magic,
        input_hash,
        output_hash,
        uniforms,
        code,
        attributes,
        block_size,
    }
}
