// This module turns the front end's reflection tree into the flat lists the container needs.
// Entry point parameters and results are flattened into Params, each classified onto a
// vertex attribute slot by semantic; the global parameter scope becomes the uniform table
// plus the uniform block size; sampler uniforms carry texture component, dimension and
// format data. Everything here is a pure function of the reflection tree, and any shape the
// runtime cannot represent is reported as a CompileError rather than guessed at.

//! Reflection extraction.

pub mod attrib;
pub mod params;
pub mod texture;
pub mod uniforms;

pub use attrib::{Attrib, ATTRIB_COUNT, INSTANCE_DATA_ID};
pub use params::{extract_in_out_params, input_params, output_params, Param};
pub use texture::{TextureComponentType, TextureDimension, TextureFormat};
pub use uniforms::{extract_uniforms, Uniform, UniformType};
