// This module implements the target profile registry. A static table maps the names users
// pass on the command line (dx, spirv_1_4, glsl_330, gles, ...) to immutable TargetProfile
// values describing the container flavour to emit: native DXBC bytecode, portable SPIR-V
// bytecode, or GLSL / GLSL ES text decompiled from SPIR-V. Each profile knows the code the
// front end must produce, the profile identifier to request, the short tag used in output
// path templates, and the preprocessor macros the shader library expects. TargetSettings
// pairs a profile with caller-supplied options and derives the per-stage option list,
// adding optimisation, the macros, and the Vulkan binding shifts that keep vertex and
// fragment constant buffers, textures and samplers in the slots the runtime binds.

//! Target profile registry.

use std::fmt;

use crate::core::{CodeTarget, CompilerOption, ShiftKind, Stage};

/// Kind of container payload a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Unknown,
    /// Native bytecode (DXBC).
    NativeBytecode,
    /// Portable intermediate bytecode (SPIR-V).
    PortableBytecode,
    /// Desktop GLSL text.
    Glsl,
    /// GLSL ES text.
    GlslEs,
}

impl OutputKind {
    /// Whether the payload is decompiled text rather than bytecode.
    pub fn is_text(self) -> bool {
        matches!(self, OutputKind::Glsl | OutputKind::GlslEs)
    }

    /// Whether resource bindings have to be shifted into the runtime's slots.
    pub fn needs_binding_shift(self) -> bool {
        matches!(
            self,
            OutputKind::PortableBytecode | OutputKind::Glsl | OutputKind::GlslEs
        )
    }
}

/// An immutable entry of the registry.
#[derive(Debug, Clone, Copy, Eq)]
pub struct TargetProfile {
    pub kind: OutputKind,
    pub name: &'static str,
    pub id: &'static str,
}

impl PartialEq for TargetProfile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

const SPIRV_PROFILE_FOR_TEXT: &str = "spirv_1_3";
const CB_SHIFT_VERTEX: u32 = 0;
const CB_SHIFT_FRAGMENT: u32 = 1;
const TEXTURE_SHIFT: u32 = 2;
const SAMPLER_SHIFT: u32 = 18;
const UNORDERED_ACCESS_SHIFT: u32 = 2;
const OPTIMIZATION_LEVEL: u32 = 3;

impl TargetProfile {
    const fn new(kind: OutputKind, name: &'static str, id: &'static str) -> Self {
        Self { kind, name, id }
    }

    /// The sentinel returned for unknown names.
    pub const UNKNOWN: TargetProfile = TargetProfile::new(OutputKind::Unknown, "", "");

    pub fn is_unknown(&self) -> bool {
        self.kind == OutputKind::Unknown
    }

    /// Tag used for `{{target}}` in output path templates.
    pub fn short_name(&self) -> &'static str {
        match self.kind {
            OutputKind::NativeBytecode => "dx11",
            OutputKind::PortableBytecode => "spirv",
            OutputKind::Glsl => "glsl",
            OutputKind::GlslEs => "essl",
            OutputKind::Unknown => "unknown",
        }
    }

    /// Code the front end has to emit for this profile.
    pub fn front_end_target(&self) -> CodeTarget {
        match self.kind {
            OutputKind::NativeBytecode => CodeTarget::Dxbc,
            _ => CodeTarget::Spirv,
        }
    }

    /// Profile identifier handed to the front end.
    ///
    /// Text targets are compiled to SPIR-V first and decompiled afterwards.
    pub fn front_end_profile(&self) -> &'static str {
        if self.kind.is_text() {
            SPIRV_PROFILE_FOR_TEXT
        } else {
            self.id
        }
    }

    /// GLSL version of a text profile (`glsl_430` → 430).
    pub fn glsl_version(&self) -> Option<u32> {
        if !self.kind.is_text() {
            return None;
        }
        self.id.get(5..).and_then(|v| v.parse().ok())
    }

    /// Macros defined while compiling shaders for this profile.
    pub fn defines(&self) -> Vec<(&'static str, String)> {
        match self.kind {
            OutputKind::NativeBytecode => vec![("BGFX_SHADER_LANGUAGE_HLSL", "500".to_string())],
            OutputKind::PortableBytecode => vec![("BGFX_SHADER_LANGUAGE_SPIRV", "1".to_string())],
            OutputKind::Glsl => {
                let version = self.glsl_version().unwrap_or_default().to_string();
                vec![("BGFX_SHADER_LANGUAGE_GLSL", version)]
            }
            OutputKind::GlslEs => {
                let version = self.glsl_version().unwrap_or_default().to_string();
                vec![
                    ("BGFX_SHADER_LANGUAGE_GLSL", version.clone()),
                    ("BGFX_SHADER_LANGUAGE_ESSL", version),
                ]
            }
            OutputKind::Unknown => Vec::new(),
        }
    }
}

impl fmt::Display for TargetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Every profile a user can ask for by name.
pub const TARGET_PROFILES: &[TargetProfile] = &[
    TargetProfile::new(OutputKind::NativeBytecode, "dx", "sm_5_0"),
    TargetProfile::new(OutputKind::NativeBytecode, "sm_5_0", "sm_5_0"),
    TargetProfile::new(OutputKind::PortableBytecode, "spirv", "spirv_1_3"),
    TargetProfile::new(OutputKind::PortableBytecode, "spirv_1_3", "spirv_1_3"),
    TargetProfile::new(OutputKind::PortableBytecode, "spirv_1_4", "spirv_1_4"),
    TargetProfile::new(OutputKind::PortableBytecode, "spirv_1_5", "spirv_1_5"),
    TargetProfile::new(OutputKind::PortableBytecode, "spirv_1_6", "spirv_1_6"),
    TargetProfile::new(OutputKind::Glsl, "glsl", "glsl_430"),
    TargetProfile::new(OutputKind::Glsl, "glsl_150", "glsl_150"),
    TargetProfile::new(OutputKind::Glsl, "glsl_330", "glsl_330"),
    TargetProfile::new(OutputKind::Glsl, "glsl_410", "glsl_410"),
    TargetProfile::new(OutputKind::Glsl, "glsl_430", "glsl_430"),
    TargetProfile::new(OutputKind::Glsl, "glsl_440", "glsl_440"),
    TargetProfile::new(OutputKind::GlslEs, "gles", "gles_300"),
    TargetProfile::new(OutputKind::GlslEs, "gles_300", "gles_300"),
    TargetProfile::new(OutputKind::GlslEs, "gles_310", "gles_310"),
    TargetProfile::new(OutputKind::GlslEs, "gles_320", "gles_320"),
];

/// Look a profile up by name, returning [`TargetProfile::UNKNOWN`] if absent.
pub fn find_profile(name: &str) -> TargetProfile {
    TARGET_PROFILES
        .iter()
        .find(|profile| profile.name == name)
        .copied()
        .unwrap_or(TargetProfile::UNKNOWN)
}

/// A requested target plus caller-supplied options.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSettings {
    pub profile: TargetProfile,
    pub options: Vec<CompilerOption>,
}

impl TargetSettings {
    pub fn new(profile: TargetProfile, options: Vec<CompilerOption>) -> Self {
        Self { profile, options }
    }

    /// Full option list for compiling a `stage` entry point to this target.
    pub fn compiler_options(&self, stage: Stage) -> Vec<CompilerOption> {
        let mut options = self.options.clone();
        options.push(CompilerOption::Optimization(OPTIMIZATION_LEVEL));

        for (name, value) in self.profile.defines() {
            options.push(CompilerOption::MacroDefine {
                name: name.to_string(),
                value,
            });
        }

        if self.profile.kind.needs_binding_shift() {
            let cb_shift = if stage == Stage::Fragment {
                CB_SHIFT_FRAGMENT
            } else {
                CB_SHIFT_VERTEX
            };
            options.extend([
                CompilerOption::VulkanBindShiftAll {
                    kind: ShiftKind::ConstantBuffer,
                    shift: cb_shift,
                },
                CompilerOption::VulkanBindShiftAll {
                    kind: ShiftKind::Sampler,
                    shift: SAMPLER_SHIFT,
                },
                CompilerOption::VulkanBindShiftAll {
                    kind: ShiftKind::ShaderResource,
                    shift: TEXTURE_SHIFT,
                },
                CompilerOption::VulkanBindShiftAll {
                    kind: ShiftKind::UnorderedAccess,
                    shift: UNORDERED_ACCESS_SHIFT,
                },
            ]);
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cb_shift(options: &[CompilerOption]) -> Option<u32> {
        options.iter().find_map(|option| match option {
            CompilerOption::VulkanBindShiftAll {
                kind: ShiftKind::ConstantBuffer,
                shift,
            } => Some(*shift),
            _ => None,
        })
    }

    #[test]
    fn lookup_by_name() {
        let dx = find_profile("dx");
        assert_eq!(dx.kind, OutputKind::NativeBytecode);
        assert_eq!(dx.id, "sm_5_0");
        assert_eq!(dx, find_profile("sm_5_0"));
        assert_eq!(find_profile("spirv").id, "spirv_1_3");
        assert_eq!(find_profile("gles").kind, OutputKind::GlslEs);
    }

    #[test]
    fn unknown_name_returns_sentinel() {
        let profile = find_profile("metal");
        assert!(profile.is_unknown());
        assert_eq!(profile.short_name(), "unknown");
    }

    #[test]
    fn text_profiles_compile_through_spirv() {
        let glsl = find_profile("glsl_330");
        assert_eq!(glsl.front_end_target(), CodeTarget::Spirv);
        assert_eq!(glsl.front_end_profile(), "spirv_1_3");
        assert_eq!(glsl.glsl_version(), Some(330));
        assert_eq!(find_profile("gles_310").glsl_version(), Some(310));
        assert_eq!(find_profile("spirv_1_5").front_end_profile(), "spirv_1_5");
        assert_eq!(find_profile("dx").front_end_target(), CodeTarget::Dxbc);
        assert_eq!(find_profile("dx").glsl_version(), None);
    }

    #[test]
    fn short_names() {
        assert_eq!(find_profile("dx").short_name(), "dx11");
        assert_eq!(find_profile("spirv_1_6").short_name(), "spirv");
        assert_eq!(find_profile("glsl").short_name(), "glsl");
        assert_eq!(find_profile("gles").short_name(), "essl");
    }

    #[test]
    fn binding_shifts_depend_on_stage() {
        let spirv = TargetSettings::new(find_profile("spirv"), Vec::new());
        assert_eq!(cb_shift(&spirv.compiler_options(Stage::Vertex)), Some(0));
        assert_eq!(cb_shift(&spirv.compiler_options(Stage::Fragment)), Some(1));

        let glsl = TargetSettings::new(find_profile("glsl"), Vec::new());
        assert_eq!(cb_shift(&glsl.compiler_options(Stage::Fragment)), Some(1));
    }

    #[test]
    fn native_bytecode_has_no_binding_shift() {
        let dx = TargetSettings::new(
            find_profile("dx"),
            vec![CompilerOption::MatrixLayoutColumnMajor],
        );
        let options = dx.compiler_options(Stage::Fragment);
        assert_eq!(cb_shift(&options), None);
        assert_eq!(options[0], CompilerOption::MatrixLayoutColumnMajor);
        assert!(options.contains(&CompilerOption::Optimization(3)));
        assert!(options.contains(&CompilerOption::MacroDefine {
            name: "BGFX_SHADER_LANGUAGE_HLSL".into(),
            value: "500".into(),
        }));
    }
}
