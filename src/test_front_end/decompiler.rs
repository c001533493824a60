//! Template-driven stand-in for a SPIR-V decompiler.

use std::collections::{BTreeMap, HashMap};

use crate::core::Diagnostics;
use crate::glsl::{
    BlockMember, CombinedImageSampler, DecompiledModule, Decompiler, GlslOptions, Resource,
    ShaderResources,
};

/// Maps the entry point named in fake SPIR-V to a module template.
#[derive(Debug, Default, Clone)]
pub struct TestDecompiler {
    modules: HashMap<String, TestGlslModule>,
}

impl TestDecompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, entry_point: &str, module: TestGlslModule) -> Self {
        self.modules.insert(entry_point.to_string(), module);
        self
    }
}

impl Decompiler for TestDecompiler {
    fn parse(&self, spirv: &[u8]) -> Result<Box<dyn DecompiledModule>, String> {
        let text = std::str::from_utf8(spirv).map_err(|_| "invalid SPIR-V".to_string())?;
        let entry_point = text
            .strip_prefix("SPIRV:")
            .and_then(|rest| rest.rsplit(':').next())
            .ok_or_else(|| format!("not SPIR-V: {text}"))?;
        let module = self
            .modules
            .get(entry_point)
            .ok_or_else(|| format!("no module for entry point {entry_point}"))?;
        Ok(Box::new(module.clone()))
    }
}

/// A decompiled module whose text is rendered from a template.
#[derive(Debug, Default, Clone)]
pub struct TestGlslModule {
    template: String,
    resources: ShaderResources,
    names: BTreeMap<u32, String>,
    members: HashMap<u32, Vec<BlockMember>>,
    samplers: Vec<CombinedImageSampler>,
    options: Option<GlslOptions>,
    warning: Option<String>,
}

impl TestGlslModule {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, id: u32, name: &str) -> Self {
        self.resources.stage_inputs.push(Resource::new(id, name));
        self.names.insert(id, name.to_string());
        self
    }

    /// Report `warning` each time the module is compiled.
    pub fn with_warning(mut self, warning: &str) -> Self {
        self.warning = Some(warning.to_string());
        self
    }

    pub fn with_output(mut self, id: u32, name: &str) -> Self {
        self.resources.stage_outputs.push(Resource::new(id, name));
        self.names.insert(id, name.to_string());
        self
    }

    /// A uniform block `uniform <type_name> <instance_name>;` with `members`.
    pub fn with_uniform_buffer(
        mut self,
        id: u32,
        type_name: &str,
        instance_name: &str,
        members: Vec<BlockMember>,
    ) -> Self {
        let block = Resource {
            id,
            type_id: id,
            base_type_id: id,
            name: type_name.to_string(),
        };
        self.resources.uniform_buffers.push(block);
        self.names.insert(id, instance_name.to_string());
        self.members.insert(id, members);
        self
    }

    /// A texture and sampler pair merged into `combined_id`.
    pub fn with_combined_sampler(
        mut self,
        combined_id: u32,
        image: (u32, &str),
        sampler: (u32, &str),
    ) -> Self {
        self.names.insert(image.0, image.1.to_string());
        self.names.insert(sampler.0, sampler.1.to_string());
        self.names
            .insert(combined_id, format!("SPIRV_Cross_Combined{}{}", image.1, sampler.1));
        self.samplers.push(CombinedImageSampler {
            combined_id,
            image_id: image.0,
            sampler_id: sampler.0,
        });
        self
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut chars = self.template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            let mut digits = String::new();
            while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                digits.push(d);
                chars.next();
            }
            match digits.parse::<u32>() {
                Ok(id) => out.push_str(&self.name(id)),
                Err(_) => {
                    out.push('$');
                    out.push_str(&digits);
                }
            }
        }
        out
    }
}

impl DecompiledModule for TestGlslModule {
    fn set_options(&mut self, options: &GlslOptions) {
        self.options = Some(options.clone());
    }

    fn shader_resources(&self) -> ShaderResources {
        self.resources.clone()
    }

    fn name(&self, id: u32) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("_{id}"))
    }

    fn set_name(&mut self, id: u32, name: &str) {
        self.names.insert(id, name.to_string());
    }

    fn block_members(&self, block: &Resource) -> Vec<BlockMember> {
        self.members.get(&block.base_type_id).cloned().unwrap_or_default()
    }

    fn build_combined_image_samplers(&mut self) -> Vec<CombinedImageSampler> {
        self.samplers.clone()
    }

    fn compile(&mut self, diagnostics: &mut Diagnostics) -> Result<String, String> {
        let options = self
            .options
            .as_ref()
            .ok_or_else(|| "options were never set".to_string())?;
        if let Some(warning) = &self.warning {
            diagnostics.append(warning);
        }
        let es = if options.es { " es" } else { "" };
        Ok(format!("#version {}{}\n{}", options.version, es, self.render()))
    }
}
