//! Front-end adaptor over a [`TestShader`].

use std::cell::{Cell, RefCell};

use super::TestShader;
use crate::core::{
    CodeTarget, Diagnostics, EntryPointLayout, FrontEnd, FrontEndSession, LinkedProgram,
    ProgramLayout, SessionDesc, TargetDesc, VariableLayout,
};

/// Global session handle; carries a serial so tests can tell instances apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestGlobalSession(pub usize);

/// Front end that reflects a fixed [`TestShader`] whatever the source text.
#[derive(Debug, Default)]
pub struct TestFrontEnd {
    shader: TestShader,
    load_error: Option<String>,
    load_warning: Option<String>,
    link_warning: Option<String>,
    sessions: RefCell<Vec<SessionDesc>>,
    global_sessions_created: Cell<usize>,
}

impl TestFrontEnd {
    pub fn new(shader: TestShader) -> Self {
        Self {
            shader,
            ..Self::default()
        }
    }

    /// Make every module load fail with `diagnostics`.
    pub fn with_load_error(mut self, diagnostics: &str) -> Self {
        self.load_error = Some(diagnostics.to_string());
        self
    }

    /// Report `diagnostics` as a benign message whenever a module is loaded.
    pub fn with_load_warning(mut self, diagnostics: &str) -> Self {
        self.load_warning = Some(diagnostics.to_string());
        self
    }

    /// Report `diagnostics` as a benign message whenever a program is linked.
    pub fn with_link_warning(mut self, diagnostics: &str) -> Self {
        self.link_warning = Some(diagnostics.to_string());
        self
    }

    /// Every session description seen so far, oldest first.
    pub fn sessions(&self) -> Vec<SessionDesc> {
        self.sessions.borrow().clone()
    }

    pub fn global_sessions_created(&self) -> usize {
        self.global_sessions_created.get()
    }
}

impl FrontEnd for TestFrontEnd {
    type GlobalSession = TestGlobalSession;
    type Session = TestSession;

    fn create_global_session(&self) -> Result<TestGlobalSession, String> {
        let serial = self.global_sessions_created.get() + 1;
        self.global_sessions_created.set(serial);
        Ok(TestGlobalSession(serial))
    }

    fn create_session(
        &self,
        _global: &TestGlobalSession,
        desc: &SessionDesc,
    ) -> Result<TestSession, String> {
        if desc.targets.is_empty() {
            return Err("session has no targets".to_string());
        }
        self.sessions.borrow_mut().push(desc.clone());
        Ok(TestSession {
            shader: self.shader.clone(),
            targets: desc.targets.clone(),
            load_error: self.load_error.clone(),
            load_warning: self.load_warning.clone(),
            link_warning: self.link_warning.clone(),
        })
    }
}

/// Session of a [`TestFrontEnd`].
#[derive(Debug)]
pub struct TestSession {
    shader: TestShader,
    targets: Vec<TargetDesc>,
    load_error: Option<String>,
    load_warning: Option<String>,
    link_warning: Option<String>,
}

/// Loaded module; only remembers how many entry points it defines.
#[derive(Debug, Clone, Copy)]
pub struct TestModule {
    entry_point_count: usize,
}

impl FrontEndSession for TestSession {
    type Module = TestModule;
    type Program = TestProgram;

    fn load_module(
        &mut self,
        _name: &str,
        path: &str,
        _source: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<TestModule, String> {
        if let Some(error) = &self.load_error {
            return Err(format!("{path}: {error}"));
        }
        if let Some(warning) = &self.load_warning {
            diagnostics.append(warning);
        }
        Ok(TestModule {
            entry_point_count: self.shader.entry_points.len(),
        })
    }

    fn defined_entry_point_count(&self, module: &TestModule) -> usize {
        module.entry_point_count
    }

    fn link(
        &mut self,
        module: &TestModule,
        entry_points: &[usize],
        diagnostics: &mut Diagnostics,
    ) -> Result<TestProgram, String> {
        let mut linked = Vec::with_capacity(entry_points.len());
        for &index in entry_points {
            if index >= module.entry_point_count {
                return Err(format!("entry point index {index} is not defined"));
            }
            linked.push(self.shader.entry_points[index].clone());
        }
        if let Some(warning) = &self.link_warning {
            diagnostics.append(warning);
        }
        Ok(TestProgram {
            entry_points: linked,
            global_params: self.shader.global_params.clone(),
            targets: self.targets.clone(),
        })
    }
}

/// Linked program of a [`TestSession`].
#[derive(Debug, Clone)]
pub struct TestProgram {
    entry_points: Vec<EntryPointLayout>,
    global_params: VariableLayout,
    targets: Vec<TargetDesc>,
}

impl TestProgram {
    fn target_desc(&self, target_index: usize) -> Result<&TargetDesc, String> {
        self.targets
            .get(target_index)
            .ok_or_else(|| format!("target index {target_index} is not configured"))
    }

    /// Fake code emitted for an entry point: `<format>:<profile>:<entry point>`.
    pub fn fake_code(format: CodeTarget, profile: &str, entry_point: &str) -> Vec<u8> {
        let tag = match format {
            CodeTarget::Dxbc => "DXBC",
            CodeTarget::Spirv => "SPIRV",
        };
        format!("{tag}:{profile}:{entry_point}").into_bytes()
    }
}

impl LinkedProgram for TestProgram {
    fn layout(
        &self,
        target_index: usize,
        _diagnostics: &mut Diagnostics,
    ) -> Result<ProgramLayout, String> {
        self.target_desc(target_index)?;
        Ok(ProgramLayout {
            entry_points: self.entry_points.clone(),
            global_params: self.global_params.clone(),
        })
    }

    fn entry_point_code(
        &self,
        entry_point_index: usize,
        target_index: usize,
        _diagnostics: &mut Diagnostics,
    ) -> Result<Vec<u8>, String> {
        let target = self.target_desc(target_index)?;
        let entry_point = self
            .entry_points
            .get(entry_point_index)
            .ok_or_else(|| format!("entry point index {entry_point_index} is not linked"))?;
        Ok(Self::fake_code(target.format, &target.profile, &entry_point.name))
    }
}
