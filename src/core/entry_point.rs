//! Shader stages and discovered entry points.

use std::fmt;
use std::str::FromStr;

/// Pipeline stage of an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    Vertex,
    Fragment,
    Compute,
    #[default]
    Unknown,
}

impl Stage {
    /// Short tag used in output paths and on the command line.
    pub fn short_name(self) -> &'static str {
        match self {
            Stage::Vertex => "vs",
            Stage::Fragment => "fs",
            Stage::Compute => "cs",
            Stage::Unknown => "unknown",
        }
    }

    /// Inverse of [`Stage::short_name`]; anything unrecognised is `Unknown`.
    pub fn from_short_name(name: &str) -> Stage {
        match name {
            "vs" => Stage::Vertex,
            "fs" => Stage::Fragment,
            "cs" => Stage::Compute,
            _ => Stage::Unknown,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Stage::from_short_name(s) {
            Stage::Unknown => Err(format!("unknown stage `{}` (expected vs, fs or cs)", s)),
            stage => Ok(stage),
        }
    }
}

/// One argument of a user attribute such as `[Instanced(4)]`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Int(i32),
    Float(f32),
    String(String),
}

/// User-level attribute attached to an entry point function.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAttribute {
    pub name: String,
    pub args: Vec<AttributeValue>,
}

impl UserAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: AttributeValue) -> Self {
        self.args.push(arg);
        self
    }

    pub fn arg_int(&self, index: usize) -> Option<i32> {
        match self.args.get(index) {
            Some(AttributeValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn arg_float(&self, index: usize) -> Option<f32> {
        match self.args.get(index) {
            Some(AttributeValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn arg_str(&self, index: usize) -> Option<&str> {
        match self.args.get(index) {
            Some(AttributeValue::String(v)) => Some(v),
            _ => None,
        }
    }
}

/// An entry point discovered when the program was loaded.
///
/// Read-only after discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPoint {
    pub name: String,
    /// Index in the front end's list of entry points defined by the module.
    pub index: usize,
    pub stage: Stage,
    pub attributes: Vec<UserAttribute>,
}

impl EntryPoint {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&UserAttribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}
