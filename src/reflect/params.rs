//! Flattening of entry point input and output parameters.
//!
//! A parameter tree is walked depth first. Struct nodes contribute their name
//! to a dotted prefix, scalar and vector leaves are classified by semantic,
//! `void` leaves (a function returning nothing) contribute no params, and
//! every other node kind is rejected.

use log::debug;

use crate::core::{
    CompileError, CompileResult, EntryPointLayout, ScalarType, TypeLayout, VariableLayout,
};

use super::attrib::Attrib;

/// One flattened vertex attribute or varying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Declared name of the leaf field.
    pub name: String,
    /// Dotted path from the outermost named parameter (`input.uv`).
    pub qualified_name: String,
    pub attrib: Attrib,
}

impl Param {
    pub fn new(name: impl Into<String>, qualified_name: impl Into<String>, attrib: Attrib) -> Self {
        Self {
            name: name.into(),
            qualified_name: qualified_name.into(),
            attrib,
        }
    }
}

/// Flatten `var` into `out`, prefixing qualified names with `prefix`.
///
/// Internal semantics are accepted but not emitted.
pub fn extract_in_out_params(
    var: &VariableLayout,
    prefix: &str,
    out: &mut Vec<Param>,
) -> CompileResult<()> {
    let name = var.name_or_empty();

    match &var.ty {
        TypeLayout::Struct(layout) => {
            let prefix = match &var.name {
                Some(name) => format!("{prefix}{name}."),
                None => String::new(),
            };
            for field in &layout.fields {
                extract_in_out_params(field, &prefix, out)?;
            }
            Ok(())
        }
        TypeLayout::Scalar(ScalarType::Void) => Ok(()),
        TypeLayout::Scalar(_) | TypeLayout::Vector { .. } => {
            let semantic = var.semantic_name.as_deref().unwrap_or("");
            let qualified_name = format!("{prefix}{name}");

            match Attrib::from_semantic(semantic, var.semantic_index) {
                Attrib::Unknown => Err(CompileError::UnsupportedSemantic {
                    semantic: semantic.to_string(),
                    field: qualified_name,
                }),
                Attrib::Internal => Ok(()),
                attrib => {
                    out.push(Param::new(name, qualified_name, attrib));
                    Ok(())
                }
            }
        }
        _ => Err(CompileError::UnsupportedParamType {
            field: format!("{prefix}{name}"),
        }),
    }
}

/// Inputs of an entry point, in declaration order.
pub fn input_params(entry_point: &EntryPointLayout) -> CompileResult<Vec<Param>> {
    let mut params = Vec::new();
    for parameter in &entry_point.parameters {
        extract_in_out_params(parameter, "", &mut params)?;
    }
    log_params("input", &params);
    Ok(params)
}

/// Outputs of an entry point, flattened from its result.
pub fn output_params(entry_point: &EntryPointLayout) -> CompileResult<Vec<Param>> {
    let mut params = Vec::new();
    extract_in_out_params(&entry_point.result, "", &mut params)?;
    log_params("output", &params);
    Ok(params)
}

fn log_params(direction: &str, params: &[Param]) {
    debug!("   Found {} {} params:", params.len(), direction);
    for param in params {
        debug!("      - {} ({})", param.name, param.attrib);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ScalarType, Stage, StructLayout};

    fn float4(name: &str, semantic: &str, index: u32) -> VariableLayout {
        VariableLayout::new(
            name,
            TypeLayout::Vector {
                element: ScalarType::Float32,
                count: 4,
            },
        )
        .with_semantic(semantic, index)
    }

    fn structure(name: Option<&str>, fields: Vec<VariableLayout>) -> VariableLayout {
        let ty = TypeLayout::Struct(StructLayout {
            name: "VSInput".to_string(),
            fields,
            ..StructLayout::default()
        });
        match name {
            Some(name) => VariableLayout::new(name, ty),
            None => VariableLayout::unnamed(ty),
        }
    }

    fn entry(parameters: Vec<VariableLayout>, result: VariableLayout) -> EntryPointLayout {
        EntryPointLayout {
            name: "main".to_string(),
            stage: Stage::Vertex,
            parameters,
            result,
            attributes: Vec::new(),
        }
    }

    #[test]
    fn nested_structs_build_dotted_names() {
        let input = structure(
            Some("input"),
            vec![
                float4("pos", "POSITION", 0),
                structure(Some("extra"), vec![float4("uv", "TEXCOORD", 1)]),
            ],
        );
        let params = input_params(&entry(vec![input], structure(None, Vec::new()))).unwrap();

        assert_eq!(
            params,
            vec![
                Param::new("pos", "input.pos", Attrib::Position),
                Param::new("uv", "input.extra.uv", Attrib::TexCoord1),
            ]
        );
    }

    #[test]
    fn unnamed_result_struct_has_no_prefix() {
        let result = structure(
            None,
            vec![float4("position", "SV_Position", 0), float4("color", "COLOR", 0)],
        );
        let params = output_params(&entry(Vec::new(), result)).unwrap();
        assert_eq!(params, vec![Param::new("color", "color", Attrib::Color0)]);
    }

    #[test]
    fn void_result_has_no_outputs() {
        let result = VariableLayout::unnamed(TypeLayout::Scalar(ScalarType::Void));
        assert!(output_params(&entry(Vec::new(), result)).unwrap().is_empty());
    }

    #[test]
    fn unknown_semantic_names_the_field() {
        let input = structure(Some("input"), vec![float4("bar", "FOO", 0)]);
        let err = input_params(&entry(vec![input], structure(None, Vec::new()))).unwrap_err();
        match err {
            CompileError::UnsupportedSemantic { semantic, field } => {
                assert_eq!(semantic, "FOO");
                assert_eq!(field, "input.bar");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn matrices_are_not_valid_params() {
        let matrix = VariableLayout::new(
            "m",
            TypeLayout::Matrix {
                element: ScalarType::Float32,
                rows: 4,
                columns: 4,
            },
        );
        let err = input_params(&entry(vec![matrix], structure(None, Vec::new()))).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedParamType { field } if field == "m"));
    }
}
