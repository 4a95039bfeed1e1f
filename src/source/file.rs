use super::raw::{RawNode, RawValue, scalar_text, shape_name};
use crate::entities::constants::{
    FLOW_NAME_KEY, FLOW_TYPE, IMPORTS_KEY, NAMESPACE_KEY, OPERATIONS_TYPE,
};
use crate::error::{CompilationError, StructuralError, ValidationError};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared kind of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlangFileType {
    Flow,
    Operations,
    /// A kind the front end recognised but this stage cannot model.
    Other(String),
}

impl SlangFileType {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            FLOW_TYPE => SlangFileType::Flow,
            OPERATIONS_TYPE => SlangFileType::Operations,
            _ => SlangFileType::Other(keyword.to_string()),
        }
    }
}

impl fmt::Display for SlangFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlangFileType::Flow => write!(f, "{}", FLOW_TYPE),
            SlangFileType::Operations => write!(f, "{}", OPERATIONS_TYPE),
            SlangFileType::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// One parsed source file: file-level metadata plus the raw body of every
/// executable it declares, in declaration order.
#[derive(Debug, Clone)]
pub struct SlangFile {
    pub file_name: String,
    pub namespace: String,
    /// Import alias -> fully qualified namespace.
    pub imports: AHashMap<String, String>,
    pub file_type: SlangFileType,
    pub executables: Vec<(String, RawNode)>,
}

impl SlangFile {
    pub fn new(
        file_name: impl Into<String>,
        namespace: impl Into<String>,
        file_type: SlangFileType,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            namespace: namespace.into(),
            imports: AHashMap::new(),
            file_type,
            executables: Vec::new(),
        }
    }

    pub fn with_import(mut self, alias: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.imports.insert(alias.into(), namespace.into());
        self
    }

    pub fn with_executable(mut self, name: impl Into<String>, raw: RawNode) -> Self {
        self.executables.push((name.into(), raw));
        self
    }

    /// Splits a whole raw document into file metadata and executable bodies.
    ///
    /// A document holds `namespace`, `imports` and exactly one of `flow`
    /// (a single executable named by its `name` key) or `operations`
    /// (a list of `{name: body}` entries).
    pub fn from_document(
        file_name: impl Into<String>,
        document: &RawNode,
    ) -> Result<Self, CompilationError> {
        let file_name = file_name.into();
        let namespace = match document.get(NAMESPACE_KEY) {
            None | Some(RawValue::Null) => String::new(),
            Some(value) => scalar_text(value).ok_or_else(|| ValidationError::ShapeMismatch {
                key: NAMESPACE_KEY.to_string(),
                expected: "string",
                found: shape_name(value),
            })?,
        };

        let mut file = SlangFile::new(file_name.clone(), namespace, SlangFileType::Flow);
        file.imports = parse_imports(document.get(IMPORTS_KEY))?;

        if let Some(flow) = document.get(FLOW_TYPE) {
            let body = as_body(FLOW_TYPE, flow)?;
            let name = body
                .get(FLOW_NAME_KEY)
                .and_then(scalar_text)
                .unwrap_or_else(|| file_name.clone());
            file.executables.push((name, body));
        } else if let Some(operations) = document.get(OPERATIONS_TYPE) {
            file.file_type = SlangFileType::Operations;
            let entries = match operations {
                RawValue::Array(entries) => entries,
                RawValue::Object(_) => {
                    return Err(ValidationError::ExpectedList {
                        key: OPERATIONS_TYPE.to_string(),
                    }
                    .into());
                }
                other => {
                    return Err(ValidationError::ShapeMismatch {
                        key: OPERATIONS_TYPE.to_string(),
                        expected: "list",
                        found: shape_name(other),
                    }
                    .into());
                }
            };
            for entry in entries {
                let RawValue::Object(map) = entry else {
                    return Err(ValidationError::InvalidEntry {
                        key: OPERATIONS_TYPE.to_string(),
                        message: format!("expected `name: body` but got a {}", shape_name(entry)),
                    }
                    .into());
                };
                for (name, body) in map {
                    file.executables.push((name.clone(), as_body(name, body)?));
                }
            }
        } else {
            return Err(StructuralError::UnsupportedFileType { file: file_name }.into());
        }

        Ok(file)
    }
}

fn parse_imports(raw: Option<&RawValue>) -> Result<AHashMap<String, String>, ValidationError> {
    let map = match raw {
        None | Some(RawValue::Null) => return Ok(AHashMap::new()),
        Some(RawValue::Object(map)) => map,
        Some(RawValue::Array(_)) => {
            return Err(ValidationError::ExpectedMap {
                key: IMPORTS_KEY.to_string(),
            });
        }
        Some(other) => {
            return Err(ValidationError::ShapeMismatch {
                key: IMPORTS_KEY.to_string(),
                expected: "map",
                found: shape_name(other),
            });
        }
    };

    map.iter()
        .map(|(alias, namespace)| match namespace {
            RawValue::String(ns) => Ok((alias.clone(), ns.clone())),
            other => Err(ValidationError::InvalidEntry {
                key: IMPORTS_KEY.to_string(),
                message: format!(
                    "alias '{}' must name a namespace, got a {}",
                    alias,
                    shape_name(other)
                ),
            }),
        })
        .collect()
}

/// An absent body becomes an empty node so the assembler reports it by name.
fn as_body(key: &str, value: &RawValue) -> Result<RawNode, ValidationError> {
    match value {
        RawValue::Object(map) => Ok(map.clone()),
        RawValue::Null => Ok(RawNode::new()),
        RawValue::Array(_) => Err(ValidationError::ExpectedMap {
            key: key.to_string(),
        }),
        other => Err(ValidationError::ShapeMismatch {
            key: key.to_string(),
            expected: "map",
            found: shape_name(other),
        }),
    }
}
