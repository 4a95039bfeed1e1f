use super::loops::parse_loop_statement;
use crate::compiled::{Navigation, TypedValue};
use crate::entities::constants::{
    CLASS_NAME_KEY, DEFAULT_KEY, ENCRYPTED_KEY, METHOD_NAME_KEY, OVERRIDABLE_KEY, REQUIRED_KEY,
};
use crate::entities::{Input, JavaAction, Output, ResultBinding};
use crate::error::ValidationError;
use crate::source::RawNode;
use crate::source::raw::{RawValue, scalar_text, shape_name};
use std::fmt;

const TYPE_NAME_SUFFIX: &str = "Transformer";

const INPUT_PROPERTIES: &[&str] = &[DEFAULT_KEY, REQUIRED_KEY, ENCRYPTED_KEY, OVERRIDABLE_KEY];

/// Syntactic position in which a keyword is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    BeforeExecutable,
    AfterExecutable,
    Action,
    BeforeTask,
    AfterTask,
}

/// The raw shape a transformer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    Mapping,
    Sequence,
    Scalar,
}

impl ExpectedShape {
    fn name(self) -> &'static str {
        match self {
            ExpectedShape::Mapping => "map",
            ExpectedShape::Sequence => "list",
            ExpectedShape::Scalar => "string",
        }
    }

    /// Rejects `value` unless it has this shape. The two map/list confusions
    /// get their own messages.
    pub fn check(self, key: &str, value: &RawValue) -> Result<(), ValidationError> {
        match (self, value) {
            (ExpectedShape::Mapping, RawValue::Object(_))
            | (ExpectedShape::Sequence, RawValue::Array(_))
            | (
                ExpectedShape::Scalar,
                RawValue::String(_) | RawValue::Number(_) | RawValue::Bool(_),
            ) => Ok(()),
            (ExpectedShape::Sequence, RawValue::Object(_)) => Err(ValidationError::ExpectedList {
                key: key.to_string(),
            }),
            (ExpectedShape::Mapping, RawValue::Array(_)) => Err(ValidationError::ExpectedMap {
                key: key.to_string(),
            }),
            (expected, found) => Err(ValidationError::ShapeMismatch {
                key: key.to_string(),
                expected: expected.name(),
                found: shape_name(found),
            }),
        }
    }
}

/// Keyword of a transformer: the explicit one if declared, otherwise the
/// type name without its `Transformer` suffix, lower-cased.
pub fn derive_keyword(explicit: Option<&str>, type_name: &str) -> String {
    match explicit {
        Some(keyword) => keyword.to_lowercase(),
        None => type_name
            .strip_suffix(TYPE_NAME_SUFFIX)
            .unwrap_or(type_name)
            .to_lowercase(),
    }
}

pub type TransformResult = Result<Option<TypedValue>, ValidationError>;
type TransformFn = fn(&str, Option<&RawValue>) -> TransformResult;

/// Declares the closed set of transformers with their keyword, scopes,
/// expected shape and conversion function.
macro_rules! define_transformers {
    ( $( $variant:ident {
            keyword: $keyword:expr,
            scopes: [ $( $scope:ident ),+ ],
            expects: $shape:ident,
            transform: $func:path $(,)?
        } ),* $(,)? ) => {
        /// One recognised keyword and the conversion of its raw value.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Transformer {
            $( $variant, )*
        }

        impl Transformer {
            pub const ALL: &'static [Transformer] = &[ $( Transformer::$variant, )* ];

            pub fn type_name(&self) -> &'static str {
                match self {
                    $( Transformer::$variant => concat!(stringify!($variant), "Transformer"), )*
                }
            }

            fn explicit_keyword(&self) -> Option<&'static str> {
                match self {
                    $( Transformer::$variant => $keyword, )*
                }
            }

            pub fn scopes(&self) -> &'static [Scope] {
                match self {
                    $( Transformer::$variant => &[ $( Scope::$scope ),+ ], )*
                }
            }

            pub fn expects(&self) -> ExpectedShape {
                match self {
                    $( Transformer::$variant => ExpectedShape::$shape, )*
                }
            }

            fn transform_fn(&self) -> TransformFn {
                match self {
                    $( Transformer::$variant => $func, )*
                }
            }
        }
    };
}

define_transformers! {
    Inputs {
        keyword: None,
        scopes: [BeforeExecutable],
        expects: Sequence,
        transform: transform_inputs,
    },
    Outputs {
        keyword: None,
        scopes: [AfterExecutable],
        expects: Sequence,
        transform: transform_outputs,
    },
    Results {
        keyword: None,
        scopes: [AfterExecutable],
        expects: Sequence,
        transform: transform_results,
    },
    JavaAction {
        keyword: Some("java_action"),
        scopes: [Action],
        expects: Mapping,
        transform: transform_java_action,
    },
    PythonAction {
        keyword: Some("python_script"),
        scopes: [Action],
        expects: Scalar,
        transform: transform_script,
    },
    Do {
        keyword: None,
        scopes: [BeforeTask],
        expects: Mapping,
        transform: transform_do_arguments,
    },
    Loop {
        keyword: None,
        scopes: [BeforeTask],
        expects: Scalar,
        transform: transform_loop,
    },
    ParallelLoop {
        keyword: Some("parallel_loop"),
        scopes: [BeforeTask],
        expects: Scalar,
        transform: transform_parallel_loop,
    },
    Publish {
        keyword: None,
        scopes: [AfterTask],
        expects: Sequence,
        transform: transform_publish,
    },
    Navigate {
        keyword: None,
        scopes: [AfterTask],
        expects: Mapping,
        transform: transform_navigation,
    },
    Aggregate {
        keyword: None,
        scopes: [AfterTask],
        expects: Sequence,
        transform: transform_publish,
    },
    Break {
        keyword: None,
        scopes: [AfterTask],
        expects: Sequence,
        transform: transform_break,
    },
}

impl Transformer {
    pub fn keyword(&self) -> String {
        derive_keyword(self.explicit_keyword(), self.type_name())
    }

    pub fn is_in_scope(&self, scope: Scope) -> bool {
        self.scopes().contains(&scope)
    }

    /// Converts the raw value found under `key`.
    ///
    /// A missing or null value is handed to the conversion as `None`; some
    /// keywords then default (e.g. an empty input list), others produce nothing.
    pub fn transform(&self, key: &str, raw: Option<&RawValue>) -> TransformResult {
        let raw = raw.filter(|v| !v.is_null());
        if let Some(value) = raw {
            self.expects().check(key, value)?;
        }
        (self.transform_fn())(key, raw)
    }
}

impl fmt::Display for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

// --- conversions ---------------------------------------------------------

fn entries<'a>(raw: Option<&'a RawValue>) -> &'a [RawValue] {
    match raw {
        Some(RawValue::Array(items)) => items,
        _ => &[],
    }
}

/// Splits a `{name: value}` list entry.
fn single_entry<'a>(
    key: &str,
    map: &'a RawNode,
) -> Result<(&'a String, &'a RawValue), ValidationError> {
    let mut iter = map.iter();
    match (iter.next(), iter.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(ValidationError::InvalidEntry {
            key: key.to_string(),
            message: format!("expected a single `name: value` pair but got {} keys", map.len()),
        }),
    }
}

fn entry_text(key: &str, name: &str, value: &RawValue) -> Result<String, ValidationError> {
    scalar_text(value).ok_or_else(|| ValidationError::InvalidEntry {
        key: key.to_string(),
        message: format!("value of '{}' must be an expression, got a {}", name, shape_name(value)),
    })
}

fn flag(
    key: &str,
    name: &str,
    props: &RawNode,
    prop: &str,
    default: bool,
) -> Result<bool, ValidationError> {
    match props.get(prop) {
        None | Some(RawValue::Null) => Ok(default),
        Some(RawValue::Bool(b)) => Ok(*b),
        Some(other) => Err(ValidationError::InvalidEntry {
            key: key.to_string(),
            message: format!(
                "'{}' of '{}' must be a boolean, got a {}",
                prop,
                name,
                shape_name(other)
            ),
        }),
    }
}

fn parse_input(key: &str, entry: &RawValue) -> Result<Input, ValidationError> {
    match entry {
        RawValue::String(name) => Ok(Input::new(name.as_str())),
        RawValue::Object(map) => {
            let (name, value) = single_entry(key, map)?;
            match value {
                RawValue::Null => Ok(Input::new(name.as_str())),
                RawValue::Object(props) => {
                    let unknown = props.keys().find(|p| !INPUT_PROPERTIES.contains(&p.as_str()));
                    if let Some(unknown) = unknown {
                        return Err(ValidationError::InvalidEntry {
                            key: key.to_string(),
                            message: format!("unknown property '{}' of '{}'", unknown, name),
                        });
                    }
                    let expression = match props.get(DEFAULT_KEY) {
                        None | Some(RawValue::Null) => None,
                        Some(value) => Some(entry_text(key, name, value)?),
                    };
                    Ok(Input {
                        name: name.clone(),
                        expression,
                        required: flag(key, name, props, REQUIRED_KEY, true)?,
                        encrypted: flag(key, name, props, ENCRYPTED_KEY, false)?,
                        overridable: flag(key, name, props, OVERRIDABLE_KEY, false)?,
                    })
                }
                other => {
                    let expression = entry_text(key, name, other)?;
                    Ok(Input::new(name.as_str()).with_expression(expression))
                }
            }
        }
        other => Err(ValidationError::InvalidEntry {
            key: key.to_string(),
            message: format!(
                "expected a name or `name: value` but got a {}",
                shape_name(other)
            ),
        }),
    }
}

fn parse_output(key: &str, entry: &RawValue) -> Result<Output, ValidationError> {
    match entry {
        RawValue::String(name) => Ok(Output::new(name.as_str(), name.as_str())),
        RawValue::Object(map) => {
            let (name, value) = single_entry(key, map)?;
            Ok(Output::new(name.as_str(), entry_text(key, name, value)?))
        }
        other => Err(ValidationError::InvalidEntry {
            key: key.to_string(),
            message: format!(
                "expected a name or `name: expression` but got a {}",
                shape_name(other)
            ),
        }),
    }
}

fn parse_result(key: &str, entry: &RawValue) -> Result<ResultBinding, ValidationError> {
    match entry {
        RawValue::String(name) => Ok(ResultBinding::new(name.as_str(), None)),
        RawValue::Object(map) => {
            let (name, value) = single_entry(key, map)?;
            Ok(ResultBinding::new(name.as_str(), Some(entry_text(key, name, value)?)))
        }
        other => Err(ValidationError::InvalidEntry {
            key: key.to_string(),
            message: format!(
                "expected a result name or `name: expression` but got a {}",
                shape_name(other)
            ),
        }),
    }
}

fn transform_inputs(key: &str, raw: Option<&RawValue>) -> TransformResult {
    let inputs = entries(raw)
        .iter()
        .map(|e| parse_input(key, e))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(TypedValue::Inputs(inputs)))
}

fn transform_outputs(key: &str, raw: Option<&RawValue>) -> TransformResult {
    let outputs = entries(raw)
        .iter()
        .map(|e| parse_output(key, e))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(TypedValue::Outputs(outputs)))
}

fn transform_results(key: &str, raw: Option<&RawValue>) -> TransformResult {
    let results = entries(raw)
        .iter()
        .map(|e| parse_result(key, e))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(TypedValue::Results(results)))
}

fn transform_publish(key: &str, raw: Option<&RawValue>) -> TransformResult {
    if raw.is_none() {
        return Ok(None);
    }
    transform_outputs(key, raw)
}

fn transform_java_action(key: &str, raw: Option<&RawValue>) -> TransformResult {
    let Some(RawValue::Object(map)) = raw else {
        return Ok(None);
    };
    let required = |prop: &str| {
        map.get(prop)
            .and_then(scalar_text)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::InvalidEntry {
                key: key.to_string(),
                message: format!("'{}' is required", prop),
            })
    };
    Ok(Some(TypedValue::JavaAction(JavaAction {
        class_name: required(CLASS_NAME_KEY)?,
        method_name: required(METHOD_NAME_KEY)?,
    })))
}

fn transform_script(_key: &str, raw: Option<&RawValue>) -> TransformResult {
    Ok(raw.and_then(scalar_text).map(TypedValue::Script))
}

/// `do: {<reference>: [arguments]}`. A map that is not a single entry is
/// left for the task compiler to reject.
fn transform_do_arguments(key: &str, raw: Option<&RawValue>) -> TransformResult {
    let Some(RawValue::Object(map)) = raw else {
        return Ok(None);
    };
    if map.len() != 1 {
        return Ok(None);
    }
    let (reference, arguments) = single_entry(key, map)?;
    let arguments = match arguments {
        RawValue::Null => Vec::new(),
        RawValue::Array(items) => items
            .iter()
            .map(|e| parse_input(reference, e))
            .collect::<Result<Vec<_>, _>>()?,
        RawValue::Object(_) => {
            return Err(ValidationError::ExpectedList {
                key: reference.clone(),
            });
        }
        other => {
            return Err(ValidationError::ShapeMismatch {
                key: reference.clone(),
                expected: "list",
                found: shape_name(other),
            });
        }
    };
    Ok(Some(TypedValue::Inputs(arguments)))
}

fn transform_loop(_key: &str, raw: Option<&RawValue>) -> TransformResult {
    loop_statement(raw, false)
}

fn transform_parallel_loop(_key: &str, raw: Option<&RawValue>) -> TransformResult {
    loop_statement(raw, true)
}

fn loop_statement(raw: Option<&RawValue>, parallel: bool) -> TransformResult {
    let Some(text) = raw.and_then(scalar_text) else {
        return Ok(None);
    };
    Ok(parse_loop_statement(&text, parallel)?.map(TypedValue::Loop))
}

fn transform_navigation(key: &str, raw: Option<&RawValue>) -> TransformResult {
    let Some(RawValue::Object(map)) = raw else {
        return Ok(None);
    };
    let navigation = map
        .iter()
        .map(|(result, target)| match target {
            RawValue::String(target) => Ok((result.clone(), target.clone())),
            other => Err(ValidationError::InvalidEntry {
                key: key.to_string(),
                message: format!(
                    "target of '{}' must be a task name or result, got a {}",
                    result,
                    shape_name(other)
                ),
            }),
        })
        .collect::<Result<Navigation, _>>()?;
    Ok(Some(TypedValue::Navigation(navigation)))
}

fn transform_break(key: &str, raw: Option<&RawValue>) -> TransformResult {
    if raw.is_none() {
        return Ok(None);
    }
    let names = entries(raw)
        .iter()
        .map(|e| match e {
            RawValue::String(name) => Ok(name.clone()),
            other => Err(ValidationError::InvalidEntry {
                key: key.to_string(),
                message: format!("expected a result name but got a {}", shape_name(other)),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(TypedValue::Names(names)))
}
