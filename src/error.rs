use thiserror::Error;

/// Errors raised while checking keywords, loop clauses and value shapes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No transformer were found for key: {key} at: {context}")]
    UnknownKeyword { key: String, context: String },

    #[error("Argument[{token}] violates character rules.")]
    CharacterRules { token: String },

    #[error("loop expression cannot be empty")]
    EmptyLoopExpression,

    #[error("{which} name cannot be empty")]
    BlankLoopName { which: &'static str },

    #[error(
        "Key: '{key}' expected a list but got a map\nBy the Yaml spec lists properties are marked with a '- ' (dash followed by a space)"
    )]
    ExpectedList { key: String },

    #[error(
        "Key: '{key}' expected a map but got a list\nBy the Yaml spec maps properties are NOT marked with a '- ' (dash followed by a space)"
    )]
    ExpectedMap { key: String },

    #[error("Key: '{key}' expected a {expected} but got a {found}")]
    ShapeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Key: '{key}' has an invalid entry: {message}")]
    InvalidEntry { key: String, message: String },
}

/// Errors raised when a required piece of structure is missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("Executable data for: {name} is empty")]
    EmptyExecutable { name: String },

    #[error("Flow: {name} has no workflow data")]
    NoWorkflowData { name: String },

    #[error("Operation: {name} has no action data")]
    NoActionData { name: String },

    #[error("Flow must have tasks in its workflow")]
    NoTasks,

    #[error("Task: {name} has no data")]
    TaskHasNoData { name: String },

    #[error("Task: {name} has no reference information")]
    NoReferenceInformation { name: String },

    #[error("File: {file} is not a flow type or operations")]
    UnsupportedFileType { file: String },
}

/// Errors raised while resolving an alias-qualified reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Reference: '{reference}' uses import alias '{alias}' which is not declared in the file imports")]
    UnknownAlias { alias: String, reference: String },

    #[error("Reference: '{reference}' is not qualified by an import alias")]
    MissingAlias { reference: String },
}

/// The single terminal error of a modelling run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompilationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

pub type Result<T> = std::result::Result<T, CompilationError>;
