use serde::{Deserialize, Serialize};

/// A declared input of an executable, or an argument passed by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub name: String,
    /// Default value expression. `None` means the value is taken from the caller.
    pub expression: Option<String>,
    pub required: bool,
    pub encrypted: bool,
    pub overridable: bool,
}

impl Input {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: None,
            required: true,
            encrypted: false,
            overridable: false,
        }
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }
}

/// An output, publish or aggregate binding: `name` receives the value of `expression`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    pub expression: String,
}

impl Output {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }
}

/// A possible result of an executable.
///
/// Results are matched in declaration order; a result without an
/// expression always matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBinding {
    pub name: String,
    pub expression: Option<String>,
}

impl ResultBinding {
    pub fn new(name: impl Into<String>, expression: Option<String>) -> Self {
        Self {
            name: name.into(),
            expression,
        }
    }
}

/// Java method invoked by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaAction {
    pub class_name: String,
    pub method_name: String,
}
