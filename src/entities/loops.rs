use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Iteration clause attached to a task.
///
/// Every statement carries a non-blank collection expression and the
/// `parallel` flag chosen by the keyword that introduced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoopStatement {
    List(ListLoopStatement),
    MapFor(MapForLoopStatement),
}

impl LoopStatement {
    pub fn expression(&self) -> &str {
        match self {
            LoopStatement::List(s) => s.expression(),
            LoopStatement::MapFor(s) => s.expression(),
        }
    }

    pub fn is_parallel(&self) -> bool {
        match self {
            LoopStatement::List(s) => s.is_parallel(),
            LoopStatement::MapFor(s) => s.is_parallel(),
        }
    }
}

/// `<var> in <expression>`: binds each element of the collection to `var_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawListLoop")]
pub struct ListLoopStatement {
    var_name: String,
    expression: String,
    parallel: bool,
}

impl ListLoopStatement {
    pub fn new(
        var_name: impl Into<String>,
        expression: impl Into<String>,
        parallel: bool,
    ) -> Result<Self, ValidationError> {
        let expression = require_expression(expression.into())?;
        Ok(Self {
            var_name: var_name.into(),
            expression,
            parallel,
        })
    }

    pub fn var_name(&self) -> &str {
        &self.var_name
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

/// `<key>, <value> in <expression>`: binds each entry of a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMapForLoop")]
pub struct MapForLoopStatement {
    key_name: String,
    value_name: String,
    expression: String,
    parallel: bool,
}

impl MapForLoopStatement {
    pub fn new(
        key_name: impl Into<String>,
        value_name: impl Into<String>,
        expression: impl Into<String>,
        parallel: bool,
    ) -> Result<Self, ValidationError> {
        let expression = require_expression(expression.into())?;
        let key_name = key_name.into();
        let value_name = value_name.into();
        if key_name.trim().is_empty() {
            return Err(ValidationError::BlankLoopName { which: "key" });
        }
        if value_name.trim().is_empty() {
            return Err(ValidationError::BlankLoopName { which: "value" });
        }
        Ok(Self {
            key_name,
            value_name,
            expression,
            parallel,
        })
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

// Unchecked wire forms; deserialization goes through the constructors above.
#[derive(Deserialize)]
struct RawListLoop {
    var_name: String,
    expression: String,
    parallel: bool,
}

impl TryFrom<RawListLoop> for ListLoopStatement {
    type Error = ValidationError;

    fn try_from(raw: RawListLoop) -> Result<Self, Self::Error> {
        ListLoopStatement::new(raw.var_name, raw.expression, raw.parallel)
    }
}

#[derive(Deserialize)]
struct RawMapForLoop {
    key_name: String,
    value_name: String,
    expression: String,
    parallel: bool,
}

impl TryFrom<RawMapForLoop> for MapForLoopStatement {
    type Error = ValidationError;

    fn try_from(raw: RawMapForLoop) -> Result<Self, Self::Error> {
        MapForLoopStatement::new(raw.key_name, raw.value_name, raw.expression, raw.parallel)
    }
}

fn require_expression(expression: String) -> Result<String, ValidationError> {
    if expression.trim().is_empty() {
        Err(ValidationError::EmptyLoopExpression)
    } else {
        Ok(expression)
    }
}
