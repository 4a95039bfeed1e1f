//! Parser for the textual loop clause of a task.
//!
//! Grammar: `<var> in <expression>` or `<key>, <value> in <expression>`.
//! Only the first ` in ` separates the binding from the expression, so the
//! expression itself may contain further `in` tokens.

use crate::entities::{ListLoopStatement, LoopStatement, MapForLoopStatement};
use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

const IN_SEPARATOR: &str = " in ";

// `<var> in <collection_variable>`, whitespace anywhere around the tokens
static SIMPLE_FOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_]+)\s+in\s+([A-Za-z0-9_]+)\s*$").expect("valid regex")
});

static KEY_VALUE_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_]+)\s*,\s*([A-Za-z0-9_]+)\s*$").expect("valid regex")
});

static VARIABLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex"));

/// Parses `raw` into a loop statement.
///
/// Returns `Ok(None)` for a blank clause. `parallel` is decided by the keyword
/// that carried the clause, never by the clause itself.
pub fn parse_loop_statement(
    raw: &str,
    parallel: bool,
) -> Result<Option<LoopStatement>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    if let Some(caps) = SIMPLE_FOR.captures(raw) {
        let statement = ListLoopStatement::new(&caps[1], &caps[2], parallel)?;
        return Ok(Some(LoopStatement::List(statement)));
    }

    let (binding, expression) = match raw.split_once(IN_SEPARATOR) {
        Some((binding, expression)) => (binding, expression.trim()),
        None => (raw, ""),
    };

    if let Some(caps) = KEY_VALUE_PAIR.captures(binding) {
        let statement = MapForLoopStatement::new(&caps[1], &caps[2], expression, parallel)?;
        return Ok(Some(LoopStatement::MapFor(statement)));
    }

    let var_name = binding.trim();
    validate_variable_name(var_name)?;
    let statement = ListLoopStatement::new(var_name, expression, parallel)?;
    Ok(Some(LoopStatement::List(statement)))
}

fn validate_variable_name(name: &str) -> Result<(), ValidationError> {
    if VARIABLE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::CharacterRules {
            token: name.to_string(),
        })
    }
}
