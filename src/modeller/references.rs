use crate::error::ReferenceError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What to do with a reference whose alias is not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Fail with a `ReferenceError`.
    #[default]
    Strict,
    /// Keep the reference exactly as written and log a warning.
    Lenient,
}

/// Resolves `alias.name` against the import table: `imports[alias] + "." + name`.
///
/// Only the first `.` separates the alias, so `alias.sub.name` resolves to
/// `<namespace>.sub.name`. Both sides of that `.` must be non-empty.
pub fn resolve_reference(
    reference: &str,
    imports: &AHashMap<String, String>,
) -> Result<String, ReferenceError> {
    let (alias, name) = reference
        .split_once('.')
        .filter(|(alias, name)| !alias.is_empty() && !name.is_empty())
        .ok_or_else(|| ReferenceError::MissingAlias {
            reference: reference.to_string(),
        })?;

    imports
        .get(alias)
        .map(|namespace| format!("{}.{}", namespace, name))
        .ok_or_else(|| ReferenceError::UnknownAlias {
            alias: alias.to_string(),
            reference: reference.to_string(),
        })
}

/// [`resolve_reference`] under `policy`.
pub fn resolve_with_policy(
    reference: &str,
    imports: &AHashMap<String, String>,
    policy: ReferencePolicy,
) -> Result<String, ReferenceError> {
    match (resolve_reference(reference, imports), policy) {
        (Ok(id), _) => Ok(id),
        (Err(err), ReferencePolicy::Lenient) => {
            warn!(reference = %reference, error = %err, "keeping unresolved reference");
            Ok(reference.to_string())
        }
        (Err(err), ReferencePolicy::Strict) => Err(err),
    }
}
