use super::ModellerConfig;
use super::references::resolve_with_policy;
use super::registry::{TransformerRegistry, run_transformers, validate_keywords};
use super::transformers::Scope;
use crate::compiled::{CompiledTask, CompiledWorkflow, Navigation, TypedValue};
use crate::entities::constants::{DO_KEY, FAILURE_RESULT, NAVIGATION_KEY, SUCCESS_RESULT};
use crate::error::{CompilationError, StructuralError, ValidationError};
use crate::source::raw::{get_ignore_case, shape_name};
use crate::source::{RawNode, RawValue};
use ahash::AHashMap;
use std::borrow::Cow;
use tracing::debug;

/// Turns the ordered task map of a flow into a `CompiledWorkflow`.
pub(super) struct WorkflowBuilder<'a> {
    registry: &'a TransformerRegistry,
    config: &'a ModellerConfig,
    imports: &'a AHashMap<String, String>,
    task_keywords: Vec<String>,
}

impl<'a> WorkflowBuilder<'a> {
    pub(super) fn new(
        registry: &'a TransformerRegistry,
        config: &'a ModellerConfig,
        imports: &'a AHashMap<String, String>,
    ) -> Self {
        let task_keywords = [DO_KEY, NAVIGATION_KEY]
            .into_iter()
            .map(str::to_string)
            .chain(config.extra_task_keywords.iter().cloned())
            .collect();
        Self {
            registry,
            config,
            imports,
            task_keywords,
        }
    }

    /// Compiles `tasks` in declaration order, then appends the tasks of
    /// `on_failure` unchanged.
    ///
    /// Each task falls through to its successor on `SUCCESS`. On `FAILURE`
    /// it goes to the first on-failure task, or the terminal `FAILURE`.
    pub(super) fn build(
        &self,
        tasks: &[(&str, &RawValue)],
        on_failure: Option<CompiledWorkflow>,
    ) -> Result<CompiledWorkflow, CompilationError> {
        if tasks.is_empty() {
            return Err(StructuralError::NoTasks.into());
        }

        let default_failure = on_failure
            .as_ref()
            .and_then(CompiledWorkflow::first_task)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| FAILURE_RESULT.to_string());

        debug!(tasks = tasks.len(), on_failure = on_failure.is_some(), "compiling workflow");

        let mut entries = tasks.iter().peekable();
        let mut compiled = Vec::with_capacity(tasks.len());
        while let Some((name, raw_task)) = entries.next() {
            let following = entries.peek().map(|(next, _)| *next);
            let raw_task = task_body(name, raw_task)?;
            compiled.push(self.compile_task(name, &raw_task, following, &default_failure)?);
        }

        let failure_tasks = on_failure.map(CompiledWorkflow::into_tasks).unwrap_or_default();
        Ok(CompiledWorkflow::new(
            compiled.into_iter().chain(failure_tasks).collect(),
        ))
    }

    pub(super) fn compile_task(
        &self,
        name: &str,
        raw_task: &RawNode,
        following_task: Option<&str>,
        default_failure: &str,
    ) -> Result<CompiledTask, CompilationError> {
        if raw_task.is_empty() {
            return Err(StructuralError::TaskHasNoData {
                name: name.to_string(),
            }
            .into());
        }
        debug!(task = %name, "compiling task");

        let pre = self.registry.scoped(Scope::BeforeTask);
        let post = self.registry.scoped(Scope::AfterTask);
        let legal = self.registry.union(&[Scope::BeforeTask, Scope::AfterTask]);
        validate_keywords(raw_task, &legal, &self.task_keywords, name)?;

        let pre_task_data = run_transformers(raw_task, pre)?;
        let mut post_task_data = run_transformers(raw_task, post)?;

        let reference = match get_ignore_case(raw_task, DO_KEY) {
            Some(RawValue::Object(do_data)) if do_data.len() == 1 => do_data.keys().next(),
            _ => None,
        }
        .ok_or_else(|| StructuralError::NoReferenceInformation {
            name: name.to_string(),
        })?;
        let reference_id =
            resolve_with_policy(reference, self.imports, self.config.reference_policy)?;

        let navigation = match post_task_data.remove(NAVIGATION_KEY) {
            Some(TypedValue::Navigation(explicit)) if !explicit.is_empty() => explicit,
            _ => default_navigation(following_task, default_failure),
        };

        Ok(CompiledTask {
            name: name.to_string(),
            pre_task_data,
            post_task_data,
            navigation,
            reference_id,
        })
    }
}

fn default_navigation(
    following_task: Option<&str>,
    default_failure: &str,
) -> Navigation {
    Navigation::from([
        (
            SUCCESS_RESULT.to_string(),
            following_task.unwrap_or(SUCCESS_RESULT).to_string(),
        ),
        (FAILURE_RESULT.to_string(), default_failure.to_string()),
    ])
}

/// Task entries of a workflow map in declaration order, minus `skip`.
pub(super) fn task_entries<'t>(
    workflow: &'t RawNode,
    skip: Option<&str>,
) -> Vec<(&'t str, &'t RawValue)> {
    workflow
        .iter()
        .filter(|(name, _)| Some(name.as_str()) != skip)
        .map(|(name, raw)| (name.as_str(), raw))
        .collect()
}

/// A task with no body compiles as an empty node and is rejected by name.
fn task_body<'r>(name: &str, raw: &'r RawValue) -> Result<Cow<'r, RawNode>, ValidationError> {
    match raw {
        RawValue::Object(map) => Ok(Cow::Borrowed(map)),
        RawValue::Null => Ok(Cow::Owned(RawNode::new())),
        RawValue::Array(_) => Err(ValidationError::ExpectedMap {
            key: name.to_string(),
        }),
        other => Err(ValidationError::ShapeMismatch {
            key: name.to_string(),
            expected: "map",
            found: shape_name(other),
        }),
    }
}
