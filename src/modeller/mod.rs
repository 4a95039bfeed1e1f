use crate::compiled::{
    BindingData, CompiledExecutable, CompiledFlow, CompiledOperation, CompiledWorkflow, DoAction,
    ExecutableSignature, TypedValue,
};
use crate::entities::constants::{
    ACTION_KEY, FLOW_NAME_KEY, INPUTS_KEY, ON_FAILURE_KEY, OUTPUTS_KEY, RESULTS_KEY, WORKFLOW_KEY,
};
use crate::error::{CompilationError, StructuralError, ValidationError};
use crate::source::raw::{get_ignore_case, shape_name};
use crate::source::{RawNode, RawValue, SlangFile, SlangFileType};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod loops;
pub mod references;
pub mod registry;
pub mod transformers;
mod workflow;

pub use loops::parse_loop_statement;
pub use references::{ReferencePolicy, resolve_reference};
pub use registry::{TransformerRegistry, partition, run_transformers, validate_keywords};
pub use transformers::{ExpectedShape, Scope, Transformer};

use workflow::{WorkflowBuilder, task_entries};

const ACTION_CONTEXT: &str = "action data";

/// Tunables of a `Modeller`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModellerConfig {
    pub reference_policy: ReferencePolicy,
    /// Keywords reserved by the front end that executables may carry.
    pub extra_executable_keywords: Vec<String>,
    /// Keywords reserved by the front end that tasks may carry.
    pub extra_task_keywords: Vec<String>,
}

impl ModellerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

pub struct ModellerBuilder {
    config: ModellerConfig,
}

impl ModellerBuilder {
    pub fn new() -> Self {
        Self {
            config: ModellerConfig::default(),
        }
    }
    pub fn with_config(mut self, config: ModellerConfig) -> Self {
        self.config = config;
        self
    }
    pub fn with_reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.config.reference_policy = policy;
        self
    }
    pub fn with_executable_keyword(mut self, keyword: &str) -> Self {
        self.config.extra_executable_keywords.push(keyword.to_string());
        self
    }
    pub fn with_task_keyword(mut self, keyword: &str) -> Self {
        self.config.extra_task_keywords.push(keyword.to_string());
        self
    }
    pub fn build(self) -> Modeller {
        Modeller {
            registry: TransformerRegistry::global(),
            config: self.config,
        }
    }
}

impl Default for ModellerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts raw executable bodies into compiled operations and flows.
///
/// A `Modeller` holds no per-compilation state; one instance can serve any
/// number of files, from any number of threads.
pub struct Modeller {
    registry: &'static TransformerRegistry,
    config: ModellerConfig,
}

impl Default for Modeller {
    fn default() -> Self {
        ModellerBuilder::new().build()
    }
}

impl Modeller {
    pub fn builder() -> ModellerBuilder {
        ModellerBuilder::new()
    }

    pub fn config(&self) -> &ModellerConfig {
        &self.config
    }

    /// Compiles every executable of `file`, in declaration order.
    pub fn model_file(
        &self,
        file: &SlangFile,
    ) -> Result<Vec<CompiledExecutable>, CompilationError> {
        file.executables
            .iter()
            .map(|(name, raw)| self.assemble(file, name, raw))
            .collect()
    }

    /// Compiles one executable body declared in `file`.
    pub fn assemble(
        &self,
        file: &SlangFile,
        name: &str,
        raw: &RawNode,
    ) -> Result<CompiledExecutable, CompilationError> {
        if raw.is_empty() {
            return Err(StructuralError::EmptyExecutable {
                name: name.to_string(),
            }
            .into());
        }
        debug!(
            executable = %name,
            kind = %file.file_type,
            file = %file.file_name,
            "compiling executable"
        );

        let legal = self
            .registry
            .union(&[Scope::BeforeExecutable, Scope::AfterExecutable]);
        validate_keywords(raw, &legal, &self.executable_keywords(), name)?;

        let mut pre_executable_data =
            run_transformers(raw, self.registry.scoped(Scope::BeforeExecutable))?;
        let mut post_executable_data =
            run_transformers(raw, self.registry.scoped(Scope::AfterExecutable))?;

        let signature = ExecutableSignature {
            namespace: file.namespace.clone(),
            name: name.to_string(),
            inputs: take_list(&mut pre_executable_data, INPUTS_KEY, |v| match v {
                TypedValue::Inputs(inputs) => Some(inputs),
                _ => None,
            }),
            outputs: take_list(&mut post_executable_data, OUTPUTS_KEY, |v| match v {
                TypedValue::Outputs(outputs) => Some(outputs),
                _ => None,
            }),
            results: take_list(&mut post_executable_data, RESULTS_KEY, |v| match v {
                TypedValue::Results(results) => Some(results),
                _ => None,
            }),
            pre_executable_data,
            post_executable_data,
        };

        match file.file_type {
            SlangFileType::Flow => {
                let workflow = self.compile_flow_workflow(file, name, raw)?;
                Ok(CompiledExecutable::Flow(CompiledFlow {
                    signature,
                    workflow,
                }))
            }
            SlangFileType::Operations => {
                let action = self.compile_action(name, raw)?;
                Ok(CompiledExecutable::Operation(CompiledOperation {
                    signature,
                    action,
                }))
            }
            SlangFileType::Other(_) => Err(StructuralError::UnsupportedFileType {
                file: file.file_name.clone(),
            }
            .into()),
        }
    }

    fn executable_keywords(&self) -> Vec<String> {
        [ACTION_KEY, WORKFLOW_KEY, FLOW_NAME_KEY]
            .into_iter()
            .map(str::to_string)
            .chain(self.config.extra_executable_keywords.iter().cloned())
            .collect()
    }

    fn compile_flow_workflow(
        &self,
        file: &SlangFile,
        name: &str,
        raw: &RawNode,
    ) -> Result<CompiledWorkflow, CompilationError> {
        let workflow_data = match get_ignore_case(raw, WORKFLOW_KEY) {
            Some(RawValue::Object(map)) if !map.is_empty() => map,
            Some(RawValue::Array(_)) => {
                return Err(ValidationError::ExpectedMap {
                    key: WORKFLOW_KEY.to_string(),
                }
                .into());
            }
            _ => {
                return Err(StructuralError::NoWorkflowData {
                    name: name.to_string(),
                }
                .into());
            }
        };

        let builder = WorkflowBuilder::new(self.registry, &self.config, &file.imports);
        let on_failure = match workflow_data.get(ON_FAILURE_KEY) {
            Some(RawValue::Object(failure_tasks)) if !failure_tasks.is_empty() => {
                debug!(executable = %name, "compiling on-failure branch");
                Some(builder.build(&task_entries(failure_tasks, None), None)?)
            }
            None | Some(RawValue::Null) | Some(RawValue::Object(_)) => None,
            Some(RawValue::Array(_)) => {
                return Err(ValidationError::ExpectedMap {
                    key: ON_FAILURE_KEY.to_string(),
                }
                .into());
            }
            Some(other) => {
                return Err(ValidationError::ShapeMismatch {
                    key: ON_FAILURE_KEY.to_string(),
                    expected: "map",
                    found: shape_name(other),
                }
                .into());
            }
        };

        builder.build(&task_entries(workflow_data, Some(ON_FAILURE_KEY)), on_failure)
    }

    fn compile_action(&self, name: &str, raw: &RawNode) -> Result<DoAction, CompilationError> {
        let action_raw = match get_ignore_case(raw, ACTION_KEY) {
            Some(RawValue::Object(map)) if !map.is_empty() => map,
            Some(RawValue::Array(_)) => {
                return Err(ValidationError::ExpectedMap {
                    key: ACTION_KEY.to_string(),
                }
                .into());
            }
            _ => {
                return Err(StructuralError::NoActionData {
                    name: name.to_string(),
                }
                .into());
            }
        };

        let transformers = self.registry.scoped(Scope::Action);
        validate_keywords(action_raw, transformers, &[], ACTION_CONTEXT)?;
        Ok(DoAction {
            action_data: run_transformers(action_raw, transformers)?,
        })
    }
}

/// Removes `key` from `data` and unwraps it as a list; absent means empty.
fn take_list<T>(
    data: &mut BindingData,
    key: &str,
    unwrap: impl FnOnce(TypedValue) -> Option<Vec<T>>,
) -> Vec<T> {
    data.remove(key).and_then(unwrap).unwrap_or_default()
}
