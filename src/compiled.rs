//! The strongly-typed IR handed to the execution engine.
//!
//! Every value here is immutable once the modeller returns it.

use crate::entities::{Input, JavaAction, LoopStatement, Output, ResultBinding};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value produced by one transformer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    Inputs(Vec<Input>),
    Outputs(Vec<Output>),
    Results(Vec<ResultBinding>),
    JavaAction(JavaAction),
    Script(String),
    Loop(LoopStatement),
    Navigation(Navigation),
    Names(Vec<String>),
}

/// Keyword -> typed value, as produced by the transformers of one scope.
/// Sorted so the serialized IR is stable.
pub type BindingData = BTreeMap<String, TypedValue>;

/// Result name -> next task name or terminal result.
pub type Navigation = BTreeMap<String, String>;

/// Fields shared by operations and flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableSignature {
    pub namespace: String,
    pub name: String,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub results: Vec<ResultBinding>,
    pub pre_executable_data: BindingData,
    pub post_executable_data: BindingData,
}

/// How an operation invokes its action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoAction {
    pub action_data: BindingData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledOperation {
    pub signature: ExecutableSignature,
    pub action: DoAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledFlow {
    pub signature: ExecutableSignature,
    pub workflow: CompiledWorkflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompiledExecutable {
    Operation(CompiledOperation),
    Flow(CompiledFlow),
}

impl CompiledExecutable {
    pub fn signature(&self) -> &ExecutableSignature {
        match self {
            CompiledExecutable::Operation(op) => &op.signature,
            CompiledExecutable::Flow(flow) => &flow.signature,
        }
    }

    pub fn name(&self) -> &str {
        &self.signature().name
    }

    pub fn namespace(&self) -> &str {
        &self.signature().namespace
    }

    /// Fully qualified identifier, the form task references resolve to.
    pub fn id(&self) -> String {
        let sig = self.signature();
        if sig.namespace.is_empty() {
            sig.name.clone()
        } else {
            format!("{}.{}", sig.namespace, sig.name)
        }
    }

    pub fn as_flow(&self) -> Option<&CompiledFlow> {
        match self {
            CompiledExecutable::Flow(flow) => Some(flow),
            CompiledExecutable::Operation(_) => None,
        }
    }

    pub fn as_operation(&self) -> Option<&CompiledOperation> {
        match self {
            CompiledExecutable::Operation(op) => Some(op),
            CompiledExecutable::Flow(_) => None,
        }
    }
}

/// The full executable path of a flow: main tasks in source order,
/// followed by the tasks of the on-failure branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledWorkflow {
    tasks: Vec<CompiledTask>,
}

impl CompiledWorkflow {
    pub(crate) fn new(tasks: Vec<CompiledTask>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[CompiledTask] {
        &self.tasks
    }

    pub fn first_task(&self) -> Option<&CompiledTask> {
        self.tasks.first()
    }

    pub fn task(&self, name: &str) -> Option<&CompiledTask> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub(crate) fn into_tasks(self) -> Vec<CompiledTask> {
        self.tasks
    }
}

/// One step of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledTask {
    pub name: String,
    pub pre_task_data: BindingData,
    pub post_task_data: BindingData,
    pub navigation: Navigation,
    /// Fully qualified id of the invoked operation or flow.
    pub reference_id: String,
}
