//! Keywords and terminal results of the workflow language.

pub const SUCCESS_RESULT: &str = "SUCCESS";
pub const FAILURE_RESULT: &str = "FAILURE";

// Executable body
pub const FLOW_NAME_KEY: &str = "name";
pub const INPUTS_KEY: &str = "inputs";
pub const OUTPUTS_KEY: &str = "outputs";
pub const RESULTS_KEY: &str = "results";
pub const ACTION_KEY: &str = "action";
pub const WORKFLOW_KEY: &str = "workflow";
pub const ON_FAILURE_KEY: &str = "on_failure";

// Task body
pub const DO_KEY: &str = "do";
pub const NAVIGATION_KEY: &str = "navigate";

// Action body
pub const CLASS_NAME_KEY: &str = "className";
pub const METHOD_NAME_KEY: &str = "methodName";

// Input properties
pub const DEFAULT_KEY: &str = "default";
pub const REQUIRED_KEY: &str = "required";
pub const ENCRYPTED_KEY: &str = "encrypted";
pub const OVERRIDABLE_KEY: &str = "overridable";

// File level
pub const NAMESPACE_KEY: &str = "namespace";
pub const IMPORTS_KEY: &str = "imports";
pub const FLOW_TYPE: &str = "flow";
pub const OPERATIONS_TYPE: &str = "operations";
