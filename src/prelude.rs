//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types of the crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use slang_modeller::prelude::*;
//!
//! # fn run_example(document: &RawNode) -> Result<()> {
//! let file = SlangFile::from_document("flow.sl", document)?;
//! let executables = Modeller::default().model_file(&file)?;
//! println!("Compiled {} executables", executables.len());
//! # Ok(())
//! # }
//! ```

// Modelling entry points
pub use crate::modeller::{Modeller, ModellerBuilder, ModellerConfig, ReferencePolicy};

// Input
pub use crate::source::{RawNode, RawValue, SlangFile, SlangFileType};

// Compiled IR
pub use crate::compiled::{
    BindingData, CompiledExecutable, CompiledFlow, CompiledOperation, CompiledTask,
    CompiledWorkflow, DoAction, ExecutableSignature, Navigation, TypedValue,
};
pub use crate::entities::constants::{FAILURE_RESULT, SUCCESS_RESULT};
pub use crate::entities::{
    Input, JavaAction, ListLoopStatement, LoopStatement, MapForLoopStatement, Output,
    ResultBinding,
};

// Error types
pub use crate::error::{
    CompilationError, ReferenceError, Result, StructuralError, ValidationError,
};
