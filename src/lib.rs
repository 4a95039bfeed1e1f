//! # slang-modeller - Workflow Language Semantic Modelling
//!
//! **slang-modeller** is the semantic-modelling stage of a workflow-definition-language
//! compiler. It takes the weakly-typed document tree produced by a YAML front end and
//! turns it into a strongly-typed, validated Intermediate Representation of *operations*
//! (single actions) and *flows* (graphs of tasks with explicit navigation), ready for an
//! orchestration engine to run.
//!
//! ## Core Workflow
//!
//! 1.  **Parse**: An external front end parses the source file into raw maps and lists.
//! 2.  **Describe the file**: Build a [`SlangFile`](source::SlangFile) with the file's
//!     namespace, import aliases, kind and raw executable bodies, either by hand or with
//!     [`SlangFile::from_document`](source::SlangFile::from_document).
//! 3.  **Model**: A [`Modeller`](modeller::Modeller) validates every keyword against the
//!     transformers legal in its position, converts the raw values into typed bindings,
//!     synthesizes default navigation, splices the on-failure branch and resolves task
//!     references through the import table.
//! 4.  **Hand off**: The resulting [`CompiledExecutable`](compiled::CompiledExecutable)
//!     values are immutable and serializable.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slang_modeller::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let document = json!({
//!         "namespace": "user.flows",
//!         "imports": { "ops": "user.ops" },
//!         "flow": {
//!             "name": "hello_flow",
//!             "inputs": ["who"],
//!             "workflow": {
//!                 "greet": { "do": { "ops.print": [ { "text": "who" } ] } },
//!                 "wave": {
//!                     "loop": "hand in hands",
//!                     "do": { "ops.wave": [] }
//!                 }
//!             }
//!         }
//!     });
//!     let RawValue::Object(document) = document else { unreachable!() };
//!
//!     let file = SlangFile::from_document("hello_flow.sl", &document)?;
//!     let modeller = Modeller::builder().build();
//!
//!     for executable in modeller.model_file(&file)? {
//!         println!("compiled {}", executable.id());
//!         if let Some(flow) = executable.as_flow() {
//!             for task in flow.workflow.tasks() {
//!                 println!("  {} -> {} {:?}", task.name, task.reference_id, task.navigation);
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod compiled;
pub mod entities;
pub mod error;
pub mod modeller;
pub mod prelude;
pub mod source;
