//! Unit tests for the registry, reference resolution, configuration and
//! document splitting.
mod common;
use ahash::AHashMap;
use common::*;
use serde_json::json;
use slang_modeller::modeller::transformers::derive_keyword;
use slang_modeller::modeller::{
    ExpectedShape, Scope, Transformer, TransformerRegistry, partition, resolve_reference,
    run_transformers, validate_keywords,
};
use slang_modeller::prelude::*;

fn imports() -> AHashMap<String, String> {
    AHashMap::from_iter([
        ("http".to_string(), "io.cloudslang.base.http".to_string()),
        ("ops".to_string(), "user.ops".to_string()),
    ])
}

// ---- reference resolution ----

#[test]
fn test_resolve_reference() {
    assert_eq!(
        resolve_reference("http.do_something", &imports()),
        Ok("io.cloudslang.base.http.do_something".to_string())
    );
}

#[test]
fn test_resolve_reference_splits_on_first_dot() {
    assert_eq!(
        resolve_reference("ops.nested.task", &imports()).unwrap(),
        "user.ops.nested.task"
    );
}

#[test]
fn test_resolve_reference_unknown_alias() {
    let err = resolve_reference("ftp.get", &imports()).unwrap_err();
    assert_eq!(
        err,
        ReferenceError::UnknownAlias {
            alias: "ftp".to_string(),
            reference: "ftp.get".to_string(),
        }
    );
}

#[test]
fn test_resolve_reference_without_alias() {
    assert_eq!(
        resolve_reference("standalone", &imports()),
        Err(ReferenceError::MissingAlias {
            reference: "standalone".to_string()
        })
    );
}

#[test]
fn test_resolve_reference_with_empty_part() {
    for reference in ["ops.", ".name", "."] {
        assert_eq!(
            resolve_reference(reference, &imports()),
            Err(ReferenceError::MissingAlias {
                reference: reference.to_string()
            })
        );
    }
}

// ---- keywords and registry ----

#[test]
fn test_derive_keyword() {
    assert_eq!(derive_keyword(None, "OutputsTransformer"), "outputs");
    assert_eq!(derive_keyword(None, "PublishTransformer"), "publish");
    assert_eq!(derive_keyword(Some("Java_Action"), "JavaActionTransformer"), "java_action");
    assert_eq!(derive_keyword(None, "Navigate"), "navigate");
}

#[test]
fn test_transformer_keywords() {
    assert_eq!(Transformer::Inputs.keyword(), "inputs");
    assert_eq!(Transformer::ParallelLoop.keyword(), "parallel_loop");
    assert_eq!(Transformer::PythonAction.keyword(), "python_script");
    assert_eq!(Transformer::Break.to_string(), "BreakTransformer");
}

#[test]
fn test_partition_by_scope() {
    let after_task = partition(Transformer::ALL, Scope::AfterTask);
    assert_eq!(
        after_task,
        vec![
            Transformer::Publish,
            Transformer::Navigate,
            Transformer::Aggregate,
            Transformer::Break,
        ]
    );
    assert_eq!(
        partition(Transformer::ALL, Scope::Action),
        vec![Transformer::JavaAction, Transformer::PythonAction]
    );
}

#[test]
fn test_every_transformer_has_a_scope() {
    let registry = TransformerRegistry::global();
    let scoped: usize = [
        Scope::BeforeExecutable,
        Scope::AfterExecutable,
        Scope::Action,
        Scope::BeforeTask,
        Scope::AfterTask,
    ]
    .iter()
    .map(|scope| registry.scoped(*scope).len())
    .sum();
    assert_eq!(scoped, Transformer::ALL.len());
}

#[test]
fn test_union_has_no_repeats() {
    let registry = TransformerRegistry::new(Transformer::ALL);
    let union = registry.union(&[Scope::BeforeTask, Scope::BeforeTask, Scope::AfterTask]);
    assert_eq!(union.len(), 7);
}

#[test]
#[should_panic(expected = "declared twice")]
fn test_duplicate_keywords_are_rejected() {
    TransformerRegistry::new(&[Transformer::Publish, Transformer::Publish]);
}

#[test]
fn test_validate_keywords_reports_first_unknown() {
    let raw = node(json!({ "publish": [], "retry": 1, "sleep": 2 }));
    let legal = partition(Transformer::ALL, Scope::AfterTask);
    assert_eq!(
        validate_keywords(&raw, &legal, &[], "my_task"),
        Err(ValidationError::UnknownKeyword {
            key: "retry".to_string(),
            context: "my_task".to_string(),
        })
    );
    let extras = vec!["RETRY".to_string(), "sleep".to_string()];
    assert_eq!(validate_keywords(&raw, &legal, &extras, "my_task"), Ok(()));
}

#[test]
fn test_run_transformers_skips_absent_optional_keys() {
    let raw = node(json!({ "publish": [{ "a": "b" }] }));
    let data = run_transformers(&raw, &partition(Transformer::ALL, Scope::AfterTask)).unwrap();

    assert_eq!(data.len(), 1);
    assert!(data.contains_key("publish"));
}

#[test]
fn test_run_transformers_defaults_absent_lists() {
    let data = run_transformers(
        &RawNode::new(),
        &partition(Transformer::ALL, Scope::AfterExecutable),
    )
    .unwrap();
    assert_eq!(data.get("outputs"), Some(&TypedValue::Outputs(vec![])));
    assert_eq!(data.get("results"), Some(&TypedValue::Results(vec![])));
}

#[test]
fn test_expected_shape_messages() {
    let err = ExpectedShape::Sequence
        .check("publish", &json!({ "a": "b" }))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Key: 'publish' expected a list but got a map\n\
         By the Yaml spec lists properties are marked with a '- ' (dash followed by a space)"
    );

    let err = ExpectedShape::Scalar.check("loop", &json!(["x in y"])).unwrap_err();
    assert_eq!(err.to_string(), "Key: 'loop' expected a string but got a list");
    assert!(ExpectedShape::Scalar.check("loop", &json!(42)).is_ok());
}

#[test]
fn test_null_value_counts_as_absent() {
    assert_eq!(
        Transformer::Inputs.transform("inputs", Some(&RawValue::Null)),
        Ok(Some(TypedValue::Inputs(vec![])))
    );
    assert_eq!(Transformer::Publish.transform("publish", Some(&RawValue::Null)), Ok(None));
}

#[test]
fn test_break_requires_names() {
    let err = Transformer::Break
        .transform("break", Some(&json!(["FAILURE", 3])))
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidEntry { .. }));
}

// ---- configuration ----

#[test]
fn test_config_from_json() {
    let config = ModellerConfig::from_json(
        r#"{ "reference_policy": "lenient", "extra_executable_keywords": ["description"] }"#,
    )
    .unwrap();
    assert_eq!(config.reference_policy, ReferencePolicy::Lenient);
    assert_eq!(config.extra_executable_keywords, vec!["description".to_string()]);
    assert!(config.extra_task_keywords.is_empty());
}

#[test]
fn test_config_defaults() {
    let config = ModellerConfig::from_json("{}").unwrap();
    assert_eq!(config, ModellerConfig::default());
    assert_eq!(config.reference_policy, ReferencePolicy::Strict);
    assert!(ModellerConfig::from_json(r#"{ "reference_policy": "loose" }"#).is_err());
}

#[test]
fn test_builder_collects_config() {
    let modeller = Modeller::builder()
        .with_reference_policy(ReferencePolicy::Lenient)
        .with_executable_keyword("description")
        .with_task_keyword("retry")
        .build();
    let config = modeller.config();
    assert_eq!(config.reference_policy, ReferencePolicy::Lenient);
    assert_eq!(config.extra_executable_keywords, vec!["description".to_string()]);
    assert_eq!(config.extra_task_keywords, vec!["retry".to_string()]);
}

// ---- documents ----

#[test]
fn test_flow_document() {
    let document = node(json!({
        "namespace": "user.flows",
        "imports": { "ops": "user.ops" },
        "flow": {
            "name": "deploy",
            "workflow": { "step": { "do": { "ops.deploy": [] } } }
        }
    }));
    let file = SlangFile::from_document("deploy.sl", &document).unwrap();

    assert_eq!(file.file_type, SlangFileType::Flow);
    assert_eq!(file.namespace, "user.flows");
    assert_eq!(file.imports.get("ops").map(String::as_str), Some("user.ops"));
    assert_eq!(file.executables.len(), 1);
    assert_eq!(file.executables[0].0, "deploy");

    let compiled = Modeller::default().model_file(&file).unwrap();
    assert_eq!(compiled[0].id(), "user.flows.deploy");
    let step = compiled[0].as_flow().unwrap().workflow.task("step").unwrap();
    assert_eq!(step.reference_id, "user.ops.deploy");
}

#[test]
fn test_unnamed_flow_takes_file_name() {
    let document = node(json!({
        "flow": { "workflow": { "step": { "do": { "ops.deploy": [] } } } }
    }));
    let file = SlangFile::from_document("anonymous.sl", &document).unwrap();
    assert_eq!(file.executables[0].0, "anonymous.sl");
    assert!(file.namespace.is_empty());
    assert!(file.imports.is_empty());
}

#[test]
fn test_operations_document() {
    let document = node(json!({
        "namespace": "user.ops",
        "operations": [
            { "first": { "action": { "python_script": "1" } } },
            { "second": { "action": { "python_script": "2" } } }
        ]
    }));
    let file = SlangFile::from_document("ops.sl", &document).unwrap();
    assert_eq!(file.file_type, SlangFileType::Operations);

    let compiled = Modeller::default().model_file(&file).unwrap();
    let ids: Vec<String> = compiled.iter().map(CompiledExecutable::id).collect();
    assert_eq!(ids, vec!["user.ops.first", "user.ops.second"]);
}

#[test]
fn test_operations_given_as_map() {
    let document = node(json!({
        "operations": { "first": { "action": { "python_script": "1" } } }
    }));
    assert_eq!(
        SlangFile::from_document("ops.sl", &document).unwrap_err(),
        CompilationError::Validation(ValidationError::ExpectedList {
            key: "operations".to_string()
        })
    );
}

#[test]
fn test_document_without_executables() {
    let document = node(json!({ "namespace": "user.props" }));
    let err = SlangFile::from_document("props.sl", &document).unwrap_err();
    assert_eq!(err.to_string(), "File: props.sl is not a flow type or operations");
}

#[test]
fn test_file_type_keywords() {
    assert_eq!(SlangFileType::from_keyword("FLOW"), SlangFileType::Flow);
    assert_eq!(SlangFileType::from_keyword("operations"), SlangFileType::Operations);
    let other = SlangFileType::from_keyword("properties");
    assert_eq!(other, SlangFileType::Other("properties".to_string()));
    assert_eq!(other.to_string(), "properties");
}
