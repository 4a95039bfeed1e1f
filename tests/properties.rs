//! Property-based tests for loop parsing, reference resolution and default
//! navigation.
mod common;
use common::*;
use proptest::prelude::*;
use serde_json::json;
use slang_modeller::modeller::{parse_loop_statement, resolve_reference};
use slang_modeller::prelude::*;

prop_compose! {
    /// Identifiers accepted as loop variables.
    fn arb_identifier()(name in r"[a-z_][a-z0-9_]{0,8}") -> String {
        name
    }
}

prop_compose! {
    fn arb_padding()(pad in r"[ \t]{1,4}") -> String {
        pad
    }
}

mod loop_parsing {
    use super::*;

    proptest! {
        #[test]
        fn test_parsing_never_panics(raw in ".*", parallel in any::<bool>()) {
            let _ = parse_loop_statement(&raw, parallel);
        }

        #[test]
        fn test_parsed_expression_is_never_blank(raw in "[a-z ,_()]{0,30}") {
            if let Ok(Some(statement)) = parse_loop_statement(&raw, false) {
                prop_assert!(!statement.expression().trim().is_empty());
            }
        }

        #[test]
        fn test_list_loop_round_trips_tokens(
            var in arb_identifier(),
            expression in arb_identifier(),
            left in arb_padding(),
            right in arb_padding(),
            parallel in any::<bool>(),
        ) {
            let raw = format!("{left}{var}{left}in{right}{expression}{right}");
            match parse_loop_statement(&raw, parallel) {
                Ok(Some(LoopStatement::List(statement))) => {
                    prop_assert_eq!(statement.var_name(), var);
                    prop_assert_eq!(statement.expression(), expression);
                    prop_assert_eq!(statement.is_parallel(), parallel);
                }
                other => prop_assert!(false, "unexpected result {:?} for {:?}", other, raw),
            }
        }

        #[test]
        fn test_map_loop_round_trips_tokens(
            key in arb_identifier(),
            value in arb_identifier(),
            expression in arb_identifier(),
        ) {
            prop_assume!(key != "in" && value != "in");
            let raw = format!("{key} , {value} in {expression}");
            match parse_loop_statement(&raw, true) {
                Ok(Some(LoopStatement::MapFor(statement))) => {
                    prop_assert_eq!(statement.key_name(), key);
                    prop_assert_eq!(statement.value_name(), value);
                    prop_assert_eq!(statement.expression(), expression);
                    prop_assert!(statement.is_parallel());
                }
                other => prop_assert!(false, "unexpected result {:?} for {:?}", other, raw),
            }
        }

        #[test]
        fn test_blank_clause_is_no_loop(raw in r"[ \t\n]{0,10}") {
            prop_assert_eq!(parse_loop_statement(&raw, false), Ok(None));
        }
    }
}

mod references {
    use super::*;
    use ahash::AHashMap;

    proptest! {
        #[test]
        fn test_resolution_prefixes_namespace(
            alias in arb_identifier(),
            namespace in r"[a-z]{1,6}(\.[a-z]{1,6}){0,3}",
            name in r"[a-z_][a-z0-9_.]{0,12}",
        ) {
            let imports = AHashMap::from_iter([(alias.clone(), namespace.clone())]);
            let resolved = resolve_reference(&format!("{alias}.{name}"), &imports);
            prop_assert_eq!(resolved, Ok(format!("{namespace}.{name}")));
        }
    }
}

mod navigation {
    use super::*;

    fn flow_with_tasks(count: usize) -> RawNode {
        let mut workflow = RawNode::new();
        for i in 0..count {
            let reference = format!("ops.step_{i}");
            workflow.insert(format!("task_{i}"), json!({ "do": { reference: [] } }));
        }
        let mut flow = RawNode::new();
        flow.insert("workflow".to_string(), RawValue::Object(workflow));
        flow
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_default_navigation_forms_a_chain(count in 1usize..12) {
            let compiled = Modeller::default()
                .assemble(&flow_file(), "chain", &flow_with_tasks(count))
                .unwrap();
            let tasks = compiled.as_flow().unwrap().workflow.tasks();
            prop_assert_eq!(tasks.len(), count);

            for (i, task) in tasks.iter().enumerate() {
                let expected = if i + 1 < count {
                    format!("task_{}", i + 1)
                } else {
                    SUCCESS_RESULT.to_string()
                };
                prop_assert_eq!(&task.navigation[SUCCESS_RESULT], &expected);
                prop_assert_eq!(&task.navigation[FAILURE_RESULT], FAILURE_RESULT);
                prop_assert_eq!(&task.reference_id, &format!("user.ops.step_{i}"));
            }
        }
    }
}
