//! Common test utilities for building raw documents and parsed files.
use serde_json::json;
use slang_modeller::prelude::*;

/// Unwraps a `json!` object literal into a raw node.
#[allow(dead_code)]
pub fn node(value: serde_json::Value) -> RawNode {
    match value {
        RawValue::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// An empty flow file importing `ops` and `flows`.
#[allow(dead_code)]
pub fn flow_file() -> SlangFile {
    SlangFile::new("simple_flow.sl", "user.flows", SlangFileType::Flow)
        .with_import("ops", "user.ops")
        .with_import("flows", "user.flows")
}

/// An empty operations file.
#[allow(dead_code)]
pub fn operations_file() -> SlangFile {
    SlangFile::new("ops.sl", "user.ops", SlangFileType::Operations)
}

/// A three-task flow body without on-failure branch.
///
/// `check_weather` -> `print_weather` -> `notify`
#[allow(dead_code)]
pub fn create_simple_flow() -> RawNode {
    node(json!({
        "name": "weather_flow",
        "inputs": ["city", { "country": "'IL'" }],
        "outputs": [{ "weather": "forecast" }],
        "results": ["SUCCESS", "FAILURE"],
        "workflow": {
            "check_weather": {
                "do": { "ops.check_weather": ["city", { "country": "country" }] },
                "publish": [{ "forecast": "weather" }]
            },
            "print_weather": {
                "do": { "ops.print": [{ "text": "forecast" }] }
            },
            "notify": {
                "do": { "flows.notify_flow": [] }
            }
        }
    }))
}

/// A two-task flow body with a two-task on-failure branch.
#[allow(dead_code)]
pub fn create_flow_with_on_failure() -> RawNode {
    node(json!({
        "name": "deploy_flow",
        "workflow": {
            "deploy": { "do": { "ops.deploy": [] } },
            "verify": { "do": { "ops.verify": [] } },
            "on_failure": {
                "rollback": { "do": { "ops.rollback": [] } },
                "report": { "do": { "ops.report": [] } }
            }
        }
    }))
}

/// A java-backed operation body.
#[allow(dead_code)]
pub fn create_java_operation() -> RawNode {
    node(json!({
        "inputs": [
            "host",
            { "port": { "default": "22", "required": false } },
            { "password": { "encrypted": true } }
        ],
        "action": {
            "java_action": {
                "className": "io.example.SshAction",
                "methodName": "execute"
            }
        },
        "outputs": ["returnCode", { "stdout": "returnResult" }],
        "results": [{ "SUCCESS": "returnCode == '0'" }, "FAILURE"]
    }))
}

/// Installs a test subscriber so `RUST_LOG=slang_modeller=debug` shows modeller logs.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
