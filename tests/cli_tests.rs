use std::io::Write;

use refineflow::cli::{load_workflow_file, run_workflow_file, validate_workflow_file};
use serde_json::json;

fn workflow_json() -> String {
    json!({
        "outputSchemas": {
            "draft": {
                "type": "object",
                "properties": { "result": { "type": "string" } },
                "required": ["result"]
            }
        },
        "agents": {
            "writer": { "name": "Writer", "instructions": "Write.", "outputSchemaRef": "draft" }
        },
        "mcpServers": {},
        "flow": {
            "steps": [ { "id": "write", "type": "single_agent", "agentRef": "writer" } ]
        }
    })
    .to_string()
}

fn write_temp_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_a_workflow_file() {
    let file = write_temp_config(&workflow_json());
    let config = load_workflow_file(file.path()).expect("load");
    assert_eq!(config.steps().len(), 1);
    assert!(config.agents.contains_key("writer"));
}

#[test]
fn missing_file_error_names_the_path() {
    let error = load_workflow_file(std::path::Path::new("/nonexistent/workflow.json")).unwrap_err();
    assert!(error.to_string().contains("/nonexistent/workflow.json"));
}

#[test]
fn validate_accepts_a_well_formed_file() {
    let file = write_temp_config(&workflow_json());
    validate_workflow_file(file.path(), Some("sk-test-credential".to_string())).expect("validate");
}

#[test]
fn validate_rejects_a_bad_server_spec() {
    let mut value: serde_json::Value = serde_json::from_str(&workflow_json()).expect("json");
    value["mcpServers"]["tools"] = json!({ "type": "stdio" });
    let file = write_temp_config(&value.to_string());
    let error =
        validate_workflow_file(file.path(), Some("sk-test-credential".to_string())).unwrap_err();
    assert!(error.to_string().contains("tools"));
}

#[tokio::test]
async fn dry_run_produces_a_standardized_result() {
    let file = write_temp_config(&workflow_json());
    let output = run_workflow_file(
        file.path(),
        "hello",
        Some("sk-test-credential".to_string()),
    )
    .await
    .expect("run");

    let result = output["result"].as_str().expect("result string");
    assert!(result.contains("hello"));
}
