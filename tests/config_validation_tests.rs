use refineflow::{validate_config, FeedbackInjection, WorkflowConfig};
use serde_json::json;

fn base_config() -> serde_json::Value {
    json!({
        "outputSchemas": {
            "draft": {
                "type": "object",
                "properties": { "result": { "type": "string" } },
                "required": ["result"]
            }
        },
        "agents": {
            "writer": {
                "name": "Writer",
                "instructions": "Write the draft.",
                "outputSchemaRef": "draft"
            }
        },
        "mcpServers": {},
        "flow": {
            "steps": [
                { "id": "write", "type": "single_agent", "agentRef": "writer" }
            ]
        }
    })
}

#[test]
fn valid_config_passes() {
    let config = WorkflowConfig::from_value(&base_config()).expect("parse");
    assert!(validate_config(&config).is_ok());
}

#[test]
fn step_defaults_are_applied() {
    let config = WorkflowConfig::from_value(&json!({
        "flow": {
            "steps": [
                {
                    "id": "refine",
                    "type": "agent_reviewer",
                    "proposalAgentRef": "writer",
                    "reviewerAgentRef": "critic"
                }
            ]
        }
    }))
    .expect("parse");

    let step = &config.steps()[0];
    assert_eq!(step.max_turns, 8);
    assert_eq!(step.feedback_injection, FeedbackInjection::AsUser);
    assert!(step.io.carry_history);
    assert!(step.pass_condition.is_none());
}

#[test]
fn missing_flow_is_rejected() {
    let mut value = base_config();
    value.as_object_mut().unwrap().remove("flow");
    let config = WorkflowConfig::from_value(&value).expect("parse");
    let error = validate_config(&config).unwrap_err();
    assert!(error.to_string().contains("flow"));
}

#[test]
fn empty_steps_are_rejected() {
    let mut value = base_config();
    value["flow"]["steps"] = json!([]);
    let config = WorkflowConfig::from_value(&value).expect("parse");
    let error = validate_config(&config).unwrap_err();
    assert!(error.to_string().contains("steps"));
}

#[test]
fn schema_without_required_result_is_rejected_by_name() {
    let mut value = base_config();
    value["outputSchemas"]["draft"] = json!({
        "type": "object",
        "properties": { "text": { "type": "string" } },
        "required": ["text"]
    });
    let config = WorkflowConfig::from_value(&value).expect("parse");
    let error = validate_config(&config).unwrap_err();
    assert!(error.to_string().contains("draft"));
    assert!(error.to_string().contains("result"));
}

#[test]
fn result_in_properties_but_not_required_is_rejected() {
    let mut value = base_config();
    value["outputSchemas"]["draft"] = json!({
        "type": "object",
        "properties": { "result": { "type": "string" } }
    });
    let config = WorkflowConfig::from_value(&value).expect("parse");
    assert!(validate_config(&config).is_err());
}

#[test]
fn agent_missing_schema_ref_is_rejected_by_name() {
    let mut value = base_config();
    value["agents"]["writer"]
        .as_object_mut()
        .unwrap()
        .remove("outputSchemaRef");
    let config = WorkflowConfig::from_value(&value).expect("parse");
    let error = validate_config(&config).unwrap_err();
    assert!(error.to_string().contains("writer"));
}

#[test]
fn dangling_schema_ref_is_rejected_by_name() {
    let mut value = base_config();
    value["agents"]["writer"]["outputSchemaRef"] = json!("nonexistent");
    let config = WorkflowConfig::from_value(&value).expect("parse");
    let error = validate_config(&config).unwrap_err();
    assert!(error.to_string().contains("nonexistent"));
}

#[test]
fn zero_max_turns_is_rejected() {
    let mut value = base_config();
    value["flow"]["steps"][0] = json!({
        "id": "refine",
        "type": "agent_reviewer",
        "proposalAgentRef": "writer",
        "reviewerAgentRef": "writer",
        "maxTurns": 0
    });
    let config = WorkflowConfig::from_value(&value).expect("parse");
    let error = validate_config(&config).unwrap_err();
    assert!(error.to_string().contains("maxTurns"));
}
