use std::collections::HashMap;

use refineflow::{connect_servers, DiagnosticKind, Diagnostics, McpHandle, ServerSpec};

fn stdio(command: &str, args: &[&str]) -> ServerSpec {
    ServerSpec {
        kind: "stdio".to_string(),
        command: Some(command.to_string()),
        args: args.iter().map(|arg| arg.to_string()).collect(),
        url: None,
    }
}

fn http(url: &str) -> ServerSpec {
    ServerSpec {
        kind: "http".to_string(),
        command: None,
        args: Vec::new(),
        url: Some(url.to_string()),
    }
}

// 读一行请求、回一个 initialize 响应的最小 stdio 服务器
fn echo_server() -> ServerSpec {
    stdio(
        "sh",
        &[
            "-c",
            r#"read line; echo '{"jsonrpc":"2.0","id":1,"result":{"capabilities":{}}}'"#,
        ],
    )
}

#[tokio::test]
async fn http_servers_are_registered_without_connecting() {
    let mut specs = HashMap::new();
    specs.insert("api".to_string(), http("https://tools.example.com/mcp"));

    let diagnostics = Diagnostics::new();
    let registry = connect_servers(&specs, &diagnostics).await.expect("connect");

    let handle = registry.get("api").expect("handle");
    assert!(matches!(handle, McpHandle::Http { .. }));
    assert!(handle.describe().contains("https://tools.example.com/mcp"));
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn unknown_server_type_is_skipped_with_a_warning() {
    let mut specs = HashMap::new();
    specs.insert(
        "ws".to_string(),
        ServerSpec {
            kind: "websocket".to_string(),
            command: None,
            args: Vec::new(),
            url: Some("wss://example.com".to_string()),
        },
    );

    let diagnostics = Diagnostics::new();
    let registry = connect_servers(&specs, &diagnostics).await.expect("connect");

    assert!(registry.is_empty());
    assert_eq!(diagnostics.count_of(DiagnosticKind::UnknownServerType), 1);
}

#[tokio::test]
async fn stdio_server_completes_the_initialize_handshake() {
    let mut specs = HashMap::new();
    specs.insert("local".to_string(), echo_server());

    let diagnostics = Diagnostics::new();
    let registry = connect_servers(&specs, &diagnostics).await.expect("connect");

    let handle = registry.get("local").expect("handle");
    assert!(matches!(handle, McpHandle::Stdio(_)));
}

#[tokio::test]
async fn spawn_failure_fails_the_whole_build() {
    let mut specs = HashMap::new();
    specs.insert("api".to_string(), http("https://tools.example.com/mcp"));
    specs.insert(
        "broken".to_string(),
        stdio("refineflow-test-missing-binary", &[]),
    );

    let diagnostics = Diagnostics::new();
    let error = connect_servers(&specs, &diagnostics).await.unwrap_err();
    assert!(error.to_string().contains("broken"));
}

#[tokio::test]
async fn initialize_rejection_fails_the_connect() {
    let mut specs = HashMap::new();
    specs.insert(
        "rejecting".to_string(),
        stdio(
            "sh",
            &[
                "-c",
                r#"read line; echo '{"jsonrpc":"2.0","id":1,"error":{"code":-32600,"message":"nope"}}'"#,
            ],
        ),
    );

    let diagnostics = Diagnostics::new();
    let error = connect_servers(&specs, &diagnostics).await.unwrap_err();
    assert!(error.to_string().contains("rejecting"));
}
