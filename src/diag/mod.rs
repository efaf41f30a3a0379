use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

/// 诊断类别
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnknownServerRef,
    UnknownServerType,
    UnknownToolKind,
    UnknownAgentToolRef,
    StubbedFunctionTool,
    UploadCleanup,
}

/// 单条诊断记录
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// 结构化诊断通道
///
/// 构建期的降级行为（未知 server 引用、未知 tool 类型等）不会中断流程，
/// 但全部记录在这里，调用方可以在构建后检查并自行决定是否拒绝。
#[derive(Clone, Default)]
pub struct Diagnostics {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = ?kind, "{}", message);
        self.entries.lock().push(Diagnostic { kind, message });
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.lock().iter().filter(|d| d.kind == kind).count()
    }
}
