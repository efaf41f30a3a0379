mod eval;
mod parser;
mod token;

pub use eval::ExprError;
pub use parser::{BinaryOp, Expr};

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

/// 默认的评审通过条件
pub const DEFAULT_PASS_CONDITION: &str = "score == 'pass'";

static DEFAULT_COMPILED: Lazy<PassCondition> =
    Lazy::new(|| PassCondition::compile(DEFAULT_PASS_CONDITION));

/// 已编译的通过条件
///
/// 每个 step 编译一次。解析失败不是错误：失败的条件在求值时恒为 false，
/// 评审循环因此只会耗尽轮次而不会崩溃。
#[derive(Clone, Debug)]
pub struct PassCondition {
    source: String,
    compiled: Option<Expr>,
}

impl PassCondition {
    pub fn compile(source: &str) -> Self {
        let compiled = match parser::parse(source) {
            Ok(expr) => Some(expr),
            Err(error) => {
                tracing::debug!(condition = %source, %error, "pass condition failed to parse");
                None
            }
        };
        Self {
            source: source.to_string(),
            compiled,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// 对上下文求值，任何错误都按 false 处理
    pub fn evaluate(&self, context: &Map<String, Value>) -> bool {
        let Some(expr) = &self.compiled else {
            return false;
        };
        match eval::evaluate(expr, context) {
            Ok(passed) => passed,
            Err(error) => {
                tracing::debug!(condition = %self.source, %error, "pass condition evaluation failed");
                false
            }
        }
    }
}

pub fn default_pass_condition() -> &'static PassCondition {
    &DEFAULT_COMPILED
}

/// 一次性求值入口，内部编译后立即求值
pub fn evaluate_condition(source: &str, context: &Map<String, Value>) -> bool {
    PassCondition::compile(source).evaluate(context)
}
