use serde_json::{Map, Value};
use thiserror::Error;

use super::parser::{BinaryOp, Expr};

/// 表达式错误类型
#[derive(Debug, Error)]
pub enum ExprError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("identifier `{0}` is not bound in the evaluation context")]
    Unbound(String),
    #[error("type error: {0}")]
    Type(String),
}

/// 求值结果的标量域
#[derive(Clone, Debug, PartialEq)]
enum Scalar {
    Str(String),
    Num(f64),
    Bool(bool),
}

/// 在隔离作用域内求值
///
/// 作用域的唯一绑定是 context 自身的键。顶层结果必须是布尔值。
pub fn evaluate(expr: &Expr, context: &Map<String, Value>) -> Result<bool, ExprError> {
    match eval_expr(expr, context)? {
        Scalar::Bool(value) => Ok(value),
        other => Err(ExprError::Type(format!(
            "expression evaluated to a non-boolean value: {:?}",
            other
        ))),
    }
}

fn eval_expr(expr: &Expr, context: &Map<String, Value>) -> Result<Scalar, ExprError> {
    match expr {
        Expr::Str(text) => Ok(Scalar::Str(text.clone())),
        Expr::Num(value) => Ok(Scalar::Num(*value)),
        Expr::Bool(value) => Ok(Scalar::Bool(*value)),
        Expr::Ident(name) => lookup(name, context),
        Expr::Not(inner) => match eval_expr(inner, context)? {
            Scalar::Bool(value) => Ok(Scalar::Bool(!value)),
            other => Err(ExprError::Type(format!("cannot negate {:?}", other))),
        },
        Expr::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, context),
    }
}

fn eval_binary(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    context: &Map<String, Value>,
) -> Result<Scalar, ExprError> {
    // 逻辑运算短路，两侧都要求布尔值
    if op == BinaryOp::And || op == BinaryOp::Or {
        let left = match eval_expr(lhs, context)? {
            Scalar::Bool(value) => value,
            other => return Err(ExprError::Type(format!("expected boolean, got {:?}", other))),
        };
        if op == BinaryOp::And && !left {
            return Ok(Scalar::Bool(false));
        }
        if op == BinaryOp::Or && left {
            return Ok(Scalar::Bool(true));
        }
        return match eval_expr(rhs, context)? {
            Scalar::Bool(value) => Ok(Scalar::Bool(value)),
            other => Err(ExprError::Type(format!("expected boolean, got {:?}", other))),
        };
    }

    let left = eval_expr(lhs, context)?;
    let right = eval_expr(rhs, context)?;

    match op {
        BinaryOp::Eq => Ok(Scalar::Bool(scalar_eq(&left, &right))),
        BinaryOp::Ne => Ok(Scalar::Bool(!scalar_eq(&left, &right))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let (Scalar::Num(a), Scalar::Num(b)) = (&left, &right) else {
                return Err(ExprError::Type(format!(
                    "ordering comparison requires numbers, got {:?} and {:?}",
                    left, right
                )));
            };
            let result = match op {
                BinaryOp::Lt => a < b,
                BinaryOp::Le => a <= b,
                BinaryOp::Gt => a > b,
                BinaryOp::Ge => a >= b,
                _ => unreachable!(),
            };
            Ok(Scalar::Bool(result))
        }
        BinaryOp::And | BinaryOp::Or => unreachable!(),
    }
}

// 同类标量严格比较，类型不同时相等为 false 而非错误
fn scalar_eq(left: &Scalar, right: &Scalar) -> bool {
    match (left, right) {
        (Scalar::Str(a), Scalar::Str(b)) => a == b,
        (Scalar::Num(a), Scalar::Num(b)) => a == b,
        (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
        _ => false,
    }
}

fn lookup(name: &str, context: &Map<String, Value>) -> Result<Scalar, ExprError> {
    let value = context
        .get(name)
        .ok_or_else(|| ExprError::Unbound(name.to_string()))?;
    match value {
        Value::String(text) => Ok(Scalar::Str(text.clone())),
        Value::Number(number) => number
            .as_f64()
            .map(Scalar::Num)
            .ok_or_else(|| ExprError::Type(format!("number `{}` is not representable", number))),
        Value::Bool(flag) => Ok(Scalar::Bool(*flag)),
        other => Err(ExprError::Type(format!(
            "identifier `{}` is bound to a non-scalar value: {}",
            name, other
        ))),
    }
}
