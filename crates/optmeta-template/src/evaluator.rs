//! Expression and template evaluation.
//!
//! This module renders compiled templates against a [`Scope`] and
//! implements the expression semantics: identifier lookup, member and
//! index access, arithmetic with string concatenation, comparisons, and
//! short-circuit logical operators.

use crate::ast::{BinaryOp, Expr, Segment, UnaryOp};
use crate::error::{TemplateError, TemplateResult};
use crate::parser::Template;
use crate::scope::Scope;
use crate::value::Value;

impl Template {
    /// Render this template with the given scope.
    ///
    /// Every interpolation is evaluated and stringified; literal
    /// segments pass through untouched. A template with no
    /// interpolations renders byte-identical to its source.
    pub fn render(&self, scope: &Scope) -> TemplateResult<String> {
        let mut output = String::new();
        for segment in self.segments() {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Interpolation(expr) => {
                    output.push_str(&evaluate(expr, scope)?.display_string());
                }
            }
        }
        Ok(output)
    }
}

/// Evaluate an expression against a scope.
pub fn evaluate(expr: &Expr, scope: &Scope) -> TemplateResult<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Str(s) => Ok(Value::String(s.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Null => Ok(Value::Null),
        Expr::This => Ok(scope.receiver.clone()),

        // Only free-identifier lookup is strict; member access below is not
        Expr::Ident(name) => scope
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::UnknownVariable { name: name.clone() }),

        Expr::Member { object, field } => {
            let object = evaluate(object, scope)?;
            Ok(object.get(field).cloned().unwrap_or(Value::Null))
        }

        Expr::Index { object, index } => {
            let object = evaluate(object, scope)?;
            let index = evaluate(index, scope)?;
            Ok(index_value(&object, &index))
        }

        Expr::Unary { op, expr } => {
            let value = evaluate(expr, scope)?;
            Ok(match op {
                UnaryOp::Not => Value::Bool(!value.is_truthy()),
                UnaryOp::Neg => Value::Number(-value.to_number()),
            })
        }

        Expr::Binary { op, left, right } => evaluate_binary(*op, left, right, scope),

        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            if evaluate(cond, scope)?.is_truthy() {
                evaluate(then, scope)
            } else {
                evaluate(otherwise, scope)
            }
        }
    }
}

/// Index into a value: string keys address maps, numeric indices
/// address arrays. Anything else yields null.
fn index_value(object: &Value, index: &Value) -> Value {
    match (object, index) {
        (Value::Map(entries), Value::String(key)) => {
            entries.get(key).cloned().unwrap_or(Value::Null)
        }
        (Value::Array(items), Value::Number(n)) => {
            if n.fract() == 0.0 && *n >= 0.0 {
                items.get(*n as usize).cloned().unwrap_or(Value::Null)
            } else {
                Value::Null
            }
        }
        _ => Value::Null,
    }
}

fn evaluate_binary(op: BinaryOp, left: &Expr, right: &Expr, scope: &Scope) -> TemplateResult<Value> {
    // Logical operators short-circuit and yield the deciding operand
    match op {
        BinaryOp::Or => {
            let lhs = evaluate(left, scope)?;
            return if lhs.is_truthy() {
                Ok(lhs)
            } else {
                evaluate(right, scope)
            };
        }
        BinaryOp::And => {
            let lhs = evaluate(left, scope)?;
            return if lhs.is_truthy() {
                evaluate(right, scope)
            } else {
                Ok(lhs)
            };
        }
        _ => {}
    }

    let lhs = evaluate(left, scope)?;
    let rhs = evaluate(right, scope)?;

    Ok(match op {
        BinaryOp::Eq => Value::Bool(values_equal(&lhs, &rhs)),
        BinaryOp::Ne => Value::Bool(!values_equal(&lhs, &rhs)),

        BinaryOp::Lt => compare(&lhs, &rhs, |o| o.is_lt()),
        BinaryOp::Le => compare(&lhs, &rhs, |o| o.is_le()),
        BinaryOp::Gt => compare(&lhs, &rhs, |o| o.is_gt()),
        BinaryOp::Ge => compare(&lhs, &rhs, |o| o.is_ge()),

        // String concatenation when either side is a string
        BinaryOp::Add => {
            if lhs.is_string() || rhs.is_string() {
                Value::String(format!("{}{}", lhs.display_string(), rhs.display_string()))
            } else {
                Value::Number(lhs.to_number() + rhs.to_number())
            }
        }
        BinaryOp::Sub => Value::Number(lhs.to_number() - rhs.to_number()),
        BinaryOp::Mul => Value::Number(lhs.to_number() * rhs.to_number()),
        BinaryOp::Div => Value::Number(lhs.to_number() / rhs.to_number()),
        BinaryOp::Rem => Value::Number(lhs.to_number() % rhs.to_number()),

        BinaryOp::Or | BinaryOp::And => unreachable!("handled above"),
    })
}

/// Loose equality: like-kinded values compare structurally; mixed kinds
/// compare numerically when both sides convert, otherwise unequal.
fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => a == b,
        (Value::Map(a), Value::Map(b)) => a == b,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => {
            let (a, b) = (lhs.to_number(), rhs.to_number());
            !a.is_nan() && !b.is_nan() && a == b
        }
    }
}

/// Ordered comparison: strings compare lexicographically, everything
/// else numerically. NaN never compares.
fn compare(lhs: &Value, rhs: &Value, check: fn(std::cmp::Ordering) -> bool) -> Value {
    let ordering = match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => lhs.to_number().partial_cmp(&rhs.to_number()),
    };
    Value::Bool(ordering.is_some_and(check))
}
