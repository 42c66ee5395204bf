use crate::{
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::{
            callable::{Arity, NativeArgs},
            core::Value,
        },
    },
    util::num::format_number,
};

native_methods! {
    METHODS {
        Method "toString"  => { arity: Arity::Exact(0), func: to_string },
        Method "floor"     => { arity: Arity::Exact(0), func: |i, a| unary(i, a, f64::floor) },
        Method "ceil"      => { arity: Arity::Exact(0), func: |i, a| unary(i, a, f64::ceil) },
        Method "round"     => { arity: Arity::Exact(0), func: |i, a| unary(i, a, f64::round) },
        Method "abs"       => { arity: Arity::Exact(0), func: |i, a| unary(i, a, f64::abs) },
        Method "isInteger" => { arity: Arity::Exact(0), func: is_integer },
    }
}

fn to_string(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let n = interpreter.expect_number(&args.this, "Receiver", args.line)?;
    Ok(interpreter.string_value(format_number(n)))
}

/// Applies `op` to the receiver.
fn unary(interpreter: &mut Interpreter, args: &NativeArgs, op: fn(f64) -> f64) -> EvalResult<Value> {
    let n = interpreter.expect_number(&args.this, "Receiver", args.line)?;
    Ok(Value::Number(op(n)))
}

fn is_integer(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let n = interpreter.expect_number(&args.this, "Receiver", args.line)?;
    Ok(Value::Bool(n.is_finite() && n.fract() == 0.0))
}
