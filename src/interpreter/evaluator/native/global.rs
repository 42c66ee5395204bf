use std::time::{SystemTime, UNIX_EPOCH};

use crate::interpreter::{
    evaluator::{
        core::{EvalResult, Interpreter},
        exception::ErrorKind,
    },
    value::{
        callable::{Arity, NativeArgs, NativeDefault},
        class::ClassKind,
        core::Value,
    },
};

native_methods! {
    FUNCTIONS {
        Function "clock"         => { arity: Arity::Exact(0), func: clock },
        Function "typeof"        => { arity: Arity::Exact(1), func: type_of },
        Function "assert"        => {
            arity: Arity::Exact(1),
            keywords: &[("message", NativeDefault::Str("assertion failed"))],
            func: assert,
        },
        Function "eval"          => { arity: Arity::Exact(1), func: eval },
        Function "load"          => { arity: Arity::Exact(1), func: load },
        Function "requireScript" => { arity: Arity::Exact(1), func: require_script },
        Function "trap"          => { arity: Arity::Exact(2), func: trap },
    }
}

/// Seconds since the Unix epoch.
fn clock(_: &mut Interpreter, _: &NativeArgs) -> EvalResult<Value> {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH)
                                   .map_or(0.0, |elapsed| elapsed.as_secs_f64());
    Ok(Value::Number(elapsed))
}

/// The type name of a value: `nil`, `boolean`, `number`, `function`,
/// `class`, `module`, or the class name of an instance.
fn type_of(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let name = match args.arg(0) {
        Value::Nil => "nil".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::Function(_) | Value::Native(_) => "function".to_string(),
        Value::Class(class) if class.kind == ClassKind::Module => "module".to_string(),
        Value::Class(_) => "class".to_string(),
        Value::Instance(instance) => instance.class.name.clone(),
    };
    Ok(interpreter.string_value(name))
}

/// `assert(cond, message: "assertion failed")`
///
/// # Errors
/// `AssertionError` carrying the message when `cond` is falsy.
fn assert(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    if args.arg(0).is_truthy() {
        return Ok(Value::Bool(true));
    }
    let message = interpreter.stringify(&args.keyword("message"), args.line)?;
    Err(interpreter.raise(ErrorKind::AssertionError, message, args.line))
}

fn eval(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let source = interpreter.expect_str(&args.arg(0), "Source", args.line)?;
    interpreter.eval_source(&source, args.line)
}

fn load(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let path = interpreter.expect_str(&args.arg(0), "Path", args.line)?;
    interpreter.load(&path, args.line)
}

fn require_script(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let path = interpreter.expect_str(&args.arg(0), "Path", args.line)?;
    interpreter.require_script(&path, args.line)
}

/// `trap(signal, handler)`: registers the handler, replacing any earlier
/// one, for [`Interpreter::deliver_signal`].
fn trap(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let signal = interpreter.expect_str(&args.arg(0), "Signal name", args.line)?;
    let handler = args.arg(1);
    interpreter.expect_callable(&handler, "Signal handler", args.line)?;
    tracing::debug!(%signal, "signal handler registered");
    interpreter.signals.insert(signal, handler);
    Ok(Value::Nil)
}
