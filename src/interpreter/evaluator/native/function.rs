use crate::{
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            exception::ErrorKind,
        },
        value::{
            callable::{Arity, NativeArgs},
            core::Value,
        },
    },
    util::num::length_to_f64,
};

native_methods! {
    METHODS {
        Getter "name"  => { arity: Arity::Exact(0), func: name },
        Getter "arity" => { arity: Arity::Exact(0), func: arity },
        Method "call"  => { arity: Arity::AtLeast(0), func: call },
    }
}

fn name(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let callable = interpreter.expect_callable(&args.this, "Receiver", args.line)?;
    Ok(interpreter.string_value(callable.name()))
}

/// The number of required positional parameters.
fn arity(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let callable = interpreter.expect_callable(&args.this, "Receiver", args.line)?;
    Ok(Value::Number(length_to_f64(callable.arity().min())))
}

fn call(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    if args.this.as_callable().is_none() {
        return Err(interpreter.raise(ErrorKind::TypeError,
                                     format!("Can't call {}", args.this.describe()),
                                     args.line));
    }
    interpreter.call_value(&args.this, args.positional.clone(), Vec::new(), args.line)
}
