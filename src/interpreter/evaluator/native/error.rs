use crate::interpreter::{
    evaluator::core::{EvalResult, Interpreter},
    value::{
        callable::{Arity, NativeArgs},
        core::Value,
    },
};

native_methods! {
    METHODS {
        Method "init"     => { arity: Arity::Range(0, 1), func: init },
        Method "toString" => { arity: Arity::Exact(0), func: to_string },
    }
}

/// `init(message = nil)`: stores the message as a property.
fn init(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    interpreter.set_property(&args.this, "message", args.arg(0), args.line)?;
    Ok(Value::Nil)
}

/// `Name: message`, or just `Name` without a message.
fn to_string(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let name = interpreter.class_of(&args.this).name.clone();
    let message = interpreter.get_property(&args.this, "message", args.line)?;
    let text = match message {
        Value::Nil => name,
        message => format!("{name}: {}", interpreter.stringify(&message, args.line)?),
    };
    Ok(interpreter.string_value(text))
}
