use crate::{
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            exception::ErrorKind,
        },
        value::{
            callable::{Arity, NativeArgs},
            core::Value,
            instance::Internal,
        },
    },
    util::num::length_to_f64,
};

native_methods! {
    METHODS {
        Method "init"       => { arity: Arity::Range(0, 1), func: init },
        Getter "length"     => { arity: Arity::Exact(0), func: length },
        Method "opAdd"      => { arity: Arity::Exact(1), func: op_add },
        Method "indexGet"   => { arity: Arity::Exact(1), func: index_get },
        Method "upcase"     => { arity: Arity::Exact(0), func: |i, a| map_text(i, a, |s| s.to_uppercase()) },
        Method "downcase"   => { arity: Arity::Exact(0), func: |i, a| map_text(i, a, |s| s.to_lowercase()) },
        Method "trim"       => { arity: Arity::Exact(0), func: |i, a| map_text(i, a, |s| s.trim().to_string()) },
        Method "contains"   => { arity: Arity::Exact(1), func: |i, a| test_text(i, a, |s, t| s.contains(t)) },
        Method "startsWith" => { arity: Arity::Exact(1), func: |i, a| test_text(i, a, |s, t| s.starts_with(t)) },
        Method "split"      => { arity: Arity::Exact(1), func: split },
        Method "push"       => { arity: Arity::Exact(1), func: push },
        Method "toNumber"   => { arity: Arity::Exact(0), func: to_number },
        Method "toString"   => { arity: Arity::Exact(0), func: to_string },
    }
}

/// The receiver's contents.
fn text(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<String> {
    interpreter.expect_str(&args.this, "Receiver", args.line)
}

/// `String(value = "")`: the receiver takes the stringified value.
fn init(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let content = match args.positional.first() {
        Some(value) => interpreter.stringify(value, args.line)?,
        None => String::new(),
    };
    if let Some(instance) = args.this.as_instance() {
        interpreter.ensure_unfrozen(instance, args.line)?;
        *instance.internal.borrow_mut() = Internal::Str(content);
    }
    Ok(Value::Nil)
}

fn length(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let text = text(interpreter, args)?;
    Ok(Value::Number(length_to_f64(text.chars().count())))
}

/// A new string: the receiver followed by the stringified argument.
fn op_add(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let mut text = text(interpreter, args)?;
    text.push_str(&interpreter.stringify(&args.arg(0), args.line)?);
    Ok(interpreter.string_value(text))
}

/// The character at an index as a one-character string, `nil` past the end.
fn index_get(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let text = text(interpreter, args)?;
    let index = interpreter.expect_index(&args.arg(0), args.line)?;
    Ok(text.chars()
           .nth(index)
           .map_or(Value::Nil, |c| interpreter.string_value(c)))
}

fn map_text(interpreter: &mut Interpreter, args: &NativeArgs, op: fn(&str) -> String) -> EvalResult<Value> {
    let text = text(interpreter, args)?;
    Ok(interpreter.string_value(op(&text)))
}

fn test_text(interpreter: &mut Interpreter,
             args: &NativeArgs,
             test: fn(&str, &str) -> bool)
             -> EvalResult<Value> {
    let text = text(interpreter, args)?;
    let other = interpreter.expect_str(&args.arg(0), "Argument", args.line)?;
    Ok(Value::Bool(test(&text, &other)))
}

/// Splits on a separator. An empty separator splits into characters.
fn split(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let text = text(interpreter, args)?;
    let separator = interpreter.expect_str(&args.arg(0), "Separator", args.line)?;
    let parts: Vec<String> = if separator.is_empty() {
        text.chars().map(String::from).collect()
    } else {
        text.split(separator.as_str()).map(str::to_string).collect()
    };
    let parts = parts.into_iter().map(|part| interpreter.string_value(part)).collect();
    Ok(interpreter.array_value(parts))
}

/// Appends the stringified argument in place and returns the receiver.
///
/// # Errors
/// `FrozenObjectError` on a frozen string.
fn push(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let Some(instance) = args.this.as_instance() else {
        return Err(interpreter.raise(ErrorKind::TypeError, "Receiver must be a string", args.line));
    };
    interpreter.ensure_unfrozen(instance, args.line)?;
    let suffix = interpreter.stringify(&args.arg(0), args.line)?;
    if let Internal::Str(buffer) = &mut *instance.internal.borrow_mut() {
        buffer.push_str(&suffix);
    }
    Ok(args.this.clone())
}

/// The number the trimmed text spells, or `nil`.
fn to_number(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let text = text(interpreter, args)?;
    Ok(text.trim().parse::<f64>().map_or(Value::Nil, Value::Number))
}

fn to_string(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    text(interpreter, args)?;
    Ok(args.this.clone())
}
