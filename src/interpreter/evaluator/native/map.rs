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
            map_key::MapTable,
        },
    },
    util::num::length_to_f64,
};

native_methods! {
    METHODS {
        Method "init"     => { arity: Arity::Exact(0), func: |_, _| Ok(Value::Nil) },
        Getter "length"   => { arity: Arity::Exact(0), func: length },
        Method "indexGet" => { arity: Arity::Exact(1), func: index_get },
        Method "indexSet" => { arity: Arity::Exact(2), func: index_set },
        Method "has"      => { arity: Arity::Exact(1), func: has },
        Method "remove"   => { arity: Arity::Exact(1), func: remove },
        Method "keys"     => { arity: Arity::Exact(0), func: keys },
        Method "values"   => { arity: Arity::Exact(0), func: values },
        Method "each"     => { arity: Arity::Exact(1), func: each },
        Method "toString" => { arity: Arity::Exact(0), func: to_string },
    }
}

/// A snapshot of the receiver's entries.
fn table(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<MapTable> {
    let snapshot = args.this.as_instance().and_then(|instance| match &*instance.internal.borrow() {
                                              Internal::Map(table) => Some(table.clone()),
                                              _ => None,
                                          });
    snapshot.ok_or_else(|| interpreter.raise(ErrorKind::TypeError, "Receiver must be a map", args.line))
}

/// Runs `edit` on the receiver's entries in place.
///
/// # Errors
/// `FrozenObjectError` on a frozen map.
fn mutate<T>(interpreter: &mut Interpreter,
             args: &NativeArgs,
             edit: impl FnOnce(&mut MapTable) -> T)
             -> EvalResult<T> {
    let Some(instance) = args.this.as_instance() else {
        return Err(interpreter.raise(ErrorKind::TypeError, "Receiver must be a map", args.line));
    };
    interpreter.ensure_unfrozen(instance, args.line)?;
    match &mut *instance.internal.borrow_mut() {
        Internal::Map(table) => Ok(edit(table)),
        _ => Err(interpreter.raise(ErrorKind::TypeError, "Receiver must be a map", args.line)),
    }
}

fn length(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    Ok(Value::Number(length_to_f64(table(interpreter, args)?.len())))
}

/// The value stored under a key, `nil` when absent.
fn index_get(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    Ok(table(interpreter, args)?.get(&args.arg(0)).unwrap_or_default())
}

fn index_set(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let value = args.arg(1);
    let stored = value.clone();
    mutate(interpreter, args, |table| table.insert(args.arg(0), stored))?;
    Ok(value)
}

fn has(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    Ok(Value::Bool(table(interpreter, args)?.contains(&args.arg(0))))
}

/// Removes an entry and returns its value, `nil` when absent.
fn remove(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let key = args.arg(0);
    Ok(mutate(interpreter, args, |table| table.remove(&key))?.unwrap_or_default())
}

fn keys(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let keys = table(interpreter, args)?.keys();
    Ok(interpreter.array_value(keys))
}

fn values(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let values = table(interpreter, args)?.values();
    Ok(interpreter.array_value(values))
}

/// Calls the callback with each key and value, in insertion order.
fn each(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let callback = args.arg(0);
    for (key, value) in table(interpreter, args)?.entries() {
        interpreter.call_value(&callback, vec![key, value], Vec::new(), args.line)?;
    }
    Ok(args.this.clone())
}

/// `{"a": 1, 2: nil}`: keys and values inspected, strings quoted.
fn to_string(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let mut parts = Vec::new();
    for (key, value) in table(interpreter, args)?.entries() {
        let key = interpreter.inspect(&key, args.line)?;
        let value = interpreter.inspect(&value, args.line)?;
        parts.push(format!("{key}: {value}"));
    }
    Ok(interpreter.string_value(format!("{{{}}}", parts.join(", "))))
}
