use std::cmp::Ordering;

use crate::{
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            exception::ErrorKind,
        },
        value::{
            callable::{Arity, NativeArgs, NativeDefault},
            core::Value,
            instance::Internal,
        },
    },
    util::num::length_to_f64,
};

native_methods! {
    METHODS {
        Method "init"     => { arity: Arity::AtLeast(0), func: init },
        Getter "length"   => { arity: Arity::Exact(0), func: length },
        Method "push"     => { arity: Arity::AtLeast(0), func: push },
        Method "pop"      => { arity: Arity::Exact(0), func: pop },
        Method "first"    => { arity: Arity::Exact(0), func: first },
        Method "last"     => { arity: Arity::Exact(0), func: last },
        Method "indexGet" => { arity: Arity::Exact(1), func: index_get },
        Method "indexSet" => { arity: Arity::Exact(2), func: index_set },
        Method "contains" => { arity: Arity::Exact(1), func: contains },
        Method "indexOf"  => { arity: Arity::Exact(1), func: index_of },
        Method "join"     => { arity: Arity::Range(0, 1), func: join },
        Method "reverse"  => { arity: Arity::Exact(0), func: reverse },
        Method "map"      => { arity: Arity::Exact(1), func: map },
        Method "filter"   => { arity: Arity::Exact(1), func: filter },
        Method "each"     => { arity: Arity::Exact(1), func: each },
        Method "sort"     => {
            arity: Arity::Exact(0),
            keywords: &[("reverse", NativeDefault::Bool(false))],
            func: sort,
        },
        Method "opAdd"    => { arity: Arity::Exact(1), func: op_add },
        Method "toString" => { arity: Arity::Exact(0), func: to_string },
    }
}

/// A snapshot of the receiver's elements.
///
/// Callbacks run against the snapshot, so a callback that mutates the
/// array does not disturb the iteration.
fn items(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Vec<Value>> {
    args.this
        .as_array()
        .ok_or_else(|| interpreter.raise(ErrorKind::TypeError, "Receiver must be an array", args.line))
}

/// Runs `edit` on the receiver's elements in place.
///
/// # Errors
/// `FrozenObjectError` on a frozen array.
fn mutate<T>(interpreter: &mut Interpreter,
             args: &NativeArgs,
             edit: impl FnOnce(&mut Vec<Value>) -> T)
             -> EvalResult<T> {
    let Some(instance) = args.this.as_instance() else {
        return Err(interpreter.raise(ErrorKind::TypeError, "Receiver must be an array", args.line));
    };
    interpreter.ensure_unfrozen(instance, args.line)?;
    match &mut *instance.internal.borrow_mut() {
        Internal::Array(elements) => Ok(edit(elements)),
        _ => Err(interpreter.raise(ErrorKind::TypeError, "Receiver must be an array", args.line)),
    }
}

fn init(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let initial = args.positional.clone();
    mutate(interpreter, args, |elements| *elements = initial)?;
    Ok(Value::Nil)
}

fn length(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    Ok(Value::Number(length_to_f64(items(interpreter, args)?.len())))
}

/// Appends every argument and returns the receiver.
fn push(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let extra = args.positional.clone();
    mutate(interpreter, args, |elements| elements.extend(extra))?;
    Ok(args.this.clone())
}

/// Removes and returns the last element, `nil` when empty.
fn pop(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    Ok(mutate(interpreter, args, Vec::pop)?.unwrap_or_default())
}

fn first(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    Ok(items(interpreter, args)?.first().cloned().unwrap_or_default())
}

fn last(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    Ok(items(interpreter, args)?.last().cloned().unwrap_or_default())
}

/// The element at an index, `nil` past the end.
fn index_get(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let elements = items(interpreter, args)?;
    let index = interpreter.expect_index(&args.arg(0), args.line)?;
    Ok(elements.get(index).cloned().unwrap_or_default())
}

/// Replaces the element at an index. Writing at the length appends.
///
/// # Errors
/// `ArgumentError` for an index past the length.
fn index_set(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let index = interpreter.expect_index(&args.arg(0), args.line)?;
    let value = args.arg(1);
    let stored = mutate(interpreter, args, |elements| {
        match index.cmp(&elements.len()) {
            Ordering::Less => {
                elements[index] = value.clone();
                true
            },
            Ordering::Equal => {
                elements.push(value.clone());
                true
            },
            Ordering::Greater => false,
        }
    })?;
    if !stored {
        return Err(interpreter.raise(ErrorKind::ArgumentError,
                                     format!("Index {index} out of range"),
                                     args.line));
    }
    Ok(value)
}

fn contains(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let needle = args.arg(0);
    Ok(Value::Bool(items(interpreter, args)?.contains(&needle)))
}

/// The first index holding an equal element, `-1` if none does.
fn index_of(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let needle = args.arg(0);
    let position = items(interpreter, args)?.iter().position(|item| *item == needle);
    Ok(Value::Number(position.map_or(-1.0, length_to_f64)))
}

/// `join(sep = "")`: the stringified elements separated by `sep`.
fn join(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let separator = match args.positional.first() {
        Some(sep) => interpreter.expect_str(sep, "Separator", args.line)?,
        None => String::new(),
    };
    let mut parts = Vec::new();
    for item in items(interpreter, args)? {
        parts.push(interpreter.stringify(&item, args.line)?);
    }
    Ok(interpreter.string_value(parts.join(&separator)))
}

fn reverse(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let mut elements = items(interpreter, args)?;
    elements.reverse();
    Ok(interpreter.array_value(elements))
}

fn map(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let callback = args.arg(0);
    let mut mapped = Vec::new();
    for item in items(interpreter, args)? {
        mapped.push(interpreter.call_value(&callback, vec![item], Vec::new(), args.line)?);
    }
    Ok(interpreter.array_value(mapped))
}

fn filter(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let callback = args.arg(0);
    let mut kept = Vec::new();
    for item in items(interpreter, args)? {
        if interpreter.call_value(&callback, vec![item.clone()], Vec::new(), args.line)?
                      .is_truthy()
        {
            kept.push(item);
        }
    }
    Ok(interpreter.array_value(kept))
}

/// Calls the callback with every element and returns the receiver.
fn each(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let callback = args.arg(0);
    for item in items(interpreter, args)? {
        interpreter.call_value(&callback, vec![item], Vec::new(), args.line)?;
    }
    Ok(args.this.clone())
}

/// `sort(reverse: false)`: a sorted copy. All numbers or all strings.
///
/// # Errors
/// `TypeError` for any other mix of elements.
fn sort(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let mut elements = items(interpreter, args)?;
    let numbers: Option<Vec<f64>> = elements.iter()
                                            .map(|item| match item {
                                                Value::Number(n) => Some(*n),
                                                _ => None,
                                            })
                                            .collect();
    if let Some(mut numbers) = numbers {
        numbers.sort_by(f64::total_cmp);
        elements = numbers.into_iter().map(Value::Number).collect();
    } else if elements.iter().all(|item| item.as_str().is_some()) {
        elements.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
    } else {
        return Err(interpreter.raise(ErrorKind::TypeError,
                                     "Can only sort arrays of numbers or of strings",
                                     args.line));
    }
    if args.keyword("reverse").is_truthy() {
        elements.reverse();
    }
    Ok(interpreter.array_value(elements))
}

/// A new array: the receiver's elements followed by the argument's.
fn op_add(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let mut elements = items(interpreter, args)?;
    let other = args.arg(0);
    let Some(more) = other.as_array() else {
        return Err(interpreter.raise(ErrorKind::TypeError,
                                     format!("Can't add {} to an array", other.describe()),
                                     args.line));
    };
    elements.extend(more);
    Ok(interpreter.array_value(elements))
}

/// `[1, "a", nil]`: elements inspected, strings quoted.
fn to_string(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let mut parts = Vec::new();
    for item in items(interpreter, args)? {
        parts.push(interpreter.inspect(&item, args.line)?);
    }
    Ok(interpreter.string_value(format!("[{}]", parts.join(", "))))
}
