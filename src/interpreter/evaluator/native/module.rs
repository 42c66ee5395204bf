use std::rc::Rc;

use crate::interpreter::{
    evaluator::{
        core::{EvalResult, Interpreter},
        exception::ErrorKind,
        native::object::chain_values,
    },
    value::{
        callable::{Arity, NativeArgs},
        class::{Class, ClassKind, Table},
        core::Value,
    },
};

native_methods! {
    METHODS {
        Getter "name"        => { arity: Arity::Exact(0), func: name },
        Method "methodNames" => { arity: Arity::Exact(0), func: method_names },
        Method "ancestors"   => { arity: Arity::Exact(0), func: ancestors },
        Method "include"     => { arity: Arity::Exact(1), func: include },
        Method "toString"    => { arity: Arity::Exact(0), func: name },
    }
}

native_methods! {
    CLASS_METHODS {
        Getter "superClass" => { arity: Arity::Exact(0), func: super_class },
    }
}

/// The class or module a reflection method was called on.
fn receiver(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Rc<Class>> {
    interpreter.expect_class(&args.this, "Receiver", args.line)
}

fn name(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let class = receiver(interpreter, args)?;
    Ok(interpreter.string_value(class.name.clone()))
}

/// Sorted names of the instance methods the receiver itself defines.
fn method_names(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let class = receiver(interpreter, args)?;
    let names = class.own_names(Table::Methods)
                     .into_iter()
                     .map(|name| interpreter.string_value(name))
                     .collect();
    Ok(interpreter.array_value(names))
}

fn ancestors(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let class = receiver(interpreter, args)?;
    Ok(interpreter.array_value(chain_values(class.ancestors())))
}

/// `include(module)`: `true` if the chain changed, `false` if the module
/// was already part of it.
///
/// # Errors
/// `TypeError` unless the argument is a module.
fn include(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let target = receiver(interpreter, args)?;
    let module = interpreter.expect_class(&args.arg(0), "include argument", args.line)?;
    if module.kind != ClassKind::Module {
        return Err(interpreter.raise(ErrorKind::TypeError,
                                     format!("Can't include {}: not a module", module.name),
                                     args.line));
    }
    Ok(Value::Bool(target.include(&module)))
}

fn super_class(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let class = receiver(interpreter, args)?;
    Ok(class.nearest_superclass().map_or(Value::Nil, Value::Class))
}
