use std::rc::Rc;

use crate::interpreter::{
    evaluator::core::{EvalResult, Interpreter},
    value::{
        callable::{Arity, NativeArgs},
        class::{Class, ClassKind},
        core::Value,
    },
};

native_methods! {
    METHODS {
        Method "toString"   => { arity: Arity::Exact(0), func: to_string },
        Getter "class"      => { arity: Arity::Exact(0), func: class },
        Method "isA"        => { arity: Arity::Exact(1), func: is_a },
        Method "freeze"     => { arity: Arity::Exact(0), func: freeze },
        Method "isFrozen"   => { arity: Arity::Exact(0), func: is_frozen },
        Method "ancestors"  => { arity: Arity::Exact(0), func: ancestors },
        Method "respondsTo" => { arity: Arity::Exact(1), func: responds_to },
        Method "send"       => { arity: Arity::AtLeast(1), func: send },
    }
}

/// Class values for a chain of nodes, mixins shown as their modules.
pub(crate) fn chain_values(chain: Vec<Rc<Class>>) -> Vec<Value> {
    chain.into_iter()
         .map(|node| match (node.kind, node.module()) {
             (ClassKind::Mixin, Some(module)) => Value::Class(Rc::clone(module)),
             _ => Value::Class(node),
         })
         .collect()
}

/// `<Name instance>` for plain instances; scalars render as `print` shows
/// them.
fn to_string(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let text = match &args.this {
        Value::Instance(instance) => args.this
                                         .as_str()
                                         .unwrap_or_else(|| format!("<{} instance>", instance.class.name)),
        other => interpreter.stringify(other, args.line)?,
    };
    Ok(interpreter.string_value(text))
}

fn class(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    Ok(Value::Class(interpreter.class_of(&args.this)))
}

fn is_a(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let class = interpreter.expect_class(&args.arg(0), "isA argument", args.line)?;
    Ok(Value::Bool(interpreter.class_of(&args.this).is_a(&class)))
}

/// Freezes an instance and returns it. Other values cannot be mutated, so
/// they are returned unchanged.
fn freeze(_: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    if let Some(instance) = args.this.as_instance() {
        instance.freeze();
    }
    Ok(args.this.clone())
}

fn is_frozen(_: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    Ok(Value::Bool(args.this.as_instance().is_none_or(|instance| instance.is_frozen())))
}

fn ancestors(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let chain = chain_values(interpreter.class_of(&args.this).ancestors());
    Ok(interpreter.array_value(chain))
}

fn responds_to(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let name = interpreter.expect_str(&args.arg(0), "Method name", args.line)?;
    Ok(Value::Bool(interpreter.find_member(&args.this, &name).is_some()))
}

/// `send(name, *args)`: calls the named method with the remaining
/// arguments.
fn send(interpreter: &mut Interpreter, args: &NativeArgs) -> EvalResult<Value> {
    let name = interpreter.expect_str(&args.arg(0), "Method name", args.line)?;
    let rest = args.positional.iter().skip(1).cloned().collect();
    interpreter.call_method(&args.this, &name, rest, args.line)
}
