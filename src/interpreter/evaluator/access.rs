use std::rc::Rc;

use crate::{
    ast::ExprId,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            exception::ErrorKind,
        },
        value::{
            callable::Callable,
            class::{Class, Table},
            core::Value,
        },
    },
};

/// What a member lookup found on a receiver.
#[derive(Debug, Clone)]
pub enum Member {
    /// A getter, to be called bound to the receiver.
    Getter(Callable),
    /// A stored property.
    Property(Value),
    /// A method, to be bound to the receiver.
    Method(Callable),
}

impl Interpreter {
    /// Looks `name` up on `receiver`, without calling anything.
    ///
    /// - Instances: getter chain, own property, method chain.
    /// - Classes and modules: own property, static method chain, then the
    ///   getters and methods of their metaclass.
    /// - Everything else: getters and methods of [`Interpreter::class_of`].
    #[must_use]
    pub fn find_member(&self, receiver: &Value, name: &str) -> Option<Member> {
        match receiver {
            Value::Instance(instance) => {
                let class = &instance.class;
                class.find(Table::Getters, name)
                     .map(Member::Getter)
                     .or_else(|| instance.get_prop(name).map(Member::Property))
                     .or_else(|| class.find(Table::Methods, name).map(Member::Method))
            },
            Value::Class(class) => {
                let prop = class.props.borrow().get(name).cloned();
                prop.map(Member::Property)
                    .or_else(|| class.find(Table::Statics, name).map(Member::Method))
                    .or_else(|| self.metaclass_member(receiver, name))
            },
            _ => self.metaclass_member(receiver, name),
        }
    }

    fn metaclass_member(&self, receiver: &Value, name: &str) -> Option<Member> {
        let class = self.class_of(receiver);
        class.find(Table::Getters, name)
             .map(Member::Getter)
             .or_else(|| class.find(Table::Methods, name).map(Member::Method))
    }

    /// Turns a found member into the value a property read yields.
    fn member_value(&mut self, receiver: &Value, member: Member, line: usize) -> EvalResult<Value> {
        match member {
            Member::Getter(getter) => self.call_callable(&getter.bind(receiver.clone()), Vec::new(), Vec::new(), line),
            Member::Property(value) => Ok(value),
            Member::Method(method) => Ok(method.bind(receiver.clone()).into()),
        }
    }

    /// Evaluates `receiver.name`.
    ///
    /// When nothing is found an instance's `propertyMissing(name)` is
    /// consulted, and failing that the result is `nil`.
    pub fn get_property(&mut self, receiver: &Value, name: &str, line: usize) -> EvalResult<Value> {
        if let Some(member) = self.find_member(receiver, name) {
            return self.member_value(receiver, member, line);
        }
        if let Value::Instance(instance) = receiver
           && let Some(missing) = instance.class.find(Table::Methods, "propertyMissing")
        {
            let name = self.string_value(name);
            return self.call_callable(&missing.bind(receiver.clone()), vec![name], Vec::new(), line);
        }
        Ok(Value::Nil)
    }

    /// Resolves `receiver.name` for a call.
    ///
    /// # Errors
    /// `NoSuchMethodError` when the receiver has no such member.
    pub(crate) fn method_for_call(&mut self, receiver: &Value, name: &str, line: usize) -> EvalResult<Value> {
        match self.find_member(receiver, name) {
            Some(member) => self.member_value(receiver, member, line),
            None => Err(self.raise(ErrorKind::NoSuchMethodError,
                                   format!("Undefined method '{name}' for {}", receiver.describe()),
                                   line)),
        }
    }

    /// Calls `receiver.name(*args)`.
    ///
    /// # Errors
    /// `NoSuchMethodError` when the receiver has no such member, plus
    /// whatever the call raises.
    pub fn call_method(&mut self,
                       receiver: &Value,
                       name: &str,
                       args: Vec<Value>,
                       line: usize)
                       -> EvalResult<Value> {
        let method = self.method_for_call(receiver, name, line)?;
        self.call_value(&method, args, Vec::new(), line)
    }

    /// Evaluates `receiver.name = value`.
    ///
    /// A setter anywhere in the chain wins. Otherwise the property is stored
    /// on the instance, or on the class for class receivers.
    ///
    /// # Errors
    /// - `FrozenObjectError` when storing on a frozen instance.
    /// - `TypeError` for receivers that cannot hold properties.
    pub fn set_property(&mut self, receiver: &Value, name: &str, value: Value, line: usize) -> EvalResult<()> {
        match receiver {
            Value::Instance(instance) => {
                if let Some(setter) = instance.class.find(Table::Setters, name) {
                    self.call_callable(&setter.bind(receiver.clone()), vec![value], Vec::new(), line)?;
                    return Ok(());
                }
                self.ensure_unfrozen(instance, line)?;
                instance.set_prop(name, value);
                Ok(())
            },
            Value::Class(class) => {
                class.props.borrow_mut().insert(name.to_string(), value);
                Ok(())
            },
            other => Err(self.raise(ErrorKind::TypeError,
                                    format!("Can't set property '{name}' on {}", other.describe()),
                                    line)),
        }
    }

    /// The owner of the running method, required by `super`.
    fn super_owner(&mut self, line: usize) -> EvalResult<Rc<Class>> {
        self.current_owner
            .clone()
            .ok_or_else(|| self.raise(ErrorKind::NoSuchMethodError, "'super' used outside of a method", line))
    }

    /// Evaluates `super.name`.
    ///
    /// For an instance receiver the lookup starts above the running method's
    /// owner in the receiver's chain: getters first, then methods. For a
    /// class receiver (inside a static method) it walks the statics of the
    /// owner's superclasses, then the metaclass.
    ///
    /// # Errors
    /// `NoSuchMethodError` when no ancestor has the member.
    pub(crate) fn eval_super_get(&mut self, id: ExprId, name: &str, line: usize) -> EvalResult<Value> {
        let this = self.lookup_variable(id, "this", line)?;
        let owner = self.super_owner(line)?;

        let member = if let Value::Class(_) = &this {
            let statics = Class::find_from(owner.superclass(), Table::Statics, name);
            statics.map(Member::Method)
                   .or_else(|| self.metaclass_member(&this, name))
        } else {
            let start = self.class_of(&this).super_start(&owner);
            let getter = Class::find_from(start.clone(), Table::Getters, name);
            getter.map(Member::Getter)
                  .or_else(|| Class::find_from(start, Table::Methods, name).map(Member::Method))
        };

        match member {
            Some(member) => self.member_value(&this, member, line),
            None => Err(self.raise(ErrorKind::NoSuchMethodError,
                                   format!("No ancestor of {} has a member named '{name}'", owner.name),
                                   line)),
        }
    }

    /// Evaluates `super.name = value`: a setter above the owner, or else a
    /// plain property write on `this`.
    pub(crate) fn eval_super_set(&mut self, id: ExprId, name: &str, value: Value, line: usize) -> EvalResult<()> {
        let this = self.lookup_variable(id, "this", line)?;
        let owner = self.super_owner(line)?;
        let start = self.class_of(&this).super_start(&owner);

        if let Some(setter) = Class::find_from(start, Table::Setters, name) {
            self.call_callable(&setter.bind(this), vec![value], Vec::new(), line)?;
            return Ok(());
        }
        match &this {
            Value::Instance(instance) => {
                self.ensure_unfrozen(instance, line)?;
                instance.set_prop(name, value);
                Ok(())
            },
            _ => self.set_property(&this, name, value, line),
        }
    }
}
