use std::rc::Rc;

use crate::interpreter::{
    evaluator::{
        core::Interpreter,
        exception::ErrorKind,
        native::{array, error, function, global, map, module, number, object, string},
    },
    value::{
        callable::{Arity, Callable, NativeDefault, NativeFn, NativeFunction},
        class::{Class, ClassKind, Table},
        core::Value,
    },
};

/// Where a native member is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// An instance method.
    Method,
    /// A getter.
    Getter,
    /// A method of the class value itself.
    Static,
    /// A global function.
    Function,
}

/// One entry of a native member table, see `native_methods!`.
pub struct NativeDef {
    pub name:     &'static str,
    pub slot:     Slot,
    pub arity:    Arity,
    pub keywords: &'static [(&'static str, NativeDefault)],
    pub func:     NativeFn,
}

impl NativeDef {
    /// An unbound native function for this entry.
    #[must_use]
    pub fn to_native(&self) -> Rc<NativeFunction> {
        Rc::new(NativeFunction { name:     self.name,
                                 arity:    self.arity,
                                 keywords: self.keywords,
                                 func:     self.func,
                                 receiver: None, })
    }
}

/// The classes the engine itself depends on.
///
/// `Class` derives from `Module`, which derives from `Object`; every other
/// core class derives from `Object` directly, the error classes through
/// `Error`.
#[derive(Debug, Clone)]
pub struct CoreClasses {
    pub object:   Rc<Class>,
    pub module:   Rc<Class>,
    pub class:    Rc<Class>,
    pub function: Rc<Class>,
    pub number:   Rc<Class>,
    pub string:   Rc<Class>,
    pub array:    Rc<Class>,
    pub map:      Rc<Class>,
    errors:       [Rc<Class>; ErrorKind::ALL.len()],
}

impl CoreClasses {
    /// Creates the core classes with empty member tables.
    #[must_use]
    pub fn new() -> Self {
        let object = Class::new("Object", ClassKind::Class, None);
        let derived = |name: &str, superclass: &Rc<Class>| {
            Class::new(name, ClassKind::Class, Some(Rc::clone(superclass)))
        };

        let module = derived("Module", &object);
        let class = derived("Class", &module);
        let function = derived("Function", &object);
        let number = derived("Number", &object);
        for uninstantiable in [&module, &class, &function, &number] {
            uninstantiable.forbid_instances();
        }

        let root = derived(ErrorKind::Error.name(), &object);
        let errors = ErrorKind::ALL.map(|kind| match kind {
                                        ErrorKind::Error => Rc::clone(&root),
                                        other => derived(other.name(), &root),
                                    });

        Self { string: derived("String", &object),
               array: derived("Array", &object),
               map: derived("Map", &object),
               object,
               module,
               class,
               function,
               number,
               errors }
    }

    /// The class of a built-in error kind.
    #[must_use]
    pub fn error(&self, kind: ErrorKind) -> &Rc<Class> {
        &self.errors[kind as usize]
    }

    /// Every core class, in bootstrap order.
    fn all(&self) -> Vec<Rc<Class>> {
        let mut classes = vec![Rc::clone(&self.object),
                               Rc::clone(&self.module),
                               Rc::clone(&self.class),
                               Rc::clone(&self.function),
                               Rc::clone(&self.number),
                               Rc::clone(&self.string),
                               Rc::clone(&self.array),
                               Rc::clone(&self.map)];
        classes.extend(self.errors.iter().cloned());
        classes
    }
}

impl Default for CoreClasses {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs the native library into a fresh interpreter.
///
/// Fills the member tables of the core classes, binds every core class as a
/// global and registers it, then defines the global functions.
pub fn bootstrap(interpreter: &mut Interpreter) {
    let core = interpreter.core.clone();
    let tables: [(&Rc<Class>, &[NativeDef]); 9] = [(&core.object, object::METHODS),
                                                   (&core.module, module::METHODS),
                                                   (&core.class, module::CLASS_METHODS),
                                                   (&core.function, function::METHODS),
                                                   (&core.number, number::METHODS),
                                                   (&core.string, string::METHODS),
                                                   (&core.array, array::METHODS),
                                                   (&core.map, map::METHODS),
                                                   (core.error(ErrorKind::Error), error::METHODS)];
    for (class, defs) in tables {
        install(interpreter, Some(class), defs);
    }

    for class in core.all() {
        interpreter.globals
                   .define(class.name.clone(), Value::Class(Rc::clone(&class)));
        interpreter.classes.insert(class.name.clone(), class);
    }
    install(interpreter, None, global::FUNCTIONS);

    tracing::debug!(classes = interpreter.classes.len(), "native library installed");
}

fn install(interpreter: &Interpreter, class: Option<&Rc<Class>>, defs: &[NativeDef]) {
    for def in defs {
        let native = def.to_native();
        let table = match def.slot {
            Slot::Method => Table::Methods,
            Slot::Getter => Table::Getters,
            Slot::Static => Table::Statics,
            Slot::Function => {
                interpreter.globals.define(def.name, Value::Native(native));
                continue;
            },
        };
        if let Some(class) = class {
            class.define(table, def.name, Callable::Native(native));
        }
    }
}
