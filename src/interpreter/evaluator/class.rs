use std::rc::Rc;

use crate::{
    ast::{ClassDecl, Expr, FunctionDecl, FunctionKind, Stmt},
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            exception::ErrorKind,
        },
        value::{
            callable::{Callable, Function},
            class::{Class, ClassKind, Table},
            core::Value,
        },
    },
};

/// The member table a declaration of `kind` is stored in.
const fn table_for(kind: FunctionKind) -> Table {
    match kind {
        FunctionKind::Getter => Table::Getters,
        FunctionKind::Setter => Table::Setters,
        FunctionKind::Static => Table::Statics,
        FunctionKind::Function | FunctionKind::Method | FunctionKind::Initializer => Table::Methods,
    }
}

impl Interpreter {
    /// Executes `class Name < Super { ... }`.
    ///
    /// Without an explicit superclass the class derives from `Object`. A
    /// class deriving from a non-instantiable class cannot be instantiated
    /// either.
    ///
    /// # Errors
    /// `TypeError` if the superclass expression is not a class.
    pub(crate) fn declare_class(&mut self, decl: &Rc<ClassDecl>) -> EvalResult<()> {
        let superclass = match &decl.superclass {
            Some(expr) => self.superclass_of(expr, decl.line)?,
            None => Rc::clone(&self.core.object),
        };

        let class = Class::new(decl.name.clone(), ClassKind::Class, Some(Rc::clone(&superclass)));
        if !superclass.is_instantiable() {
            class.forbid_instances();
        }
        self.env.define(decl.name.clone(), Value::Class(Rc::clone(&class)));
        self.install_members(&class, decl);

        tracing::debug!(class = %decl.name, superclass = %superclass.name, "class declared");
        self.classes.insert(decl.name.clone(), class);
        Ok(())
    }

    fn superclass_of(&mut self, expr: &Expr, line: usize) -> EvalResult<Rc<Class>> {
        match self.evaluate(expr)? {
            Value::Class(class) if class.kind == ClassKind::Class => Ok(class),
            other => Err(self.raise(ErrorKind::TypeError,
                                    format!("Superclass must be a class, got {}", other.describe()),
                                    line)),
        }
    }

    /// Executes `module Name { ... }`.
    pub(crate) fn declare_module(&mut self, decl: &Rc<ClassDecl>) -> EvalResult<()> {
        let module = Class::new(decl.name.clone(), ClassKind::Module, None);
        self.env.define(decl.name.clone(), Value::Class(Rc::clone(&module)));
        self.install_members(&module, decl);

        tracing::debug!(module = %decl.name, "module declared");
        self.modules.insert(decl.name.clone(), module);
        Ok(())
    }

    /// Stores every member of `decl` in `class`, closing over the current
    /// scope.
    fn install_members(&self, class: &Rc<Class>, decl: &ClassDecl) {
        let members = decl.methods
                          .iter()
                          .chain(&decl.getters)
                          .chain(&decl.setters)
                          .chain(&decl.statics);
        for member in members {
            class.define(table_for(member.kind),
                         member.name.clone(),
                         self.method(member, Some(Rc::clone(class))));
        }
    }

    fn method(&self, decl: &Rc<FunctionDecl>, owner: Option<Rc<Class>>) -> Callable {
        Callable::Function(Rc::new(Function::new(Rc::clone(decl), self.env.clone(), owner)))
    }

    /// Executes `in (object) { body }`.
    ///
    /// The body runs in a scope where `this` is the object. Functions
    /// declared directly in the body become instance methods when the
    /// object is a class or module, and functions bound to the object
    /// otherwise. Either way the name is also bound in the body's scope.
    pub(crate) fn execute_in(&mut self, object: &Expr, body: &[Stmt]) -> EvalResult<()> {
        let target = self.evaluate(object)?;
        let scope = self.env.child();
        scope.define("this", target.clone());

        self.with_env(scope, |this| {
                for statement in body {
                    let Stmt::Function(decl) = statement else {
                        this.execute(statement)?;
                        continue;
                    };
                    let function = match &target {
                        Value::Class(class) => {
                            let method = this.method(decl, Some(Rc::clone(class)));
                            class.define(Table::Methods, decl.name.clone(), method.clone());
                            method
                        },
                        _ => this.method(decl, this.current_owner.clone()),
                    };
                    this.env.define(decl.name.clone(), function.bind(target.clone()).into());
                }
                Ok(())
            })
    }
}
