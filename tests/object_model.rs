use std::rc::Rc;

use indoc::indoc;
use kestrel::{
    config::Config,
    interpreter::{
        evaluator::core::Interpreter,
        value::class::{Class, ClassKind, Table},
    },
};
use pretty_assertions::assert_eq;

fn names(chain: &[Rc<Class>]) -> Vec<&str> {
    chain.iter().map(|class| class.name.as_str()).collect()
}

struct Hierarchy {
    base:    Rc<Class>,
    derived: Rc<Class>,
    outer:   Rc<Class>,
    inner:   Rc<Class>,
}

/// `Derived < Base < Object`, and a module `Outer` that includes `Inner`.
fn hierarchy() -> Hierarchy {
    let object = Class::new("Object", ClassKind::Class, None);
    let base = Class::new("Base", ClassKind::Class, Some(object));
    let derived = Class::new("Derived", ClassKind::Class, Some(Rc::clone(&base)));
    let outer = Class::new("Outer", ClassKind::Module, None);
    let inner = Class::new("Inner", ClassKind::Module, None);
    assert!(outer.include(&inner));
    Hierarchy { base,
                derived,
                outer,
                inner }
}

#[test]
fn including_a_module_splices_it_and_its_includes() {
    let Hierarchy { base, derived, outer, inner } = hierarchy();

    assert!(derived.include(&outer));
    let chain = derived.ancestors();
    assert_eq!(names(&chain), vec!["Derived", "Outer", "Inner", "Base", "Object"]);
    let kinds: Vec<ClassKind> = chain.iter().map(|class| class.kind).collect();
    assert_eq!(kinds,
               vec![ClassKind::Class,
                    ClassKind::Mixin,
                    ClassKind::Mixin,
                    ClassKind::Class,
                    ClassKind::Class]);

    assert!(derived.is_a(&outer));
    assert!(derived.is_a(&inner));
    assert!(!base.is_a(&outer));
    assert_eq!(derived.nearest_superclass().map(|c| c.name.clone()), Some("Base".to_string()));
}

#[test]
fn including_twice_changes_nothing() {
    let Hierarchy { derived, outer, inner, .. } = hierarchy();

    assert!(derived.include(&outer));
    assert!(!derived.include(&outer));
    assert!(!derived.include(&inner));
    assert_eq!(derived.ancestors().len(), 5);

    assert!(!outer.include(&inner));
    assert!(!outer.include(&outer));
    assert_eq!(names(&outer.included()), vec!["Inner"]);
}

#[test]
fn earlier_ancestors_stay_above_a_later_include() {
    let Hierarchy { base, derived, outer, .. } = hierarchy();
    let extra = Class::new("Extra", ClassKind::Module, None);

    assert!(base.include(&extra));
    assert!(derived.include(&outer));
    assert_eq!(names(&derived.ancestors()),
               vec!["Derived", "Outer", "Inner", "Base", "Extra", "Object"]);
}

#[test]
fn super_lookup_starts_above_the_owner() {
    let Hierarchy { base, derived, outer, .. } = hierarchy();
    assert!(derived.include(&outer));

    let start = |owner: &Rc<Class>| derived.super_start(owner).map(|c| c.name.clone());
    assert_eq!(start(&derived), Some("Outer".to_string()));
    assert_eq!(start(&outer), Some("Inner".to_string()));
    assert_eq!(start(&base), Some("Object".to_string()));
}

#[test]
fn instantiability() {
    let Hierarchy { base, outer, .. } = hierarchy();
    assert!(base.is_instantiable());
    assert!(!outer.is_instantiable());
    base.forbid_instances();
    assert!(!base.is_instantiable());
}

#[test]
fn declared_members_land_in_their_tables() {
    let mut interpreter = Interpreter::new(Config::default().capturing());
    let source = indoc! {"
        class A {
            hi() { return 1; }
            size { return 2; }
            size=(v) {}
        }
        class B < A {
            class make() { return B(); }
        }
        module M { helper() {} }
    "};
    interpreter.run(source, "<test>").unwrap();

    let b = interpreter.class("B").unwrap();
    assert!(b.own(Table::Methods, "hi").is_none());
    assert!(b.find(Table::Methods, "hi").is_some());
    assert!(b.find(Table::Getters, "size").is_some());
    assert!(b.find(Table::Setters, "size").is_some());
    assert!(b.find(Table::Methods, "size").is_none());
    assert_eq!(b.own_names(Table::Statics), vec!["make".to_string()]);
    assert!(b.find(Table::Methods, "toString").is_some());
    assert_eq!(names(&b.ancestors()), vec!["B", "A", "Object"]);

    let m = interpreter.module("M").unwrap();
    assert_eq!(m.kind, ClassKind::Module);
    assert_eq!(m.own_names(Table::Methods), vec!["helper".to_string()]);
    assert!(interpreter.class("M").is_none());
}

#[test]
fn core_classes_are_registered() {
    let interpreter = Interpreter::new(Config::default());
    for name in ["Object", "Module", "Class", "Function", "Number", "String", "Array", "Map", "Error"] {
        assert!(interpreter.class(name).is_some(), "missing {name}");
    }

    let error = interpreter.class("Error").unwrap();
    for name in ["ArgumentError", "TypeError", "NameError", "FrozenObjectError", "LoadError"] {
        let class = interpreter.class(name).unwrap();
        assert!(class.is_a(&error), "{name} is not an Error");
    }

    let class = interpreter.class("Class").unwrap();
    assert_eq!(names(&class.ancestors()), vec!["Class", "Module", "Object"]);
    assert!(!interpreter.class("Number").unwrap().is_instantiable());
}

#[test]
fn subclasses_of_builtin_containers_get_their_storage() {
    let mut interpreter = Interpreter::new(Config::default().capturing());
    let source = indoc! {r#"
        class Stack < Array {
            peek() { return this.last(); }
        }
        var s = Stack(1, 2);
        s.push(3);
        print s.peek();
        print s.length;
        class Name < String {}
        print Name("abc").upcase();
    "#};
    interpreter.run(source, "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "3\n3\nABC\n");
}
