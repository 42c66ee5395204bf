use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use indoc::indoc;
use kestrel::{config::Config, error::Error, interpreter::evaluator::core::Interpreter};
use pretty_assertions::assert_eq;
use tracing::Level;

fn session() -> Interpreter {
    Interpreter::new(Config::default().capturing())
}

/// Runs `source`, which must fail resolution, and returns every diagnostic.
fn resolve_errors(source: &str) -> Vec<String> {
    match session().run(source, "<test>") {
        Err(Error::Resolve { diagnostics }) => diagnostics.iter().map(ToString::to_string).collect(),
        Err(other) => panic!("Expected a resolve error, got: {other}"),
        Ok(_) => panic!("Expected {source:?} to fail resolution"),
    }
}

#[test]
fn own_initializer() {
    assert_eq!(resolve_errors("{ var a = a; }"),
               vec!["Error on line 1 at 'a': Can't read local variable 'a' in its own initializer."]);
}

#[test]
fn redeclaration_in_one_local_scope() {
    assert_eq!(resolve_errors("fun f() {\n  var a = 1;\n  var a = 2;\n}"),
               vec!["Error on line 3 at 'a': Already a variable named 'a' in this scope."]);
}

#[test]
fn globals_may_be_redeclared() {
    let mut interpreter = session();
    interpreter.run("var a = 1; var a = 2; print a;", "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "2\n");
}

#[test]
fn this_outside_class() {
    assert_eq!(resolve_errors("print this;"),
               vec!["Error on line 1 at 'this': Can't use 'this' outside of a class."]);
    resolve_errors("fun f() { return this; }");
}

#[test]
fn super_outside_method() {
    assert_eq!(resolve_errors("fun f() { return super.x; }"),
               vec!["Error on line 1 at 'super': Can't use 'super' outside of a method."]);
}

#[test]
fn top_level_return() {
    assert_eq!(resolve_errors("return 1;"),
               vec!["Error on line 1 at 'return': Can't return from top-level code."]);
}

#[test]
fn unknown_super_member() {
    let source = indoc! {"
        class A { present() {} }
        class B < A {
            run() { return super.absent(); }
        }
    "};
    assert_eq!(resolve_errors(source),
               vec!["Error on line 3 at 'absent': No ancestor of 'B' has a member named 'absent'."]);
}

#[test]
fn super_members_found_through_the_chain() {
    let source = indoc! {r#"
        class A { hello() { return "a"; } }
        class B < A {}
        class C < B { hello() { return super.hello() + "c"; } }
        print C().hello();
    "#};
    let mut interpreter = session();
    interpreter.run(source, "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "ac\n");
}

#[test]
fn reopened_classes_are_not_checked_statically() {
    let source = indoc! {r#"
        module Extra { absent() { return "mixed in"; } }
        class A {}
        class B < A { run() { return super.absent(); } }
        A.include(Extra);
        print B().run();
    "#};
    let mut interpreter = session();
    interpreter.run(source, "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "mixed in\n");
}

#[test]
fn classes_from_earlier_runs_are_known() {
    let mut interpreter = session();
    interpreter.run("class Base { greet() { return 1; } }", "<first>").unwrap();
    let result = interpreter.run("class Derived < Base { run() { return super.missing(); } }", "<second>");
    assert!(matches!(result, Err(Error::Resolve { .. })), "{result:?}");
    interpreter.run("class Fine < Base { run() { return super.greet(); } } print Fine().run();",
                    "<third>")
               .unwrap();
    assert_eq!(interpreter.take_output(), "1\n");
}

#[test]
fn every_problem_is_reported() {
    let source = indoc! {"
        print this;
        return 1;
    "};
    assert_eq!(resolve_errors(source).len(), 2);
}

#[test]
fn nested_scopes_shadow_correctly() {
    let source = indoc! {"
        var x = 1;
        fun f() {
            var x = 2;
            {
                var x = 3;
                print x;
            }
            print x;
        }
        f();
        print x;
    "};
    let mut interpreter = session();
    interpreter.run(source, "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "3\n2\n1\n");
}

#[derive(Clone, Default)]
struct SharedLog(Arc<Mutex<Vec<u8>>>);

impl Write for SharedLog {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs a failing program under a subscriber capped at `level`.
fn logged_at(level: Level) -> String {
    let log = SharedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt().with_max_level(level)
                                              .with_ansi(false)
                                              .with_writer(move || writer.clone())
                                              .finish();
    tracing::subscriber::with_default(subscriber, || {
        resolve_errors("return 1;");
    });
    let bytes = log.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn resolution_errors_are_logged_at_debug() {
    assert!(!logged_at(Level::INFO).contains("resolution error"));
    let debug = logged_at(Level::DEBUG);
    assert!(debug.contains("DEBUG"), "{debug}");
    assert!(debug.contains("resolution error"), "{debug}");
}
