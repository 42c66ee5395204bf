use std::{cell::RefCell, rc::Rc};

use indoc::indoc;
use kestrel::{
    config::Config,
    error::Error,
    interpreter::{
        evaluator::{
            core::Interpreter,
            trace::{Node, TracePos, Tracer},
        },
        value::core::Value,
    },
};
use pretty_assertions::assert_eq;

fn session() -> Interpreter {
    Interpreter::new(Config::default().capturing())
}

#[test]
fn uncaught_errors_carry_the_unwind_path() {
    let source = indoc! {r#"
        fun inner() {
            throw "boom";
        }
        fun outer() {
            inner();
        }
        outer();
    "#};
    match session().run(source, "<test>") {
        Err(Error::Uncaught { message, trace }) => {
            assert_eq!(message, "boom");
            assert_eq!(trace, "  at throw (<test>:2)\n  at inner (<test>:5)\n  at outer (<test>:7)");
        },
        other => panic!("Expected an uncaught error, got {other:?}"),
    }
}

#[test]
fn caught_errors_do_not_leak_frames() {
    let mut interpreter = session();
    let source = indoc! {r#"
        fun fail() { throw "x"; }
        try { fail(); } catch ("x") {}
    "#};
    interpreter.run(source, "<test>").unwrap();
    assert!(interpreter.stack().is_empty());
}

#[test]
fn signals_run_their_trapped_handler() {
    let mut interpreter = session();
    interpreter.run("trap(\"INT\", fun () { print \"interrupted\"; });", "<test>")
               .unwrap();

    assert!(interpreter.deliver_signal("INT").unwrap());
    assert!(!interpreter.deliver_signal("TERM").unwrap());
    assert_eq!(interpreter.take_output(), "interrupted\n");
}

#[test]
fn failing_signal_handlers_report_errors() {
    let mut interpreter = session();
    interpreter.run("trap(\"USR1\", fun () { throw \"bad\"; });", "<test>").unwrap();
    assert!(matches!(interpreter.deliver_signal("USR1"), Err(Error::Uncaught { .. })));
}

#[derive(Default)]
struct Recorder {
    events: Rc<RefCell<Vec<(bool, usize, TracePos)>>>,
}

impl Tracer for Recorder {
    fn before(&mut self, node: Node<'_>, pos: TracePos) {
        self.events.borrow_mut().push((true, node.line(), pos));
    }

    fn after(&mut self, node: Node<'_>, pos: TracePos) {
        self.events.borrow_mut().push((false, node.line(), pos));
    }
}

#[test]
fn tracer_sees_balanced_events_without_changing_results() {
    let recorder = Recorder::default();
    let events = Rc::clone(&recorder.events);

    let mut interpreter = session();
    interpreter.set_tracer(Box::new(recorder));
    interpreter.run("var a = 1 + 2;\nprint a * 2;", "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "6\n");

    let events = events.borrow();
    let befores = events.iter().filter(|(before, ..)| *before).count();
    assert_eq!(befores * 2, events.len());

    let top_level: Vec<(bool, usize, TracePos)> = events.iter().copied().filter(|(_, _, pos)| pos.depth == 0).collect();
    assert_eq!(top_level,
               vec![(true, 1, TracePos { depth: 0, index: 0 }),
                    (false, 1, TracePos { depth: 0, index: 0 }),
                    (true, 2, TracePos { depth: 0, index: 1 }),
                    (false, 2, TracePos { depth: 0, index: 1 })]);
    assert!(interpreter.take_tracer().is_some());
}

#[test]
fn static_strings_are_shared_per_site() {
    let mut interpreter = session();
    let source = indoc! {r#"
        fun label() { return s"fixed"; }
        print label() == label();
        print label().isFrozen();
        print "a".isFrozen();
    "#};
    interpreter.run(source, "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "true\ntrue\nfalse\n");
}

#[test]
fn echo_mode_prints_each_expression_statement() {
    let mut interpreter = Interpreter::new(Config::default().capturing().echoing(true));
    interpreter.run("1 + 1;\n\"1\" + \"1\";\nprint \"printed\";\nnil;", "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "2\n11\nprinted\nnil\n");
}

#[test]
fn run_returns_the_last_expression_value() {
    let mut interpreter = session();
    assert_eq!(interpreter.run("var x = 20; x + 22;", "<test>").unwrap(), Value::Number(42.0));
    assert_eq!(interpreter.run("var y = 1;", "<test>").unwrap(), Value::Nil);
}

#[test]
fn code_from_earlier_runs_keeps_working() {
    let mut interpreter = session();
    let source = indoc! {r#"
        fun counter() {
            var n = 0;
            return fun () { n = n + 1; return s"tick" + n.toString(); };
        }
        var next = counter();
    "#};
    interpreter.run(source, "<first>").unwrap();
    for round in 0..3 {
        interpreter.run(&format!("var filler{round} = {{\"k\": [{round}]}};"), "<filler>").unwrap();
        interpreter.run("eval(\"var viaEval = 1;\");", "<eval>").unwrap();
    }
    interpreter.run("print next(); print next();", "<last>").unwrap();
    assert_eq!(interpreter.take_output(), "tick1\ntick2\n");
}
