use indoc::indoc;
use kestrel::{
    config::Config,
    error::{Error, RuntimeError},
    get_result,
    interpreter::evaluator::core::Interpreter,
};
use pretty_assertions::assert_eq;

fn output(src: &str) -> String {
    get_result(src, false).unwrap_or_else(|e| panic!("Script failed: {e}"))
}

fn assert_success(src: &str) {
    if let Err(e) = get_result(src, false) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if get_result(src, false).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

/// The message of the value that escaped the script.
fn uncaught(src: &str) -> String {
    match get_result(src, false) {
        Err(Error::Uncaught { message, .. }) => message,
        Err(other) => panic!("Expected an uncaught error, got: {other}"),
        Ok(out) => panic!("Script succeeded but was expected to throw, printed: {out}"),
    }
}

#[test]
fn echo_prints_expression_statements() {
    assert_eq!(get_result("1 + 1;", true).unwrap(), "2\n");
    assert_eq!(get_result("\"1\" + \"1\";", true).unwrap(), "11\n");
    assert_eq!(get_result("10 / 4; 3 * (2 - 5);", true).unwrap(), "2.5\n-9\n");
    assert_eq!(get_result("var x = 1;", true).unwrap(), "");
}

#[test]
fn undefined_variable_is_an_error() {
    assert!(uncaught("print y;").starts_with("NameError"));
}

#[test]
fn variables_and_scopes() {
    let src = indoc! {r#"
        var a = "global";
        {
            var a = "inner";
            print a;
        }
        print a;
        a = "changed";
        print a;
    "#};
    assert_eq!(output(src), "inner\nglobal\nchanged\n");
}

#[test]
fn free_names_bind_to_globals_not_later_locals() {
    let src = indoc! {r#"
        var a = "global";
        {
            fun show() { print a; }
            show();
            var a = "block";
            show();
        }
    "#};
    assert_eq!(output(src), "global\nglobal\n");

    let src = indoc! {r#"
        var a = "global";
        {
            fun set() { a = "set"; }
            var a = "block";
            set();
            print a;
        }
        print a;
    "#};
    assert_eq!(output(src), "block\nset\n");

    let src = indoc! {r#"
        fun greet() { return "global fn"; }
        {
            fun relay() { return greet(); }
            var greet = "shadow";
            print relay();
        }
    "#};
    assert_eq!(output(src), "global fn\n");
}

#[test]
fn closures_capture_their_environment() {
    let src = indoc! {"
        fun adder(n) {
            return fun (x) { return x + n; };
        }
        print adder(10)(20);
        var add5 = adder(5);
        print add5(10);
    "};
    assert_eq!(output(src), "30\n15\n");

    let src = indoc! {"
        fun makeCounter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        var counter = makeCounter();
        counter();
        counter();
        print counter();
        print makeCounter()();
    "};
    assert_eq!(output(src), "3\n1\n");
}

#[test]
fn parameters_defaults_splats_and_keywords() {
    let src = indoc! {"
        fun f(a, b = 2, *rest, key: 3) { return [a, b, rest, key]; }
        print f(1);
        print f(1, 5, 6, 7, key: 9);
        var args = [1, 2];
        print f(*args);
        print f(1, *{\"key\": 4});
    "};
    assert_eq!(output(src), "[1, 2, [], 3]\n[1, 5, [6, 7], 9]\n[1, 2, [], 3]\n[1, 2, [], 4]\n");
}

#[test]
fn defaults_see_earlier_parameters() {
    assert_eq!(output("fun f(a, b = a * 2) { return a + b; } print f(3); print f(3, 1);"),
               "9\n4\n");
}

#[test]
fn argument_errors() {
    let src = "fun f(a, b = 2, key: 3) { return a; }\n";
    assert!(uncaught(&format!("{src}f();")).starts_with("ArgumentError"));
    assert!(uncaught(&format!("{src}f(1, 2, 3);")).starts_with("ArgumentError"));
    assert!(uncaught(&format!("{src}f(1, nope: 1);")).starts_with("ArgumentError"));
    assert!(uncaught(&format!("{src}f(1, key: 1, key: 2);")).starts_with("ArgumentError"));
    assert!(uncaught(&format!("{src}f(*1);")).starts_with("TypeError"));
    assert!(uncaught("nope(1);").starts_with("NoSuchFunctionError"));
    assert!(uncaught("var x = 1; x();").starts_with("TypeError"));
}

#[test]
fn control_flow() {
    let src = indoc! {"
        var total = 0;
        for (var i = 0; i < 10; i = i + 1) {
            if (i == 3) continue;
            if (i == 6) break;
            total = total + i;
        }
        print total;
        var n = 0;
        while (n < 3) n = n + 1;
        print n;
        print nil or \"fallback\";
        print 1 and 2;
    "};
    assert_eq!(output(src), "12\n3\nfallback\n2\n");
}

#[test]
fn foreach_over_arrays_maps_and_strings() {
    let src = indoc! {r#"
        foreach x in [1, 2, 3] { print x * 2; }
        foreach k, v in {"a": 1, "b": 2} { print k + "=" + v.toString(); }
        foreach c in "hi" { print c; }
        foreach a, b in [[1, 2], [3, 4]] { print a + b; }
    "#};
    assert_eq!(output(src), "2\n4\n6\na=1\nb=2\nh\ni\n3\n7\n");
}

#[test]
fn polymorphic_this_and_super() {
    let src = indoc! {r#"
        class Animal {
            init(name) { this.name = name; }
            describe() { return this.name + " says " + this.sound(); }
            sound() { return "..."; }
        }
        class Dog < Animal {
            sound() { return "woof"; }
        }
        class Puppy < Dog {
            sound() { return super.sound() + "!"; }
        }
        print Animal("Generic").describe();
        print Dog("Rex").describe();
        print Puppy("Bit").describe();
        print Puppy("Bit").isA(Animal);
        print Dog("Rex").isA(Puppy);
    "#};
    assert_eq!(output(src),
               "Generic says ...\nRex says woof\nBit says woof!\ntrue\nfalse\n");
}

#[test]
fn getters_setters_and_statics() {
    let src = indoc! {"
        class Temperature {
            init(celsius) { this.celsius = celsius; }
            fahrenheit { return this.celsius * 9 / 5 + 32; }
            fahrenheit=(value) { this.celsius = (value - 32) * 5 / 9; }
            class freezing() { return Temperature(0); }
        }
        var t = Temperature(100);
        print t.fahrenheit;
        t.fahrenheit = 32;
        print t.celsius;
        print Temperature.freezing().fahrenheit;
    "};
    assert_eq!(output(src), "212\n0\n32\n");
}

#[test]
fn property_miss_is_nil_and_method_miss_throws() {
    let src = "class Box {} var b = Box(); print b.missing;";
    assert_eq!(output(src), "nil\n");
    assert!(uncaught("class Box {} Box().missing();").starts_with("NoSuchMethodError"));
}

#[test]
fn property_missing_hook() {
    let src = indoc! {r#"
        class Ghost {
            propertyMissing(name) { return "no " + name; }
        }
        print Ghost().anything;
    "#};
    assert_eq!(output(src), "no anything\n");
}

#[test]
fn modules_are_included_once() {
    let src = indoc! {r#"
        module Greets {
            greet() { return "hi " + this.name; }
        }
        class Person {
            init(name) { this.name = name; }
        }
        print Person.include(Greets);
        print Person.include(Greets);
        var p = Person("ann");
        print p.greet();
        print p.isA(Greets);
        print Person.ancestors();
    "#};
    assert_eq!(output(src), "true\nfalse\nhi ann\ntrue\n[Person, Greets, Object]\n");
}

#[test]
fn modules_cannot_be_instantiated() {
    assert!(uncaught("module M {} M();").starts_with("TypeError"));
    assert!(uncaught("Number();").starts_with("TypeError"));
}

#[test]
fn operator_protocol_methods() {
    let src = indoc! {"
        class Vec2 {
            init(x, y) { this.x = x; this.y = y; }
            opAdd(other) { return Vec2(this.x + other.x, this.y + other.y); }
            opDiff(other) { return Vec2(this.x - other.x, this.y - other.y); }
            toString() { return \"(\" + this.x.toString() + \", \" + this.y.toString() + \")\"; }
        }
        print Vec2(1, 2) + Vec2(3, 4);
        print Vec2(5, 5) - Vec2(1, 2);
    "};
    assert_eq!(output(src), "(4, 6)\n(4, 3)\n");
    assert!(uncaught("class A {} A() * 2;").starts_with("TypeError"));
    assert!(uncaught("1 + \"a\";").starts_with("TypeError"));
}

#[test]
fn catch_by_class_and_by_value() {
    let src = indoc! {r#"
        try {
            throw TypeError("bad type");
        } catch (ArgumentError e) {
            print "wrong clause";
        } catch (Error e) {
            print e.message;
        }
        try {
            throw "oops";
        } catch ("oops") {
            print "caught string";
        }
        try {
            [].nope();
        } catch (NoSuchMethodError e) {
            print e.class;
        }
    "#};
    assert_eq!(output(src), "bad type\ncaught string\nNoSuchMethodError\n");
}

#[test]
fn unmatched_throw_escapes() {
    let src = "try { throw 42; } catch (\"other\") { print 1; }";
    assert_eq!(uncaught(src), "42");
    assert_eq!(uncaught("throw ArgumentError(\"nope\");"), "ArgumentError: nope");
}

#[test]
fn var_destructures_arrays() {
    let src = indoc! {"
        var a, b = [1, 2];
        print a + b;
        var c, d = 7;
        print c;
        print d;
        var e, f = 3, 4;
        print e * f;
    "};
    assert_eq!(output(src), "3\n7\nnil\n12\n");
}

#[test]
fn frozen_objects_reject_writes() {
    assert!(uncaught("class P {} var p = P().freeze(); p.x = 1;").starts_with("FrozenObjectError"));
    assert!(uncaught("var s = s\"abc\"; s.push(\"d\");").starts_with("FrozenObjectError"));
    assert!(uncaught("var a = [1].freeze(); a.push(2);").starts_with("FrozenObjectError"));
    assert!(uncaught("s\"abc\".init(\"xyz\");").starts_with("FrozenObjectError"));
    let src = indoc! {r#"
        fun label() { return s"abc"; }
        try { label().init("xyz"); } catch (FrozenObjectError) {}
        print label();
    "#};
    assert_eq!(output(src), "abc\n");
    assert_eq!(output("var s = \"abc\"; s.push(\"d\"); print s; print s.isFrozen();"), "abcd\nfalse\n");
}

#[test]
fn string_interpolation() {
    let src = indoc! {r#"
        var name = "world";
        var n = 3;
        print "hello ${name}, ${n + 1} times";
        print 'no ${interpolation}';
    "#};
    assert_eq!(output(src), "hello world, 4 times\nno ${interpolation}\n");
}

#[test]
fn in_blocks_bind_this() {
    let src = indoc! {"
        class Counter { init() { this.n = 0; } }
        in (Counter) {
            fun bump() {
                this.n = this.n + 1;
                return this;
            }
        }
        var c = Counter();
        c.bump().bump();
        print c.n;
        in (c) { this.n = 10; }
        print c.n;
    "};
    assert_eq!(output(src), "2\n10\n");
}

#[test]
fn double_include_returns_false() {
    assert_eq!(output("module M {} class A {} print A.include(M); print A.include(M);"),
               "true\nfalse\n");
}

#[test]
fn assert_and_typeof() {
    assert_success("assert(typeof(1) == \"number\");");
    assert_success("assert(typeof(nil) == \"nil\"); assert(typeof(\"s\") == \"String\");");
    assert!(uncaught("assert(false, message: \"custom\");").contains("custom"));
    assert_failure("assert(1 == 2);");
}

#[test]
fn eval_runs_at_global_scope() {
    assert_eq!(output("eval(\"var z = 40;\"); print z + 2;"), "42\n");
    assert!(uncaught("eval(\"var = ;\");").starts_with("LoadError"));
}

fn session() -> Interpreter {
    Interpreter::new(Config::default().capturing())
}

#[test]
fn runaway_recursion_is_fatal() {
    let result = session().run("fun g(n) { return g(n + 1); } g(0);", "<test>");
    match result {
        Err(Error::Runtime { source: RuntimeError::StackOverflow { depth, line }, .. }) => {
            assert_eq!((depth, line), (255, 1));
        },
        other => panic!("Expected a fatal error, got {other:?}"),
    }
}

#[test]
fn stack_overflow_cannot_be_caught() {
    let mut interpreter = session();
    let src = "fun loop() { loop(); } try { loop(); } catch (Error e) { print \"caught\"; }";
    assert!(matches!(interpreter.run(src, "<test>"), Err(Error::Runtime { .. })));
    assert_eq!(interpreter.take_output(), "");
}

#[test]
fn recursion_up_to_the_default_bound_works() {
    let mut interpreter = session();
    let src = "fun f(n) { if (n > 0) return f(n - 1); return n; } print f(250);";
    interpreter.run(src, "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "0\n");

    let src = "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(15);";
    interpreter.run(src, "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "610\n");
}

#[test]
fn the_call_bound_is_configurable() {
    let mut interpreter = Interpreter::new(Config { max_call_depth: 10,
                                                    ..Config::default().capturing() });
    let src = "fun f(n) { if (n > 0) return f(n - 1); return n; }";
    interpreter.run(src, "<test>").unwrap();
    interpreter.run("print f(5);", "<test>").unwrap();
    assert_eq!(interpreter.take_output(), "0\n");
    assert!(matches!(interpreter.run("f(20);", "<test>"), Err(Error::Runtime { .. })));
}

#[test]
fn parse_and_resolve_errors_prevent_execution() {
    let result = get_result("print \"before\"; var = 1;", false);
    assert!(matches!(result, Err(Error::Parse { .. })));
    let result = get_result("print \"before\"; return 1;", false);
    assert!(matches!(result, Err(Error::Resolve { .. })));
}

#[test]
fn sessions_keep_state_between_runs() {
    let mut interpreter = Interpreter::new(Config::default().capturing());
    interpreter.run("var total = 1; class Box {}", "<first>").unwrap();
    interpreter.run("total = total + 1; print total; print Box;", "<second>").unwrap();
    assert_eq!(interpreter.take_output(), "2\nBox\n");
    assert!(interpreter.class("Box").is_some());
    assert!(interpreter.global("total").is_some());
}

#[test]
fn errors_leave_the_session_usable() {
    let mut interpreter = Interpreter::new(Config::default().capturing());
    assert!(interpreter.run("throw \"first\";", "<first>").is_err());
    assert!(interpreter.run("print 1 +;", "<second>").is_err());
    interpreter.run("print \"still here\";", "<third>").unwrap();
    assert_eq!(interpreter.take_output(), "still here\n");
}
