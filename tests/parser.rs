use std::rc::Rc;

use indoc::indoc;
use kestrel::{
    ast::{IdGen, Stmt, sexp},
    error::Diagnostics,
    interpreter::parser::parse,
};
use pretty_assertions::assert_eq;

fn parse_source(source: &str) -> (Vec<Stmt>, Diagnostics) {
    let mut ids = IdGen::default();
    let mut diagnostics = Diagnostics::default();
    let program = parse(source, &Rc::from("<test>"), &mut ids, &mut diagnostics);
    (program, diagnostics)
}

/// Parses `source` and renders every statement, one per line.
fn render(source: &str) -> String {
    let (program, diagnostics) = parse_source(source);
    assert!(!diagnostics.had_error(),
            "unexpected diagnostics: {}",
            kestrel::error::diagnostics::render(diagnostics.reported()));
    program.iter().map(sexp::stmt).collect::<Vec<_>>().join("\n")
}

/// Parses `source`, which must fail, and returns the rendered diagnostics.
fn errors(source: &str) -> Vec<String> {
    let (_, diagnostics) = parse_source(source);
    assert!(diagnostics.had_error(), "expected {source:?} to fail");
    diagnostics.reported().iter().map(ToString::to_string).collect()
}

#[test]
fn operator_precedence() {
    assert_eq!(render("print 1 + 2 * 3;"), "(print (+ 1 (* 2 3)))");
    assert_eq!(render("-a - !b;"), "(; (- (- a) (! b)))");
    assert_eq!(render("(1 + 2) * 3;"), "(; (* (group (+ 1 2)) 3))");
    assert_eq!(render("a or b and c;"), "(; (or a (and b c)))");
    assert_eq!(render("1 < 2 == true;"), "(; (== (< 1 2) true))");
}

#[test]
fn assignment_targets() {
    assert_eq!(render("a = b = 1;"), "(; (= a (= b 1)))");
    assert_eq!(render("x += 2;"), "(; (= x (+ x 2)))");
    assert_eq!(render("o.f *= 3;"), "(; (.= o f (* (. o f) 3)))");
    assert_eq!(render("a[0] = 1;"), "(; ([]= a 0 1))");
}

#[test]
fn calls_and_member_access() {
    assert_eq!(render("f(1, *xs, k: 2).g;"), "(; (. (call f 1 *xs k: 2) g))");
    assert_eq!(render("a.b(c)[d];"), "(; ([] (call (. a b) c) d))");
    assert_eq!(render("obj.class;"), "(; (. obj class))");
}

#[test]
fn literals() {
    assert_eq!(render("print [1, \"a\", nil];"), "(print (array 1 \"a\" nil))");
    assert_eq!(render("print {\"k\": 1, 2: false};"), "(print (map (\"k\" 1) (2 false)))");
    assert_eq!(render("s\"x\";"), "(; (static \"x\"))");
    assert_eq!(render("var f = fun (x) { return x; };"),
               "(var (f) (fun <anonymous> (x) (return x)))");
}

#[test]
fn interpolation_becomes_concatenation() {
    assert_eq!(render(r#""hi ${name}!";"#), r#"(; (group (+ (+ "hi " name) "!")))"#);
    assert_eq!(render(r#""${a}${b}";"#), r#"(; (group (+ (+ "" a) b)))"#);
    assert_eq!(render(r#""plain";"#), r#"(; "plain")"#);
}

#[test]
fn declarations() {
    assert_eq!(render("var a, b = 1, 2;"), "(var (a b) 1 2)");
    assert_eq!(render("fun f(a, b = 1, *rest, key: 2) { return a; }"),
               "(fun f (a b=1 *rest key: 2) (return a))");

    let class = indoc! {"
        class A < B {
            init(x) { this.x = x; }
            class make() { return A(1); }
            size { return 1; }
            size=(v) {}
        }
    "};
    assert_eq!(render(class),
               "(class A < B (method init (x) (; (.= this x x))) (static make () (return (call A 1))) \
                (getter size () (return 1)) (setter size (v)))");
    assert_eq!(render("module M { hi() {} }"), "(module M (method hi ()))");
}

#[test]
fn statements() {
    assert_eq!(render("for (var i = 0; i < 3; i = i + 1) print i;"),
               "(for (var (i) 0) (< i 3) (= i (+ i 1)) (print i))");
    assert_eq!(render("for (;;) break;"), "(for _ _ _ (break))");
    assert_eq!(render("foreach k, v in m { print k; }"), "(foreach (k v) m (block (print k)))");
    assert_eq!(render("while (x) { continue; }"), "(while x (block (continue)))");
    assert_eq!(render("if (a) print 1; else print 2;"), "(if a (print 1) (print 2))");
    assert_eq!(render("in (o) { print 1; }"), "(in o (print 1))");
    assert_eq!(render("try { throw 1; } catch (Error e) { print e; } catch (\"x\") {}"),
               "(try (throw 1) (catch Error e (print e)) (catch \"x\"))");
}

#[test]
fn invalid_assignment_target() {
    assert_eq!(errors("1 = 2;"), vec!["Error on line 1 at '=': Invalid assignment target."]);
}

#[test]
fn loop_control_outside_loop() {
    assert_eq!(errors("break;"),
               vec!["Error on line 1 at 'break': Can't use 'break' outside of a loop."]);
    assert_eq!(errors("while (true) { fun f() { continue; } }").len(), 1);
}

#[test]
fn parameter_shape_errors() {
    assert_eq!(errors("fun f(a = 1, b) {}"),
               vec!["Error on line 1 at 'b': Required parameter 'b' follows an optional one."]);
    assert_eq!(errors("fun f(*a, *b) {}"),
               vec!["Error on line 1: Only one splat parameter is allowed."]);
    errors("fun f(*a, b) {}");
}

#[test]
fn too_many_initializers() {
    assert_eq!(errors("var a = 1, 2;"),
               vec!["Error on line 1: More initializers than variables in declaration."]);
}

#[test]
fn recovers_and_reports_every_statement() {
    let source = indoc! {"
        var = 1;
        print ;
        print 3;
    "};
    let reported = errors(source);
    assert_eq!(reported.len(), 2, "{reported:?}");
    assert!(reported[0].starts_with("Error on line 1"));
    assert!(reported[1].starts_with("Error on line 2"));
}
