use std::{
    fs,
    path::{Path, PathBuf},
};

use kestrel::{config::Config, interpreter::evaluator::core::Interpreter};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

const SCRIPT_DIR: &str = "tests/scripts";

/// What a script says about its own run, read from `// expect:` and
/// `// expect error:` comments.
#[derive(Debug, Default)]
struct Expectations {
    output: String,
    error:  Option<String>,
}

fn expectations(source: &str) -> Expectations {
    let mut expected = Expectations::default();
    for line in source.lines() {
        if let Some((_, kind)) = line.split_once("// expect error: ") {
            expected.error = Some(kind.trim().to_string());
        } else if let Some((_, text)) = line.split_once("// expect: ") {
            expected.output.push_str(text.trim_end());
            expected.output.push('\n');
        }
    }
    expected
}

fn run_script(path: &Path) {
    let source = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
    let expected = expectations(&source);

    let config = Config { load_path: vec![PathBuf::from(SCRIPT_DIR)],
                          ..Config::default().capturing() };
    let mut interpreter = Interpreter::new(config);
    let result = interpreter.run_file(path);
    let output = interpreter.take_output();

    match (&expected.error, result) {
        (None, Err(e)) => panic!("Script {path:?} failed:\n{e}"),
        (Some(kind), Ok(_)) => panic!("Script {path:?} succeeded but was expected to fail with {kind}"),
        (Some(kind), Err(e)) => assert_eq!(e.kind(), kind.as_str(), "wrong error from {path:?}: {e}"),
        (None, Ok(_)) => {},
    }
    assert_eq!(output, expected.output, "output of {path:?}");
}

#[test]
fn script_corpus_matches_expectations() {
    let mut count = 0;

    for entry in
        WalkDir::new(SCRIPT_DIR).into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "kes"))
    {
        count += 1;
        run_script(entry.path());
    }

    assert!(count > 0, "No scripts found in {SCRIPT_DIR}");
}

#[test]
fn expectation_comments_are_collected() {
    let expected = expectations("print 1; // expect: 1\nprint 2; // expect: two  \n// expect error: Uncaught\n");
    assert_eq!(expected.output, "1\ntwo\n");
    assert_eq!(expected.error.as_deref(), Some("Uncaught"));
}
