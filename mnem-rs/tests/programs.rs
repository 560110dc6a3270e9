//! Whole programs run through the library with an in-memory console.

use std::fs;
use std::path::Path;

use mnem::config::Config;
use mnem::console::BufferConsole;
use mnem::script::{ErrorKind, Interpreter, ScriptError, Value, VarStore};
use tempfile::TempDir;

fn interp() -> Interpreter<BufferConsole> {
    Interpreter::with_console(BufferConsole::new(), Config::default())
}

fn run_src(src: &str) -> (Interpreter<BufferConsole>, Result<VarStore, ScriptError>) {
    let mut interp = interp();
    let result = interp.load_str(src, None).and_then(|s| interp.run(&s));
    (interp, result)
}

fn output(src: &str) -> Vec<String> {
    let (interp, result) = run_src(src);
    result.unwrap();
    interp.console.lines().into_iter().map(str::to_owned).collect()
}

/// Write each `(name, source)` into a fresh directory.
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, src) in files {
        fs::write(dir.path().join(name), src).unwrap();
    }
    dir
}

fn run_main(dir: &Path) -> (Interpreter<BufferConsole>, Result<VarStore, ScriptError>) {
    let mut interp = interp();
    let result = interp.run_file(&dir.join("main.txt"));
    (interp, result)
}

// ── Whole programs ────────────────────────────────────────────────────────────

#[test]
fn conditional_calls() {
    let src = [
        "fun fizz, r, n",
        "str r, 'Fizz'",
        "ret",
        "fun plain, r, n",
        "cpy r, n",
        "ret",
        "int i, 3",
        "rel three, i, %, 3, ==, 0",
        "rel other, not, three",
        "str w",
        "rif three, fizz, w, i",
        "rif other, plain, v, i",
        "out w, v",
    ]
    .join("\n");
    assert_eq!(output(&src), vec!["Fizz0"]);
}

#[test]
fn list_building_in_a_loop() {
    let src = [
        "ils acc, 1",
        "int seven, 7",
        "for 3, 4",
        "put next, acc, seven",
        "del acc",
        "cpy acc, next",
        "del next",
        "len size, acc",
        "out size",
        "out acc",
    ]
    .join("\n");
    assert_eq!(output(&src), vec!["4", "[1, 7, 7, 7]"]);
}

#[test]
fn semicolons_share_a_line() {
    assert_eq!(output("int a, 1; int b, 2; out a, b"), vec!["12"]);
}

#[test]
fn error_line_inside_function_body() {
    let src = "fun f, r\ncom\nerr boom\nret\nrun f, d";
    let (_, result) = run_src(src);
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::User);
    assert_eq!(err.to_string(), "User Error: boom || line 3");
}

#[test]
fn final_variables_are_returned() {
    let (_, result) = run_src("int a, 2\nstr s, 'x'\nboo b");
    let vars = result.unwrap();
    assert_eq!(vars.value("a"), Some(&Value::Int(2)));
    assert_eq!(vars.value("s"), Some(&Value::Str("x".into())));
    assert_eq!(vars.value("b"), None);
    assert_eq!(vars.len(), 3);
}

// ── Imports ───────────────────────────────────────────────────────────────────

const LIB: &str = "fun twice, r, x\nmul r, x, 2\nret\nfun one, r\nint r, 1\nret\n";

#[test]
fn import_named_function() {
    let dir = project(&[
        ("lib.txt", LIB),
        ("main.txt", "imp lib.txt, twice\nrun twice, d, 4\nout d"),
    ]);
    let (interp, result) = run_main(dir.path());
    result.unwrap();
    assert_eq!(interp.console.lines(), vec!["8.0"]);
}

#[test]
fn import_without_names_takes_everything() {
    let dir = project(&[
        ("lib.txt", LIB),
        ("main.txt", "imp lib.txt\nrun one, a\nrun twice, b, a\nout a, \"_\", b"),
    ]);
    let (interp, result) = run_main(dir.path());
    result.unwrap();
    assert_eq!(interp.console.lines(), vec!["1 2.0"]);
}

#[test]
fn import_only_named_functions() {
    let dir = project(&[
        ("lib.txt", LIB),
        ("main.txt", "imp lib.txt, one\nrun twice, d, 1"),
    ]);
    let (_, result) = run_main(dir.path());
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Type Error: not a recognized function 'twice' || line 2");
}

#[test]
fn import_as_renames() {
    let dir = project(&[
        ("lib.txt", LIB),
        ("main.txt", "ias lib.txt, twice, dbl\nrun dbl, d, 5\nout d"),
    ]);
    let (interp, result) = run_main(dir.path());
    result.unwrap();
    assert_eq!(interp.console.lines(), vec!["10.0"]);
}

#[test]
fn import_as_needs_pairs() {
    let dir = project(&[("lib.txt", LIB), ("main.txt", "ias lib.txt, twice")]);
    let (_, result) = run_main(dir.path());
    assert_eq!(result.unwrap_err().line, Some(1));
}

#[test]
fn import_collision() {
    let dir = project(&[
        ("lib.txt", LIB),
        ("main.txt", "fun twice, r\nint r, 0\nret\nimp lib.txt, twice"),
    ]);
    let (_, result) = run_main(dir.path());
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Import);
    assert_eq!(err.line, Some(4));
}

#[test]
fn import_missing_name() {
    let dir = project(&[("lib.txt", LIB), ("main.txt", "imp lib.txt, thrice")]);
    let (_, result) = run_main(dir.path());
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Import Error: function 'thrice' not declared in 'lib.txt' || line 1"
    );
}

#[test]
fn import_as_collision() {
    let dir = project(&[
        ("lib.txt", LIB),
        ("main.txt", "fun dbl, r\nint r, 0\nret\nias lib.txt, twice, dbl"),
    ]);
    let (_, result) = run_main(dir.path());
    assert_eq!(
        result.unwrap_err().to_string(),
        "Import Error: function 'dbl' already defined in this file || line 4"
    );
}

#[test]
fn import_as_missing_name() {
    let dir = project(&[("lib.txt", LIB), ("main.txt", "ias lib.txt, thrice, t")]);
    let (_, result) = run_main(dir.path());
    assert_eq!(
        result.unwrap_err().to_string(),
        "Import Error: function 'thrice' not declared in 'lib.txt' || line 1"
    );
}

#[test]
fn import_file_name_from_variable() {
    let dir = project(&[
        ("lib.txt", LIB),
        ("main.txt", "str f, 'lib.txt'\nimp f, one\nrun one, d\nout d"),
    ]);
    let (interp, result) = run_main(dir.path());
    result.unwrap();
    assert_eq!(interp.console.lines(), vec!["1"]);
}

#[test]
fn callee_imports_do_not_leak_to_caller() {
    let dir = project(&[
        ("lib.txt", LIB),
        (
            "main.txt",
            "fun setup, r\nimp lib.txt, one\nrun one, r\nret\nrun setup, a\nout a\nrun one, b",
        ),
    ]);
    let (interp, result) = run_main(dir.path());
    let err = result.unwrap_err();
    assert_eq!(interp.console.lines(), vec!["1"]);
    assert_eq!(err.to_string(), "Type Error: not a recognized function 'one' || line 7");
}

#[test]
fn imported_function_imports_relative_to_its_file() {
    let dir = project(&[("main.txt", "imp sub/outer.txt\nrun outer, d\nout d")]);
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/inner.txt"), "fun inner, r\nint r, 9\nret").unwrap();
    fs::write(
        dir.path().join("sub/outer.txt"),
        "fun outer, r\nimp inner.txt\nrun inner, r\nret",
    )
    .unwrap();
    let (interp, result) = run_main(dir.path());
    result.unwrap();
    assert_eq!(interp.console.lines(), vec!["9"]);
}

#[test]
fn import_from_library_dir() {
    let lib = project(&[("shared.txt", LIB)]);
    let dir = project(&[("main.txt", "imp shared.txt, one\nrun one, d\nout d")]);
    let config = Config {
        lib_dirs: vec![lib.path().to_path_buf()],
        ..Config::default()
    };
    let mut interp = Interpreter::with_console(BufferConsole::new(), config);
    interp.run_file(&dir.path().join("main.txt")).unwrap();
    assert_eq!(interp.console.lines(), vec!["1"]);
}

#[test]
fn imported_file_top_level_is_not_run() {
    let dir = project(&[
        ("lib.txt", "out \"side effect\"\nfun one, r\nint r, 1\nret"),
        ("main.txt", "imp lib.txt\nout \"done\""),
    ]);
    let (interp, result) = run_main(dir.path());
    result.unwrap();
    assert_eq!(interp.console.lines(), vec!["done"]);
}

#[test]
fn missing_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let (_, result) = run_main(dir.path());
    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::File);
    assert_eq!(err.line, None);
}
