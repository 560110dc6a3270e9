//! Control-flow engine, function calls and imports.
//!
//! The [`Interpreter`] walks a [`Frame`]'s instructions with an instruction
//! pointer.  `for` is run here directly: each iteration re-enters
//! [`run_line`](Interpreter::run_line) for the body lines, so nested loops
//! advance the pointer themselves.  Every other mnemonic goes through the
//! command table.  A function call builds a fresh frame with its own
//! variable store and a shared handle to the caller's function table.

use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::Config;
use crate::console::{Console, StdConsole};

use super::dispatch::{self, Command};
use super::error::{ErrorKind, Failure, Result, ScriptError};
use super::expr;
use super::func::FunctionTable;
use super::source::{Instruction, Script};
use super::store::{Slot, VarStore};
use super::value::{Kind, Value};

// ── Frame ─────────────────────────────────────────────────────────────────────

/// One execution context: the top-level program or a function body.
struct Frame {
    code: Rc<[Instruction]>,
    vars: VarStore,
    /// Copied on first import so callers never see a callee's imports.
    functions: Rc<FunctionTable>,
    /// Directory relative imports are resolved against.
    dir: Option<PathBuf>,
    /// Calls and loops enclosing this frame.
    depth: usize,
    /// `for` loops currently running in this frame.
    loops: usize,
}

impl Frame {
    /// Nesting of the instruction being run; bounded by `max_depth`.
    fn nesting(&self) -> usize {
        self.depth + self.loops
    }
}

fn io_failure(err: io::Error) -> Failure {
    Failure::Generic(err.to_string())
}

// ── Interpreter ───────────────────────────────────────────────────────────────

pub struct Interpreter<C: Console = StdConsole> {
    /// Where `out` writes and `inp` reads.
    pub console: C,
    config: Config,
}

impl Interpreter<StdConsole> {
    /// Interpreter on the process stdin/stdout.
    pub fn new(config: Config) -> Self {
        let console = StdConsole::new(config.prompt);
        Interpreter { console, config }
    }
}

impl<C: Console> Interpreter<C> {
    pub fn with_console(console: C, config: Config) -> Self {
        Interpreter { console, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load a file without running it.
    pub fn load(&self, path: &Path) -> Result<Script> {
        Script::load(path)
    }

    /// Load source text; `origin` anchors relative imports.
    pub fn load_str(&self, src: &str, origin: Option<&Path>) -> Result<Script> {
        Script::parse(src, origin)
    }

    /// Run a script's top-level program and return its final variables.
    pub fn run(&mut self, script: &Script) -> Result<VarStore> {
        let mut frame = Frame {
            code: script.program_rc(),
            vars: VarStore::new(),
            functions: script.functions_rc(),
            dir: script.dir().map(Path::to_path_buf),
            depth: 0,
            loops: 0,
        };
        self.exec_frame(&mut frame)?;
        Ok(frame.vars)
    }

    pub fn run_file(&mut self, path: &Path) -> Result<VarStore> {
        let script = self.load(path)?;
        self.run(&script)
    }

    // ── Execution ─────────────────────────────────────────────────────────────

    fn exec_frame(&mut self, frame: &mut Frame) -> Result<()> {
        let mut ip = 0;
        while ip < frame.code.len() {
            ip = self.run_line(frame, ip)?;
        }
        Ok(())
    }

    /// Execute the instruction at `ip`; returns the next pointer.
    fn run_line(&mut self, frame: &mut Frame, ip: usize) -> Result<usize> {
        let code = Rc::clone(&frame.code);
        let inst = &code[ip];
        trace!(line = inst.line, depth = frame.nesting(), "{inst}");

        let Some(cmd) = Command::lookup(&inst.mnemonic) else {
            return Err(ScriptError::new(
                ErrorKind::Type,
                format!("not a recognized command '{}'", inst.mnemonic),
            )
            .with_line(inst.line));
        };
        if !cmd.accepts(inst.params.len()) {
            return Err(Failure::Arity.diagnose(inst));
        }
        self.exec_command(frame, cmd, ip, inst)
            .map_err(|failure| failure.diagnose(inst))
    }

    fn exec_command(
        &mut self,
        frame: &mut Frame,
        cmd: Command,
        ip: usize,
        inst: &Instruction,
    ) -> std::result::Result<usize, Failure> {
        let params = inst.params.as_slice();
        let outcome = match cmd {
            Command::For => return self.run_loop(frame, ip, params),

            // ── Console ───────────────────────────────────────────────────────
            Command::Out => self.out(frame, params),
            Command::Input => self.input(frame, params),

            // ── Functions ─────────────────────────────────────────────────────
            Command::Run => self.call(frame, params),
            Command::RunIf => self.run_if(frame, params),
            Command::Import => self.import(frame, params, false),
            Command::ImportAs => self.import(frame, params, true),

            // ── Variable store ────────────────────────────────────────────────
            Command::Seconds => dispatch::seconds(&mut frame.vars, params),
            Command::Arith(op) => dispatch::arithmetic(&mut frame.vars, op, params),
            Command::Declare(kind) => dispatch::declare(&mut frame.vars, kind, params),
            Command::Pop => dispatch::pop(&mut frame.vars, params),
            Command::Put => dispatch::put(&mut frame.vars, params),
            Command::Index => dispatch::index(&mut frame.vars, params),
            Command::Length => dispatch::length(&mut frame.vars, params),
            Command::Copy => dispatch::copy(&mut frame.vars, params),
            Command::Delete => dispatch::delete(&mut frame.vars, params),
            Command::Unassigned => dispatch::unassigned(&mut frame.vars, params),
            Command::Relation => dispatch::relation(&mut frame.vars, params),

            Command::Raise => Err(Failure::User),
            Command::Comment => Ok(()),
        };
        outcome.map(|()| ip + 1)
    }

    /// `for iterations, lineCount`
    fn run_loop(
        &mut self,
        frame: &mut Frame,
        ip: usize,
        params: &[String],
    ) -> std::result::Result<usize, Failure> {
        let [iterations, span] = params else {
            return Err(Failure::Arity);
        };
        let iterations = frame.vars.integer(iterations)?;
        let span = usize::try_from(frame.vars.integer(span)?).map_err(|_| Failure::BadType)?;
        let end = ip + 1 + span;
        if span == 0 {
            return Ok(end);
        }
        if frame.nesting() >= self.config.max_depth {
            return Err(Failure::fault(ErrorKind::Loop, "maximum loop nesting exceeded"));
        }

        frame.loops += 1;
        for _ in 0..iterations.max(0) {
            let mut line = ip + 1;
            while line < end {
                if line >= frame.code.len() {
                    return Err(Failure::fault(ErrorKind::Loop, "EOF reached while iterating"));
                }
                line = self.run_line(frame, line)?;
            }
        }
        frame.loops -= 1;
        Ok(end)
    }

    // ── Console commands ──────────────────────────────────────────────────────

    /// `out tokens…`
    fn out(&mut self, frame: &Frame, params: &[String]) -> std::result::Result<(), Failure> {
        let mut text = String::new();
        for token in params {
            match frame.vars.lookup(token)? {
                Some(v) => text.push_str(&v.to_string()),
                None if token == r"\n" => text.push('\n'),
                None => text.push_str(&expr::eval_str(token)?.to_string()),
            }
        }
        let text = text.replace(r"\n", "\n");
        self.console.print(&format!("{text}\n")).map_err(io_failure)
    }

    /// `inp dest`
    fn input(&mut self, frame: &mut Frame, params: &[String]) -> std::result::Result<(), Failure> {
        let [dest] = params else {
            return Err(Failure::Arity);
        };
        let label = match frame.vars.slot(dest) {
            Slot::Unset(kind) => format!("{kind} {dest}"),
            _ => dest.clone(),
        };
        let line = self
            .console
            .read_line(&format!("Enter value for variable '{label}': "))
            .map_err(io_failure)?
            .ok_or_else(|| Failure::Generic("end of input".into()))?;
        frame.vars.declare_or_set(dest, Value::Str(line))
    }

    // ── Function calls ────────────────────────────────────────────────────────

    /// `run name, dest, args…`
    fn call(&mut self, frame: &mut Frame, params: &[String]) -> std::result::Result<(), Failure> {
        let [name, dest, args @ ..] = params else {
            return Err(Failure::Arity);
        };
        let name = frame.vars.value_or_text(name)?.to_string();
        let def = frame.functions.get(&name).cloned().ok_or_else(|| {
            Failure::fault(ErrorKind::Type, format!("not a recognized function '{name}'"))
        })?;
        if def.params.len() != args.len() {
            return Err(Failure::fault(
                ErrorKind::Variable,
                format!("incorrect number of parameters passed to function '{name}'"),
            ));
        }
        if frame.nesting() >= self.config.max_depth {
            return Err(Failure::fault(ErrorKind::Generic, "maximum call depth exceeded"));
        }

        let mut vars = VarStore::new();
        for (param, arg) in def.params.iter().zip(args) {
            vars.declare_or_set(param, frame.vars.value_or_text(arg)?)?;
        }
        debug!(function = %name, depth = frame.nesting() + 1, "call");

        let mut callee = Frame {
            code: Rc::clone(&def.body),
            vars,
            functions: Rc::clone(&frame.functions),
            dir: def.origin.clone(),
            depth: frame.nesting() + 1,
            loops: 0,
        };
        self.exec_frame(&mut callee)?;

        let Some(result) = callee.vars.value(&def.ret).cloned() else {
            return Err(Failure::fault(
                ErrorKind::Variable,
                format!(
                    "function '{name}' did not assign its return variable '{}'",
                    def.ret
                ),
            ));
        };
        frame.vars.declare_or_set(dest, result)
    }

    /// `rif cond, name, dest, args…`
    fn run_if(&mut self, frame: &mut Frame, params: &[String]) -> std::result::Result<(), Failure> {
        let [cond, _, dest, ..] = params else {
            return Err(Failure::Arity);
        };
        let truth = match frame.vars.lookup(cond)? {
            Some(v) => v.truthy(),
            None => match expr::eval_str(cond)? {
                Value::Bool(b) => b,
                _ => return Err(Failure::BadType),
            },
        };
        if truth {
            return self.call(frame, &params[1..]);
        }

        let fallback = match frame.vars.slot(dest) {
            Slot::Unset(Kind::Str) => Value::Str(String::new()),
            Slot::Unset(kind) if kind.is_list() => Value::VarList(Vec::new()),
            _ => Value::Int(0),
        };
        frame.vars.declare_or_set(dest, fallback)
    }

    // ── Imports ───────────────────────────────────────────────────────────────

    /// `imp file[, names…]` and `ias file, src, alias, …`
    fn import(
        &mut self,
        frame: &mut Frame,
        params: &[String],
        renamed: bool,
    ) -> std::result::Result<(), Failure> {
        let [file, names @ ..] = params else {
            return Err(Failure::Arity);
        };
        let file = frame.vars.value_or_text(file)?.to_string();
        let path = self
            .config
            .locate(&file, frame.dir.as_deref())
            .ok_or_else(|| {
                Failure::fault(ErrorKind::File, format!("unable to read file: '{file}'"))
            })?;
        let source = Script::load(&path)?;

        let resolve = |token: &String| frame.vars.value_or_text(token).map(|v| v.to_string());
        let pairs: Vec<(String, String)> = if renamed {
            names
                .chunks(2)
                .map(|pair| match pair {
                    [name, alias] => Ok((resolve(name)?, resolve(alias)?)),
                    _ => Err(Failure::Arity),
                })
                .collect::<std::result::Result<_, _>>()?
        } else if names.is_empty() {
            source
                .functions()
                .names()
                .into_iter()
                .map(|n| (n.to_owned(), n.to_owned()))
                .collect()
        } else {
            names
                .iter()
                .map(|n| resolve(n).map(|n| (n.clone(), n)))
                .collect::<std::result::Result<_, _>>()?
        };
        debug!(file = %path.display(), functions = pairs.len(), "import");

        let table = Rc::make_mut(&mut frame.functions);
        for (name, alias) in pairs {
            if table.contains(&alias) {
                return Err(Failure::fault(
                    ErrorKind::Import,
                    format!("function '{alias}' already defined in this file"),
                ));
            }
            let def = source.functions().get(&name).ok_or_else(|| {
                Failure::fault(
                    ErrorKind::Import,
                    format!("function '{name}' not declared in '{file}'"),
                )
            })?;
            table.insert(alias, Rc::clone(def));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::BufferConsole;

    fn interp_with(console: BufferConsole, config: Config) -> Interpreter<BufferConsole> {
        Interpreter::with_console(console, config)
    }

    fn exec(src: &str) -> (Interpreter<BufferConsole>, Result<VarStore>) {
        let mut interp = interp_with(BufferConsole::new(), Config::default());
        let result = interp.load_str(src, None).and_then(|s| interp.run(&s));
        (interp, result)
    }

    fn run(src: &str) -> (Vec<String>, VarStore) {
        let (interp, result) = exec(src);
        let vars = result.unwrap_or_else(|e| panic!("{e}"));
        let lines = interp.console.lines().into_iter().map(str::to_owned).collect();
        (lines, vars)
    }

    fn output(src: &str) -> Vec<String> {
        run(src).0
    }

    fn fails(src: &str) -> ScriptError {
        exec(src).1.expect_err("program should fail")
    }

    #[test]
    fn hello_world() {
        assert_eq!(output("out \"Hello_world\""), vec!["Hello world"]);
    }

    #[test]
    fn add_binds_double() {
        let (lines, vars) = run("add d, 2, 3\nout d");
        assert_eq!(vars.value("d"), Some(&Value::Double(5.0)));
        assert_eq!(lines, vec!["5.0"]);
    }

    #[test]
    fn add_into_declared_str() {
        let (_, vars) = run("str d; add d, 2, 3");
        assert_eq!(vars.value("d"), Some(&Value::Str("23".into())));
    }

    #[test]
    fn reassignment_fails_with_line() {
        let err = fails("int x, 1\nint x, 2");
        assert_eq!(
            err.to_string(),
            "Variable Error: variable 'x' has already been declared || line 2"
        );
    }

    #[test]
    fn delete_allows_rebinding() {
        let (_, vars) = run("int x, 1\ndel x\nint x, 2");
        assert_eq!(vars.value("x"), Some(&Value::Int(2)));
    }

    #[test]
    fn unknown_command() {
        let err = fails("com\nxyz 1");
        assert_eq!(err.to_string(), "Type Error: not a recognized command 'xyz' || line 2");
    }

    #[test]
    fn wrong_arity() {
        let err = fails("len x");
        assert_eq!(
            err.to_string(),
            "Type Error: incorrect parameter type or number of parameters for command 'len' || line 1"
        );
    }

    #[test]
    fn user_error() {
        let err = fails("err something_broke, badly");
        assert_eq!(err.to_string(), "User Error: something broke,badly || line 1");
    }

    #[test]
    fn reading_unassigned_variable() {
        let err = fails("int x\nout x");
        assert_eq!(
            err.to_string(),
            "Variable Error: variable 'x' has been declared but not assigned || line 2"
        );
    }

    #[test]
    fn out_joins_tokens_and_newlines() {
        assert_eq!(output(r#"out "a", \n, "b""#), vec!["a", "b"]);
        assert_eq!(output(r#"out "x\ny""#), vec!["x", "y"]);
        assert_eq!(output("int n, 4\nout \"n=\", n"), vec!["n=4"]);
        assert_eq!(output("out"), vec![""]);
    }

    #[test]
    fn out_of_undeclared_name() {
        assert_eq!(fails("out nothing").kind, ErrorKind::Variable);
    }

    // ── Loops ────────────────────────────────────────────────────────────────

    #[test]
    fn simple_loop() {
        assert_eq!(output("for 3, 1\nout \"x\"\nout \"done\""), vec!["x", "x", "x", "done"]);
    }

    #[test]
    fn nested_loops_advance_pointer() {
        let src = "for 3, 4\nfor 2, 1\nout \"in\"\nout \"mid\"\ncom\nout \"done\"";
        let lines = output(src);
        assert_eq!(lines.iter().filter(|l| *l == "in").count(), 6);
        assert_eq!(lines.iter().filter(|l| *l == "mid").count(), 3);
        assert_eq!(lines.last().map(String::as_str), Some("done"));
    }

    #[test]
    fn loop_count_from_variable() {
        assert_eq!(output("int n, 2\nfor n, 1\nout 1").len(), 2);
    }

    #[test]
    fn loop_past_end() {
        let err = fails("com\nfor 2, 3\nout 1");
        assert_eq!(err.to_string(), "Loop Error: EOF reached while iterating || line 2");
    }

    #[test]
    fn zero_and_negative_iterations() {
        assert_eq!(output("for 0, 1\nout 1\nout 2"), vec!["2"]);
        assert_eq!(output("for -3, 1\nout 1\nout 2"), vec!["2"]);
    }

    #[test]
    fn negative_span() {
        assert_eq!(fails("for 1, -1").kind, ErrorKind::Type);
    }

    #[test]
    fn loop_nesting_is_bounded() {
        let mut interp = interp_with(
            BufferConsole::new(),
            Config {
                max_depth: 8,
                ..Config::default()
            },
        );
        let loops = 20;
        let mut src: Vec<String> = (0..loops).map(|i| format!("for 1, {}", loops - i)).collect();
        src.push("com".into());
        let script = interp.load_str(&src.join("\n"), None).unwrap();
        let err = interp.run(&script).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Loop Error: maximum loop nesting exceeded || line 9"
        );
    }

    #[test]
    fn deep_loop_chain_is_a_diagnostic() {
        let loops = 20_000;
        let mut src: Vec<String> = (0..loops).map(|i| format!("for 1, {}", loops - i)).collect();
        src.push("com".into());
        assert_eq!(fails(&src.join("\n")).kind, ErrorKind::Loop);
    }

    #[test]
    fn sequential_loops_do_not_accumulate_nesting() {
        let mut interp = interp_with(
            BufferConsole::new(),
            Config {
                max_depth: 2,
                ..Config::default()
            },
        );
        let src = "for 1, 1\ncom\n".repeat(10) + "out \"ok\"";
        let script = interp.load_str(&src, None).unwrap();
        interp.run(&script).unwrap();
        assert_eq!(interp.console.lines(), vec!["ok"]);
    }

    #[test]
    fn loops_count_toward_call_depth() {
        let mut interp = interp_with(
            BufferConsole::new(),
            Config {
                max_depth: 3,
                ..Config::default()
            },
        );
        let src = "fun f, r\nint r, 1\nret\nfor 1, 2\nfor 1, 1\nrun f, d\nrun f, e";
        let script = interp.load_str(src, None).unwrap();
        let vars = interp.run(&script).unwrap();
        assert_eq!(vars.value("e"), Some(&Value::Int(1)));

        let src = "fun f, r\nint r, 1\nret\nfor 1, 3\nfor 1, 2\nfor 1, 1\nrun f, d";
        let script = interp.load_str(src, None).unwrap();
        let err = interp.run(&script).unwrap_err();
        assert_eq!(err.description, "maximum call depth exceeded");
        assert_eq!(err.line, Some(7));
    }

    // ── Expression failures ─────────────────────────────────────────────────

    #[test]
    fn huge_repetition_is_an_error() {
        let err = fails("rel d, 'ab', *, 9223372036854775807");
        assert_eq!(err.kind, ErrorKind::Generic);
        assert!(err.description.starts_with("integer overflow"));
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn deeply_nested_relation_is_an_error() {
        let src = format!("rel d, {}1{}", "(".repeat(200_000), ")".repeat(200_000));
        let err = fails(&src);
        assert_eq!(err.kind, ErrorKind::Generic);
        assert!(err.description.contains("too deeply nested"));
    }

    #[test]
    fn numeric_result_into_unset_text_is_a_type_error() {
        let err = fails("str d; sub d, 5, 2");
        assert_eq!(err.kind, ErrorKind::Type);
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn loop_body_single_assignment() {
        let err = fails("for 2, 1\nint x, 1");
        assert_eq!(err.line, Some(2));
        assert_eq!(err.kind, ErrorKind::Variable);
    }

    // ── Functions ────────────────────────────────────────────────────────────

    #[test]
    fn call_returns_value() {
        let (_, vars) = run("run double, d, 21\nfun double, r, x\nmul r, x, 2\nret");
        assert_eq!(vars.value("d"), Some(&Value::Double(42.0)));
    }

    #[test]
    fn literal_arguments_arrive_as_text() {
        let (_, vars) = run("fun id, r, x\ncpy r, x\nret\nrun id, d, 7");
        assert_eq!(vars.value("d"), Some(&Value::Str("7".into())));
    }

    #[test]
    fn variable_arguments_pass_values() {
        let (_, vars) = run("fun id, r, x\ncpy r, x\nret\nils l, 1, 2\nrun id, d, l");
        assert_eq!(vars.value("d"), Some(&Value::IntList(vec![1, 2])));
    }

    #[test]
    fn return_casts_into_declared_destination() {
        let (_, vars) = run("fun two, r\nadd r, 1, 1\nret\nint d\nrun two, d");
        assert_eq!(vars.value("d"), Some(&Value::Int(2)));
    }

    #[test]
    fn callee_cannot_see_caller() {
        let err = fails("fun f, r\nout x\nint r, 1\nret\nint x, 1\nrun f, d");
        assert_eq!(err.kind, ErrorKind::Variable);
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn callee_locals_discarded() {
        let (_, vars) = run("fun f, r\nint tmp, 5\ncpy r, tmp\nret\nrun f, d");
        assert!(vars.value("tmp").is_none());
        assert_eq!(vars.value("d"), Some(&Value::Int(5)));
    }

    #[test]
    fn unknown_function() {
        let err = fails("run nope, d");
        assert_eq!(err.to_string(), "Type Error: not a recognized function 'nope' || line 1");
    }

    #[test]
    fn function_name_from_variable() {
        let (_, vars) = run("fun one, r\nint r, 1\nret\nstr f, 'one'\nrun f, d");
        assert_eq!(vars.value("d"), Some(&Value::Int(1)));
    }

    #[test]
    fn parameter_count_mismatch() {
        let err = fails("fun f, r, a\nint r, 1\nret\nrun f, d");
        assert_eq!(
            err.to_string(),
            "Variable Error: incorrect number of parameters passed to function 'f' || line 4"
        );
    }

    #[test]
    fn missing_return_value() {
        let err = fails("fun f, r\ncom\nret\nrun f, d");
        assert_eq!(err.kind, ErrorKind::Variable);
        assert!(err.description.contains("'r'"));
    }

    #[test]
    fn runaway_recursion_is_bounded() {
        let mut interp = interp_with(
            BufferConsole::new(),
            Config {
                max_depth: 8,
                ..Config::default()
            },
        );
        let script = interp.load_str("fun f, r\nrun f, r\nret\nrun f, d", None).unwrap();
        let err = interp.run(&script).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Generic);
        assert_eq!(err.description, "maximum call depth exceeded");
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn recursive_factorial() {
        let src = [
            "fun one, r, x",
            "int r, 1",
            "ret",
            "fun fact, r, n",
            "int k",
            "cpy k, n",
            "rel small, k, <=, 1",
            "rel big, not, small",
            "rif small, one, a, k",
            "sub m, k, 1",
            "rif big, fact, b, m",
            "mul c, k, b",
            "add r, a, c",
            "ret",
            "run fact, res, 5",
            "out res",
        ]
        .join("\n");
        assert_eq!(output(&src), vec!["120.0"]);
    }

    #[test]
    fn run_if_true_calls() {
        let (_, vars) = run("fun one, r\nint r, 1\nret\nrif True, one, d");
        assert_eq!(vars.value("d"), Some(&Value::Int(1)));
    }

    #[test]
    fn run_if_false_defaults() {
        let src = "fun f, r\nint r, 1\nret\n\
                   boo no, False\n\
                   rif no, f, a\n\
                   str s\nrif no, f, s\n\
                   ils l\nrif no, f, l\n\
                   dbl x\nrif no, f, x";
        let (_, vars) = run(src);
        assert_eq!(vars.value("a"), Some(&Value::Int(0)));
        assert_eq!(vars.value("s"), Some(&Value::Str(String::new())));
        assert_eq!(vars.value("l"), Some(&Value::IntList(vec![])));
        assert_eq!(vars.value("x"), Some(&Value::Double(0.0)));
    }

    #[test]
    fn run_if_literal_must_be_bool() {
        assert_eq!(fails("fun f, r\nint r, 1\nret\nrif 1, f, d").kind, ErrorKind::Type);
    }

    // ── Input ────────────────────────────────────────────────────────────────

    #[test]
    fn input_prompts_and_stores_text() {
        let mut interp = interp_with(BufferConsole::with_input(["42", "hi"]), Config::default());
        let script = interp.load_str("int n\ninp n\ninp s", None).unwrap();
        let vars = interp.run(&script).unwrap();
        assert_eq!(vars.value("n"), Some(&Value::Int(42)));
        assert_eq!(vars.value("s"), Some(&Value::Str("hi".into())));
        assert_eq!(
            interp.console.prompts,
            vec![
                "Enter value for variable 'int n': ",
                "Enter value for variable 's': "
            ]
        );
    }

    #[test]
    fn input_cast_failure() {
        let mut interp = interp_with(BufferConsole::with_input(["abc"]), Config::default());
        let script = interp.load_str("int n\ninp n", None).unwrap();
        assert_eq!(interp.run(&script).unwrap_err().kind, ErrorKind::Type);
    }

    #[test]
    fn input_at_eof() {
        let err = fails("inp s");
        assert_eq!(err.kind, ErrorKind::Generic);
    }

    // ── Imports ──────────────────────────────────────────────────────────────

    #[test]
    fn import_missing_file() {
        let err = fails("imp /no/such/lib.txt");
        assert_eq!(err.to_string(), "File Error: unable to read file: '/no/such/lib.txt' || line 1");
    }
}
