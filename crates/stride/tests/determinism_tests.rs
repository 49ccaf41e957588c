//! Determinism harness.
//!
//! The same source with the same context must give byte-identical results:
//! same frames, same logs, same errors, same serialized JSON. Also checks that
//! printing a parsed program and parsing it again gives the same result.

use stride::{interpret, parse, Context, InterpretConfig, Stmt};
use stride_types::printer::print_program;

const PROGRAMS: &[&str] = &[
    "set total to 0\nfor each n in [3, 1, 4, 1, 5] do\n  set total to total + n\nend\nlog total",
    "function fib with n do\n  if n < 2 do\n    return n\n  end\n  return fib(n - 1) + fib(n - 2)\nend\nlog fib(12)",
    "set word to \"stride\"\nset count to 0\nfor each ch in word do\n  if ch == \"s\" or ch == \"e\" do\n    set count to count + 1\n  end\nend\nlog count",
    "repeat forever do\n  log 1\nend",
    "set x to [1, [2, 3], \"four\", true, null]\nlog x\nlog x == [1, [2, 3], \"four\", true, null]",
    "log 1\nlog 2 / 0",
];

const N: usize = 100;

fn stripped(program: &[Stmt]) -> Vec<Stmt> {
    program.iter().map(Stmt::strip_spans).collect()
}

fn context() -> Context {
    Context::new(InterpretConfig::default().with_max_steps(200))
}

#[test]
fn interpret_is_deterministic() {
    for source in PROGRAMS {
        let first = serde_json::to_string(&interpret(source, &context())).unwrap();
        for i in 0..N {
            let again = serde_json::to_string(&interpret(source, &context())).unwrap();
            assert_eq!(first, again, "non-deterministic run {i} of {source:?}");
        }
    }
}

#[test]
fn printed_programs_reparse_to_same_tree() {
    for source in PROGRAMS {
        let program = parse(source).unwrap();
        let printed = print_program(&program);
        let reparsed = parse(&printed)
            .unwrap_or_else(|e| panic!("printed program failed to parse: {e}\n{printed}"));
        assert_eq!(stripped(&program), stripped(&reparsed), "{printed}");
    }
}

#[test]
fn printed_programs_run_the_same() {
    for source in PROGRAMS {
        let printed = print_program(&parse(source).unwrap());
        let original = interpret(source, &context());
        let reprinted = interpret(&printed, &context());
        assert_eq!(original.status, reprinted.status);
        assert_eq!(original.logs, reprinted.logs);
        let frames = |r: &stride::InterpretResult| {
            r.timeline
                .as_ref()
                .map(|t| t.frames().iter().map(|f| f.variables.clone()).collect::<Vec<_>>())
        };
        assert_eq!(frames(&original), frames(&reprinted));
    }
}
