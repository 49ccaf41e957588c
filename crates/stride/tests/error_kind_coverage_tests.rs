//! Error kind coverage: every `ErrorKind` is produced by at least one program
//! run through the public pipeline, with the category and params hosts rely
//! on.

use stride::{
    interpret, Arity, Context, ErrorCategory, ErrorKind, ExternalFunction, InterpretConfig,
    StructuredError, Value,
};

fn context() -> Context {
    Context::new(InterpretConfig::default().with_max_steps(500)).with_function(
        ExternalFunction::new("fail", Arity::Exact(0), |_| {
            Err("host unavailable".to_string())
        }),
    )
}

fn error_of(source: &str) -> StructuredError {
    interpret(source, &context())
        .error
        .unwrap_or_else(|| panic!("expected an error from {source:?}"))
}

/// One program per kind.
const CASES: &[(ErrorKind, &str)] = &[
    (ErrorKind::UnknownCharacter, "log 1 $ 2"),
    (ErrorKind::UnterminatedString, "log \"never closed"),
    (ErrorKind::MalformedNumber, "set x to 3.14.15"),
    (ErrorKind::UnexpectedToken, "set 5 to x"),
    (ErrorKind::UnexpectedEndOfFile, "repeat 2 times do\n  log 1\n"),
    (
        ErrorKind::NestingTooDeep,
        "log ((((((((((((((((((((((((((((((((((((((((((((((((((((((((((((((((((((1))))))))))))))))))))))))))))))))))))))))))))))))))))))))))))))))))))",
    ),
    (ErrorKind::VariableNotDeclared, "log ghost"),
    (ErrorKind::FunctionNotDeclared, "ghost()"),
    (ErrorKind::TypeMismatch, "log \"a\" * 2"),
    (ErrorKind::DivisionByZero, "log 1 / 0"),
    (ErrorKind::WrongNumberOfArguments, "fail(1)"),
    (ErrorKind::ReturnOutsideFunction, "return 1"),
    (ErrorKind::LoopBudgetExceeded, "repeat forever do\nend"),
    (
        ErrorKind::RecursionLimitExceeded,
        "function loop_back do\n  loop_back()\nend\nloop_back()",
    ),
    (ErrorKind::ExternalFunctionFailed, "fail()"),
];

#[test]
fn every_kind_is_covered() {
    for kind in ErrorKind::ALL {
        assert!(
            CASES.iter().any(|(k, _)| k == kind),
            "no coverage case for {kind}"
        );
    }
}

#[test]
fn every_case_produces_its_kind() {
    for (kind, source) in CASES {
        let err = error_of(source);
        assert_eq!(err.kind, *kind, "source: {source:?}, message: {}", err.message);
        assert_eq!(err.category, kind.category());
        assert!(!err.message.is_empty());
        assert!(err.line() >= 1);
    }
}

#[test]
fn syntax_kinds_have_no_timeline() {
    for (kind, source) in CASES {
        let result = interpret(source, &context());
        match kind.category() {
            ErrorCategory::Syntax => assert!(result.timeline.is_none(), "{source:?}"),
            ErrorCategory::Runtime => {
                let timeline = result.timeline.expect("runtime faults keep their timeline");
                assert_eq!(timeline.error(), result.error.as_ref(), "{source:?}");
            }
        }
    }
}

#[test]
fn params_carry_context() {
    let err = error_of("log ghost");
    assert_eq!(err.param("name"), Some("ghost"));

    let err = error_of("log \"a\" * 2");
    assert_eq!(err.param("operation"), Some("*"));
    assert_eq!(err.param("expected"), Some("a number"));
    assert_eq!(err.param("found"), Some("string"));

    let err = error_of("fail(1)");
    assert_eq!(err.param("name"), Some("fail"));
    assert_eq!(err.param("expected"), Some("0"));
    assert_eq!(err.param("received"), Some("1"));

    let err = error_of("fail()");
    assert_eq!(err.param("message"), Some("host unavailable"));

    let err = error_of("repeat forever do\nend");
    assert_eq!(err.param("max_steps"), Some("500"));

    let err = error_of("function loop_back do\n  loop_back()\nend\nloop_back()");
    assert_eq!(err.param("max_depth"), Some("64"));
}

#[test]
fn every_kind_renders_in_every_locale() {
    for locale in ["en", "nl", "system"] {
        let context = Context::new(
            InterpretConfig::default()
                .with_locale(locale)
                .with_max_steps(500),
        )
        .with_function(ExternalFunction::new("fail", Arity::Exact(0), |_| {
            Ok(Value::Null)
        }));
        for (kind, source) in CASES {
            if *kind == ErrorKind::ExternalFunctionFailed {
                continue;
            }
            let err = interpret(source, &context).error.unwrap();
            assert!(
                !err.message.contains('{'),
                "unfilled placeholder in {locale} message for {kind}: {}",
                err.message
            );
        }
    }
}
