//! `stride` command-line runner.
//!
//! ```text
//! stride run program.stride [--locale nl] [--max-steps 500] [--config run.json] [--pretty]
//! stride check program.stride [--locale nl]
//! stride reference
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stride::{Arity, Context, ExternalFunction, InterpretConfig, Value};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] stride::Error),
    #[error("could not write result: {0}")]
    Output(#[from] serde_json::Error),
}

fn cli() -> Command {
    let locale = Arg::new("locale")
        .short('l')
        .long("locale")
        .value_name("CODE")
        .help("Language for error messages: en, nl or system");
    Command::new("stride")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run Stride programs and print their timeline")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run a program and print the result as JSON")
                .arg(Arg::new("file").required(true).value_parser(value_parser!(PathBuf)))
                .arg(locale.clone())
                .arg(
                    Arg::new("max-steps")
                        .long("max-steps")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Steps allowed before the run is stopped"),
                )
                .arg(
                    Arg::new("max-call-depth")
                        .long("max-call-depth")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Nested function calls allowed, at most 512"),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON config file; flags override its fields"),
                )
                .arg(
                    Arg::new("pretty")
                        .short('p')
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-print the JSON result"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report the first syntax error, if any")
                .arg(Arg::new("file").required(true).value_parser(value_parser!(PathBuf)))
                .arg(locale),
        )
        .subcommand(Command::new("reference").about("Print the language reference"))
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Config file first, then flags on top.
fn load_config(matches: &ArgMatches) -> Result<InterpretConfig, CliError> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => InterpretConfig::from_json(&read(path)?)?,
        None => InterpretConfig::default(),
    };
    if let Some(locale) = matches.get_one::<String>("locale") {
        config = config.with_locale(locale.as_str());
    }
    if let Some(&max_steps) = matches.get_one::<usize>("max-steps") {
        config = config.with_max_steps(max_steps);
    }
    if let Some(&depth) = matches.get_one::<usize>("max-call-depth") {
        config = config.with_max_call_depth(depth);
    }
    config.validate()?;
    Ok(config)
}

/// Demo host function: prints its arguments to stderr, space separated.
fn echo() -> ExternalFunction {
    ExternalFunction::new("echo", Arity::Variadic, |args| {
        let line: Vec<String> = args.iter().map(Value::to_string).collect();
        eprintln!("{}", line.join(" "));
        Ok(Value::Null)
    })
    .with_description("Prints its arguments")
}

fn run(matches: &ArgMatches) -> Result<bool, CliError> {
    let Some(path) = matches.get_one::<PathBuf>("file") else {
        return Ok(false);
    };
    let source = read(path)?;
    let context = Context::new(load_config(matches)?).with_function(echo());
    tracing::info!(file = %path.display(), "running");
    let result = stride::interpret(&source, &context);
    let json = if matches.get_flag("pretty") {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(result.is_success())
}

fn check(matches: &ArgMatches) -> Result<bool, CliError> {
    let Some(path) = matches.get_one::<PathBuf>("file") else {
        return Ok(false);
    };
    let source = read(path)?;
    let locale = matches
        .get_one::<String>("locale")
        .map_or("en", String::as_str);
    match stride::check(&source, locale) {
        None => {
            println!("{}: ok", path.display());
            Ok(true)
        }
        Some(error) => {
            println!(
                "{}:{}:{}: {}",
                path.display(),
                error.span.start_line,
                error.span.start_col,
                error.message
            );
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let outcome = match matches.subcommand() {
        Some(("run", sub)) => run(sub),
        Some(("check", sub)) => check(sub),
        Some(("reference", _)) => {
            let externals = Context::default().with_function(echo()).external_functions;
            print!("{}", stride::reference::generate_reference(&externals));
            Ok(true)
        }
        _ => Ok(false),
    };
    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %e, "stride failed");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_matches(args: &[&str]) -> ArgMatches {
        let matches = cli()
            .try_get_matches_from(args)
            .unwrap_or_else(|e| panic!("{e}"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "run");
        sub.clone()
    }

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let matches = run_matches(&[
            "stride",
            "run",
            "prog.stride",
            "--locale",
            "nl",
            "--max-steps",
            "25",
        ]);
        let config = load_config(&matches).unwrap();
        assert_eq!(config.locale, "nl");
        assert_eq!(config.max_steps, 25);
        assert_eq!(config.max_call_depth, 64);
    }

    #[test]
    fn config_file_then_flags() {
        let path = std::env::temp_dir().join(format!("stride-cli-test-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"locale":"system","max_steps":9,"max_call_depth":4}"#).unwrap();
        let path_arg = path.to_string_lossy().into_owned();
        let matches = run_matches(&["stride", "run", "p.stride", "-c", &path_arg, "--max-steps", "99"]);
        let config = load_config(&matches).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.locale, "system");
        assert_eq!(config.max_steps, 99);
        assert_eq!(config.max_call_depth, 4);
    }

    #[test]
    fn missing_config_file_is_read_error() {
        let matches = run_matches(&["stride", "run", "p.stride", "--config", "/nonexistent/stride.json"]);
        assert!(matches!(load_config(&matches), Err(CliError::Read { .. })));
    }

    #[test]
    fn rejects_call_depth_past_ceiling() {
        let matches = run_matches(&["stride", "run", "p.stride", "--max-call-depth", "1000000"]);
        assert!(matches!(
            load_config(&matches),
            Err(CliError::Config(stride::Error::CallDepthTooLarge { .. }))
        ));
        let matches = run_matches(&["stride", "run", "p.stride", "--max-steps", "0"]);
        assert!(matches!(
            load_config(&matches),
            Err(CliError::Config(stride::Error::ZeroStepBudget))
        ));
    }

    #[test]
    fn rejects_non_numeric_budget() {
        assert!(cli()
            .try_get_matches_from(["stride", "run", "p.stride", "--max-steps", "lots"])
            .is_err());
    }

    #[test]
    fn echo_is_variadic() {
        let echo = echo();
        assert_eq!(echo.arity, Arity::Variadic);
        assert_eq!(echo.call(&[Value::from("hi"), Value::Number(2.0)]), Ok(Value::Null));
    }
}
