//! Shunt CLI
//!
//! Command-line calculator and REPL built on `shunt-core`.

mod repl;

use std::io;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use miette::Diagnostic;
use serde::Serialize;
use shunt_core::{render_infix, to_postfix, token, Calculator, Environment, Operator};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use crate::repl::ReplOptions;

#[derive(Parser)]
#[command(name = "shunt")]
#[command(author, version, about = "Evaluate infix arithmetic expressions", long_about = None)]
struct Cli {
    /// Log pipeline stages to stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Bind a variable before evaluating anything (repeatable)
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_binding, global = true)]
    defines: Vec<(String, f64)>,

    /// Start without the predefined constants pi, e and phi
    #[arg(long, global = true)]
    no_constants: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (the default)
    Repl {
        /// Prompt printed before each line
        #[arg(long, default_value = repl::DEFAULT_PROMPT)]
        prompt: String,

        /// Do not print the help banner on start
        #[arg(long)]
        no_banner: bool,
    },

    /// Evaluate expressions in order within one session
    Eval {
        /// Expressions to evaluate
        #[arg(required = true)]
        expressions: Vec<String>,

        /// Output format (human, json)
        #[arg(short, long, default_value = "human")]
        format: String,
    },

    /// Show the postfix form of an expression (for debugging)
    Postfix {
        /// Expression to convert
        expression: String,
    },

    /// List the supported operators and functions
    Functions,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut calculator = build_calculator(cli.no_constants, &cli.defines);

    match cli.command.unwrap_or(Commands::Repl {
        prompt: repl::DEFAULT_PROMPT.to_string(),
        no_banner: false,
    }) {
        Commands::Repl { prompt, no_banner } => cmd_repl(&mut calculator, prompt, no_banner),
        Commands::Eval { expressions, format } => cmd_eval(&mut calculator, &expressions, &format),
        Commands::Postfix { expression } => cmd_postfix(&expression),
        Commands::Functions => cmd_functions(),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn build_calculator(no_constants: bool, defines: &[(String, f64)]) -> Calculator {
    let mut env = if no_constants {
        Environment::empty()
    } else {
        Environment::new()
    };
    for (name, value) in defines {
        debug!(name = name.as_str(), value, "predefined variable");
        env.bind(name.as_str(), *value);
    }
    Calculator::with_environment(env)
}

/// Parse a `NAME=VALUE` pair from the command line.
fn parse_binding(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();

    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("'{}' is not a valid variable name", name));
    }

    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{}': {}", name, e))?;
    Ok((name.to_string(), value))
}

fn cmd_repl(calculator: &mut Calculator, prompt: String, no_banner: bool) -> ExitCode {
    let options = ReplOptions {
        prompt,
        banner: !no_banner,
    };
    let stdin = io::stdin();
    match repl::run(stdin.lock(), io::stdout(), calculator, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// One entry of `eval --format json`.
#[derive(Debug, Serialize)]
struct EvalReport<'a> {
    expression: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

#[derive(Debug, Serialize)]
struct EvalOutput<'a> {
    version: &'static str,
    status: &'static str,
    results: Vec<EvalReport<'a>>,
    bindings: &'a Environment,
}

fn cmd_eval(calculator: &mut Calculator, expressions: &[String], format: &str) -> ExitCode {
    let mut reports = Vec::with_capacity(expressions.len());
    for expression in expressions {
        let report = match calculator.evaluate(expression) {
            Ok(result) => {
                let env = calculator.environment();
                EvalReport {
                    expression,
                    status: "ok",
                    value: result.as_ref().and_then(|operand| operand.value(env).ok()),
                    display: result.map(|operand| operand.display(env).to_string()),
                    error: None,
                    code: None,
                }
            }
            Err(err) => EvalReport {
                expression,
                status: "error",
                value: None,
                display: None,
                code: err.code().map(|code| code.to_string()),
                error: Some(err.to_string()),
            },
        };
        reports.push(report);
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();

    match format {
        "json" => {
            let output = EvalOutput {
                version: "1.0",
                status: if failed == 0 { "ok" } else { "error" },
                results: reports,
                bindings: calculator.environment(),
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("{} failed to serialize results: {}", "error:".red().bold(), e);
                    return ExitCode::from(2);
                }
            }
        }
        _ => {
            for report in &reports {
                match (&report.display, &report.error) {
                    (_, Some(error)) => println!("{} {}", "ERROR:".red().bold(), error),
                    (Some(display), None) => println!("{}", display),
                    (None, None) => {}
                }
            }
        }
    }

    if failed > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_postfix(expression: &str) -> ExitCode {
    let rendered = to_postfix(expression)
        .and_then(|tokens| Ok((token::render(&tokens), render_infix(&tokens)?)));

    match rendered {
        Ok((postfix, infix)) => {
            println!("{} {}", "postfix:".bold(), postfix);
            if let Some(infix) = infix {
                println!("{} {}", "infix:".bold(), infix);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            let mut stdout = io::stdout();
            if let Err(e) = repl::write_error(&mut stdout, &err) {
                eprintln!("{} {}", "error:".red().bold(), e);
                return ExitCode::from(2);
            }
            ExitCode::from(1)
        }
    }
}

fn cmd_functions() -> ExitCode {
    println!(
        "{:<8} {:<6} {:<16} {}",
        "symbol".bold(),
        "arity".bold(),
        "priority".bold(),
        "description".bold()
    );
    for op in Operator::all() {
        println!(
            "{:<8} {:<6} {:<16} {}",
            op.symbol().cyan(),
            op.arity(),
            format!("{:?}", op.priority()),
            op.description()
        );
    }
    ExitCode::SUCCESS
}
