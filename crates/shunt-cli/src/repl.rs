//! Read-evaluate-print loop.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use miette::Diagnostic;
use shunt_core::{Calculator, Error};
use tracing::debug;

pub const DEFAULT_PROMPT: &str = ">> ";

pub const HELP_MESSAGE: &str = "
========== Help Message ==========
 Enter complete expressions on each line.
 Press Return to evaluate.

 Supported operations are +, -, *, /, ^ (exponentiation)
 and = (assignment, e.g. x = 2).
 Some more functions supported are:
 1. Absolute value - abs(x)
 2. Square root - sqrt(x)
 3. Sine - sin(x)
 4. Cosine - cos(x)
 5. Tangent - tan(x)
 6. Exponential - exp(x)
 7. Natural logarithm - log(x)
 The constants pi, e and phi are predefined.

 To display this message again, type 'help'
 in a new line. To exit, type 'exit' or 'quit'.";

/// What a trimmed input line asks the loop to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Exit,
    Help,
    Expression(&'a str),
}

impl<'a> Line<'a> {
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() || line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            Line::Exit
        } else if line.eq_ignore_ascii_case("help") {
            Line::Help
        } else {
            Line::Expression(line)
        }
    }
}

/// Options for running the loop.
#[derive(Debug, Clone)]
pub struct ReplOptions {
    pub prompt: String,
    pub banner: bool,
}

impl Default for ReplOptions {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            banner: true,
        }
    }
}

/// Run the loop until an exit line or end of input.
pub fn run<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    calculator: &mut Calculator,
    options: &ReplOptions,
) -> io::Result<()> {
    if options.banner {
        writeln!(output, "{}", HELP_MESSAGE)?;
    }

    let mut buffer = String::new();
    loop {
        write!(output, "{}", options.prompt)?;
        output.flush()?;

        buffer.clear();
        if input.read_line(&mut buffer)? == 0 {
            writeln!(output)?;
            break;
        }

        match Line::classify(&buffer) {
            Line::Exit => break,
            Line::Help => writeln!(output, "{}", HELP_MESSAGE)?,
            Line::Expression(expression) => match calculator.evaluate_to_string(expression) {
                Ok(Some(result)) => writeln!(output, "{}", result)?,
                Ok(None) => {}
                Err(err) => write_error(&mut output, &err)?,
            },
        }
    }

    debug!("repl finished");
    Ok(())
}

/// Print `ERROR: <message>`, followed by the diagnostic help if it has one.
pub fn write_error<W: Write>(output: &mut W, err: &Error) -> io::Result<()> {
    writeln!(output, "{} {}", "ERROR:".red().bold(), err)?;
    if let Some(help) = err.help() {
        writeln!(output, "  {} {}", "help:".cyan(), help.to_string().dimmed())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(lines: &str) -> String {
        colored::control::set_override(false);
        let mut calculator = Calculator::new();
        let options = ReplOptions {
            prompt: "> ".to_string(),
            banner: false,
        };
        let mut output = Vec::new();
        run(Cursor::new(lines), &mut output, &mut calculator, &options).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(Line::classify("   "), Line::Exit);
        assert_eq!(Line::classify("EXIT"), Line::Exit);
        assert_eq!(Line::classify(" Quit\n"), Line::Exit);
        assert_eq!(Line::classify("help"), Line::Help);
        assert_eq!(Line::classify(" 1 + 2 \n"), Line::Expression("1 + 2"));
    }

    #[test]
    fn test_evaluates_until_exit() {
        let out = session("x = 5\nx + 1\nx\nquit\n1+1\n");
        assert_eq!(out, "> 5.00\n> 6.00\n> x = 5.00\n> ");
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let out = session("sqrt(-1)\n2^10\n");
        assert!(out.contains("ERROR: cannot calculate square root of a negative real number"));
        assert!(out.contains("> 1024.00\n"));
    }

    #[test]
    fn test_error_help_is_printed() {
        let out = session("1,2\n\n");
        assert!(out.contains("ERROR: either argument separator (,) is misplaced"));
        assert!(out.contains("help: ',' may only appear inside the argument list of a function"));
    }

    #[test]
    fn test_help_and_end_of_input() {
        let out = session("help\n");
        assert!(out.starts_with("> \n========== Help Message =========="));
        assert!(out.ends_with("> \n"));
    }

    #[test]
    fn test_empty_line_exits() {
        let out = session("\n2\n");
        assert_eq!(out, "> ");
    }
}
