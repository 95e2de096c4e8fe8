//! Ties the phases together: scan → parse → resolve → interpret.

use std::io;

use log::{debug, info};
use thiserror::Error;

use crate::ast::Stmt;
use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

/// Why a run stopped.
#[derive(Debug, Error)]
pub enum RunError {
    /// Lex, parse or resolve errors; nothing was executed.
    #[error("{} static error(s)", .0.len())]
    Static(Vec<LoxError>),

    /// A runtime fault abandoned the remaining top‑level statements.
    #[error(transparent)]
    Runtime(LoxError),
}

/// One interpreter session.  Globals persist across [`Runner::run`] calls,
/// which is what the REPL relies on.
pub struct Runner {
    interpreter: Interpreter,
    had_error: bool,
    had_runtime_error: bool,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new())
    }

    pub fn with_interpreter(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            had_error: false,
            had_runtime_error: false,
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Forget earlier static errors (each REPL line starts clean).
    pub fn clear_errors(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    /// Prompt and read one line through the interpreter's own streams, so
    /// the REPL and `input()` share a single reader.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.interpreter.write_prompt(prompt)?;
        self.interpreter.read_line()
    }

    /// Scan and parse only, reporting every lex and syntax error together.
    pub fn parse_source(source: &str) -> Result<Vec<Stmt>, Vec<LoxError>> {
        let (tokens, mut errors) = Scanner::new(source.as_bytes()).scan_all();
        debug!(
            "Scanned {} token(s), {} lex error(s)",
            tokens.len(),
            errors.len()
        );

        match Parser::new(tokens).parse() {
            Ok(statements) if errors.is_empty() => Ok(statements),
            Ok(_) => Err(errors),
            Err(parse_errors) => {
                errors.extend(parse_errors);
                Err(errors)
            }
        }
    }

    /// Run one chunk of source text.
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        info!("Running {} byte(s) of source", source.len());

        let statements: Vec<Stmt> = Self::parse_source(source).map_err(|errors| {
            self.had_error = true;
            RunError::Static(errors)
        })?;

        let locals = Resolver::new().resolve(&statements).map_err(|errors| {
            self.had_error = true;
            RunError::Static(errors)
        })?;

        self.interpreter.resolve(locals);

        self.interpreter.interpret(&statements).map_err(|e| {
            self.had_runtime_error = true;
            RunError::Runtime(e)
        })
    }
}
