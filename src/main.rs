use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use treelox::ast_printer::AstPrinter;
use treelox::error::LoxError;
use treelox::runner::{RunError, Runner};
use treelox::scanner::Scanner;
use treelox::token::Token;

/// Exit status for lex, syntax and resolution errors.
const EXIT_STATIC_ERROR: u8 = 65;

/// Exit status for runtime faults.
const EXIT_RUNTIME_ERROR: u8 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Tree-walking interpreter for a small scripting language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Emit the token list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses a file and prints its syntax tree
    Parse {
        filename: PathBuf,

        /// Emit the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Runs a file as a program
    Run { filename: PathBuf },

    /// Starts an interactive session (the default)
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    String::from_utf8(buf).context(format!("File {:?} is not valid UTF-8", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'treelox::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("treelox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn report_all(errors: &[LoxError]) {
    for e in errors {
        eprintln!("{}", e);
    }
}

fn tokenize(filename: &PathBuf, json: bool) -> Result<ExitCode> {
    let source = read_file(filename)?;
    let (tokens, errors): (Vec<Token>, Vec<LoxError>) = Scanner::new(source.as_bytes()).scan_all();

    report_all(&errors);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    if errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        debug!("Tokenization failed with {} error(s)", errors.len());
        Ok(ExitCode::from(EXIT_STATIC_ERROR))
    }
}

fn parse(filename: &PathBuf, json: bool) -> Result<ExitCode> {
    let source = read_file(filename)?;

    match Runner::parse_source(&source) {
        Ok(statements) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&statements)?);
            } else {
                println!("{}", AstPrinter::print_program(&statements));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            report_all(&errors);
            Ok(ExitCode::from(EXIT_STATIC_ERROR))
        }
    }
}

fn run(filename: &PathBuf) -> Result<ExitCode> {
    let source = read_file(filename)?;
    let mut runner = Runner::new();

    match runner.run(&source) {
        Ok(()) => info!("Program executed successfully"),
        Err(RunError::Static(errors)) => report_all(&errors),
        Err(RunError::Runtime(e)) => eprintln!("{}", e),
    }

    if runner.had_error() {
        Ok(ExitCode::from(EXIT_STATIC_ERROR))
    } else if runner.had_runtime_error() {
        Ok(ExitCode::from(EXIT_RUNTIME_ERROR))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn repl() -> Result<ExitCode> {
    let mut runner = Runner::new();

    while let Some(line) = runner.read_line("> ").context("Failed to read input")? {
        debug!("REPL line: {}", line);

        match runner.run(&line) {
            Ok(()) => {}
            Err(RunError::Static(errors)) => report_all(&errors),
            Err(RunError::Runtime(e)) => eprintln!("{}", e),
        }

        runner.clear_errors();
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        // Minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match &args.commands {
        Some(Commands::Tokenize { filename, json }) => tokenize(filename, *json),
        Some(Commands::Parse { filename, json }) => parse(filename, *json),
        Some(Commands::Run { filename }) => run(filename),
        Some(Commands::Repl) | None => repl(),
    }
}
