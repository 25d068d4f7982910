mod options;

use std::fs;
use std::process::ExitCode;

use log::{error, info};
use rustyline::{error::ReadlineError, DefaultEditor};
use thiserror::Error;

use lox_scanner::{Diagnostics, Scanner};
use options::Options;

const EXIT_DATA_ERROR: u8 = 65;
const EXIT_NO_INPUT: u8 = 66;
const EXIT_IO_ERROR: u8 = 74;

#[derive(Debug, Error)]
enum RunError {
    #[error("Failed to read file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Prompt failed: {0}")]
    Readline(#[from] ReadlineError),
}

impl RunError {
    fn exit_code(&self) -> ExitCode {
        match self {
            RunError::Io { .. } => ExitCode::from(EXIT_NO_INPUT),
            RunError::Readline(_) => ExitCode::from(EXIT_IO_ERROR),
        }
    }
}

/// Scans one unit of source, printing its tokens and logging whatever was
/// reported into `diagnostics`.
fn run(source: &str, opts: &Options, diagnostics: &mut Diagnostics) {
    let tokens = Scanner::new(source).scan_tokens(diagnostics);

    if !opts.quiet {
        for token in &tokens {
            println!("{}", token);
        }
    }
    for diagnostic in diagnostics.iter() {
        error!("{}", diagnostic);
    }
}

fn run_file(path: &str, opts: &Options) -> Result<Diagnostics, RunError> {
    let source = fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_owned(),
        source,
    })?;
    info!("Scanning file: {}", path);

    let mut diagnostics = Diagnostics::new();
    run(&source, opts, &mut diagnostics);
    Ok(diagnostics)
}

fn run_prompt(opts: &Options) -> Result<(), RunError> {
    let mut editor = DefaultEditor::new()?;
    // Each line is scanned on its own, so errors never carry over
    let mut diagnostics = Diagnostics::new();

    loop {
        match editor.readline(">> ") {
            Ok(line) => {
                editor.add_history_entry(line.as_str())?;
                run(&line, opts, &mut diagnostics);
                diagnostics.clear();
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let opts = Options::parse();

    let result = match &opts.script {
        Some(path) => run_file(path, &opts).map(|diagnostics| diagnostics.had_error()),
        None => run_prompt(&opts).map(|_| false),
    };

    match result {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(EXIT_DATA_ERROR),
        Err(err) => {
            error!("{}", err);
            err.exit_code()
        },
    }
}
