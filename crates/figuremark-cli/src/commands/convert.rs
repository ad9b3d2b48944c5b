//! `figuremark convert` command implementation.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use figuremark::{Conversion, FigureProcessor};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Markdown file to convert (default: stdin).
    input: Option<PathBuf>,

    /// File to write the result to (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output (log every figure at DEBUG level).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let text = read_input(self.input.as_deref())?;
        let conversion = FigureProcessor::new().process(&text);
        write_output(self.output.as_deref(), &conversion)?;

        output.figure_count(conversion.count());
        Ok(())
    }
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).map_err(|e| CliError::file(path, e))
        }
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn write_output(path: Option<&Path>, conversion: &Conversion) -> Result<(), CliError> {
    match path {
        Some(path) => fs::write(path, &conversion.text).map_err(|e| CliError::file(path, e)),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(conversion.text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
