//! JSON line I/O for the CLI
//!
//! - Input: one JSON request per line
//! - Output: one JSON response per line, flushed immediately
//! - UTF-8 only

use std::io::{BufRead, Write};

use crate::api::Response;

use super::errors::{CliError, CliResult};

/// Iterate over non-blank request lines
pub fn read_requests<R: BufRead>(input: R) -> impl Iterator<Item = CliResult<String>> {
    input
        .lines()
        .map(|line| line.map_err(CliError::from))
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
}

/// Write one response line
pub fn write_response<W: Write>(output: &mut W, response: &Response) -> CliResult<()> {
    writeln!(output, "{}", response.to_json())?;
    output.flush()?;
    Ok(())
}

/// Write a CLI failure as an error envelope
pub fn write_error<W: Write>(output: &mut W, err: &CliError) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": err.code_str(),
        "message": err.message()
    });
    writeln!(output, "{}", response)?;
    output.flush()?;
    Ok(())
}
