//! Line-oriented prompting over any reader/writer pair.

use std::io::{self, BufRead, Write};

/// Writes `message`, flushes, and reads one line with the line ending removed.
///
/// Returns `Ok(None)` once the input is exhausted.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<Option<String>> {
    write!(output, "{message}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Trims and lowercases an answer so "Yes\n" and "yes" compare equal.
pub fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}
