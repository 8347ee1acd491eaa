//! UI helper functions for terminal output formatting.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Writes `prompt` without a newline and flushes so it shows before input is read.
pub fn prompt(out: &mut dyn Write, prompt: &str) -> std::io::Result<()> {
    write!(out, "{}", prompt)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_and_warning_prefixes() {
        let mut buf = Vec::new();
        write_error(&mut buf, "boom").unwrap();
        display_warning(&mut buf, "careful").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Error: boom\nWARNING: careful\n");
    }

    #[test]
    fn prompt_has_no_newline() {
        let mut buf = Vec::new();
        prompt(&mut buf, "> ").unwrap();
        assert_eq!(buf, b"> ");
    }
}
