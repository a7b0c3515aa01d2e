//! Line-oriented terminal I/O
//!
//! All interactive flows read and write through a `Console`, so they can be
//! driven by scripted input in tests. End of input surfaces as
//! `LedgerError::Cancelled`.

use std::io::{BufRead, Write};

use crate::error::{LedgerError, LedgerResult};

/// Prompt-and-answer access to the terminal
pub struct Console<'a> {
    input: &'a mut dyn BufRead,
    output: &'a mut dyn Write,
    errors: &'a mut dyn Write,
}

impl<'a> Console<'a> {
    pub fn new(
        input: &'a mut dyn BufRead,
        output: &'a mut dyn Write,
        errors: &'a mut dyn Write,
    ) -> Self {
        Self {
            input,
            output,
            errors,
        }
    }

    /// Print a prompt and read one trimmed line
    pub fn ask(&mut self, prompt: &str) -> LedgerResult<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(LedgerError::Cancelled);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until `parse` accepts the answer
    ///
    /// Validation failures are reported and the prompt repeats; any other
    /// error is returned.
    pub fn ask_until<T, F>(&mut self, prompt: &str, mut parse: F) -> LedgerResult<T>
    where
        F: FnMut(&str) -> LedgerResult<T>,
    {
        loop {
            let answer = self.ask(prompt)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(LedgerError::Validation(msg)) => self.error(&msg)?,
                Err(e) => return Err(e),
            }
        }
    }

    /// Yes/no question, repeated until answered
    pub fn confirm(&mut self, question: &str) -> LedgerResult<bool> {
        self.ask_until(&format!("{} (y/n) ", question), |answer| {
            match answer.to_lowercase().as_str() {
                "y" | "yes" => Ok(true),
                "n" | "no" => Ok(false),
                _ => Err(LedgerError::Validation("Please answer y or n.".into())),
            }
        })
    }

    pub fn say(&mut self, message: &str) -> LedgerResult<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    pub fn warn(&mut self, message: &str) -> LedgerResult<()> {
        writeln!(self.errors, "Warning: {}", message)?;
        Ok(())
    }

    pub fn error(&mut self, message: &str) -> LedgerResult<()> {
        writeln!(self.errors, "Error: {}", message)?;
        Ok(())
    }

    /// Raw output stream, for bulk text
    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_ask_trims_and_reports_eof() {
        let mut input = Cursor::new("  hello  \n");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut console = Console::new(&mut input, &mut out, &mut err);

        assert_eq!(console.ask("> ").unwrap(), "hello");
        assert!(console.ask("> ").unwrap_err().is_cancelled());
    }

    #[test]
    fn test_confirm_repeats_until_answered() {
        let mut input = Cursor::new("maybe\nY\n");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut console = Console::new(&mut input, &mut out, &mut err);

        assert!(console.confirm("Remove this transaction?").unwrap());
        drop(console);
        assert!(String::from_utf8(err).unwrap().contains("Please answer y or n."));
    }

    #[test]
    fn test_ask_until_propagates_non_validation_errors() {
        let mut input = Cursor::new("x\n");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut console = Console::new(&mut input, &mut out, &mut err);

        let result: LedgerResult<()> =
            console.ask_until("> ", |_| Err(LedgerError::Storage("disk".into())));
        assert!(matches!(result, Err(LedgerError::Storage(_))));
    }
}
