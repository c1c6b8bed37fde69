//! Interactive prompts for the `add` command.

use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// Prompt shown before reading the call sign.
pub const CALL_SIGN_PROMPT: &str = "Call Sign: ";

/// Prompt shown before reading the name.
pub const NAME_PROMPT: &str = "Enter Name: ";

/// Collect a call sign and name, prompting only for the ones not given.
///
/// Surrounding whitespace is trimmed from both values.
///
/// # Errors
///
/// Returns [`Error::Input`] if the call sign ends up empty, or an I/O error
/// if reading or writing the prompt fails.
pub fn read_entry_fields<R, W>(
    reader: &mut R,
    writer: &mut W,
    call_sign: Option<&str>,
    name: Option<&str>,
) -> Result<(String, String)>
where
    R: BufRead,
    W: Write,
{
    let call_sign = match call_sign {
        Some(value) => value.trim().to_string(),
        None => prompt(reader, writer, CALL_SIGN_PROMPT)?,
    };
    if call_sign.is_empty() {
        return Err(Error::input("call sign must not be empty"));
    }

    let name = match name {
        Some(value) => value.trim().to_string(),
        None => prompt(reader, writer, NAME_PROMPT)?,
    };

    Ok((call_sign, name))
}

fn prompt<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, label: &str) -> Result<String> {
    write!(writer, "{label}")?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompts_for_both_fields() {
        let mut reader = Cursor::new("KYYZZ\nTest User\n");
        let mut output = Vec::new();

        let (call_sign, name) = read_entry_fields(&mut reader, &mut output, None, None).unwrap();

        assert_eq!(call_sign, "KYYZZ");
        assert_eq!(name, "Test User");
        assert_eq!(String::from_utf8(output).unwrap(), "Call Sign: Enter Name: ");
    }

    #[test]
    fn test_skips_prompts_for_given_fields() {
        let mut reader = Cursor::new("");
        let mut output = Vec::new();

        let (call_sign, name) =
            read_entry_fields(&mut reader, &mut output, Some("KYYZZ"), Some("Test User")).unwrap();

        assert_eq!(call_sign, "KYYZZ");
        assert_eq!(name, "Test User");
        assert!(output.is_empty());
    }

    #[test]
    fn test_prompts_only_for_name() {
        let mut reader = Cursor::new("Test User\r\n");
        let mut output = Vec::new();

        let (_, name) = read_entry_fields(&mut reader, &mut output, Some("KYYZZ"), None).unwrap();

        assert_eq!(name, "Test User");
        assert_eq!(String::from_utf8(output).unwrap(), NAME_PROMPT);
    }

    #[test]
    fn test_empty_call_sign_rejected() {
        let mut reader = Cursor::new("\nTest User\n");
        let mut output = Vec::new();

        let err = read_entry_fields(&mut reader, &mut output, None, None).unwrap_err();
        assert!(matches!(err, Error::Input { .. }));
    }

    #[test]
    fn test_whitespace_call_sign_rejected() {
        let mut reader = Cursor::new("");
        let mut output = Vec::new();

        assert!(read_entry_fields(&mut reader, &mut output, Some("   "), Some("x")).is_err());
    }

    #[test]
    fn test_eof_gives_empty_name() {
        let mut reader = Cursor::new("KYYZZ\n");
        let mut output = Vec::new();

        let (call_sign, name) = read_entry_fields(&mut reader, &mut output, None, None).unwrap();
        assert_eq!(call_sign, "KYYZZ");
        assert_eq!(name, "");
    }
}
