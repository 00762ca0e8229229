use std::io::{self, BufRead, Write};

/// Asks `question` and reads a yes/no answer. End of input counts as no.
pub fn confirm<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::confirm;

    #[test]
    fn accepts_yes_in_any_case() {
        let mut out = Vec::new();
        assert!(confirm("Continue?", &mut Cursor::new("YES\n"), &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "Continue? [y/N] ");
        assert!(confirm("Continue?", &mut Cursor::new(" y \n"), &mut Vec::new()).unwrap());
    }

    #[test]
    fn anything_else_declines() {
        assert!(!confirm("Continue?", &mut Cursor::new("\n"), &mut Vec::new()).unwrap());
        assert!(!confirm("Continue?", &mut Cursor::new("sure\n"), &mut Vec::new()).unwrap());
        assert!(!confirm("Continue?", &mut Cursor::new(""), &mut Vec::new()).unwrap());
    }
}
